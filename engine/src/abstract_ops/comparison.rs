//! `LessThan` (spec.md §4.6): a tri-state relational comparison.

use super::conversions::{to_primitive, Hint, Numeric};
use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::types::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tri {
    True,
    False,
    /// Either operand was `NaN`: comparisons involving it are neither true
    /// nor false (spec.md §4.6).
    Neither,
}

/// Strings compare lexicographically by UTF-16 code unit; mixing `bigint`
/// and numeric compares exact values; `NaN` on either side yields `Neither`.
pub fn less_than(agent: &mut Agent, a: &Value, b: &Value) -> Completion<Tri> {
    let pa = to_primitive(agent, a, Hint::Number)?;
    let pb = to_primitive(agent, b, Hint::Number)?;

    if let (Value::String(x), Value::String(y)) = (&pa, &pb) {
        return Ok(if x.units() < y.units() {
            Tri::True
        } else {
            Tri::False
        });
    }

    let na = super::conversions::to_numeric(agent, &pa)?;
    let nb = super::conversions::to_numeric(agent, &pb)?;
    Ok(match (na, nb) {
        (Numeric::Number(x), Numeric::Number(y)) => {
            if x.is_nan() || y.is_nan() {
                Tri::Neither
            } else if x < y {
                Tri::True
            } else {
                Tri::False
            }
        }
        (Numeric::BigInt(x), Numeric::BigInt(y)) => {
            if x.inner() < y.inner() {
                Tri::True
            } else {
                Tri::False
            }
        }
        (Numeric::BigInt(x), Numeric::Number(y)) => {
            if y.is_nan() {
                Tri::Neither
            } else if (x.to_f64()) < y {
                Tri::True
            } else {
                Tri::False
            }
        }
        (Numeric::Number(x), Numeric::BigInt(y)) => {
            if x.is_nan() {
                Tri::Neither
            } else if x < y.to_f64() {
                Tri::True
            } else {
                Tri::False
            }
        }
    })
}

/// `a <= b` is the logical complement of `LessThan(b, a)`, with
/// `Neither -> false` (spec.md §4.6).
pub fn less_or_equal(agent: &mut Agent, a: &Value, b: &Value) -> Completion<bool> {
    Ok(match less_than(agent, b, a)? {
        Tri::True => false,
        Tri::False => true,
        Tri::Neither => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_comparisons_are_neither() {
        let mut agent = Agent::new();
        let nan = Value::Number(f64::NAN);
        assert_eq!(less_than(&mut agent, &nan, &Value::Number(1.0)).unwrap(), Tri::Neither);
        assert!(!less_or_equal(&mut agent, &nan, &Value::Number(1.0)).unwrap());
        assert!(!less_or_equal(&mut agent, &Value::Number(1.0), &nan).unwrap());
    }

    #[test]
    fn strings_compare_lexicographically() {
        let mut agent = Agent::new();
        let result = less_than(&mut agent, &Value::from_str("a"), &Value::from_str("b")).unwrap();
        assert_eq!(result, Tri::True);
    }

    #[test]
    fn less_or_equal_is_inclusive() {
        let mut agent = Agent::new();
        assert!(less_or_equal(&mut agent, &Value::Number(1.0), &Value::Number(1.0)).unwrap());
    }
}
