//! `LooseEqual` (`==`/`!=`), spec.md §4.6.

use super::conversions::{to_number, to_primitive, Hint};
use crate::completion::Completion;
use crate::execution::agent::Agent;
use crate::types::Value;

/// Iterates per spec.md §4.6: same type -> strict equal; null/undefined
/// cross-equal; object vs primitive -> coerce the object; boolean -> coerce
/// to number; number<->string -> coerce string to number; number<->bigint
/// -> compare exact values; string<->bigint -> coerce string to bigint.
pub fn loose_equal(agent: &mut Agent, a: &Value, b: &Value) -> Completion<bool> {
    use Value::*;
    match (a, b) {
        (Undefined | Null, Undefined | Null) => Ok(true),
        (Number(_), Number(_))
        | (String(_), String(_))
        | (Boolean(_), Boolean(_))
        | (BigInt(_), BigInt(_))
        | (Symbol(_), Symbol(_))
        | (Object(_), Object(_)) => Ok(strict_equal(a, b)),
        (Undefined | Null, _) | (_, Undefined | Null) => Ok(false),
        (Number(x), String(s)) => Ok(*x == crate::types::number::string_to_number(&s.to_string_lossy())),
        (String(s), Number(x)) => Ok(crate::types::number::string_to_number(&s.to_string_lossy()) == *x),
        (BigInt(x), String(s)) => Ok(crate::types::bigint::JsBigInt::parse_str(&s.to_string_lossy())
            .map(|y| x == &y)
            .unwrap_or(false)),
        (String(s), BigInt(y)) => Ok(crate::types::bigint::JsBigInt::parse_str(&s.to_string_lossy())
            .map(|x| &x == y)
            .unwrap_or(false)),
        (Boolean(_), _) => {
            let n = to_number(agent, a)?;
            loose_equal(agent, &Value::Number(n), b)
        }
        (_, Boolean(_)) => {
            let n = to_number(agent, b)?;
            loose_equal(agent, a, &Value::Number(n))
        }
        (Number(x), BigInt(y)) | (BigInt(y), Number(x)) => {
            Ok(!x.is_nan() && !x.is_infinite() && *x == y.to_f64())
        }
        (Object(_), _) => {
            let prim = to_primitive(agent, a, Hint::Default)?;
            loose_equal(agent, &prim, b)
        }
        (_, Object(_)) => {
            let prim = to_primitive(agent, b, Hint::Default)?;
            loose_equal(agent, a, &prim)
        }
        _ => Ok(false),
    }
}

pub fn strict_equal(a: &Value, b: &Value) -> bool {
    use Value::*;
    match (a, b) {
        (Undefined, Undefined) => true,
        (Null, Null) => true,
        (Boolean(x), Boolean(y)) => x == y,
        (Number(x), Number(y)) => x == y,
        (BigInt(x), BigInt(y)) => x == y,
        (String(x), String(y)) => x == y,
        (Symbol(x), Symbol(y)) => x == y,
        (Object(x), Object(y)) => x.ptr_eq(y),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::agent::Agent;

    #[test]
    fn nan_is_never_equal_to_itself() {
        let nan = Value::Number(f64::NAN);
        assert!(!strict_equal(&nan, &nan));
        let mut agent = Agent::new();
        assert!(!loose_equal(&mut agent, &nan, &nan).unwrap());
    }

    #[test]
    fn null_and_undefined_are_loosely_equal_but_not_strictly() {
        assert!(!strict_equal(&Value::Null, &Value::Undefined));
        let mut agent = Agent::new();
        assert!(loose_equal(&mut agent, &Value::Null, &Value::Undefined).unwrap());
    }

    #[test]
    fn number_and_numeric_string_are_loosely_equal() {
        let mut agent = Agent::new();
        assert!(loose_equal(&mut agent, &Value::Number(1.0), &Value::from_str("1")).unwrap());
        assert!(!loose_equal(&mut agent, &Value::Number(1.0), &Value::from_str("1.5")).unwrap());
    }

    #[test]
    fn boolean_coerces_to_number_for_loose_equal() {
        let mut agent = Agent::new();
        assert!(loose_equal(&mut agent, &Value::Boolean(true), &Value::Number(1.0)).unwrap());
        assert!(!loose_equal(&mut agent, &Value::Boolean(false), &Value::Number(1.0)).unwrap());
    }

    #[test]
    fn bigint_and_number_compare_exact_values() {
        let mut agent = Agent::new();
        let big = crate::types::bigint::JsBigInt::parse_str("10").unwrap();
        assert!(loose_equal(&mut agent, &Value::BigInt(big.clone()), &Value::Number(10.0)).unwrap());
        assert!(!loose_equal(&mut agent, &Value::BigInt(big), &Value::Number(10.5)).unwrap());
    }
}
