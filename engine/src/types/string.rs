//! The `string` value variant: a UTF-16 code-unit sequence (spec.md §3.1).

use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Eq)]
pub struct JsString(Rc<Vec<u16>>);

impl JsString {
    pub fn from_str(s: &str) -> Self {
        JsString(Rc::new(s.encode_utf16().collect()))
    }

    pub fn from_units(units: Vec<u16>) -> Self {
        JsString(Rc::new(units))
    }

    pub fn units(&self) -> &[u16] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn char_code_at(&self, index: usize) -> Option<u16> {
        self.0.get(index).copied()
    }

    pub fn concat(&self, other: &JsString) -> JsString {
        let mut units = Vec::with_capacity(self.0.len() + other.0.len());
        units.extend_from_slice(&self.0);
        units.extend_from_slice(&other.0);
        JsString::from_units(units)
    }

    pub fn slice(&self, start: usize, end: usize) -> JsString {
        let end = end.min(self.0.len());
        let start = start.min(end);
        JsString::from_units(self.0[start..end].to_vec())
    }

    /// Lossy conversion to a Rust `String`, substituting U+FFFD for
    /// unpaired surrogates. Used for host-side diagnostics, property-key
    /// comparisons against ASCII literals, and numeric parsing.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.0)
    }

    pub fn as_ascii_str(&self) -> Option<String> {
        if self.0.iter().all(|&c| c < 128) {
            Some(self.0.iter().map(|&c| c as u8 as char).collect())
        } else {
            None
        }
    }
}

impl PartialEq for JsString {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl std::hash::Hash for JsString {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Display for JsString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_string_lossy())
    }
}

impl From<&str> for JsString {
    fn from(s: &str) -> Self {
        JsString::from_str(s)
    }
}

impl From<String> for JsString {
    fn from(s: String) -> Self {
        JsString::from_str(&s)
    }
}

impl From<Rc<str>> for JsString {
    fn from(s: Rc<str>) -> Self {
        JsString::from_str(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_preserves_code_units() {
        let a = JsString::from_str("ab");
        let b = JsString::from_str("cd");
        assert_eq!(a.concat(&b).to_string_lossy(), "abcd");
    }

    #[test]
    fn equality_is_by_content() {
        let a = JsString::from_str("x");
        let b = JsString::from_str("x");
        assert_eq!(a, b);
    }
}
