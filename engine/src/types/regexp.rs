//! The `RegExp` host bridge: the engine treats a compiled regular
//! expression as an opaque matcher with `test`/`exec` and a mutable
//! `lastIndex`, delegating the actual matching algorithm to the `regex`
//! crate (spec.md §1, §9 "Regex delegation").

use std::cell::Cell;

use regex::Regex;

use super::string::JsString;

#[derive(Debug)]
pub struct RegexpData {
    pub source: JsString,
    pub flags: JsString,
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub matcher: Option<Regex>,
    pub last_index: Cell<usize>,
}

impl Clone for RegexpData {
    fn clone(&self) -> Self {
        RegexpData {
            source: self.source.clone(),
            flags: self.flags.clone(),
            global: self.global,
            ignore_case: self.ignore_case,
            multiline: self.multiline,
            matcher: self.matcher.clone(),
            last_index: Cell::new(self.last_index.get()),
        }
    }
}

impl RegexpData {
    pub fn new(source: JsString, flags: JsString) -> Self {
        let flag_str = flags.to_string_lossy();
        let global = flag_str.contains('g');
        let ignore_case = flag_str.contains('i');
        let multiline = flag_str.contains('m');
        let pattern = translate_pattern(&source.to_string_lossy(), ignore_case, multiline);
        let matcher = Regex::new(&pattern).ok();
        RegexpData {
            source,
            flags,
            global,
            ignore_case,
            multiline,
            matcher,
            last_index: Cell::new(0),
        }
    }
}

/// `regex`'s syntax is a close but imperfect match for JS regex syntax;
/// the inline-flag prefix handles case-insensitivity and multiline mode,
/// which covers the common Test262 harness usages. Patterns outside
/// `regex`'s supported syntax fail to compile and the matcher becomes
/// `None`, which `test`/`exec` treat as "never matches" rather than
/// panicking.
fn translate_pattern(pattern: &str, ignore_case: bool, multiline: bool) -> String {
    let mut flags = String::new();
    if ignore_case {
        flags.push('i');
    }
    if multiline {
        flags.push('m');
    }
    if flags.is_empty() {
        pattern.to_string()
    } else {
        format!("(?{flags}){pattern}")
    }
}
