//! Coarse reading of conditional-flow guard expressions.
//!
//! Guards are free-form; this only recognises the two shapes routing rules care about:
//! `request.verb == "POST"` (or a parenthesised list) and
//! `proxy.pathsuffix MatchesPath "/validate"`. Nothing here evaluates a guard.

use crate::rules::FlowMatch;
use regex::Regex;
use std::sync::LazyLock;

static VERB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)request\.verb\s*(?:==|=~|equals|eq|in)\s*(?:"([a-z]+)"|\(([^)]+)\))"#)
        .expect("verb pattern is a valid regex")
});

static PATH_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)proxy\.pathsuffix\s*(?:MatchesPath|==|=~|equals|eq)\s*"([^"]+)""#)
        .expect("path suffix pattern is a valid regex")
});

/// Methods (upper-cased) and path suffixes mentioned by a guard, in order of appearance.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuardHints {
    pub methods: Vec<String>,
    pub path_suffixes: Vec<String>,
}

impl GuardHints {
    pub fn infer(expr: &str) -> Self {
        let mut hints = GuardHints::default();

        for caps in VERB.captures_iter(expr) {
            if let Some(single) = caps.get(1) {
                hints.methods.push(single.as_str().to_ascii_uppercase());
            } else if let Some(list) = caps.get(2) {
                hints.methods.extend(
                    list.as_str()
                        .split([',', ' '])
                        .map(|s| s.trim().trim_matches(['"', '\'']))
                        .filter(|s| !s.is_empty())
                        .map(str::to_ascii_uppercase),
                );
            }
        }

        for caps in PATH_SUFFIX.captures_iter(expr) {
            if let Some(path) = caps.get(1) {
                hints.path_suffixes.push(path.as_str().to_string());
            }
        }

        hints
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && self.path_suffixes.is_empty()
    }
}

impl FlowMatch {
    /// Every requested method and path suffix must be implied by the guard.
    ///
    /// A guard that mentions no methods cannot satisfy a method constraint (and likewise
    /// for path suffixes).
    pub fn accepts(&self, hints: &GuardHints) -> bool {
        let methods_ok = self.methods.iter().all(|m| {
            hints
                .methods
                .iter()
                .any(|h| h.eq_ignore_ascii_case(m.trim()))
        });
        let paths_ok = self
            .path_suffixes
            .iter()
            .all(|p| hints.path_suffixes.iter().any(|h| h == p));
        methods_ok && paths_ok
    }
}
