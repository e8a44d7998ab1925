//! Minimal signature matching standing in for a real rule engine.
//!
//! A `SignatureRule` is a named regex matched against content decoded
//! lossily as text. This covers the common case (textual malware droppers,
//! known webshell snippets) but not binary-only signatures.
//!
//! TODO: replace with the `yara` crate once a vendored libyara build is
//! available in the deployment environment; rule syntax here is
//! intentionally close to YARA's `condition: $a` single-pattern rules so
//! migrating existing rule text later is mostly mechanical.

use regex::Regex;

pub struct SignatureRule {
    pub name: String,
    pattern: Regex,
}

impl SignatureRule {
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
        })
    }
}

/// Returns the names of every rule that matched `text`.
pub fn match_rules(text: &str, rules: &[SignatureRule]) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| rule.pattern.is_match(text))
        .map(|rule| rule.name.clone())
        .collect()
}
