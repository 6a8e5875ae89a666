use std::collections::HashSet;

const SEPARATORS: &[char] = &['/', '\\', ',', ' ', ':'];

/// Runtime sign selection. Columns and rows carry sign cells such as
/// `client/server`; an entity is exported when one of its tokens is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignFilter {
    tokens: Option<HashSet<String>>,
}

impl SignFilter {
    /// Filter that accepts everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(selection: &str) -> Self {
        Self {
            tokens: Some(split(selection).map(str::to_string).collect()),
        }
    }

    pub fn from_option(selection: Option<&str>) -> Self {
        selection.map(Self::new).unwrap_or_default()
    }

    /// Empty signs always match.
    pub fn matches(&self, sign: &str) -> bool {
        let Some(tokens) = &self.tokens else {
            return true;
        };
        if sign.trim().is_empty() {
            return true;
        }
        split(sign).any(|t| tokens.contains(t))
    }
}

fn split(s: &str) -> impl Iterator<Item = &str> {
    s.split(SEPARATORS).filter(|t| !t.is_empty())
}
