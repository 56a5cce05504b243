// src/domain/scope.rs
use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt};

/// A set of scope tokens. Rendered space-delimited in canonical (sorted) order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeSet(BTreeSet<String>);

impl ScopeSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a space-delimited scope parameter. Duplicate entries collapse.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let mut scopes = BTreeSet::new();
        for token in raw.split_whitespace() {
            if !token.chars().all(is_scope_char) {
                return Err(DomainError::validation(format!(
                    "scope '{token}' contains invalid characters"
                )));
            }
            scopes.insert(token.to_string());
        }
        Ok(Self(scopes))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, scope: &str) -> bool {
        self.0.contains(scope)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_subset(&self, other: &ScopeSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// First entry of `self` that is not a member of `allowed`.
    pub fn first_outside(&self, allowed: &ScopeSet) -> Option<&str> {
        self.iter().find(|scope| !allowed.contains(scope))
    }
}

// scope-token = 1*( %x21 / %x23-5B / %x5D-7E )
fn is_scope_char(c: char) -> bool {
    matches!(c, '\u{21}' | '\u{23}'..='\u{5B}' | '\u{5D}'..='\u{7E}')
}

impl<S: Into<String>> FromIterator<S> for ScopeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for ScopeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for scope in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(scope)?;
            first = false;
        }
        Ok(())
    }
}
