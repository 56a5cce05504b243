// src/application/scope.rs
use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::scope::ScopeSet;

/// Checks requested scope against an allowed set and never widens it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScopeValidator;

impl ScopeValidator {
    /// An empty request is granted `allowed` in full; otherwise every
    /// requested entry must be a member of `allowed`.
    pub fn validate(&self, requested: &ScopeSet, allowed: &ScopeSet) -> ApplicationResult<ScopeSet> {
        if requested.is_empty() {
            return Ok(allowed.clone());
        }

        if let Some(unknown) = requested.first_outside(allowed) {
            return Err(ApplicationError::invalid_scope(format!(
                "scope '{unknown}' is not allowed"
            )));
        }

        Ok(requested.clone())
    }

    pub fn parse(&self, raw: Option<&str>) -> ApplicationResult<ScopeSet> {
        match raw {
            None => Ok(ScopeSet::empty()),
            Some(raw) => {
                ScopeSet::parse(raw).map_err(|err| ApplicationError::invalid_scope(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scopes(items: &[&str]) -> ScopeSet {
        items.iter().copied().collect()
    }

    #[test]
    fn empty_request_grants_everything_allowed() {
        let granted = ScopeValidator
            .validate(&ScopeSet::empty(), &scopes(&["read", "write"]))
            .unwrap();
        assert_eq!(granted, scopes(&["read", "write"]));
    }

    #[test]
    fn subset_request_is_granted_as_is() {
        let granted = ScopeValidator
            .validate(&scopes(&["read"]), &scopes(&["read", "write"]))
            .unwrap();
        assert_eq!(granted, scopes(&["read"]));
    }

    #[test]
    fn unknown_scope_names_the_entry() {
        let err = ScopeValidator
            .validate(&scopes(&["read", "delete"]), &scopes(&["read", "write"]))
            .unwrap_err();
        match err {
            ApplicationError::InvalidScope(msg) => assert!(msg.contains("delete")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nothing_allowed_rejects_any_request() {
        assert!(ScopeValidator.validate(&scopes(&["read"]), &ScopeSet::empty()).is_err());
    }

    #[test]
    fn malformed_scope_parameter_is_invalid_scope() {
        let err = ScopeValidator.parse(Some("read \"x\"")).unwrap_err();
        assert_eq!(err.oauth_code(), "invalid_scope");
    }
}
