// src/domain/client/entity.rs
use crate::domain::client::value_objects::{ClientId, ClientKind, GrantType};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::scope::ScopeSet;
use std::collections::HashSet;
use url::Url;

/// A registered client application. Immutable for the lifetime of a request.
#[derive(Debug, Clone)]
pub struct Client {
    pub id: ClientId,
    pub kind: ClientKind,
    /// PHC-formatted hash of the client secret. Present only for confidential clients.
    pub secret_hash: Option<String>,
    pub redirect_uris: Vec<String>,
    pub allowed_scopes: ScopeSet,
    pub grant_types: HashSet<GrantType>,
}

impl Client {
    pub fn new(
        id: ClientId,
        kind: ClientKind,
        secret_hash: Option<String>,
        redirect_uris: Vec<String>,
        allowed_scopes: ScopeSet,
        grant_types: HashSet<GrantType>,
    ) -> DomainResult<Self> {
        match (kind, secret_hash.as_deref()) {
            (ClientKind::Confidential, None | Some("")) => {
                return Err(DomainError::validation(format!(
                    "confidential client '{id}' requires a secret hash"
                )));
            }
            (ClientKind::Public, Some(_)) => {
                return Err(DomainError::validation(format!(
                    "public client '{id}' must not carry a secret"
                )));
            }
            _ => {}
        }

        for uri in &redirect_uris {
            let parsed = Url::parse(uri).map_err(|err| {
                DomainError::validation(format!("invalid redirect uri '{uri}': {err}"))
            })?;
            if parsed.fragment().is_some() {
                return Err(DomainError::validation(format!(
                    "redirect uri '{uri}' must not contain a fragment"
                )));
            }
        }

        if grant_types.contains(&GrantType::ClientCredentials) && kind == ClientKind::Public {
            return Err(DomainError::validation(format!(
                "public client '{id}' cannot use client_credentials"
            )));
        }

        Ok(Self {
            id,
            kind,
            secret_hash,
            redirect_uris,
            allowed_scopes,
            grant_types,
        })
    }

    pub fn is_confidential(&self) -> bool {
        self.kind == ClientKind::Confidential
    }

    pub fn allows_grant(&self, grant: GrantType) -> bool {
        self.grant_types.contains(&grant)
    }

    /// Exact string comparison; no prefix or partial matching.
    pub fn has_redirect_uri(&self, uri: &str) -> bool {
        self.redirect_uris.iter().any(|registered| registered == uri)
    }

    /// The redirect URI to use when a request omits one: only defined when a
    /// single URI is registered.
    pub fn default_redirect_uri(&self) -> Option<&str> {
        match self.redirect_uris.as_slice() {
            [only] => Some(only.as_str()),
            _ => None,
        }
    }
}
