// tests/support/builders.rs
use super::mocks::PlainSecretHasher;
use std::collections::HashSet;
use warden_core::domain::client::{Client, ClientId, ClientKind, GrantType};
use warden_core::domain::scope::ScopeSet;

pub const APP_REDIRECT: &str = "https://app/cb";

pub struct ClientBuilder {
    id: String,
    kind: ClientKind,
    secret: Option<String>,
    redirect_uris: Vec<String>,
    scopes: Vec<String>,
    grants: HashSet<GrantType>,
}

impl ClientBuilder {
    pub fn confidential(id: &str, secret: &str) -> Self {
        Self {
            id: id.into(),
            kind: ClientKind::Confidential,
            secret: Some(secret.into()),
            redirect_uris: Vec::new(),
            scopes: Vec::new(),
            grants: HashSet::new(),
        }
    }

    pub fn public(id: &str) -> Self {
        Self {
            id: id.into(),
            kind: ClientKind::Public,
            secret: None,
            redirect_uris: Vec::new(),
            scopes: Vec::new(),
            grants: HashSet::new(),
        }
    }

    pub fn redirect(mut self, uri: &str) -> Self {
        self.redirect_uris.push(uri.into());
        self
    }

    pub fn scopes(mut self, scopes: &[&str]) -> Self {
        self.scopes = scopes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn grants(mut self, grants: &[GrantType]) -> Self {
        self.grants = grants.iter().copied().collect();
        self
    }

    pub fn build(self) -> Client {
        Client::new(
            ClientId::new(self.id).unwrap(),
            self.kind,
            self.secret.as_deref().map(PlainSecretHasher::hash_of),
            self.redirect_uris,
            self.scopes.into_iter().collect::<ScopeSet>(),
            self.grants,
        )
        .unwrap()
    }
}

/// Registry used by most tests:
/// - `c1`/`s1`: confidential, every grant, `read write`, redirect `https://app/cb`
/// - `c2`/`s2`: confidential, code + refresh, `read`, redirect `https://other/cb`
/// - `spa`: public, code + refresh + password, `read`, redirect `https://spa/cb`
/// - `svc`/`svc-secret`: confidential, client_credentials only, `read`
/// - `multi`: public, code only, two redirect URIs
pub fn standard_clients() -> Vec<Client> {
    vec![
        ClientBuilder::confidential("c1", "s1")
            .redirect(APP_REDIRECT)
            .scopes(&["read", "write"])
            .grants(&GrantType::ALL)
            .build(),
        ClientBuilder::confidential("c2", "s2")
            .redirect("https://other/cb")
            .scopes(&["read"])
            .grants(&[GrantType::AuthorizationCode, GrantType::RefreshToken])
            .build(),
        ClientBuilder::public("spa")
            .redirect("https://spa/cb")
            .scopes(&["read"])
            .grants(&[
                GrantType::AuthorizationCode,
                GrantType::RefreshToken,
                GrantType::Password,
            ])
            .build(),
        ClientBuilder::confidential("svc", "svc-secret")
            .scopes(&["read"])
            .grants(&[GrantType::ClientCredentials])
            .build(),
        ClientBuilder::public("multi")
            .redirect("https://multi/one")
            .redirect("https://multi/two")
            .scopes(&["read"])
            .grants(&[GrantType::AuthorizationCode])
            .build(),
    ]
}
