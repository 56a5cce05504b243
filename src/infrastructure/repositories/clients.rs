// src/infrastructure/repositories/clients.rs
use crate::domain::client::{Client, ClientId, ClientKind, ClientRepository, GrantType};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::scope::ScopeSet;
use async_trait::async_trait;
use serde::Deserialize;
use std::{collections::HashMap, path::Path};

/// A client as it appears in the registrations file.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientRegistration {
    pub client_id: String,
    #[serde(default)]
    pub kind: ClientKind,
    /// PHC string; required for confidential clients.
    #[serde(default)]
    pub secret_hash: Option<String>,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    pub grant_types: Vec<GrantType>,
}

impl TryFrom<ClientRegistration> for Client {
    type Error = DomainError;

    fn try_from(reg: ClientRegistration) -> DomainResult<Self> {
        let scope_line = reg.scopes.join(" ");
        Client::new(
            ClientId::new(reg.client_id)?,
            reg.kind,
            reg.secret_hash,
            reg.redirect_uris,
            ScopeSet::parse(&scope_line)?,
            reg.grant_types.into_iter().collect(),
        )
    }
}

/// Read-only client registry held in memory. Registration is out of band.
#[derive(Debug, Default)]
pub struct InMemoryClientRepository {
    clients: HashMap<ClientId, Client>,
}

impl InMemoryClientRepository {
    pub fn new(clients: impl IntoIterator<Item = Client>) -> DomainResult<Self> {
        let mut map = HashMap::new();
        for client in clients {
            let id = client.id.clone();
            if map.insert(id.clone(), client).is_some() {
                return Err(DomainError::validation(format!(
                    "client '{id}' is registered twice"
                )));
            }
        }
        Ok(Self { clients: map })
    }

    pub fn from_registrations(
        registrations: impl IntoIterator<Item = ClientRegistration>,
    ) -> DomainResult<Self> {
        let clients = registrations
            .into_iter()
            .map(Client::try_from)
            .collect::<DomainResult<Vec<_>>>()?;
        Self::new(clients)
    }

    pub fn from_file(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| {
            DomainError::persistence(format!("reading {}: {err}", path.display()))
        })?;
        let registrations: Vec<ClientRegistration> = serde_json::from_str(&raw)
            .map_err(|err| DomainError::validation(format!("parsing {}: {err}", path.display())))?;
        Self::from_registrations(registrations)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn find_by_id(&self, id: &ClientId) -> DomainResult<Option<Client>> {
        Ok(self.clients.get(id).cloned())
    }
}
