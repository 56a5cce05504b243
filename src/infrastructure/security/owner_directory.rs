// src/infrastructure/security/owner_directory.rs
use crate::application::{
    ApplicationResult, error::ApplicationError, ports::SecretHasherPort,
    ports::collaborators::ResourceOwnerAuthenticator,
};
use crate::domain::grant::OwnerId;
use async_trait::async_trait;
use serde::Deserialize;
use std::{collections::HashMap, path::Path, sync::Arc};

/// One resource owner as listed in the owners file.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceOwnerRecord {
    pub id: String,
    pub username: String,
    /// PHC string produced by `warden_core hash-secret`.
    pub password_hash: String,
}

/// Username/password directory loaded once at startup.
pub struct StaticResourceOwnerDirectory {
    owners: HashMap<String, (OwnerId, String)>,
    hasher: Arc<SecretHasherPort>,
}

impl StaticResourceOwnerDirectory {
    pub fn new(
        records: Vec<ResourceOwnerRecord>,
        hasher: Arc<SecretHasherPort>,
    ) -> ApplicationResult<Self> {
        let mut owners = HashMap::with_capacity(records.len());
        for record in records {
            let owner_id = OwnerId::new(record.id)?;
            if owners
                .insert(record.username.clone(), (owner_id, record.password_hash))
                .is_some()
            {
                return Err(ApplicationError::invalid_request(format!(
                    "duplicate resource owner username '{}'",
                    record.username
                )));
            }
        }
        Ok(Self { owners, hasher })
    }

    /// A directory that knows nobody. Every login is refused.
    pub fn empty(hasher: Arc<SecretHasherPort>) -> Self {
        Self {
            owners: HashMap::new(),
            hasher,
        }
    }

    pub fn from_file(
        path: impl AsRef<Path>,
        hasher: Arc<SecretHasherPort>,
    ) -> ApplicationResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| {
            ApplicationError::infrastructure(format!("reading {}: {err}", path.display()))
        })?;
        let records: Vec<ResourceOwnerRecord> = serde_json::from_str(&raw).map_err(|err| {
            ApplicationError::infrastructure(format!("parsing {}: {err}", path.display()))
        })?;
        Self::new(records, hasher)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

#[async_trait]
impl ResourceOwnerAuthenticator for StaticResourceOwnerDirectory {
    async fn authenticate(&self, username: &str, password: &str) -> ApplicationResult<OwnerId> {
        let Some((owner_id, hash)) = self.owners.get(username) else {
            return Err(ApplicationError::access_denied("invalid resource owner credentials"));
        };

        if self.hasher.verify(password, hash).await? {
            Ok(owner_id.clone())
        } else {
            Err(ApplicationError::access_denied("invalid resource owner credentials"))
        }
    }
}
