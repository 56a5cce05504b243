// src/infrastructure/repositories/memory.rs
use crate::application::ports::ClockPort;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::grant::{
    AccessToken, AuthorizationCode, AuthorizationCodeRepository, GrantId, RefreshToken,
    TokenRepository,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> DomainResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| DomainError::persistence("in-memory store lock poisoned"))
}

/// Single-process code store. `take` removes under the lock, so a code can
/// be redeemed at most once. Every insert first drops codes that have expired.
pub struct InMemoryAuthorizationCodeRepository {
    codes: Mutex<HashMap<String, AuthorizationCode>>,
    clock: Arc<ClockPort>,
}

impl InMemoryAuthorizationCodeRepository {
    pub fn new(clock: Arc<ClockPort>) -> Self {
        Self {
            codes: Mutex::new(HashMap::new()),
            clock,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.codes.lock().map(|guard| guard.len()).unwrap_or_default()
    }
}

#[async_trait]
impl AuthorizationCodeRepository for InMemoryAuthorizationCodeRepository {
    async fn insert(&self, code: AuthorizationCode) -> DomainResult<()> {
        let now = self.clock.now();
        let mut guard = lock(&self.codes)?;
        guard.retain(|_, entry| !entry.is_expired(now));
        guard.insert(code.code.clone(), code);
        Ok(())
    }

    async fn take(&self, code: &str) -> DomainResult<Option<AuthorizationCode>> {
        let mut guard = lock(&self.codes)?;
        Ok(guard.remove(code))
    }
}

/// Single-process token store. Inserts sweep the map they write to: expired
/// and revoked entries are dropped, since neither can validate again.
pub struct InMemoryTokenRepository {
    access: Mutex<HashMap<String, AccessToken>>,
    refresh: Mutex<HashMap<String, RefreshToken>>,
    clock: Arc<ClockPort>,
}

impl InMemoryTokenRepository {
    pub fn new(clock: Arc<ClockPort>) -> Self {
        Self {
            access: Mutex::new(HashMap::new()),
            refresh: Mutex::new(HashMap::new()),
            clock,
        }
    }

    #[cfg(test)]
    fn sizes(&self) -> (usize, usize) {
        let access = self.access.lock().map(|guard| guard.len()).unwrap_or_default();
        let refresh = self.refresh.lock().map(|guard| guard.len()).unwrap_or_default();
        (access, refresh)
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn insert_access(&self, token: AccessToken) -> DomainResult<()> {
        let now = self.clock.now();
        let mut guard = lock(&self.access)?;
        guard.retain(|_, entry| entry.is_active(now));
        guard.insert(token.token.clone(), token);
        Ok(())
    }

    async fn find_access(&self, token: &str) -> DomainResult<Option<AccessToken>> {
        let guard = lock(&self.access)?;
        Ok(guard.get(token).cloned())
    }

    async fn insert_refresh(&self, token: RefreshToken) -> DomainResult<()> {
        let now = self.clock.now();
        let mut guard = lock(&self.refresh)?;
        guard.retain(|_, entry| entry.is_active(now));
        guard.insert(token.token.clone(), token);
        Ok(())
    }

    async fn find_refresh(&self, token: &str) -> DomainResult<Option<RefreshToken>> {
        let guard = lock(&self.refresh)?;
        Ok(guard.get(token).cloned())
    }

    async fn take_refresh(&self, token: &str) -> DomainResult<Option<RefreshToken>> {
        let mut guard = lock(&self.refresh)?;
        Ok(guard.remove(token))
    }

    async fn revoke_access(&self, token: &str) -> DomainResult<bool> {
        let mut guard = lock(&self.access)?;
        Ok(match guard.get_mut(token) {
            Some(entry) => {
                entry.revoked = true;
                true
            }
            None => false,
        })
    }

    async fn revoke_refresh(&self, token: &str) -> DomainResult<bool> {
        let mut guard = lock(&self.refresh)?;
        Ok(match guard.get_mut(token) {
            Some(entry) => {
                entry.revoked = true;
                true
            }
            None => false,
        })
    }

    async fn revoke_grant_access(&self, grant_id: &GrantId) -> DomainResult<()> {
        let mut guard = lock(&self.access)?;
        guard
            .values_mut()
            .filter(|entry| entry.grant_id == *grant_id)
            .for_each(|entry| entry.revoked = true);
        Ok(())
    }
}
