// src/infrastructure/repositories/redis_store.rs
use super::error::{map_codec, map_pool, map_redis};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::grant::{
    AccessToken, AuthorizationCode, AuthorizationCodeRepository, GrantId, RefreshToken,
    TokenRepository,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_redis::{Config as DeadpoolConfig, Connection, Pool, Runtime};
use serde::{Serialize, de::DeserializeOwned};

const DEFAULT_PREFIX: &str = "warden";

// Deletes every access token listed in the grant's index set, then the set.
const REVOKE_GRANT_SCRIPT: &str = r#"
    local members = redis.call('SMEMBERS', KEYS[1])
    for _, token in ipairs(members) do
        redis.call('DEL', ARGV[1] .. token)
    end
    redis.call('DEL', KEYS[1])
    return #members
"#;

/// Shared connection pool plus key namespace for the Redis-backed stores.
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
    prefix: String,
}

impl RedisStore {
    /// Create a pool from a redis URL (e.g. redis://:password@host:6379/0).
    pub fn from_url(url: &str) -> DomainResult<Self> {
        Self::from_url_with_prefix(url, DEFAULT_PREFIX)
    }

    pub fn from_url_with_prefix(url: &str, prefix: &str) -> DomainResult<Self> {
        let pool = DeadpoolConfig::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|err| DomainError::persistence(format!("redis pool: {err}")))?;
        Ok(Self {
            pool,
            prefix: prefix.to_string(),
        })
    }

    pub async fn ping(&self) -> DomainResult<()> {
        let mut conn = self.conn().await?;
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(map_redis)?;
        Ok(())
    }

    async fn conn(&self) -> DomainResult<Connection> {
        self.pool.get().await.map_err(map_pool)
    }

    fn code_key(&self, code: &str) -> String {
        format!("{}:code:{code}", self.prefix)
    }

    fn access_prefix(&self) -> String {
        format!("{}:access:", self.prefix)
    }

    fn access_key(&self, token: &str) -> String {
        format!("{}{token}", self.access_prefix())
    }

    fn refresh_key(&self, token: &str) -> String {
        format!("{}:refresh:{token}", self.prefix)
    }

    fn grant_key(&self, grant_id: &GrantId) -> String {
        format!("{}:grant:{grant_id}:access", self.prefix)
    }

    async fn put<T: Serialize>(&self, key: &str, value: &T, ttl: Option<i64>) -> DomainResult<()> {
        let payload = serde_json::to_string(value).map_err(map_codec)?;
        let mut conn = self.conn().await?;
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(payload);
        if let Some(secs) = ttl {
            cmd.arg("EX").arg(secs);
        }
        let _: () = cmd.query_async(&mut conn).await.map_err(map_redis)?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, key: &str) -> DomainResult<Option<T>> {
        let mut conn = self.conn().await?;
        let raw: Option<String> = redis::cmd("GET")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(map_redis)?;
        decode(raw)
    }

    // GETDEL is atomic on the server; two callers never both see the value.
    async fn take<T: DeserializeOwned>(&self, key: &str) -> DomainResult<Option<T>> {
        let mut conn = self.conn().await?;
        let raw: Option<String> = redis::cmd("GETDEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(map_redis)?;
        decode(raw)
    }

    async fn delete(&self, key: &str) -> DomainResult<bool> {
        let mut conn = self.conn().await?;
        let removed: i64 = redis::cmd("DEL")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(map_redis)?;
        Ok(removed > 0)
    }
}

fn decode<T: DeserializeOwned>(raw: Option<String>) -> DomainResult<Option<T>> {
    raw.map(|value| serde_json::from_str(&value).map_err(map_codec))
        .transpose()
}

// Lifetime measured on the application clock, so a skewed server clock
// cannot shorten it. Never below one second: EX 0 is rejected.
fn ttl_secs(created_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> i64 {
    expires_at
        .signed_duration_since(created_at)
        .num_seconds()
        .max(1)
}

#[derive(Clone)]
pub struct RedisAuthorizationCodeRepository {
    store: RedisStore,
}

impl RedisAuthorizationCodeRepository {
    pub fn new(store: RedisStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthorizationCodeRepository for RedisAuthorizationCodeRepository {
    async fn insert(&self, code: AuthorizationCode) -> DomainResult<()> {
        let key = self.store.code_key(&code.code);
        let ttl = ttl_secs(code.created_at, code.expires_at);
        self.store.put(&key, &code, Some(ttl)).await
    }

    async fn take(&self, code: &str) -> DomainResult<Option<AuthorizationCode>> {
        self.store.take(&self.store.code_key(code)).await
    }
}

/// Access and refresh tokens keyed by value. Revocation deletes the key; a
/// per-grant set indexes access tokens for cascade revocation.
#[derive(Clone)]
pub struct RedisTokenRepository {
    store: RedisStore,
}

impl RedisTokenRepository {
    pub fn new(store: RedisStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TokenRepository for RedisTokenRepository {
    async fn insert_access(&self, token: AccessToken) -> DomainResult<()> {
        let ttl = ttl_secs(token.created_at, token.expires_at);
        let key = self.store.access_key(&token.token);
        self.store.put(&key, &token, Some(ttl)).await?;

        let grant_key = self.store.grant_key(&token.grant_id);
        let mut conn = self.store.conn().await?;
        let _: () = redis::pipe()
            .atomic()
            .cmd("SADD")
            .arg(&grant_key)
            .arg(&token.token)
            .ignore()
            .cmd("EXPIRE")
            .arg(&grant_key)
            .arg(ttl)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(map_redis)?;
        Ok(())
    }

    async fn find_access(&self, token: &str) -> DomainResult<Option<AccessToken>> {
        self.store.get(&self.store.access_key(token)).await
    }

    async fn insert_refresh(&self, token: RefreshToken) -> DomainResult<()> {
        let ttl = token
            .expires_at
            .map(|expires_at| ttl_secs(token.created_at, expires_at));
        let key = self.store.refresh_key(&token.token);
        self.store.put(&key, &token, ttl).await
    }

    async fn find_refresh(&self, token: &str) -> DomainResult<Option<RefreshToken>> {
        self.store.get(&self.store.refresh_key(token)).await
    }

    async fn take_refresh(&self, token: &str) -> DomainResult<Option<RefreshToken>> {
        self.store.take(&self.store.refresh_key(token)).await
    }

    async fn revoke_access(&self, token: &str) -> DomainResult<bool> {
        self.store.delete(&self.store.access_key(token)).await
    }

    async fn revoke_refresh(&self, token: &str) -> DomainResult<bool> {
        self.store.delete(&self.store.refresh_key(token)).await
    }

    async fn revoke_grant_access(&self, grant_id: &GrantId) -> DomainResult<()> {
        let mut conn = self.store.conn().await?;
        let revoked: i64 = redis::cmd("EVAL")
            .arg(REVOKE_GRANT_SCRIPT)
            .arg(1)
            .arg(self.store.grant_key(grant_id))
            .arg(self.store.access_prefix())
            .query_async(&mut conn)
            .await
            .map_err(map_redis)?;
        tracing::debug!(%grant_id, revoked, "revoked access tokens for grant");
        Ok(())
    }
}
