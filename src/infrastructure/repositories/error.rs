// src/infrastructure/repositories/error.rs
use crate::domain::errors::DomainError;

pub fn map_redis(err: redis::RedisError) -> DomainError {
    DomainError::Persistence(format!("redis: {err}"))
}

pub fn map_pool(err: deadpool_redis::PoolError) -> DomainError {
    DomainError::Persistence(format!("redis pool: {err}"))
}

pub fn map_codec(err: serde_json::Error) -> DomainError {
    DomainError::Persistence(format!("stored record is not valid json: {err}"))
}
