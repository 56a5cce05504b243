// tests/support/mocks/mod.rs
//! テストサポートモック再エクスポートモジュール
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod collaborators;
pub mod security;
pub mod time;

pub use collaborators::{
    SlowOwnerAuthenticator, StaticAssertionVerifier, StaticOwnerAuthenticator,
    TEST_ASSERTION_TYPE,
};
pub use security::{PlainSecretHasher, SequentialTokenGenerator};
pub use time::{ManualClock, fixed_now};
