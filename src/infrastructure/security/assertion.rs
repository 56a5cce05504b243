// src/infrastructure/security/assertion.rs
use crate::application::{
    ApplicationResult, error::ApplicationError, ports::collaborators::AssertionVerifier,
};
use crate::domain::grant::OwnerId;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const HMAC_ASSERTION_TYPE: &str = "urn:warden:params:oauth:assertion-type:hmac-sha256";

/// Accepts assertions of the form `<owner_id>.<base64url(HMAC-SHA256(secret, owner_id))>`.
pub struct HmacAssertionVerifier {
    secret: Vec<u8>,
}

impl HmacAssertionVerifier {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    fn mac(&self) -> ApplicationResult<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret)
            .map_err(|err| ApplicationError::infrastructure(format!("hmac key: {err}")))
    }

    /// Mint an assertion for `owner_id`. Used by operators and tests.
    pub fn sign(&self, owner_id: &str) -> ApplicationResult<String> {
        let mut mac = self.mac()?;
        mac.update(owner_id.as_bytes());
        let tag = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{owner_id}.{tag}"))
    }
}

#[async_trait]
impl AssertionVerifier for HmacAssertionVerifier {
    async fn verify_assertion(
        &self,
        assertion_type: &str,
        assertion: &str,
    ) -> ApplicationResult<OwnerId> {
        if assertion_type != HMAC_ASSERTION_TYPE {
            return Err(ApplicationError::invalid_grant(format!(
                "unsupported assertion type '{assertion_type}'"
            )));
        }

        // owner ids may contain dots; the tag never does
        let (owner, tag) = assertion
            .rsplit_once('.')
            .ok_or_else(|| ApplicationError::invalid_grant("malformed assertion"))?;
        let tag = URL_SAFE_NO_PAD
            .decode(tag)
            .map_err(|_| ApplicationError::invalid_grant("malformed assertion"))?;

        let mut mac = self.mac()?;
        mac.update(owner.as_bytes());
        mac.verify_slice(&tag)
            .map_err(|_| ApplicationError::invalid_grant("assertion signature mismatch"))?;

        OwnerId::new(owner).map_err(|_| ApplicationError::invalid_grant("assertion has no subject"))
    }
}

/// Installed when no assertion secret is configured.
#[derive(Default, Clone)]
pub struct RejectingAssertionVerifier;

#[async_trait]
impl AssertionVerifier for RejectingAssertionVerifier {
    async fn verify_assertion(&self, _: &str, _: &str) -> ApplicationResult<OwnerId> {
        Err(ApplicationError::invalid_grant(
            "assertion grants are not configured",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn signed_assertion_yields_its_owner() {
        let verifier = HmacAssertionVerifier::new("s3cret");
        let assertion = verifier.sign("svc.reporting").unwrap();
        let owner = verifier
            .verify_assertion(HMAC_ASSERTION_TYPE, &assertion)
            .await
            .unwrap();
        assert_eq!(owner.as_str(), "svc.reporting");
    }

    #[tokio::test]
    async fn tampered_or_foreign_assertions_are_rejected() {
        let verifier = HmacAssertionVerifier::new("s3cret");
        let other = HmacAssertionVerifier::new("different");
        let forged = other.sign("alice").unwrap();

        for (kind, value) in [
            (HMAC_ASSERTION_TYPE, forged.as_str()),
            (HMAC_ASSERTION_TYPE, "alice"),
            (HMAC_ASSERTION_TYPE, "alice.!!!"),
            ("urn:example:saml", forged.as_str()),
        ] {
            assert!(matches!(
                verifier.verify_assertion(kind, value).await,
                Err(ApplicationError::InvalidGrant(_))
            ));
        }
    }

    #[tokio::test]
    async fn rejecting_verifier_refuses_everything() {
        let result = RejectingAssertionVerifier
            .verify_assertion(HMAC_ASSERTION_TYPE, "a.b")
            .await;
        assert!(matches!(result, Err(ApplicationError::InvalidGrant(_))));
    }
}
