use super::{AuthorizationCodeGrant, GrantProcessor, refresh_allowed};
use crate::application::{
    dto::TokenGrant,
    error::{ApplicationError, ApplicationResult},
};
use crate::domain::{client::GrantType, scope::ScopeSet};

impl GrantProcessor {
    pub(super) async fn exchange_authorization_code(
        &self,
        grant: AuthorizationCodeGrant,
    ) -> ApplicationResult<TokenGrant> {
        let client = self
            .authenticate_client(&grant.client, GrantType::AuthorizationCode)
            .await?;

        // Consumed before any further check: a failed exchange still burns the code.
        let code = self.codes.consume(&grant.code).await?;

        if code.client_id != client.id {
            return Err(ApplicationError::client_mismatch(
                "authorization code was issued to another client",
            ));
        }

        if code.redirect_uri != grant.redirect_uri {
            return Err(ApplicationError::redirect_mismatch(
                "redirect_uri does not match the authorization request",
            ));
        }

        self.issue_tokens(
            &client,
            Some(&code.owner_id),
            code.scope,
            ScopeSet::empty(),
            refresh_allowed(&client),
        )
        .await
    }
}
