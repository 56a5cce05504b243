use super::{GrantProcessor, RefreshTokenGrant};
use crate::application::{
    dto::TokenGrant,
    error::{ApplicationError, ApplicationResult},
};
use crate::domain::client::GrantType;

impl GrantProcessor {
    pub(super) async fn exchange_refresh_token(
        &self,
        grant: RefreshTokenGrant,
    ) -> ApplicationResult<TokenGrant> {
        let client = self
            .authenticate_client(&grant.client, GrantType::RefreshToken)
            .await?;

        let rotate = self.policy.rotate_refresh_tokens;
        let stored = if rotate {
            self.tokens.consume_refresh_token(&grant.refresh_token).await?
        } else {
            self.tokens.lookup_refresh_token(&grant.refresh_token).await?
        };

        if stored.client_id != client.id {
            return Err(ApplicationError::invalid_grant(
                "refresh token was issued to another client",
            ));
        }

        // The refresh token's own scope bounds what may be asked for.
        let scope = self.scopes.validate(&grant.scope, &stored.scope)?;

        let refresh_token = if rotate {
            self.tokens
                .issue_refresh_token(&client, &stored.owner_id, &stored.scope, stored.grant_id)
                .await?
        } else {
            stored.clone()
        };

        let access_token = self
            .tokens
            .issue_access_token(
                &client,
                Some(&stored.owner_id),
                &scope,
                stored.grant_id,
                Some(&refresh_token),
            )
            .await?;

        Ok(TokenGrant {
            access_token,
            refresh_token: Some(refresh_token),
            scope,
            requested_scope: grant.scope,
        })
    }
}
