use super::{ClientCredentialsGrant, GrantProcessor};
use crate::application::{
    dto::TokenGrant,
    error::{ApplicationError, ApplicationResult},
};
use crate::domain::client::GrantType;

impl GrantProcessor {
    /// No resource owner is involved, so no refresh token is issued.
    pub(super) async fn exchange_client_credentials(
        &self,
        grant: ClientCredentialsGrant,
    ) -> ApplicationResult<TokenGrant> {
        let client = self
            .authenticate_client(&grant.client, GrantType::ClientCredentials)
            .await?;

        if !client.is_confidential() {
            return Err(ApplicationError::unauthorized_client(
                "public clients cannot use the client_credentials grant",
            ));
        }

        let scope = self.scopes.validate(&grant.scope, &client.allowed_scopes)?;

        self.issue_tokens(&client, None, scope, grant.scope, false).await
    }
}
