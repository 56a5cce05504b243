use super::{GrantProcessor, PasswordGrant, refresh_allowed};
use crate::application::{dto::TokenGrant, error::ApplicationResult};
use crate::domain::client::GrantType;

impl GrantProcessor {
    pub(super) async fn exchange_password(&self, grant: PasswordGrant) -> ApplicationResult<TokenGrant> {
        let client = self
            .authenticate_client(&grant.client, GrantType::Password)
            .await?;

        let owner = self
            .call_collaborator(
                "resource owner authentication",
                self.authenticator.authenticate(&grant.username, &grant.password),
            )
            .await?;

        let scope = self.scopes.validate(&grant.scope, &client.allowed_scopes)?;

        self.issue_tokens(&client, Some(&owner), scope, grant.scope, refresh_allowed(&client))
            .await
    }
}
