use super::{AssertionGrant, GrantProcessor};
use crate::application::{dto::TokenGrant, error::ApplicationResult};
use crate::domain::client::GrantType;

impl GrantProcessor {
    pub(super) async fn exchange_assertion(&self, grant: AssertionGrant) -> ApplicationResult<TokenGrant> {
        let client = self
            .authenticate_client(&grant.client, GrantType::Assertion)
            .await?;

        let owner = self
            .call_collaborator(
                "assertion verification",
                self.assertions
                    .verify_assertion(&grant.assertion_type, &grant.assertion),
            )
            .await?;

        let scope = self.scopes.validate(&grant.scope, &client.allowed_scopes)?;

        self.issue_tokens(&client, Some(&owner), scope, grant.scope, false)
            .await
    }
}
