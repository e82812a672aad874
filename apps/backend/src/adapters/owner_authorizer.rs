use async_trait::async_trait;

use crate::errors::domain::DomainError;
use crate::repos::matches::{MatchAuthorizer, RegisteredMatch};

/// Only the registered owner of a match may score it.
#[derive(Debug, Default, Clone, Copy)]
pub struct OwnerAuthorizer;

#[async_trait]
impl MatchAuthorizer for OwnerAuthorizer {
    async fn can_score(&self, user_sub: &str, registered: &RegisteredMatch) -> Result<bool, DomainError> {
        Ok(registered.owner_sub == user_sub)
    }
}
