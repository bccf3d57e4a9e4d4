//! Bearer token validation collaborator.

use async_trait::async_trait;

use super::{AuthError, Identity};

#[async_trait]
pub trait TokenValidator: Send + Sync {
    /// Resolve a bearer token to the identity it was issued for
    async fn validate(&self, token: &str) -> Result<Identity, AuthError>;
}
