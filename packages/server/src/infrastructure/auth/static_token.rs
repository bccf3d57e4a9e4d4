//! Static bearer token table used as the TokenValidator collaborator.
//!
//! Entries come from the command line as `TOKEN=USER_ID[:EMAIL][:moderator]`.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{AuthError, Identity, Role, TokenValidator, UserId};

const MODERATOR_FLAG: &str = "moderator";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenEntryError {
    #[error("token entry '{0}' must look like TOKEN=USER_ID[:EMAIL][:moderator]")]
    Malformed(String),
}

#[derive(Debug, Default, Clone)]
pub struct StaticTokenValidator {
    tokens: HashMap<String, Identity>,
}

impl StaticTokenValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.tokens.insert(token.into(), identity);
        self
    }

    /// Parse `TOKEN=USER_ID[:EMAIL][:moderator]` entries
    pub fn from_entries<S: AsRef<str>>(entries: &[S]) -> Result<Self, TokenEntryError> {
        let mut validator = Self::new();
        for entry in entries {
            let entry = entry.as_ref();
            let (token, rest) = entry
                .split_once('=')
                .filter(|(token, _)| !token.is_empty())
                .ok_or_else(|| TokenEntryError::Malformed(entry.to_string()))?;

            let malformed = || TokenEntryError::Malformed(entry.to_string());
            let mut fields: Vec<&str> = rest.split(':').collect();
            let role = if fields.len() > 1 && fields.last() == Some(&MODERATOR_FLAG) {
                fields.pop();
                Role::Moderator
            } else {
                Role::Member
            };
            let (user, email) = match fields.as_slice() {
                [user] => (*user, None),
                [user, email] if !email.is_empty() => (*user, Some(email.to_string())),
                _ => return Err(malformed()),
            };
            let user_id = UserId::new(user.to_string()).map_err(|_| malformed())?;

            validator = validator.with_token(
                token,
                Identity {
                    user_id,
                    email,
                    role,
                },
            );
        }
        Ok(validator)
    }
}

#[async_trait]
impl TokenValidator for StaticTokenValidator {
    async fn validate(&self, token: &str) -> Result<Identity, AuthError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
