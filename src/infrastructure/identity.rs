//! Static Token Identity Provider
//!
//! Resolves bearer tokens against a fixed token -> user table. Stands in
//! for the real authentication system behind the `IdentityProvider` trait.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::IdentityProvider;
use crate::shared::error::AppError;

/// Identity provider over a static token table.
#[derive(Default)]
pub struct StaticTokenIdentity {
    tokens: HashMap<String, i64>,
}

impl StaticTokenIdentity {
    pub fn new(tokens: HashMap<String, i64>) -> Self {
        Self { tokens }
    }

    /// Build from `token=user_id` pairs, e.g. from configuration.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        Self {
            tokens: pairs
                .into_iter()
                .map(|(token, user)| (token.to_string(), user))
                .collect(),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenIdentity {
    async fn authenticate(&self, token: &str) -> Result<i64, AppError> {
        self.tokens
            .get(token)
            .copied()
            .ok_or_else(|| AppError::Unauthorized("Invalid token".into()))
    }
}
