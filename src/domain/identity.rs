//! Authenticated identity provider trait.
//!
//! Sessions must be owned by the authenticated user of the channel that
//! created them, never by a client-supplied user ID. This trait is the seam
//! to whatever authentication system fronts the broker; the broker only
//! needs token -> user ID resolution.

use async_trait::async_trait;

use crate::shared::error::AppError;

/// Resolves a bearer token to an authenticated user ID.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve the token, or fail with `AppError::Unauthorized`.
    async fn authenticate(&self, token: &str) -> Result<i64, AppError>;
}
