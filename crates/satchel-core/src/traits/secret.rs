// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret tier trait for the key provisioning chain.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::SatchelError;

/// One store in the ordered chain consulted for per-category cipher keys.
///
/// `load` returns `Ok(None)` when the tier is reachable but holds no secret
/// for the category, and `Err` when the tier itself cannot be used. The
/// provider treats those two outcomes differently.
#[async_trait]
pub trait SecretTier: Send + Sync + 'static {
    /// Short name used in logs and errors (e.g. `keyring`, `fallback`).
    fn name(&self) -> &str;

    /// Reads the secret stored for `category`.
    async fn load(&self, category: &str) -> Result<Option<SecretString>, SatchelError>;

    /// Writes (or overwrites) the secret for `category`.
    async fn store(&self, category: &str, secret: &SecretString) -> Result<(), SatchelError>;
}
