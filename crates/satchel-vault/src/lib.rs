// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key provisioning and encryption for Satchel.
//!
//! Cipher keys are resolved per category through an ordered chain of
//! [`SecretTier`](satchel_core::SecretTier)s (platform keychain, then the
//! plain key-value store) and generated with PBKDF2-HMAC-SHA256 when no tier
//! holds one. Values are encrypted with AES-256-CTR under a fresh random IV
//! per call.

pub mod cipher;
pub mod crypto;
pub mod kdf;
pub mod provider;
pub mod tier;

pub use cipher::Cipher;
pub use provider::SecretProvider;
pub use tier::{FallbackTier, KeyringTier, MemoryTier};
