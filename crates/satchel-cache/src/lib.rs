// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted stores built on the Satchel database and cipher.
//!
//! [`SecureKeyValueStorage`] encrypts every value under one category and
//! propagates failures. [`SdkCacheManager`] encrypts per entry on request and
//! absorbs failures into default return values.

pub mod manager;
pub mod secure;

pub use manager::SdkCacheManager;
pub use secure::SecureKeyValueStorage;
