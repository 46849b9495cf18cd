// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Satchel integration tests.
//!
//! [`TestHarness`] assembles the full store stack over a temporary SQLite
//! file, with an in-memory keychain that can be made unavailable.

pub mod harness;

pub use harness::{TestHarness, TestHarnessBuilder};
