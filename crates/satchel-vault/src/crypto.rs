// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-CTR operations and system randomness.
//!
//! CTR mode uses a 128-bit big-endian counter initialized from the IV. It is
//! a keystream XOR: encrypting and decrypting are the same operation, and
//! nothing detects tampering. Every encryption must use a fresh IV from
//! [`generate_iv`]; reusing an IV under the same key leaks the XOR of the
//! two plaintexts.

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use ring::rand::{SecureRandom, SystemRandom};
use satchel_core::SatchelError;

type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// IV (initial counter block) length in bytes.
pub const IV_LEN: usize = 16;

/// XOR the AES-256-CTR keystream for `(key, iv)` into `data` in place.
pub fn apply_keystream(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<(), SatchelError> {
    let mut cipher = Aes256Ctr::new_from_slices(key, iv).map_err(|_| {
        SatchelError::Crypto(format!(
            "invalid AES-256-CTR parameters: key is {} bytes (want {KEY_LEN}), iv is {} bytes (want {IV_LEN})",
            key.len(),
            iv.len()
        ))
    })?;
    cipher.apply_keystream(data);
    Ok(())
}

/// Fill an `N`-byte array from the system CSPRNG.
pub fn random_bytes<const N: usize>() -> Result<[u8; N], SatchelError> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; N];
    rng.fill(&mut bytes)
        .map_err(|_| SatchelError::Crypto("system random number generator failed".to_string()))?;
    Ok(bytes)
}

/// Generate a random 16-byte IV.
pub fn generate_iv() -> Result<[u8; IV_LEN], SatchelError> {
    random_bytes::<IV_LEN>()
}
