// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 derivation of per-category cipher keys.
//!
//! A new key is derived from a random seed (the hex text of 32 random bytes)
//! under a fixed, configured salt. The persisted form of a key is the
//! lowercase hex of the 32-byte derivation output.

use std::num::NonZeroU32;

use ring::pbkdf2;
use satchel_core::SatchelError;
use secrecy::SecretString;
use zeroize::Zeroizing;

use crate::crypto::{KEY_LEN, random_bytes};

/// Derive a 32-byte key from `password` and `salt`.
pub fn derive_key(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<Zeroizing<[u8; KEY_LEN]>, SatchelError> {
    let iterations = NonZeroU32::new(iterations)
        .ok_or_else(|| SatchelError::Crypto("PBKDF2 iteration count must be non-zero".to_string()))?;

    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        password,
        output.as_mut(),
    );
    Ok(output)
}

/// Generate a fresh cipher key: hex-encoded PBKDF2 output over a random seed.
pub fn generate_cipher_key(salt: &str, iterations: u32) -> Result<SecretString, SatchelError> {
    let seed = Zeroizing::new(hex::encode(random_bytes::<32>()?));
    let derived = derive_key(seed.as_bytes(), salt.as_bytes(), iterations)?;
    Ok(SecretString::from(hex::encode(&derived[..])))
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn derive_key_matches_rfc7914_vector() {
        // RFC 7914 section 11, PBKDF2-HMAC-SHA256 with P="passwd", S="salt", c=1.
        let key = derive_key(b"passwd", b"salt", 1).unwrap();
        assert_eq!(
            hex::encode(&key[..]),
            "55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc"
        );
    }

    #[test]
    fn derive_key_depends_on_salt() {
        let a = derive_key(b"seed", b"SATCHEL", 5000).unwrap();
        let b = derive_key(b"seed", b"OTHER", 5000).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn zero_iterations_rejected() {
        assert!(derive_key(b"seed", b"salt", 0).is_err());
    }

    #[test]
    fn generated_keys_are_hex_and_unique() {
        let a = generate_cipher_key("SATCHEL", 5000).unwrap();
        let b = generate_cipher_key("SATCHEL", 5000).unwrap();

        assert_eq!(a.expose_secret().len(), KEY_LEN * 2);
        assert!(a.expose_secret().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a.expose_secret(), b.expose_secret());
    }
}
