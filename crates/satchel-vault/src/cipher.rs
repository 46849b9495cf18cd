// SPDX-FileCopyrightText: 2026 Satchel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Category-keyed encryption of UTF-8 text.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use satchel_core::{CipherText, SatchelError};
use secrecy::ExposeSecret;
use zeroize::Zeroizing;

use crate::crypto::{self, IV_LEN, KEY_LEN};
use crate::provider::SecretProvider;

/// Encrypts and decrypts text with the key [`SecretProvider`] holds for a category.
#[derive(Clone)]
pub struct Cipher {
    provider: Arc<SecretProvider>,
}

impl Cipher {
    pub fn new(provider: Arc<SecretProvider>) -> Self {
        Self { provider }
    }

    /// Encrypt `plaintext` under a fresh random IV.
    pub async fn encrypt(&self, plaintext: &str, category: &str) -> Result<CipherText, SatchelError> {
        let key = self.key_bytes(category).await?;
        let iv = crypto::generate_iv()?;

        let mut data = plaintext.as_bytes().to_vec();
        crypto::apply_keystream(&key, &iv, &mut data)?;
        Ok(CipherText {
            value: STANDARD.encode(&data),
            iv: hex::encode(iv),
        })
    }

    /// Reverse [`Cipher::encrypt`].
    ///
    /// A wrong key is not detected reliably: it fails only if the output is
    /// not valid UTF-8.
    pub async fn decrypt(&self, cipher_text: &CipherText, category: &str) -> Result<String, SatchelError> {
        let iv = hex::decode(&cipher_text.iv)
            .map_err(|e| SatchelError::Crypto(format!("malformed IV: {e}")))?;
        if iv.len() != IV_LEN {
            return Err(SatchelError::Crypto(format!(
                "IV must be {IV_LEN} bytes, got {}",
                iv.len()
            )));
        }
        let mut data = STANDARD
            .decode(&cipher_text.value)
            .map_err(|e| SatchelError::Crypto(format!("malformed ciphertext: {e}")))?;

        let key = self.key_bytes(category).await?;
        crypto::apply_keystream(&key, &iv, &mut data)?;
        String::from_utf8(data)
            .map_err(|_| SatchelError::Crypto("decrypted value is not valid UTF-8".to_string()))
    }

    /// Encrypt into the serialized JSON envelope stored in the database.
    pub async fn seal(&self, plaintext: &str, category: &str) -> Result<String, SatchelError> {
        self.encrypt(plaintext, category).await?.to_json()
    }

    /// Decrypt a serialized JSON envelope.
    pub async fn open(&self, envelope: &str, category: &str) -> Result<String, SatchelError> {
        let cipher_text = CipherText::from_json(envelope)?;
        self.decrypt(&cipher_text, category).await
    }

    async fn key_bytes(&self, category: &str) -> Result<Zeroizing<Vec<u8>>, SatchelError> {
        let secret = self.provider.get_key(category).await?;
        let key = Zeroizing::new(hex::decode(secret.expose_secret()).map_err(|_| {
            SatchelError::Crypto(format!("cipher key for category `{category}` is not hex"))
        })?);
        if key.len() != KEY_LEN {
            return Err(SatchelError::Crypto(format!(
                "cipher key for category `{category}` must be {KEY_LEN} bytes, got {}",
                key.len()
            )));
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use satchel_config::model::MIN_KDF_ITERATIONS;
    use satchel_core::SecretTier;

    use super::*;
    use crate::tier::MemoryTier;

    fn cipher() -> Cipher {
        let tiers: Vec<Arc<dyn SecretTier>> = vec![Arc::new(MemoryTier::new()) as Arc<dyn SecretTier>];
        let provider = SecretProvider::new(tiers, "SATCHEL", MIN_KDF_ITERATIONS).unwrap();
        Cipher::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn round_trips_unicode_text() {
        let cipher = cipher();
        let long = "long ".repeat(500);
        for text in ["", "hello", "Grüße, 世界 🚀", long.as_str()] {
            let ct = cipher.encrypt(text, "GENERAL").await.unwrap();
            assert_eq!(cipher.decrypt(&ct, "GENERAL").await.unwrap(), text);
        }
    }

    #[tokio::test]
    async fn same_plaintext_encrypts_differently() {
        let cipher = cipher();
        let a = cipher.encrypt("same", "GENERAL").await.unwrap();
        let b = cipher.encrypt("same", "GENERAL").await.unwrap();
        assert_ne!(a.iv, b.iv);
        assert_ne!(a.value, b.value);
        assert_eq!(a.iv.len(), IV_LEN * 2);
    }

    #[tokio::test]
    async fn other_category_does_not_recover_plaintext() {
        let cipher = cipher();
        let ct = cipher.encrypt("secret value", "GENERAL").await.unwrap();
        match cipher.decrypt(&ct, "gsSDKCache").await {
            Ok(text) => assert_ne!(text, "secret value"),
            Err(e) => assert!(matches!(e, SatchelError::Crypto(_))),
        }
    }

    #[tokio::test]
    async fn malformed_inputs_are_crypto_errors() {
        let cipher = cipher();
        let bad_iv = CipherText {
            value: "AAAA".into(),
            iv: "zz".into(),
        };
        let short_iv = CipherText {
            value: "AAAA".into(),
            iv: "00ff".into(),
        };
        let bad_b64 = CipherText {
            value: "***".into(),
            iv: "00".repeat(IV_LEN),
        };
        for ct in [bad_iv, short_iv, bad_b64] {
            assert!(matches!(
                cipher.decrypt(&ct, "GENERAL").await,
                Err(SatchelError::Crypto(_))
            ));
        }
    }

    #[tokio::test]
    async fn seal_produces_the_stored_envelope() {
        let cipher = cipher();
        let envelope = cipher.seal("token", "GENERAL").await.unwrap();
        assert!(envelope.starts_with(r#"{"value":"#));
        assert_eq!(cipher.open(&envelope, "GENERAL").await.unwrap(), "token");
        assert!(matches!(
            cipher.open("not json", "GENERAL").await,
            Err(SatchelError::Codec(_))
        ));
    }
}
