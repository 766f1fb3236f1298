//! AES-256-GCM encryption of stored datasource passwords.
//!
//! Ciphertexts are stored as `base64(ciphertext || tag)` with empty associated
//! data. The key is used byte-for-byte and the 12-byte nonce is fixed by
//! configuration (hex-encoded), so values written by other installations
//! sharing the same key material stay readable.
//!
//! ## Usage
//!
//! ```rust
//! use fmbridge_common::crypto::{Aes256GcmCipher, Cipher};
//!
//! let cipher = Aes256GcmCipher::from_config(
//!     &Aes256GcmCipher::generate_key(),
//!     &Aes256GcmCipher::generate_iv_hex(),
//! )?;
//!
//! let stored = cipher.encrypt("s3cret")?;
//! assert_eq!(cipher.decrypt(&stored)?, "s3cret");
//! # Ok::<(), fmbridge_common::error::CommonError>(())
//! ```

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};

use crate::error::{CommonError, CommonResult};

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Characters used for generated keys.
const KEY_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*()";

/// Reversible encryption used by credential stores.
///
/// Implementors work on raw bytes; the string methods are a UTF-8 layer on top.
pub trait Cipher: Send + Sync {
    /// Encrypt arbitrary bytes into the stored base64 form.
    fn encrypt_bytes(&self, plaintext: &[u8]) -> CommonResult<String>;

    /// Decode and decrypt a stored value back into its bytes.
    fn decrypt_bytes(&self, encoded: &str) -> CommonResult<Vec<u8>>;

    fn encrypt(&self, plaintext: &str) -> CommonResult<String> {
        self.encrypt_bytes(plaintext.as_bytes())
    }

    /// # Errors
    /// `CommonError::Serialization` when the plaintext is not UTF-8.
    fn decrypt(&self, encoded: &str) -> CommonResult<String> {
        String::from_utf8(self.decrypt_bytes(encoded)?)
            .map_err(|e| CommonError::serialization("utf-8", e.to_string()))
    }
}

/// AES-256-GCM with a fixed key and nonce.
pub struct Aes256GcmCipher {
    cipher: Aes256Gcm,
    nonce: [u8; NONCE_LEN],
}

impl std::fmt::Debug for Aes256GcmCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aes256GcmCipher")
            .field("key", &"[REDACTED]")
            .field("nonce", &hex::encode(self.nonce))
            .finish()
    }
}

impl Aes256GcmCipher {
    /// Create a cipher from a raw 32-byte key and a 12-byte nonce.
    pub fn new(key: &[u8], nonce: [u8; NONCE_LEN]) -> CommonResult<Self> {
        if key.len() != KEY_LEN {
            return Err(CommonError::config(
                "encryption.key",
                format!("must be exactly {KEY_LEN} bytes, got {}", key.len()),
            ));
        }

        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| CommonError::crypto(format!("Failed to create encryption cipher: {e}")))?;

        Ok(Self { cipher, nonce })
    }

    /// Create a cipher from configured key text and hex nonce.
    pub fn from_config(key: &str, iv_hex: &str) -> CommonResult<Self> {
        validate_key(key)?;
        let nonce = parse_iv_hex(iv_hex)?;
        Self::new(key.as_bytes(), nonce)
    }

    /// Generate a random 32-character key from a printable alphabet.
    pub fn generate_key() -> String {
        let mut rng = OsRng;
        (0..KEY_LEN)
            .map(|_| char::from(KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())]))
            .collect()
    }

    /// Generate a random nonce, hex-encoded.
    pub fn generate_iv_hex() -> String {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);
        hex::encode(nonce)
    }
}

impl Cipher for Aes256GcmCipher {
    fn encrypt_bytes(&self, plaintext: &[u8]) -> CommonResult<String> {
        let sealed = self
            .cipher
            .encrypt(&Nonce::from(self.nonce), plaintext)
            .map_err(|e| CommonError::crypto(format!("Encryption failed: {e}")))?;

        Ok(BASE64.encode(sealed))
    }

    fn decrypt_bytes(&self, encoded: &str) -> CommonResult<Vec<u8>> {
        let sealed = BASE64
            .decode(encoded.trim())
            .map_err(|e| CommonError::serialization("base64", e.to_string()))?;

        self.cipher
            .decrypt(&Nonce::from(self.nonce), sealed.as_ref())
            .map_err(|e| CommonError::crypto(format!("Decryption failed: {e}")))
    }
}

/// Check that configured key text is exactly 32 bytes.
pub fn validate_key(key: &str) -> CommonResult<()> {
    if key.len() == KEY_LEN {
        Ok(())
    } else {
        Err(CommonError::config(
            "encryption.key",
            format!("must be exactly {KEY_LEN} bytes, got {}", key.len()),
        ))
    }
}

/// Decode a hex nonce, rejecting non-hex text or a wrong length.
pub fn parse_iv_hex(iv_hex: &str) -> CommonResult<[u8; NONCE_LEN]> {
    let bytes = hex::decode(iv_hex.trim())
        .map_err(|e| CommonError::config("encryption.iv_hex", format!("not hexadecimal: {e}")))?;

    bytes.as_slice().try_into().map_err(|_| {
        CommonError::config(
            "encryption.iv_hex",
            format!("must decode to {NONCE_LEN} bytes, got {}", bytes.len()),
        )
    })
}
