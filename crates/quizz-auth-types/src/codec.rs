//! Opaque transport wrapper around signed tokens.
//!
//! A signed token is a readable JWT: anyone holding it can base64-decode the
//! subject id. Before a token leaves the service it is sealed with
//! ChaCha20-Poly1305 under a key derived from the process secret, and
//! hex-encoded for the wire.
//!
//! Sealing is deterministic. The nonce is derived from the key and the
//! plaintext (`SHA-256(tag || key || plaintext)[..12]`), so the same signed
//! token always yields the same opaque string, while two distinct tokens
//! never share a nonce. Any modified byte fails the Poly1305 tag check.

use chacha20poly1305::{
    ChaCha20Poly1305, Key, Nonce,
    aead::{Aead, KeyInit},
};
use sha2::{Digest, Sha256};

const NONCE_TAG: &[u8] = b"quizz/token-codec/nonce/v1";
const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    /// Ciphertext cannot be reversed with this process's secret.
    #[error("malformed token")]
    MalformedToken,
    #[error("token encryption failed")]
    Encryption,
}

/// Symmetric codec bound to one process-wide secret.
#[derive(Clone)]
pub struct TokenCodec {
    key: [u8; 32],
    cipher: ChaCha20Poly1305,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let key: [u8; 32] = Sha256::digest(secret.as_bytes()).into();
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&key));
        Self { key, cipher }
    }

    /// Seal a signed token into its lowercase-hex wire form.
    pub fn encode(&self, signed_token: &str) -> Result<String, CodecError> {
        let nonce_bytes = self.nonce_for(signed_token.as_bytes());
        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), signed_token.as_bytes())
            .map_err(|_| CodecError::Encryption)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&ciphertext);
        Ok(hex::encode(sealed))
    }

    /// Reverse [`TokenCodec::encode`].
    pub fn decode(&self, opaque: &str) -> Result<String, CodecError> {
        let sealed = hex::decode(opaque).map_err(|_| CodecError::MalformedToken)?;
        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(CodecError::MalformedToken);
        }

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| CodecError::MalformedToken)?;

        // Only nonces this codec would have derived are accepted.
        if self.nonce_for(&plaintext) != nonce_bytes {
            return Err(CodecError::MalformedToken);
        }

        String::from_utf8(plaintext).map_err(|_| CodecError::MalformedToken)
    }

    fn nonce_for(&self, plaintext: &[u8]) -> [u8; NONCE_LEN] {
        let digest = Sha256::new()
            .chain_update(NONCE_TAG)
            .chain_update(self.key)
            .chain_update(plaintext)
            .finalize();
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&digest[..NONCE_LEN]);
        nonce
    }
}
