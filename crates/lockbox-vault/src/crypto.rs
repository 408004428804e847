// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations.
//!
//! Every call to [`seal`] generates a fresh random 96-bit nonce via the system
//! CSPRNG. Nonce reuse would be catastrophic for GCM security.

use lockbox_core::{LockboxError, VaultKey};
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, Nonce, UnboundKey};
use ring::digest::{SHA256, digest};
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

/// Length of the GCM nonce prefixed to every sealed file.
pub const NONCE_LEN: usize = 12;

/// Derive the AES-256 key from vault key material of any length.
pub fn derive_key(key: &VaultKey) -> Zeroizing<[u8; 32]> {
    let hash = digest(&SHA256, key.expose());
    let mut out = Zeroizing::new([0u8; 32]);
    out.copy_from_slice(hash.as_ref());
    out
}

/// Encrypt plaintext with AES-256-GCM using a random 96-bit nonce, binding `aad`.
///
/// Returns `(ciphertext_with_tag, nonce_bytes)`.
pub fn seal(
    key: &[u8; 32],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; NONCE_LEN]), LockboxError> {
    let less_safe = aead_key(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce_bytes)
        .map_err(|_| LockboxError::Vault("failed to generate random nonce".to_string()))?;

    // Seal in place: plaintext buffer is extended with the authentication tag.
    let mut in_out = plaintext.to_vec();
    less_safe
        .seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::from(aad),
            &mut in_out,
        )
        .map_err(|_| LockboxError::Vault("AES-256-GCM encryption failed".to_string()))?;

    Ok((in_out, nonce_bytes))
}

/// Decrypt ciphertext with AES-256-GCM.
///
/// Fails if the key is wrong, the data was tampered with, or `aad` differs
/// from what was bound at seal time.
pub fn open(
    key: &[u8; 32],
    nonce_bytes: &[u8; NONCE_LEN],
    aad: &[u8],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, LockboxError> {
    let less_safe = aead_key(key)?;

    let mut in_out = Zeroizing::new(ciphertext.to_vec());
    let plaintext = less_safe
        .open_in_place(
            Nonce::assume_unique_for_key(*nonce_bytes),
            Aad::from(aad),
            &mut in_out,
        )
        .map_err(|_| {
            LockboxError::Vault("AES-256-GCM decryption failed -- wrong key or corrupted data".to_string())
        })?;

    Ok(Zeroizing::new(plaintext.to_vec()))
}

fn aead_key(key: &[u8; 32]) -> Result<LessSafeKey, LockboxError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| LockboxError::Vault("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> Zeroizing<[u8; 32]> {
        derive_key(&VaultKey::new(b"0123456789abcdef0123456789abcdef".to_vec()))
    }

    #[test]
    fn seal_open_roundtrip() {
        let key = key();
        let (ciphertext, nonce) = seal(&key, b"aad", b"secret api key value").unwrap();
        let decrypted = open(&key, &nonce, b"aad", &ciphertext).unwrap();
        assert_eq!(decrypted.as_slice(), b"secret api key value");
    }

    #[test]
    fn seal_uses_fresh_nonces() {
        let key = key();
        let (ct1, nonce1) = seal(&key, b"", b"same input twice").unwrap();
        let (ct2, nonce2) = seal(&key, b"", b"same input twice").unwrap();
        assert_ne!(nonce1, nonce2);
        assert_ne!(ct1, ct2);
    }

    #[test]
    fn open_with_wrong_key_fails() {
        let other = derive_key(&VaultKey::new(vec![9; 32]));
        let (ciphertext, nonce) = seal(&key(), b"", b"secret data").unwrap();
        assert!(open(&other, &nonce, b"", &ciphertext).is_err());
    }

    #[test]
    fn mismatched_aad_fails() {
        let key = key();
        let (ciphertext, nonce) = seal(&key, b"LBXVLT01", b"data").unwrap();
        assert!(open(&key, &nonce, b"LBXPLN01", &ciphertext).is_err());
    }

    #[test]
    fn tampered_ciphertext_fails_decryption() {
        let key = key();
        let (mut ciphertext, nonce) = seal(&key, b"", b"do not tamper").unwrap();
        ciphertext[0] ^= 0x01;
        assert!(open(&key, &nonce, b"", &ciphertext).is_err());
    }

    #[test]
    fn derived_key_depends_on_every_byte() {
        let a = derive_key(&VaultKey::new(vec![0; 32]));
        let mut bytes = vec![0; 32];
        bytes[31] = 1;
        let b = derive_key(&VaultKey::new(bytes));
        assert_ne!(*a, *b);
    }
}
