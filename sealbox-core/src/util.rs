use crate::consts::*;
use crate::error::Error;

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use argon2::Argon2;
use zeroize::Zeroizing;

/// Checks the preamble of a bytestream.
///
/// Returns the version and the header length on success.
pub(crate) fn preamble_checked(preamble: &[u8]) -> Result<(u16, usize), Error> {
    debug_assert_eq!(preamble.len(), PREAMBLE_SIZE);

    if preamble[..PRELUDE_SIZE] != PRELUDE {
        return Err(Error::MalformedEnvelope("unexpected prelude".to_string()));
    }

    let version = u16::from_be_bytes(
        preamble[PRELUDE_SIZE..PRELUDE_SIZE + VERSION_SIZE].try_into()?,
    );

    if version != VERSION_V1 {
        return Err(Error::MalformedEnvelope(format!(
            "unsupported version: {version}"
        )));
    }

    let header_len = u32::from_be_bytes(preamble[PREAMBLE_SIZE - HEADER_SIZE_SIZE..].try_into()?)
        as usize;

    if header_len > MAX_HEADER_SIZE {
        return Err(Error::MalformedEnvelope("header too large".to_string()));
    }

    Ok((version, header_len))
}

/// One-shot AES-256-GCM encryption.
pub(crate) fn aead_encrypt(
    key: &[u8; KEY_SIZE],
    iv: &[u8; IV_SIZE],
    plaintext: &[u8],
) -> Result<Vec<u8>, aead::Error> {
    let aead = Aes256Gcm::new(key.into());
    aead.encrypt(Nonce::from_slice(iv), plaintext)
}

/// One-shot AES-256-GCM decryption.
pub(crate) fn aead_decrypt(
    key: &[u8; KEY_SIZE],
    iv: &[u8; IV_SIZE],
    ciphertext: &[u8],
) -> Result<Vec<u8>, aead::Error> {
    let aead = Aes256Gcm::new(key.into());
    aead.decrypt(Nonce::from_slice(iv), ciphertext)
}

/// Derives a symmetric wrapping key from a password and salt (Argon2id).
///
/// Both sides run with the default parameters; the envelope carries the salt
/// only.
pub(crate) fn derive_wrapping_key(
    password: &[u8],
    salt: &[u8; SALT_SIZE],
) -> Zeroizing<[u8; KEY_SIZE]> {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    Argon2::default()
        .hash_password_into(password, salt, key.as_mut())
        .expect("salt and output lengths are valid");
    key
}
