//! In-memory mode.
//!
//! Seals and unseals payloads that fit in memory in one AEAD pass. For
//! arbitrarily large payloads, use the streaming mode in
//! [`stream`][`crate::client::stream`].

use crate::artifacts::{ContentKey, PrivateKey, ProtectedPrivateKey, ReceiverId};
use crate::client::*;
use crate::consts::*;
use crate::error::Error;
use crate::params::CustomParams;
use crate::recipients::RecipientSet;
use crate::util::{aead_decrypt, aead_encrypt, preamble_checked};

use rand::{CryptoRng, RngCore};

/// In-memory configuration for a [`Sealer`].
#[derive(Debug)]
pub struct SealerMemoryConfig {
    key: ContentKey,
    nonce: [u8; IV_SIZE],
}

/// In-memory configuration for an [`Unsealer`].
#[derive(Debug)]
pub struct UnsealerMemoryConfig {
    message_len: usize,
}

impl SealerConfig for SealerMemoryConfig {}
impl super::sealed::SealerConfig for SealerMemoryConfig {}

impl UnsealerConfig for UnsealerMemoryConfig {}
impl super::sealed::UnsealerConfig for UnsealerMemoryConfig {}

impl<'r, R: RngCore + CryptoRng> Sealer<'r, R, SealerMemoryConfig> {
    /// Create a new [`Sealer`].
    pub fn new(recipients: &RecipientSet, rng: &'r mut R) -> Result<Self, Error> {
        let (header, key) = Header::new(recipients, rng)?;
        let Algorithm::Aes256Gcm(iv) = header.algo;

        Ok(Self {
            header,
            params: CustomParams::new(),
            rng,
            config: SealerMemoryConfig { key, nonce: iv.0 },
        })
    }

    /// Seals the entire payload.
    pub fn seal(mut self, message: impl AsRef<[u8]>) -> Result<Vec<u8>, Error> {
        let mut out = Vec::with_capacity(message.as_ref().len() + 1024);

        out.extend_from_slice(&PRELUDE);
        out.extend_from_slice(&VERSION_V1.to_be_bytes());

        self.header = self.header.with_mode(Mode::InMemory {
            size: message.as_ref().len().try_into()?,
        });
        self.header.params = SealedParams::seal(&self.params, &self.config.key, self.rng)?;

        let header_buf = bincode::serialize(&self.header)?;
        out.extend_from_slice(&u32::try_from(header_buf.len())?.to_be_bytes());
        out.extend_from_slice(&header_buf);

        let ciphertext = aead_encrypt(
            self.config.key.as_bytes(),
            &self.config.nonce,
            message.as_ref(),
        )?;

        out.extend_from_slice(&ciphertext);

        Ok(out)
    }
}

impl Unsealer<Vec<u8>, UnsealerMemoryConfig> {
    /// Create a new [`Unsealer`].
    ///
    /// Errors with [`Error::MalformedEnvelope`] before touching the payload
    /// if the header does not parse.
    pub fn new(input: impl AsRef<[u8]>) -> Result<Self, Error> {
        let b = input.as_ref();

        if b.len() < PREAMBLE_SIZE {
            return Err(Error::MalformedEnvelope("truncated preamble".to_string()));
        }

        let (preamble_bytes, b) = b.split_at(PREAMBLE_SIZE);
        let (version, header_len) = preamble_checked(preamble_bytes)?;

        if b.len() < header_len {
            return Err(Error::MalformedEnvelope("truncated header".to_string()));
        }

        let (header_bytes, ct) = b.split_at(header_len);
        let header: Header = bincode::deserialize(header_bytes)?;

        let message_len = match header.mode {
            Mode::InMemory { size } => size as usize,
            _ => {
                return Err(Error::MalformedEnvelope(
                    "expected an in-memory envelope".to_string(),
                ))
            }
        };

        Ok(Self {
            version,
            header,
            r: ct.to_vec(),
            config: UnsealerMemoryConfig { message_len },
        })
    }

    /// Unseals the payload for the key recipient with the given receiver id.
    ///
    /// Returns the plaintext together with the decrypted custom parameters.
    pub fn unseal(
        self,
        id: &ReceiverId,
        key: &PrivateKey,
    ) -> Result<(Vec<u8>, CustomParams), Error> {
        let info = self
            .header
            .key_recipient(id)
            .ok_or(Error::RecipientNotFound)?;

        let content_key = info.unwrap_key(key)?;
        self.decrypt_payload(content_key)
    }

    /// Unseals the payload with a password-protected private key.
    pub fn unseal_protected(
        self,
        id: &ReceiverId,
        key: &ProtectedPrivateKey,
        password: &str,
    ) -> Result<(Vec<u8>, CustomParams), Error> {
        let key = key.open(password)?;
        self.unseal(id, &key)
    }

    /// Unseals the payload for a password recipient.
    pub fn unseal_with_password(
        self,
        password: &str,
    ) -> Result<(Vec<u8>, CustomParams), Error> {
        let info = self
            .header
            .password_recipient()
            .ok_or(Error::RecipientNotFound)?;

        let content_key = info.unwrap_key(password)?;
        self.decrypt_payload(content_key)
    }

    fn decrypt_payload(self, key: ContentKey) -> Result<(Vec<u8>, CustomParams), Error> {
        let params = self.header.params.open(&key)?;

        let Algorithm::Aes256Gcm(iv) = self.header.algo;
        let plain = aead_decrypt(key.as_bytes(), &iv.0, &self.r)
            .map_err(|_| Error::DecryptionFailed)?;

        if plain.len() != self.config.message_len {
            return Err(Error::MalformedEnvelope(
                "payload size does not match the header".to_string(),
            ));
        }

        Ok((plain, params))
    }
}
