//! Sealbox errors.
//!
//! Every primitive-level failure is folded into one of the variants below,
//! so callers branch on a small closed set. All errors are terminal to the
//! current call; nothing is retried internally.

use core::{array::TryFromSliceError, num::TryFromIntError};

/// A Sealbox error.
#[derive(Debug)]
pub enum Error {
    /// Key material could not be parsed as a public key.
    InvalidRecipient,
    /// An encryption operation was started without any recipients.
    NoRecipients,
    /// No recipient entry matches the given receiver identifier.
    RecipientNotFound,
    /// No candidate public key matches the embedded signer identifier.
    SignerNotFound,
    /// The supplied password does not unwrap the content key.
    InvalidPassword,
    /// The supplied password does not decrypt the private key.
    InvalidPrivateKeyPassword,
    /// Unwrapping the content key or decrypting the payload failed
    /// authentication.
    DecryptionFailed,
    /// The embedded signature does not verify over the decrypted payload.
    InvalidSignature,
    /// The envelope is structurally invalid.
    MalformedEnvelope(String),
    /// The data source violated its protocol.
    SourceError,
    /// The data sink reported a failed medium.
    SinkUnavailable,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidRecipient => write!(f, "recipient key material could not be parsed"),
            Self::NoRecipients => write!(f, "no recipients were added"),
            Self::RecipientNotFound => write!(f, "receiver id not found among recipients"),
            Self::SignerNotFound => write!(f, "no candidate key matches the signer id"),
            Self::InvalidPassword => write!(f, "incorrect password"),
            Self::InvalidPrivateKeyPassword => write!(f, "incorrect private key password"),
            Self::DecryptionFailed => write!(f, "decryption failed authentication"),
            Self::InvalidSignature => write!(f, "signature verification failed"),
            Self::MalformedEnvelope(s) => write!(f, "malformed envelope: {s}"),
            Self::SourceError => write!(f, "data source protocol violation"),
            Self::SinkUnavailable => write!(f, "data sink is unavailable"),
        }
    }
}

impl std::error::Error for Error {}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Self::MalformedEnvelope(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedEnvelope(e.to_string())
    }
}

impl From<aead::Error> for Error {
    fn from(_: aead::Error) -> Self {
        Self::DecryptionFailed
    }
}

impl From<TryFromIntError> for Error {
    fn from(_: TryFromIntError) -> Self {
        Self::MalformedEnvelope("length out of range".to_string())
    }
}

impl From<TryFromSliceError> for Error {
    fn from(_: TryFromSliceError) -> Self {
        Self::MalformedEnvelope("truncated field".to_string())
    }
}
