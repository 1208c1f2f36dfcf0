//! Sealbox client API.
//!
//! Used for:
//! - Encrypting and packing recipients and parameters (*sealing*),
//! - Decrypting and unpacking recipients and parameters (*unsealing*).

mod header;

pub use header::{
    Algorithm, Header, Iv, KeyRecipientInfo, Mode, PasswordRecipientInfo, RecipientInfo,
    SealedParams,
};

pub mod mem;
pub mod signed;
pub mod stream;

use crate::consts::*;
use crate::error::Error;
use crate::params::CustomParams;

/// A Sealer is used to encrypt data for a set of recipients.
#[derive(Debug)]
pub struct Sealer<'r, R, C> {
    // The prebuilt header.
    header: Header,

    // The custom parameters, sealed into the header at encryption time.
    params: CustomParams,

    // An exclusive reference to a random number generator.
    rng: &'r mut R,

    // The flavor-specific configuration.
    config: C,
}

impl<'r, R, C> Sealer<'r, R, C> {
    /// Attach custom parameters.
    ///
    /// The parameters are encrypted under the content key and become
    /// readable again after a successful decrypt.
    pub fn with_params(mut self, params: CustomParams) -> Self {
        self.params = params;
        self
    }

    /// A mutable handle to the custom parameters.
    pub fn params_mut(&mut self) -> &mut CustomParams {
        &mut self.params
    }
}

/// An Unsealer is used to decrypt data.
///
/// Unsealing is a two-step process:
///
/// 1. First the header is read. This yields the recipient entries, so the
///    caller can decide which credential to use.
///
/// 2. Then, the matching private key (or password) unwraps the content key
///    and the payload is decrypted.
#[derive(Debug)]
pub struct Unsealer<R, C: UnsealerConfig> {
    /// The version found before the raw header.
    pub version: u16,

    /// The parsed header.
    pub header: Header,

    // The type of the input.
    r: R,

    // The implementation-specific configuration.
    config: C,
}

/// Sealer configuration.
///
/// This trait is sealed, you cannot implement it yourself.
pub trait SealerConfig: sealed::SealerConfig {}

/// Unsealer configuration.
///
/// This trait is sealed, you cannot implement it yourself.
pub trait UnsealerConfig: sealed::UnsealerConfig {}

pub(crate) mod sealed {
    pub trait UnsealerConfig {}
    pub trait SealerConfig {}
}

pub(self) fn stream_mode_checked(h: &Header) -> Result<(u32, (u64, Option<u64>)), Error> {
    let (chunk_size, size_hint) = match h {
        Header {
            mode:
                Mode::Streaming {
                    chunk_size,
                    size_hint,
                },
            ..
        } => (*chunk_size, *size_hint),
        _ => {
            return Err(Error::MalformedEnvelope(
                "expected a streaming envelope".to_string(),
            ))
        }
    };

    if chunk_size == 0 || chunk_size > MAX_CHUNK_SIZE {
        return Err(Error::MalformedEnvelope(
            "chunk size out of range".to_string(),
        ));
    }

    Ok((chunk_size, size_hint))
}
