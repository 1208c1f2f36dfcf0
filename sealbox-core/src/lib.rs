//! # Sealbox core library
#![deny(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links
)]
//! Sealbox is a hybrid, multi-recipient envelope cryptosystem. One fresh
//! content key encrypts the payload; that key is wrapped once per recipient,
//! so every recipient independently recovers the identical plaintext using
//! only its own secret.
//!
//! * Key recipients are indexed by a *receiver id*, the SHA-256 hash of
//!   their encoded public key, and unwrap the content key with X25519.
//!
//! * Password recipients unwrap the content key with a key derived from
//!   their password (Argon2id, fresh salt per envelope).
//!
//! * Custom parameters — a small key/value store, also used to embed
//!   detached signatures — ride in the header, encrypted under the content
//!   key.
//!
//! ## Streaming vs in-memory
//!
//! For large or arbitrary sized payloads, use the streaming mode in
//! [`client::stream`]: payload bytes are pulled from a blocking
//! [`stream::DataSource`] and pushed into a [`stream::DataSink`] in
//! bounded-size chunks, each authenticated on its own with the cipher state
//! chained across chunk boundaries. The in-memory mode in [`client::mem`]
//! processes the whole payload in one pass and is only suitable for small
//! messages. The two modes share the header format but are not
//! wire-compatible with each other; the header's mode field tells them
//! apart.
//!
//! ## Examples
//!
//! ### Seal a slice
//!
//! ```
//! use sealbox_core::artifacts::KeyPair;
//! use sealbox_core::client::mem::{SealerMemoryConfig, UnsealerMemoryConfig};
//! use sealbox_core::client::{Sealer, Unsealer};
//! use sealbox_core::recipients::RecipientSet;
//! # use sealbox_core::error::Error;
//!
//! # fn main() -> Result<(), Error> {
//! let mut rng = rand::thread_rng();
//! let bob = KeyPair::generate(&mut rng);
//!
//! let mut recipients = RecipientSet::new();
//! recipients.add_key(bob.public())?;
//! recipients.add_password("shared secret");
//!
//! let input = b"SECRET DATA";
//! let sealed = Sealer::<_, SealerMemoryConfig>::new(&recipients, &mut rng)?.seal(input)?;
//!
//! let (original, _params) = Unsealer::<_, UnsealerMemoryConfig>::new(&sealed)?
//!     .unseal(&bob.public().receiver_id(), bob.private())?;
//!
//! assert_eq!(&input.to_vec(), &original);
//! # Ok(())
//! # }
//! ```
//!
//! ### Seal a bytestream
//!
//! ```
//! use sealbox_core::artifacts::KeyPair;
//! use sealbox_core::client::stream::{SealerStreamConfig, UnsealerStreamConfig};
//! use sealbox_core::client::{Sealer, Unsealer};
//! use sealbox_core::recipients::RecipientSet;
//! use sealbox_core::stream::{BytesSink, BytesSource};
//! # use sealbox_core::error::Error;
//!
//! # fn main() -> Result<(), Error> {
//! let mut rng = rand::thread_rng();
//! let bob = KeyPair::generate(&mut rng);
//!
//! let mut recipients = RecipientSet::new();
//! recipients.add_key(bob.public())?;
//!
//! let mut input = BytesSource::new(b"SECRET DATA");
//! let mut sealed = BytesSink::new();
//!
//! Sealer::<_, SealerStreamConfig>::new(&recipients, &mut rng)?
//!     .seal(&mut input, &mut sealed)?;
//!
//! let mut original = BytesSink::new();
//! Unsealer::<_, UnsealerStreamConfig>::new(BytesSource::new(&sealed.into_inner()))?
//!     .unseal(&bob.public().receiver_id(), bob.private(), &mut original)?;
//!
//! assert_eq!(original.into_inner(), b"SECRET DATA");
//! # Ok(())
//! # }
//! ```
//!
//! ### Sign, then seal
//!
//! ```
//! use sealbox_core::artifacts::KeyPair;
//! use sealbox_core::client::signed::{seal_signed, unseal_verified};
//! use sealbox_core::params::CustomParams;
//! use sealbox_core::recipients::RecipientSet;
//! # use sealbox_core::error::Error;
//!
//! # fn main() -> Result<(), Error> {
//! let mut rng = rand::thread_rng();
//! let alice = KeyPair::generate(&mut rng);
//! let bob = KeyPair::generate(&mut rng);
//!
//! let mut recipients = RecipientSet::new();
//! recipients.add_key(bob.public())?;
//!
//! let sealed = seal_signed(
//!     b"SECRET DATA",
//!     alice.private(),
//!     &recipients,
//!     CustomParams::new(),
//!     &mut rng,
//! )?;
//!
//! let original = unseal_verified(&sealed, bob.private(), &[alice.public().clone()])?;
//! assert_eq!(&original, b"SECRET DATA");
//! # Ok(())
//! # }
//! ```
//!
//! ## Wire format
//!
//! The wire format consists of the following segments, followed by their
//! length in bytes:
//!
//! ```text
//!                  PREAMBLE (10)
//! = PRELUDE (4) || VERSION (2) || HEADER LEN (4)
//!
//!                  HEADER (*)
//! = recipient entries || algorithm + IV || mode || sealed parameters
//!
//!                  PAYLOAD (*)
//! = in-memory: AEAD.Enc(K; IV; M)
//! = streaming: STREAM chunks of CHUNK SIZE + 16, final chunk shorter
//! ```

pub mod artifacts;
pub mod client;
pub mod consts;
pub mod error;
pub mod params;
pub mod recipients;
pub mod signer;
pub mod stream;

#[doc(hidden)]
pub use consts::*;


mod util;
