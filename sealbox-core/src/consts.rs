//! Constants used in the Sealbox envelope format.

/// Version 1.
///
/// This version wraps a fresh AES-256-GCM content key per recipient (X25519
/// for key recipients, Argon2id for password recipients). The header format
/// is defined by bincode.
pub const VERSION_V1: u16 = 1;

/// The size of the tag with which all Sealbox bytestreams begin.
pub const PRELUDE_SIZE: usize = 4;

/// The tag bytes with which all Sealbox bytestreams begin.
pub const PRELUDE: [u8; PRELUDE_SIZE] = [0x5E, 0xA1, 0xB0, 0x58];

/// The size of the version identifier.
pub const VERSION_SIZE: usize = std::mem::size_of::<u16>();

/// The size of the header size.
pub const HEADER_SIZE_SIZE: usize = std::mem::size_of::<u32>();

/// The maximum size of the header (4 MiB).
pub const MAX_HEADER_SIZE: usize = 1024 * 1024 * 4;

/// The maximum size of symmetric chunks (4 MiB).
pub const MAX_CHUNK_SIZE: u32 = 1024 * 1024 * 4;

/// The preamble contains the following bytes:
/// * Prelude: 4 bytes,
/// * Version identifier: 2 bytes,
/// * Size of header: 4 bytes,
/// * Totalling: 4 + 2 + 4 = 10 bytes.
pub const PREAMBLE_SIZE: usize = PRELUDE_SIZE + VERSION_SIZE + HEADER_SIZE_SIZE;

/// Default size of symmetric encryption chunks, if in streaming mode (1 MiB).
pub const DEFAULT_CHUNK_SIZE: u32 = 1024 * 1024;

// Symmetric crypto constants.

/// Size of the symmetric content key (AES-256).
pub const KEY_SIZE: usize = 32;

/// Size of the initialization vector.
pub const IV_SIZE: usize = 12;

// The STREAM construction needs only 12 bytes:
// A 7-byte nonce, a 4-byte counter (u32) and an all-zero or all-one byte,
// depending on if the chunk is the final chunk.

/// Size of the nonce in the "STREAM" encryption construction.
pub const STREAM_NONCE_SIZE: usize = 7;

/// Size of the authentication tag.
/// The authentication tag is appended to each chunk.
pub const TAG_SIZE: usize = 16;

// Key material constants.

/// Size of a key-pair seed.
pub const SEED_SIZE: usize = 32;

/// Size of the encoded public key material (verifying key || exchange key).
pub const PUBLIC_MATERIAL_SIZE: usize = 64;

/// Size of a receiver identifier (SHA-256 output).
pub const RECEIVER_ID_SIZE: usize = 32;

/// Size of a detached signature.
pub const SIGNATURE_SIZE: usize = 64;

/// Size of the salt used for password-based key derivation.
pub const SALT_SIZE: usize = 16;

/// Size of the nonce used when wrapping the content key for a key recipient.
pub const WRAP_NONCE_SIZE: usize = 24;

/// Domain separation label for deriving the X25519 exchange secret from a seed.
pub(crate) const EXCHANGE_KEY_INFO: &[u8] = b"sealbox.v1.exchange-key";

/// Domain separation context for prehashed signatures.
pub(crate) const SIGNING_CONTEXT: &[u8] = b"sealbox.v1.signature";
