//! Detached signatures over byte buffers and data sources.
//!
//! Both entry points feed a single SHA-512 prehash and sign it with Ed25519
//! in prehashed mode, so signing a stream chunk by chunk produces a result
//! bit-identical to signing the fully materialized buffer.

use crate::artifacts::{PrivateKey, PublicKey, Signature};
use crate::consts::SIGNING_CONTEXT;
use crate::error::Error;
use crate::stream::DataSource;

use sha2::{Digest, Sha512};

/// Signs a byte buffer.
pub fn sign(data: &[u8], key: &PrivateKey) -> Result<Signature, Error> {
    sign_digest(Sha512::new().chain_update(data), key)
}

/// Signs all data pulled from a source.
pub fn sign_source<S: DataSource>(source: &mut S, key: &PrivateKey) -> Result<Signature, Error> {
    sign_digest(digest_source(source)?, key)
}

/// Verifies a signature over a byte buffer.
pub fn verify(data: &[u8], signature: &Signature, key: &PublicKey) -> bool {
    verify_digest(Sha512::new().chain_update(data), signature, key)
}

/// Verifies a signature over all data pulled from a source.
pub fn verify_source<S: DataSource>(
    source: &mut S,
    signature: &Signature,
    key: &PublicKey,
) -> Result<bool, Error> {
    Ok(verify_digest(digest_source(source)?, signature, key))
}

fn digest_source<S: DataSource>(source: &mut S) -> Result<Sha512, Error> {
    let mut digest = Sha512::new();

    while source.has_data() {
        let piece = source.read()?;
        if piece.is_empty() {
            return Err(Error::SourceError);
        }
        digest.update(&piece);
    }

    Ok(digest)
}

fn sign_digest(digest: Sha512, key: &PrivateKey) -> Result<Signature, Error> {
    key.signing_key()
        .sign_prehashed(digest, Some(SIGNING_CONTEXT))
        .map(Signature::from_dalek)
        .map_err(|_| Error::InvalidSignature)
}

fn verify_digest(digest: Sha512, signature: &Signature, key: &PublicKey) -> bool {
    key.verifying()
        .verify_prehashed(digest, Some(SIGNING_CONTEXT), &signature.to_dalek())
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::KeyPair;
    use crate::stream::BytesSource;

    #[test]
    fn test_sign_verify() {
        let mut rng = rand::thread_rng();
        let pair = KeyPair::generate(&mut rng);

        let data = b"this buffer will be signed";
        let sig = sign(data, pair.private()).unwrap();

        assert!(verify(data, &sig, pair.public()));
        assert!(!verify(b"another buffer", &sig, pair.public()));
    }

    #[test]
    fn test_verify_wrong_key() {
        let mut rng = rand::thread_rng();
        let pair = KeyPair::generate(&mut rng);
        let other = KeyPair::generate(&mut rng);

        let data = b"this buffer will be signed";
        let sig = sign(data, pair.private()).unwrap();

        assert!(!verify(data, &sig, other.public()));
    }

    #[test]
    fn test_stream_matches_buffer() {
        let mut rng = rand::thread_rng();
        let pair = KeyPair::generate(&mut rng);

        let mut data = vec![0u8; 300_000];
        rand::RngCore::fill_bytes(&mut rng, &mut data);

        let whole = sign(&data, pair.private()).unwrap();

        let mut source = BytesSource::new(&data).with_chunk(4096);
        let streamed = sign_source(&mut source, pair.private()).unwrap();

        assert_eq!(whole.to_bytes(), streamed.to_bytes());

        let mut source = BytesSource::new(&data).with_chunk(1000);
        assert!(verify_source(&mut source, &whole, pair.public()).unwrap());
    }

    #[test]
    fn test_signature_serde() {
        let mut rng = rand::thread_rng();
        let pair = KeyPair::generate(&mut rng);

        let sig = sign(b"data", pair.private()).unwrap();

        let json = serde_json::to_string(&sig).unwrap();
        let decoded: Signature = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, sig);

        let recovered = Signature::from_slice(&sig.to_bytes()).unwrap();
        assert!(verify(b"data", &recovered, pair.public()));
    }
}
