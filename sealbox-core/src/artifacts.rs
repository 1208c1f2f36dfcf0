//! Artifacts of the Sealbox protocol.
//!
//! This module implements serde serialization and deserialization for
//! artifacts: binary in compact encodings, base64 in human-readable ones.
//!
//! Key pairs are derived from a single 32-byte seed: the seed is the Ed25519
//! signing key, and the X25519 exchange secret is expanded from it with
//! HKDF-SHA256. The receiver identifier is the SHA-256 hash of the encoded
//! public key material, so identical keys always carry identical
//! identifiers, across export/import round-trips included.

use crate::consts::*;
use crate::error::Error;
use crate::util::{aead_decrypt, aead_encrypt, derive_wrapping_key};

use base64ct::{Base64, Encoding};
use core::fmt;
use ed25519_dalek::{SigningKey, VerifyingKey};
use hkdf::Hkdf;
use rand::{CryptoRng, RngCore};
use serde::de::{Error as DeError, SeqAccess, Visitor};
use serde::{ser::SerializeTuple, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

// Computes the byte length of raw bytes encoded in (padded) b64.
// We use this to preallocate a buffer to encode into.
const fn b64len(raw_len: usize) -> usize {
    (((raw_len - 1) / 3) + 1) * 4
}

pub(crate) fn serialize_bin_or_b64<S, T>(val: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: AsRef<[u8]>,
{
    if serializer.is_human_readable() {
        let mut enc_buf = vec![0u8; b64len(val.as_ref().len())];
        let encoded = Base64::encode(val.as_ref(), &mut enc_buf)
            .map_err(|e| serde::ser::Error::custom(format!("base64ct serialization error: {e}")))?;
        serializer.serialize_str(encoded)
    } else {
        let mut seq = serializer.serialize_tuple(val.as_ref().len())?;
        for b in val.as_ref() {
            seq.serialize_element(b)?;
        }
        seq.end()
    }
}

pub(crate) fn deserialize_bin_or_b64<'de, D: Deserializer<'de>>(
    buf: &mut [u8],
    deserializer: D,
) -> Result<(), D::Error> {
    if deserializer.is_human_readable() {
        struct StrVisitor<'b>(&'b mut [u8]);

        impl<'de> Visitor<'de> for StrVisitor<'_> {
            type Value = ();

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(formatter, "a string of length {}", b64len(self.0.len()))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: DeError,
            {
                if v.len() != b64len(self.0.len()) {
                    return Err(DeError::invalid_length(v.len(), &self));
                }

                Base64::decode(v, self.0)
                    .map_err(|e| DeError::custom(format!("base64ct decoding error: {e}")))?;

                Ok(())
            }
        }

        deserializer.deserialize_str(StrVisitor(buf))
    } else {
        struct ArrayVisitor<'b>(&'b mut [u8]);

        impl<'de> Visitor<'de> for ArrayVisitor<'_> {
            type Value = ();

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(formatter, "an array of length {}", self.0.len())
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                for (index, byte) in self.0.iter_mut().enumerate() {
                    *byte = match seq.next_element()? {
                        Some(byte) => byte,
                        None => return Err(DeError::invalid_length(index, &self)),
                    };
                }

                Ok(())
            }
        }

        deserializer.deserialize_tuple(buf.len(), ArrayVisitor(buf))
    }
}

/// A variable-length binary artifact.
///
/// Base64 in human-readable encodings, length-prefixed bytes otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Bytes(pub(crate) Vec<u8>);

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        Self(v)
    }
}

impl Serialize for Bytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&Base64::encode_string(&self.0))
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Bytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BytesVisitor;

        impl<'de> Visitor<'de> for BytesVisitor {
            type Value = Bytes;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(formatter, "a byte buffer or a base64 string")
            }

            fn visit_str<E: DeError>(self, v: &str) -> Result<Self::Value, E> {
                Base64::decode_vec(v)
                    .map(Bytes)
                    .map_err(|e| DeError::custom(format!("base64ct decoding error: {e}")))
            }

            fn visit_bytes<E: DeError>(self, v: &[u8]) -> Result<Self::Value, E> {
                Ok(Bytes(v.to_vec()))
            }

            fn visit_byte_buf<E: DeError>(self, v: Vec<u8>) -> Result<Self::Value, E> {
                Ok(Bytes(v))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut buf = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(byte) = seq.next_element()? {
                    buf.push(byte);
                }
                Ok(Bytes(buf))
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_str(BytesVisitor)
        } else {
            deserializer.deserialize_byte_buf(BytesVisitor)
        }
    }
}

/// Implements [`serde::ser::Serialize`] and [`serde::de::Deserialize`] for
/// fixed-size artifact newtypes.
macro_rules! impl_fixed_serde {
    ($type: ty, $size: expr) => {
        impl Serialize for $type {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serialize_bin_or_b64(&self.0, serializer)
            }
        }

        impl<'de> Deserialize<'de> for $type {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let mut buf = [0u8; $size];
                deserialize_bin_or_b64(&mut buf, deserializer)?;

                Ok(Self(buf))
            }
        }
    };
}

/// A content-derived receiver identifier: the SHA-256 hash of the encoded
/// public key material.
#[derive(Clone, Copy, Eq)]
pub struct ReceiverId([u8; RECEIVER_ID_SIZE]);

impl_fixed_serde!(ReceiverId, RECEIVER_ID_SIZE);

impl ReceiverId {
    /// Computes the identifier for encoded public key material.
    pub fn for_material(material: &[u8]) -> Self {
        Self(Sha256::digest(material).into())
    }

    /// Reconstructs an identifier from its raw bytes.
    pub fn from_bytes(bytes: [u8; RECEIVER_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// The raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8; RECEIVER_ID_SIZE] {
        &self.0
    }
}

// Identifiers index secret-bearing entries, so matching is constant-time.
impl PartialEq for ReceiverId {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl fmt::Debug for ReceiverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReceiverId(")?;
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

/// A salt for password-based key derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Salt(pub(crate) [u8; SALT_SIZE]);

impl_fixed_serde!(Salt, SALT_SIZE);

impl Salt {
    pub(crate) fn random<R: RngCore + CryptoRng>(r: &mut R) -> Self {
        let mut buf = [0u8; SALT_SIZE];
        r.fill_bytes(&mut buf);
        Self(buf)
    }
}

/// The ephemeral X25519 public key accompanying a wrapped content key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EphemeralKey(pub(crate) [u8; 32]);

impl_fixed_serde!(EphemeralKey, 32);

/// A detached Ed25519 signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub(crate) [u8; SIGNATURE_SIZE]);

impl_fixed_serde!(Signature, SIGNATURE_SIZE);

impl Signature {
    /// The raw signature bytes.
    pub fn to_bytes(self) -> [u8; SIGNATURE_SIZE] {
        self.0
    }

    /// Reconstructs a signature from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self(bytes.try_into().map_err(|_| {
            Error::MalformedEnvelope("signature of invalid length".to_string())
        })?))
    }

    pub(crate) fn to_dalek(self) -> ed25519_dalek::Signature {
        ed25519_dalek::Signature::from_bytes(&self.0)
    }

    pub(crate) fn from_dalek(sig: ed25519_dalek::Signature) -> Self {
        Self(sig.to_bytes())
    }
}

/// The single-use symmetric key protecting one envelope or stream.
///
/// Generated freshly per encryption operation, wrapped once per recipient,
/// and wiped from memory when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ContentKey([u8; KEY_SIZE]);

impl ContentKey {
    pub(crate) fn generate<R: RngCore + CryptoRng>(r: &mut R) -> Self {
        let mut buf = [0u8; KEY_SIZE];
        r.fill_bytes(&mut buf);
        Self(buf)
    }

    pub(crate) fn from_slice(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self(bytes.try_into().map_err(|_| {
            Error::MalformedEnvelope("content key of invalid length".to_string())
        })?))
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentKey(..)")
    }
}

/// Anything that can act as a public identity: an imported or generated
/// public key, or one extracted from a private key.
pub trait PublicKeySource {
    /// The encoded public key material.
    fn public_material(&self) -> Vec<u8>;

    /// The content-derived receiver identifier.
    fn receiver_id(&self) -> ReceiverId;
}

/// A public key: an Ed25519 verifying key and an X25519 exchange key,
/// indexed by the receiver identifier of their encoding.
#[derive(Debug, Clone)]
pub struct PublicKey {
    verifying: VerifyingKey,
    exchange: crypto_box::PublicKey,
    id: ReceiverId,
}

impl PublicKey {
    /// Parses encoded public key material (verifying key || exchange key).
    pub fn from_material(material: &[u8]) -> Result<Self, Error> {
        if material.len() != PUBLIC_MATERIAL_SIZE {
            return Err(Error::InvalidRecipient);
        }

        let (vk_bytes, xk_bytes) = material.split_at(32);
        let vk_arr: [u8; 32] = vk_bytes.try_into().expect("split is 32 bytes");
        let verifying =
            VerifyingKey::from_bytes(&vk_arr).map_err(|_| Error::InvalidRecipient)?;
        let xk_arr: [u8; 32] = xk_bytes.try_into().expect("split is 32 bytes");
        let exchange = crypto_box::PublicKey::from(xk_arr);

        Ok(Self {
            verifying,
            exchange,
            id: ReceiverId::for_material(material),
        })
    }

    /// The encoded public key material.
    pub fn material(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(PUBLIC_MATERIAL_SIZE);
        out.extend_from_slice(self.verifying.as_bytes());
        out.extend_from_slice(self.exchange.as_bytes());
        out
    }

    /// The receiver identifier of this key.
    pub fn receiver_id(&self) -> ReceiverId {
        self.id
    }

    pub(crate) fn verifying(&self) -> &VerifyingKey {
        &self.verifying
    }

    pub(crate) fn exchange(&self) -> &crypto_box::PublicKey {
        &self.exchange
    }
}

impl PublicKeySource for PublicKey {
    fn public_material(&self) -> Vec<u8> {
        self.material()
    }

    fn receiver_id(&self) -> ReceiverId {
        self.id
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_bin_or_b64(&self.material(), serializer)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut buf = [0u8; PUBLIC_MATERIAL_SIZE];
        deserialize_bin_or_b64(&mut buf, deserializer)?;

        PublicKey::from_material(&buf).map_err(|_| DeError::custom("not a valid public key"))
    }
}

/// A private key: the key-pair seed plus the receiver identifier of the
/// paired public key. The seed is wiped from memory when dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    seed: [u8; SEED_SIZE],
    #[zeroize(skip)]
    id: ReceiverId,
}

impl PrivateKey {
    /// Reconstructs a private key from its 32-byte seed.
    pub fn from_seed(seed: [u8; SEED_SIZE]) -> Self {
        let mut key = Self {
            seed,
            id: ReceiverId::from_bytes([0u8; RECEIVER_ID_SIZE]),
        };
        key.id = ReceiverId::for_material(&key.derive_public().material());
        key
    }

    /// Parses exported private key material.
    pub fn from_material(material: &[u8]) -> Result<Self, Error> {
        let seed: [u8; SEED_SIZE] = material.try_into().map_err(|_| Error::InvalidRecipient)?;
        Ok(Self::from_seed(seed))
    }

    /// The exportable private key material (the seed).
    pub fn material(&self) -> [u8; SEED_SIZE] {
        self.seed
    }

    /// The receiver identifier of the paired public key.
    pub fn receiver_id(&self) -> ReceiverId {
        self.id
    }

    /// Extracts the paired public key.
    pub fn public_key(&self) -> PublicKey {
        self.derive_public()
    }

    /// Encrypts this key under a password for storage.
    pub fn protect<R: RngCore + CryptoRng>(
        &self,
        password: &str,
        rng: &mut R,
    ) -> ProtectedPrivateKey {
        let salt = Salt::random(rng);
        let mut iv = [0u8; IV_SIZE];
        rng.fill_bytes(&mut iv);

        let key = derive_wrapping_key(password.as_bytes(), &salt.0);
        let ct = aead_encrypt(&key, &iv, &self.seed).expect("seed fits in one AEAD message");

        ProtectedPrivateKey {
            salt,
            iv,
            ct: Bytes(ct),
        }
    }

    fn derive_public(&self) -> PublicKey {
        let verifying = self.signing_key().verifying_key();
        let exchange = self.exchange_secret().public_key();

        let mut material = Vec::with_capacity(PUBLIC_MATERIAL_SIZE);
        material.extend_from_slice(verifying.as_bytes());
        material.extend_from_slice(exchange.as_bytes());

        PublicKey {
            verifying,
            exchange,
            id: ReceiverId::for_material(&material),
        }
    }

    pub(crate) fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.seed)
    }

    pub(crate) fn exchange_secret(&self) -> crypto_box::SecretKey {
        let hk = Hkdf::<Sha256>::new(None, &self.seed);
        let mut okm = Zeroizing::new([0u8; KEY_SIZE]);
        hk.expand(EXCHANGE_KEY_INFO, okm.as_mut())
            .expect("okm length is valid");
        crypto_box::SecretKey::from(*okm)
    }
}

impl PublicKeySource for PrivateKey {
    fn public_material(&self) -> Vec<u8> {
        self.derive_public().material()
    }

    fn receiver_id(&self) -> ReceiverId {
        self.id
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey").field("id", &self.id).finish()
    }
}

impl Serialize for PrivateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_bin_or_b64(&self.seed, serializer)
    }
}

impl<'de> Deserialize<'de> for PrivateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut buf = [0u8; SEED_SIZE];
        deserialize_bin_or_b64(&mut buf, deserializer)?;

        Ok(PrivateKey::from_seed(buf))
    }
}

/// A private key encrypted under a password (Argon2id, then AES-256-GCM).
///
/// The salt is bundled with the ciphertext, so the password is the only
/// input needed to open it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectedPrivateKey {
    salt: Salt,
    #[serde(with = "iv_serde")]
    iv: [u8; IV_SIZE],
    ct: Bytes,
}

mod iv_serde {
    use super::*;

    pub(super) fn serialize<S: Serializer>(
        val: &[u8; IV_SIZE],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serialize_bin_or_b64(val, serializer)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[u8; IV_SIZE], D::Error> {
        let mut buf = [0u8; IV_SIZE];
        deserialize_bin_or_b64(&mut buf, deserializer)?;
        Ok(buf)
    }
}

impl ProtectedPrivateKey {
    /// Decrypts the private key with the given password.
    pub fn open(&self, password: &str) -> Result<PrivateKey, Error> {
        let key = derive_wrapping_key(password.as_bytes(), &self.salt.0);
        let seed = Zeroizing::new(
            aead_decrypt(&key, &self.iv, self.ct.as_ref())
                .map_err(|_| Error::InvalidPrivateKeyPassword)?,
        );

        let seed: [u8; SEED_SIZE] = seed.as_slice().try_into().map_err(|_| {
            Error::MalformedEnvelope("protected key payload of invalid length".to_string())
        })?;

        Ok(PrivateKey::from_seed(seed))
    }
}

/// A freshly generated key pair.
#[derive(Debug, Clone)]
pub struct KeyPair {
    public: PublicKey,
    private: PrivateKey,
}

impl KeyPair {
    /// Generates a new key pair from the given CSPRNG.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let mut seed = [0u8; SEED_SIZE];
        rng.fill_bytes(&mut seed);

        let private = PrivateKey::from_seed(seed);
        seed.zeroize();

        let public = private.public_key();
        Self { public, private }
    }

    /// The public half.
    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    /// The private half.
    pub fn private(&self) -> &PrivateKey {
        &self.private
    }

    /// Splits the pair into its halves.
    pub fn into_parts(self) -> (PublicKey, PrivateKey) {
        (self.public, self.private)
    }
}

impl PublicKeySource for KeyPair {
    fn public_material(&self) -> Vec<u8> {
        self.public.material()
    }

    fn receiver_id(&self) -> ReceiverId {
        self.public.receiver_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receiver_id_stable_across_roundtrip() {
        let mut rng = rand::thread_rng();
        let pair = KeyPair::generate(&mut rng);

        let material = pair.public().material();
        let imported = PublicKey::from_material(&material).unwrap();

        assert_eq!(imported.receiver_id(), pair.public().receiver_id());
        assert_eq!(imported.material(), material);
    }

    #[test]
    fn test_private_key_carries_public_id() {
        let mut rng = rand::thread_rng();
        let pair = KeyPair::generate(&mut rng);

        assert_eq!(pair.private().receiver_id(), pair.public().receiver_id());

        let reimported = PrivateKey::from_material(&pair.private().material()).unwrap();
        assert_eq!(reimported.receiver_id(), pair.public().receiver_id());
    }

    #[test]
    fn test_equal_material_equal_id() {
        let mut rng = rand::thread_rng();
        let pair = KeyPair::generate(&mut rng);

        let a = PublicKey::from_material(&pair.public().material()).unwrap();
        let b = PublicKey::from_material(&pair.public().material()).unwrap();

        assert_eq!(a.receiver_id(), b.receiver_id());
    }

    #[test]
    fn test_bad_material_rejected() {
        assert!(matches!(
            PublicKey::from_material(b"short"),
            Err(Error::InvalidRecipient)
        ));

        let mut rng = rand::thread_rng();
        let pair = KeyPair::generate(&mut rng);
        let truncated = &pair.public().material()[..PUBLIC_MATERIAL_SIZE - 1];
        assert!(matches!(
            PublicKey::from_material(truncated),
            Err(Error::InvalidRecipient)
        ));
    }

    #[test]
    fn test_protected_key_roundtrip() {
        let mut rng = rand::thread_rng();
        let pair = KeyPair::generate(&mut rng);

        let protected = pair.private().protect("correct horse", &mut rng);
        let opened = protected.open("correct horse").unwrap();

        assert_eq!(opened.receiver_id(), pair.private().receiver_id());
        assert_eq!(opened.material(), pair.private().material());
    }

    #[test]
    fn test_protected_key_wrong_password() {
        let mut rng = rand::thread_rng();
        let pair = KeyPair::generate(&mut rng);

        let protected = pair.private().protect("correct horse", &mut rng);

        assert!(matches!(
            protected.open("battery staple"),
            Err(Error::InvalidPrivateKeyPassword)
        ));
    }

    #[test]
    fn test_serialize_public_key_json() {
        let mut rng = rand::thread_rng();
        let pair = KeyPair::generate(&mut rng);

        let encoded = serde_json::to_string(pair.public()).unwrap();
        let decoded: PublicKey = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded.receiver_id(), pair.public().receiver_id());
    }

    #[test]
    fn test_serialize_public_key_bin() {
        let mut rng = rand::thread_rng();
        let pair = KeyPair::generate(&mut rng);

        let encoded = bincode::serialize(pair.public()).unwrap();
        let decoded: PublicKey = bincode::deserialize(&encoded).unwrap();

        assert_eq!(decoded.receiver_id(), pair.public().receiver_id());
    }

    #[test]
    fn test_serialize_private_key_json() {
        let mut rng = rand::thread_rng();
        let pair = KeyPair::generate(&mut rng);

        let encoded = serde_json::to_string(pair.private()).unwrap();
        let decoded: PrivateKey = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded.receiver_id(), pair.private().receiver_id());
    }

    #[test]
    fn test_serialize_protected_key_json() {
        let mut rng = rand::thread_rng();
        let pair = KeyPair::generate(&mut rng);

        let protected = pair.private().protect("pw", &mut rng);
        let encoded = serde_json::to_string(&protected).unwrap();
        let decoded: ProtectedPrivateKey = serde_json::from_str(&encoded).unwrap();

        assert_eq!(
            decoded.open("pw").unwrap().receiver_id(),
            pair.private().receiver_id()
        );
    }

    #[test]
    fn test_serialize_bytes_bin_and_json() {
        let val = Bytes(vec![1, 2, 3, 250]);

        let bin = bincode::serialize(&val).unwrap();
        assert_eq!(bincode::deserialize::<Bytes>(&bin).unwrap(), val);

        let json = serde_json::to_string(&val).unwrap();
        assert_eq!(serde_json::from_str::<Bytes>(&json).unwrap(), val);
    }
}
