//! Envelope header definitions.
//!
//! The header carries everything a recipient needs besides the payload: one
//! wrapped content key per recipient, the symmetric algorithm and mode, and
//! the sealed custom parameters.

use crate::artifacts::{
    deserialize_bin_or_b64, serialize_bin_or_b64, Bytes, ContentKey, EphemeralKey, PrivateKey,
    PublicKey, ReceiverId, Salt,
};
use crate::consts::*;
use crate::error::Error;
use crate::params::CustomParams;
use crate::recipients::{Recipient, RecipientSet};
use crate::util::{aead_decrypt, aead_encrypt, derive_wrapping_key};

use crypto_box::aead::Aead;
use crypto_box::SalsaBox;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use zeroize::Zeroizing;

/// Possible encryption modes.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Copy)]
pub enum Mode {
    /// The payload is a stream, processed in chunks.
    Streaming {
        /// The size of plaintext chunks.
        chunk_size: u32,

        /// Possible size hint about the payload in the form (min, max),
        /// defaults to (0, None).
        ///
        /// Can be used to allocate memory beforehand, saving re-allocations.
        size_hint: (u64, Option<u64>),
    },

    /// The payload is processed fully in memory, its size is known beforehand.
    InMemory {
        /// The size of the payload.
        size: u32,
    },
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Streaming {
            chunk_size: DEFAULT_CHUNK_SIZE,
            size_hint: (0, None),
        }
    }
}

/// An initialization vector (IV).
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct Iv<const N: usize>(pub [u8; N]);

impl<const N: usize> Iv<N> {
    fn random<R: RngCore + CryptoRng>(r: &mut R) -> Self {
        let mut buf = [0u8; N];
        r.fill_bytes(&mut buf);
        Self(buf)
    }
}

// The IV is not secret but we do want to have the possibility to encode it as
// human-readable.
impl<const N: usize> Serialize for Iv<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serialize_bin_or_b64(&self.0, serializer)
    }
}

impl<'de, const N: usize> Deserialize<'de> for Iv<N> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut buf = [0u8; N];
        deserialize_bin_or_b64(&mut buf, deserializer)?;

        Ok(Self(buf))
    }
}

/// Supported symmetric-key encryption algorithms.
#[derive(Serialize, Deserialize, Debug, Eq, PartialEq, Clone, Copy)]
pub enum Algorithm {
    /// AES-256-GCM.
    Aes256Gcm(Iv<IV_SIZE>),
}

impl Algorithm {
    fn new_aes256_gcm<R: RngCore + CryptoRng>(r: &mut R) -> Self {
        Self::Aes256Gcm(Iv::random(r))
    }
}

/// Custom parameters encrypted under the content key.
///
/// Parameters ride inside the envelope's confidentiality boundary: they are
/// only readable by a party that can unwrap the content key.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SealedParams {
    iv: Iv<IV_SIZE>,
    ct: Bytes,
}

impl SealedParams {
    pub(crate) fn seal<R: RngCore + CryptoRng>(
        params: &CustomParams,
        key: &ContentKey,
        rng: &mut R,
    ) -> Result<Self, Error> {
        let iv = Iv::random(rng);
        let encoded = bincode::serialize(params)?;
        let ct = aead_encrypt(key.as_bytes(), &iv.0, &encoded)?;

        Ok(Self {
            iv,
            ct: Bytes(ct),
        })
    }

    pub(crate) fn open(&self, key: &ContentKey) -> Result<CustomParams, Error> {
        let pt = aead_decrypt(key.as_bytes(), &self.iv.0, self.ct.as_ref())
            .map_err(|_| Error::DecryptionFailed)?;

        Ok(bincode::deserialize(&pt)?)
    }

    // Placeholder until the sealer encrypts the real parameters.
    pub(crate) fn unsealed() -> Self {
        Self {
            iv: Iv([0u8; IV_SIZE]),
            ct: Bytes::default(),
        }
    }
}

/// A header contains header data for _all_ recipients.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Header {
    /// Wrapped content keys, one entry per recipient, in insertion order.
    #[serde(rename = "rs")]
    pub recipients: Vec<RecipientInfo>,

    /// The symmetric-key encryption algorithm used.
    pub algo: Algorithm,

    /// The encryption mode.
    #[serde(default)]
    pub mode: Mode,

    /// The sealed custom parameters.
    pub params: SealedParams,
}

/// Contains header data specific to _one_ recipient.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum RecipientInfo {
    /// A key recipient, indexed by receiver id.
    Key(KeyRecipientInfo),

    /// A password recipient.
    Password(PasswordRecipientInfo),
}

/// The content key wrapped under a key recipient's public key.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct KeyRecipientInfo {
    /// The receiver id of the recipient's public key.
    pub id: ReceiverId,

    /// The sender-side ephemeral X25519 public key.
    epk: EphemeralKey,

    /// The wrap nonce.
    nonce: Iv<WRAP_NONCE_SIZE>,

    /// The wrapped content key.
    ct: Bytes,
}

impl KeyRecipientInfo {
    fn wrap<R: RngCore + CryptoRng>(
        key: &ContentKey,
        recipient: &PublicKey,
        rng: &mut R,
    ) -> Result<Self, Error> {
        let ephemeral = crypto_box::SecretKey::generate(rng);
        let epk = EphemeralKey(*ephemeral.public_key().as_bytes());

        let sbox = SalsaBox::new(recipient.exchange(), &ephemeral);
        let nonce = Iv::<WRAP_NONCE_SIZE>::random(rng);
        let ct = sbox.encrypt(&nonce.0.into(), key.as_bytes().as_slice())?;

        Ok(Self {
            id: recipient.receiver_id(),
            epk,
            nonce,
            ct: Bytes(ct),
        })
    }

    /// Unwraps the content key with the recipient's private key.
    pub fn unwrap_key(&self, key: &PrivateKey) -> Result<ContentKey, Error> {
        let epk = crypto_box::PublicKey::from(self.epk.0);
        let sbox = SalsaBox::new(&epk, &key.exchange_secret());

        let pt = Zeroizing::new(
            sbox.decrypt(&self.nonce.0.into(), self.ct.as_ref())
                .map_err(|_| Error::DecryptionFailed)?,
        );

        ContentKey::from_slice(&pt)
    }
}

/// The content key wrapped under a password-derived key.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PasswordRecipientInfo {
    /// The freshly generated key-derivation salt.
    salt: Salt,

    /// The wrap nonce.
    nonce: Iv<IV_SIZE>,

    /// The wrapped content key.
    ct: Bytes,
}

impl PasswordRecipientInfo {
    fn wrap<R: RngCore + CryptoRng>(
        key: &ContentKey,
        password: &str,
        rng: &mut R,
    ) -> Result<Self, Error> {
        let salt = Salt::random(rng);
        let nonce = Iv::<IV_SIZE>::random(rng);

        let wrapping = derive_wrapping_key(password.as_bytes(), &salt.0);
        let ct = aead_encrypt(&wrapping, &nonce.0, key.as_bytes())?;

        Ok(Self {
            salt,
            nonce,
            ct: Bytes(ct),
        })
    }

    /// Unwraps the content key by re-deriving the wrapping key from the
    /// supplied password and the stored salt.
    pub fn unwrap_key(&self, password: &str) -> Result<ContentKey, Error> {
        let wrapping = derive_wrapping_key(password.as_bytes(), &self.salt.0);

        let pt = Zeroizing::new(
            aead_decrypt(&wrapping, &self.nonce.0, self.ct.as_ref())
                .map_err(|_| Error::InvalidPassword)?,
        );

        ContentKey::from_slice(&pt)
    }
}

impl Header {
    /// Creates a new [`Header`]: generates a fresh content key and wraps it
    /// once per recipient.
    pub fn new<R: RngCore + CryptoRng>(
        recipients: &RecipientSet,
        rng: &mut R,
    ) -> Result<(Self, ContentKey), Error> {
        if recipients.is_empty() {
            return Err(Error::NoRecipients);
        }

        let key = ContentKey::generate(rng);

        let infos = recipients
            .iter()
            .map(|recipient| match recipient {
                Recipient::Key(pk) => {
                    KeyRecipientInfo::wrap(&key, pk, rng).map(RecipientInfo::Key)
                }
                Recipient::Password(pw) => {
                    PasswordRecipientInfo::wrap(&key, pw, rng).map(RecipientInfo::Password)
                }
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok((
            Header {
                recipients: infos,
                algo: Algorithm::new_aes256_gcm(rng),
                mode: Mode::default(),
                params: SealedParams::unsealed(),
            },
            key,
        ))
    }

    /// Set the encryption mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Finds the entry for a key recipient by exact receiver-id match.
    pub fn key_recipient(&self, id: &ReceiverId) -> Option<&KeyRecipientInfo> {
        self.recipients.iter().find_map(|info| match info {
            RecipientInfo::Key(k) if &k.id == id => Some(k),
            _ => None,
        })
    }

    /// Finds the first password recipient entry.
    pub fn password_recipient(&self) -> Option<&PasswordRecipientInfo> {
        self.recipients.iter().find_map(|info| match info {
            RecipientInfo::Password(p) => Some(p),
            _ => None,
        })
    }

    /// Serializes the [`Header`] as compact binary format into a [`Write`].
    pub fn into_bytes<W: Write>(self, w: &mut W) -> Result<(), Error> {
        bincode::serialize_into(w, &self).map_err(Error::from)
    }

    /// Deserialize the header from binary format from a [`Read`].
    pub fn from_bytes<R: Read>(r: R) -> Result<Self, Error> {
        bincode::deserialize_from(r).map_err(Error::from)
    }

    /// Serializes the header to a JSON string.
    ///
    /// Should only be used for small headers or development purposes,
    /// or when compactness is not required.
    pub fn to_json(self) -> Result<String, Error> {
        serde_json::to_string(&self).map_err(Error::from)
    }

    /// Deserialize the header from a JSON string.
    pub fn from_json(s: &str) -> Result<Self, Error> {
        serde_json::from_str(s).map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestSetup;

    #[test]
    fn test_enc_dec_json() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let (header, _key) = Header::new(&setup.recipients, &mut rng).unwrap();
        let header2 = header.clone();

        let s = header.to_json().unwrap();
        let decoded = Header::from_json(&s).unwrap();

        assert_eq!(decoded.recipients.len(), 3);
        assert!(decoded
            .key_recipient(&setup.bob.public().receiver_id())
            .is_some());
        assert!(decoded.password_recipient().is_some());

        assert_eq!(&decoded.algo, &header2.algo);
        assert_eq!(&decoded.mode, &header2.mode);
    }

    #[test]
    fn test_enc_dec_binary() {
        use std::io::Cursor;

        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let (header, _key) = Header::new(&setup.recipients, &mut rng).unwrap();
        let header2 = header.clone();

        let mut v = Vec::new();
        header.into_bytes(&mut v).unwrap();

        let decoded = Header::from_bytes(Cursor::new(v)).unwrap();

        assert_eq!(decoded.recipients.len(), 3);
        assert_eq!(&decoded.algo, &header2.algo);
        assert_eq!(&decoded.mode, &header2.mode);
    }

    #[test]
    fn test_round() {
        // Both encodings must unwrap the same content key as the sender.
        use std::io::Cursor;

        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let (header, key) = Header::new(&setup.recipients, &mut rng).unwrap();
        let header2 = header.clone();

        let mut v = Vec::new();
        header.into_bytes(&mut v).unwrap();
        let json = header2.to_json().unwrap();

        let decoded1 = Header::from_bytes(Cursor::new(v)).unwrap();
        let key2 = decoded1
            .key_recipient(&setup.bob.public().receiver_id())
            .unwrap()
            .unwrap_key(setup.bob.private())
            .unwrap();

        let decoded2 = Header::from_json(&json).unwrap();
        let key3 = decoded2
            .password_recipient()
            .unwrap()
            .unwrap_key(&setup.password)
            .unwrap();

        assert_eq!(key.as_bytes(), key2.as_bytes());
        assert_eq!(key.as_bytes(), key3.as_bytes());
    }

    #[test]
    fn test_recipient_order_preserved() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let (header, _key) = Header::new(&setup.recipients, &mut rng).unwrap();

        // TestSetup adds Bob, then Charlie, then a password recipient.
        assert!(matches!(
            &header.recipients[0],
            RecipientInfo::Key(k) if k.id == setup.bob.public().receiver_id()
        ));
        assert!(matches!(
            &header.recipients[1],
            RecipientInfo::Key(k) if k.id == setup.charlie.public().receiver_id()
        ));
        assert!(matches!(&header.recipients[2], RecipientInfo::Password(_)));
    }

    #[test]
    fn test_no_recipients() {
        let mut rng = rand::thread_rng();
        let empty = crate::recipients::RecipientSet::new();

        assert!(matches!(
            Header::new(&empty, &mut rng),
            Err(Error::NoRecipients)
        ));
    }

    #[test]
    fn test_unwrap_with_wrong_key_fails() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let (header, _key) = Header::new(&setup.recipients, &mut rng).unwrap();

        let info = header
            .key_recipient(&setup.bob.public().receiver_id())
            .unwrap();

        assert!(matches!(
            info.unwrap_key(setup.mallory.private()),
            Err(Error::DecryptionFailed)
        ));
    }

    #[test]
    fn test_unwrap_with_wrong_password_fails() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let (header, _key) = Header::new(&setup.recipients, &mut rng).unwrap();

        let info = header.password_recipient().unwrap();

        assert!(matches!(
            info.unwrap_key("not the password"),
            Err(Error::InvalidPassword)
        ));
    }
}
