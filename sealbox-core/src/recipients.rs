//! The recipient directory for one encryption operation.

use crate::artifacts::{PublicKey, PublicKeySource};
use crate::error::Error;

use zeroize::Zeroizing;

/// A single recipient: either the holder of a private key or the holder of a
/// password.
#[derive(Clone)]
pub enum Recipient {
    /// A key recipient, identified by its receiver id.
    Key(PublicKey),
    /// A password recipient. The wrapping key is derived at encryption time
    /// with a fresh salt.
    Password(Zeroizing<String>),
}

impl std::fmt::Debug for Recipient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(k) => f.debug_tuple("Key").field(&k.receiver_id()).finish(),
            Self::Password(_) => f.debug_tuple("Password").field(&"..").finish(),
        }
    }
}

/// An ordered, non-empty-at-encryption-time collection of recipients.
///
/// The set only accumulates state; it never mutates caller-owned key data.
#[derive(Debug, Clone, Default)]
pub struct RecipientSet {
    inner: Vec<Recipient>,
}

impl RecipientSet {
    /// Creates an empty recipient set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key recipient from any public identity.
    ///
    /// The receiver id is derived from the key material; the material is
    /// re-parsed so a bad source fails here rather than at encryption time.
    pub fn add_key(&mut self, source: &impl PublicKeySource) -> Result<(), Error> {
        self.add_key_material(&source.public_material())
    }

    /// Adds a key recipient from encoded public key material.
    ///
    /// Fails with [`Error::InvalidRecipient`] if the material cannot be
    /// parsed as a public key.
    pub fn add_key_material(&mut self, material: &[u8]) -> Result<(), Error> {
        let key = PublicKey::from_material(material)?;
        self.inner.push(Recipient::Key(key));
        Ok(())
    }

    /// Adds a password recipient.
    pub fn add_password(&mut self, password: &str) {
        self.inner
            .push(Recipient::Password(Zeroizing::new(password.to_string())));
    }

    /// Removes all recipients.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Whether the set contains no recipients.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The number of recipients.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates over the recipients in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Recipient> {
        self.inner.iter()
    }
}
