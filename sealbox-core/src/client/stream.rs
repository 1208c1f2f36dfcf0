//! Streaming mode.
//!
//! Applies the same recipient and content-key model as the in-memory mode,
//! but never materializes the whole plaintext or ciphertext. Payload bytes
//! are pulled from a [`DataSource`], re-chunked into fixed-size pieces and
//! pushed into a [`DataSink`] through the "STREAM" construction: every chunk
//! is authenticated on its own, while the running nonce counter chains the
//! chunks together so they can neither be dropped nor reordered.

use crate::artifacts::{ContentKey, PrivateKey, ProtectedPrivateKey, ReceiverId};
use crate::client::*;
use crate::consts::*;
use crate::error::Error;
use crate::params::CustomParams;
use crate::recipients::RecipientSet;
use crate::stream::{DataSink, DataSource};
use crate::util::preamble_checked;

use aead::stream::{DecryptorBE32, EncryptorBE32};
use aes_gcm::Aes256Gcm;
use aes_gcm::KeyInit;
use rand::{CryptoRng, RngCore};

/// Configures a [`Sealer`] to process a payload stream.
#[derive(Debug)]
pub struct SealerStreamConfig {
    /// Plaintext chunk size.
    chunk_size: u32,
    /// AEAD content key.
    key: ContentKey,
    /// AEAD stream nonce.
    nonce: [u8; STREAM_NONCE_SIZE],
}

/// Configures an [`Unsealer`] to process a payload stream.
#[derive(Debug)]
pub struct UnsealerStreamConfig {
    chunk_size: u32,
    /// Payload bytes already pulled while parsing the header.
    pending: Vec<u8>,
}

impl SealerConfig for SealerStreamConfig {}
impl UnsealerConfig for UnsealerStreamConfig {}
impl crate::client::sealed::SealerConfig for SealerStreamConfig {}
impl crate::client::sealed::UnsealerConfig for UnsealerStreamConfig {}

// Pulls from the source until `buf` holds at least `n` bytes or the source
// runs dry. Returns whether `n` was reached.
fn fill_at_least<S: DataSource>(
    source: &mut S,
    buf: &mut Vec<u8>,
    n: usize,
) -> Result<bool, Error> {
    while buf.len() < n && source.has_data() {
        let piece = source.read()?;
        if piece.is_empty() {
            return Err(Error::SourceError);
        }
        buf.extend_from_slice(&piece);
    }

    Ok(buf.len() >= n)
}

impl<'r, R: RngCore + CryptoRng> Sealer<'r, R, SealerStreamConfig> {
    /// Construct a new [`Sealer`] that can process streaming payloads.
    pub fn new(recipients: &RecipientSet, rng: &'r mut R) -> Result<Self, Error> {
        let (header, key) = Header::new(recipients, rng)?;

        let (chunk_size, _) = stream_mode_checked(&header)?;
        let Algorithm::Aes256Gcm(iv) = header.algo;

        let mut nonce = [0u8; STREAM_NONCE_SIZE];
        nonce.copy_from_slice(&iv.0[..STREAM_NONCE_SIZE]);

        Ok(Sealer {
            header,
            params: CustomParams::new(),
            rng,
            config: SealerStreamConfig {
                chunk_size,
                key,
                nonce,
            },
        })
    }

    /// Override the plaintext chunk size.
    pub fn with_chunk_size(mut self, chunk_size: u32) -> Result<Self, Error> {
        if chunk_size == 0 || chunk_size > MAX_CHUNK_SIZE {
            return Err(Error::MalformedEnvelope(
                "chunk size out of range".to_string(),
            ));
        }

        self.config.chunk_size = chunk_size;
        self.header.mode = match self.header.mode {
            Mode::Streaming { size_hint, .. } => Mode::Streaming {
                chunk_size,
                size_hint,
            },
            m => m,
        };

        Ok(self)
    }

    /// Optional: add a size hint.
    ///
    /// This can help the receiver save some reallocations.
    pub fn with_size_hint(mut self, size_hint: (u64, Option<u64>)) -> Self {
        self.header.mode = Mode::Streaming {
            chunk_size: self.config.chunk_size,
            size_hint,
        };

        self
    }

    /// Seals payload data from a [`DataSource`] into a [`DataSink`].
    ///
    /// The source running dry is the sole normal termination condition; a
    /// zero-length read before that is a protocol violation. A sink that
    /// reports a failed medium aborts immediately, leaving prior writes
    /// intact.
    pub fn seal<S, W>(mut self, source: &mut S, sink: &mut W) -> Result<(), Error>
    where
        S: DataSource,
        W: DataSink,
    {
        if !sink.is_good() {
            return Err(Error::SinkUnavailable);
        }

        self.header.params = SealedParams::seal(&self.params, &self.config.key, self.rng)?;

        let header_buf = bincode::serialize(&self.header)?;

        sink.write(&PRELUDE)?;
        sink.write(&VERSION_V1.to_be_bytes())?;
        sink.write(&u32::try_from(header_buf.len())?.to_be_bytes())?;
        sink.write(&header_buf)?;

        let aead = Aes256Gcm::new(self.config.key.as_bytes().into());
        let mut enc = EncryptorBE32::from_aead(aead, &self.config.nonce.into());

        let chunk_len = self.config.chunk_size as usize;
        let mut buf: Vec<u8> = Vec::with_capacity(chunk_len + TAG_SIZE);

        loop {
            fill_at_least(source, &mut buf, chunk_len)?;

            while buf.len() >= chunk_len {
                let rest = buf.split_off(chunk_len);
                let mut chunk = std::mem::replace(&mut buf, rest);

                enc.encrypt_next_in_place(b"", &mut chunk)?;
                sink.write(&chunk)?;

                if !sink.is_good() {
                    return Err(Error::SinkUnavailable);
                }
            }

            if !source.has_data() {
                enc.encrypt_last_in_place(b"", &mut buf)?;
                sink.write(&buf)?;

                if !sink.is_good() {
                    return Err(Error::SinkUnavailable);
                }

                return Ok(());
            }
        }
    }
}

impl<S: DataSource> Unsealer<S, UnsealerStreamConfig> {
    /// Create a new [`Unsealer`] that starts reading from a [`DataSource`].
    ///
    /// Errors with [`Error::MalformedEnvelope`] before any chunk is
    /// processed if the bytestream does not carry a valid header.
    pub fn new(mut source: S) -> Result<Self, Error> {
        let mut pending = Vec::new();

        if !fill_at_least(&mut source, &mut pending, PREAMBLE_SIZE)? {
            return Err(Error::MalformedEnvelope("truncated preamble".to_string()));
        }

        let (version, header_len) = preamble_checked(&pending[..PREAMBLE_SIZE])?;

        if !fill_at_least(&mut source, &mut pending, PREAMBLE_SIZE + header_len)? {
            return Err(Error::MalformedEnvelope("truncated header".to_string()));
        }

        let header: Header =
            bincode::deserialize(&pending[PREAMBLE_SIZE..PREAMBLE_SIZE + header_len])?;
        pending.drain(..PREAMBLE_SIZE + header_len);

        let (chunk_size, _) = stream_mode_checked(&header)?;

        Ok(Unsealer {
            version,
            header,
            r: source,
            config: UnsealerStreamConfig {
                chunk_size,
                pending,
            },
        })
    }

    /// Unseal the remaining data (which is now only payload) into a
    /// [`DataSink`], for the key recipient with the given receiver id.
    ///
    /// Returns the decrypted custom parameters.
    pub fn unseal<W: DataSink>(
        self,
        id: &ReceiverId,
        key: &PrivateKey,
        sink: &mut W,
    ) -> Result<CustomParams, Error> {
        let info = self
            .header
            .key_recipient(id)
            .ok_or(Error::RecipientNotFound)?;

        let content_key = info.unwrap_key(key)?;
        self.decrypt_payload(content_key, sink)
    }

    /// Unseal with a password-protected private key.
    pub fn unseal_protected<W: DataSink>(
        self,
        id: &ReceiverId,
        key: &ProtectedPrivateKey,
        password: &str,
        sink: &mut W,
    ) -> Result<CustomParams, Error> {
        let key = key.open(password)?;
        self.unseal(id, &key, sink)
    }

    /// Unseal for a password recipient.
    pub fn unseal_with_password<W: DataSink>(
        self,
        password: &str,
        sink: &mut W,
    ) -> Result<CustomParams, Error> {
        let info = self
            .header
            .password_recipient()
            .ok_or(Error::RecipientNotFound)?;

        let content_key = info.unwrap_key(password)?;
        self.decrypt_payload(content_key, sink)
    }

    fn decrypt_payload<W: DataSink>(
        mut self,
        key: ContentKey,
        sink: &mut W,
    ) -> Result<CustomParams, Error> {
        if !sink.is_good() {
            return Err(Error::SinkUnavailable);
        }

        let params = self.header.params.open(&key)?;

        let Algorithm::Aes256Gcm(iv) = self.header.algo;
        let nonce: [u8; STREAM_NONCE_SIZE] = iv.0[..STREAM_NONCE_SIZE].try_into()?;

        let aead = Aes256Gcm::new(key.as_bytes().into());
        let mut dec = DecryptorBE32::from_aead(aead, &nonce.into());

        // Every full chunk travels as chunk_size + tag bytes; the final
        // chunk is always shorter than that, even when the plaintext is an
        // exact multiple of the chunk size (it is then just a tag).
        let piece_len = self.config.chunk_size as usize + TAG_SIZE;
        let mut buf = std::mem::take(&mut self.config.pending);

        loop {
            fill_at_least(&mut self.r, &mut buf, piece_len)?;

            while buf.len() >= piece_len {
                let rest = buf.split_off(piece_len);
                let mut chunk = std::mem::replace(&mut buf, rest);

                dec.decrypt_next_in_place(b"", &mut chunk)
                    .map_err(|_| Error::DecryptionFailed)?;
                sink.write(&chunk)?;

                if !sink.is_good() {
                    return Err(Error::SinkUnavailable);
                }
            }

            if !self.r.has_data() {
                dec.decrypt_last_in_place(b"", &mut buf)
                    .map_err(|_| Error::DecryptionFailed)?;
                sink.write(&buf)?;

                if !sink.is_good() {
                    return Err(Error::SinkUnavailable);
                }

                return Ok(params);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Sealer, SealerStreamConfig, Unsealer, UnsealerStreamConfig};
    use crate::client::mem::{SealerMemoryConfig, UnsealerMemoryConfig};
    use crate::error::Error;
    use crate::params::CustomParams;
    use crate::stream::{BytesSink, BytesSource, DataSink, DataSource};
    use crate::test::TestSetup;
    use crate::TAG_SIZE;
    use rand::RngCore;

    const CHUNK: u32 = 1024;

    const LENGTHS: &[u32] = &[
        0,
        1,
        512,
        CHUNK - 3,
        CHUNK,
        CHUNK + 3,
        3 * CHUNK,
        3 * CHUNK + 16,
        3 * CHUNK - 17,
    ];

    fn seal_helper(setup: &TestSetup, plain: &[u8]) -> Vec<u8> {
        let mut rng = rand::thread_rng();

        let mut source = BytesSource::new(plain).with_chunk(313);
        let mut sink = BytesSink::new();

        Sealer::<_, SealerStreamConfig>::new(&setup.recipients, &mut rng)
            .unwrap()
            .with_chunk_size(CHUNK)
            .unwrap()
            .seal(&mut source, &mut sink)
            .unwrap();

        sink.into_inner()
    }

    fn unseal_helper(setup: &TestSetup, ct: &[u8]) -> Vec<u8> {
        let source = BytesSource::new(ct).with_chunk(497);
        let mut sink = BytesSink::new();

        let unsealer = Unsealer::<_, UnsealerStreamConfig>::new(source).unwrap();

        unsealer
            .unseal(
                &setup.bob.public().receiver_id(),
                setup.bob.private(),
                &mut sink,
            )
            .unwrap();

        sink.into_inner()
    }

    fn seal_and_unseal(setup: &TestSetup, plain: Vec<u8>) {
        let ct = seal_helper(setup, &plain);
        let plain2 = unseal_helper(setup, &ct);

        assert_eq!(&plain, &plain2);
    }

    fn rand_vec(length: usize) -> Vec<u8> {
        let mut vec = vec![0u8; length];
        rand::thread_rng().fill_bytes(&mut vec);
        vec
    }

    #[test]
    fn test_reflection_seal_unsealer() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        for l in LENGTHS {
            seal_and_unseal(&setup, rand_vec(*l as usize));
        }
    }

    #[test]
    fn test_unseal_with_password() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let plain = rand_vec(4000);
        let ct = seal_helper(&setup, &plain);

        let source = BytesSource::new(&ct);
        let mut sink = BytesSink::new();
        Unsealer::<_, UnsealerStreamConfig>::new(source)
            .unwrap()
            .unseal_with_password(&setup.password, &mut sink)
            .unwrap();

        assert_eq!(sink.into_inner(), plain);
    }

    #[test]
    fn test_wrong_password_stream() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let ct = seal_helper(&setup, b"payload");

        let source = BytesSource::new(&ct);
        let mut sink = BytesSink::new();
        let res = Unsealer::<_, UnsealerStreamConfig>::new(source)
            .unwrap()
            .unseal_with_password("wrong password", &mut sink);

        assert!(matches!(res, Err(Error::InvalidPassword)));
        assert!(sink.into_inner().is_empty());
    }

    #[test]
    fn test_custom_params_through_stream() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let mut params = CustomParams::new();
        params.set_string("origin", "stream test");

        let mut source = BytesSource::new(b"payload");
        let mut sink = BytesSink::new();
        Sealer::<_, SealerStreamConfig>::new(&setup.recipients, &mut rng)
            .unwrap()
            .with_params(params)
            .seal(&mut source, &mut sink)
            .unwrap();

        let ct = sink.into_inner();
        let mut out = BytesSink::new();
        let params = Unsealer::<_, UnsealerStreamConfig>::new(BytesSource::new(&ct))
            .unwrap()
            .unseal(
                &setup.bob.public().receiver_id(),
                setup.bob.private(),
                &mut out,
            )
            .unwrap();

        assert_eq!(params.string("origin"), Some("stream test"));
        assert_eq!(out.into_inner(), b"payload");
    }

    #[test]
    fn test_corrupt_header() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let mut ct = seal_helper(&setup, &rand_vec(100));

        // Flip a byte that is guaranteed to be in the preamble.
        ct[2] = !ct[2];

        let res = Unsealer::<_, UnsealerStreamConfig>::new(BytesSource::new(&ct));
        assert!(matches!(res, Err(Error::MalformedEnvelope(_))));
    }

    #[test]
    fn test_corrupt_payload() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let mut ct = seal_helper(&setup, &rand_vec(100));

        // Flip a byte that is guaranteed to be in the encrypted payload.
        let ct_len = ct.len();
        ct[ct_len - TAG_SIZE - 5] = !ct[ct_len - TAG_SIZE - 5];

        let mut sink = BytesSink::new();
        let res = Unsealer::<_, UnsealerStreamConfig>::new(BytesSource::new(&ct))
            .unwrap()
            .unseal(
                &setup.bob.public().receiver_id(),
                setup.bob.private(),
                &mut sink,
            );

        assert!(matches!(res, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_corrupt_tag() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let mut ct = seal_helper(&setup, &rand_vec(100));

        let len = ct.len();
        ct[len - 5] = !ct[len - 5];

        let mut sink = BytesSink::new();
        let res = Unsealer::<_, UnsealerStreamConfig>::new(BytesSource::new(&ct))
            .unwrap()
            .unseal(
                &setup.bob.public().receiver_id(),
                setup.bob.private(),
                &mut sink,
            );

        assert!(matches!(res, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_zero_length_stream() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let ct = seal_helper(&setup, b"");
        let plain = unseal_helper(&setup, &ct);

        assert!(plain.is_empty());
    }

    #[test]
    fn test_cross_mode_plaintext_equality() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let plain = rand_vec(10_000);

        let streamed = seal_helper(&setup, &plain);
        let from_stream = unseal_helper(&setup, &streamed);

        let block = crate::client::Sealer::<_, SealerMemoryConfig>::new(&setup.recipients, &mut rng)
            .unwrap()
            .seal(&plain)
            .unwrap();
        let (from_block, _) =
            crate::client::Unsealer::<_, UnsealerMemoryConfig>::new(block)
                .unwrap()
                .unseal(&setup.bob.public().receiver_id(), setup.bob.private())
                .unwrap();

        assert_eq!(from_stream, plain);
        assert_eq!(from_block, plain);
    }

    struct MisbehavingSource {
        polled: bool,
    }

    impl DataSource for MisbehavingSource {
        fn has_data(&mut self) -> bool {
            true
        }

        fn read(&mut self) -> Result<Vec<u8>, Error> {
            // Claims to have data but returns an empty piece.
            self.polled = true;
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_empty_read_is_protocol_violation() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let mut source = MisbehavingSource { polled: false };
        let mut sink = BytesSink::new();

        let res = Sealer::<_, SealerStreamConfig>::new(&setup.recipients, &mut rng)
            .unwrap()
            .seal(&mut source, &mut sink);

        assert!(matches!(res, Err(Error::SourceError)));
        assert!(source.polled);
    }

    struct FailingSink {
        written: usize,
        budget: usize,
    }

    impl DataSink for FailingSink {
        fn is_good(&self) -> bool {
            self.written <= self.budget
        }

        fn write(&mut self, data: &[u8]) -> Result<(), Error> {
            if self.written > self.budget {
                return Err(Error::SinkUnavailable);
            }
            self.written += data.len();
            Ok(())
        }
    }

    #[test]
    fn test_failing_sink_aborts() {
        let mut rng = rand::thread_rng();
        let setup = TestSetup::new(&mut rng);

        let plain = rand_vec(50_000);
        let mut source = BytesSource::new(&plain);
        let mut sink = FailingSink {
            written: 0,
            budget: 2048,
        };

        let res = Sealer::<_, SealerStreamConfig>::new(&setup.recipients, &mut rng)
            .unwrap()
            .with_chunk_size(CHUNK)
            .unwrap()
            .seal(&mut source, &mut sink);

        assert!(matches!(res, Err(Error::SinkUnavailable)));
    }
}
