//! Blocking data source and sink abstractions.
//!
//! The streaming cipher and signer pull plaintext from a [`DataSource`] and
//! push output into a [`DataSink`]. Both sides are blocking: a read or write
//! suspends the calling thread until data is available or the underlying
//! medium fails. Cancellation is external; the caller simply stops pulling
//! and pushing.

use crate::error::Error;

use std::io::{BufRead, BufReader, Read, Write};

/// Default size of the pieces pulled from io-backed sources (64 KiB).
const IO_CHUNK_SIZE: usize = 64 * 1024;

/// A pull-based byte source.
///
/// `has_data` must be consulted before every `read`; once it returns false,
/// `read` must not be called again. A `read` that returns an empty buffer
/// while `has_data` holds is a protocol violation and surfaces as
/// [`Error::SourceError`] to consumers.
pub trait DataSource {
    /// Whether another `read` will yield data.
    fn has_data(&mut self) -> bool;

    /// Pulls the next piece of data.
    fn read(&mut self) -> Result<Vec<u8>, Error>;
}

/// A push-based byte sink.
///
/// Callers must check `is_good` before the first `write` and may check after
/// any write to detect a failed medium. Writes that already happened are
/// never rolled back.
pub trait DataSink {
    /// Whether the underlying medium accepts further writes.
    fn is_good(&self) -> bool;

    /// Pushes a piece of data.
    fn write(&mut self, data: &[u8]) -> Result<(), Error>;
}

/// A [`DataSource`] over an in-memory byte slice.
#[derive(Debug)]
pub struct BytesSource<'a> {
    data: &'a [u8],
    chunk: usize,
}

impl<'a> BytesSource<'a> {
    /// Creates a source over the given bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            chunk: IO_CHUNK_SIZE,
        }
    }

    /// Overrides the piece size handed out per `read`.
    pub fn with_chunk(mut self, chunk: usize) -> Self {
        assert!(chunk > 0);
        self.chunk = chunk;
        self
    }
}

impl DataSource for BytesSource<'_> {
    fn has_data(&mut self) -> bool {
        !self.data.is_empty()
    }

    fn read(&mut self) -> Result<Vec<u8>, Error> {
        let n = self.chunk.min(self.data.len());
        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        Ok(head.to_vec())
    }
}

/// A [`DataSink`] collecting into an in-memory buffer.
#[derive(Debug, Default)]
pub struct BytesSink {
    buf: Vec<u8>,
}

impl BytesSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the sink and returns the collected bytes.
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

impl DataSink for BytesSink {
    fn is_good(&self) -> bool {
        true
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Error> {
        self.buf.extend_from_slice(data);
        Ok(())
    }
}

/// A [`DataSource`] over any [`std::io::Read`].
///
/// Io failures are folded into [`Error::SourceError`].
#[derive(Debug)]
pub struct ReadSource<R: Read> {
    inner: BufReader<R>,
    chunk: usize,
    failed: bool,
}

impl<R: Read> ReadSource<R> {
    /// Creates a source over the given reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            chunk: IO_CHUNK_SIZE,
            failed: false,
        }
    }
}

impl<R: Read> DataSource for ReadSource<R> {
    fn has_data(&mut self) -> bool {
        if self.failed {
            // Surface the failure on the next read.
            return true;
        }

        match self.inner.fill_buf() {
            Ok(buf) => !buf.is_empty(),
            Err(_) => {
                self.failed = true;
                true
            }
        }
    }

    fn read(&mut self) -> Result<Vec<u8>, Error> {
        if self.failed {
            return Err(Error::SourceError);
        }

        let mut buf = vec![0u8; self.chunk];
        let n = self.inner.read(&mut buf).map_err(|_| Error::SourceError)?;
        buf.truncate(n);
        Ok(buf)
    }
}

/// A [`DataSink`] over any [`std::io::Write`].
///
/// Io failures are folded into [`Error::SinkUnavailable`] and latch the sink
/// into a bad state.
#[derive(Debug)]
pub struct WriteSink<W: Write> {
    inner: W,
    good: bool,
}

impl<W: Write> WriteSink<W> {
    /// Creates a sink over the given writer.
    pub fn new(inner: W) -> Self {
        Self { inner, good: true }
    }

    /// Flushes the underlying writer.
    pub fn flush(&mut self) -> Result<(), Error> {
        self.inner.flush().map_err(|_| {
            self.good = false;
            Error::SinkUnavailable
        })
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> DataSink for WriteSink<W> {
    fn is_good(&self) -> bool {
        self.good
    }

    fn write(&mut self, data: &[u8]) -> Result<(), Error> {
        if !self.good {
            return Err(Error::SinkUnavailable);
        }

        self.inner.write_all(data).map_err(|_| {
            self.good = false;
            Error::SinkUnavailable
        })
    }
}
