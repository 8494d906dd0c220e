//! Ordered byte channel to the backend.
//!
//! The channel knows nothing about opcodes. It writes scalars, runs of
//! scalars, raw bytes, and length-prefixed text, each as one complete
//! write. Short writes are continued until done; any other failure is
//! returned to the caller and the data is not re-sent.

use std::io::Write;
use std::net::TcpStream;

use tracing::{instrument, trace};

use super::{TransportConfig, TransportError, WireScalar, put_text};

/// Write-only byte channel over any [`Write`] sink.
#[derive(Debug)]
pub struct Channel<W = TcpStream> {
    writer: W,
    scratch: Vec<u8>,
    bytes_sent: u64,
}

impl Channel<TcpStream> {
    /// Open a TCP connection to the configured endpoint.
    pub fn connect(config: &TransportConfig) -> Result<Self, TransportError> {
        let stream = super::socket::connect(config)?;
        Ok(Self::from_writer(stream))
    }

    /// Shut down both directions of the underlying socket.
    pub fn shutdown(&self) -> Result<(), TransportError> {
        self.writer
            .shutdown(std::net::Shutdown::Both)
            .map_err(TransportError::Write)
    }
}

impl<W: Write> Channel<W> {
    /// Wrap an already-open sink.
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer,
            scratch: Vec::new(),
            bytes_sent: 0,
        }
    }

    /// Send one scalar in its fixed-width encoding.
    pub fn send_scalar<S: WireScalar>(&mut self, value: S) -> Result<(), TransportError> {
        self.scratch.clear();
        value.put(&mut self.scratch);
        self.write_scratch()
    }

    /// Send `values` back to back, with no count prefix.
    pub fn send_raw<S: WireScalar>(&mut self, values: &[S]) -> Result<(), TransportError> {
        self.scratch.clear();
        self.scratch.reserve(values.len() * S::WIDTH);
        for &value in values {
            value.put(&mut self.scratch);
        }
        self.write_scratch()
    }

    /// Send `text` as a u64 byte length followed by the raw bytes.
    pub fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        self.scratch.clear();
        self.scratch.reserve(8 + text.len());
        put_text(text, &mut self.scratch);
        self.write_scratch()
    }

    /// Send bytes verbatim.
    #[instrument(level = "trace", skip(self, bytes), fields(len = bytes.len()))]
    pub fn send_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        write_fully(&mut self.writer, bytes)?;
        self.bytes_sent += bytes.len() as u64;
        Ok(())
    }

    /// Flush any buffering in the sink.
    pub fn flush(&mut self) -> Result<(), TransportError> {
        self.writer.flush().map_err(TransportError::Write)
    }

    /// Total bytes handed to the sink so far.
    #[must_use]
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    /// Borrow the sink.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Recover the sink.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_scratch(&mut self) -> Result<(), TransportError> {
        write_fully(&mut self.writer, &self.scratch)?;
        self.bytes_sent += self.scratch.len() as u64;
        Ok(())
    }
}

fn write_fully<W: Write>(writer: &mut W, bytes: &[u8]) -> Result<(), TransportError> {
    // write_all continues after short writes and Interrupted.
    writer.write_all(bytes).map_err(|err| {
        trace!(error = %err, len = bytes.len(), "write failed");
        TransportError::Write(err)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Accepts at most `chunk` bytes per call and interrupts every other call.
    struct Trickle {
        written: Vec<u8>,
        chunk: usize,
        calls: usize,
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls % 2 == 0 {
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            let n = buf.len().min(self.chunk);
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Refuses every write.
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_send_scalar_and_raw() {
        let mut channel = Channel::from_writer(Vec::new());
        channel.send_scalar(7u64).unwrap();
        channel.send_raw(&[1.0f64, -2.5][..]).unwrap();

        let mut expected = 7u64.to_ne_bytes().to_vec();
        expected.extend_from_slice(&1.0f64.to_ne_bytes());
        expected.extend_from_slice(&(-2.5f64).to_ne_bytes());
        assert_eq!(channel.get_ref(), &expected);
        assert_eq!(channel.bytes_sent(), 24);
    }

    #[test]
    fn test_send_text_framing() {
        let mut channel = Channel::from_writer(Vec::new());
        channel.send_text("Data").unwrap();
        channel.send_text("").unwrap();

        let mut expected = 4u64.to_ne_bytes().to_vec();
        expected.extend_from_slice(b"Data");
        expected.extend_from_slice(&0u64.to_ne_bytes());
        assert_eq!(channel.into_inner(), expected);
    }

    #[test]
    fn test_send_text_matches_frame_strings() {
        let mut channel = Channel::from_writer(Vec::new());
        channel.send_text("/tmp/plots.png").unwrap();

        let frame = crate::protocol::encode(&crate::protocol::Command::SaveFig {
            path: "/tmp/plots.png".into(),
        });
        assert_eq!(channel.get_ref()[..], frame[8..]);
    }

    #[test]
    fn test_short_writes_are_continued() {
        let mut channel = Channel::from_writer(Trickle {
            written: Vec::new(),
            chunk: 3,
            calls: 0,
        });
        channel.send_text("/tmp/plots.png").unwrap();

        let written = channel.into_inner().written;
        assert_eq!(written.len(), 8 + 14);
        assert_eq!(&written[8..], b"/tmp/plots.png");
    }

    #[test]
    fn test_write_failure_is_reported() {
        let mut channel = Channel::from_writer(Broken);
        let result = channel.send_scalar(1u64);
        assert!(matches!(result, Err(TransportError::Write(_))));
        assert_eq!(channel.bytes_sent(), 0);
    }
}
