//! Plot client: one method per protocol command.
//!
//! Every method encodes exactly one frame (composites encode a fixed
//! sequence) and hands it to the transport as a single write. The client
//! validates nothing: referencing a slot that was never stored, or sending
//! an empty key, is only noticed by the backend, if at all.
//!
//! Every send takes `&mut self`, so frames from one client never
//! interleave. Share it behind a `Mutex` when several threads must send.

use std::borrow::Cow;
use std::io::Write;
use std::net::TcpStream;
use std::time::Instant;

use bytes::BytesMut;
use tracing::{debug, instrument, trace, warn};

use crate::protocol::metrics::Metrics;
use crate::protocol::{Command, Error, Result, Series, Value, X_SLOT, Y_SLOT, encode_into};
use crate::transport::{Channel, TransportConfig};

/// Client for a remote plotting backend.
///
/// Construction only records configuration; [`PlotClient::connect`] opens
/// the connection. Commands sent before that fail with
/// [`Error::NotConnected`].
#[derive(Debug)]
pub struct PlotClient<W = TcpStream> {
    config: TransportConfig,
    channel: Option<Channel<W>>,
    frame: BytesMut,
}

impl PlotClient<TcpStream> {
    /// Create an unconnected client.
    #[must_use]
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config,
            channel: None,
            frame: BytesMut::new(),
        }
    }

    /// Connect to the configured backend.
    ///
    /// Does nothing if the client is already connected.
    #[instrument(level = "debug", skip(self), fields(endpoint = %self.config.endpoint()))]
    pub fn connect(&mut self) -> Result<()> {
        if self.channel.is_some() {
            debug!("already connected");
            return Ok(());
        }

        let channel = Channel::connect(&self.config)?;
        self.channel = Some(channel);
        Ok(())
    }

    /// Shut down and drop the connection.
    ///
    /// This is separate from [`PlotClient::exit`], which only tells the
    /// backend to stop reading.
    pub fn close(&mut self) -> Result<()> {
        if let Some(channel) = self.channel.take() {
            debug!(bytes_sent = channel.bytes_sent(), "closing connection");
            channel.shutdown()?;
        }
        Ok(())
    }
}

impl<W: Write> PlotClient<W> {
    /// Create a client that writes frames into an already-open sink.
    pub fn from_writer(writer: W) -> Self {
        Self {
            config: TransportConfig::default(),
            channel: Some(Channel::from_writer(writer)),
            frame: BytesMut::new(),
        }
    }

    /// Configuration this client was created with.
    #[must_use]
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Whether a transport is attached.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.channel.is_some()
    }

    /// Borrow the underlying sink, if connected.
    pub fn get_ref(&self) -> Option<&W> {
        self.channel.as_ref().map(Channel::get_ref)
    }

    /// Recover the underlying sink, if connected.
    pub fn into_inner(self) -> Option<W> {
        self.channel.map(Channel::into_inner)
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<()> {
        let channel = self.channel.as_mut().ok_or(Error::NotConnected)?;
        channel.flush()?;
        Ok(())
    }

    /// Encode and send one pre-built frame.
    ///
    /// A failed write may leave part of the frame on the wire, so the
    /// connection is dropped and later commands fail with
    /// [`Error::NotConnected`] until the caller reconnects.
    pub fn send(&mut self, command: &Command<'_>) -> Result<()> {
        let channel = self.channel.as_mut().ok_or(Error::NotConnected)?;
        let opcode = command.opcode();

        self.frame.clear();
        encode_into(command, &mut self.frame);

        let started = Instant::now();
        match channel.send_bytes(&self.frame) {
            Ok(()) => {
                Metrics::record_frame(opcode, self.frame.len(), started.elapsed());
                trace!(%opcode, len = self.frame.len(), "frame sent");
                Ok(())
            }
            Err(err) => {
                Metrics::record_error();
                warn!(%opcode, error = %err, "frame send failed, dropping connection");
                self.channel = None;
                Err(err.into())
            }
        }
    }

    // --- Atomic commands ---

    /// Drop every buffer stored on the backend.
    pub fn clear_buffers(&mut self) -> Result<()> {
        self.send(&Command::ClearBuffers)
    }

    /// Close all figures on the backend.
    pub fn clear_fig(&mut self) -> Result<()> {
        self.send(&Command::ClearFig)
    }

    /// Store `value` in buffer `slot`. The data belongs to the backend afterwards.
    pub fn store<'v>(&mut self, slot: u64, value: impl Into<Value<'v>>) -> Result<()> {
        self.send(&Command::Store {
            slot,
            value: value.into(),
        })
    }

    /// Line plot of slot `y` against slot `x`, without a label.
    pub fn plot(&mut self, x: u64, y: u64) -> Result<()> {
        self.send(&Command::Plot(Series::new(x, y)))
    }

    /// Line plot of slot `y` against slot `x` with a legend label.
    pub fn plot_labeled(&mut self, x: u64, y: u64, label: &str) -> Result<()> {
        self.send(&Command::Plot(Series::labeled(x, y, label)))
    }

    /// Scatter plot of slot `y` against slot `x`, without a label.
    pub fn scatter(&mut self, x: u64, y: u64) -> Result<()> {
        self.send(&Command::Scatter(Series::new(x, y)))
    }

    /// Scatter plot of slot `y` against slot `x` with a legend label.
    pub fn scatter_labeled(&mut self, x: u64, y: u64, label: &str) -> Result<()> {
        self.send(&Command::Scatter(Series::labeled(x, y, label)))
    }

    /// Save the current figure to `path` on the backend's filesystem.
    pub fn save_fig(&mut self, path: &str) -> Result<()> {
        self.send(&Command::SaveFig {
            path: Cow::Borrowed(path),
        })
    }

    /// Show the current figure.
    pub fn show_fig(&mut self) -> Result<()> {
        self.send(&Command::ShowFig)
    }

    /// Open a figure of the given size. Zero for either lets the backend choose.
    pub fn make_fig(&mut self, width: f64, height: f64) -> Result<()> {
        self.send(&Command::MakeFig { width, height })
    }

    /// Clear the pending plot options.
    pub fn reset_opt(&mut self) -> Result<()> {
        self.send(&Command::ResetOpt)
    }

    /// Add a keyword option applied to subsequent plots.
    pub fn add_opt<'v>(&mut self, key: &str, value: impl Into<Value<'v>>) -> Result<()> {
        self.send(&Command::AddOpt {
            key: Cow::Borrowed(key),
            value: value.into(),
        })
    }

    /// Set the x axis range.
    pub fn xlim(&mut self, min: f64, max: f64) -> Result<()> {
        self.send(&Command::XLim { min, max })
    }

    /// Set the y axis range.
    pub fn ylim(&mut self, min: f64, max: f64) -> Result<()> {
        self.send(&Command::YLim { min, max })
    }

    /// Draw the legend.
    pub fn legend(&mut self) -> Result<()> {
        self.send(&Command::Legend)
    }

    /// Set both axis labels. The backend skips empty ones.
    pub fn axis_labels(&mut self, x: &str, y: &str) -> Result<()> {
        self.send(&Command::AxisLabels {
            x: Cow::Borrowed(x),
            y: Cow::Borrowed(y),
        })
    }

    /// Set the figure title.
    pub fn title(&mut self, text: &str) -> Result<()> {
        self.send(&Command::Title(Cow::Borrowed(text)))
    }

    /// Tell the backend to stop reading. The connection stays open.
    pub fn exit(&mut self) -> Result<()> {
        self.send(&Command::Exit)?;
        debug!("exit sent");
        Ok(())
    }

    // --- Composite commands ---

    /// Start from a clean figure: `ClearFig`, `ClearBuffers`, `ResetOpt`, `MakeFig`.
    pub fn new_figure(&mut self, width: f64, height: f64) -> Result<()> {
        self.clear_fig()?;
        self.clear_buffers()?;
        self.reset_opt()?;
        self.make_fig(width, height)
    }

    /// Store x values in [`X_SLOT`].
    pub fn store_x(&mut self, values: &[f64]) -> Result<()> {
        self.store(X_SLOT, values)
    }

    /// Store y values in [`Y_SLOT`].
    pub fn store_y(&mut self, values: &[f64]) -> Result<()> {
        self.store(Y_SLOT, values)
    }

    /// Plot [`Y_SLOT`] against [`X_SLOT`]; an empty label sends no label.
    pub fn plot_xy(&mut self, label: &str) -> Result<()> {
        if label.is_empty() {
            self.plot(X_SLOT, Y_SLOT)
        } else {
            self.plot_labeled(X_SLOT, Y_SLOT, label)
        }
    }

    /// Scatter [`Y_SLOT`] against [`X_SLOT`]; an empty label sends no label.
    pub fn scatter_xy(&mut self, label: &str) -> Result<()> {
        if label.is_empty() {
            self.scatter(X_SLOT, Y_SLOT)
        } else {
            self.scatter_labeled(X_SLOT, Y_SLOT, label)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Opcode, decode_stream, encode};
    use crate::transport::TransportError;
    use bytes::Bytes;
    use std::io;

    fn recorder() -> PlotClient<Vec<u8>> {
        PlotClient::from_writer(Vec::new())
    }

    fn wire(client: PlotClient<Vec<u8>>) -> Vec<u8> {
        client.into_inner().unwrap()
    }

    fn frames(client: PlotClient<Vec<u8>>) -> Vec<Command<'static>> {
        decode_stream(Bytes::from(wire(client))).unwrap()
    }

    #[test]
    fn test_commands_before_connect_fail() {
        let mut client = PlotClient::new(TransportConfig::default());
        assert!(!client.is_connected());
        assert!(matches!(client.clear_fig(), Err(Error::NotConnected)));
        assert!(matches!(client.flush(), Err(Error::NotConnected)));
    }

    #[test]
    fn test_plot_xy_without_label_matches_plot() {
        let mut shortcut = recorder();
        shortcut.plot_xy("").unwrap();

        let mut direct = recorder();
        direct.plot(1, 2).unwrap();

        assert_eq!(wire(shortcut), wire(direct));
    }

    #[test]
    fn test_plot_xy_with_label_matches_plot_labeled() {
        let mut shortcut = recorder();
        shortcut.plot_xy("Data").unwrap();

        let mut direct = recorder();
        direct.plot_labeled(1, 2, "Data").unwrap();

        assert_eq!(wire(shortcut), wire(direct));
    }

    #[test]
    fn test_scatter_xy_label_fallback() {
        let mut client = recorder();
        client.scatter_xy("").unwrap();
        client.scatter_xy("Points").unwrap();

        assert_eq!(
            frames(client),
            vec![
                Command::Scatter(Series::new(1, 2)),
                Command::Scatter(Series::labeled(1, 2, "Points")),
            ]
        );
    }

    #[test]
    fn test_new_figure_sequence() {
        let mut client = recorder();
        client.new_figure(8.0, 6.0).unwrap();

        assert_eq!(
            frames(client),
            vec![
                Command::ClearFig,
                Command::ClearBuffers,
                Command::ResetOpt,
                Command::MakeFig {
                    width: 8.0,
                    height: 6.0
                },
            ]
        );
    }

    #[test]
    fn test_store_then_plot_scenario() {
        let mut client = recorder();
        client.store(1, &[0.0, 0.1, 0.2][..]).unwrap();
        client.store(2, &[0.0, 0.0998, 0.1987][..]).unwrap();
        client.plot_labeled(1, 2, "Data").unwrap();

        let mut expected = encode(&Command::Store {
            slot: 1,
            value: Value::from(vec![0.0, 0.1, 0.2]),
        });
        expected.extend(encode(&Command::Store {
            slot: 2,
            value: Value::from(vec![0.0, 0.0998, 0.1987]),
        }));
        expected.extend(encode(&Command::Plot(Series::labeled(1, 2, "Data"))));

        assert_eq!(wire(client), expected);
    }

    #[test]
    fn test_store_x_and_y_use_fixed_slots() {
        let mut client = recorder();
        client.store_x(&[1.0, 2.0]).unwrap();
        client.store_y(&[3.0]).unwrap();

        let decoded = frames(client);
        assert!(matches!(decoded[0], Command::Store { slot: 1, .. }));
        assert!(matches!(decoded[1], Command::Store { slot: 2, .. }));
    }

    #[test]
    fn test_limits_emit_opcodes() {
        let mut client = recorder();
        client.xlim(0.0, 10.0).unwrap();
        client.ylim(-1.0, 1.0).unwrap();

        let opcodes: Vec<Opcode> = frames(client).iter().map(Command::opcode).collect();
        assert_eq!(opcodes, vec![Opcode::XLim, Opcode::YLim]);
    }

    #[test]
    fn test_options_and_labels() {
        let mut client = recorder();
        client.reset_opt().unwrap();
        client.add_opt("c", "black").unwrap();
        client.add_opt("linewidth", 2.0).unwrap();
        client.axis_labels("", "Y axis?").unwrap();
        client.title("My Figure!").unwrap();
        client.legend().unwrap();
        client.show_fig().unwrap();

        assert_eq!(
            frames(client),
            vec![
                Command::ResetOpt,
                Command::AddOpt {
                    key: "c".into(),
                    value: Value::from("black"),
                },
                Command::AddOpt {
                    key: "linewidth".into(),
                    value: Value::Scalar(2.0),
                },
                Command::AxisLabels {
                    x: "".into(),
                    y: "Y axis?".into(),
                },
                Command::Title("My Figure!".into()),
                Command::Legend,
                Command::ShowFig,
            ]
        );
    }

    #[test]
    fn test_exit_keeps_connection_open() {
        let mut client = recorder();
        client.clear_fig().unwrap();
        client.exit().unwrap();

        assert!(client.is_connected());
        client.legend().unwrap();

        assert_eq!(
            frames(client),
            vec![Command::ClearFig, Command::Exit, Command::Legend]
        );
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Accepts `limit` bytes in total, then times out.
    struct Stalling {
        written: Vec<u8>,
        limit: usize,
    }

    impl Write for Stalling {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let room = self.limit - self.written.len();
            if room == 0 {
                return Err(io::Error::from(io::ErrorKind::TimedOut));
            }
            let n = buf.len().min(room);
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_partial_write_drops_connection() {
        let mut client = PlotClient::from_writer(Stalling {
            written: Vec::new(),
            limit: 12,
        });

        let result = client.title("My Figure!");
        assert!(matches!(
            result,
            Err(Error::Transport(TransportError::Write(_)))
        ));
        assert!(!client.is_connected());

        assert!(matches!(client.legend(), Err(Error::NotConnected)));
        assert!(client.into_inner().is_none());
    }

    #[test]
    fn test_write_failure_surfaces_as_result() {
        let mut client = PlotClient::from_writer(Broken);
        let result = client.title("lost");
        assert!(matches!(
            result,
            Err(Error::Transport(TransportError::Write(_)))
        ));
    }
}
