//! Plotwire - binary command protocol for a remote plotting backend
//!
//! A [`PlotClient`] turns plotting calls (store data, plot, scatter, set
//! labels, save, show) into a compact stream of command frames and pushes
//! them over a TCP connection to a backend process that does the drawing.
//! The channel is one-way: nothing is ever read back.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use plotwire::{PlotClient, TransportConfig};
//!
//! let mut client = PlotClient::new(TransportConfig::default());
//! client.connect()?;
//!
//! let xs: Vec<f64> = (0..100).map(|i| f64::from(i) * 0.1).collect();
//! let ys: Vec<f64> = xs.iter().map(|x| x.sin()).collect();
//!
//! client.new_figure(8.0, 6.0)?;
//! client.store_x(&xs)?;
//! client.store_y(&ys)?;
//! client.plot_xy("sin(x)")?;
//! client.save_fig("/tmp/sine.png")?;
//! client.exit()?;
//! # Ok::<(), plotwire::Error>(())
//! ```
//!
//! # Wire format
//!
//! - Integers are u64 and floats are f64, both in the sender's native byte order
//! - Strings are a u64 byte length followed by the raw bytes, no terminator
//! - A frame is an opcode followed by opcode-specific arguments; there is
//!   no frame length, so the backend must know each opcode's layout
//!
//! Buffer slots referenced by `Plot`/`Scatter` must have been stored
//! earlier in the session. The client does not check this.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod client;
pub mod protocol;
pub mod transport;

pub use client::PlotClient;
pub use protocol::{
    Command, DataTag, Error, Opcode, Result, Series, Value, X_SLOT, Y_SLOT, metrics,
};
pub use transport::{Channel, DEFAULT_HOST, DEFAULT_PORT, TransportConfig, TransportError};
