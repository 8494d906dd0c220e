//! Stream transport: connection setup and raw byte delivery

mod channel;
mod config;
mod error;
mod scalar;
mod socket;

pub use channel::Channel;
pub use config::{DEFAULT_HOST, DEFAULT_PORT, TransportConfig};
pub use error::TransportError;
pub use scalar::{WireScalar, put_text};
