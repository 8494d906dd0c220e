//! Transport-level error types covering resolve, connect, and write failures.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Unified error type for stream transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Host name could not be resolved.
    #[error("failed to resolve {endpoint}: {source}")]
    Resolve {
        /// Endpoint as configured (`host:port`).
        endpoint: String,
        /// Resolver error.
        #[source]
        source: io::Error,
    },
    /// Resolution succeeded but yielded no addresses.
    #[error("no addresses found for {endpoint}")]
    NoAddress {
        /// Endpoint as configured (`host:port`).
        endpoint: String,
    },
    /// Every resolved address refused or was unreachable; carries the last failure.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        /// Last address attempted.
        addr: SocketAddr,
        /// Error reported for that address.
        #[source]
        source: io::Error,
    },
    /// Socket options could not be applied after connecting.
    #[error("failed to configure socket: {0}")]
    Configure(#[source] io::Error),
    /// A write could not be completed; the frame is lost.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}
