//! Plotwire protocol core
//!
//! This module provides the opcode table, tagged values, command frames,
//! and the codec that lays them out on the wire.

mod codec;
mod command;
mod error;
pub mod metrics;
mod types;
mod value;

pub use codec::{decode, decode_stream, encode, encode_into};
pub use command::{Command, Series};
pub use error::{Error, Result};
pub use types::{DataTag, Opcode};
pub use value::Value;

/// Buffer slot the convenience operations use for x values
pub const X_SLOT: u64 = 1;

/// Buffer slot the convenience operations use for y values
pub const Y_SLOT: u64 = 2;
