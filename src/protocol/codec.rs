//! Command codec (encode/decode)
//!
//! Encoding is the only direction the client needs. The decoder mirrors
//! the backend's reading rules and exists so the wire contract can be
//! checked from Rust.

use std::borrow::Cow;

use bytes::{Buf, BufMut, Bytes};

use super::{Command, DataTag, Error, Opcode, Result, Series, Value};
use crate::transport::{WireScalar, put_text};

/// Encode one command frame, appending it to `dst`
///
/// # Format
///
/// ```text
/// [OPCODE (u64)] [ARGUMENTS (opcode-specific)]
/// ```
///
/// Strings are always `[len (u64)] [raw bytes]`, never NUL-terminated.
pub fn encode_into<B: BufMut + ?Sized>(command: &Command<'_>, dst: &mut B) {
    command.opcode().as_u64().put(dst);

    match command {
        Command::ClearBuffers
        | Command::ClearFig
        | Command::ShowFig
        | Command::ResetOpt
        | Command::Legend
        | Command::Exit => {}
        Command::Store { slot, value } => {
            slot.put(dst);
            put_value(value, dst);
        }
        Command::Plot(series) | Command::Scatter(series) => put_series(series, dst),
        Command::SaveFig { path } => put_text(path, dst),
        Command::MakeFig { width, height } => {
            width.put(dst);
            height.put(dst);
        }
        Command::AddOpt { key, value } => {
            put_text(key, dst);
            put_value(value, dst);
        }
        Command::XLim { min, max } | Command::YLim { min, max } => {
            min.put(dst);
            max.put(dst);
        }
        Command::AxisLabels { x, y } => {
            put_text(x, dst);
            put_text(y, dst);
        }
        Command::Title(text) => put_text(text, dst),
    }
}

/// Encode one command frame into a fresh buffer
#[must_use]
pub fn encode(command: &Command<'_>) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(command.encoded_len());
    encode_into(command, &mut bytes);
    bytes
}

fn put_value<B: BufMut + ?Sized>(value: &Value<'_>, dst: &mut B) {
    value.tag().as_u64().put(dst);
    match value {
        Value::Scalar(number) => number.put(dst),
        Value::Text(text) => put_text(text, dst),
        Value::Sequence(items) => {
            (items.len() as u64).put(dst);
            for item in items.iter() {
                item.put(dst);
            }
        }
    }
}

fn put_series<B: BufMut + ?Sized>(series: &Series<'_>, dst: &mut B) {
    series.x.put(dst);
    series.y.put(dst);
    match &series.label {
        Some(label) => {
            1u64.put(dst);
            put_text(label, dst);
        }
        None => 0u64.put(dst),
    }
}

/// Decode one command frame from the front of `src`
///
/// On success `src` is advanced past the frame.
///
/// # Errors
///
/// Returns an error if:
/// - The opcode or a data tag is unknown
/// - A has-label flag is neither 0 nor 1
/// - The frame is truncated
/// - A length prefix cannot be satisfied
/// - Text is not valid UTF-8
pub fn decode(src: &mut Bytes) -> Result<Command<'static>> {
    let raw = get_scalar::<u64>(src)?;
    let opcode = Opcode::from_u64(raw).ok_or(Error::InvalidOpcode { value: raw })?;

    let command = match opcode {
        Opcode::ClearBuffers => Command::ClearBuffers,
        Opcode::ClearFig => Command::ClearFig,
        Opcode::Store => Command::Store {
            slot: get_scalar(src)?,
            value: get_value(src)?,
        },
        Opcode::Plot => Command::Plot(get_series(src)?),
        Opcode::Scatter => Command::Scatter(get_series(src)?),
        Opcode::SaveFig => Command::SaveFig {
            path: Cow::Owned(get_text(src)?),
        },
        Opcode::ShowFig => Command::ShowFig,
        Opcode::MakeFig => Command::MakeFig {
            width: get_scalar(src)?,
            height: get_scalar(src)?,
        },
        Opcode::ResetOpt => Command::ResetOpt,
        Opcode::AddOpt => Command::AddOpt {
            key: Cow::Owned(get_text(src)?),
            value: get_value(src)?,
        },
        Opcode::XLim => Command::XLim {
            min: get_scalar(src)?,
            max: get_scalar(src)?,
        },
        Opcode::YLim => Command::YLim {
            min: get_scalar(src)?,
            max: get_scalar(src)?,
        },
        Opcode::Legend => Command::Legend,
        Opcode::AxisLabels => Command::AxisLabels {
            x: Cow::Owned(get_text(src)?),
            y: Cow::Owned(get_text(src)?),
        },
        Opcode::Title => Command::Title(Cow::Owned(get_text(src)?)),
        Opcode::Exit => Command::Exit,
    };

    Ok(command)
}

/// Decode every frame in `bytes`
///
/// # Errors
///
/// Fails on the first malformed frame; trailing partial frames are
/// reported as [`Error::BufferTooSmall`].
pub fn decode_stream(mut bytes: Bytes) -> Result<Vec<Command<'static>>> {
    let mut commands = Vec::new();
    while bytes.has_remaining() {
        commands.push(decode(&mut bytes)?);
    }
    Ok(commands)
}

fn ensure(src: &Bytes, needed: usize) -> Result<()> {
    if src.remaining() < needed {
        return Err(Error::BufferTooSmall {
            needed,
            got: src.remaining(),
        });
    }
    Ok(())
}

fn get_scalar<S: WireScalar>(src: &mut Bytes) -> Result<S> {
    ensure(src, S::WIDTH)?;
    Ok(S::get(src))
}

/// Read a length prefix and check that `len * width` bytes follow it.
fn get_len(src: &mut Bytes, width: usize) -> Result<usize> {
    let len = get_scalar::<u64>(src)?;
    let count = usize::try_from(len).map_err(|_| Error::LengthOverflow { len })?;
    let needed = count
        .checked_mul(width)
        .ok_or(Error::LengthOverflow { len })?;
    ensure(src, needed)?;
    Ok(count)
}

fn get_text(src: &mut Bytes) -> Result<String> {
    let len = get_len(src, 1)?;
    let raw = src.split_to(len);
    Ok(String::from_utf8(raw.to_vec())?)
}

fn get_value(src: &mut Bytes) -> Result<Value<'static>> {
    let raw = get_scalar::<u64>(src)?;
    let tag = DataTag::from_u64(raw).ok_or(Error::InvalidDataTag { value: raw })?;

    let value = match tag {
        DataTag::Scalar => Value::Scalar(get_scalar(src)?),
        DataTag::Text => Value::Text(Cow::Owned(get_text(src)?)),
        DataTag::Sequence => {
            let count = get_len(src, f64::WIDTH)?;
            let items = (0..count).map(|_| f64::get(src)).collect::<Vec<_>>();
            Value::Sequence(Cow::Owned(items))
        }
    };

    Ok(value)
}

fn get_series(src: &mut Bytes) -> Result<Series<'static>> {
    let x = get_scalar(src)?;
    let y = get_scalar(src)?;
    let label = match get_scalar::<u64>(src)? {
        0 => None,
        1 => Some(Cow::Owned(get_text(src)?)),
        value => return Err(Error::InvalidLabelFlag { value }),
    };
    Ok(Series { x, y, label })
}
