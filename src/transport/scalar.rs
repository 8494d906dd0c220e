//! Fixed-width scalars as they appear on the wire.
//!
//! Every number is 8 bytes in the sending host's native byte order. There
//! is no byte-order marker; both ends must agree a priori.

use bytes::{Buf, BufMut};

/// A number with a single fixed-width wire encoding.
pub trait WireScalar: Copy {
    /// Encoded width in bytes
    const WIDTH: usize;

    /// Append the native-order encoding to `dst`
    fn put<B: BufMut + ?Sized>(self, dst: &mut B);

    /// Read one value from `src`.
    ///
    /// Callers must check that `src` holds at least [`Self::WIDTH`] bytes.
    fn get<B: Buf + ?Sized>(src: &mut B) -> Self;
}

impl WireScalar for u64 {
    const WIDTH: usize = 8;

    #[inline]
    fn put<B: BufMut + ?Sized>(self, dst: &mut B) {
        dst.put_slice(&self.to_ne_bytes());
    }

    #[inline]
    fn get<B: Buf + ?Sized>(src: &mut B) -> Self {
        let mut raw = [0u8; 8];
        src.copy_to_slice(&mut raw);
        Self::from_ne_bytes(raw)
    }
}

impl WireScalar for f64 {
    const WIDTH: usize = 8;

    #[inline]
    fn put<B: BufMut + ?Sized>(self, dst: &mut B) {
        dst.put_slice(&self.to_ne_bytes());
    }

    #[inline]
    fn get<B: Buf + ?Sized>(src: &mut B) -> Self {
        let mut raw = [0u8; 8];
        src.copy_to_slice(&mut raw);
        Self::from_ne_bytes(raw)
    }
}

/// Append `text` as a u64 byte length followed by the raw bytes.
///
/// This is the only string framing on the wire; nothing is NUL-terminated.
pub fn put_text<B: BufMut + ?Sized>(text: &str, dst: &mut B) {
    (text.len() as u64).put(dst);
    dst.put_slice(text.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_order() {
        let mut buf = Vec::new();
        42u64.put(&mut buf);
        (-0.5f64).put(&mut buf);

        let mut expected = 42u64.to_ne_bytes().to_vec();
        expected.extend_from_slice(&(-0.5f64).to_ne_bytes());
        assert_eq!(buf, expected);

        let mut src = &buf[..];
        assert_eq!(u64::get(&mut src), 42);
        assert_eq!(f64::get(&mut src).to_bits(), (-0.5f64).to_bits());
        assert!(src.is_empty());
    }

    #[test]
    fn test_put_text_framing() {
        let mut buf = Vec::new();
        put_text("Data", &mut buf);
        put_text("", &mut buf);

        let mut expected = 4u64.to_ne_bytes().to_vec();
        expected.extend_from_slice(b"Data");
        expected.extend_from_slice(&0u64.to_ne_bytes());
        assert_eq!(buf, expected);
    }
}
