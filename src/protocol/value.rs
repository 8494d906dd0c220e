//! Tagged values carried by `Store` and `AddOpt`

use std::borrow::Cow;

use super::DataTag;

/// Self-describing payload: the backend dispatches on the leading tag.
///
/// # Wire Format
///
/// ```text
/// Scalar:   [tag=1 (u64)] [value (f64)]
/// Text:     [tag=2 (u64)] [len (u64)] [bytes (len)]
/// Sequence: [tag=3 (u64)] [count (u64)] [elements (count * f64)]
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value<'a> {
    /// A single number
    Scalar(f64),
    /// A string, sent as raw UTF-8 bytes
    Text(Cow<'a, str>),
    /// A series of numbers
    Sequence(Cow<'a, [f64]>),
}

impl Value<'_> {
    /// Wire tag for this variant
    #[must_use]
    pub const fn tag(&self) -> DataTag {
        match self {
            Self::Scalar(_) => DataTag::Scalar,
            Self::Text(_) => DataTag::Text,
            Self::Sequence(_) => DataTag::Sequence,
        }
    }

    /// Number of bytes this value occupies on the wire, tag included
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        8 + match self {
            Self::Scalar(_) => 8,
            Self::Text(text) => 8 + text.len(),
            Self::Sequence(items) => 8 + items.len() * 8,
        }
    }

    /// Detach from any borrowed data
    #[must_use]
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Self::Scalar(value) => Value::Scalar(value),
            Self::Text(text) => Value::Text(Cow::Owned(text.into_owned())),
            Self::Sequence(items) => Value::Sequence(Cow::Owned(items.into_owned())),
        }
    }
}

impl From<f64> for Value<'_> {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Self::Text(Cow::Borrowed(value))
    }
}

impl From<String> for Value<'_> {
    fn from(value: String) -> Self {
        Self::Text(Cow::Owned(value))
    }
}

impl<'a> From<&'a [f64]> for Value<'a> {
    fn from(value: &'a [f64]) -> Self {
        Self::Sequence(Cow::Borrowed(value))
    }
}

impl<'a> From<&'a Vec<f64>> for Value<'a> {
    fn from(value: &'a Vec<f64>) -> Self {
        Self::Sequence(Cow::Borrowed(value.as_slice()))
    }
}

impl From<Vec<f64>> for Value<'_> {
    fn from(value: Vec<f64>) -> Self {
        Self::Sequence(Cow::Owned(value))
    }
}
