//! Command frames

use std::borrow::Cow;

use super::{Opcode, Value};

/// Two buffer slots to draw against each other, with an optional legend label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series<'a> {
    /// Slot holding the x values
    pub x: u64,
    /// Slot holding the y values
    pub y: u64,
    /// Legend label; `None` sends the has-label flag as 0
    pub label: Option<Cow<'a, str>>,
}

impl<'a> Series<'a> {
    /// Unlabeled series
    #[must_use]
    pub const fn new(x: u64, y: u64) -> Self {
        Self { x, y, label: None }
    }

    /// Labeled series
    #[must_use]
    pub fn labeled(x: u64, y: u64, label: impl Into<Cow<'a, str>>) -> Self {
        Self {
            x,
            y,
            label: Some(label.into()),
        }
    }

    fn into_owned(self) -> Series<'static> {
        Series {
            x: self.x,
            y: self.y,
            label: self.label.map(|label| Cow::Owned(label.into_owned())),
        }
    }
}

/// One command frame: an opcode plus its opcode-specific arguments.
///
/// There is no frame length on the wire; the argument layout is implied
/// by the opcode alone.
#[derive(Debug, Clone, PartialEq)]
pub enum Command<'a> {
    /// `[ClearBuffers]`
    ClearBuffers,
    /// `[ClearFig]`
    ClearFig,
    /// `[Store] [slot] [tagged value]`
    Store {
        /// Target buffer slot
        slot: u64,
        /// Stored payload
        value: Value<'a>,
    },
    /// `[Plot] [x] [y] [has_label] ([label])`
    Plot(Series<'a>),
    /// `[Scatter] [x] [y] [has_label] ([label])`
    Scatter(Series<'a>),
    /// `[SaveFig] [path]`
    SaveFig {
        /// Output path as understood by the backend
        path: Cow<'a, str>,
    },
    /// `[ShowFig]`
    ShowFig,
    /// `[MakeFig] [width] [height]`
    MakeFig {
        /// Figure width; 0 lets the backend pick
        width: f64,
        /// Figure height; 0 lets the backend pick
        height: f64,
    },
    /// `[ResetOpt]`
    ResetOpt,
    /// `[AddOpt] [key] [tagged value]`
    AddOpt {
        /// Option name
        key: Cow<'a, str>,
        /// Option value
        value: Value<'a>,
    },
    /// `[XLim] [min] [max]`
    XLim {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
    /// `[YLim] [min] [max]`
    YLim {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
    /// `[Legend]`
    Legend,
    /// `[AxisLabels] [x label] [y label]`
    AxisLabels {
        /// X axis label
        x: Cow<'a, str>,
        /// Y axis label
        y: Cow<'a, str>,
    },
    /// `[Title] [text]`
    Title(Cow<'a, str>),
    /// `[Exit]`
    Exit,
}

impl Command<'_> {
    /// Opcode leading this frame
    #[must_use]
    pub const fn opcode(&self) -> Opcode {
        match self {
            Self::ClearBuffers => Opcode::ClearBuffers,
            Self::ClearFig => Opcode::ClearFig,
            Self::Store { .. } => Opcode::Store,
            Self::Plot(_) => Opcode::Plot,
            Self::Scatter(_) => Opcode::Scatter,
            Self::SaveFig { .. } => Opcode::SaveFig,
            Self::ShowFig => Opcode::ShowFig,
            Self::MakeFig { .. } => Opcode::MakeFig,
            Self::ResetOpt => Opcode::ResetOpt,
            Self::AddOpt { .. } => Opcode::AddOpt,
            Self::XLim { .. } => Opcode::XLim,
            Self::YLim { .. } => Opcode::YLim,
            Self::Legend => Opcode::Legend,
            Self::AxisLabels { .. } => Opcode::AxisLabels,
            Self::Title(_) => Opcode::Title,
            Self::Exit => Opcode::Exit,
        }
    }

    /// Exact number of bytes [`encode`](super::encode) produces for this frame
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        let args = match self {
            Self::ClearBuffers
            | Self::ClearFig
            | Self::ShowFig
            | Self::ResetOpt
            | Self::Legend
            | Self::Exit => 0,
            Self::Store { value, .. } => 8 + value.encoded_len(),
            Self::Plot(series) | Self::Scatter(series) => {
                24 + series.label.as_ref().map_or(0, |label| 8 + label.len())
            }
            Self::SaveFig { path } => 8 + path.len(),
            Self::MakeFig { .. } | Self::XLim { .. } | Self::YLim { .. } => 16,
            Self::AddOpt { key, value } => 8 + key.len() + value.encoded_len(),
            Self::AxisLabels { x, y } => 16 + x.len() + y.len(),
            Self::Title(text) => 8 + text.len(),
        };
        8 + args
    }

    /// Detach from any borrowed data
    #[must_use]
    pub fn into_owned(self) -> Command<'static> {
        fn own(text: Cow<'_, str>) -> Cow<'static, str> {
            Cow::Owned(text.into_owned())
        }

        match self {
            Self::ClearBuffers => Command::ClearBuffers,
            Self::ClearFig => Command::ClearFig,
            Self::Store { slot, value } => Command::Store {
                slot,
                value: value.into_owned(),
            },
            Self::Plot(series) => Command::Plot(series.into_owned()),
            Self::Scatter(series) => Command::Scatter(series.into_owned()),
            Self::SaveFig { path } => Command::SaveFig { path: own(path) },
            Self::ShowFig => Command::ShowFig,
            Self::MakeFig { width, height } => Command::MakeFig { width, height },
            Self::ResetOpt => Command::ResetOpt,
            Self::AddOpt { key, value } => Command::AddOpt {
                key: own(key),
                value: value.into_owned(),
            },
            Self::XLim { min, max } => Command::XLim { min, max },
            Self::YLim { min, max } => Command::YLim { min, max },
            Self::Legend => Command::Legend,
            Self::AxisLabels { x, y } => Command::AxisLabels { x: own(x), y: own(y) },
            Self::Title(text) => Command::Title(own(text)),
            Self::Exit => Command::Exit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_mapping() {
        assert_eq!(Command::Exit.opcode(), Opcode::Exit);
        assert_eq!(Command::XLim { min: 0.0, max: 1.0 }.opcode(), Opcode::XLim);
        assert_eq!(Command::Scatter(Series::new(1, 2)).opcode(), Opcode::Scatter);
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(Command::Legend.encoded_len(), 8);
        assert_eq!(Command::Plot(Series::new(1, 2)).encoded_len(), 32);
        assert_eq!(Command::Plot(Series::labeled(1, 2, "Data")).encoded_len(), 44);
        assert_eq!(
            Command::SaveFig {
                path: "/tmp/fig.png".into()
            }
            .encoded_len(),
            28
        );
    }
}
