//! Opcode and data-tag tables

use std::fmt;

/// Command opcodes.
///
/// The backend dispatches on the raw numeric value, so numbering is
/// append-only: existing values are never reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u64)]
pub enum Opcode {
    /// Drop every stored buffer
    ClearBuffers = 1,
    /// Close all open figures
    ClearFig = 2,
    /// Store a tagged value in a buffer slot
    Store = 3,
    /// Line plot of two buffer slots
    Plot = 4,
    /// Scatter plot of two buffer slots
    Scatter = 5,
    /// Save the current figure to a path
    SaveFig = 6,
    /// Show the current figure
    ShowFig = 7,
    /// Open a new figure with a size
    MakeFig = 8,
    /// Clear the pending plot options
    ResetOpt = 9,
    /// Add a keyed plot option
    AddOpt = 10,
    /// Set the x axis range
    XLim = 11,
    /// Set the y axis range
    YLim = 12,
    /// Draw the legend
    Legend = 13,
    /// Set both axis labels
    AxisLabels = 14,
    /// Set the figure title
    Title = 15,
    /// Ask the backend to stop reading
    Exit = 16,
}

impl Opcode {
    /// Every opcode, in numeric order.
    pub const ALL: [Self; 16] = [
        Self::ClearBuffers,
        Self::ClearFig,
        Self::Store,
        Self::Plot,
        Self::Scatter,
        Self::SaveFig,
        Self::ShowFig,
        Self::MakeFig,
        Self::ResetOpt,
        Self::AddOpt,
        Self::XLim,
        Self::YLim,
        Self::Legend,
        Self::AxisLabels,
        Self::Title,
        Self::Exit,
    ];

    /// Convert from the wire value
    #[must_use]
    pub fn from_u64(value: u64) -> Option<Self> {
        match value {
            1 => Some(Self::ClearBuffers),
            2 => Some(Self::ClearFig),
            3 => Some(Self::Store),
            4 => Some(Self::Plot),
            5 => Some(Self::Scatter),
            6 => Some(Self::SaveFig),
            7 => Some(Self::ShowFig),
            8 => Some(Self::MakeFig),
            9 => Some(Self::ResetOpt),
            10 => Some(Self::AddOpt),
            11 => Some(Self::XLim),
            12 => Some(Self::YLim),
            13 => Some(Self::Legend),
            14 => Some(Self::AxisLabels),
            15 => Some(Self::Title),
            16 => Some(Self::Exit),
            _ => None,
        }
    }

    /// Convert to the wire value
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self as u64
    }

    /// Zero-based position in [`Opcode::ALL`]
    #[must_use]
    pub(crate) const fn index(self) -> usize {
        self as usize - 1
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ClearBuffers => "ClearBuffers",
            Self::ClearFig => "ClearFig",
            Self::Store => "Store",
            Self::Plot => "Plot",
            Self::Scatter => "Scatter",
            Self::SaveFig => "SaveFig",
            Self::ShowFig => "ShowFig",
            Self::MakeFig => "MakeFig",
            Self::ResetOpt => "ResetOpt",
            Self::AddOpt => "AddOpt",
            Self::XLim => "XLim",
            Self::YLim => "YLim",
            Self::Legend => "Legend",
            Self::AxisLabels => "AxisLabels",
            Self::Title => "Title",
            Self::Exit => "Exit",
        };
        write!(f, "{name}")
    }
}

/// Type tag leading every tagged value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u64)]
pub enum DataTag {
    /// A single f64
    Scalar = 1,
    /// Length-prefixed bytes
    Text = 2,
    /// Count-prefixed f64 elements
    Sequence = 3,
}

impl DataTag {
    /// Convert from the wire value
    #[must_use]
    pub fn from_u64(value: u64) -> Option<Self> {
        match value {
            1 => Some(Self::Scalar),
            2 => Some(Self::Text),
            3 => Some(Self::Sequence),
            _ => None,
        }
    }

    /// Convert to the wire value
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self as u64
    }
}

impl fmt::Display for DataTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scalar => "Scalar",
            Self::Text => "Text",
            Self::Sequence => "Sequence",
        };
        write!(f, "{name}")
    }
}
