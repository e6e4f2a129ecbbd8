//! Measurement cursor system
//!
//! Two independent marker pairs sit over the plot: a pair of vertical time
//! markers and a pair of horizontal voltage markers. Each pair is toggled on
//! and off, placed with two placement gestures, and dragged afterwards.
//! Positions are remembered per capture file so switching files and coming
//! back restores the markers.
//!
//! # Main Types
//!
//! - [`CursorModel`] - Owns both pairs, drag state and per-file memory
//! - [`PairState`] - Placement state machine of one pair
//! - [`CursorReadout`] - Marker positions and the deltas derived from them
//! - [`CursorId`] - One of `time1`, `time2`, `volt1`, `volt2`
//!
//! The model has no UI dependency; the plot surface feeds it
//! [`PointerEvent`]s in data coordinates together with the visible
//! [`PlotViewport`].

mod model;
mod state;

use serde::{Deserialize, Serialize};

pub use model::{
    CursorMemory, CursorModel, CursorReadout, CursorSnapshot, PlotPos, PlotViewport,
    PointerEvent, DRAG_TOLERANCE,
};
pub use state::{MarkerPair, PairEvent, PairPositions, PairState};

/// Axis a marker pair measures along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Vertical lines at a time position
    Time,
    /// Horizontal lines at a voltage level
    Voltage,
}

impl Axis {
    /// Both axes in search order
    pub const ALL: [Axis; 2] = [Axis::Time, Axis::Voltage];

    /// Unit suffix for readouts
    pub fn unit(&self) -> &'static str {
        match self {
            Axis::Time => "s",
            Axis::Voltage => "V",
        }
    }

    /// Display name
    pub fn label(&self) -> &'static str {
        match self {
            Axis::Time => "Time",
            Axis::Voltage => "Voltage",
        }
    }
}

/// First or second marker of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerSlot {
    First,
    Second,
}

/// Identifies a single marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorId {
    pub axis: Axis,
    pub slot: MarkerSlot,
}

impl CursorId {
    pub const TIME1: CursorId = CursorId::new(Axis::Time, MarkerSlot::First);
    pub const TIME2: CursorId = CursorId::new(Axis::Time, MarkerSlot::Second);
    pub const VOLT1: CursorId = CursorId::new(Axis::Voltage, MarkerSlot::First);
    pub const VOLT2: CursorId = CursorId::new(Axis::Voltage, MarkerSlot::Second);

    /// All markers in drag search order
    pub const ALL: [CursorId; 4] = [Self::TIME1, Self::TIME2, Self::VOLT1, Self::VOLT2];

    pub const fn new(axis: Axis, slot: MarkerSlot) -> Self {
        Self { axis, slot }
    }

    /// Short name used in labels
    pub fn name(&self) -> &'static str {
        match (self.axis, self.slot) {
            (Axis::Time, MarkerSlot::First) => "time1",
            (Axis::Time, MarkerSlot::Second) => "time2",
            (Axis::Voltage, MarkerSlot::First) => "volt1",
            (Axis::Voltage, MarkerSlot::Second) => "volt2",
        }
    }

    /// Label text drawn next to the marker line
    pub fn label(&self, value: f64) -> String {
        match self.axis {
            Axis::Time => format!("{}: {:.2e}{}", self.name(), value, self.axis.unit()),
            Axis::Voltage => format!("{}: {:.3}{}", self.name(), value, self.axis.unit()),
        }
    }
}

/// Selectable marker colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorColor {
    Red,
    Yellow,
    Cyan,
    Magenta,
}

impl CursorColor {
    /// Get all colors
    pub fn all() -> &'static [CursorColor] {
        &[
            CursorColor::Red,
            CursorColor::Yellow,
            CursorColor::Cyan,
            CursorColor::Magenta,
        ]
    }

    /// RGBA value
    pub fn rgba(&self) -> [u8; 4] {
        match self {
            CursorColor::Red => [255, 0, 0, 255],
            CursorColor::Yellow => [255, 255, 0, 255],
            CursorColor::Cyan => [0, 255, 255, 255],
            CursorColor::Magenta => [255, 0, 255, 255],
        }
    }

    /// Get the display name for this color
    pub fn display_name(&self) -> &'static str {
        match self {
            CursorColor::Red => "Red",
            CursorColor::Yellow => "Yellow",
            CursorColor::Cyan => "Cyan",
            CursorColor::Magenta => "Magenta",
        }
    }

    /// Default color of a pair
    pub fn default_for(axis: Axis) -> Self {
        match axis {
            Axis::Time => CursorColor::Red,
            Axis::Voltage => CursorColor::Cyan,
        }
    }
}
