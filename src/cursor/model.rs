//! Cursor model: both marker pairs, dragging and per-file memory

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::state::{MarkerPair, PairEvent, PairPositions};
use super::{Axis, CursorColor, CursorId};

/// Fraction of the visible axis range within which a press grabs a marker
pub const DRAG_TOLERANCE: f64 = 0.02;

/// A point in plot data coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotPos {
    pub x: f64,
    pub y: f64,
}

impl PlotPos {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Coordinate along an axis (x for time, y for voltage)
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Time => self.x,
            Axis::Voltage => self.y,
        }
    }
}

/// Visible data ranges of the plot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotViewport {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl PlotViewport {
    pub fn new(x: [f64; 2], y: [f64; 2]) -> Self {
        Self {
            x_min: x[0],
            x_max: x[1],
            y_min: y[0],
            y_max: y[1],
        }
    }

    /// Width of the visible range along an axis
    pub fn span(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Time => (self.x_max - self.x_min).abs(),
            Axis::Voltage => (self.y_max - self.y_min).abs(),
        }
    }

    /// Grab distance along an axis, `None` when the range is degenerate
    pub fn tolerance(&self, axis: Axis) -> Option<f64> {
        let span = self.span(axis);
        (span.is_finite() && span > 0.0).then(|| DRAG_TOLERANCE * span)
    }
}

/// Pointer input translated to data coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Placement gesture
    DoubleClick(PlotPos),
    /// Button pressed; may grab a marker
    Press(PlotPos),
    /// Pointer moved with the button held
    Move(PlotPos),
    /// Button released
    Release,
}

/// Marker positions of both pairs
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorSnapshot {
    pub time: PairPositions,
    pub voltage: PairPositions,
}

impl CursorSnapshot {
    pub fn get(&self, axis: Axis) -> PairPositions {
        match axis {
            Axis::Time => self.time,
            Axis::Voltage => self.voltage,
        }
    }

    pub fn set(&mut self, axis: Axis, positions: PairPositions) {
        match axis {
            Axis::Time => self.time = positions,
            Axis::Voltage => self.voltage = positions,
        }
    }
}

/// Cursor positions remembered per capture file
#[derive(Debug, Clone, Default)]
pub struct CursorMemory {
    entries: HashMap<PathBuf, CursorSnapshot>,
}

impl CursorMemory {
    /// Remember positions for a file, replacing any previous entry
    pub fn store(&mut self, path: impl Into<PathBuf>, snapshot: CursorSnapshot) {
        self.entries.insert(path.into(), snapshot);
    }

    /// Positions last stored for a file
    pub fn recall(&self, path: &Path) -> Option<CursorSnapshot> {
        self.entries.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Marker positions and derived deltas
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CursorReadout {
    positions: [Option<f64>; 4],
    /// `|time2 - time1|` when both time markers are placed
    pub delta_t: Option<f64>,
    /// `1 / delta_t`, infinite for coincident markers
    pub freq: Option<f64>,
    /// `|volt2 - volt1|` when both voltage markers are placed
    pub delta_v: Option<f64>,
}

impl CursorReadout {
    /// Position of a single marker
    pub fn position(&self, id: CursorId) -> Option<f64> {
        CursorId::ALL
            .iter()
            .position(|candidate| *candidate == id)
            .and_then(|i| self.positions[i])
    }

    /// Placed markers in display order
    pub fn placed(&self) -> impl Iterator<Item = (CursorId, f64)> + '_ {
        CursorId::ALL
            .iter()
            .zip(self.positions.iter())
            .filter_map(|(id, pos)| pos.map(|p| (*id, p)))
    }

    /// Check if nothing is placed
    pub fn is_empty(&self) -> bool {
        self.positions.iter().all(Option::is_none)
    }
}

/// Owner of all cursor state
#[derive(Debug, Clone)]
pub struct CursorModel {
    time: MarkerPair,
    voltage: MarkerPair,
    /// Pair that was enabled most recently
    focus: Option<Axis>,
    dragging: Option<CursorId>,
    current_file: Option<PathBuf>,
    /// Positions restored when a pair of the current file is re-enabled
    remembered: CursorSnapshot,
    memory: CursorMemory,
}

impl Default for CursorModel {
    fn default() -> Self {
        Self::new(
            CursorColor::default_for(Axis::Time),
            CursorColor::default_for(Axis::Voltage),
        )
    }
}

impl CursorModel {
    /// Create a model with both pairs disabled
    pub fn new(time_color: CursorColor, voltage_color: CursorColor) -> Self {
        Self {
            time: MarkerPair::new(Axis::Time, time_color),
            voltage: MarkerPair::new(Axis::Voltage, voltage_color),
            focus: None,
            dragging: None,
            current_file: None,
            remembered: CursorSnapshot::default(),
            memory: CursorMemory::default(),
        }
    }

    pub fn pair(&self, axis: Axis) -> &MarkerPair {
        match axis {
            Axis::Time => &self.time,
            Axis::Voltage => &self.voltage,
        }
    }

    fn pair_mut(&mut self, axis: Axis) -> &mut MarkerPair {
        match axis {
            Axis::Time => &mut self.time,
            Axis::Voltage => &mut self.voltage,
        }
    }

    pub fn is_enabled(&self, axis: Axis) -> bool {
        self.pair(axis).state.is_enabled()
    }

    pub fn set_color(&mut self, axis: Axis, color: CursorColor) {
        self.pair_mut(axis).color = color;
    }

    /// Turn a pair on or off
    ///
    /// Turning a pair off keeps its positions so turning it back on for the
    /// same file restores them. Turning a pair on gives it placement focus.
    pub fn set_enabled(&mut self, axis: Axis, enabled: bool) {
        if enabled == self.is_enabled(axis) {
            return;
        }
        if enabled {
            let remembered = self.remembered.get(axis);
            self.pair_mut(axis).apply(PairEvent::Enable(remembered));
            self.focus = Some(axis);
        } else {
            let live = self.pair(axis).state.positions();
            self.remembered.set(axis, live);
            self.pair_mut(axis).apply(PairEvent::Disable);
            self.release_axis(axis);
        }
    }

    /// Remove a pair's markers and forget its remembered positions
    pub fn clear(&mut self, axis: Axis) {
        self.pair_mut(axis).apply(PairEvent::Clear);
        self.remembered.set(axis, PairPositions::default());
        self.release_axis(axis);
    }

    fn release_axis(&mut self, axis: Axis) {
        if self.dragging.map(|id| id.axis) == Some(axis) {
            self.dragging = None;
        }
    }

    /// Pair that the next placement gesture goes to
    pub fn placement_target(&self) -> Option<Axis> {
        if let Some(axis) = self.focus {
            if self.pair(axis).state.accepts_placement() {
                return Some(axis);
            }
        }
        Axis::ALL
            .into_iter()
            .find(|axis| self.pair(*axis).state.accepts_placement())
    }

    /// Marker currently being dragged
    pub fn dragging(&self) -> Option<CursorId> {
        self.dragging
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    /// First marker within grab distance of `pos`
    pub fn marker_near(&self, pos: PlotPos, viewport: &PlotViewport) -> Option<CursorId> {
        CursorId::ALL.into_iter().find(|id| {
            let Some(tolerance) = viewport.tolerance(id.axis) else {
                return false;
            };
            self.pair(id.axis)
                .position(id.slot)
                .map(|marker| (pos.along(id.axis) - marker).abs() < tolerance)
                .unwrap_or(false)
        })
    }

    /// Apply a pointer event; returns true when a marker position changed
    ///
    /// Does nothing until a capture is loaded.
    pub fn handle_pointer(&mut self, event: PointerEvent, viewport: &PlotViewport) -> bool {
        if self.current_file.is_none() {
            return false;
        }

        match event {
            PointerEvent::DoubleClick(pos) => {
                let Some(axis) = self.placement_target() else {
                    return false;
                };
                let value = pos.along(axis);
                if !value.is_finite() {
                    return false;
                }
                self.pair_mut(axis).apply(PairEvent::Place(value));
                true
            }
            PointerEvent::Press(pos) => {
                if self.dragging.is_none() {
                    self.dragging = self.marker_near(pos, viewport);
                    if let Some(id) = self.dragging {
                        tracing::debug!("Dragging {}", id.name());
                    }
                }
                false
            }
            PointerEvent::Move(pos) => {
                let Some(id) = self.dragging else {
                    return false;
                };
                let value = pos.along(id.axis);
                if !value.is_finite() {
                    return false;
                }
                let pair = self.pair_mut(id.axis);
                pair.state = pair.state.moved(id.slot, value);
                true
            }
            PointerEvent::Release => self.dragging.take().is_some(),
        }
    }

    /// File whose markers are shown
    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    /// Switch to a newly displayed capture
    ///
    /// Stores the positions of the file being left and restores the new
    /// file's positions into every enabled pair.
    pub fn on_file_loaded(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        let live = self.snapshot();
        if let Some(previous) = self.current_file.take() {
            self.memory.store(previous, live);
        }

        self.remembered = self.memory.recall(&path).unwrap_or_default();
        self.dragging = None;
        for axis in Axis::ALL {
            if self.is_enabled(axis) {
                let remembered = self.remembered.get(axis);
                let pair = self.pair_mut(axis);
                pair.apply(PairEvent::Disable);
                pair.apply(PairEvent::Enable(remembered));
            }
        }

        tracing::debug!("Cursor memory now holds {} files", self.memory.len());
        self.current_file = Some(path);
    }

    /// Positions of the current file: live for enabled pairs, remembered otherwise
    pub fn snapshot(&self) -> CursorSnapshot {
        let mut snapshot = CursorSnapshot::default();
        for axis in Axis::ALL {
            let pair = self.pair(axis);
            let positions = if pair.state.is_enabled() {
                pair.state.positions()
            } else {
                self.remembered.get(axis)
            };
            snapshot.set(axis, positions);
        }
        snapshot
    }

    pub fn memory(&self) -> &CursorMemory {
        &self.memory
    }

    /// Current marker positions and deltas
    pub fn readout(&self) -> CursorReadout {
        let mut readout = CursorReadout::default();
        for (i, id) in CursorId::ALL.iter().enumerate() {
            readout.positions[i] = self.pair(id.axis).position(id.slot);
        }

        if let PairPositions {
            first: Some(t1),
            second: Some(t2),
        } = self.time.state.positions()
        {
            let delta_t = (t2 - t1).abs();
            readout.delta_t = Some(delta_t);
            readout.freq = Some(if delta_t == 0.0 {
                f64::INFINITY
            } else {
                1.0 / delta_t
            });
        }

        if let PairPositions {
            first: Some(v1),
            second: Some(v2),
        } = self.voltage.state.positions()
        {
            readout.delta_v = Some((v2 - v1).abs());
        }

        readout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::PairState;

    fn viewport() -> PlotViewport {
        PlotViewport::new([0.0, 10.0], [-5.0, 5.0])
    }

    fn loaded_model() -> CursorModel {
        let mut model = CursorModel::default();
        model.on_file_loaded("a.csv");
        model
    }

    fn place(model: &mut CursorModel, x: f64, y: f64) -> bool {
        model.handle_pointer(PointerEvent::DoubleClick(PlotPos::new(x, y)), &viewport())
    }

    #[test]
    fn test_time_markers_delta() {
        let mut model = loaded_model();
        model.set_enabled(Axis::Time, true);
        assert!(place(&mut model, 2.0, 0.0));
        assert!(place(&mut model, 6.5, 0.0));

        let readout = model.readout();
        assert_eq!(readout.position(CursorId::TIME1), Some(2.0));
        assert_eq!(readout.position(CursorId::TIME2), Some(6.5));
        assert_eq!(readout.delta_t, Some(4.5));
        assert!((readout.freq.unwrap() - 1.0 / 4.5).abs() < 1e-12);
        assert_eq!(readout.delta_v, None);

        // third placement is ignored
        assert!(!place(&mut model, 9.0, 0.0));
        assert_eq!(model.readout().delta_t, Some(4.5));
    }

    #[test]
    fn test_coincident_markers_infinite_frequency() {
        let mut model = loaded_model();
        model.set_enabled(Axis::Time, true);
        place(&mut model, 3.0, 0.0);
        place(&mut model, 3.0, 0.0);
        assert_eq!(model.readout().freq, Some(f64::INFINITY));
    }

    #[test]
    fn test_no_file_is_noop() {
        let mut model = CursorModel::default();
        model.set_enabled(Axis::Time, true);
        assert!(!place(&mut model, 1.0, 0.0));
        assert!(model.readout().is_empty());
    }

    #[test]
    fn test_disable_enable_restores_positions() {
        let mut model = loaded_model();
        model.set_enabled(Axis::Voltage, true);
        place(&mut model, 0.0, 1.0);
        place(&mut model, 0.0, -2.0);

        model.set_enabled(Axis::Voltage, false);
        assert!(model.readout().is_empty());

        model.set_enabled(Axis::Voltage, true);
        let readout = model.readout();
        assert_eq!(readout.position(CursorId::VOLT1), Some(1.0));
        assert_eq!(readout.position(CursorId::VOLT2), Some(-2.0));
        assert_eq!(readout.delta_v, Some(3.0));
    }

    #[test]
    fn test_clear_forgets_positions() {
        let mut model = loaded_model();
        model.set_enabled(Axis::Time, true);
        place(&mut model, 1.0, 0.0);
        model.clear(Axis::Time);
        assert_eq!(model.pair(Axis::Time).state, PairState::AwaitingFirst);

        model.set_enabled(Axis::Time, false);
        model.set_enabled(Axis::Time, true);
        assert!(model.readout().is_empty());
    }

    #[test]
    fn test_placement_focus_and_fallback() {
        let mut model = loaded_model();
        model.set_enabled(Axis::Time, true);
        model.set_enabled(Axis::Voltage, true);
        assert_eq!(model.placement_target(), Some(Axis::Voltage));

        place(&mut model, 1.0, 1.0);
        place(&mut model, 2.0, 2.0);
        // voltage pair is full, fall back to time
        assert_eq!(model.placement_target(), Some(Axis::Time));
        place(&mut model, 3.0, 3.0);

        let readout = model.readout();
        assert_eq!(readout.position(CursorId::TIME1), Some(3.0));
        assert_eq!(readout.delta_v, Some(1.0));
    }

    #[test]
    fn test_enabling_keeps_other_pair() {
        let mut model = loaded_model();
        model.set_enabled(Axis::Time, true);
        place(&mut model, 1.0, 0.0);
        model.set_enabled(Axis::Voltage, true);
        assert_eq!(model.readout().position(CursorId::TIME1), Some(1.0));
    }

    #[test]
    fn test_press_outside_tolerance_moves_nothing() {
        let mut model = loaded_model();
        model.set_enabled(Axis::Time, true);
        place(&mut model, 2.0, 0.0);
        place(&mut model, 6.0, 0.0);

        // tolerance is 0.2 on a 10 s span
        model.handle_pointer(PointerEvent::Press(PlotPos::new(2.3, 0.0)), &viewport());
        assert!(!model.is_dragging());
        assert!(!model.handle_pointer(PointerEvent::Move(PlotPos::new(4.0, 0.0)), &viewport()));
        assert_eq!(model.readout().position(CursorId::TIME1), Some(2.0));
        assert_eq!(model.readout().position(CursorId::TIME2), Some(6.0));
    }

    #[test]
    fn test_drag_moves_only_grabbed_marker() {
        let mut model = loaded_model();
        model.set_enabled(Axis::Time, true);
        place(&mut model, 2.0, 0.0);
        place(&mut model, 6.0, 0.0);

        model.handle_pointer(PointerEvent::Press(PlotPos::new(5.9, 0.0)), &viewport());
        assert_eq!(model.dragging(), Some(CursorId::TIME2));
        assert!(model.handle_pointer(PointerEvent::Move(PlotPos::new(7.25, 3.0)), &viewport()));
        assert!(model.handle_pointer(PointerEvent::Release, &viewport()));
        assert!(!model.is_dragging());

        let readout = model.readout();
        assert_eq!(readout.position(CursorId::TIME1), Some(2.0));
        assert_eq!(readout.position(CursorId::TIME2), Some(7.25));
    }

    #[test]
    fn test_first_marker_in_search_order_claims_drag() {
        let mut model = loaded_model();
        model.set_enabled(Axis::Time, true);
        place(&mut model, 2.0, 0.0);
        place(&mut model, 2.1, 0.0);
        model.set_enabled(Axis::Voltage, true);
        place(&mut model, 5.0, 0.0);
        place(&mut model, 5.0, 1.0);

        // time1, time2 and volt1 are all within 2% of this point
        let grab = PlotPos::new(2.05, 0.05);
        assert_eq!(model.marker_near(grab, &viewport()), Some(CursorId::TIME1));
        assert!(!model.handle_pointer(PointerEvent::Press(grab), &viewport()));
        assert_eq!(model.dragging(), Some(CursorId::TIME1));

        // a second press while dragging keeps the claim
        model.handle_pointer(PointerEvent::Press(PlotPos::new(2.1, 1.0)), &viewport());
        assert_eq!(model.dragging(), Some(CursorId::TIME1));

        assert!(model.handle_pointer(PointerEvent::Move(PlotPos::new(4.0, 3.0)), &viewport()));
        let readout = model.readout();
        assert_eq!(readout.position(CursorId::TIME1), Some(4.0));
        assert_eq!(readout.position(CursorId::TIME2), Some(2.1));
        assert_eq!(readout.position(CursorId::VOLT1), Some(0.0));
        assert_eq!(readout.position(CursorId::VOLT2), Some(1.0));

        assert!(model.handle_pointer(PointerEvent::Release, &viewport()));
        assert!(model.dragging().is_none());
    }

    #[test]
    fn test_zero_span_never_grabs() {
        let mut model = loaded_model();
        model.set_enabled(Axis::Time, true);
        place(&mut model, 2.0, 0.0);

        let flat = PlotViewport::new([2.0, 2.0], [0.0, 1.0]);
        model.handle_pointer(PointerEvent::Press(PlotPos::new(2.0, 0.0)), &flat);
        assert!(!model.is_dragging());
    }

    #[test]
    fn test_file_switch_restores_per_file_positions() {
        let mut model = loaded_model();
        model.set_enabled(Axis::Time, true);
        place(&mut model, 1.0, 0.0);
        place(&mut model, 2.0, 0.0);

        model.on_file_loaded("b.csv");
        assert_eq!(model.pair(Axis::Time).state, PairState::AwaitingFirst);
        place(&mut model, 8.0, 0.0);

        model.on_file_loaded("a.csv");
        assert_eq!(model.readout().delta_t, Some(1.0));
        assert_eq!(model.memory().len(), 2);

        model.on_file_loaded("b.csv");
        assert_eq!(
            model.pair(Axis::Time).state,
            PairState::AwaitingSecond { first: 8.0 }
        );
    }

    #[test]
    fn test_disabled_pair_remembered_across_files() {
        let mut model = loaded_model();
        model.set_enabled(Axis::Time, true);
        place(&mut model, 1.0, 0.0);
        place(&mut model, 4.0, 0.0);
        model.set_enabled(Axis::Time, false);

        model.on_file_loaded("b.csv");
        model.on_file_loaded("a.csv");
        model.set_enabled(Axis::Time, true);
        assert_eq!(model.readout().delta_t, Some(3.0));
    }
}
