//! Placement state machine for one marker pair

use super::{Axis, CursorColor, MarkerSlot};

/// Positions of the two markers of a pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PairPositions {
    pub first: Option<f64>,
    pub second: Option<f64>,
}

impl PairPositions {
    /// Both markers placed
    pub fn both(first: f64, second: f64) -> Self {
        Self {
            first: Some(first),
            second: Some(second),
        }
    }

    /// Position of one marker
    pub fn get(&self, slot: MarkerSlot) -> Option<f64> {
        match slot {
            MarkerSlot::First => self.first,
            MarkerSlot::Second => self.second,
        }
    }

    /// Check if neither marker is placed
    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.second.is_none()
    }
}

/// Events accepted by [`PairState::transition`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairEvent {
    /// Toggle on, restoring remembered positions if any
    Enable(PairPositions),
    /// Toggle off
    Disable,
    /// Placement gesture at a data-space coordinate
    Place(f64),
    /// Remove placed markers but stay enabled
    Clear,
}

/// Placement state of a marker pair
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PairState {
    /// Toggle off; no markers
    #[default]
    Disabled,
    /// Toggle on, nothing placed yet
    AwaitingFirst,
    /// First marker placed
    AwaitingSecond { first: f64 },
    /// Both markers placed; further placements are ignored
    BothPlaced { first: f64, second: f64 },
}

impl PairState {
    /// Apply an event and return the next state
    pub fn transition(self, event: PairEvent) -> PairState {
        match (self, event) {
            (PairState::Disabled, PairEvent::Enable(remembered)) => {
                match (remembered.first, remembered.second) {
                    (Some(first), Some(second)) => PairState::BothPlaced { first, second },
                    (Some(first), None) => PairState::AwaitingSecond { first },
                    _ => PairState::AwaitingFirst,
                }
            }
            (PairState::Disabled, _) => PairState::Disabled,
            (_, PairEvent::Disable) => PairState::Disabled,
            (_, PairEvent::Clear) => PairState::AwaitingFirst,
            (PairState::AwaitingFirst, PairEvent::Place(first)) => {
                PairState::AwaitingSecond { first }
            }
            (PairState::AwaitingSecond { first }, PairEvent::Place(second)) => {
                PairState::BothPlaced { first, second }
            }
            (state, _) => state,
        }
    }

    /// Check if the toggle is on
    pub fn is_enabled(&self) -> bool {
        !matches!(self, PairState::Disabled)
    }

    /// Check if a placement gesture would change the state
    pub fn accepts_placement(&self) -> bool {
        matches!(
            self,
            PairState::AwaitingFirst | PairState::AwaitingSecond { .. }
        )
    }

    /// Placed marker positions
    pub fn positions(&self) -> PairPositions {
        match *self {
            PairState::Disabled | PairState::AwaitingFirst => PairPositions::default(),
            PairState::AwaitingSecond { first } => PairPositions {
                first: Some(first),
                second: None,
            },
            PairState::BothPlaced { first, second } => PairPositions::both(first, second),
        }
    }

    /// Move an already placed marker; unplaced slots are left alone
    pub fn moved(self, slot: MarkerSlot, value: f64) -> PairState {
        match (self, slot) {
            (PairState::AwaitingSecond { .. }, MarkerSlot::First) => {
                PairState::AwaitingSecond { first: value }
            }
            (PairState::BothPlaced { second, .. }, MarkerSlot::First) => PairState::BothPlaced {
                first: value,
                second,
            },
            (PairState::BothPlaced { first, .. }, MarkerSlot::Second) => PairState::BothPlaced {
                first,
                second: value,
            },
            (state, _) => state,
        }
    }
}

/// One pair of markers on a single axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerPair {
    pub axis: Axis,
    pub state: PairState,
    pub color: CursorColor,
}

impl MarkerPair {
    /// Create a disabled pair
    pub fn new(axis: Axis, color: CursorColor) -> Self {
        Self {
            axis,
            state: PairState::Disabled,
            color,
        }
    }

    /// Feed an event through the state machine
    pub fn apply(&mut self, event: PairEvent) {
        let next = self.state.transition(event);
        if next != self.state {
            tracing::debug!("{} cursors: {:?} -> {:?}", self.axis.label(), self.state, next);
        }
        self.state = next;
    }

    /// Position of one marker
    pub fn position(&self, slot: MarkerSlot) -> Option<f64> {
        self.state.positions().get(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_sequence() {
        let state = PairState::Disabled
            .transition(PairEvent::Enable(PairPositions::default()))
            .transition(PairEvent::Place(1.0));
        assert_eq!(state, PairState::AwaitingSecond { first: 1.0 });

        let state = state.transition(PairEvent::Place(3.0));
        assert_eq!(
            state,
            PairState::BothPlaced {
                first: 1.0,
                second: 3.0
            }
        );

        // terminal for placement
        assert_eq!(state.transition(PairEvent::Place(9.0)), state);
        assert!(!state.accepts_placement());
    }

    #[test]
    fn test_enable_restores_remembered() {
        let state = PairState::Disabled.transition(PairEvent::Enable(PairPositions::both(2.0, 4.0)));
        assert_eq!(state.positions(), PairPositions::both(2.0, 4.0));

        let partial = PairPositions {
            first: Some(2.0),
            second: None,
        };
        let state = PairState::Disabled.transition(PairEvent::Enable(partial));
        assert_eq!(state, PairState::AwaitingSecond { first: 2.0 });
    }

    #[test]
    fn test_disabled_ignores_everything_but_enable() {
        for event in [PairEvent::Disable, PairEvent::Place(1.0), PairEvent::Clear] {
            assert_eq!(PairState::Disabled.transition(event), PairState::Disabled);
        }
    }

    #[test]
    fn test_enable_when_enabled_is_noop() {
        let state = PairState::AwaitingSecond { first: 1.0 };
        assert_eq!(
            state.transition(PairEvent::Enable(PairPositions::both(5.0, 6.0))),
            state
        );
    }

    #[test]
    fn test_disable_and_clear() {
        let placed = PairState::BothPlaced {
            first: 1.0,
            second: 2.0,
        };
        assert_eq!(placed.transition(PairEvent::Disable), PairState::Disabled);
        assert_eq!(placed.transition(PairEvent::Clear), PairState::AwaitingFirst);
    }

    #[test]
    fn test_moved_only_touches_placed_markers() {
        let state = PairState::AwaitingSecond { first: 1.0 };
        assert_eq!(state.moved(MarkerSlot::Second, 5.0), state);
        assert_eq!(
            state.moved(MarkerSlot::First, 0.5),
            PairState::AwaitingSecond { first: 0.5 }
        );
        assert_eq!(PairState::AwaitingFirst.moved(MarkerSlot::First, 1.0), PairState::AwaitingFirst);
    }
}
