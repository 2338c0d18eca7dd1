// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline vocabulary shared by the playback model and its collaborators.

use serde::{Deserialize, Serialize};

/// Position on the animation timeline, in milliseconds of animation time.
///
/// This is timeline position, not wall-clock time. Breakpoints are expressed
/// in the same unit.
pub type Duration = f64;

/// Wall-clock time in milliseconds, as supplied by the frame host.
pub type TimeStamp = f64;

/// Playback direction
///
/// The numeric encoding is meaningful: it is multiplied against the tempo
/// to produce a signed playback rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i8)]
pub enum Direction {
    /// Moving towards the end of the sequence
    Forwards = 1,
    /// Not moving
    #[default]
    Paused = 0,
    /// Moving towards the start of the sequence
    Backwards = -1,
}

impl Direction {
    /// Signed rate multiplier for this direction
    pub fn sign(self) -> f64 {
        f64::from(self as i8)
    }

    /// Check if the cursor moves in this direction
    pub fn is_moving(self) -> bool {
        !matches!(self, Direction::Paused)
    }

    /// Whether `cursor` has passed `break_point` when moving in this direction
    pub fn overshoots(self, cursor: Duration, break_point: Duration) -> bool {
        match self {
            Direction::Forwards => cursor > break_point,
            Direction::Backwards => cursor < break_point,
            Direction::Paused => false,
        }
    }

    /// Get display name for this direction
    pub fn display_name(self) -> &'static str {
        match self {
            Direction::Forwards => "Forwards",
            Direction::Paused => "Paused",
            Direction::Backwards => "Backwards",
        }
    }
}

/// Granularity at which the breakpoint source reports the next stopping point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BreakPointType {
    /// Stop at the next move boundary
    Move,
    /// Stop only at either end of the move sequence
    #[default]
    EntireMoveSequence,
}

/// Provider of the timeline structure.
///
/// Implementations are queried by the playback model on every frame, so
/// queries should be cheap and side-effect free.
pub trait BreakPointSource {
    /// Position of the first breakpoint of the whole timeline
    fn first_break_point(&self) -> Duration;

    /// Position of the last breakpoint of the whole timeline
    fn last_break_point(&self) -> Duration;

    /// Next breakpoint reached when moving in `direction` from `from_cursor`
    fn break_point(
        &self,
        direction: Direction,
        granularity: BreakPointType,
        from_cursor: Duration,
    ) -> Duration;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_sign() {
        assert_eq!(Direction::Forwards.sign(), 1.0);
        assert_eq!(Direction::Paused.sign(), 0.0);
        assert_eq!(Direction::Backwards.sign(), -1.0);
        assert_eq!(Direction::default(), Direction::Paused);
    }

    #[test]
    fn test_overshoot() {
        assert!(Direction::Forwards.overshoots(15.0, 12.0));
        assert!(!Direction::Forwards.overshoots(12.0, 12.0));
        assert!(Direction::Backwards.overshoots(-1.0, 0.0));
        assert!(!Direction::Backwards.overshoots(3.0, 0.0));
        assert!(!Direction::Paused.overshoots(100.0, 0.0));
    }
}
