// SPDX-License-Identifier: MIT OR Apache-2.0
//! Breakpoints derived from a list of move durations.

use crate::error::ConfigError;
use crate::timeline::{BreakPointSource, BreakPointType, Direction, Duration};

/// Breakpoint source for a flat sequence of timed moves
///
/// Move boundaries are the running sum of move durations, starting at zero.
/// Stepping stops at the next boundary; playing stops at either end.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveBreakPoints {
    /// Sorted boundaries; always holds at least the zero start point
    boundaries: Vec<Duration>,
}

impl MoveBreakPoints {
    /// Build from per-move durations
    pub fn from_durations(durations: impl IntoIterator<Item = Duration>) -> Result<Self, ConfigError> {
        let mut boundaries = vec![0.0];
        let mut end = 0.0;
        for (index, duration) in durations.into_iter().enumerate() {
            if !duration.is_finite() || duration < 0.0 {
                return Err(ConfigError::InvalidMoveDuration { index, duration });
            }
            end += duration;
            boundaries.push(end);
        }
        Ok(Self { boundaries })
    }

    /// `moves` moves of equal length
    pub fn uniform(moves: usize, duration: Duration) -> Result<Self, ConfigError> {
        Self::from_durations(std::iter::repeat(duration).take(moves))
    }

    /// Number of moves in the sequence
    pub fn move_count(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Length of the whole sequence
    pub fn total_duration(&self) -> Duration {
        self.last_break_point()
    }

    /// All move boundaries, including both ends
    pub fn boundaries(&self) -> &[Duration] {
        &self.boundaries
    }

    /// Number of moves fully played at `cursor`
    pub fn moves_completed(&self, cursor: Duration) -> usize {
        self.boundaries
            .partition_point(|b| *b <= cursor)
            .saturating_sub(1)
            .min(self.move_count())
    }

    fn next_boundary(&self, cursor: Duration) -> Duration {
        let idx = self.boundaries.partition_point(|b| *b <= cursor);
        self.boundaries
            .get(idx)
            .copied()
            .unwrap_or_else(|| self.last_break_point())
    }

    fn previous_boundary(&self, cursor: Duration) -> Duration {
        match self.boundaries.partition_point(|b| *b < cursor) {
            0 => self.first_break_point(),
            idx => self.boundaries[idx - 1],
        }
    }
}

impl BreakPointSource for MoveBreakPoints {
    fn first_break_point(&self) -> Duration {
        self.boundaries[0]
    }

    fn last_break_point(&self) -> Duration {
        self.boundaries[self.boundaries.len() - 1]
    }

    fn break_point(
        &self,
        direction: Direction,
        granularity: BreakPointType,
        from_cursor: Duration,
    ) -> Duration {
        match (direction, granularity) {
            (Direction::Paused, _) => from_cursor,
            (Direction::Forwards, BreakPointType::EntireMoveSequence) => self.last_break_point(),
            (Direction::Backwards, BreakPointType::EntireMoveSequence) => self.first_break_point(),
            (Direction::Forwards, BreakPointType::Move) => self.next_boundary(from_cursor),
            (Direction::Backwards, BreakPointType::Move) => self.previous_boundary(from_cursor),
        }
    }
}
