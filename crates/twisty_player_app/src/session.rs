// SPDX-License-Identifier: MIT OR Apache-2.0
//! Session files for the headless player.
//!
//! A session describes the move sequence to animate, the playback tempo,
//! the display frame rate and a script of commands to run against the
//! timeline.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration as StdDuration;
use twisty_player_timeline::{ConfigError, MoveBreakPoints, PlaybackConfig};

/// Default display refresh rate
pub const DEFAULT_FRAME_RATE: f64 = 60.0;

/// One move in the animated sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveSpec {
    /// Move notation, e.g. `R'`
    pub name: String,
    /// Animation length in milliseconds
    pub duration: f64,
}

impl MoveSpec {
    /// Create a move
    pub fn new(name: impl Into<String>, duration: f64) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }
}

/// A scripted player command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptStep {
    /// Play to the end
    PlayForward,
    /// Play back to the start
    PlayBackward,
    /// Pause
    Pause,
    /// Play to the next move boundary
    StepForward,
    /// Play back to the previous move boundary
    StepBackward,
    /// Play if paused, pause otherwise
    TogglePausePlayForward,
    /// Jump to the start
    SkipToStart,
    /// Jump to the end
    SkipToEnd,
    /// Let a number of display frames pass
    WaitFrames(u32),
    /// Let frames pass until the timeline stops
    WaitUntilPaused,
}

/// Complete player session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Timeline parameters
    pub playback: PlaybackConfig,
    /// Display frames per second
    pub frame_rate: f64,
    /// Moves to animate, in order
    pub moves: Vec<MoveSpec>,
    /// Commands to run
    pub script: Vec<ScriptStep>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            frame_rate: DEFAULT_FRAME_RATE,
            moves: ["R", "U", "R'", "U'"]
                .into_iter()
                .map(|name| MoveSpec::new(name, 1000.0))
                .collect(),
            script: vec![
                ScriptStep::PlayForward,
                ScriptStep::WaitUntilPaused,
                ScriptStep::StepBackward,
                ScriptStep::WaitUntilPaused,
                ScriptStep::StepBackward,
                ScriptStep::WaitUntilPaused,
                ScriptStep::SkipToStart,
                ScriptStep::WaitFrames(1),
                ScriptStep::StepForward,
                ScriptStep::WaitUntilPaused,
                ScriptStep::SkipToEnd,
                ScriptStep::WaitFrames(1),
            ],
        }
    }
}

impl SessionConfig {
    /// Check every value the player depends on
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.playback.validate()?;
        self.frame_interval()?;
        self.break_points().map(|_| ())
    }

    /// Parse and validate a RON document
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let session: SessionConfig = ron::from_str(source)?;
        session.validate()?;
        Ok(session)
    }

    /// Load and validate a RON session file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron_str(&content)
    }

    /// Breakpoints for the configured moves
    pub fn break_points(&self) -> Result<MoveBreakPoints, ConfigError> {
        MoveBreakPoints::from_durations(self.moves.iter().map(|m| m.duration))
    }

    /// Time between display frames
    ///
    /// Fails for rates that are not positive or whose interval does not fit
    /// in a [`StdDuration`].
    pub fn frame_interval(&self) -> Result<StdDuration, ConfigError> {
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(ConfigError::InvalidFrameRate(self.frame_rate));
        }
        StdDuration::try_from_secs_f64(1.0 / self.frame_rate)
            .map_err(|_| ConfigError::InvalidFrameRate(self.frame_rate))
    }
}
