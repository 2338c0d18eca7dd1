// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scripted playback over the timeline model.

use crate::host::PacedFrameHost;
use crate::session::{MoveSpec, ScriptStep, SessionConfig};
use std::cell::Cell;
use std::rc::Rc;
use twisty_player_timeline::{
    ConfigError, CursorObserver, Direction, Duration, MoveBreakPoints, PlaybackError,
    PlaybackModel,
};

/// Upper bound on frames for a single `WaitUntilPaused` step
const MAX_WAIT_FRAMES: usize = 60 * 60 * 10;

/// Error type for running a session
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// Session could not be loaded or validated
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Observer wiring failed
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),
}

/// Logs progress whenever the cursor enters a different move
struct MoveProgressLogger {
    moves: Vec<MoveSpec>,
    break_points: MoveBreakPoints,
    completed: Cell<Option<usize>>,
}

impl MoveProgressLogger {
    fn new(moves: Vec<MoveSpec>, break_points: MoveBreakPoints) -> Self {
        Self {
            moves,
            break_points,
            completed: Cell::new(None),
        }
    }

    fn describe(&self, completed: usize) -> &str {
        self.moves
            .get(completed)
            .map(|m| m.name.as_str())
            .unwrap_or("(end)")
    }
}

impl CursorObserver for MoveProgressLogger {
    fn on_cursor_changed(&self, cursor: Duration) {
        let completed = self.break_points.moves_completed(cursor);
        tracing::trace!(cursor, completed, "Cursor");
        if self.completed.replace(Some(completed)) != Some(completed) {
            tracing::info!(
                cursor,
                "Move {}/{}: {}",
                completed,
                self.break_points.move_count(),
                self.describe(completed)
            );
        }
    }
}

/// Headless player running one session
pub struct Player {
    host: Rc<PacedFrameHost>,
    model: PlaybackModel,
}

impl Player {
    /// Build the timeline for a session and attach logging observers
    pub fn new(session: &SessionConfig) -> Result<Self, PlayerError> {
        session.validate()?;

        let break_points = session.break_points()?;
        let host = Rc::new(PacedFrameHost::new(session.frame_interval()?));
        let model = PlaybackModel::new(break_points.clone(), host.clone(), &session.playback)?;

        model.register_cursor_observer(Rc::new(MoveProgressLogger::new(
            session.moves.clone(),
            break_points,
        )))?;
        model.register_direction_observer(Rc::new(|direction: Direction| {
            tracing::info!("Direction: {}", direction.display_name());
        }))?;

        tracing::info!(
            session = %model.session_id(),
            moves = session.moves.len(),
            tempo = model.tempo(),
            "Player ready"
        );

        Ok(Self { host, model })
    }

    /// The timeline being played
    pub fn model(&self) -> &PlaybackModel {
        &self.model
    }

    /// Run every step in order
    pub fn run_script(&self, script: &[ScriptStep]) {
        for step in script {
            self.run_step(*step);
        }
    }

    /// Run a single step
    pub fn run_step(&self, step: ScriptStep) {
        tracing::debug!(?step, cursor = self.model.cursor(), "Step");
        match step {
            ScriptStep::PlayForward => self.model.play_forward(),
            ScriptStep::PlayBackward => self.model.play_backward(),
            ScriptStep::Pause => self.model.pause(),
            ScriptStep::StepForward => self.model.step_forward(),
            ScriptStep::StepBackward => self.model.step_backward(),
            ScriptStep::TogglePausePlayForward => self.model.toggle_pause_play_forward(),
            ScriptStep::SkipToStart => self.model.skip_to_start(),
            ScriptStep::SkipToEnd => self.model.skip_to_end(),
            ScriptStep::WaitFrames(frames) => {
                self.host.run_frames(frames);
            }
            ScriptStep::WaitUntilPaused => {
                self.host.run_until_idle(MAX_WAIT_FRAMES);
            }
        }
    }
}
