// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback cursor model.
//!
//! The model integrates scaled wall-clock time into a timeline cursor, stops
//! at breakpoints and exposes the play/pause/step/skip command surface.
//! Every motion command goes through one idempotent direction-change
//! primitive, which also starts and stops the frame loop.
//!
//! The model is single-threaded: commands and frame callbacks must be
//! delivered serially on the thread that owns it.

use crate::config::PlaybackConfig;
use crate::error::{ConfigError, Result};
use crate::observer::{CursorObserver, DirectionObserver, NotificationDispatcher};
use crate::scheduler::{FrameHost, FrameScheduler};
use crate::timeline::{BreakPointSource, BreakPointType, Direction, Duration, TimeStamp};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use uuid::Uuid;

/// Unique identifier for a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Create a new random session ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Mutable playback state
#[derive(Debug, Clone, Copy)]
struct CursorState {
    cursor: Duration,
    /// Wall-clock time the cursor was last reconciled at
    last_cursor_time: TimeStamp,
    direction: Direction,
    /// Granularity for the next breakpoint query
    break_point_type: BreakPointType,
}

struct ModelInner {
    session: SessionId,
    tempo: f64,
    state: RefCell<CursorState>,
    source: Box<dyn BreakPointSource>,
    host: Rc<dyn FrameHost>,
    scheduler: FrameScheduler,
    dispatcher: NotificationDispatcher,
}

/// Playback timeline for one animation session
///
/// Cloning yields another handle to the same model.
#[derive(Clone)]
pub struct PlaybackModel {
    inner: Rc<ModelInner>,
}

impl PlaybackModel {
    /// Create a paused model with the cursor on the first breakpoint
    pub fn new(
        source: impl BreakPointSource + 'static,
        host: Rc<dyn FrameHost>,
        config: &PlaybackConfig,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        let state = CursorState {
            cursor: source.first_break_point(),
            last_cursor_time: host.now(),
            direction: Direction::Paused,
            break_point_type: BreakPointType::EntireMoveSequence,
        };

        let inner = Rc::new_cyclic(|weak: &Weak<ModelInner>| {
            let weak = weak.clone();
            let scheduler = FrameScheduler::new(host.clone(), move |timestamp| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_frame(timestamp);
                }
            });
            ModelInner {
                session: SessionId::new(),
                tempo: config.tempo,
                state: RefCell::new(state),
                source: Box::new(source),
                host,
                scheduler,
                dispatcher: NotificationDispatcher::new(),
            }
        });

        tracing::debug!(
            session = %inner.session,
            tempo = inner.tempo,
            cursor = state.cursor,
            "Playback model created"
        );

        Ok(Self { inner })
    }

    /// Session this model belongs to
    pub fn session_id(&self) -> SessionId {
        self.inner.session
    }

    /// Current cursor position
    pub fn cursor(&self) -> Duration {
        self.inner.state.borrow().cursor
    }

    /// Current playback direction
    pub fn direction(&self) -> Direction {
        self.inner.state.borrow().direction
    }

    /// Granularity the next breakpoint query will use
    pub fn break_point_type(&self) -> BreakPointType {
        self.inner.state.borrow().break_point_type
    }

    /// Fixed tempo of this model
    pub fn tempo(&self) -> f64 {
        self.inner.tempo
    }

    /// Is currently moving (forward or backward)
    pub fn is_playing(&self) -> bool {
        self.direction().is_moving()
    }

    /// Whether the frame loop is active
    pub fn is_scheduling(&self) -> bool {
        self.inner.scheduler.is_scheduling()
    }

    // --- Observers ---

    /// Add a cursor listener
    pub fn register_cursor_observer(&self, observer: Rc<dyn CursorObserver>) -> Result<()> {
        self.inner.dispatcher.register_cursor_observer(observer)
    }

    /// Add a direction listener
    pub fn register_direction_observer(&self, observer: Rc<dyn DirectionObserver>) -> Result<()> {
        self.inner.dispatcher.register_direction_observer(observer)
    }

    /// Remove a cursor listener, returning whether it was registered
    pub fn unregister_cursor_observer(&self, observer: &Rc<dyn CursorObserver>) -> bool {
        self.inner.dispatcher.unregister_cursor_observer(observer)
    }

    /// Remove a direction listener, returning whether it was registered
    pub fn unregister_direction_observer(&self, observer: &Rc<dyn DirectionObserver>) -> bool {
        self.inner.dispatcher.unregister_direction_observer(observer)
    }

    // --- Commands ---

    /// Play to the end of the sequence
    pub fn play_forward(&self) {
        self.set_break_point_type(BreakPointType::EntireMoveSequence);
        self.inner.request_direction(Direction::Forwards);
    }

    /// Play back to the start of the sequence
    pub fn play_backward(&self) {
        self.set_break_point_type(BreakPointType::EntireMoveSequence);
        self.inner.request_direction(Direction::Backwards);
    }

    /// Pause playback
    pub fn pause(&self) {
        self.inner.request_direction(Direction::Paused);
    }

    /// Play forward to the next move boundary
    pub fn step_forward(&self) {
        self.set_break_point_type(BreakPointType::Move);
        self.inner.request_direction(Direction::Forwards);
    }

    /// Play backward to the previous move boundary
    pub fn step_backward(&self) {
        self.set_break_point_type(BreakPointType::Move);
        self.inner.request_direction(Direction::Backwards);
    }

    /// Toggle play/pause
    pub fn toggle_pause_play_forward(&self) {
        if self.direction() == Direction::Paused {
            self.play_forward();
        } else {
            self.pause();
        }
    }

    /// Pause and jump to the first breakpoint
    pub fn skip_to_start(&self) {
        let target = self.inner.source.first_break_point();
        self.inner.skip_to(target);
    }

    /// Pause and jump to the last breakpoint
    pub fn skip_to_end(&self) {
        let target = self.inner.source.last_break_point();
        self.inner.skip_to(target);
    }

    fn set_break_point_type(&self, break_point_type: BreakPointType) {
        self.inner.state.borrow_mut().break_point_type = break_point_type;
    }
}

impl ModelInner {
    /// Bring the cursor up to `timestamp` under the current direction.
    ///
    /// While paused this only moves the reference time forward, so paused
    /// time never counts as elapsed once playback resumes.
    fn reconcile(&self, state: &mut CursorState, timestamp: TimeStamp) {
        if state.direction == Direction::Paused {
            state.last_cursor_time = timestamp;
            return;
        }

        // The first frame of a session may predate the stored time
        let elapsed = (timestamp - state.last_cursor_time).max(0.0);
        state.cursor += elapsed * state.direction.sign() * self.tempo;
        state.last_cursor_time = timestamp;
    }

    /// Reconcile, then pull the cursor back onto the breakpoint the current
    /// motion was heading for if it went past it.
    ///
    /// Returns the breakpoint when one was reached.
    fn advance(&self, state: &mut CursorState, timestamp: TimeStamp) -> Option<Duration> {
        let previous = state.cursor;
        self.reconcile(state, timestamp);

        let direction = state.direction;
        if !direction.is_moving() {
            return None;
        }
        // Measured from where this motion started
        let break_point = self
            .source
            .break_point(direction, state.break_point_type, previous);
        let reached = direction.overshoots(state.cursor, break_point);
        if reached {
            state.cursor = break_point;
        }
        reached.then_some(break_point)
    }

    fn request_direction(&self, direction: Direction) {
        self.request_direction_at(direction, self.host.now());
    }

    fn request_direction_at(&self, direction: Direction, now: TimeStamp) {
        let (previous, cursor) = {
            let mut state = self.state.borrow_mut();
            if state.direction == direction {
                return;
            }
            // Motion since the last frame stops at its breakpoint
            self.advance(&mut state, now);
            let previous = state.direction;
            state.direction = direction;
            (previous, state.cursor)
        };

        tracing::debug!(
            session = %self.session,
            from = previous.display_name(),
            to = direction.display_name(),
            cursor,
            "Direction changed"
        );

        // Scheduler follows the new direction before anyone hears about it
        if direction == Direction::Paused {
            self.scheduler.stop();
        } else {
            self.scheduler.start();
        }
        self.dispatcher.notify_direction_changed(direction);
    }

    fn skip_to(&self, target: Duration) {
        self.request_direction(Direction::Paused);
        self.state.borrow_mut().cursor = target;
        tracing::debug!(session = %self.session, cursor = target, "Skipped");
        self.scheduler.single_frame();
    }

    fn on_frame(&self, timestamp: TimeStamp) {
        let reached = {
            let mut state = self.state.borrow_mut();
            let reached = self.advance(&mut state, timestamp);
            tracing::trace!(
                session = %self.session,
                timestamp,
                cursor = state.cursor,
                "Frame"
            );
            reached
        };

        if let Some(break_point) = reached {
            tracing::debug!(session = %self.session, break_point, "Reached breakpoint");
            self.request_direction_at(Direction::Paused, timestamp);
            self.scheduler.stop();
        }

        let cursor = self.state.borrow().cursor;
        self.dispatcher.notify_cursor_changed(cursor);
    }
}
