// SPDX-License-Identifier: MIT OR Apache-2.0
//! Playback timeline for twisty puzzle animations.
//!
//! This crate drives a move-by-move animation cursor:
//! - Forward/backward playback at a fixed tempo
//! - Stepping one move at a time
//! - Skipping to either end of the sequence
//! - Cursor and direction change notifications
//!
//! ## Architecture
//!
//! The timeline is built on:
//! - A breakpoint source describing where playback stops
//! - A frame scheduler wrapping the host's one-shot frame callback
//! - A notification dispatcher for observers
//! - The playback model tying them together
//!
//! Everything here is single-threaded. The host delivers commands and frame
//! callbacks serially on one thread.

pub mod breakpoints;
pub mod config;
pub mod error;
pub mod host;
pub mod model;
pub mod observer;
pub mod scheduler;
pub mod timeline;

pub use breakpoints::MoveBreakPoints;
pub use config::{PlaybackConfig, DEFAULT_TEMPO};
pub use error::{ConfigError, ObserverKind, PlaybackError, Result};
pub use host::ManualFrameHost;
pub use model::{PlaybackModel, SessionId};
pub use observer::{CursorObserver, DirectionObserver, NotificationDispatcher};
pub use scheduler::{FrameCallback, FrameHost, FrameScheduler};
pub use timeline::{BreakPointSource, BreakPointType, Direction, Duration, TimeStamp};
