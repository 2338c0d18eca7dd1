// SPDX-License-Identifier: MIT OR Apache-2.0
//! Twisty Player - headless puzzle animation player
//!
//! Loads a session file (RON) describing a move sequence and a command
//! script, then plays the script against the playback timeline in real
//! time, logging cursor and direction changes.
//!
//! ```text
//! twisty_player [session.ron]
//! ```
//!
//! Without an argument a built-in demo session is played.

mod host;
mod player;
mod session;

use player::{Player, PlayerError};
use session::SessionConfig;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn run(session_path: Option<PathBuf>) -> Result<(), PlayerError> {
    let session = match session_path {
        Some(path) => {
            tracing::info!("Loading session from {}", path.display());
            SessionConfig::load(&path)?
        }
        None => {
            tracing::info!("No session file given, playing the demo session");
            SessionConfig::default()
        }
    };

    let player = Player::new(&session)?;
    player.run_script(&session.script);

    tracing::info!(cursor = player.model().cursor(), "Session finished");
    Ok(())
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new("twisty_player=debug,twisty_player_timeline=debug")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Twisty Player v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(std::env::args_os().nth(1).map(PathBuf::from)) {
        tracing::error!("Player failed: {e}");
        std::process::exit(1);
    }
}
