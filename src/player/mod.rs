pub mod error;
pub mod memory;
pub mod spotify;
pub mod traits;

pub use error::{PlaybackError, Result};
pub use memory::{MemoryPlayer, ServiceCall};
pub use spotify::SpotifyPlayer;
pub use traits::{
    ContextKind, Device, Offset, PlayTarget, PlaybackContext, PlaybackService, PlaybackSnapshot,
    QueueSnapshot, StartPlayback, TrackItem,
};

use crate::app::config::AppConfig;
use anyhow::{bail, Context};
use std::sync::Arc;
use std::time::Duration;

/// Factory for the service the controller talks to 🎛️
pub fn get_player(config: &AppConfig, demo: bool) -> anyhow::Result<Arc<dyn PlaybackService>> {
    if demo {
        return Ok(Arc::new(MemoryPlayer::demo()));
    }

    let Some(token) = config.access_token() else {
        bail!("No access token: set SPOTIFY_ACCESS_TOKEN or `access_token` in the config file (or run with --demo)");
    };

    let player = SpotifyPlayer::new(
        config.api_base_url.as_str(),
        token,
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("Failed to build the Spotify client")?;
    Ok(Arc::new(player))
}
