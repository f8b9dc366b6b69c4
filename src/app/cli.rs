use crate::app::actions::{Action, ActionSettings};
use crate::player::Result;
use crate::stack::{NavigationController, NO_PLAYBACK};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// hopstack - hop into an album, hop back out to exactly where you were 🎵
#[derive(Parser, Debug)]
#[command(name = "hopstack", version, about)]
pub struct Args {
    /// Use a simulated player with a small demo library
    #[arg(long)]
    pub demo: bool,

    /// Config file (default: <config dir>/hopstack/config.toml)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Generate default config.toml to stdout
    #[arg(long)]
    pub generate_config: bool,

    /// Run one command and exit instead of starting the UI
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the current track and where it plays from
    Status,
    /// Pause or resume
    Toggle,
    /// Skip to the next track
    Next,
    /// Previous track, or restart the current one
    Prev,
    /// Seek by a number of seconds (negative goes back)
    Seek {
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Start a shuffled selection of your top tracks
    QueueTop {
        #[arg(long, short = 's')]
        size: Option<usize>,
    },
}

impl Command {
    pub fn run(self, controller: &mut NavigationController, settings: &ActionSettings) -> Result<String> {
        match self {
            Command::Status => status(controller),
            Command::Toggle => Action::TogglePlayback.perform(controller, settings),
            Command::Next => Action::Next.perform(controller, settings),
            Command::Prev => Action::Previous.perform(controller, settings),
            Command::Seek { delta } => controller.seek_relative(delta),
            Command::QueueTop { size } => {
                controller.queue_new_from_top_tracks(size.unwrap_or(settings.queue_size))
            }
        }
    }
}

fn status(controller: &NavigationController) -> Result<String> {
    let Some(playback) = controller.current_playback()? else {
        return Ok(NO_PLAYBACK.to_string());
    };
    let Some(item) = playback.item.as_ref() else {
        return Ok(NO_PLAYBACK.to_string());
    };
    let state = if playback.is_playing { "Playing" } else { "Paused" };
    Ok(format!(
        "{}: {} - {}\nContext: {} | t={}s",
        state,
        item.display_name(),
        item.artist_names(),
        controller.describe_playback_source(&playback),
        playback.progress_ms / 1000
    ))
}
