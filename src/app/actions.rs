use crate::player::Result;
use crate::stack::NavigationController;

/// A user command the front end hands to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Previous,
    TogglePlayback,
    Next,
    QueueTop,
    SeekBackward,
    SeekForward,
    HopIn,
    HopInFromStart,
    HopOut,
}

/// Tunables actions read from the config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSettings {
    pub seek_step_secs: i64,
    pub queue_size: usize,
}

impl Default for ActionSettings {
    fn default() -> Self {
        Self {
            seek_step_secs: 10,
            queue_size: 30,
        }
    }
}

impl Action {
    /// Runs against the controller and returns the status line to show.
    pub fn perform(self, controller: &mut NavigationController, settings: &ActionSettings) -> Result<String> {
        match self {
            Action::Previous => controller.previous_track(),
            Action::TogglePlayback => controller.toggle_playback(),
            Action::Next => controller.next_track(),
            Action::QueueTop => controller.queue_new_from_top_tracks(settings.queue_size),
            Action::SeekBackward => controller.seek_relative(-settings.seek_step_secs),
            Action::SeekForward => controller.seek_relative(settings.seek_step_secs),
            Action::HopIn => controller.hop_in_album(false),
            Action::HopInFromStart => controller.hop_in_album(true),
            Action::HopOut => controller.hop_out(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::Previous => "Prev",
            Action::TogglePlayback => "Play/Pause",
            Action::Next => "Next",
            Action::QueueTop => "Top Queue",
            Action::SeekBackward => "Seek -",
            Action::SeekForward => "Seek +",
            Action::HopIn => "Hop In",
            Action::HopInFromStart => "Hop In (start)",
            Action::HopOut => "Hop Out",
        }
    }
}
