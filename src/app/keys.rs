use crate::app::actions::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

/// Function-key alternates, for keyboards or macro pads that send F13-F20
pub const HOTKEYS: [(&str, Action); 8] = [
    ("F13", Action::Previous),
    ("F14", Action::HopIn),
    ("F15", Action::Next),
    ("F16", Action::SeekBackward),
    ("F17", Action::QueueTop),
    ("F18", Action::SeekForward),
    ("F19", Action::HopOut),
    ("F20", Action::TogglePlayback),
];

/// What a key press asks the front end to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyIntent {
    Quit,
    Run(Action),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    pub quit: String,

    // Transport
    pub toggle_playback: String,
    pub next_track: String,
    pub prev_track: String,
    pub seek_forward: String,
    pub seek_backward: String,

    // Stack
    pub hop_in: String,
    pub hop_in_start: String,
    pub hop_out: String,
    pub queue_top: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            quit: "q".to_string(),

            toggle_playback: "Space".to_string(),
            next_track: "n".to_string(),
            prev_track: "p".to_string(),
            seek_forward: "l".to_string(),
            seek_backward: "h".to_string(),

            hop_in: "i".to_string(),
            hop_in_start: "I".to_string(),
            hop_out: "o".to_string(),
            queue_top: "t".to_string(),
        }
    }
}

impl KeyConfig {
    pub fn matches(&self, event: KeyEvent, key_str: &str) -> bool {
        match key_str {
            "Space" => event.code == KeyCode::Char(' '),
            "Enter" => event.code == KeyCode::Enter,
            "Backspace" => event.code == KeyCode::Backspace,
            "Esc" => event.code == KeyCode::Esc,
            "Tab" => event.code == KeyCode::Tab,
            "Up" => event.code == KeyCode::Up,
            "Down" => event.code == KeyCode::Down,
            "Left" => event.code == KeyCode::Left,
            "Right" => event.code == KeyCode::Right,
            s if s.len() == 1 => {
                let Some(ch) = s.chars().next() else {
                    return false;
                };
                if ch.is_uppercase() {
                    event.code == KeyCode::Char(ch)
                        || (event.code == KeyCode::Char(ch.to_ascii_lowercase())
                            && event.modifiers.contains(KeyModifiers::SHIFT))
                } else if ch.is_lowercase() {
                    // Shift+letter belongs to the uppercase binding
                    event.code == KeyCode::Char(ch) && !event.modifiers.contains(KeyModifiers::SHIFT)
                } else {
                    event.code == KeyCode::Char(ch)
                }
            }
            s if s.starts_with('F') => s[1..]
                .parse::<u8>()
                .map(|n| event.code == KeyCode::F(n))
                .unwrap_or(false),
            _ => false,
        }
    }

    pub fn bindings(&self) -> [(&str, Action); 9] {
        [
            (self.prev_track.as_str(), Action::Previous),
            (self.toggle_playback.as_str(), Action::TogglePlayback),
            (self.next_track.as_str(), Action::Next),
            (self.queue_top.as_str(), Action::QueueTop),
            (self.seek_backward.as_str(), Action::SeekBackward),
            (self.seek_forward.as_str(), Action::SeekForward),
            (self.hop_in.as_str(), Action::HopIn),
            (self.hop_in_start.as_str(), Action::HopInFromStart),
            (self.hop_out.as_str(), Action::HopOut),
        ]
    }

    pub fn intent(&self, event: KeyEvent) -> Option<KeyIntent> {
        if self.matches(event, &self.quit) || is_ctrl_c(event) {
            return Some(KeyIntent::Quit);
        }
        self.bindings()
            .into_iter()
            .chain(HOTKEYS)
            .find(|(key, _)| self.matches(event, key))
            .map(|(_, action)| KeyIntent::Run(action))
    }

    // Helper for UI display
    pub fn display(&self, key_str: &str) -> String {
        match key_str {
            "Space" => "Space".to_string(),
            "Up" => "↑".to_string(),
            "Down" => "↓".to_string(),
            "Left" => "←".to_string(),
            "Right" => "→".to_string(),
            "Backspace" => "Bksp".to_string(),
            _ => key_str.to_string(),
        }
    }
}

fn is_ctrl_c(event: KeyEvent) -> bool {
    event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL)
}
