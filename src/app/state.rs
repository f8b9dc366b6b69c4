use super::actions::ActionSettings;
use super::keys::KeyConfig;
use super::refresh::RefreshGate;
use crate::stack::{DisplayState, NowPlaying, EMPTY_STACK_LINE};
use crate::ui::theme::Theme;
use std::time::{Duration, Instant};

const TOAST_DURATION: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub start_time: Instant,
    pub deadline: Instant,
}

pub struct App {
    pub theme: Theme,
    pub keys: KeyConfig,
    pub settings: ActionSettings,

    pub is_running: bool,
    pub demo: bool,

    pub now_playing: Option<NowPlaying>,
    pub stack_lines: Vec<String>,
    pub depth: usize,
    /// Last action result or refresh error, shown until replaced
    pub status: String,
    pub toast: Option<Toast>,

    pub refresh: RefreshGate,
    /// When `now_playing` was last read, for interpolating progress ⏱️
    pub last_refresh: Option<Instant>,
}

impl App {
    pub fn new(keys: KeyConfig, settings: ActionSettings, demo: bool) -> Self {
        Self {
            theme: Theme::default(),
            keys,
            settings,
            is_running: true,
            demo,
            now_playing: None,
            stack_lines: vec![EMPTY_STACK_LINE.to_string()],
            depth: 0,
            status: "Ready".to_string(),
            toast: None,
            refresh: RefreshGate::default(),
            last_refresh: None,
        }
    }

    /// Takes a finished refresh. A failed read keeps the last known track on screen.
    pub fn apply_refresh(&mut self, state: DisplayState) {
        match state.refresh_error {
            Some(error) => self.status = error,
            None => {
                self.now_playing = state.now_playing;
                self.last_refresh = Some(Instant::now());
            }
        }
        self.stack_lines = state.stack_lines;
        self.depth = state.depth;
    }

    pub fn apply_action_result(&mut self, status: String) {
        self.status = status;
        self.toast = None;
    }

    pub fn get_current_position_ms(&self) -> u64 {
        let Some(now) = &self.now_playing else {
            return 0;
        };
        match self.last_refresh {
            Some(last) if now.is_playing => {
                let elapsed = last.elapsed().as_millis() as u64;
                (now.progress_ms + elapsed).min(now.duration_ms)
            }
            _ => now.progress_ms,
        }
    }

    pub fn show_toast(&mut self, message: &str) {
        let now = Instant::now();
        let deadline = now + TOAST_DURATION;

        if let Some(current) = self.toast.as_mut() {
            current.message = message.to_string();
            current.deadline = deadline;
        } else {
            self.toast = Some(Toast {
                message: message.to_string(),
                start_time: now,
                deadline,
            });
        }
    }

    /// Called every tick to update state
    pub fn on_tick(&mut self) {
        if let Some(toast) = &self.toast {
            if Instant::now() > toast.deadline {
                self.toast = None;
            }
        }
    }
}
