//! The navigation stack: hop into a context, hop back out to exactly where you were.
//!
//! The remote service only knows "what is playing now" and "start playing this".
//! History lives here, as a stack of [`Frame`]s owned by one controller.
//!
//! Every operation issues at most one write. Expected no-op outcomes come back as
//! `Ok(status)`; only remote failures are errors. A failed hop-out never pops, and
//! a failed hop-in keeps its pushed frame.

use super::frame::{self, Frame, FrameTarget};
use crate::player::traits::short_uri;
use crate::player::{PlaybackService, PlaybackSnapshot, Result, StartPlayback};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

pub const NO_PLAYBACK: &str = "No active playback.";
pub const EMPTY_STACK: &str = "Stack is empty.";
pub const EMPTY_STACK_LINE: &str = "(empty)";
pub const TOP_QUEUE_LABEL: &str = "Top Queue";
pub const AD_HOC_LABEL: &str = "Ad-hoc queue";

/// "Back" restarts the current track once playback is this far in
const RESTART_THRESHOLD_MS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    pub top_tracks_max: usize,
    pub top_tracks_batch: u32,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            top_tracks_max: 200,
            top_tracks_batch: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    pub title: String,
    pub source: String,
    pub progress_ms: u64,
    pub duration_ms: u64,
    pub is_playing: bool,
}

/// Everything the front end redraws on a refresh
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    pub now_playing: Option<NowPlaying>,
    pub refresh_error: Option<String>,
    pub stack_lines: Vec<String>,
    pub depth: usize,
}

pub struct NavigationController {
    service: Arc<dyn PlaybackService>,
    stack: Vec<Frame>,
    /// Last ad-hoc list this controller started; fallback for resume lists
    active_tracks: Vec<String>,
    /// Resolved context names, keyed by context URI
    names: Mutex<HashMap<String, String>>,
    options: ControllerOptions,
}

impl NavigationController {
    pub fn new(service: Arc<dyn PlaybackService>, options: ControllerOptions) -> Self {
        Self {
            service,
            stack: Vec::new(),
            active_tracks: Vec::new(),
            names: Mutex::new(HashMap::new()),
            options,
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Oldest first.
    pub fn frames(&self) -> &[Frame] {
        &self.stack
    }

    pub fn active_track_list(&self) -> &[String] {
        &self.active_tracks
    }

    pub fn current_playback(&self) -> Result<Option<PlaybackSnapshot>> {
        self.service.current_playback()
    }

    // --- Transport ---

    pub fn toggle_playback(&self) -> Result<String> {
        let Some(playback) = self.service.current_playback()? else {
            return Ok(NO_PLAYBACK.to_string());
        };
        let device = self.device_for(Some(&playback));

        if playback.is_playing {
            self.service.pause(device.as_deref())?;
            Ok("Paused".to_string())
        } else {
            self.service.resume(device.as_deref())?;
            Ok("Playing".to_string())
        }
    }

    pub fn next_track(&self) -> Result<String> {
        let device = self.resolve_device();
        self.service.skip_next(device.as_deref())?;
        Ok("Skipped".to_string())
    }

    pub fn previous_track(&self) -> Result<String> {
        let Some(playback) = self.service.current_playback()? else {
            return Ok(NO_PLAYBACK.to_string());
        };
        let device = self.device_for(Some(&playback));

        if playback.progress_ms < RESTART_THRESHOLD_MS {
            self.service.skip_previous(device.as_deref())?;
        } else {
            self.service.seek(device.as_deref(), 0)?;
        }
        Ok("Previous".to_string())
    }

    /// Seeks by `delta_seconds`, clamped to the current track.
    pub fn seek_relative(&self, delta_seconds: i64) -> Result<String> {
        let Some(playback) = self.service.current_playback()? else {
            return Ok(NO_PLAYBACK.to_string());
        };
        let Some(item) = playback.item.as_ref() else {
            return Ok(NO_PLAYBACK.to_string());
        };

        let duration = i64::try_from(item.duration_ms).unwrap_or(i64::MAX);
        let progress = i64::try_from(playback.progress_ms).unwrap_or(i64::MAX);
        let target = progress
            .saturating_add(delta_seconds.saturating_mul(1000))
            .clamp(0, duration) as u64;

        let device = self.device_for(Some(&playback));
        self.service.seek(device.as_deref(), target)?;
        Ok(format!("Seeked to {}s", target / 1000))
    }

    // --- Navigation ---

    /// Pushes the current situation and switches to the current track's album.
    ///
    /// Without `from_start` the album starts at the current track and position; with
    /// it, at the album's first track.
    pub fn hop_in_album(&mut self, from_start: bool) -> Result<String> {
        let Some(playback) = self.service.current_playback()? else {
            return Ok(NO_PLAYBACK.to_string());
        };
        let Some(item) = playback.item.as_ref() else {
            return Ok(NO_PLAYBACK.to_string());
        };
        let Some(album_uri) = item.album_uri.clone() else {
            info!("Hop in skipped: {} has no album", item.uri);
            return Ok("Current track has no album URI.".to_string());
        };
        let Some(frame) = self.capture_frame(&playback) else {
            warn!("Hop in skipped: nothing to come back to for {}", item.uri);
            return Ok("Cannot hop in: current playback has no resumable context or queue.".to_string());
        };

        let request = if from_start {
            StartPlayback::context(album_uri.as_str()).at_index(0).from_ms(0)
        } else {
            StartPlayback::context(album_uri.as_str())
                .at_track(item.uri.as_str())
                .from_ms(playback.progress_ms)
        };
        let device = self.device_for(Some(&playback));

        self.push(frame);
        self.service.start(device.as_deref(), &request)?;

        if from_start {
            Ok(format!("Hop in start: {}", album_uri))
        } else {
            Ok(format!("Hop in: {}", album_uri))
        }
    }

    /// Restores the top frame; pops it only once the service accepted the restore.
    pub fn hop_out(&mut self) -> Result<String> {
        let Some(top) = self.stack.last() else {
            return Ok(EMPTY_STACK.to_string());
        };
        let request = top.resume_request();
        let (status, restored_list) = match &top.target {
            FrameTarget::Context { .. } => ("Hop out: resumed context", None),
            FrameTarget::Queue { track_uris, .. } => {
                ("Hop out: resumed queue snapshot", Some(track_uris.clone()))
            }
        };

        let device = self.resolve_device();
        self.service.start(device.as_deref(), &request)?;

        if let Some(list) = restored_list {
            self.active_tracks = list;
        }
        self.stack.pop();
        info!(depth = self.stack.len(), "Popped frame");
        Ok(status.to_string())
    }

    /// Starts a random selection of the user's top tracks, pushing the current
    /// situation first when something is loaded.
    pub fn queue_new_from_top_tracks(&mut self, size: usize) -> Result<String> {
        let playback = self.service.current_playback()?;
        let frame = playback
            .as_ref()
            .filter(|p| p.item.is_some())
            .and_then(|p| {
                let frame = self.capture_frame(p);
                if frame.is_none() {
                    warn!("Current playback cannot be resumed later; entering queue without a frame");
                }
                frame
            });

        let pool = self.get_all_top_tracks(self.options.top_tracks_max, self.options.top_tracks_batch)?;
        let size = size.min(pool.len());
        if size == 0 {
            return Ok("No top tracks available.".to_string());
        }

        if let Some(frame) = frame {
            self.push(frame);
        }

        let mut rng = rand::thread_rng();
        let selection: Vec<String> = rand::seq::index::sample(&mut rng, pool.len(), size)
            .into_iter()
            .map(|i| pool[i].clone())
            .collect();
        self.active_tracks = selection.clone();

        let device = self.device_for(playback.as_ref());
        self.service.start(device.as_deref(), &StartPlayback::tracks(selection))?;
        Ok(format!("Entered queue: shuffled top {}", size))
    }

    /// Pages through the user's top tracks until `max_tracks` or the end of data.
    pub fn get_all_top_tracks(&self, max_tracks: usize, batch_size: u32) -> Result<Vec<String>> {
        let mut tracks = Vec::new();
        if batch_size == 0 {
            return Ok(tracks);
        }

        let mut offset = 0u32;
        while tracks.len() < max_tracks {
            let page = self.service.top_tracks(batch_size, offset)?;
            if page.is_empty() {
                break;
            }
            tracks.extend(page);
            offset = offset.saturating_add(batch_size);
        }

        tracks.truncate(max_tracks);
        debug!("Fetched {} top tracks", tracks.len());
        Ok(tracks)
    }

    // --- Display ---

    /// One line per frame, most recent first, or a lone `"(empty)"` sentinel.
    pub fn stack_summary(&self) -> impl Iterator<Item = String> + '_ {
        let placeholder = self.stack.is_empty().then(|| EMPTY_STACK_LINE.to_string());
        placeholder.into_iter().chain(
            self.stack
                .iter()
                .rev()
                .enumerate()
                .map(|(i, frame)| frame.summary_line(i + 1)),
        )
    }

    /// Human label for where the given (current) playback comes from.
    ///
    /// Resolved names are cached per context URI; failed lookups are retried next time.
    pub fn describe_playback_source(&self, snapshot: &PlaybackSnapshot) -> String {
        match snapshot.context_uri() {
            Some(uri) => self.context_name(uri),
            None if !self.active_tracks.is_empty() => TOP_QUEUE_LABEL.to_string(),
            None => AD_HOC_LABEL.to_string(),
        }
    }

    /// Current playback plus the stack summary; never fails.
    pub fn display_state(&self) -> DisplayState {
        let (now_playing, refresh_error) = match self.service.current_playback() {
            Ok(Some(playback)) => {
                let now = playback.item.as_ref().map(|item| NowPlaying {
                    title: format!("{} - {}", item.display_name(), item.artist_names()),
                    source: self.describe_playback_source(&playback),
                    progress_ms: playback.progress_ms,
                    duration_ms: item.duration_ms,
                    is_playing: playback.is_playing,
                });
                (now, None)
            }
            Ok(None) => (None, None),
            Err(e) => (None, Some(format!("Refresh error: {}", e))),
        };

        DisplayState {
            now_playing,
            refresh_error,
            stack_lines: self.stack_summary().collect(),
            depth: self.depth(),
        }
    }

    // --- Internals ---

    fn context_name(&self, uri: &str) -> String {
        let mut names = self.names.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(name) = names.get(uri) {
            return name.clone();
        }

        match self.service.display_name(uri) {
            Ok(name) if !name.trim().is_empty() => {
                names.insert(uri.to_string(), name.clone());
                name
            }
            Ok(_) => short_uri(uri),
            Err(e) => {
                debug!("No display name for {}: {}", uri, e);
                short_uri(uri)
            }
        }
    }

    fn push(&mut self, frame: Frame) {
        debug!("Pushing frame {:?}", frame.target);
        self.stack.push(frame);
        info!(depth = self.stack.len(), "Pushed frame");
    }

    fn capture_frame(&self, playback: &PlaybackSnapshot) -> Option<Frame> {
        // A context frame never replays a list, so skip the queue read
        let resume = if playback.context.is_some() {
            None
        } else {
            self.snapshot_resume_list()
        };
        let label = self.describe_playback_source(playback);
        Frame::capture(playback, resume, label)
    }

    /// "Now playing + upcoming" from the service, else the last ad-hoc list.
    fn snapshot_resume_list(&self) -> Option<Vec<String>> {
        let from_queue: Vec<String> = match self.service.queue() {
            Ok(queue) => queue
                .currently_playing
                .into_iter()
                .chain(queue.upcoming)
                .collect(),
            Err(e) => {
                warn!("Queue read failed, falling back to the active track list: {}", e);
                Vec::new()
            }
        };

        if from_queue.is_empty() {
            frame::resume_list(self.active_tracks.iter().cloned())
        } else {
            frame::resume_list(from_queue)
        }
    }

    fn device_for(&self, playback: Option<&PlaybackSnapshot>) -> Option<String> {
        if let Some(id) = playback.and_then(|p| p.device_id.clone()) {
            return Some(id);
        }
        match self.service.devices() {
            Ok(devices) => devices
                .iter()
                .find(|d| d.is_active)
                .or(devices.first())
                .and_then(|d| d.id.clone()),
            Err(e) => {
                debug!("Device list unavailable: {}", e);
                None
            }
        }
    }

    fn resolve_device(&self) -> Option<String> {
        match self.service.current_playback() {
            Ok(playback) => self.device_for(playback.as_ref()),
            Err(e) => {
                debug!("Playback read failed while resolving device: {}", e);
                self.device_for(None)
            }
        }
    }
}
