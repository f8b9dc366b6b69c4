//! In-process playback service.
//!
//! Simulates the remote service well enough to drive the UI in `--demo` mode and to
//! assert exact write calls in tests. Every attempted write is recorded, including
//! the ones that fail through injection.

use super::error::{PlaybackError, Result};
use super::traits::{
    Device, Offset, PlayTarget, PlaybackContext, PlaybackService, PlaybackSnapshot,
    QueueSnapshot, StartPlayback, TrackItem,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A write issued against the service
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCall {
    Pause { device_id: Option<String> },
    Resume { device_id: Option<String> },
    Start { device_id: Option<String>, request: StartPlayback },
    SkipNext { device_id: Option<String> },
    SkipPrevious { device_id: Option<String> },
    Seek { device_id: Option<String>, position_ms: u64 },
}

#[derive(Default)]
struct MemoryState {
    playback: Option<PlaybackSnapshot>,
    queue: Option<QueueSnapshot>,
    devices: Vec<Device>,
    top_tracks: Vec<String>,
    names: HashMap<String, String>,
    catalog: HashMap<String, TrackItem>,
    collections: HashMap<String, Vec<String>>,
    /// Track list behind the current playback, for skip and queue simulation
    playing_list: Vec<String>,

    fail_playback: bool,
    fail_queue: bool,
    fail_writes: bool,
    fail_names: bool,

    calls: Vec<ServiceCall>,
    top_track_requests: Vec<(u32, u32)>,
}

impl MemoryState {
    fn track(&self, uri: &str) -> TrackItem {
        self.catalog.get(uri).cloned().unwrap_or_else(|| TrackItem {
            uri: uri.to_string(),
            name: super::traits::short_uri(uri),
            duration_ms: 180_000,
            artists: Vec::new(),
            album_uri: None,
        })
    }

    fn write(&mut self, call: ServiceCall) -> Result<()> {
        self.calls.push(call);
        if self.fail_writes {
            return Err(PlaybackError::Simulated("write rejected".to_string()));
        }
        Ok(())
    }

    fn loaded(&mut self) -> Result<&mut PlaybackSnapshot> {
        self.playback.as_mut().ok_or(PlaybackError::NoActiveDevice)
    }

    fn play_index(&mut self, index: usize, position_ms: u64) {
        let Some(uri) = self.playing_list.get(index).cloned() else {
            return;
        };
        let item = self.track(&uri);
        if let Some(playback) = self.playback.as_mut() {
            playback.item = Some(item);
            playback.progress_ms = position_ms;
            playback.is_playing = true;
        }
        self.queue = Some(QueueSnapshot {
            currently_playing: Some(uri),
            upcoming: self.playing_list[index + 1..].to_vec(),
        });
    }

    fn current_index(&self) -> Option<usize> {
        let uri = &self.playback.as_ref()?.item.as_ref()?.uri;
        self.playing_list.iter().position(|u| u == uri)
    }
}

#[derive(Default)]
pub struct MemoryPlayer {
    state: Mutex<MemoryState>,
}

impl MemoryPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn with_playback(self, playback: PlaybackSnapshot) -> Self {
        self.set_playback(Some(playback));
        self
    }

    pub fn with_queue(self, queue: QueueSnapshot) -> Self {
        self.lock().queue = Some(queue);
        self
    }

    pub fn with_devices(self, devices: Vec<Device>) -> Self {
        self.lock().devices = devices;
        self
    }

    pub fn with_top_tracks(self, uris: Vec<String>) -> Self {
        self.lock().top_tracks = uris;
        self
    }

    pub fn with_name(self, uri: &str, name: &str) -> Self {
        self.lock().names.insert(uri.to_string(), name.to_string());
        self
    }

    /// Registers a playable context and the catalog entries of its tracks.
    pub fn with_collection(self, uri: &str, name: &str, tracks: Vec<TrackItem>) -> Self {
        {
            let mut state = self.lock();
            state.names.insert(uri.to_string(), name.to_string());
            state
                .collections
                .insert(uri.to_string(), tracks.iter().map(|t| t.uri.clone()).collect());
            for track in tracks {
                state.catalog.insert(track.uri.clone(), track);
            }
        }
        self
    }

    pub fn set_playback(&self, playback: Option<PlaybackSnapshot>) {
        let mut state = self.lock();
        let list = playback
            .as_ref()
            .and_then(|p| p.context.as_ref())
            .and_then(|c| state.collections.get(&c.uri).cloned())
            .unwrap_or_default();
        state.playing_list = list;
        state.playback = playback;
    }

    pub fn playback(&self) -> Option<PlaybackSnapshot> {
        self.lock().playback.clone()
    }

    pub fn set_fail_playback(&self, fail: bool) {
        self.lock().fail_playback = fail;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    pub fn set_fail_queue(&self, fail: bool) {
        self.lock().fail_queue = fail;
    }

    pub fn set_fail_names(&self, fail: bool) {
        self.lock().fail_names = fail;
    }

    pub fn calls(&self) -> Vec<ServiceCall> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// `(limit, offset)` of every top-tracks page read.
    pub fn top_track_requests(&self) -> Vec<(u32, u32)> {
        self.lock().top_track_requests.clone()
    }

    /// A small library: one playlist mixing three albums, plus a top-tracks pool.
    pub fn demo() -> Self {
        let albums = [
            ("spotify:album:demo-north", "Northbound", "The Compass Set", 4),
            ("spotify:album:demo-tide", "Tidewater", "Harbor Lights", 5),
            ("spotify:album:demo-ember", "Ember Hours", "Slow Fires", 4),
        ];

        let mut player = Self::new();
        let mut playlist = Vec::new();
        let mut pool = Vec::new();
        for (album_uri, album_name, artist, count) in albums {
            let tracks: Vec<TrackItem> = (1..=count)
                .map(|n| TrackItem {
                    uri: format!("{}-{}", album_uri.replace(":album:", ":track:"), n),
                    name: format!("{} {}", album_name, n),
                    duration_ms: 150_000 + 15_000 * n as u64,
                    artists: vec![artist.to_string()],
                    album_uri: Some(album_uri.to_string()),
                })
                .collect();
            playlist.push(tracks[0].clone());
            playlist.push(tracks[count - 1].clone());
            pool.extend(tracks.iter().map(|t| t.uri.clone()));
            player = player.with_collection(album_uri, album_name, tracks);
        }

        let first = playlist[0].clone();
        player
            .with_collection("spotify:playlist:demo-mix", "Demo Mix", playlist)
            .with_top_tracks(pool)
            .with_devices(vec![Device {
                id: Some("demo-device".to_string()),
                name: "Demo Speaker".to_string(),
                is_active: true,
            }])
            .with_playback(PlaybackSnapshot {
                is_playing: true,
                progress_ms: 42_000,
                item: Some(first),
                context: Some(PlaybackContext::new("spotify:playlist:demo-mix")),
                device_id: Some("demo-device".to_string()),
            })
    }
}

impl PlaybackService for MemoryPlayer {
    fn current_playback(&self) -> Result<Option<PlaybackSnapshot>> {
        let state = self.lock();
        if state.fail_playback {
            return Err(PlaybackError::Simulated("playback unavailable".to_string()));
        }
        Ok(state.playback.clone())
    }

    fn queue(&self) -> Result<QueueSnapshot> {
        let state = self.lock();
        if state.fail_queue {
            return Err(PlaybackError::Simulated("queue unavailable".to_string()));
        }
        if let Some(queue) = &state.queue {
            return Ok(queue.clone());
        }
        let index = state.current_index();
        Ok(QueueSnapshot {
            currently_playing: state.playback.as_ref().and_then(|p| p.item.as_ref()).map(|i| i.uri.clone()),
            upcoming: index
                .map(|i| state.playing_list[i + 1..].to_vec())
                .unwrap_or_default(),
        })
    }

    fn devices(&self) -> Result<Vec<Device>> {
        Ok(self.lock().devices.clone())
    }

    fn pause(&self, device_id: Option<&str>) -> Result<()> {
        let mut state = self.lock();
        state.write(ServiceCall::Pause { device_id: device_id.map(String::from) })?;
        state.loaded()?.is_playing = false;
        Ok(())
    }

    fn resume(&self, device_id: Option<&str>) -> Result<()> {
        let mut state = self.lock();
        state.write(ServiceCall::Resume { device_id: device_id.map(String::from) })?;
        state.loaded()?.is_playing = true;
        Ok(())
    }

    fn start(&self, device_id: Option<&str>, request: &StartPlayback) -> Result<()> {
        let mut state = self.lock();
        state.write(ServiceCall::Start {
            device_id: device_id.map(String::from),
            request: request.clone(),
        })?;

        let (list, context) = match &request.target {
            PlayTarget::Context(uri) => (
                state.collections.get(uri).cloned().unwrap_or_default(),
                Some(PlaybackContext::new(uri.clone())),
            ),
            PlayTarget::Tracks(uris) => (uris.clone(), None),
        };

        let mut list = list;
        let index = match &request.offset {
            Some(Offset::Position(p)) => *p as usize,
            Some(Offset::Uri(uri)) => match list.iter().position(|u| u == uri) {
                Some(i) => i,
                None => {
                    list.insert(0, uri.clone());
                    0
                }
            },
            None => 0,
        };

        let snapshot = state.playback.get_or_insert_with(|| PlaybackSnapshot {
            is_playing: true,
            progress_ms: 0,
            item: None,
            context: None,
            device_id: device_id.map(String::from),
        });
        snapshot.context = context;
        state.playing_list = list;
        state.play_index(index, request.position_ms.unwrap_or(0));
        Ok(())
    }

    fn skip_next(&self, device_id: Option<&str>) -> Result<()> {
        let mut state = self.lock();
        state.write(ServiceCall::SkipNext { device_id: device_id.map(String::from) })?;
        state.loaded()?;
        if let Some(i) = state.current_index() {
            state.play_index(i + 1, 0);
        }
        Ok(())
    }

    fn skip_previous(&self, device_id: Option<&str>) -> Result<()> {
        let mut state = self.lock();
        state.write(ServiceCall::SkipPrevious { device_id: device_id.map(String::from) })?;
        state.loaded()?;
        let index = state.current_index().map(|i| i.saturating_sub(1));
        if let Some(i) = index {
            state.play_index(i, 0);
        }
        Ok(())
    }

    fn seek(&self, device_id: Option<&str>, position_ms: u64) -> Result<()> {
        let mut state = self.lock();
        state.write(ServiceCall::Seek {
            device_id: device_id.map(String::from),
            position_ms,
        })?;
        state.loaded()?.progress_ms = position_ms;
        Ok(())
    }

    fn top_tracks(&self, limit: u32, offset: u32) -> Result<Vec<String>> {
        let mut state = self.lock();
        state.top_track_requests.push((limit, offset));
        Ok(state
            .top_tracks
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    fn display_name(&self, context_uri: &str) -> Result<String> {
        let state = self.lock();
        if state.fail_names {
            return Err(PlaybackError::Simulated("name lookup unavailable".to_string()));
        }
        state
            .names
            .get(context_uri)
            .cloned()
            .ok_or_else(|| PlaybackError::NotFound(context_uri.to_string()))
    }
}
