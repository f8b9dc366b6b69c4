use super::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    Album,
    Playlist,
    Artist,
    Show,
    #[serde(other)]
    Other,
}

impl ContextKind {
    /// Kind segment of a `spotify:{kind}:{id}` URI.
    pub fn from_uri(uri: &str) -> Self {
        match split_uri(uri).map(|(kind, _)| kind) {
            Some("album") => Self::Album,
            Some("playlist") => Self::Playlist,
            Some("artist") => Self::Artist,
            Some("show") => Self::Show,
            _ => Self::Other,
        }
    }
}

/// Addressable collection the service is currently playing from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackContext {
    pub uri: String,
    pub kind: ContextKind,
}

impl PlaybackContext {
    pub fn new(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let kind = ContextKind::from_uri(&uri);
        Self { uri, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackItem {
    pub uri: String,
    pub name: String,
    pub duration_ms: u64,
    pub artists: Vec<String>,
    /// Parent album, the hop-in destination
    pub album_uri: Option<String>,
}

impl TrackItem {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Unknown track"
        } else {
            &self.name
        }
    }

    pub fn artist_names(&self) -> String {
        let joined = self
            .artists
            .iter()
            .filter(|a| !a.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        if joined.is_empty() {
            "Unknown artist".to_string()
        } else {
            joined
        }
    }
}

/// One point-in-time read of the service's playback state 🎵
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub is_playing: bool,
    pub progress_ms: u64,
    pub item: Option<TrackItem>,
    pub context: Option<PlaybackContext>,
    pub device_id: Option<String>,
}

impl PlaybackSnapshot {
    pub fn context_uri(&self) -> Option<&str> {
        self.context.as_ref().map(|c| c.uri.as_str())
    }
}

/// Currently playing track plus what the service will play next.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueueSnapshot {
    pub currently_playing: Option<String>,
    pub upcoming: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    pub id: Option<String>,
    pub name: String,
    pub is_active: bool,
}

/// What a start-playback call plays: exactly one of a context or an explicit list.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayTarget {
    Context(String),
    Tracks(Vec<String>),
}

/// Where inside the target playback begins.
#[derive(Debug, Clone, PartialEq)]
pub enum Offset {
    Position(u32),
    Uri(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StartPlayback {
    pub target: PlayTarget,
    pub offset: Option<Offset>,
    pub position_ms: Option<u64>,
}

impl StartPlayback {
    pub fn context(uri: impl Into<String>) -> Self {
        Self {
            target: PlayTarget::Context(uri.into()),
            offset: None,
            position_ms: None,
        }
    }

    pub fn tracks(uris: Vec<String>) -> Self {
        Self {
            target: PlayTarget::Tracks(uris),
            offset: None,
            position_ms: None,
        }
    }

    pub fn at_track(mut self, uri: impl Into<String>) -> Self {
        self.offset = Some(Offset::Uri(uri.into()));
        self
    }

    pub fn at_index(mut self, position: u32) -> Self {
        self.offset = Some(Offset::Position(position));
        self
    }

    pub fn from_ms(mut self, position_ms: u64) -> Self {
        self.position_ms = Some(position_ms);
        self
    }
}

/// The capability surface of a remote playback service.
///
/// Every call either completes or fails within the implementation's own timeout;
/// callers never retry.
pub trait PlaybackService: Send + Sync {
    /// `Ok(None)` when nothing is loaded on any device.
    fn current_playback(&self) -> Result<Option<PlaybackSnapshot>>;
    fn queue(&self) -> Result<QueueSnapshot>;
    fn devices(&self) -> Result<Vec<Device>>;

    fn pause(&self, device_id: Option<&str>) -> Result<()>;
    /// Resume from the current position without changing what is loaded.
    fn resume(&self, device_id: Option<&str>) -> Result<()>;
    fn start(&self, device_id: Option<&str>, request: &StartPlayback) -> Result<()>;
    fn skip_next(&self, device_id: Option<&str>) -> Result<()>;
    fn skip_previous(&self, device_id: Option<&str>) -> Result<()>;
    fn seek(&self, device_id: Option<&str>, position_ms: u64) -> Result<()>;

    /// One page of the user's top tracks, as URIs.
    fn top_tracks(&self, limit: u32, offset: u32) -> Result<Vec<String>>;
    fn display_name(&self, context_uri: &str) -> Result<String>;
}

/// Splits `spotify:{kind}:{id}` into `(kind, id)`.
pub fn split_uri(uri: &str) -> Option<(&str, &str)> {
    let mut parts = uri.split(':');
    if parts.next()? != "spotify" {
        return None;
    }
    let kind = parts.next()?;
    let id = parts.next()?;
    if kind.is_empty() || id.is_empty() {
        return None;
    }
    Some((kind, id))
}

/// `spotify:playlist:abc` -> `playlist:abc`; anything else is returned as is.
pub fn short_uri(uri: &str) -> String {
    match split_uri(uri) {
        Some((kind, id)) => format!("{}:{}", kind, id),
        None => uri.to_string(),
    }
}
