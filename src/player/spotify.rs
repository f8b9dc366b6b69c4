//! Spotify Web API implementation of [`PlaybackService`].
//!
//! Blocking `reqwest` client: every call is a single HTTP round trip bounded by the
//! client timeout. Callers that live on an async runtime run these calls through
//! `spawn_blocking`.

use super::error::{PlaybackError, Result};
use super::traits::{
    split_uri, ContextKind, Device, Offset, PlayTarget, PlaybackContext, PlaybackService,
    PlaybackSnapshot, QueueSnapshot, StartPlayback, TrackItem,
};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";

pub struct SpotifyPlayer {
    client: Client,
    base_url: String,
    access_token: String,
}

impl SpotifyPlayer {
    pub fn new(
        base_url: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hopstack/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, device_id: Option<&str>) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(&self.access_token);
        if let Some(id) = device_id {
            request = request.query(&[("device_id", id)]);
        }
        request
    }

    /// Sends the request and returns the body, or `None` for an empty/204 response.
    fn send(&self, request: RequestBuilder) -> Result<Option<String>> {
        let response = request.send()?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            warn!("Playback API error ({}): {}", status, text);
            return Err(error_from_body(status, &text));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let text = response.text()?;
        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<Option<T>> {
        let request = self.request(Method::GET, path, None).query(query);
        match self.send(request)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn command(&self, method: Method, path: &str, device_id: Option<&str>, query: &[(&str, String)]) -> Result<()> {
        let request = self
            .request(method, path, device_id)
            .query(query)
            .header(CONTENT_LENGTH, "0");
        self.send(request).map(|_| ())
    }
}

fn error_from_body(status: StatusCode, text: &str) -> PlaybackError {
    match serde_json::from_str::<WireErrorBody>(text) {
        Ok(body) => PlaybackError::from_status_code(
            status.as_u16(),
            body.error.reason.as_deref(),
            body.error.message,
        ),
        Err(_) => PlaybackError::from_status_code(status.as_u16(), None, text.to_string()),
    }
}

impl PlaybackService for SpotifyPlayer {
    fn current_playback(&self) -> Result<Option<PlaybackSnapshot>> {
        let wire: Option<WirePlayback> = self.get_json("/me/player", &[])?;
        Ok(wire.map(WirePlayback::into_snapshot))
    }

    fn queue(&self) -> Result<QueueSnapshot> {
        let wire: WireQueue = self.get_json("/me/player/queue", &[])?.unwrap_or_default();
        Ok(QueueSnapshot {
            currently_playing: wire.currently_playing.and_then(|c| c.uri),
            upcoming: wire.queue.into_iter().filter_map(|q| q.uri).collect(),
        })
    }

    fn devices(&self) -> Result<Vec<Device>> {
        let wire: WireDevices = self.get_json("/me/player/devices", &[])?.unwrap_or_default();
        Ok(wire.devices.into_iter().map(WireDevice::into_device).collect())
    }

    fn pause(&self, device_id: Option<&str>) -> Result<()> {
        self.command(Method::PUT, "/me/player/pause", device_id, &[])
    }

    fn resume(&self, device_id: Option<&str>) -> Result<()> {
        self.command(Method::PUT, "/me/player/play", device_id, &[])
    }

    fn start(&self, device_id: Option<&str>, request: &StartPlayback) -> Result<()> {
        let body = WireStart::from(request);
        let http = self.request(Method::PUT, "/me/player/play", device_id).json(&body);
        self.send(http).map(|_| ())
    }

    fn skip_next(&self, device_id: Option<&str>) -> Result<()> {
        self.command(Method::POST, "/me/player/next", device_id, &[])
    }

    fn skip_previous(&self, device_id: Option<&str>) -> Result<()> {
        self.command(Method::POST, "/me/player/previous", device_id, &[])
    }

    fn seek(&self, device_id: Option<&str>, position_ms: u64) -> Result<()> {
        self.command(
            Method::PUT,
            "/me/player/seek",
            device_id,
            &[("position_ms", position_ms.to_string())],
        )
    }

    fn top_tracks(&self, limit: u32, offset: u32) -> Result<Vec<String>> {
        let page: WirePage = self
            .get_json(
                "/me/top/tracks",
                &[("limit", limit.to_string()), ("offset", offset.to_string())],
            )?
            .unwrap_or_default();
        Ok(page.items.into_iter().filter_map(|i| i.uri).collect())
    }

    fn display_name(&self, context_uri: &str) -> Result<String> {
        let (kind, id) = split_uri(context_uri)
            .ok_or_else(|| PlaybackError::Unsupported(context_uri.to_string()))?;

        let (path, query) = match kind {
            "playlist" => (format!("/playlists/{}", id), vec![("fields", "name".to_string())]),
            "album" | "artist" | "show" => (format!("/{}s/{}", kind, id), Vec::new()),
            _ => return Err(PlaybackError::Unsupported(context_uri.to_string())),
        };

        let named: Option<WireName> = self.get_json(&path, &query)?;
        named
            .map(|n| n.name)
            .ok_or_else(|| PlaybackError::NotFound(context_uri.to_string()))
    }
}

// --- Wire format ---

#[derive(Debug, Deserialize)]
struct WirePlayback {
    #[serde(default)]
    is_playing: bool,
    progress_ms: Option<u64>,
    item: Option<WireTrack>,
    context: Option<WireContext>,
    device: Option<WireDevice>,
}

impl WirePlayback {
    fn into_snapshot(self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            is_playing: self.is_playing,
            progress_ms: self.progress_ms.unwrap_or(0),
            item: self.item.and_then(WireTrack::into_item),
            context: self.context.and_then(|c| {
                let uri = c.uri?;
                let kind = c.kind.unwrap_or_else(|| ContextKind::from_uri(&uri));
                Some(PlaybackContext { uri, kind })
            }),
            device_id: self.device.and_then(|d| d.id),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireTrack {
    uri: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    duration_ms: u64,
    #[serde(default)]
    artists: Vec<WireNamed>,
    album: Option<WireUri>,
}

impl WireTrack {
    fn into_item(self) -> Option<TrackItem> {
        Some(TrackItem {
            uri: self.uri?,
            name: self.name,
            duration_ms: self.duration_ms,
            artists: self.artists.into_iter().map(|a| a.name).collect(),
            album_uri: self.album.and_then(|a| a.uri),
        })
    }
}

#[derive(Debug, Deserialize)]
struct WireNamed {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct WireUri {
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireContext {
    uri: Option<String>,
    #[serde(rename = "type")]
    kind: Option<ContextKind>,
}

#[derive(Debug, Deserialize)]
struct WireDevice {
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    is_active: bool,
}

impl WireDevice {
    fn into_device(self) -> Device {
        Device {
            id: self.id,
            name: self.name,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct WireQueue {
    currently_playing: Option<WireUri>,
    #[serde(default)]
    queue: Vec<WireUri>,
}

#[derive(Debug, Default, Deserialize)]
struct WireDevices {
    #[serde(default)]
    devices: Vec<WireDevice>,
}

#[derive(Debug, Default, Deserialize)]
struct WirePage {
    #[serde(default)]
    items: Vec<WireUri>,
}

#[derive(Debug, Deserialize)]
struct WireName {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    error: WireErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WireErrorDetail {
    #[serde(default)]
    message: String,
    reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct WireStart<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    context_uri: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uris: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<WireOffset<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireOffset<'a> {
    Position { position: u32 },
    Uri { uri: &'a str },
}

impl<'a> From<&'a StartPlayback> for WireStart<'a> {
    fn from(request: &'a StartPlayback) -> Self {
        let (context_uri, uris) = match &request.target {
            PlayTarget::Context(uri) => (Some(uri.as_str()), None),
            PlayTarget::Tracks(list) => (None, Some(list.as_slice())),
        };
        let offset = request.offset.as_ref().map(|o| match o {
            Offset::Position(position) => WireOffset::Position { position: *position },
            Offset::Uri(uri) => WireOffset::Uri { uri: uri.as_str() },
        });
        Self {
            context_uri,
            uris,
            offset,
            position_ms: request.position_ms,
        }
    }
}
