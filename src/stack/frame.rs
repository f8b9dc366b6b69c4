//! Stack frames: snapshots of a playback situation the user can return to.

use crate::player::{PlaybackSnapshot, StartPlayback};
use std::collections::HashSet;

/// Upper bound on a queue frame's track list
pub const MAX_RESUME_TRACKS: usize = 100;

/// How a frame gets played again. Decided once, when the frame is captured.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameTarget {
    /// Resume an addressable context at a track
    Context {
        context_uri: String,
        track_uri: String,
    },
    /// Replay an explicit track list, anchored at the track that was playing
    Queue {
        track_uris: Vec<String>,
        anchor_uri: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub target: FrameTarget,
    pub progress_ms: u64,
    pub track_name: String,
    pub artist_names: String,
    pub source_label: String,
}

impl Frame {
    /// Captures the snapshot as a frame.
    ///
    /// A context wins over the resume list. Returns `None` when the snapshot has no
    /// track, or has neither a context nor a non-empty resume list.
    pub fn capture(
        snapshot: &PlaybackSnapshot,
        resume_list: Option<Vec<String>>,
        source_label: String,
    ) -> Option<Self> {
        let item = snapshot.item.as_ref()?;

        let target = match (snapshot.context_uri(), resume_list) {
            (Some(context_uri), _) => FrameTarget::Context {
                context_uri: context_uri.to_string(),
                track_uri: item.uri.clone(),
            },
            (None, Some(track_uris)) if !track_uris.is_empty() => FrameTarget::Queue {
                track_uris,
                anchor_uri: item.uri.clone(),
            },
            (None, _) => return None,
        };

        Some(Self {
            target,
            progress_ms: snapshot.progress_ms,
            track_name: item.display_name().to_string(),
            artist_names: item.artist_names(),
            source_label,
        })
    }

    pub fn context_uri(&self) -> Option<&str> {
        match &self.target {
            FrameTarget::Context { context_uri, .. } => Some(context_uri.as_str()),
            FrameTarget::Queue { .. } => None,
        }
    }

    pub fn track_uri(&self) -> &str {
        match &self.target {
            FrameTarget::Context { track_uri, .. } => track_uri,
            FrameTarget::Queue { anchor_uri, .. } => anchor_uri,
        }
    }

    pub fn resume_track_list(&self) -> Option<&[String]> {
        match &self.target {
            FrameTarget::Queue { track_uris, .. } => Some(track_uris.as_slice()),
            FrameTarget::Context { .. } => None,
        }
    }

    /// The start-playback call that puts this frame back on the device.
    ///
    /// A queue frame is pinned to its anchor when the anchor is in the list, else to
    /// the first entry. [`Frame::capture`] never builds a queue frame with an empty list.
    pub fn resume_request(&self) -> StartPlayback {
        let request = match &self.target {
            FrameTarget::Context {
                context_uri,
                track_uri,
            } => StartPlayback::context(context_uri.as_str()).at_track(track_uri.as_str()),
            FrameTarget::Queue {
                track_uris,
                anchor_uri,
            } => {
                let offset = if track_uris.contains(anchor_uri) {
                    anchor_uri
                } else {
                    track_uris.first().unwrap_or(anchor_uri)
                };
                StartPlayback::tracks(track_uris.clone()).at_track(offset.as_str())
            }
        };
        request.from_ms(self.progress_ms)
    }

    /// `"{position}. {track} - {artists} | from {source} @ {MM:SS}"`
    pub fn summary_line(&self, position: usize) -> String {
        format!(
            "{}. {} - {} | from {} @ {}",
            position,
            self.track_name,
            self.artist_names,
            self.source_label,
            format_mm_ss(self.progress_ms)
        )
    }
}

/// Deduplicates (first occurrence wins) and caps a resume list.
pub fn resume_list<I>(uris: I) -> Option<Vec<String>>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let list: Vec<String> = uris
        .into_iter()
        .filter(|uri| !uri.is_empty() && seen.insert(uri.clone()))
        .take(MAX_RESUME_TRACKS)
        .collect();

    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}

pub fn format_mm_ss(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
