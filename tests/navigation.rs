use hopstack::player::{
    Device, MemoryPlayer, PlayTarget, PlaybackContext, PlaybackService, PlaybackSnapshot,
    QueueSnapshot, ServiceCall, StartPlayback, TrackItem,
};
use hopstack::stack::{ControllerOptions, FrameTarget, NavigationController, MAX_RESUME_TRACKS};
use std::collections::HashSet;
use std::sync::Arc;

fn track(uri: &str, name: &str, album: Option<&str>) -> TrackItem {
    TrackItem {
        uri: uri.to_string(),
        name: name.to_string(),
        duration_ms: 180_000,
        artists: vec!["A".to_string()],
        album_uri: album.map(String::from),
    }
}

fn playback(context: Option<&str>) -> PlaybackSnapshot {
    PlaybackSnapshot {
        is_playing: true,
        progress_ms: 42_000,
        item: Some(track("spotify:track:t1", "Track 1", Some("spotify:album:a1"))),
        context: context.map(PlaybackContext::new),
        device_id: Some("dev123".to_string()),
    }
}

/// Playlist `abc` playing track t1 at 0:42 on device dev123, t2 queued next.
/// Album a1 holds t1 and t3.
fn base_player(context: Option<&str>) -> MemoryPlayer {
    MemoryPlayer::new()
        .with_collection(
            "spotify:album:a1",
            "Album A",
            vec![
                track("spotify:track:t1", "Track 1", Some("spotify:album:a1")),
                track("spotify:track:t3", "Track 3", Some("spotify:album:a1")),
            ],
        )
        .with_name("spotify:playlist:abc", "My Playlist")
        .with_playback(playback(context))
        .with_devices(vec![Device {
            id: Some("dev123".to_string()),
            name: "Desk".to_string(),
            is_active: true,
        }])
        .with_queue(QueueSnapshot {
            currently_playing: Some("spotify:track:t1".to_string()),
            upcoming: vec!["spotify:track:t2".to_string()],
        })
}

fn make_service(context: Option<&str>) -> Arc<MemoryPlayer> {
    Arc::new(base_player(context))
}

fn controller(service: &Arc<MemoryPlayer>) -> NavigationController {
    NavigationController::new(service.clone(), ControllerOptions::default())
}

fn start(request: StartPlayback) -> ServiceCall {
    ServiceCall::Start {
        device_id: Some("dev123".to_string()),
        request,
    }
}

fn uris(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| format!("spotify:track:{}", id)).collect()
}

#[test]
fn test_hop_in_pushes_frame_and_switches_to_album() {
    let service = make_service(Some("spotify:playlist:abc"));
    let mut controller = controller(&service);

    let status = controller.hop_in_album(false).unwrap();

    assert_eq!(status, "Hop in: spotify:album:a1");
    assert_eq!(controller.depth(), 1);
    let frame = &controller.frames()[0];
    assert_eq!(frame.context_uri(), Some("spotify:playlist:abc"));
    assert_eq!(frame.track_uri(), "spotify:track:t1");
    assert_eq!(frame.progress_ms, 42_000);
    assert_eq!(frame.source_label, "My Playlist");
    assert_eq!(frame.track_name, "Track 1");

    assert_eq!(
        service.calls(),
        vec![start(
            StartPlayback::context("spotify:album:a1")
                .at_track("spotify:track:t1")
                .from_ms(42_000)
        )]
    );
}

#[test]
fn test_hop_in_from_start_uses_first_album_track() {
    let service = make_service(Some("spotify:playlist:abc"));
    let mut controller = controller(&service);

    let status = controller.hop_in_album(true).unwrap();

    assert_eq!(status, "Hop in start: spotify:album:a1");
    assert_eq!(
        service.calls(),
        vec![start(StartPlayback::context("spotify:album:a1").at_index(0).from_ms(0))]
    );
}

#[test]
fn test_hop_out_restores_previous_context() {
    let service = make_service(Some("spotify:playlist:abc"));
    let mut controller = controller(&service);
    controller.hop_in_album(false).unwrap();
    service.clear_calls();

    let status = controller.hop_out().unwrap();

    assert_eq!(status, "Hop out: resumed context");
    assert_eq!(controller.depth(), 0);
    assert_eq!(
        service.calls(),
        vec![start(
            StartPlayback::context("spotify:playlist:abc")
                .at_track("spotify:track:t1")
                .from_ms(42_000)
        )]
    );
}

#[test]
fn test_hop_out_restores_queue_when_no_context() {
    let service = make_service(None);
    let mut controller = controller(&service);
    controller.hop_in_album(false).unwrap();
    service.clear_calls();

    let status = controller.hop_out().unwrap();

    assert_eq!(status, "Hop out: resumed queue snapshot");
    assert_eq!(
        service.calls(),
        vec![start(
            StartPlayback::tracks(uris(&["t1", "t2"]))
                .at_track("spotify:track:t1")
                .from_ms(42_000)
        )]
    );
    assert_eq!(controller.active_track_list(), uris(&["t1", "t2"]).as_slice());
}

#[test]
fn test_seek_relative_clamps_to_song_duration() {
    let service = make_service(Some("spotify:playlist:abc"));
    let controller = controller(&service);

    assert_eq!(controller.seek_relative(999).unwrap(), "Seeked to 180s");
    assert_eq!(controller.seek_relative(-999).unwrap(), "Seeked to 0s");
    assert_eq!(
        service.calls(),
        vec![
            ServiceCall::Seek { device_id: Some("dev123".into()), position_ms: 180_000 },
            ServiceCall::Seek { device_id: Some("dev123".into()), position_ms: 0 },
        ]
    );
}

#[test]
fn test_queue_top_enters_new_stack_frame() {
    let pool = uris(&["x1", "x2", "x3"]);
    let service = Arc::new(base_player(Some("spotify:playlist:abc")).with_top_tracks(pool.clone()));
    let mut controller = controller(&service);

    let status = controller.queue_new_from_top_tracks(2).unwrap();

    assert_eq!(status, "Entered queue: shuffled top 2");
    assert_eq!(controller.depth(), 1);
    let frame = &controller.frames()[0];
    assert_eq!(frame.track_uri(), "spotify:track:t1");
    assert_eq!(frame.source_label, "My Playlist");

    let calls = service.calls();
    assert_eq!(calls.len(), 1);
    let ServiceCall::Start { request, .. } = &calls[0] else {
        panic!("expected a start call, got {:?}", calls[0]);
    };
    let PlayTarget::Tracks(selection) = &request.target else {
        panic!("expected a track list");
    };
    assert_eq!(selection.len(), 2);
    assert!(selection.iter().all(|uri| pool.contains(uri)));
    assert_eq!(selection.iter().collect::<HashSet<_>>().len(), 2);
    assert_eq!(controller.active_track_list(), selection.as_slice());
}

#[test]
fn test_queue_size_is_capped_by_pool() {
    let service = Arc::new(MemoryPlayer::new().with_top_tracks(uris(&["x1", "x2", "x3"])));
    let mut controller = controller(&service);

    let status = controller.queue_new_from_top_tracks(30).unwrap();

    // Nothing was playing, so nothing to come back to
    assert_eq!(status, "Entered queue: shuffled top 3");
    assert_eq!(controller.depth(), 0);
    assert_eq!(controller.active_track_list().len(), 3);
}

#[test]
fn test_empty_top_tracks_leaves_stack_unchanged() {
    let service = make_service(Some("spotify:playlist:abc"));
    let mut controller = controller(&service);

    let status = controller.queue_new_from_top_tracks(5).unwrap();

    assert_eq!(status, "No top tracks available.");
    assert_eq!(controller.depth(), 0);
    assert!(service.calls().is_empty());
}

#[test]
fn test_hop_out_returns_to_album_after_queue_top() {
    let album_song = track("spotify:track:a_song", "Album Song", Some("spotify:album:a1"));
    let service = Arc::new(
        MemoryPlayer::new()
            .with_playback(PlaybackSnapshot {
                item: Some(album_song),
                context: Some(PlaybackContext::new("spotify:album:a1")),
                ..playback(None)
            })
            .with_queue(QueueSnapshot {
                currently_playing: Some("spotify:track:a_song".to_string()),
                upcoming: uris(&["a_next"]),
            })
            .with_top_tracks(uris(&["q1", "q2", "q3"])),
    );
    let mut controller = controller(&service);

    controller.queue_new_from_top_tracks(2).unwrap();
    service.clear_calls();
    let status = controller.hop_out().unwrap();

    assert_eq!(status, "Hop out: resumed context");
    assert_eq!(
        service.calls(),
        vec![start(
            StartPlayback::context("spotify:album:a1")
                .at_track("spotify:track:a_song")
                .from_ms(42_000)
        )]
    );
}

#[test]
fn test_hop_out_keeps_stack_if_restore_fails() {
    let service = make_service(Some("spotify:playlist:abc"));
    let mut controller = controller(&service);
    controller.hop_in_album(false).unwrap();
    service.set_fail_writes(true);

    assert!(controller.hop_out().is_err());
    assert_eq!(controller.depth(), 1);

    // Retry once the service recovers
    service.set_fail_writes(false);
    assert_eq!(controller.hop_out().unwrap(), "Hop out: resumed context");
    assert_eq!(controller.depth(), 0);
}

#[test]
fn test_failed_hop_in_keeps_pushed_frame() {
    let service = make_service(Some("spotify:playlist:abc"));
    service.set_fail_writes(true);
    let mut controller = controller(&service);

    assert!(controller.hop_in_album(false).is_err());
    assert_eq!(controller.depth(), 1);
    assert_eq!(controller.frames()[0].context_uri(), Some("spotify:playlist:abc"));
}

#[test]
fn test_hop_out_on_empty_stack_is_a_no_op() {
    let service = make_service(Some("spotify:playlist:abc"));
    let mut controller = controller(&service);

    assert_eq!(controller.hop_out().unwrap(), "Stack is empty.");
    assert_eq!(controller.depth(), 0);
    assert!(service.calls().is_empty());
}

#[test]
fn test_hop_in_without_playback_or_album_does_nothing() {
    let idle = Arc::new(MemoryPlayer::new());
    let mut idle_controller = controller(&idle);
    assert_eq!(idle_controller.hop_in_album(false).unwrap(), "No active playback.");
    assert_eq!(idle_controller.depth(), 0);

    let service = make_service(Some("spotify:playlist:abc"));
    service.set_playback(Some(PlaybackSnapshot {
        item: Some(track("spotify:track:t1", "Track 1", None)),
        ..playback(Some("spotify:playlist:abc"))
    }));
    let mut no_album = controller(&service);
    assert_eq!(no_album.hop_in_album(false).unwrap(), "Current track has no album URI.");
    assert_eq!(no_album.depth(), 0);
    assert!(service.calls().is_empty());
}

#[test]
fn test_hop_in_refuses_unrestorable_playback() {
    let service = Arc::new(MemoryPlayer::new().with_playback(playback(None)));
    service.set_fail_queue(true);
    let mut controller = controller(&service);

    let status = controller.hop_in_album(false).unwrap();

    assert!(status.starts_with("Cannot hop in"));
    assert_eq!(controller.depth(), 0);
    assert!(service.calls().is_empty());
}

#[test]
fn test_stack_summary_is_human_readable() {
    let service = make_service(Some("spotify:playlist:abc"));
    let mut controller = controller(&service);
    assert_eq!(controller.stack_summary().collect::<Vec<_>>(), vec!["(empty)"]);

    controller.hop_in_album(false).unwrap();

    assert_eq!(
        controller.stack_summary().collect::<Vec<_>>(),
        vec!["1. Track 1 - A | from My Playlist @ 00:42"]
    );
}

#[test]
fn test_stack_summary_lists_most_recent_first() {
    let service = make_service(Some("spotify:playlist:abc"));
    let mut controller = controller(&service);
    controller.hop_in_album(false).unwrap();
    controller.hop_in_album(false).unwrap();

    let lines: Vec<String> = controller.stack_summary().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("1. "));
    assert!(lines[0].contains("from Album A"));
    assert!(lines[1].starts_with("2. "));
    assert!(lines[1].contains("from My Playlist"));
}

#[test]
fn test_describe_source_shows_top_queue_for_queue_playback() {
    let service = Arc::new(MemoryPlayer::new().with_top_tracks(uris(&["t1", "t2"])));
    let mut controller = controller(&service);
    controller.queue_new_from_top_tracks(2).unwrap();

    let current = service.playback().unwrap();
    assert_eq!(controller.describe_playback_source(&current), "Top Queue");
}

#[test]
fn test_hop_in_from_top_queue_stores_top_queue_frame_label() {
    let pool = vec![
        track("spotify:track:q1", "Q 1", Some("spotify:album:qa")),
        track("spotify:track:q2", "Q 2", Some("spotify:album:qa")),
    ];
    let service = Arc::new(
        MemoryPlayer::new()
            .with_collection("spotify:album:qa", "Q Album", pool.clone())
            .with_top_tracks(pool.iter().map(|t| t.uri.clone()).collect()),
    );
    let mut controller = controller(&service);
    controller.queue_new_from_top_tracks(2).unwrap();

    controller.hop_in_album(false).unwrap();

    assert_eq!(controller.depth(), 1);
    let frame = &controller.frames()[0];
    assert_eq!(frame.source_label, "Top Queue");
    assert!(matches!(frame.target, FrameTarget::Queue { .. }));
}

#[test]
fn test_balanced_hops_restore_starting_point() {
    let service = make_service(Some("spotify:playlist:abc"));
    let mut controller = controller(&service);

    controller.hop_in_album(false).unwrap();
    controller.hop_in_album(true).unwrap();
    assert_eq!(controller.depth(), 2);

    controller.hop_out().unwrap();
    controller.hop_out().unwrap();
    assert_eq!(controller.depth(), 0);

    let restored = service.playback().unwrap();
    assert_eq!(restored.context_uri(), Some("spotify:playlist:abc"));
    assert_eq!(restored.item.unwrap().uri, "spotify:track:t1");
    assert_eq!(restored.progress_ms, 42_000);
}

#[test]
fn test_queue_read_failure_falls_back_to_active_list() {
    let pool = vec![
        track("spotify:track:q1", "Q 1", Some("spotify:album:qa")),
        track("spotify:track:q2", "Q 2", Some("spotify:album:qa")),
    ];
    let service = Arc::new(
        MemoryPlayer::new()
            .with_collection("spotify:album:qa", "Q Album", pool.clone())
            .with_top_tracks(pool.iter().map(|t| t.uri.clone()).collect()),
    );
    let mut controller = controller(&service);
    controller.queue_new_from_top_tracks(2).unwrap();
    let active = controller.active_track_list().to_vec();
    service.set_fail_queue(true);

    controller.hop_in_album(false).unwrap();

    assert_eq!(controller.frames()[0].resume_track_list(), Some(active.as_slice()));
}

#[test]
fn test_resume_list_is_deduplicated_and_capped() {
    let mut upcoming: Vec<String> = (0..150).map(|i| format!("spotify:track:n{}", i)).collect();
    upcoming.insert(0, "spotify:track:t1".to_string());
    let service = Arc::new(
        MemoryPlayer::new()
            .with_playback(playback(None))
            .with_queue(QueueSnapshot {
                currently_playing: Some("spotify:track:t1".to_string()),
                upcoming,
            }),
    );
    let mut controller = controller(&service);

    controller.hop_in_album(false).unwrap();

    let list = controller.frames()[0].resume_track_list().unwrap();
    assert_eq!(list.len(), MAX_RESUME_TRACKS);
    assert_eq!(list[0], "spotify:track:t1");
    assert_eq!(list[1], "spotify:track:n0");
    assert_eq!(list.iter().collect::<HashSet<_>>().len(), list.len());
}

#[test]
fn test_top_tracks_are_paged_until_exhausted() {
    let pool: Vec<String> = (0..120).map(|i| format!("spotify:track:p{}", i)).collect();
    let service = Arc::new(MemoryPlayer::new().with_top_tracks(pool.clone()));
    let controller = controller(&service);

    let all = controller.get_all_top_tracks(200, 50).unwrap();
    assert_eq!(all, pool);
    assert_eq!(service.top_track_requests(), vec![(50, 0), (50, 50), (50, 100), (50, 150)]);

    let capped = controller.get_all_top_tracks(60, 50).unwrap();
    assert_eq!(capped.len(), 60);
}

#[test]
fn test_previous_restarts_after_threshold() {
    let service = make_service(Some("spotify:playlist:abc"));
    let controller = controller(&service);

    assert_eq!(controller.previous_track().unwrap(), "Previous");
    service.set_playback(Some(PlaybackSnapshot {
        progress_ms: 3_000,
        ..playback(Some("spotify:playlist:abc"))
    }));
    controller.previous_track().unwrap();

    assert_eq!(
        service.calls(),
        vec![
            ServiceCall::Seek { device_id: Some("dev123".into()), position_ms: 0 },
            ServiceCall::SkipPrevious { device_id: Some("dev123".into()) },
        ]
    );
}

#[test]
fn test_toggle_follows_playing_state() {
    let service = make_service(Some("spotify:playlist:abc"));
    let controller = controller(&service);

    assert_eq!(controller.toggle_playback().unwrap(), "Paused");
    assert_eq!(controller.toggle_playback().unwrap(), "Playing");
    assert_eq!(
        service.calls(),
        vec![
            ServiceCall::Pause { device_id: Some("dev123".into()) },
            ServiceCall::Resume { device_id: Some("dev123".into()) },
        ]
    );
}

#[test]
fn test_transport_without_playback_reports_status() {
    let service = Arc::new(MemoryPlayer::new());
    let controller = controller(&service);

    assert_eq!(controller.toggle_playback().unwrap(), "No active playback.");
    assert_eq!(controller.seek_relative(10).unwrap(), "No active playback.");
    assert!(service.calls().is_empty());
}

#[test]
fn test_display_state_reports_refresh_error() {
    let service = make_service(Some("spotify:playlist:abc"));
    let mut controller = controller(&service);
    controller.hop_in_album(false).unwrap();

    let state = controller.display_state();
    let now = state.now_playing.unwrap();
    assert_eq!(now.source, "Album A");
    assert_eq!(state.depth, 1);

    service.set_fail_playback(true);
    let state = controller.display_state();
    assert!(state.now_playing.is_none());
    assert!(state.refresh_error.unwrap().starts_with("Refresh error:"));
    assert_eq!(state.stack_lines.len(), 1);
    assert!(service.current_playback().is_err());
}
