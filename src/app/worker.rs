//! Runs key-bound actions against the shared controller, one at a time, in the
//! order they were pressed. Each finished action reports back as
//! [`AppEvent::ActionDone`].

use crate::app::actions::{Action, ActionSettings};
use crate::app::events::AppEvent;
use crate::stack::NavigationController;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

pub type SharedController = Arc<Mutex<NavigationController>>;

pub fn lock(controller: &Mutex<NavigationController>) -> MutexGuard<'_, NavigationController> {
    controller.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Spawns the action worker. Dropping every sender stops it once the backlog is done.
pub fn spawn_action_worker(
    controller: SharedController,
    settings: ActionSettings,
    events: mpsc::Sender<AppEvent>,
) -> (mpsc::UnboundedSender<Action>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<Action>();

    let handle = tokio::spawn(async move {
        while let Some(action) = rx.recv().await {
            let status = run_action(action, settings, controller.clone()).await;
            if events.send(AppEvent::ActionDone(status)).await.is_err() {
                break;
            }
        }
        debug!("Action worker stopped");
    });

    (tx, handle)
}

/// The lock is held for the whole operation.
async fn run_action(action: Action, settings: ActionSettings, controller: SharedController) -> String {
    let result = tokio::task::spawn_blocking(move || {
        let mut controller = lock(&controller);
        action.perform(&mut controller, &settings)
    })
    .await;

    match result {
        Ok(Ok(status)) => status,
        Ok(Err(e)) => {
            error!(?action, "Action failed: {}", e);
            format!("Error: {}", e)
        }
        Err(e) => {
            error!(?action, "Action task failed: {}", e);
            format!("Error: {}", e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::MemoryPlayer;
    use crate::stack::ControllerOptions;

    fn shared_demo() -> SharedController {
        Arc::new(Mutex::new(NavigationController::new(
            Arc::new(MemoryPlayer::demo()),
            ControllerOptions::default(),
        )))
    }

    async fn collect_statuses(mut events: mpsc::Receiver<AppEvent>) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(event) = events.recv().await {
            if let AppEvent::ActionDone(status) = event {
                out.push(status);
            }
        }
        out
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_actions_run_in_press_order() {
        let controller = shared_demo();
        let (events_tx, events_rx) = mpsc::channel(100);
        let (actions, worker) = spawn_action_worker(controller.clone(), ActionSettings::default(), events_tx);

        for _ in 0..25 {
            actions.send(Action::HopIn).unwrap();
            actions.send(Action::HopOut).unwrap();
        }
        drop(actions);
        worker.await.unwrap();

        let statuses = collect_statuses(events_rx).await;
        assert_eq!(statuses.len(), 50);
        for pair in statuses.chunks(2) {
            assert_eq!(pair[0], "Hop in: spotify:album:demo-north");
            assert_eq!(pair[1], "Hop out: resumed context");
        }
        assert_eq!(lock(&controller).depth(), 0);
    }

    #[tokio::test]
    async fn test_failed_action_reports_error_status() {
        let player = Arc::new(MemoryPlayer::demo());
        player.set_fail_writes(true);
        let controller = Arc::new(Mutex::new(NavigationController::new(
            player,
            ControllerOptions::default(),
        )));
        let (events_tx, events_rx) = mpsc::channel(100);
        let (actions, worker) = spawn_action_worker(controller, ActionSettings::default(), events_tx);

        actions.send(Action::TogglePlayback).unwrap();
        drop(actions);
        worker.await.unwrap();

        let statuses = collect_statuses(events_rx).await;
        assert_eq!(statuses.len(), 1);
        assert!(statuses[0].starts_with("Error: "));
    }
}
