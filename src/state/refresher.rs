use crate::state::messages::UiEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Optional live board auto refresh. Goes through the UI loop rather than
/// straight to the network worker so the request gets a fresh generation.
pub struct PeriodicRefresher {
    every: Duration,
    ui_events: mpsc::Sender<UiEvent>,
}

impl PeriodicRefresher {
    pub fn new(every: Duration, ui_events: mpsc::Sender<UiEvent>) -> Self {
        Self { every, ui_events }
    }

    pub async fn run(self) {
        let mut live_interval = interval(self.every);
        // Skip the immediate first tick so startup loading isn't double-triggered.
        live_interval.tick().await;

        loop {
            live_interval.tick().await;
            if self.ui_events.send(UiEvent::RefreshTick).await.is_err() {
                break;
            }
        }
    }
}
