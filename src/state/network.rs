use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error, warn};
use pitchside_api::client::{FootballApi, RemoteError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Runs fetches off the UI loop. Each request gets its own task, so a slow
/// fixture list never holds up a live board refresh.
pub struct NetworkWorker {
    client: FootballApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    in_flight: Arc<AtomicUsize>,
    spinner_running: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        client: FootballApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            requests,
            responses,
            in_flight: Arc::new(AtomicUsize::new(0)),
            spinner_running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            if self.responses.is_closed() {
                break;
            }
            self.in_flight.fetch_add(1, Ordering::SeqCst);
            self.start_loading_animation().await;

            let client = self.client.clone();
            let responses = self.responses.clone();
            let in_flight = self.in_flight.clone();
            tokio::spawn(async move {
                let kind = request.kind();
                let generation = request.generation();
                let result = handle_request(&client, request).await;
                let is_ok = result.is_ok();

                let response = result.unwrap_or_else(|err| {
                    warn!("{err}");
                    NetworkResponse::Error {
                        origin: kind,
                        generation,
                        message: err.message().to_string(),
                    }
                });
                debug!("network request complete: {kind:?} #{generation}");

                if let Err(e) = responses.send(response).await {
                    error!("Failed to send network response: {e}");
                }

                if in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                    stop_loading_animation(&responses, is_ok).await;
                }
            });
        }
    }

    async fn start_loading_animation(&self) {
        if self.spinner_running.swap(true, Ordering::SeqCst) {
            return;
        }

        let mut loading_state = LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let in_flight = self.in_flight.clone();
        let spinner_running = self.spinner_running.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if in_flight.load(Ordering::SeqCst) == 0 {
                    spinner_running.store(false, Ordering::SeqCst);
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }
}

async fn handle_request(client: &FootballApi, request: NetworkRequest) -> Result<NetworkResponse, RemoteError> {
    match request {
        NetworkRequest::LoadNav => {
            debug!("loading navigation include");
            // A missing include is not an error; the fallback links take over.
            let html = match client.fetch_nav_fragment().await {
                Ok(html) => Some(html),
                Err(e) => {
                    warn!("navigation include unavailable: {e}");
                    None
                }
            };
            Ok(NetworkResponse::NavLoaded { html })
        }
        NetworkRequest::LoadFixtures { league_id, season, generation } => {
            debug!("loading fixtures for league {league_id} season {season:?}");
            let list = client.fetch_fixtures(&league_id, Some(season.as_str())).await?;
            Ok(NetworkResponse::FixturesLoaded { list, generation })
        }
        NetworkRequest::LoadMatchDetail { league_id, match_id, season, generation } => {
            debug!("loading heatmap data for match {match_id} (league {league_id})");
            let detail = client
                .fetch_match_detail(&league_id, &match_id, Some(season.as_str()))
                .await?;
            Ok(NetworkResponse::MatchDetailLoaded { detail, generation })
        }
        NetworkRequest::LoadLiveBoard { feed, generation } => {
            debug!("loading {} board", feed.label());
            let board = client.fetch_live_board(feed).await?;
            Ok(NetworkResponse::LiveBoardLoaded { board, generation })
        }
    }
}

async fn stop_loading_animation(responses: &mpsc::Sender<NetworkResponse>, is_ok: bool) {
    tokio::time::sleep(Duration::from_millis(15)).await;

    let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
    let _ = responses
        .send(NetworkResponse::LoadingStateChanged {
            loading_state: LoadingState { is_loading: false, spinner_char },
        })
        .await;
}
