use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use pitchside_api::endpoint::LiveFeed;
use pitchside_api::{FixtureList, LiveBoard, MatchDetail};

/// Request kinds that are ordered by generation; see `RequestGenerations`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Fixtures,
    MatchDetail,
    LiveBoard,
    Nav,
}

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadNav,
    LoadFixtures {
        league_id: String,
        season: String,
        generation: u64,
    },
    LoadMatchDetail {
        league_id: String,
        match_id: String,
        season: String,
        generation: u64,
    },
    LoadLiveBoard { feed: LiveFeed, generation: u64 },
}

impl NetworkRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            NetworkRequest::LoadNav => RequestKind::Nav,
            NetworkRequest::LoadFixtures { .. } => RequestKind::Fixtures,
            NetworkRequest::LoadMatchDetail { .. } => RequestKind::MatchDetail,
            NetworkRequest::LoadLiveBoard { .. } => RequestKind::LiveBoard,
        }
    }

    pub fn generation(&self) -> u64 {
        match self {
            NetworkRequest::LoadNav => 0,
            NetworkRequest::LoadFixtures { generation, .. }
            | NetworkRequest::LoadMatchDetail { generation, .. }
            | NetworkRequest::LoadLiveBoard { generation, .. } => *generation,
        }
    }
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    /// `None` when the include could not be fetched.
    NavLoaded { html: Option<String> },
    FixturesLoaded { list: FixtureList, generation: u64 },
    MatchDetailLoaded { detail: MatchDetail, generation: u64 },
    LiveBoardLoaded { board: LiveBoard, generation: u64 },
    Error {
        origin: RequestKind,
        generation: u64,
        message: String,
    },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    /// Live board auto refresh is due.
    RefreshTick,
}
