use super::ClockView;
use super::Session;
use super::Snapshot;
use crate::ID;
use crate::Score;
use crate::Stakes;
use crate::board::Color;
use crate::gameplay::GameResult;

/// Outbound events. Every event names its session; state-bearing events
/// carry a per-viewer snapshot. Emission order is delivery order on each
/// individual connection, and nothing more is promised across
/// connections or sessions.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    GameStart {
        session: ID<Session>,
        game: usize,
        first: Color,
    },
    GameUpdate {
        snapshot: Snapshot,
    },
    GameOver {
        session: ID<Session>,
        result: GameResult,
    },
    OpponentJoined {
        session: ID<Session>,
        color: Color,
    },
    OpponentLeft {
        session: ID<Session>,
        color: Color,
    },
    DoubleOffered {
        session: ID<Session>,
        by: Color,
        proposed: Stakes,
    },
    DoubleAccepted {
        session: ID<Session>,
        value: Stakes,
        owner: Color,
    },
    TimeUpdate {
        session: ID<Session>,
        clock: ClockView,
    },
    PlayerTimedOut {
        session: ID<Session>,
        color: Color,
    },
    MatchUpdate {
        session: ID<Session>,
        target: Score,
        white: Score,
        red: Score,
        crawford: bool,
    },
    MatchCompleted {
        session: ID<Session>,
        winner: Color,
    },
    Chat {
        session: ID<Session>,
        from: Color,
        text: String,
    },
    Error {
        reason: String,
    },
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GameStart { game, first, .. } => write!(f, "game {} starts, {} first", game, first),
            Self::GameUpdate { .. } => write!(f, "update"),
            Self::GameOver { result, .. } => write!(f, "game over: {}", result),
            Self::OpponentJoined { color, .. } => write!(f, "{} joined", color),
            Self::OpponentLeft { color, .. } => write!(f, "{} left", color),
            Self::DoubleOffered { by, proposed, .. } => write!(f, "{} offers {}", by, proposed),
            Self::DoubleAccepted { value, owner, .. } => write!(f, "cube {} to {}", value, owner),
            Self::TimeUpdate { .. } => write!(f, "time"),
            Self::PlayerTimedOut { color, .. } => write!(f, "{} timed out", color),
            Self::MatchUpdate { white, red, .. } => write!(f, "match {}-{}", white, red),
            Self::MatchCompleted { winner, .. } => write!(f, "match to {}", winner),
            Self::Chat { from, .. } => write!(f, "chat from {}", from),
            Self::Error { reason } => write!(f, "error: {}", reason),
        }
    }
}
