use crate::Die;
use crate::ID;
use crate::Stakes;
use crate::Unique;
use crate::board::Color;
use crate::board::PositionId;
use crate::gameplay::CubeOwner;
use crate::gameplay::GameResult;
use crate::gameplay::Match;
use crate::gameplay::Phase;
use crate::gameroom::Session;

/// Durable snapshot of one game, captured at game start, game terminal,
/// match terminal, and session eviction. The position identifier carries
/// the whole board; everything else is the turn and cube context needed
/// to resume or audit.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GameCheckpoint {
    id: ID<Self>,
    session: ID<Session>,
    matchplay: ID<Match>,
    game: usize,
    position: PositionId,
    turn: Option<Color>,
    remaining: Vec<Die>,
    cube_value: Stakes,
    cube_owner: CubeOwner,
    crawford: bool,
    phase: Phase,
    result: Option<GameResult>,
}

impl GameCheckpoint {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ID<Self>,
        session: ID<Session>,
        matchplay: ID<Match>,
        game: usize,
        position: PositionId,
        turn: Option<Color>,
        remaining: Vec<Die>,
        cube_value: Stakes,
        cube_owner: CubeOwner,
        crawford: bool,
        phase: Phase,
        result: Option<GameResult>,
    ) -> Self {
        Self {
            id,
            session,
            matchplay,
            game,
            position,
            turn,
            remaining,
            cube_value,
            cube_owner,
            crawford,
            phase,
            result,
        }
    }
    pub fn session(&self) -> ID<Session> {
        self.session
    }
    pub fn matchplay(&self) -> ID<Match> {
        self.matchplay
    }
    pub fn game(&self) -> usize {
        self.game
    }
    pub fn position(&self) -> &PositionId {
        &self.position
    }
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }
    pub fn is_terminal(&self) -> bool {
        self.result.is_some()
    }
}

impl Unique for GameCheckpoint {
    fn id(&self) -> ID<Self> {
        self.id
    }
}
