use super::ClockView;
use super::Session;
use crate::Die;
use crate::ID;
use crate::Pips;
use crate::Score;
use crate::Stakes;
use crate::board::Color;
use crate::board::Point;
use crate::gameplay::CubeOwner;
use crate::gameplay::Move;
use crate::gameplay::Phase;

/// Standing of the surrounding match as clients see it.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MatchView {
    pub target: Score,
    pub white: Score,
    pub red: Score,
    pub crawford: bool,
    pub game: usize,
}

/// Versioned per-viewer state view. The board is always complete, both
/// players' bar and off counters included; `moves` is populated only for
/// the viewer whose turn it is (or the analysis owner), so a spectator
/// or the waiting side never learns the legal set ahead of time.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    pub session: ID<Session>,
    pub points: Vec<Point>,
    pub bar: [u8; 2],
    pub off: [u8; 2],
    pub pips: [Pips; 2],
    pub current: Option<Color>,
    pub roll: Option<(Die, Die)>,
    pub remaining: Vec<Die>,
    pub moves: Option<Vec<Move>>,
    pub cube_value: Stakes,
    pub cube_owner: CubeOwner,
    pub pending_double: Option<Color>,
    pub matchplay: MatchView,
    pub clock: Option<ClockView>,
    pub phase: Phase,
    pub you: Option<Color>,
}
