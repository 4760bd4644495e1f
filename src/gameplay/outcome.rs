use crate::Stakes;
use crate::board::Board;
use crate::board::Color;

/// How decisively a game was won. Multiplies the cube value into stakes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum WinKind {
    /// The loser has borne off at least one checker.
    Normal,
    /// The loser has borne off nothing.
    Gammon,
    /// The loser has borne off nothing and still has a checker on the bar
    /// or inside the winner's home board.
    Backgammon,
}

impl WinKind {
    pub fn multiplier(&self) -> Stakes {
        match self {
            Self::Normal => 1,
            Self::Gammon => 2,
            Self::Backgammon => 3,
        }
    }
    /// Classify a finished board from the winner's side.
    pub fn classify(board: &Board, winner: Color) -> Self {
        let loser = winner.opponent();
        if board.off(loser) > 0 {
            Self::Normal
        } else if board.is_trapped(loser) {
            Self::Backgammon
        } else {
            Self::Gammon
        }
    }
}

impl std::fmt::Display for WinKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "single"),
            Self::Gammon => write!(f, "gammon"),
            Self::Backgammon => write!(f, "backgammon"),
        }
    }
}

/// Terminal verdict for one game: who won, how, and for how much.
/// Stakes are the win multiplier times the cube value, except that
/// declines, forfeits, and timeouts are always Normal at the live value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GameResult {
    pub winner: Color,
    pub kind: WinKind,
    pub stakes: Stakes,
}

impl GameResult {
    pub fn new(winner: Color, kind: WinKind, cube: Stakes) -> Self {
        Self {
            winner,
            kind,
            stakes: kind.multiplier() * cube,
        }
    }
    /// A win by concession rather than bear-off: decline, abandonment,
    /// or timeout. Always Normal, no gammon or backgammon.
    pub fn concession(winner: Color, cube: Stakes) -> Self {
        Self::new(winner, WinKind::Normal, cube)
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let line = format!("{} wins a {} for {}", self.winner, self.kind, self.stakes);
        #[cfg(feature = "server")]
        {
            use colored::Colorize;
            write!(f, "{}", line.bright_green())
        }
        #[cfg(not(feature = "server"))]
        {
            write!(f, "{}", line)
        }
    }
}
