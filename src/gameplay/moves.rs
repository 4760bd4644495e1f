use crate::BAR;
use crate::Die;
use crate::board::Color;

/// A single-die checker move. `from = 0` is entry from the bar; `off`
/// moves carry the bear-off coordinate in `to` (0 for White, 25 for Red).
/// `hit` records that the destination held an opponent blot, which is
/// what makes the move reversible by undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Move {
    pub from: usize,
    pub to: usize,
    pub die: Die,
    pub hit: bool,
    pub off: bool,
}

impl Move {
    /// Plain point-to-point move.
    pub fn step(from: usize, to: usize, die: Die, hit: bool) -> Self {
        Self {
            from,
            to,
            die,
            hit,
            off: false,
        }
    }
    /// Entry from the bar onto the opponent's home board.
    pub fn enter(color: Color, die: Die, hit: bool) -> Self {
        Self {
            from: BAR,
            to: color.entry(die),
            die,
            hit,
            off: false,
        }
    }
    /// Bear a checker off the board.
    pub fn bear(color: Color, from: usize, die: Die) -> Self {
        Self {
            from,
            to: match color {
                Color::White => 0,
                Color::Red => 25,
            },
            die,
            hit: false,
            off: true,
        }
    }
    pub fn is_entry(&self) -> bool {
        self.from == BAR
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let star = if self.hit { "*" } else { "" };
        match (self.is_entry(), self.off) {
            (true, _) => write!(f, "bar/{}{}", self.to, star),
            (_, true) => write!(f, "{}/off", self.from),
            _ => write!(f, "{}/{}{}", self.from, self.to, star),
        }
    }
}
