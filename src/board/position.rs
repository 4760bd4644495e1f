use super::Board;
use super::Color;
use crate::CHECKERS;
use crate::POINTS;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Compact reproducible position identifier for analysis and tests.
///
/// Layout per color: checkers on the bar, then the count of that color's
/// checkers on each of the 24 points, then the borne-off count. White's
/// fields come first, Red's follow, and the 52 byte stream is base64
/// encoded. The identifier says nothing about whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PositionId(String);

impl PositionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&Board> for PositionId {
    fn from(board: &Board) -> Self {
        let mut bytes = Vec::with_capacity(52);
        for color in [Color::White, Color::Red] {
            bytes.push(board.bar(color));
            for i in 1..=POINTS {
                bytes.push(match board.point(i).holds(color) {
                    true => board.point(i).count(),
                    false => 0,
                });
            }
            bytes.push(board.off(color));
        }
        Self(STANDARD.encode(bytes))
    }
}

impl TryFrom<&PositionId> for Board {
    type Error = anyhow::Error;
    fn try_from(id: &PositionId) -> Result<Self, Self::Error> {
        let bytes = STANDARD
            .decode(&id.0)
            .map_err(|e| anyhow::anyhow!("undecodable position id: {}", e))?;
        if bytes.len() != 52 {
            anyhow::bail!("position id holds {} bytes, expected 52", bytes.len());
        }
        let mut board = Board::empty();
        for (offset, color) in [(0usize, Color::White), (26, Color::Red)] {
            for _ in 0..bytes[offset] {
                board.send_to_bar(color);
            }
            for i in 1..=POINTS {
                let count = bytes[offset + i];
                if count > 0 && board.point(i).holds(color.opponent()) {
                    anyhow::bail!("point {} occupied by both colors", i);
                }
                for _ in 0..count {
                    board.drop_on(i, color);
                }
            }
            for _ in 0..bytes[offset + 25] {
                board.bear_off(color);
            }
            if board.total(color) != CHECKERS {
                anyhow::bail!(
                    "{} has {} checkers, expected {}",
                    color,
                    board.total(color),
                    CHECKERS
                );
            }
        }
        Ok(board)
    }
}

impl std::fmt::Display for PositionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
