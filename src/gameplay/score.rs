use super::GameResult;
use crate::ID;
use crate::Score;
use crate::Unique;
use crate::board::Color;

/// Multi-game stake accounting toward a target score, with Crawford
/// tracking. At most one uncompleted game exists per match at a time;
/// the match only mutates when a game result is absorbed.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Match {
    id: ID<Self>,
    target: Score,
    tally: [Score; 2],
    games: Vec<GameResult>,
    crawford_enabled: bool,
    /// The game being played right now is the Crawford game.
    crawford: bool,
    crawford_played: bool,
    winner: Option<Color>,
}

impl Unique for Match {
    fn id(&self) -> ID<Self> {
        self.id
    }
}

impl Match {
    /// Rated match play: Crawford rule in force.
    pub fn to(target: Score) -> Self {
        assert!(target > 0, "target score must be positive");
        Self {
            id: ID::default(),
            target,
            tally: [0; 2],
            games: Vec::new(),
            crawford_enabled: true,
            crawford: false,
            crawford_played: false,
            winner: None,
        }
    }
    /// Casual play: no Crawford game, doubling is always live.
    pub fn casual(target: Score) -> Self {
        Self {
            crawford_enabled: false,
            ..Self::to(target)
        }
    }

    pub fn target(&self) -> Score {
        self.target
    }
    pub fn score(&self, color: Color) -> Score {
        self.tally[color.index()]
    }
    pub fn games(&self) -> &[GameResult] {
        &self.games
    }
    /// 1-based number of the game currently being played.
    pub fn game_number(&self) -> usize {
        self.games.len() + 1
    }
    pub fn is_crawford(&self) -> bool {
        self.crawford
    }
    pub fn is_complete(&self) -> bool {
        self.winner.is_some()
    }
    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    /// Settle a finished game into the match: add stakes, append history,
    /// arm the Crawford game for the first game after a player reaches
    /// target minus one (exactly once), and complete the match when a
    /// tally reaches the target.
    pub fn absorb(&mut self, result: GameResult) {
        assert!(self.winner.is_none(), "absorbing into a complete match");
        if self.crawford {
            self.crawford = false;
            self.crawford_played = true;
        }
        self.tally[result.winner.index()] += result.stakes;
        self.games.push(result);
        if self.score(result.winner) >= self.target {
            self.winner = Some(result.winner);
        } else if self.crawford_enabled
            && !self.crawford_played
            && [Color::White, Color::Red]
                .iter()
                .any(|c| self.score(*c) == self.target - 1)
        {
            self.crawford = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Stakes;
    use crate::gameplay::WinKind;
    use Color::*;

    fn win(color: Color, stakes: Stakes) -> GameResult {
        GameResult {
            winner: color,
            kind: WinKind::Normal,
            stakes,
        }
    }

    #[test]
    fn tallies_accumulate() {
        let mut m = Match::to(7);
        m.absorb(win(White, 2));
        m.absorb(win(Red, 1));
        m.absorb(win(White, 4));
        assert_eq!(m.score(White), 6);
        assert_eq!(m.score(Red), 1);
        assert_eq!(m.games().len(), 3);
        assert_eq!(m.game_number(), 4);
        assert!(!m.is_complete());
    }

    #[test]
    fn completes_at_target() {
        let mut m = Match::to(3);
        m.absorb(win(Red, 2));
        m.absorb(win(Red, 2));
        assert!(m.is_complete());
        assert_eq!(m.winner(), Some(Red));
    }

    #[test]
    fn crawford_arms_on_reaching_match_point() {
        let mut m = Match::to(5);
        m.absorb(win(White, 2));
        m.absorb(win(Red, 2));
        assert!(!m.is_crawford());
        m.absorb(win(White, 2)); // 4-2, White at target minus one
        assert!(m.is_crawford());
    }

    #[test]
    fn crawford_plays_exactly_once() {
        let mut m = Match::to(5);
        m.absorb(win(White, 4)); // arm
        assert!(m.is_crawford());
        m.absorb(win(Red, 1)); // the Crawford game, Red survives
        assert!(!m.is_crawford());
        m.absorb(win(Red, 2));
        assert!(!m.is_crawford());
        m.absorb(win(Red, 1)); // Red now at 4 too, but Crawford is spent
        assert!(!m.is_crawford());
    }

    #[test]
    fn casual_match_never_arms_crawford() {
        let mut m = Match::casual(5);
        m.absorb(win(White, 4));
        assert!(!m.is_crawford());
    }

    #[test]
    #[should_panic]
    fn complete_match_absorbs_nothing() {
        let mut m = Match::to(1);
        m.absorb(win(White, 1));
        m.absorb(win(Red, 1));
    }

    #[test]
    fn overshoot_still_completes() {
        let mut m = Match::to(3);
        m.absorb(win(White, 8)); // backgammon at cube 4 blows past target
        assert!(m.is_complete());
        assert_eq!(m.winner(), Some(White));
    }
}
