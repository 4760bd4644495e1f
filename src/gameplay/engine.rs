use super::Cube;
use super::GameResult;
use super::Move;
use super::Phase;
use super::Rejection;
use super::WinKind;
use crate::CHECKERS;
use crate::Die;
use crate::board::Board;
use crate::board::Color;
use crate::board::Dice;
use crate::board::expand;

/// The authoritative state of one game and the pure rules for how it may
/// proceed. Board, dice, turn, per-turn undo history, doubling cube, and
/// the winner once determined. Every mutation goes through a validated
/// operation returning a typed result; the engine never guesses and never
/// throws for anything a client could cause.
///
/// The engine is single-threaded by construction: the room actor that
/// owns it is the only caller.
#[derive(Debug, Clone)]
pub struct Engine {
    board: Board,
    dice: Dice,
    turn: Option<Color>,
    roll: Option<(Die, Die)>,
    remaining: Vec<Die>,
    history: Vec<Move>,
    origin: Board,
    cube: Cube,
    crawford: bool,
    winner: Option<GameResult>,
    started: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with(Dice::new(), false)
    }
    pub fn seeded(seed: u64) -> Self {
        Self::with(Dice::seeded(seed), false)
    }
    pub fn crawford(seed: Option<u64>) -> Self {
        let dice = match seed {
            Some(seed) => Dice::seeded(seed),
            None => Dice::new(),
        };
        Self::with(dice, true)
    }
    fn with(dice: Dice, crawford: bool) -> Self {
        Self {
            board: Board::start(),
            dice,
            turn: None,
            roll: None,
            remaining: Vec::new(),
            history: Vec::new(),
            origin: Board::start(),
            cube: Cube::default(),
            crawford,
            winner: None,
            started: false,
        }
    }

    //
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn current(&self) -> Option<Color> {
        self.turn
    }
    pub fn rolled(&self) -> Option<(Die, Die)> {
        self.roll
    }
    pub fn remaining(&self) -> &[Die] {
        &self.remaining
    }
    pub fn history(&self) -> &[Move] {
        &self.history
    }
    pub fn cube(&self) -> &Cube {
        &self.cube
    }
    pub fn is_crawford(&self) -> bool {
        self.crawford
    }
    pub fn is_started(&self) -> bool {
        self.started
    }
    pub fn result(&self) -> Option<GameResult> {
        self.winner
    }
    pub fn phase(&self) -> Phase {
        if self.winner.is_some() {
            Phase::Terminal
        } else if !self.started {
            Phase::Waiting
        } else if self.cube.is_pending() {
            Phase::Doubling
        } else if self.roll.is_none() {
            Phase::Rolling
        } else {
            Phase::Moving
        }
    }

    // dice

    /// Pin the next roll for tests and the admin reseed surface.
    pub fn reseed(&mut self, d1: Die, d2: Die) {
        self.dice.fix(d1, d2);
    }
    /// The opening roll: one die per side, re-rolled until distinct. The
    /// higher die moves first and plays exactly those two values.
    pub fn open(&mut self) -> Result<(Color, (Die, Die)), Rejection> {
        if self.winner.is_some() {
            return Err(Rejection::GameAlreadyOver);
        }
        if self.started {
            return Err(Rejection::AlreadyRolled);
        }
        let (white, red) = self.dice.opening();
        let first = if white > red { Color::White } else { Color::Red };
        self.started = true;
        self.turn = Some(first);
        self.roll = Some((white, red));
        self.remaining = expand(white, red);
        self.origin = self.board;
        Ok((first, (white, red)))
    }
    /// Roll for the current turn. Doubles expand to four dice.
    pub fn throw(&mut self) -> Result<(Die, Die), Rejection> {
        if self.winner.is_some() {
            return Err(Rejection::GameAlreadyOver);
        }
        if !self.started {
            return Err(Rejection::GameNotStarted);
        }
        if self.cube.is_pending() {
            return Err(Rejection::DoublePending);
        }
        if self.roll.is_some() {
            return Err(Rejection::AlreadyRolled);
        }
        let (d1, d2) = self.dice.roll();
        self.roll = Some((d1, d2));
        self.remaining = expand(d1, d2);
        self.origin = self.board;
        Ok((d1, d2))
    }

    // moves

    /// All single-die moves legal right now. The ordering is incidental;
    /// the set is canonical.
    pub fn legal(&self) -> Vec<Move> {
        match (self.turn, self.winner, self.remaining.is_empty()) {
            (Some(color), None, false) => Self::moves_for(&self.board, color, &self.remaining),
            _ => Vec::new(),
        }
    }
    pub fn is_allowed(&self, m: &Move) -> bool {
        self.legal().contains(m)
    }
    /// The legal moves that keep the maximum dice-use reachable. Playing
    /// only from this set can never strand a usable die, and when just
    /// one of two unequal dice can be used the larger is the only one
    /// offered.
    pub fn optimal(&self) -> Vec<Move> {
        let color = match self.turn {
            Some(color) => color,
            None => return Vec::new(),
        };
        let best = Self::best_use(&self.board, color, &self.remaining);
        let mut keepers = self
            .legal()
            .into_iter()
            .filter(|m| {
                let mut board = self.board;
                Self::advance(&mut board, color, m);
                1 + Self::best_use(&board, color, &Self::without(&self.remaining, m.die)) == best
            })
            .collect::<Vec<Move>>();
        if let Some((d1, d2)) = self.roll {
            let larger = d1.max(d2);
            if d1 != d2
                && best == 1
                && self.history.is_empty()
                && keepers.iter().any(|m| m.die == larger)
            {
                keepers.retain(|m| m.die == larger);
            }
        }
        keepers
    }
    /// Match a wire (from, to) pair to a concrete legal move. When several
    /// dice fit (bear-off overshoot), prefers the one that keeps the most
    /// subsequent dice playable, then the smaller die.
    pub fn resolve(&self, from: usize, to: usize) -> Option<Move> {
        let color = self.turn?;
        let mut candidates = self
            .legal()
            .into_iter()
            .filter(|m| m.from == from)
            .filter(|m| match m.off {
                true => to == m.to || to == 0 || to == 25,
                false => to == m.to,
            })
            .collect::<Vec<Move>>();
        candidates.sort_by_key(|m| {
            let mut board = self.board;
            Self::advance(&mut board, color, m);
            let onward = Self::best_use(&board, color, &Self::without(&self.remaining, m.die));
            (std::cmp::Reverse(onward), m.die)
        });
        candidates.first().copied()
    }

    /// Validate and execute one move: consume the die, apply hit or
    /// bear-off side effects, record undo history, detect the win.
    pub fn play(&mut self, m: Move) -> Result<(), Rejection> {
        let color = self.preconditions(&m)?;
        Self::advance(&mut self.board, color, &m);
        let slot = self
            .remaining
            .iter()
            .position(|d| *d == m.die)
            .expect("die checked in preconditions");
        self.remaining.remove(slot);
        self.history.push(m);
        assert!(self.board.conserved(), "checker conservation violated");
        if self.board.off(color) == CHECKERS {
            let kind = WinKind::classify(&self.board, color);
            self.winner = Some(GameResult::new(color, kind, self.cube.value()));
        }
        Ok(())
    }
    fn preconditions(&self, m: &Move) -> Result<Color, Rejection> {
        if self.winner.is_some() {
            return Err(Rejection::GameAlreadyOver);
        }
        let color = self.turn.ok_or(Rejection::GameNotStarted)?;
        if self.roll.is_none() || self.remaining.is_empty() {
            return Err(Rejection::NoRollYet);
        }
        if !self.remaining.contains(&m.die) {
            return Err(Rejection::DieNotAvailable);
        }
        if !m.off && !(1..=crate::POINTS).contains(&m.to) {
            return Err(Rejection::IllegalMove);
        }
        if self.board.bar(color) > 0 && !m.is_entry() {
            return Err(Rejection::BarEntryRequired);
        }
        if m.off && !self.board.all_in_home(color) {
            return Err(Rejection::NotAllInHome);
        }
        if !m.off && !self.board.point(m.to).is_open_for(color) {
            return Err(Rejection::DestinationBlocked);
        }
        if !self.is_allowed(m) {
            return Err(Rejection::IllegalMove);
        }
        Ok(color)
    }

    /// Reverse the most recent move of this turn, including returning a
    /// hit checker to the opponent's bar and the die to the pool.
    pub fn undo(&mut self) -> Result<(), Rejection> {
        if self.winner.is_some() {
            return Err(Rejection::GameAlreadyOver);
        }
        let color = self.turn.ok_or(Rejection::GameNotStarted)?;
        let m = self.history.pop().ok_or(Rejection::NothingToUndo)?;
        Self::retreat(&mut self.board, color, &m);
        self.remaining.push(m.die);
        assert!(self.board.conserved(), "checker conservation violated");
        Ok(())
    }

    /// End the turn, enforcing maximal die use: rejected while a legal
    /// sequence from the turn-start state uses strictly more dice than
    /// were played, or when the single playable die was the smaller one.
    pub fn pass(&mut self) -> Result<Color, Rejection> {
        if self.winner.is_some() {
            return Err(Rejection::GameAlreadyOver);
        }
        let color = self.turn.ok_or(Rejection::GameNotStarted)?;
        let (d1, d2) = self.roll.ok_or(Rejection::NoRollYet)?;
        let thrown = expand(d1, d2);
        let best = Self::best_use(&self.origin, color, &thrown);
        if self.history.len() < best {
            return Err(Rejection::WouldSkipUsableDie);
        }
        if d1 != d2 && best == 1 && self.history.len() == 1 {
            let larger = d1.max(d2);
            let played = self.history[0].die;
            if played < larger && Self::best_use(&self.origin, color, &[larger]) == 1 {
                return Err(Rejection::WouldSkipUsableDie);
            }
        }
        let next = color.opponent();
        self.turn = Some(next);
        self.roll = None;
        self.remaining.clear();
        self.history.clear();
        self.origin = self.board;
        Ok(next)
    }

    // cube

    /// Offer a double. Only on the offerer's turn, before rolling, when
    /// the cube is available to them, and never in a Crawford game.
    pub fn double(&mut self) -> Result<crate::Stakes, Rejection> {
        if self.winner.is_some() {
            return Err(Rejection::GameAlreadyOver);
        }
        let color = self.turn.ok_or(Rejection::GameNotStarted)?;
        if self.roll.is_some() {
            return Err(Rejection::NotBeforeRoll);
        }
        self.cube.propose(color, self.crawford)
    }
    /// Accept the pending double: value doubles, the taker owns the cube,
    /// and the offerer rolls on.
    pub fn take(&mut self) -> Result<(crate::Stakes, Color), Rejection> {
        if self.winner.is_some() {
            return Err(Rejection::GameAlreadyOver);
        }
        self.cube.take()
    }
    /// Decline the pending double: the offerer wins at pre-offer stakes,
    /// classification Normal regardless of the board.
    pub fn drop_cube(&mut self) -> Result<GameResult, Rejection> {
        if self.winner.is_some() {
            return Err(Rejection::GameAlreadyOver);
        }
        let offerer = self.cube.drop()?;
        let result = GameResult::concession(offerer, self.cube.value());
        self.winner = Some(result);
        Ok(result)
    }

    /// Concede the game: abandonment or timeout. The opponent wins at the
    /// live cube value, classification Normal.
    pub fn forfeit(&mut self, loser: Color) -> Result<GameResult, Rejection> {
        if self.winner.is_some() {
            return Err(Rejection::GameAlreadyOver);
        }
        let result = GameResult::concession(loser.opponent(), self.cube.value());
        self.winner = Some(result);
        Ok(result)
    }
}

/// Pure rules of movement, shared by live validation and the maximal
/// die-use search.
impl Engine {
    /// Canonical single-die move set for a board, color, and dice pool.
    /// Bar entries take absolute priority; bear-offs require every
    /// checker home, with overshoot only from the furthest point.
    fn moves_for(board: &Board, color: Color, dice: &[Die]) -> Vec<Move> {
        let mut faces = dice.to_vec();
        faces.sort_unstable();
        faces.dedup();
        let mut moves = Vec::new();
        if board.bar(color) > 0 {
            for die in faces {
                let entry = color.entry(die);
                if board.point(entry).is_open_for(color) {
                    moves.push(Move::enter(color, die, board.point(entry).is_hit_by(color)));
                }
            }
            return moves;
        }
        for from in (1..=crate::POINTS).filter(|i| board.point(*i).holds(color)) {
            for die in faces.iter().copied() {
                if let Some(to) = color.target(from, die) {
                    if board.point(to).is_open_for(color) {
                        moves.push(Move::step(from, to, die, board.point(to).is_hit_by(color)));
                    }
                }
            }
        }
        if board.all_in_home(color) {
            for from in color.home().filter(|i| board.point(*i).holds(color)) {
                for die in faces.iter().copied() {
                    let distance = color.distance_off(from) as Die;
                    if die == distance {
                        moves.push(Move::bear(color, from, die));
                    } else if die > distance && board.furthest(color) == Some(from) {
                        moves.push(Move::bear(color, from, die));
                    }
                }
            }
        }
        moves
    }
    /// Apply a move to a board. The move must have come from `moves_for`.
    fn advance(board: &mut Board, color: Color, m: &Move) {
        if m.hit {
            board.lift(m.to);
            board.send_to_bar(color.opponent());
        }
        if m.is_entry() {
            board.take_from_bar(color);
            board.drop_on(m.to, color);
        } else if m.off {
            board.lift(m.from);
            board.bear_off(color);
        } else {
            board.lift(m.from);
            board.drop_on(m.to, color);
        }
    }
    /// Exact inverse of `advance`.
    fn retreat(board: &mut Board, color: Color, m: &Move) {
        if m.is_entry() {
            board.lift(m.to);
            board.send_to_bar(color);
        } else if m.off {
            board.unbear_off(color);
            board.drop_on(m.from, color);
        } else {
            board.lift(m.to);
            board.drop_on(m.from, color);
        }
        if m.hit {
            board.take_from_bar(color.opponent());
            board.drop_on(m.to, color.opponent());
        }
    }
    /// Maximum number of dice usable across any legal sequence. Depth is
    /// at most four and branching is small, so plain search suffices.
    fn best_use(board: &Board, color: Color, dice: &[Die]) -> usize {
        Self::moves_for(board, color, dice)
            .into_iter()
            .map(|m| {
                let mut next = *board;
                Self::advance(&mut next, color, &m);
                1 + Self::best_use(&next, color, &Self::without(dice, m.die))
            })
            .max()
            .unwrap_or(0)
    }
    fn without(dice: &[Die], die: Die) -> Vec<Die> {
        let mut rest = dice.to_vec();
        let slot = rest.iter().position(|d| *d == die).expect("die present");
        rest.remove(slot);
        rest
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.board)?;
        match (self.turn, self.roll) {
            (Some(color), Some((d1, d2))) => {
                write!(f, "{} to play {}-{} {:?}", color, d1, d2, self.remaining)
            }
            (Some(color), None) => write!(f, "{} to roll", color),
            _ => write!(f, "not started"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BAR;
    use Color::*;

    /// Open with a pinned roll so the first mover is known.
    fn opened(white_die: Die, red_die: Die) -> Engine {
        let mut engine = Engine::seeded(0);
        engine.reseed(white_die, red_die);
        engine.open().expect("opening roll");
        engine
    }

    /// Play any maximal sequence to exhaustion, then end the turn.
    fn burn_turn(engine: &mut Engine) {
        if engine.rolled().is_none() {
            engine.throw().expect("roll");
        }
        while let Some(m) = engine.optimal().first().copied() {
            engine.play(m).expect("optimal move plays");
            if engine.result().is_some() {
                return;
            }
        }
        engine.pass().expect("maximal sequence ends cleanly");
    }

    #[test]
    fn opening_six_five() {
        let engine = opened(6, 5);
        assert_eq!(engine.current(), Some(White));
        assert_eq!(engine.rolled(), Some((6, 5)));
        let legal = engine.legal();
        assert!(legal.contains(&Move::step(24, 18, 6, false)));
        assert!(legal.contains(&Move::step(13, 8, 5, false)));
        // 19 is held by five Red checkers: no 24/19 with the 5
        assert!(!legal.iter().any(|m| m.from == 24 && m.to == 19));
    }

    #[test]
    fn lovers_leap() {
        let mut engine = opened(6, 5);
        engine.play(Move::step(24, 18, 6, false)).unwrap();
        assert!(engine.legal().contains(&Move::step(18, 13, 5, false)));
        engine.play(Move::step(18, 13, 5, false)).unwrap();
        assert!(engine.legal().is_empty());
        assert_eq!(engine.pass(), Ok(Red));
        assert_eq!(engine.phase(), Phase::Rolling);
    }

    #[test]
    fn opening_goes_to_the_higher_die() {
        let engine = opened(2, 5);
        assert_eq!(engine.current(), Some(Red));
        assert_eq!(engine.remaining(), &[2, 5]);
    }

    #[test]
    fn roll_preconditions() {
        let mut engine = Engine::seeded(0);
        assert_eq!(engine.throw(), Err(Rejection::GameNotStarted));
        engine.reseed(6, 5);
        engine.open().unwrap();
        assert_eq!(engine.throw(), Err(Rejection::AlreadyRolled));
    }

    #[test]
    fn forced_larger_die() {
        // lone White runner on 24, the rest stacked on 3 with both of
        // their exits blocked. 23 and 18 are open but 17 is not, so the
        // dice cannot be combined: either die plays alone, once.
        let mut board = Board::empty();
        board.drop_on(24, White);
        for _ in 0..14 {
            board.drop_on(3, White);
        }
        for _ in 0..2 {
            board.drop_on(17, Red); // blocks 23-6 and 18-1
        }
        for _ in 0..2 {
            board.drop_on(2, Red); // blocks 3-1
        }
        for _ in 0..11 {
            board.drop_on(1, Red);
        }
        let mut engine = opened(6, 1);
        engine.board = board;
        engine.origin = board;
        let legal = engine.legal();
        assert!(legal.contains(&Move::step(24, 23, 1, false)));
        assert!(legal.contains(&Move::step(24, 18, 6, false)));
        // the smaller die alone is not a full turn
        engine.play(Move::step(24, 23, 1, false)).unwrap();
        assert!(engine.legal().is_empty());
        assert_eq!(engine.pass(), Err(Rejection::WouldSkipUsableDie));
        engine.undo().unwrap();
        engine.play(Move::step(24, 18, 6, false)).unwrap();
        assert!(engine.legal().is_empty());
        assert!(engine.pass().is_ok());
    }

    #[test]
    fn hit_and_reenter_on_doubles() {
        let mut engine = opened(3, 2);
        // expose a Red blot on 5
        let lifted = engine.board.lift(1);
        engine.board.drop_on(5, lifted);
        engine.origin = engine.board;
        let hit = engine.resolve(8, 5).expect("8/5* resolves");
        assert!(hit.hit);
        engine.play(hit).unwrap();
        assert_eq!(engine.board.bar(Red), 1);
        engine.play(engine.resolve(13, 11).expect("13/11")).unwrap();
        engine.pass().unwrap();
        // Red is on the bar: every legal move is an entry
        engine.reseed(4, 4);
        engine.throw().unwrap();
        assert_eq!(engine.remaining(), &[4, 4, 4, 4]);
        let legal = engine.legal();
        assert!(!legal.is_empty());
        assert!(legal.iter().all(|m| m.is_entry()));
        assert!(legal.iter().all(|m| m.to == 4));
        engine.play(legal[0]).unwrap();
        assert_eq!(engine.board.bar(Red), 0);
        assert!(engine.legal().iter().all(|m| !m.is_entry()));
    }

    #[test]
    fn closed_entry_is_dance() {
        // Red on the bar rolls 3-3 against a made 3 point: no entry, and
        // the turn passes with nothing played.
        let mut board = Board::empty();
        for _ in 0..2 {
            board.drop_on(3, White);
        }
        for _ in 0..13 {
            board.drop_on(6, White);
        }
        board.send_to_bar(Red);
        for _ in 0..14 {
            board.drop_on(12, Red);
        }
        let mut engine = Engine::seeded(0);
        engine.board = board;
        engine.origin = board;
        engine.started = true;
        engine.turn = Some(Red);
        engine.reseed(3, 3);
        engine.throw().unwrap();
        assert!(engine.legal().is_empty());
        assert!(engine.pass().is_ok());
    }

    #[test]
    fn bear_off_overshoot() {
        let mut engine = opened(6, 5);
        let mut board = Board::empty();
        board.drop_on(2, White);
        board.drop_on(1, White);
        for _ in 0..13 {
            board.bear_off(White);
        }
        for _ in 0..15 {
            board.drop_on(12, Red);
        }
        engine.board = board;
        engine.origin = board;
        let legal = engine.legal();
        assert!(legal.contains(&Move::bear(White, 2, 6)));
        assert!(legal.contains(&Move::bear(White, 2, 5)));
        // overshoot never comes from behind the furthest point
        assert!(!legal.iter().any(|m| m.from == 1));
        engine.play(Move::bear(White, 2, 6)).unwrap();
        assert_eq!(engine.pass(), Err(Rejection::WouldSkipUsableDie));
        assert!(engine.legal().contains(&Move::bear(White, 1, 5)));
        engine.play(Move::bear(White, 1, 5)).unwrap();
        let result = engine.result().expect("all fifteen off");
        assert_eq!(result.winner, White);
        assert_eq!(result.kind, WinKind::Gammon);
    }

    #[test]
    fn exact_bear_off() {
        let mut engine = opened(6, 5);
        let mut board = Board::empty();
        board.drop_on(6, White);
        board.drop_on(5, White);
        for _ in 0..13 {
            board.bear_off(White);
        }
        for _ in 0..15 {
            board.drop_on(12, Red);
        }
        engine.board = board;
        engine.origin = board;
        assert!(engine.legal().contains(&Move::bear(White, 6, 6)));
        assert!(engine.legal().contains(&Move::bear(White, 5, 5)));
    }

    #[test]
    fn undo_restores_hits() {
        let mut engine = opened(3, 2);
        let lifted = engine.board.lift(1);
        engine.board.drop_on(5, lifted);
        engine.origin = engine.board;
        let before = engine.board;
        let hit = engine.resolve(8, 5).expect("8/5*");
        engine.play(hit).unwrap();
        assert_eq!(engine.board.bar(Red), 1);
        engine.undo().unwrap();
        assert_eq!(engine.board, before);
        assert_eq!(engine.remaining().len(), 2);
        assert_eq!(engine.undo(), Err(Rejection::NothingToUndo));
    }

    #[test]
    fn resolver_prefers_the_die_that_keeps_play_alive() {
        let mut engine = opened(6, 5);
        let mut board = Board::empty();
        board.drop_on(2, White);
        board.drop_on(1, White);
        for _ in 0..13 {
            board.bear_off(White);
        }
        for _ in 0..15 {
            board.drop_on(12, Red);
        }
        engine.board = board;
        engine.origin = board;
        let first = engine.resolve(2, 0).expect("2/off");
        engine.play(first).unwrap();
        let second = engine.resolve(1, 0).expect("1/off");
        engine.play(second).unwrap();
        assert!(engine.result().is_some());
    }

    #[test]
    fn double_then_decline_pays_pre_offer_stakes() {
        let mut engine = opened(2, 6);
        assert_eq!(engine.current(), Some(Red));
        // the opening mover already has dice: no double on turn one
        assert_eq!(engine.double(), Err(Rejection::NotBeforeRoll));
        burn_turn(&mut engine);
        // White doubles from the center, Red takes: cube 2, Red owns it
        assert_eq!(engine.double(), Ok(2));
        assert_eq!(engine.throw(), Err(Rejection::DoublePending));
        assert_eq!(engine.take(), Ok((2, Red)));
        burn_turn(&mut engine); // White plays out the turn
        burn_turn(&mut engine); // Red too
        // White offers again (Red holds the cube); Red declines
        assert_eq!(engine.double(), Ok(4));
        let result = engine.drop_cube().expect("declined");
        assert_eq!(result.winner, White);
        assert_eq!(result.stakes, 2);
        assert_eq!(result.kind, WinKind::Normal);
        assert_eq!(engine.phase(), Phase::Terminal);
    }

    #[test]
    fn crawford_rejects_doubles() {
        let mut engine = Engine::crawford(Some(0));
        engine.reseed(2, 6);
        engine.open().unwrap();
        burn_turn(&mut engine);
        assert_eq!(engine.double(), Err(Rejection::CrawfordNoDouble));
    }

    #[test]
    fn forfeit_is_a_normal_concession() {
        let mut engine = opened(6, 5);
        let result = engine.forfeit(White).expect("forfeit");
        assert_eq!(result.winner, Red);
        assert_eq!(result.stakes, 1);
        assert_eq!(result.kind, WinKind::Normal);
        assert_eq!(engine.forfeit(Red), Err(Rejection::GameAlreadyOver));
    }

    #[test]
    fn wrong_die_is_refused() {
        let mut engine = opened(6, 5);
        assert_eq!(
            engine.play(Move::step(13, 9, 4, false)),
            Err(Rejection::DieNotAvailable)
        );
    }

    #[test]
    fn blocked_destination_is_refused() {
        let mut engine = opened(6, 5);
        // 19 holds five Red checkers
        assert_eq!(
            engine.play(Move::step(24, 19, 5, false)),
            Err(Rejection::DestinationBlocked)
        );
    }

    #[test]
    fn bar_entry_required_first() {
        let mut engine = opened(3, 2);
        let lifted = engine.board.lift(1);
        engine.board.drop_on(5, lifted);
        engine.origin = engine.board;
        let hit = engine.resolve(8, 5).expect("8/5*");
        engine.play(hit).unwrap();
        engine.play(engine.resolve(13, 11).expect("13/11")).unwrap();
        engine.pass().unwrap();
        engine.reseed(6, 2);
        engine.throw().unwrap();
        assert_eq!(
            engine.play(Move::step(12, 18, 6, false)),
            Err(Rejection::BarEntryRequired)
        );
    }

    #[test]
    fn randomized_playouts_conserve_and_respect_direction() {
        for seed in 0..20 {
            let mut engine = Engine::seeded(seed);
            engine.open().unwrap();
            let mut turns = 0;
            while engine.result().is_none() {
                if engine.rolled().is_none() {
                    engine.throw().unwrap();
                }
                while let Some(m) = engine.optimal().first().copied() {
                    let color = engine.current().unwrap();
                    match (m.is_entry(), m.off, color) {
                        (true, _, _) => assert_eq!(m.from, BAR),
                        (_, true, _) => {}
                        (_, _, White) => assert!(m.to < m.from),
                        (_, _, Red) => assert!(m.to > m.from),
                    }
                    engine.play(m).unwrap();
                    assert!(engine.board().conserved());
                    if engine.result().is_some() {
                        break;
                    }
                }
                if engine.result().is_none() {
                    engine.pass().unwrap();
                }
                turns += 1;
                assert!(turns < 1000, "game failed to terminate");
            }
            let result = engine.result().unwrap();
            assert_eq!(engine.board().off(result.winner), CHECKERS);
        }
    }

    #[test]
    fn bar_priority_holds_under_fire() {
        for seed in 20..40 {
            let mut engine = Engine::seeded(seed);
            engine.open().unwrap();
            for _ in 0..200 {
                if engine.result().is_some() {
                    break;
                }
                if engine.rolled().is_none() {
                    engine.throw().unwrap();
                }
                let color = engine.current().unwrap();
                if engine.board().bar(color) > 0 {
                    assert!(engine.legal().iter().all(|m| m.is_entry()));
                }
                match engine.optimal().first().copied() {
                    Some(m) => engine.play(m).unwrap(),
                    None => {
                        engine.pass().unwrap();
                    }
                }
            }
        }
    }
}
