use super::Color;
use super::Point;
use crate::CHECKERS;
use crate::POINTS;
use crate::Pips;

/// The full checker layout: 24 points plus per-color bar and borne-off
/// counters. Points are addressed 1..=24 in White's numbering; the bar is
/// coordinate 0 and bear-off targets are 0 (White) and 25 (Red).
///
/// Conservation invariant: for each color, checkers on points + bar + off
/// always total 15. The board panics on violations rather than limping on
/// with a corrupt position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Board {
    points: [Point; POINTS],
    bar: [u8; 2],
    off: [u8; 2],
}

impl Default for Board {
    fn default() -> Self {
        Self::start()
    }
}

impl Board {
    pub fn empty() -> Self {
        Self {
            points: [Point::default(); POINTS],
            bar: [0; 2],
            off: [0; 2],
        }
    }
    /// The standard opening layout: each side has 2 checkers on its 24
    /// point, 5 on 13, 3 on 8, and 5 on 6, in its own numbering.
    pub fn start() -> Self {
        let mut board = Self::empty();
        for (point, count) in [(24, 2), (13, 5), (8, 3), (6, 5)] {
            for _ in 0..count {
                board.drop_on(point, Color::White);
                board.drop_on(25 - point, Color::Red);
            }
        }
        board
    }

    pub fn point(&self, i: usize) -> &Point {
        assert!((1..=POINTS).contains(&i), "point index {} out of range", i);
        &self.points[i - 1]
    }
    fn point_mut(&mut self, i: usize) -> &mut Point {
        assert!((1..=POINTS).contains(&i), "point index {} out of range", i);
        &mut self.points[i - 1]
    }
    pub fn bar(&self, color: Color) -> u8 {
        self.bar[color.index()]
    }
    pub fn off(&self, color: Color) -> u8 {
        self.off[color.index()]
    }

    pub fn drop_on(&mut self, i: usize, color: Color) {
        self.point_mut(i).push(color);
    }
    pub fn lift(&mut self, i: usize) -> Color {
        self.point_mut(i).pop()
    }
    pub fn send_to_bar(&mut self, color: Color) {
        self.bar[color.index()] += 1;
    }
    pub fn take_from_bar(&mut self, color: Color) {
        assert!(self.bar(color) > 0, "no {} checker on the bar", color);
        self.bar[color.index()] -= 1;
    }
    pub fn bear_off(&mut self, color: Color) {
        self.off[color.index()] += 1;
    }
    pub fn unbear_off(&mut self, color: Color) {
        assert!(self.off(color) > 0, "no {} checker borne off", color);
        self.off[color.index()] -= 1;
    }

    /// Bear-off precondition: every checker home, none on the bar.
    pub fn all_in_home(&self, color: Color) -> bool {
        self.bar(color) == 0
            && (1..=POINTS)
                .filter(|i| self.point(*i).holds(color))
                .all(|i| color.is_home(i))
    }
    /// Sum of die distances to the bear-off target, bar checkers at 25.
    pub fn pip_count(&self, color: Color) -> Pips {
        let on_points = (1..=POINTS)
            .filter(|i| self.point(*i).holds(color))
            .map(|i| color.distance_off(i) * self.point(i).count() as Pips)
            .sum::<Pips>();
        on_points + self.bar(color) as Pips * (POINTS as Pips + 1)
    }
    /// The occupied point farthest from home, None when all are off or barred.
    pub fn furthest(&self, color: Color) -> Option<usize> {
        (1..=POINTS)
            .filter(|i| self.point(*i).holds(color))
            .max_by_key(|i| color.distance_off(*i))
    }
    /// Any checker on the bar or inside the opponent's home board.
    /// This is what upgrades a gammon to a backgammon.
    pub fn is_trapped(&self, color: Color) -> bool {
        self.bar(color) > 0
            || color
                .opponent()
                .home()
                .any(|i| self.point(i).holds(color))
    }

    pub fn total(&self, color: Color) -> u8 {
        let on_points = (1..=POINTS)
            .filter(|i| self.point(*i).holds(color))
            .map(|i| self.point(i).count())
            .sum::<u8>();
        on_points + self.bar(color) + self.off(color)
    }
    pub fn conserved(&self) -> bool {
        self.total(Color::White) == CHECKERS && self.total(Color::Red) == CHECKERS
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cell = |i: usize| match self.point(i).color() {
            Some(Color::White) => format!("W{:<2}", self.point(i).count()),
            Some(Color::Red) => format!("R{:<2}", self.point(i).count()),
            None => " . ".to_string(),
        };
        writeln!(f, "13 14 15 16 17 18 | 19 20 21 22 23 24")?;
        for i in 13..=24 {
            write!(f, "{}", cell(i))?;
            if i == 18 {
                write!(f, "| ")?;
            }
        }
        writeln!(f)?;
        for i in (1..=12).rev() {
            write!(f, "{}", cell(i))?;
            if i == 7 {
                write!(f, "| ")?;
            }
        }
        writeln!(f)?;
        writeln!(f, "12 11 10  9  8  7 |  6  5  4  3  2  1")?;
        write!(
            f,
            "bar W{} R{}  off W{} R{}",
            self.bar(Color::White),
            self.bar(Color::Red),
            self.off(Color::White),
            self.off(Color::Red),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_is_conserved() {
        let board = Board::start();
        assert!(board.conserved());
        assert_eq!(board.point(24).count(), 2);
        assert_eq!(board.point(24).color(), Some(Color::White));
        assert_eq!(board.point(1).count(), 2);
        assert_eq!(board.point(1).color(), Some(Color::Red));
        assert_eq!(board.point(13).count(), 5);
        assert_eq!(board.point(12).count(), 5);
    }

    #[test]
    fn start_pip_counts() {
        let board = Board::start();
        assert_eq!(board.pip_count(Color::White), 167);
        assert_eq!(board.pip_count(Color::Red), 167);
    }

    #[test]
    fn furthest_from_home() {
        let board = Board::start();
        assert_eq!(board.furthest(Color::White), Some(24));
        assert_eq!(board.furthest(Color::Red), Some(1));
    }

    #[test]
    fn all_in_home_detection() {
        let mut board = Board::empty();
        for _ in 0..15 {
            board.drop_on(6, Color::White);
            board.drop_on(19, Color::Red);
        }
        assert!(board.all_in_home(Color::White));
        assert!(board.all_in_home(Color::Red));
        board.lift(6);
        board.drop_on(7, Color::White);
        assert!(!board.all_in_home(Color::White));
    }

    #[test]
    fn bar_blocks_all_in_home() {
        let mut board = Board::empty();
        for _ in 0..14 {
            board.drop_on(3, Color::White);
        }
        board.send_to_bar(Color::White);
        assert!(!board.all_in_home(Color::White));
        assert_eq!(board.total(Color::White), 15);
    }

    #[test]
    fn trapped_detection() {
        let mut board = Board::empty();
        board.drop_on(22, Color::White);
        assert!(board.is_trapped(Color::White));
        let mut board = Board::empty();
        board.send_to_bar(Color::Red);
        assert!(board.is_trapped(Color::Red));
        let mut board = Board::empty();
        board.drop_on(10, Color::Red);
        assert!(!board.is_trapped(Color::Red));
    }

    #[test]
    fn bar_pips_count_full_length() {
        let mut board = Board::empty();
        board.send_to_bar(Color::White);
        assert_eq!(board.pip_count(Color::White), 25);
        let mut board = Board::empty();
        board.send_to_bar(Color::Red);
        assert_eq!(board.pip_count(Color::Red), 25);
    }
}
