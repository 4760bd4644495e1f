use crate::Die;
use crate::Pips;
use crate::POINTS;

/// The two sides of the board. White races from point 24 down to 1,
/// Red from point 1 up to 24. Absence of a checker is Option<Color>,
/// never a third variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Color {
    White,
    Red,
}

impl Color {
    pub fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Red,
            Self::Red => Self::White,
        }
    }
    /// Index into per-color arrays (bar, off, score tallies).
    pub fn index(&self) -> usize {
        match self {
            Self::White => 0,
            Self::Red => 1,
        }
    }
    /// Home board points: 1..=6 for White, 19..=24 for Red.
    pub fn home(&self) -> std::ops::RangeInclusive<usize> {
        match self {
            Self::White => 1..=6,
            Self::Red => 19..=24,
        }
    }
    /// Entry point when coming off the bar with a given die.
    pub fn entry(&self, die: Die) -> usize {
        match self {
            Self::White => 25 - die as usize,
            Self::Red => die as usize,
        }
    }
    /// Destination of a point-to-point move, None once it leaves the board.
    pub fn target(&self, from: usize, die: Die) -> Option<usize> {
        let to = match self {
            Self::White => from as isize - die as isize,
            Self::Red => from as isize + die as isize,
        };
        match to {
            1..=24 => Some(to as usize),
            _ => None,
        }
    }
    /// Exact die distance from a point to the bear-off target.
    pub fn distance_off(&self, point: usize) -> Pips {
        assert!((1..=POINTS).contains(&point));
        match self {
            Self::White => point as Pips,
            Self::Red => (POINTS + 1 - point) as Pips,
        }
    }
    pub fn is_home(&self, point: usize) -> bool {
        self.home().contains(&point)
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::White => write!(f, "White"),
            Self::Red => write!(f, "Red"),
        }
    }
}

impl crate::Arbitrary for Color {
    fn random() -> Self {
        match rand::random::<bool>() {
            true => Self::White,
            false => Self::Red,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directions_mirror() {
        assert_eq!(Color::White.target(24, 6), Some(18));
        assert_eq!(Color::Red.target(1, 6), Some(7));
        assert_eq!(Color::White.target(3, 5), None);
        assert_eq!(Color::Red.target(22, 5), None);
    }

    #[test]
    fn bar_entries() {
        assert_eq!(Color::White.entry(1), 24);
        assert_eq!(Color::White.entry(6), 19);
        assert_eq!(Color::Red.entry(1), 1);
        assert_eq!(Color::Red.entry(6), 6);
    }

    #[test]
    fn off_distances() {
        assert_eq!(Color::White.distance_off(1), 1);
        assert_eq!(Color::White.distance_off(6), 6);
        assert_eq!(Color::Red.distance_off(24), 1);
        assert_eq!(Color::Red.distance_off(19), 6);
    }
}
