use super::Rejection;
use crate::CUBE_CAP;
use crate::Stakes;
use crate::board::Color;

/// Who holds the doubling cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CubeOwner {
    Center,
    Player(Color),
}

/// The doubling cube: a stake multiplier in {1, 2, 4, 8, 16, 32, 64}.
///
/// From the center either side may offer; once owned, only the side that
/// did not take it last may offer again. An offer stays pending until it
/// is taken (value doubles, ownership passes to the taker) or dropped
/// (the offerer wins the game at pre-offer stakes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Cube {
    value: Stakes,
    owner: CubeOwner,
    offer: Option<Color>,
}

impl Default for Cube {
    fn default() -> Self {
        Self {
            value: 1,
            owner: CubeOwner::Center,
            offer: None,
        }
    }
}

impl Cube {
    pub fn value(&self) -> Stakes {
        self.value
    }
    pub fn owner(&self) -> CubeOwner {
        self.owner
    }
    pub fn offer(&self) -> Option<Color> {
        self.offer
    }
    pub fn is_pending(&self) -> bool {
        self.offer.is_some()
    }
    pub fn may_offer(&self, color: Color) -> bool {
        self.offer.is_none()
            && match self.owner {
                CubeOwner::Center => true,
                CubeOwner::Player(owner) => owner != color,
            }
    }

    pub fn propose(&mut self, color: Color, crawford: bool) -> Result<Stakes, Rejection> {
        if crawford {
            return Err(Rejection::CrawfordNoDouble);
        }
        if self.offer.is_some() {
            return Err(Rejection::DoublePending);
        }
        if !self.may_offer(color) {
            return Err(Rejection::CubeUnavailable);
        }
        if self.value >= CUBE_CAP {
            return Err(Rejection::CubeMaxed);
        }
        self.offer = Some(color);
        Ok(self.value * 2)
    }
    /// Accept the pending offer. Value doubles; the taker owns the cube.
    pub fn take(&mut self) -> Result<(Stakes, Color), Rejection> {
        let offerer = self.offer.take().ok_or(Rejection::NoDoublePending)?;
        let taker = offerer.opponent();
        self.value *= 2;
        self.owner = CubeOwner::Player(taker);
        Ok((self.value, taker))
    }
    /// Drop the pending offer. Returns the offerer, who wins the game at
    /// the pre-offer stakes.
    pub fn drop(&mut self) -> Result<Color, Rejection> {
        self.offer.take().ok_or(Rejection::NoDoublePending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Color::*;

    #[test]
    fn centered_cube_is_free_for_both() {
        let cube = Cube::default();
        assert!(cube.may_offer(White));
        assert!(cube.may_offer(Red));
        assert_eq!(cube.value(), 1);
    }

    #[test]
    fn take_transfers_and_doubles() {
        let mut cube = Cube::default();
        assert_eq!(cube.propose(White, false), Ok(2));
        assert!(cube.is_pending());
        assert_eq!(cube.take(), Ok((2, Red)));
        assert_eq!(cube.owner(), CubeOwner::Player(Red));
        assert_eq!(cube.value(), 2);
        assert!(!cube.is_pending());
    }

    #[test]
    fn only_the_opponent_of_the_holder_offers() {
        let mut cube = Cube::default();
        cube.propose(White, false).unwrap();
        cube.take().unwrap();
        // Red holds the cube now
        assert!(cube.may_offer(White));
        assert!(!cube.may_offer(Red));
        assert_eq!(cube.propose(Red, false), Err(Rejection::CubeUnavailable));
    }

    #[test]
    fn drop_returns_offerer_at_old_stakes() {
        let mut cube = Cube::default();
        cube.propose(White, false).unwrap();
        cube.take().unwrap();
        cube.propose(White, false).unwrap();
        let value_before = cube.value();
        assert_eq!(cube.drop(), Ok(White));
        assert_eq!(cube.value(), value_before);
    }

    #[test]
    fn crawford_rejects_every_offer() {
        let mut cube = Cube::default();
        assert_eq!(cube.propose(White, true), Err(Rejection::CrawfordNoDouble));
        assert_eq!(cube.propose(Red, true), Err(Rejection::CrawfordNoDouble));
    }

    #[test]
    fn no_offer_past_sixty_four() {
        let mut cube = Cube::default();
        for _ in 0..6 {
            let offerer = match cube.owner() {
                CubeOwner::Center => White,
                CubeOwner::Player(p) => p.opponent(),
            };
            cube.propose(offerer, false).unwrap();
            cube.take().unwrap();
        }
        assert_eq!(cube.value(), 64);
        let offerer = match cube.owner() {
            CubeOwner::Player(p) => p.opponent(),
            CubeOwner::Center => White,
        };
        assert_eq!(cube.propose(offerer, false), Err(Rejection::CubeMaxed));
    }

    #[test]
    fn no_second_offer_while_pending() {
        let mut cube = Cube::default();
        cube.propose(White, false).unwrap();
        assert_eq!(cube.propose(Red, false), Err(Rejection::DoublePending));
    }

    #[test]
    fn value_never_decreases() {
        let mut cube = Cube::default();
        let mut last = cube.value();
        for _ in 0..4 {
            let offerer = match cube.owner() {
                CubeOwner::Center => Red,
                CubeOwner::Player(p) => p.opponent(),
            };
            cube.propose(offerer, false).unwrap();
            cube.take().unwrap();
            assert!(cube.value() > last);
            assert_eq!(cube.value(), last * 2);
            last = cube.value();
        }
    }
}
