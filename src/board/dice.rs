use crate::Die;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

/// The dice cup. Production cups seed from the OS; tests and the admin
/// reseed surface pin the next roll instead of replaying RNG state.
#[derive(Debug, Clone)]
pub struct Dice {
    rng: SmallRng,
    fixed: Option<(Die, Die)>,
}

impl Default for Dice {
    fn default() -> Self {
        Self::new()
    }
}

impl Dice {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
            fixed: None,
        }
    }
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            fixed: None,
        }
    }
    /// Pin the next roll. Consumed by the next `roll` or `opening`.
    pub fn fix(&mut self, d1: Die, d2: Die) {
        assert!((1..=6).contains(&d1) && (1..=6).contains(&d2));
        self.fixed = Some((d1, d2));
    }
    pub fn roll(&mut self) -> (Die, Die) {
        match self.fixed.take() {
            Some(roll) => roll,
            None => (
                self.rng.random_range(1..=6),
                self.rng.random_range(1..=6),
            ),
        }
    }
    /// The opening roll is never doubles: re-roll until distinct. The
    /// higher die decides who moves first, and those two values are the
    /// first roll.
    pub fn opening(&mut self) -> (Die, Die) {
        loop {
            let (d1, d2) = self.roll();
            if d1 != d2 {
                return (d1, d2);
            }
        }
    }
}

/// Individual die values still available after a roll: two for a mixed
/// roll, four for doubles.
pub fn expand(d1: Die, d2: Die) -> Vec<Die> {
    if d1 == d2 {
        vec![d1; 4]
    } else {
        vec![d1, d2]
    }
}
