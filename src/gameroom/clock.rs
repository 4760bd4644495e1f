use crate::MOVE_DELAY_SECS;
use crate::RESERVE_SECS_PER_POINT;
use crate::Score;
use crate::TIME_UPDATE_MILLIS;
use crate::board::Color;
use std::time::Duration;

/// Wire view of a running clock, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClockView {
    pub running: Option<Color>,
    pub delay_secs: u64,
    pub reserve_secs: [u64; 2],
}

/// ChicagoPoint time control: each turn starts with a per-move delay
/// that costs nothing; once the delay runs out, the mover's shared
/// reserve drains. An empty reserve loses the game.
///
/// The clock is pure accounting. It is advanced by tick posts delivered
/// through the room mailbox, never from another thread, so there is no
/// locking here and no clock without a room.
#[derive(Debug, Clone)]
pub struct Clock {
    delay: Duration,
    delay_left: Duration,
    reserve: [Duration; 2],
    running: Option<Color>,
    since_announce: Duration,
}

impl Clock {
    /// Reserve is two minutes per match target point, per game.
    pub fn chicago(target: Score) -> Self {
        let reserve = Duration::from_secs(RESERVE_SECS_PER_POINT * target as u64);
        Self {
            delay: Duration::from_secs(MOVE_DELAY_SECS),
            delay_left: Duration::ZERO,
            reserve: [reserve; 2],
            running: None,
            since_announce: Duration::ZERO,
        }
    }

    pub fn running(&self) -> Option<Color> {
        self.running
    }
    pub fn reserve(&self, color: Color) -> Duration {
        self.reserve[color.index()]
    }
    pub fn view(&self) -> ClockView {
        ClockView {
            running: self.running,
            delay_secs: self.delay_left.as_secs(),
            reserve_secs: [
                self.reserve[0].as_secs(), //
                self.reserve[1].as_secs(),
            ],
        }
    }

    /// A new turn: the delay refills and the mover's clock runs.
    pub fn start_turn(&mut self, color: Color) {
        self.running = Some(color);
        self.delay_left = self.delay;
    }
    /// Deterministic stop: turn ended, analysis entered, or eviction.
    pub fn stop(&mut self) {
        self.running = None;
        self.delay_left = Duration::ZERO;
    }

    /// Advance by elapsed wall time. Delay burns first and costs no
    /// reserve; anything beyond it drains the mover. Returns the flagged
    /// color the moment their reserve empties.
    pub fn tick(&mut self, elapsed: Duration) -> Option<Color> {
        let mover = self.running?;
        let overflow = match self.delay_left >= elapsed {
            true => {
                self.delay_left -= elapsed;
                Duration::ZERO
            }
            false => {
                let overflow = elapsed - self.delay_left;
                self.delay_left = Duration::ZERO;
                overflow
            }
        };
        let slot = mover.index();
        self.reserve[slot] = self.reserve[slot].saturating_sub(overflow);
        match self.reserve[slot].is_zero() {
            true => {
                self.running = None;
                Some(mover)
            }
            false => None,
        }
    }

    /// Throttle for TimeUpdate events: true at most once per second.
    pub fn announce(&mut self, elapsed: Duration) -> bool {
        self.since_announce += elapsed;
        match self.since_announce >= Duration::from_millis(TIME_UPDATE_MILLIS) {
            true => {
                self.since_announce = Duration::ZERO;
                true
            }
            false => false,
        }
    }
}
