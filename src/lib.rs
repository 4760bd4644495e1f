//! Core types, traits, and constants for robogammon.
//!
//! The pure rules modules (`board`, `gameplay`) have no async or transport
//! dependencies and compile with `--no-default-features --features core`.
//! Everything live (rooms, hosting, records) sits behind `server`.

pub mod board;
pub mod gameplay;

#[cfg(feature = "server")]
pub mod gameroom;
#[cfg(feature = "server")]
pub mod hosting;
#[cfg(feature = "server")]
pub mod records;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// A single die face.
pub type Die = u8;
/// Points at stake in one game: cube value times win multiplier.
pub type Stakes = u32;
/// Accumulated match score per player.
pub type Score = u32;
/// Pip counts, the coarse race metric.
pub type Pips = u32;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for randomized tests.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

/// Unique identifier trait for domain entities.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
/// A session id, player id, and match id are all UUIDs on the wire but
/// can never be confused for one another in code.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
    /// Cast ID<T> to ID<U> while preserving the underlying UUID.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self {
            inner: uuid::Uuid::now_v7(),
            marker: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        uuid::Uuid::deserialize(deserializer).map(Self::from)
    }
}

impl<T> Arbitrary for ID<T> {
    fn random() -> Self {
        Self::from(uuid::Uuid::now_v7())
    }
}

// ============================================================================
// BOARD PARAMETERS
// ============================================================================
/// Checkers per color. Conservation invariant: points + bar + off = 15.
pub const CHECKERS: u8 = 15;
/// Numbered points on the board.
pub const POINTS: usize = 24;
/// Move coordinate of the bar (shared staging area for hit checkers).
pub const BAR: usize = 0;
/// Largest face of a die.
pub const DIE_MAX: Die = 6;
/// The doubling cube tops out at 64.
pub const CUBE_CAP: Stakes = 64;

// ============================================================================
// TIME CONTROL (ChicagoPoint)
// ============================================================================
/// Per-move delay before the reserve starts draining (seconds).
pub const MOVE_DELAY_SECS: u64 = 12;
/// Reserve per game: two minutes per match target point.
pub const RESERVE_SECS_PER_POINT: u64 = 120;
/// Scheduler wake period for clock accounting (milliseconds).
pub const TICK_MILLIS: u64 = 250;
/// TimeUpdate events are throttled to at most one per this interval.
pub const TIME_UPDATE_MILLIS: u64 = 1000;

// ============================================================================
// SESSION LIFECYCLE
// ============================================================================
/// Sessions idle beyond this are eligible for eviction.
pub const SESSION_TTL_SECS: u64 = 1800;
/// Sweeper wake period for eviction scans (seconds).
pub const SWEEP_SECS: u64 = 60;
/// Chat ring buffer capacity per session.
pub const CHAT_CAPACITY: usize = 64;

// ============================================================================
// AUTOMATED OPPONENTS
// ============================================================================
/// Bounded deliberation for a bot answering a double (seconds).
pub const BOT_DELIBERATION_SECS: u64 = 5;
/// Pause before a scheduled bot turn runs, so humans see the roll land.
pub const BOT_PAUSE_MILLIS: u64 = 400;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
#[cfg(feature = "server")]
pub fn kys() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        println!();
        log::warn!("violent interrupt received, exiting immediately");
        std::process::exit(0);
    });
}
