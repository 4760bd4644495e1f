/// Typed refusal reasons returned across the engine boundary. These are
/// reasoned outcomes, not errors: session state is unchanged and the
/// caller alone hears about them. True invariant violations (checker
/// conservation) panic instead and quarantine the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Rejection {
    NotYourTurn,
    NoRollYet,
    AlreadyRolled,
    BarEntryRequired,
    DestinationBlocked,
    DieNotAvailable,
    NotAllInHome,
    WouldSkipUsableDie,
    GameAlreadyOver,
    GameNotStarted,
    IllegalMove,
    NothingToUndo,
    CrawfordNoDouble,
    DoublePending,
    NoDoublePending,
    NotBeforeRoll,
    CubeUnavailable,
    CubeMaxed,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotYourTurn => write!(f, "it is not your turn"),
            Self::NoRollYet => write!(f, "roll the dice first"),
            Self::AlreadyRolled => write!(f, "dice already rolled this turn"),
            Self::BarEntryRequired => write!(f, "checkers on the bar must enter first"),
            Self::DestinationBlocked => write!(f, "destination point is blocked"),
            Self::DieNotAvailable => write!(f, "that die is not available"),
            Self::NotAllInHome => write!(f, "bear off requires every checker home"),
            Self::WouldSkipUsableDie => write!(f, "a sequence using more dice exists"),
            Self::GameAlreadyOver => write!(f, "the game is over"),
            Self::GameNotStarted => write!(f, "the game has not started"),
            Self::IllegalMove => write!(f, "not a legal move"),
            Self::NothingToUndo => write!(f, "no move to undo this turn"),
            Self::CrawfordNoDouble => write!(f, "no doubling in the Crawford game"),
            Self::DoublePending => write!(f, "a double offer is pending"),
            Self::NoDoublePending => write!(f, "no double offer is pending"),
            Self::NotBeforeRoll => write!(f, "doubles are offered before rolling"),
            Self::CubeUnavailable => write!(f, "the cube is not available to you"),
            Self::CubeMaxed => write!(f, "the cube is already at its maximum"),
        }
    }
}

impl std::error::Error for Rejection {}
