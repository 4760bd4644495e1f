/// Where a game stands between actions. Drives which commands the
/// orchestrator will entertain and what clients should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No opening roll yet (players still seating).
    Waiting,
    /// Current player must roll (or offer the cube).
    Rolling,
    /// Dice are live; moves remain.
    Moving,
    /// A double offer awaits accept or decline.
    Doubling,
    /// A winner has been determined.
    Terminal,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Rolling => write!(f, "rolling"),
            Self::Moving => write!(f, "moving"),
            Self::Doubling => write!(f, "doubling"),
            Self::Terminal => write!(f, "terminal"),
        }
    }
}
