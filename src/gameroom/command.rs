use crate::Die;

/// Inbound wire actions. Each arrives bound to a session and the
/// connection that sent it; the room validates everything else.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Take a seat, reconnect to one, or spectate when the table is full.
    Join,
    /// Roll the dice for the current turn.
    Roll,
    /// Move a checker. `from = 0` enters from the bar; `to = 0` or `25`
    /// bears off. The room resolves the pair against the legal set.
    Play { from: usize, to: usize },
    /// End the turn. Rejected while a fuller dice sequence exists.
    End,
    /// Revert the latest move of this turn.
    Undo,
    OfferDouble,
    AcceptDouble,
    DeclineDouble,
    /// Concede the game at current stakes.
    Abandon,
    /// Detach this connection from the session.
    Leave,
    /// Table talk, kept in a small ring and never persisted.
    Chat { text: String },
    /// Enter analysis mode: the clock stops and this seat may drive
    /// both sides of the position.
    Analyze,
    /// Pin the next roll. Test and analysis surface.
    Reseed { d1: Die, d2: Die },
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Join => write!(f, "join"),
            Self::Roll => write!(f, "roll"),
            Self::Play { from, to } => write!(f, "play {}/{}", from, to),
            Self::End => write!(f, "end"),
            Self::Undo => write!(f, "undo"),
            Self::OfferDouble => write!(f, "double"),
            Self::AcceptDouble => write!(f, "take"),
            Self::DeclineDouble => write!(f, "drop"),
            Self::Abandon => write!(f, "abandon"),
            Self::Leave => write!(f, "leave"),
            Self::Chat { .. } => write!(f, "chat"),
            Self::Analyze => write!(f, "analyze"),
            Self::Reseed { d1, d2 } => write!(f, "reseed {}-{}", d1, d2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_round_trip() {
        let json = r#"{"type":"play","from":24,"to":18}"#;
        let command: Command = serde_json::from_str(json).expect("parse");
        assert_eq!(command, Command::Play { from: 24, to: 18 });
        let back = serde_json::to_string(&command).expect("serialize");
        assert_eq!(back, json);
    }

    #[test]
    fn bare_commands_parse() {
        for json in [
            r#"{"type":"join"}"#,
            r#"{"type":"roll"}"#,
            r#"{"type":"end"}"#,
            r#"{"type":"undo"}"#,
            r#"{"type":"offer_double"}"#,
            r#"{"type":"accept_double"}"#,
            r#"{"type":"decline_double"}"#,
            r#"{"type":"abandon"}"#,
            r#"{"type":"leave"}"#,
        ] {
            assert!(serde_json::from_str::<Command>(json).is_ok(), "{}", json);
        }
    }

    #[test]
    fn garbage_is_refused() {
        assert!(serde_json::from_str::<Command>(r#"{"type":"cheat"}"#).is_err());
        assert!(serde_json::from_str::<Command>("not even json").is_err());
    }
}
