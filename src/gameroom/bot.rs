use crate::gameplay::Engine;
use crate::gameplay::Move;

/// Capability set for an automated opponent. Implementations see a
/// read-only engine and answer with intent; the room replays every
/// answer through the validated move path, so a buggy bot can annoy
/// only itself.
///
/// The async design lets heavier bots push evaluation onto blocking
/// threads or remote services without stalling the room for humans.
#[async_trait::async_trait]
pub trait Bot: Send + Sync {
    fn name(&self) -> &'static str;
    /// An ordered move list for the current roll. Returning fewer moves
    /// than dice is allowed; the room ends the turn legally either way.
    async fn choose(&mut self, view: &Engine) -> Vec<Move>;
    /// Answer a pending double: true takes, false drops.
    async fn take_double(&mut self, view: &Engine) -> bool;
}

/// The bot registry: id to implementation.
pub fn hire(name: &str) -> Option<Box<dyn Bot>> {
    match name {
        "pigeon" => Some(Box::new(super::Pigeon)),
        _ => None,
    }
}
