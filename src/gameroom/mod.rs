mod bot;
mod clock;
mod command;
mod event;
mod players;
mod room;
mod session;
mod snapshot;

pub use bot::*;
pub use clock::*;
pub use command::*;
pub use event::*;
pub use players::*;
pub use room::*;
pub use session::*;
pub use snapshot::*;
