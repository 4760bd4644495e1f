mod client;
mod handle;
mod identity;
mod parlor;
mod server;

pub use client::*;
pub use handle::*;
pub use identity::*;
pub use parlor::*;
pub use server::*;
