mod pigeon;

pub use pigeon::*;
