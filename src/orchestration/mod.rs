pub mod replay;

pub use replay::{ReplayError, ReplaySummary, Replayer, TickErrorPolicy};
