pub mod live_scoring;

pub use live_scoring::{CommandOutcome, LiveScoringService, ScoringCommand};
