mod action;
mod announce;

pub use action::{
    Prompt, SeedAction, SeedDecision, SeedEngine, SeedOutcome, SeedReport, SeedTarget,
    CONNECT_DECLINED, SEEDING_DECLINED,
};
pub use announce::{AnnounceTarget, ReannounceOutcome, ReannounceReport, ReannounceTask};
