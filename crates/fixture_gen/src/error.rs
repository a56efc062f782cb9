//! Error types for fixture generation.
//!
//! Every variant aborts the run. Downstream rows depend on complete upstream
//! tiers, so there is no skip-and-continue mode and nothing is retried.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixtureError {
    /// A dependent tier was asked for rows before its parent tier produced any
    #[error("cannot generate {tier}: {requires} is empty")]
    PrerequisiteMissing {
        tier: &'static str,
        requires: &'static str,
    },

    /// The likes selection hit its iteration cap before reaching the target
    #[error(
        "cannot produce {requested} unique likes: only {produced} found in a pool of {pool} codes across {members} members"
    )]
    InfeasibleUniquenessTarget {
        requested: u64,
        produced: u64,
        pool: u64,
        members: u64,
    },

    /// The plan cannot produce valid references
    #[error("invalid fixture plan: {0}")]
    InvalidPlan(String),

    /// The sink failed to accept rows
    #[error("sink error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FixtureError>;
