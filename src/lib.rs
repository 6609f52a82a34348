//! Contribution statistics for git repositories.
//!
//! The [`stats::StatsEngine`] asks `git` for the contributor list and the
//! commit history, then computes every contributor's per-day commits and line
//! changes concurrently, reporting progress through a [`stats::ProgressSink`].

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod model;
pub mod progress;
pub mod stats;

#[cfg(test)]
pub(crate) mod testing;

pub use config::StatsConfig;
pub use error::{CommandError, GitstatsError, Result, WorkerError};
pub use model::{AggregateReport, CommitSeries, ContributorFailure, ContributorRecord, DayBucket};
pub use stats::{ProgressSink, StatsEngine, StatsEvent};
