pub mod engine;
pub mod events;
pub mod exec;
pub mod output;
pub mod parse;
pub mod worker;

pub use engine::StatsEngine;
pub use events::{NdjsonSink, ProgressSink, StatsEvent};
pub use parse::{parse_commit_dates, parse_contributor_list, parse_contributor_log};
pub use worker::fetch_contributor;
