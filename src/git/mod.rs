pub mod query;
pub mod runner;

pub use runner::{CommandRunner, GitCli};
