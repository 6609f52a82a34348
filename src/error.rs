use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GitstatsError>;

/// Errors that abort a whole stats run.
#[derive(Error, Debug)]
pub enum GitstatsError {
    #[error("Repository path does not exist: {0}")]
    RepositoryNotFound(PathBuf),
    #[error("Repository path is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Failed to resolve default branch: {0}")]
    DefaultBranch(#[source] CommandError),
    #[error("Failed to list contributors: {0}")]
    Contributors(#[source] CommandError),
    #[error("Failed to read commit history: {0}")]
    CommitHistory(#[source] CommandError),
    #[error("Contributor {0:?} has no recorded commits")]
    UnknownContributor(String),
    #[error(transparent)]
    Worker(#[from] WorkerError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure of a single git invocation.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("failed to spawn `git {args}`: {source}")]
    Spawn {
        args: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`git {args}` exited with {}: {}", exit_label(.code), .output.trim())]
    Failed {
        args: String,
        code: Option<i32>,
        output: String,
    },
    #[error("no output from `git {args}`")]
    EmptyOutput { args: String },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("code {c}"),
        None => "signal".to_string(),
    }
}

/// Which of a contributor's two queries failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerStage {
    CommitLog,
    LineStats,
}

impl std::fmt::Display for WorkerStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerStage::CommitLog => f.write_str("commit log"),
            WorkerStage::LineStats => f.write_str("line stats"),
        }
    }
}

/// Per-contributor failure. Never aborts the run.
#[derive(Error, Debug)]
#[error("{stage} query for {contributor:?} failed: {source}")]
pub struct WorkerError {
    pub contributor: String,
    pub stage: WorkerStage,
    #[source]
    pub source: CommandError,
}
