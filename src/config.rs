use std::path::PathBuf;

/// Knobs for a stats run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsConfig {
    /// Executable invoked for every query.
    pub git_binary: PathBuf,
    /// Branch for contributor discovery. When unset the remote default branch
    /// (`origin/HEAD`) is resolved.
    pub branch: Option<String>,
    /// Upper bound on contributors processed at once; `None` is unbounded.
    pub max_concurrency: Option<usize>,
}

impl StatsConfig {
    pub fn new() -> Self {
        Self {
            git_binary: PathBuf::from("git"),
            branch: None,
            max_concurrency: Some(default_concurrency()),
        }
    }

    pub fn with_git_binary(mut self, git_binary: impl Into<PathBuf>) -> Self {
        self.git_binary = git_binary.into();
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// `0` removes the cap.
    pub fn with_max_concurrency(mut self, jobs: usize) -> Self {
        self.max_concurrency = (jobs > 0).then_some(jobs);
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.max_concurrency = None;
        self
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub fn default_concurrency() -> usize {
    num_cpus::get().max(1) * 2
}
