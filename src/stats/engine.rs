use super::events::{ProgressSink, StatsEvent};
use super::parse::{parse_commit_dates, parse_contributor_list};
use super::worker::fetch_contributor;
use crate::config::StatsConfig;
use crate::error::{CommandError, GitstatsError, Result, WorkerError, WorkerStage};
use crate::git::{query, CommandRunner, GitCli};
use crate::model::{AggregateReport, CommitSeries, ContributorFailure, ContributorRecord};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// Drives a full stats run: discovery, the repository-wide commit series,
/// then one concurrent worker per contributor.
pub struct StatsEngine<R> {
    runner: Arc<R>,
    config: StatsConfig,
}

impl StatsEngine<GitCli> {
    pub fn from_config(config: StatsConfig) -> Self {
        let runner = GitCli::with_binary(config.git_binary.clone());
        Self::new(runner, config)
    }
}

impl<R> StatsEngine<R>
where
    R: CommandRunner + 'static,
{
    pub fn new(runner: R, config: StatsConfig) -> Self {
        Self {
            runner: Arc::new(runner),
            config,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Computes the full report for `repo`, notifying `sink` at every
    /// milestone. Only validation, discovery and the commit series can fail;
    /// contributors whose queries fail end up in [`AggregateReport::failures`].
    pub async fn run(&self, repo: &Path, sink: &dyn ProgressSink) -> Result<AggregateReport> {
        validate_repository(repo).await?;

        let (branch, contributors) = self.discover(repo).await?;
        tracing::info!(%branch, "discovered {} contributors", contributors.len());
        sink.notify(StatsEvent::Contributors(&contributors));

        let commits = self.series(repo).await?;
        tracing::info!(total = commits.total, days = commits.commits_per_day.len(), "commit series ready");
        sink.notify(StatsEvent::Commits(&commits));

        let (records, failures) = self.fan_out(repo, &contributors, sink).await;
        tracing::info!(
            succeeded = records.len(),
            failed = failures.len(),
            "all contributor stats computed"
        );

        let report = AggregateReport {
            branch,
            commits,
            contributors: records,
            failures,
        };
        sink.notify(StatsEvent::AllStats(&report));
        Ok(report)
    }

    /// Branch used for contributor discovery: the configured one, or the
    /// remote default branch.
    pub async fn resolve_branch(&self, repo: &Path) -> Result<String> {
        if let Some(branch) = &self.config.branch {
            return Ok(branch.clone());
        }
        let out = self
            .runner
            .run(repo, &query::default_branch())
            .await
            .map_err(GitstatsError::DefaultBranch)?;
        Ok(String::from_utf8_lossy(&out).trim().to_string())
    }

    pub async fn discover_contributors(&self, repo: &Path) -> Result<Vec<String>> {
        validate_repository(repo).await?;
        let (_, contributors) = self.discover(repo).await?;
        Ok(contributors)
    }

    pub async fn commit_series(&self, repo: &Path) -> Result<CommitSeries> {
        validate_repository(repo).await?;
        self.series(repo).await
    }

    /// Stats for a single contributor, outside of a full run.
    pub async fn contributor(&self, repo: &Path, name: &str) -> Result<ContributorRecord> {
        validate_repository(repo).await?;
        fetch_contributor(self.runner.as_ref(), repo, name.trim())
            .await
            .map_err(|e| match e {
                WorkerError {
                    stage: WorkerStage::CommitLog,
                    source: CommandError::EmptyOutput { .. },
                    contributor,
                } => GitstatsError::UnknownContributor(contributor),
                other => other.into(),
            })
    }

    /// The branch discovery ran against, with its contributors.
    async fn discover(&self, repo: &Path) -> Result<(String, Vec<String>)> {
        let branch = self.resolve_branch(repo).await?;
        let out = self
            .runner
            .run(repo, &query::shortlog(&branch))
            .await
            .map_err(GitstatsError::Contributors)?;
        Ok((branch, parse_contributor_list(&String::from_utf8_lossy(&out))))
    }

    async fn series(&self, repo: &Path) -> Result<CommitSeries> {
        let out = self
            .runner
            .run(repo, &query::commit_dates())
            .await
            .map_err(GitstatsError::CommitHistory)?;
        Ok(CommitSeries::from_dates(parse_commit_dates(&String::from_utf8_lossy(&out))))
    }

    /// Spawns a worker per contributor and collects their outcomes as they
    /// arrive. Results come back in discovery order.
    async fn fan_out(
        &self,
        repo: &Path,
        contributors: &[String],
        sink: &dyn ProgressSink,
    ) -> (Vec<ContributorRecord>, Vec<ContributorFailure>) {
        let limit = self.config.max_concurrency.map(|n| Arc::new(Semaphore::new(n)));
        let (tx, mut rx) = mpsc::unbounded_channel();

        for (index, name) in contributors.iter().enumerate() {
            let tx = tx.clone();
            let runner = Arc::clone(&self.runner);
            let limit = limit.clone();
            let repo = repo.to_path_buf();
            let name = name.clone();

            tokio::spawn(async move {
                let _permit = match limit {
                    Some(sem) => sem.acquire_owned().await.ok(),
                    None => None,
                };
                let outcome = fetch_contributor(runner.as_ref(), &repo, &name).await;
                // receiver lives until every sender is gone
                let _ = tx.send((index, outcome));
            });
        }
        drop(tx);

        let mut reported = vec![false; contributors.len()];
        let mut records = Vec::with_capacity(contributors.len());
        let mut failures = Vec::new();

        while let Some((index, outcome)) = rx.recv().await {
            reported[index] = true;
            match outcome {
                Ok(record) => {
                    sink.notify(StatsEvent::ContributorStats(&record));
                    records.push((index, record));
                }
                Err(e) => {
                    tracing::warn!(contributor = %e.contributor, "skipping contributor: {e}");
                    failures.push((
                        index,
                        ContributorFailure {
                            name: e.contributor,
                            reason: format!("{} query failed: {}", e.stage, e.source),
                        },
                    ));
                }
            }
        }

        for (index, name) in contributors.iter().enumerate() {
            if !reported[index] {
                tracing::warn!(contributor = %name, "worker ended without a result");
                failures.push((
                    index,
                    ContributorFailure {
                        name: name.clone(),
                        reason: "worker terminated unexpectedly".to_string(),
                    },
                ));
            }
        }

        records.sort_by_key(|(index, _)| *index);
        failures.sort_by_key(|(index, _)| *index);
        (
            records.into_iter().map(|(_, r)| r).collect(),
            failures.into_iter().map(|(_, f)| f).collect(),
        )
    }
}

async fn validate_repository(repo: &Path) -> Result<()> {
    match tokio::fs::metadata(repo).await {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(GitstatsError::NotADirectory(repo.to_path_buf())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(GitstatsError::RepositoryNotFound(repo.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}
