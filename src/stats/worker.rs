use super::parse::parse_contributor_log;
use crate::error::{CommandError, WorkerError, WorkerStage};
use crate::git::{query, CommandRunner};
use crate::model::ContributorRecord;
use std::path::Path;

/// Computes one contributor's record from their commit log and numstat log.
pub async fn fetch_contributor<R>(
    runner: &R,
    repo: &Path,
    contributor: &str,
) -> Result<ContributorRecord, WorkerError>
where
    R: CommandRunner + ?Sized,
{
    let fail = |stage: WorkerStage| {
        move |source: CommandError| WorkerError {
            contributor: contributor.to_string(),
            stage,
            source,
        }
    };

    let commit_log = runner
        .run(repo, &query::author_commits(contributor))
        .await
        .map_err(fail(WorkerStage::CommitLog))?;

    let numstat = runner
        .run(repo, &query::author_numstat(contributor))
        .await
        .map_err(fail(WorkerStage::LineStats))?;

    let record = parse_contributor_log(
        &String::from_utf8_lossy(&commit_log),
        &String::from_utf8_lossy(&numstat),
        contributor,
    );

    tracing::debug!(
        contributor,
        commits = record.commit_count,
        added = record.lines_added,
        removed = record.lines_removed,
        "contributor stats parsed"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRunner;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn merges_both_queries() {
        let runner = FakeRunner::new()
            .respond(query::author_commits("Alice"), "h1 2024-01-01\nh2 2024-01-01\n")
            .respond(
                query::author_numstat("Alice"),
                "2024-01-01\n3\t1\ta.rs\n\n2024-01-01\n2\t0\tb.rs\n",
            );

        let record = fetch_contributor(&runner, Path::new("/repo"), "Alice").await.unwrap();

        assert_eq!(record.commit_count, 2);
        assert_eq!((record.lines_added, record.lines_removed), (5, 1));
        assert_eq!(runner.calls().len(), 2);
    }

    #[tokio::test]
    async fn failing_commit_log_names_the_stage() {
        let runner = FakeRunner::new().respond(query::author_numstat("Alice"), "2024-01-01\n");

        let err = fetch_contributor(&runner, Path::new("/repo"), "Alice").await.unwrap_err();

        assert_eq!(err.contributor, "Alice");
        assert_eq!(err.stage, WorkerStage::CommitLog);
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn failing_numstat_names_the_stage() {
        let runner = FakeRunner::new().respond(query::author_commits("Bob"), "h1 2024-01-02\n");

        let err = fetch_contributor(&runner, Path::new("/repo"), "Bob").await.unwrap_err();

        assert_eq!(err.stage, WorkerStage::LineStats);
        assert!(err.to_string().contains("line stats"));
    }
}
