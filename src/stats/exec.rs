use super::output::{
    output_commits, output_contributor, output_contributors, output_json, output_ndjson, output_table,
};
use super::{NdjsonSink, StatsEngine};
use crate::cli::CommonArgs;
use crate::progress::ProgressReporter;
use anyhow::Context;
use std::time::Instant;

pub async fn stats(common: CommonArgs, json: bool, ndjson: bool, events: bool) -> anyhow::Result<()> {
    let repo = common.repo_path()?;
    let engine = StatsEngine::from_config(common.config());
    let started = Instant::now();

    // Keep progress bars out of machine-readable output
    let report = if events {
        engine.run(&repo, &NdjsonSink).await
    } else if json || ndjson {
        engine.run(&repo, &()).await
    } else {
        engine.run(&repo, &ProgressReporter::new()).await
    }
    .with_context(|| format!("Failed to compute stats for {}", repo.display()))?;

    let elapsed = started.elapsed();
    tracing::info!("stats computed in {}", humantime::format_duration(elapsed));

    if events {
        // AllStats already carried the report
        return Ok(());
    }
    if json {
        output_json(&report, &repo)?;
    } else if ndjson {
        output_ndjson(&report.contributors)?;
    } else {
        output_table(&report, elapsed)?;
    }

    Ok(())
}

pub async fn contributors(common: CommonArgs, json: bool) -> anyhow::Result<()> {
    let repo = common.repo_path()?;
    let engine = StatsEngine::from_config(common.config());

    let names = engine
        .discover_contributors(&repo)
        .await
        .context("Failed to list contributors")?;

    output_contributors(&names, json)
}

pub async fn commits(common: CommonArgs, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let repo = common.repo_path()?;
    let engine = StatsEngine::from_config(common.config());

    let series = engine
        .commit_series(&repo)
        .await
        .context("Failed to compute commit series")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&series)?);
    } else if ndjson {
        for bucket in &series.commits_per_day {
            println!("{}", serde_json::to_string(bucket)?);
        }
    } else {
        output_commits(&series)?;
    }

    Ok(())
}

pub async fn contributor(common: CommonArgs, name: &str, json: bool) -> anyhow::Result<()> {
    let repo = common.repo_path()?;
    let engine = StatsEngine::from_config(common.config());

    let record = engine
        .contributor(&repo, name)
        .await
        .with_context(|| format!("Failed to compute stats for contributor {name:?}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        output_contributor(&record)?;
    }

    Ok(())
}
