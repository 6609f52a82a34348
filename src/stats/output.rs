use crate::model::{AggregateReport, CommitSeries, ContributorRecord, StatsOutput, SCHEMA_VERSION};
use anyhow::Result;
use chrono::Utc;
use console::style;
use std::path::Path;
use std::time::Duration;

const TABLE_ROWS: usize = 50;

pub fn output_json(report: &AggregateReport, repo: &Path) -> Result<()> {
    let output = StatsOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: repo.to_string_lossy().to_string(),
        report: report.clone(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_ndjson(records: &[ContributorRecord]) -> Result<()> {
    for record in records {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}

pub fn output_table(report: &AggregateReport, elapsed: Duration) -> Result<()> {
    println!(
        "{:<32} {:>8} {:>10} {:>10} {:>6} {:>11} {:>11}",
        style("Contributor").bold(),
        style("Commits").bold(),
        style("Added").bold(),
        style("Removed").bold(),
        style("Days").bold(),
        style("First").bold(),
        style("Last").bold()
    );
    println!("{}", "─".repeat(94));

    for c in report.contributors.iter().take(TABLE_ROWS) {
        println!(
            "{:<32} {:>8} {:>10} {:>10} {:>6} {:>11} {:>11}",
            truncate(&c.name, 32),
            c.commit_count,
            style(format!("+{}", c.lines_added)).green(),
            style(format!("-{}", c.lines_removed)).red(),
            c.active_days(),
            c.first_day().map(|d| d.to_string()).unwrap_or_default(),
            c.last_day().map(|d| d.to_string()).unwrap_or_default()
        );
    }
    if report.contributors.len() > TABLE_ROWS {
        println!("\n... and {} more contributors", report.contributors.len() - TABLE_ROWS);
    }

    println!(
        "\n{} commits over {} days by {} contributors (computed in {})",
        style(report.commits.total).bold(),
        report.commits.commits_per_day.len(),
        report.contributors.len(),
        humantime::format_duration(round_to_millis(elapsed))
    );

    if !report.failures.is_empty() {
        println!("\n{}", style("Contributors without stats").yellow().bold());
        for failure in &report.failures {
            println!("  {} {}", style(&failure.name).yellow(), failure.reason);
        }
    }

    Ok(())
}

pub fn output_contributors(names: &[String], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(names)?);
        return Ok(());
    }
    for (rank, name) in names.iter().enumerate() {
        println!("{:>4}. {}", rank + 1, name);
    }
    Ok(())
}

pub fn output_commits(series: &CommitSeries) -> Result<()> {
    if series.commits_per_day.is_empty() {
        println!("No data to display");
        return Ok(());
    }

    let max = series.commits_per_day.iter().map(|b| b.count).max().unwrap_or(1).max(1);

    println!("{}", style("Commits per day").bold());
    println!("{}", "─".repeat(50));
    for bucket in &series.commits_per_day {
        let width = ((bucket.count as f64 / max as f64) * 30.0).ceil() as usize;
        println!(
            "{} {:>5} {}",
            bucket.date,
            bucket.count,
            style("█".repeat(width)).green()
        );
    }
    println!("\nTotal: {}", style(series.total).bold());
    Ok(())
}

pub fn output_contributor(record: &ContributorRecord) -> Result<()> {
    println!("{}", style(&record.name).bold());
    println!(
        "  {} commits, {} / {} lines over {} days",
        record.commit_count,
        style(format!("+{}", record.lines_added)).green(),
        style(format!("-{}", record.lines_removed)).red(),
        record.active_days()
    );
    println!("{}", "─".repeat(44));
    for bucket in &record.commits_per_day {
        println!(
            "{} {:>5} {:>10} {:>10}",
            bucket.date,
            bucket.count,
            format!("+{}", bucket.lines_added),
            format!("-{}", bucket.lines_removed)
        );
    }
    Ok(())
}

fn truncate(name: &str, width: usize) -> String {
    if name.chars().count() <= width {
        return name.to_string();
    }
    let mut short: String = name.chars().take(width - 1).collect();
    short.push('…');
    short
}

fn round_to_millis(elapsed: Duration) -> Duration {
    Duration::from_millis(elapsed.as_millis() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_names_are_shortened() {
        assert_eq!(truncate("Alice", 32), "Alice");
        let long = "A".repeat(40);
        let short = truncate(&long, 32);
        assert_eq!(short.chars().count(), 32);
        assert!(short.ends_with('…'));
    }

    #[test]
    fn elapsed_time_drops_sub_millisecond_noise() {
        let elapsed = Duration::from_nanos(1_234_567_891);
        assert_eq!(humantime::format_duration(round_to_millis(elapsed)).to_string(), "1s 234ms");
    }
}
