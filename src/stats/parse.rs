//! Parsers for the textual output of the git queries in [`crate::git::query`].
//!
//! Every parser is total: lines that do not have the expected shape are
//! skipped, never reported.

use crate::model::{parse_day, ContributorRecord, DayBucket};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

/// Contributor names from `git shortlog -sn`, in the order git printed them.
///
/// A leading `<count>\t` is dropped when present, so plain one-name-per-line
/// input parses too.
pub fn parse_contributor_list(raw: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.lines()
        .map(|line| match line.split_once('\t') {
            Some((_, name)) => name.trim(),
            None => line.trim(),
        })
        .filter(|name| !name.is_empty())
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect()
}

/// Commits per day from a log printing one date per commit.
pub fn parse_commit_dates(raw: &str) -> BTreeMap<NaiveDate, u32> {
    let mut days = BTreeMap::new();
    for date in raw.lines().filter_map(|line| parse_day(line.trim())) {
        *days.entry(date).or_insert(0) += 1;
    }
    days
}

/// Merges a contributor's `<hash> <date>` log with their `--numstat` log.
///
/// The hash/date log decides which days exist: line changes dated on a day
/// without a counted commit are discarded.
pub fn parse_contributor_log(commit_log: &str, numstat: &str, contributor: &str) -> ContributorRecord {
    let mut days: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();

    for line in commit_log.lines() {
        let mut fields = line.split_whitespace();
        let (Some(_hash), Some(date)) = (fields.next(), fields.next()) else {
            continue;
        };
        if let Some(date) = parse_day(date) {
            days.entry(date).or_insert_with(|| DayBucket::new(date)).count += 1;
        }
    }

    for (date, added, removed) in numstat_lines(numstat) {
        if let Some(bucket) = days.get_mut(&date) {
            bucket.add_lines(added, removed);
        }
    }

    ContributorRecord::from_buckets(contributor, days.into_values())
}

/// Yields `(date, added, removed)` for every file line of every numstat block.
fn numstat_lines(raw: &str) -> impl Iterator<Item = (NaiveDate, u64, u64)> + '_ {
    let mut current: Option<NaiveDate> = None;

    raw.lines().filter_map(move |line| {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            current = None;
            return None;
        }
        if let Some(date) = parse_day(trimmed) {
            current = Some(date);
            return None;
        }

        let date = current?;
        let mut fields = trimmed.split_whitespace();
        let (Some(added), Some(removed)) = (fields.next(), fields.next()) else {
            return None;
        };
        // binary files report `-`
        Some((date, added.parse().unwrap_or(0), removed.parse().unwrap_or(0)))
    })
}
