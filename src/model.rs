use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 1;

/// Format of every date git is asked to print (`--date=short`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` date, rejecting anything that is not exactly ten
/// characters long.
pub fn parse_day(input: &str) -> Option<NaiveDate> {
    if input.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub count: u32,
    pub lines_added: u64,
    pub lines_removed: u64,
}

impl DayBucket {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            count: 0,
            lines_added: 0,
            lines_removed: 0,
        }
    }

    pub fn add_lines(&mut self, added: u64, removed: u64) {
        self.lines_added += added;
        self.lines_removed += removed;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorRecord {
    pub name: String,
    pub commit_count: u32,
    pub lines_added: u64,
    pub lines_removed: u64,
    pub commits_per_day: Vec<DayBucket>,
}

impl ContributorRecord {
    /// Builds a record from per-day buckets. Totals are derived from the
    /// buckets and the buckets end up in ascending date order.
    pub fn from_buckets(name: impl Into<String>, buckets: impl IntoIterator<Item = DayBucket>) -> Self {
        let mut commits_per_day: Vec<DayBucket> = buckets.into_iter().collect();
        commits_per_day.sort_by_key(|b| b.date);

        Self {
            name: name.into(),
            commit_count: commits_per_day.iter().map(|b| b.count).sum(),
            lines_added: commits_per_day.iter().map(|b| b.lines_added).sum(),
            lines_removed: commits_per_day.iter().map(|b| b.lines_removed).sum(),
            commits_per_day,
        }
    }

    pub fn active_days(&self) -> usize {
        self.commits_per_day.len()
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.commits_per_day.first().map(|b| b.date)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.commits_per_day.last().map(|b| b.date)
    }
}

/// Repository-wide commits per day. Line fields of the buckets stay zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSeries {
    pub commits_per_day: Vec<DayBucket>,
    pub total: u32,
}

impl CommitSeries {
    pub fn from_dates(dates: BTreeMap<NaiveDate, u32>) -> Self {
        let commits_per_day: Vec<DayBucket> = dates
            .into_iter()
            .map(|(date, count)| DayBucket {
                count,
                ..DayBucket::new(date)
            })
            .collect();
        let total = commits_per_day.iter().map(|b| b.count).sum();

        Self {
            commits_per_day,
            total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorFailure {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Branch the contributors were discovered on.
    pub branch: String,
    pub commits: CommitSeries,
    pub contributors: Vec<ContributorRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ContributorFailure>,
}

impl AggregateReport {
    pub fn contributor(&self, name: &str) -> Option<&ContributorRecord> {
        self.contributors.iter().find(|c| c.name == name)
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    #[serde(flatten)]
    pub report: AggregateReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    #[test]
    fn parse_day_requires_exact_iso_form() {
        assert_eq!(parse_day("2024-01-31"), Some(day("2024-01-31")));
        assert_eq!(parse_day("2024-1-31"), None);
        assert_eq!(parse_day("2024-02-30"), None);
        assert_eq!(parse_day(" 2024-01-31"), None);
        assert_eq!(parse_day("12\t3\tfoo.c"), None);
    }

    #[test]
    fn record_totals_follow_buckets() {
        let mut late = DayBucket::new(day("2024-03-02"));
        late.count = 2;
        late.add_lines(7, 1);
        let mut early = DayBucket::new(day("2024-01-05"));
        early.count = 1;
        early.add_lines(3, 4);

        let record = ContributorRecord::from_buckets("Alice", [late, early]);

        assert_eq!(record.commit_count, 3);
        assert_eq!(record.lines_added, 10);
        assert_eq!(record.lines_removed, 5);
        assert_eq!(record.first_day(), Some(day("2024-01-05")));
        assert_eq!(record.last_day(), Some(day("2024-03-02")));
    }

    #[test]
    fn series_total_is_sum_of_buckets() {
        let dates = BTreeMap::from([(day("2024-01-02"), 1), (day("2024-01-01"), 3)]);
        let series = CommitSeries::from_dates(dates);

        assert_eq!(series.total, 4);
        assert_eq!(series.commits_per_day[0].date, day("2024-01-01"));
        assert_eq!(series.commits_per_day[0].lines_added, 0);
    }

    #[test]
    fn bucket_dates_serialize_as_iso_strings() {
        let bucket = DayBucket::new(day("2024-01-01"));
        let json = serde_json::to_value(bucket).unwrap();
        assert_eq!(json["date"], "2024-01-01");
    }
}
