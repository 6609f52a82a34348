use crate::stats::{ProgressSink, StatsEvent};
use indicatif::{ProgressBar, ProgressStyle};

/// Terminal progress bar driven by stats events. Draws on stderr and hides
/// itself when stderr is not a terminal.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message("Discovering contributors...");
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { bar }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn length(&self) -> Option<u64> {
        self.bar.length()
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ProgressReporter {
    fn notify(&self, event: StatsEvent<'_>) {
        match event {
            StatsEvent::Contributors(names) => {
                self.bar.set_length(names.len() as u64);
                self.bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                self.bar.set_message("Reading commit history...");
            }
            StatsEvent::Commits(series) => {
                self.bar.set_message(format!("{} commits, computing contributor stats...", series.total));
            }
            StatsEvent::ContributorStats(record) => {
                self.bar.inc(1);
                self.bar.set_message(record.name.clone());
            }
            StatsEvent::AllStats(_) => {
                self.bar.finish_and_clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CommitSeries, ContributorRecord};

    #[test]
    fn bar_tracks_finished_contributors() {
        let reporter = ProgressReporter::hidden();
        let names = vec!["Alice".to_string(), "Bob".to_string()];

        reporter.notify(StatsEvent::Contributors(&names));
        reporter.notify(StatsEvent::Commits(&CommitSeries::default()));
        reporter.notify(StatsEvent::ContributorStats(&ContributorRecord::from_buckets("Bob", [])));

        assert_eq!(reporter.length(), Some(2));
        assert_eq!(reporter.position(), 1);
    }
}
