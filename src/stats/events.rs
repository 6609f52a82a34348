//! Progress notifications emitted while a stats run advances.

use crate::model::{AggregateReport, CommitSeries, ContributorRecord};
use serde::Serialize;
use std::io::{self, Write};

/// A milestone of a run, borrowing its payload from the engine.
///
/// Within a run the order is: `Contributors`, `Commits`, any number of
/// `ContributorStats`, then `AllStats` exactly once.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "event", content = "payload")]
pub enum StatsEvent<'a> {
    Contributors(&'a [String]),
    Commits(&'a CommitSeries),
    ContributorStats(&'a ContributorRecord),
    AllStats(&'a AggregateReport),
}

impl StatsEvent<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            StatsEvent::Contributors(_) => "Contributors",
            StatsEvent::Commits(_) => "Commits",
            StatsEvent::ContributorStats(_) => "ContributorStats",
            StatsEvent::AllStats(_) => "AllStats",
        }
    }
}

/// Receiver of progress notifications. Calls are fire-and-forget and should
/// return quickly.
pub trait ProgressSink: Send + Sync {
    fn notify(&self, event: StatsEvent<'_>);
}

/// Discards every notification.
impl ProgressSink for () {
    fn notify(&self, _event: StatsEvent<'_>) {}
}

impl<F> ProgressSink for F
where
    F: Fn(StatsEvent<'_>) + Send + Sync,
{
    fn notify(&self, event: StatsEvent<'_>) {
        self(event)
    }
}

/// Writes every event as one JSON line to stdout.
#[derive(Debug, Default)]
pub struct NdjsonSink;

impl ProgressSink for NdjsonSink {
    fn notify(&self, event: StatsEvent<'_>) {
        emit_line(&mut std::io::stdout().lock(), event);
    }
}

/// Writes `event` as one JSON line. A reader that went away (`| head`) is
/// not an error; the run carries on without output.
fn emit_line<W: Write>(out: &mut W, event: StatsEvent<'_>) {
    let written = serde_json::to_writer(&mut *out, &event)
        .map_err(io::Error::from)
        .and_then(|()| writeln!(out))
        .and_then(|()| out.flush());
    match written {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
        Err(e) => tracing::warn!("failed to write {} event: {e}", event.name()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_day;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[test]
    fn events_serialize_with_name_and_payload() {
        let names = vec!["Alice".to_string(), "Bob".to_string()];
        let json = serde_json::to_value(StatsEvent::Contributors(&names)).unwrap();
        assert_eq!(json, serde_json::json!({"event": "Contributors", "payload": ["Alice", "Bob"]}));

        let series = crate::model::CommitSeries::from_dates(
            [(parse_day("2024-01-01").unwrap(), 2)].into_iter().collect(),
        );
        let json = serde_json::to_value(StatsEvent::Commits(&series)).unwrap();
        assert_eq!(json["event"], StatsEvent::Commits(&series).name());
        assert_eq!(json["payload"]["total"], 2);
    }

    #[test]
    fn closures_are_sinks() {
        let seen = Mutex::new(Vec::new());
        let sink = |event: StatsEvent<'_>| seen.lock().unwrap().push(event.name());

        let names: Vec<String> = Vec::new();
        sink.notify(StatsEvent::Contributors(&names));
        ().notify(StatsEvent::Contributors(&names));

        assert_eq!(*seen.lock().unwrap(), vec!["Contributors"]);
    }

    #[test]
    fn ndjson_lines_end_with_newline() {
        let names = vec!["Alice".to_string()];
        let mut out = Vec::new();
        emit_line(&mut out, StatsEvent::Contributors(&names));
        emit_line(&mut out, StatsEvent::Contributors(&names));

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], r#"{"event":"Contributors","payload":["Alice"]}"#);
    }

    /// Accepts `budget` bytes, then behaves like a pipe whose reader exited.
    struct ClosedPipe {
        budget: usize,
    }

    impl Write for ClosedPipe {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::ErrorKind::BrokenPipe.into());
            }
            let n = buf.len().min(self.budget);
            self.budget -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn closed_reader_does_not_stop_the_run() {
        let names = vec!["Alice".to_string(), "Bob".to_string()];
        let mut pipe = ClosedPipe { budget: 8 };

        for _ in 0..3 {
            emit_line(&mut pipe, StatsEvent::Contributors(&names));
        }
        assert_eq!(pipe.budget, 0);
    }
}
