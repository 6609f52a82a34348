//! In-memory [`CommandRunner`] for unit tests.

use crate::error::CommandError;
use crate::git::CommandRunner;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

enum Canned {
    Output(Vec<u8>),
    Fail,
    Panic,
}

/// Answers queries from a table keyed by argv. Unknown queries fail like a
/// git invocation exiting with code 128.
#[derive(Default)]
pub struct FakeRunner {
    answers: HashMap<Vec<String>, Canned>,
    delay: Option<Duration>,
    calls: Mutex<Vec<Vec<String>>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, args: Vec<String>, output: &str) -> Self {
        self.answers.insert(args, Canned::Output(output.as_bytes().to_vec()));
        self
    }

    pub fn fail(mut self, args: Vec<String>) -> Self {
        self.answers.insert(args, Canned::Fail);
        self
    }

    pub fn panic_on(mut self, args: Vec<String>) -> Self {
        self.answers.insert(args, Canned::Panic);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Highest number of queries that were running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, _repo: &Path, args: &[String]) -> Result<Vec<u8>, CommandError> {
        self.calls.lock().unwrap().push(args.to_vec());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let joined = args.join(" ");
        match self.answers.get(args) {
            Some(Canned::Output(bytes)) if bytes.is_empty() => Err(CommandError::EmptyOutput { args: joined }),
            Some(Canned::Output(bytes)) => Ok(bytes.clone()),
            Some(Canned::Panic) => panic!("fake runner told to panic on `{joined}`"),
            Some(Canned::Fail) | None => Err(CommandError::Failed {
                args: joined,
                code: Some(128),
                output: "fatal: canned failure".to_string(),
            }),
        }
    }
}
