// src/batch/driver.rs
// =============================================================================
// Runs the batch: one URL at a time, in file order.
//
// For each URL:
// 1. Report progress ([i/N] Processing: ...)
// 2. Ask the Notifier to submit it
// 3. Count the result and report success or failure
// 4. Pause before the next URL (but not after the last one)
//
// Then print the summary.
//
// There is no concurrency on purpose: the API's rate limit is the real
// bottleneck, so sending requests in parallel would only get them rejected.
//
// Rust concepts:
// - Generics with trait bounds: works with any Notifier, Sleeper, Reporter
// - A tiny state machine: NotStarted -> Running -> Completed
// =============================================================================

use super::{BatchReport, FixedIntervalGate, Reporter, Sleeper};
use crate::notify::Notifier;
use anyhow::{bail, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    NotStarted,
    Running,
    Completed,
}

pub struct BatchDriver<'a, N, S, R> {
    notifier: &'a N,
    gate: FixedIntervalGate<S>,
    reporter: &'a mut R,
    state: BatchState,
}

impl<'a, N, S, R> BatchDriver<'a, N, S, R>
where
    N: Notifier,
    S: Sleeper,
    R: Reporter,
{
    pub fn new(notifier: &'a N, gate: FixedIntervalGate<S>, reporter: &'a mut R) -> Self {
        Self {
            notifier,
            gate,
            reporter,
            state: BatchState::NotStarted,
        }
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> BatchState {
        self.state
    }

    // Submits every URL and returns the per-URL outcomes plus totals
    //
    // Per-URL failures never stop the loop. The only errors returned are
    // a second call to run() and failures writing to the terminal.
    pub async fn run(&mut self, urls: &[String]) -> Result<BatchReport> {
        // A driver runs exactly once
        if self.state != BatchState::NotStarted {
            bail!("batch has already been run (state: {:?})", self.state);
        }
        self.state = BatchState::Running;

        let total = urls.len();
        let mut report = BatchReport::default();  // Counters + per-URL outcomes

        self.reporter.starting()?;

        // enumerate() gives us (0, url), (1, url), ...
        // We show 1-based numbers to the user: [1/N], [2/N], ...
        for (i, url) in urls.iter().enumerate() {
            let index = i + 1;
            self.reporter.progress(index, total, url)?;

            // Never an error: failures come back as a value
            let result = self.notifier.notify(url).await;
            report.record(url, &result);

            // message() is None for a success, Some(text) for a failure
            match result.message() {
                None => {
                    tracing::info!(index, url = url.as_str(), "URL submitted");
                    self.reporter.success()?;
                }
                Some(message) => {
                    tracing::info!(index, url = url.as_str(), message, "URL rejected");
                    self.reporter.failure(message)?;
                }
            }

            // Stay under the rate limit, but don't wait after the last URL
            if index < total {
                self.gate.pause().await;
            }
        }

        self.state = BatchState::Completed;
        self.reporter.summary(&report.summary)?;

        Ok(report)
    }

    #[cfg(test)]
    pub(crate) fn gate(&self) -> &FixedIntervalGate<S> {
        &self.gate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::rate::tests::RecordingSleeper;
    use crate::batch::ConsoleReporter;
    use crate::notify::{FailureKind, NotificationResult};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    // Answers from a fixed table and remembers which URLs it saw
    #[derive(Default)]
    struct StubNotifier {
        failures: HashMap<String, Value>,
        seen: Mutex<Vec<String>>,
    }

    impl StubNotifier {
        fn failing(mut self, url: &str, body: Value) -> Self {
            self.failures.insert(url.to_string(), body);
            self
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for StubNotifier {
        async fn notify(&self, url: &str) -> NotificationResult {
            self.seen.lock().unwrap().push(url.to_string());
            match self.failures.get(url) {
                Some(body) => NotificationResult::remote_failure(body.clone()),
                None => NotificationResult::Success(json!({})),
            }
        }
    }

    // Every other URL fails with a transport error
    struct FlakyNotifier;

    #[async_trait]
    impl Notifier for FlakyNotifier {
        async fn notify(&self, url: &str) -> NotificationResult {
            if url.ends_with('1') {
                NotificationResult::failure(FailureKind::Transport, "Request timed out")
            } else {
                NotificationResult::Success(Value::Null)
            }
        }
    }

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn gate() -> FixedIntervalGate<RecordingSleeper> {
        FixedIntervalGate::with_sleeper(Duration::from_millis(300), RecordingSleeper::default())
    }

    #[tokio::test]
    async fn test_success_and_quota_failure() {
        let notifier = StubNotifier::default().failing(
            "https://b.example/y",
            json!({ "error": { "message": "quota exceeded" } }),
        );
        let mut reporter = ConsoleReporter::new(Vec::new(), false);
        let list = urls(&["https://a.example/x", "https://b.example/y"]);

        let report = {
            let mut driver = BatchDriver::new(&notifier, gate(), &mut reporter);
            let report = driver.run(&list).await.unwrap();
            assert_eq!(driver.state(), BatchState::Completed);
            assert_eq!(driver.gate().sleeper().pauses.len(), 1);
            report
        };

        assert_eq!(report.summary.successful, 1);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.total, 2);

        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(out.contains("[1/2] Processing: https://a.example/x..."));
        assert!(out.contains("[2/2] Processing: https://b.example/y..."));
        assert!(out.contains("  [FAIL] quota exceeded"));
    }

    #[tokio::test]
    async fn test_every_url_processed_in_order() {
        let notifier = StubNotifier::default();
        let mut reporter = ConsoleReporter::new(Vec::new(), false);
        let list = urls(&["https://c", "https://a", "https://c", "https://b"]);

        let mut driver = BatchDriver::new(&notifier, gate(), &mut reporter);
        let report = driver.run(&list).await.unwrap();

        assert_eq!(notifier.seen(), list);
        assert_eq!(report.summary.total, list.len());
        assert_eq!(report.results.len(), list.len());
    }

    #[tokio::test]
    async fn test_transport_failures_do_not_stop_the_batch() {
        let mut reporter = ConsoleReporter::new(Vec::new(), false);
        let list = urls(&["https://u0", "https://u1", "https://u2", "https://u3", "https://u4"]);

        let mut driver = BatchDriver::new(&FlakyNotifier, gate(), &mut reporter);
        let report = driver.run(&list).await.unwrap();

        let summary = report.summary;
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.successful, 4);
        assert_eq!(summary.successful + summary.failed, summary.total);
        assert_eq!(driver.gate().sleeper().pauses.len(), list.len() - 1);
    }

    #[tokio::test]
    async fn test_no_pause_for_single_or_empty_list() {
        let notifier = StubNotifier::default();

        for list in [urls(&[]), urls(&["https://only"])] {
            let mut reporter = ConsoleReporter::new(Vec::new(), false);
            let mut driver = BatchDriver::new(&notifier, gate(), &mut reporter);
            let report = driver.run(&list).await.unwrap();

            assert_eq!(report.summary.total, list.len());
            assert!(driver.gate().sleeper().pauses.is_empty());
        }
    }

    #[tokio::test]
    async fn test_cannot_run_twice() {
        let notifier = StubNotifier::default();
        let mut reporter = ConsoleReporter::new(Vec::new(), false);
        let list = urls(&["https://a.example/x"]);

        let mut driver = BatchDriver::new(&notifier, gate(), &mut reporter);
        assert_eq!(driver.state(), BatchState::NotStarted);
        driver.run(&list).await.unwrap();
        assert!(driver.run(&list).await.is_err());
        assert_eq!(notifier.seen().len(), 1);
    }
}
