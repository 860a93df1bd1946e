// src/batch/summary.rs
// =============================================================================
// Bookkeeping for one batch run.
//
// - RunSummary: the three numbers printed at the end
// - UrlOutcome: what happened to one URL
// - BatchReport: both of the above, serializable for --json output
//
// Every URL adds exactly one outcome, so successful + failed == total.
// =============================================================================

use crate::notify::{FailureKind, NotificationResult};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub successful: usize,
    pub failed: usize,
    pub total: usize,
}

impl RunSummary {
    pub fn record(&mut self, result: &NotificationResult) {
        if result.is_success() {
            self.successful += 1;
        } else {
            self.failed += 1;
        }
        self.total += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Ok,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlOutcome {
    pub url: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FailureKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UrlOutcome {
    pub fn new(url: &str, result: &NotificationResult) -> Self {
        match result {
            NotificationResult::Success(_) => Self {
                url: url.to_string(),
                status: OutcomeStatus::Ok,
                kind: None,
                message: None,
            },
            NotificationResult::Failure(failure) => Self {
                url: url.to_string(),
                status: OutcomeStatus::Failed,
                kind: Some(failure.kind),
                message: Some(failure.message.clone()),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub summary: RunSummary,
    pub results: Vec<UrlOutcome>,
}

impl BatchReport {
    pub fn record(&mut self, url: &str, result: &NotificationResult) {
        self.summary.record(result);
        self.results.push(UrlOutcome::new(url, result));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_counts_add_up() {
        let mut report = BatchReport::default();
        report.record("https://a", &NotificationResult::Success(Value::Null));
        report.record(
            "https://b",
            &NotificationResult::failure(FailureKind::Transport, "Request timed out"),
        );
        report.record("https://c", &NotificationResult::Success(Value::Null));

        let summary = report.summary;
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.successful + summary.failed, summary.total);
        assert_eq!(report.results.len(), summary.total);
    }

    #[test]
    fn test_report_json() {
        let mut report = BatchReport::default();
        report.record("https://a", &NotificationResult::Success(Value::Null));
        let quota = json!({ "error": { "message": "quota exceeded" } });
        report.record("https://b", &NotificationResult::remote_failure(quota));

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "summary": { "successful": 1, "failed": 1, "total": 2 },
                "results": [
                    { "url": "https://a", "status": "ok" },
                    {
                        "url": "https://b",
                        "status": "failed",
                        "kind": "remote",
                        "message": "quota exceeded"
                    }
                ]
            })
        );
    }
}
