//! Stdout report for a finished run.
use std::time::Duration;

use super::workflow::{WorkflowOutcome, WorkflowReport};

/// One line per workflow plus an aggregate tail line.
#[must_use]
pub fn lines(reports: &[WorkflowReport], elapsed: Duration) -> Vec<String> {
    let mut lines = Vec::with_capacity(reports.len().saturating_add(1));
    let mut succeeded: u64 = 0;
    let mut posts: u64 = 0;
    for report in reports {
        match &report.outcome {
            WorkflowOutcome::Success => {
                succeeded = succeeded.saturating_add(1);
                lines.push(format!(
                    "workflow {}: ok ({} posts)",
                    report.id, report.posts_created
                ));
            }
            WorkflowOutcome::Failure { reason } => {
                lines.push(format!("workflow {}: failed: {reason}", report.id));
            }
        }
        posts = posts.saturating_add(u64::from(report.posts_created));
    }

    let total = u64::try_from(reports.len()).unwrap_or(u64::MAX);
    let failed = total.saturating_sub(succeeded);
    lines.push(format!(
        "{total} workflows: {succeeded} succeeded, {failed} failed, {posts} posts created in {:.1}s",
        elapsed.as_secs_f64()
    ));
    lines
}

/// The exit-code policy hinges on this: the process exits zero only when
/// every workflow succeeded.
#[must_use]
pub fn all_succeeded(reports: &[WorkflowReport]) -> bool {
    reports.iter().all(|report| report.outcome.is_success())
}
