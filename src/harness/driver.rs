use std::num::NonZeroUsize;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::api::ApiClient;
use crate::args::Visibility;

use super::media::MediaPool;
use super::workflow::{self, WorkflowReport};

/// Everything a workflow needs, shared read-only across the whole run.
#[derive(Debug)]
pub struct RunContext {
    pub client: ApiClient,
    pub media: MediaPool,
    pub iterations: u32,
    pub password: String,
    pub visibility: Visibility,
}

/// Runs `workflows` simulated users with at most `concurrency` in flight.
///
/// Execution and completion order are unspecified; results come back in
/// submission order (workflow id). Every task runs to completion: a workflow
/// that fails, or even panics, becomes a failure report without cancelling
/// or affecting its siblings.
pub async fn run(
    ctx: Arc<RunContext>,
    workflows: u64,
    concurrency: NonZeroUsize,
) -> Vec<WorkflowReport> {
    let permits = Arc::new(Semaphore::new(concurrency.get()));
    let capacity = usize::try_from(workflows).unwrap_or(0);
    let mut handles = Vec::with_capacity(capacity);
    for id in 0..workflows {
        let permits = Arc::clone(&permits);
        let ctx = Arc::clone(&ctx);
        handles.push(tokio::spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(_closed) => {
                    return WorkflowReport::failed(
                        id,
                        0,
                        "worker pool closed before the workflow started".to_owned(),
                    );
                }
            };
            workflow::run(&ctx, id).await
        }));
    }

    let mut reports = Vec::with_capacity(handles.len());
    for (offset, handle) in handles.into_iter().enumerate() {
        let id = u64::try_from(offset).unwrap_or(u64::MAX);
        let report = match handle.await {
            Ok(report) => report,
            Err(err) => {
                debug!(workflow = id, "task fault: {err}");
                WorkflowReport::failed(id, 0, format!("workflow task fault: {err}"))
            }
        };
        reports.push(report);
    }
    reports
}
