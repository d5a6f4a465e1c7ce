//! Fire-and-forget membership revalidation
//!
//! Each submission spawns a tracked tokio task holding its own Arc'd
//! service handle, so the refresh runs on its own pool connections and
//! outlives the request that triggered it. Failures are terminal for the
//! task: logged, never escalated, never fatal for the process. Shutdown
//! drains in-flight tasks with a timeout.

use std::sync::Arc;
use std::time::Duration;

use linker_core::linking::ports::RevalidationScheduler;
use linker_core::MembershipService;
use linker_domain::WikidotAccount;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, warn};

/// Queue of detached membership refresh tasks
pub struct RevalidationQueue {
    membership: Arc<MembershipService>,
    tracker: TaskTracker,
    cancel: CancellationToken,
}

impl RevalidationQueue {
    /// Create a new queue over the membership service
    pub fn new(membership: Arc<MembershipService>) -> Self {
        Self { membership, tracker: TaskTracker::new(), cancel: CancellationToken::new() }
    }

    /// Number of tasks still in flight
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Stop accepting work and wait for in-flight tasks, up to `timeout`.
    pub async fn shutdown(&self, timeout: Duration) {
        self.cancel.cancel();
        self.tracker.close();

        if tokio::time::timeout(timeout, self.tracker.wait()).await.is_err() {
            warn!(
                in_flight = self.tracker.len(),
                "revalidation queue drain timed out; abandoning remaining tasks"
            );
        } else {
            info!("revalidation queue drained");
        }
    }
}

impl RevalidationScheduler for RevalidationQueue {
    fn schedule(&self, account: WikidotAccount) {
        if self.cancel.is_cancelled() {
            warn!(wikidot_id = account.wikidot_id, "revalidation skipped; queue shutting down");
            return;
        }

        let membership = Arc::clone(&self.membership);
        self.tracker.spawn(async move {
            match membership.refresh(&account).await {
                Ok(updated) => {
                    debug!(
                        wikidot_id = updated.wikidot_id,
                        is_site_member = updated.is_site_member,
                        "detached membership refresh completed"
                    );
                }
                Err(err) => {
                    error!(
                        wikidot_id = account.wikidot_id,
                        error = %err,
                        "detached membership refresh failed"
                    );
                }
            }
        });
    }
}
