use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::application::services::LinkService;
use crate::domain::repositories::LinkStore;

/// Runs [`LinkService::cleanup`] every `period` until the task is aborted.
///
/// The first sweep happens one full period after start. Failures are logged
/// and the next tick tries again. `period` must be non-zero.
pub async fn run_cleanup_worker<S>(service: Arc<LinkService<S>>, period: Duration)
where
    S: LinkStore + ?Sized,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await;

    info!(interval_secs = period.as_secs(), "Cleanup worker started");

    loop {
        ticker.tick().await;

        match service.cleanup().await {
            Ok(0) => debug!("Periodic cleanup found nothing to remove"),
            Ok(removed) => info!(removed, "Periodic cleanup removed expired links"),
            Err(e) => warn!(error = %e, "Periodic cleanup failed"),
        }
    }
}
