//! Scheduled fairness runs
//!
//! A background task re-evaluates the trailing window on a fixed interval
//! and publishes each complete snapshot over a watch channel. A failed or
//! timed-out run is logged and skipped; the previous snapshot stays
//! published, so readers never see a partial report.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{error, warn};

use crate::feed::DecisionFeed;
use crate::monitor::{FairnessMonitor, FairnessSnapshot};

/// Periodic driver for the fairness monitor
pub struct FairnessScheduler {
    monitor: FairnessMonitor,
    feed: Arc<dyn DecisionFeed>,
    interval: Duration,
    run_timeout: Duration,
    window: chrono::Duration,
    tx: watch::Sender<Option<FairnessSnapshot>>,
}

impl FairnessScheduler {
    pub fn new(
        monitor: FairnessMonitor,
        feed: Arc<dyn DecisionFeed>,
        interval: Duration,
        run_timeout: Duration,
        window: chrono::Duration,
    ) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            monitor,
            feed,
            interval,
            run_timeout,
            window,
            tx,
        }
    }

    /// Receiver for published snapshots. `None` until the first run
    /// completes.
    pub fn subscribe(&self) -> watch::Receiver<Option<FairnessSnapshot>> {
        self.tx.subscribe()
    }

    /// Run the schedule forever on a background task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            loop {
                ticker.tick().await;
                self.run_once().await;
            }
        })
    }

    /// One evaluation of the trailing window
    pub async fn run_once(&self) {
        let window_end = Utc::now();
        let window_start = window_end - self.window;

        let outcomes = match timeout(
            self.run_timeout,
            self.feed.outcomes_between(window_start, window_end),
        )
        .await
        {
            Ok(Ok(outcomes)) => outcomes,
            Ok(Err(e)) => {
                error!(error = %e, "fairness run skipped: feed failed");
                return;
            }
            Err(_) => {
                error!(timeout_ms = self.run_timeout.as_millis() as u64, "fairness run timed out");
                return;
            }
        };

        let snapshot = self.monitor.evaluate(&outcomes, window_start, window_end);
        for alert in &snapshot.alerts {
            warn!(
                attribute = %alert.attribute,
                group = %alert.group,
                ratio = alert.ratio,
                floor = alert.floor,
                "disparate-impact floor violated"
            );
        }

        // send replaces the whole snapshot in one step
        let _ = self.tx.send(Some(snapshot));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration as ChronoDuration};
    use std::sync::atomic::{AtomicBool, Ordering};

    use crate::feed::FeedError;
    use crate::outcome::DecisionOutcome;
    use trustlend_core::AgeGroup;
    use trustlend_policy::DecisionPolicy;

    struct StubFeed {
        fail: AtomicBool,
        stall: AtomicBool,
    }

    impl StubFeed {
        fn healthy() -> Self {
            Self {
                fail: AtomicBool::new(false),
                stall: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl DecisionFeed for StubFeed {
        async fn outcomes_between(
            &self,
            _from: DateTime<Utc>,
            _to: DateTime<Utc>,
        ) -> Result<Vec<DecisionOutcome>, FeedError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(FeedError::Unavailable("stub outage".to_string()));
            }
            if self.stall.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            Ok((0..20)
                .map(|i| DecisionOutcome {
                    decision_id: format!("d-{i}"),
                    approved: i % 2 == 0,
                    gender: "female".to_string(),
                    region: "north".to_string(),
                    age_group: AgeGroup::From25To45,
                    created_at: Utc::now(),
                })
                .collect())
        }
    }

    fn scheduler(feed: Arc<StubFeed>, run_timeout: Duration) -> FairnessScheduler {
        FairnessScheduler::new(
            FairnessMonitor::new(DecisionPolicy::default()),
            feed,
            Duration::from_secs(3600),
            run_timeout,
            ChronoDuration::days(30),
        )
    }

    #[tokio::test]
    async fn test_run_publishes_snapshot() {
        let scheduler = scheduler(Arc::new(StubFeed::healthy()), Duration::from_secs(5));
        let rx = scheduler.subscribe();
        assert!(rx.borrow().is_none());

        scheduler.run_once().await;

        let snapshot = rx.borrow().clone().expect("snapshot published");
        assert_eq!(snapshot.sample_size, 20);
    }

    #[tokio::test]
    async fn test_failed_run_keeps_previous_snapshot() {
        let feed = Arc::new(StubFeed::healthy());
        let scheduler = scheduler(feed.clone(), Duration::from_secs(5));
        let rx = scheduler.subscribe();

        scheduler.run_once().await;
        let first = rx.borrow().clone().expect("first snapshot");

        feed.fail.store(true, Ordering::SeqCst);
        scheduler.run_once().await;

        let still = rx.borrow().clone().expect("previous snapshot retained");
        assert_eq!(still.window_end, first.window_end);
    }

    #[tokio::test]
    async fn test_timed_out_run_keeps_previous_snapshot() {
        let feed = Arc::new(StubFeed::healthy());
        let scheduler = scheduler(feed.clone(), Duration::from_millis(50));
        let rx = scheduler.subscribe();

        scheduler.run_once().await;
        let first = rx.borrow().clone().expect("first snapshot");

        feed.stall.store(true, Ordering::SeqCst);
        scheduler.run_once().await;

        let still = rx.borrow().clone().expect("previous snapshot retained");
        assert_eq!(still.window_end, first.window_end);
    }
}
