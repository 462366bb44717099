//! Background jobs that run next to the receive loop: the daily news
//! broadcast and the all-time-high monitor.
//!
//! Every job gets a `watch` receiver and returns once it flips to `true`.
//! [`ScheduledJobs::shutdown`] flips it and waits for the jobs to finish.

pub mod ath;
pub mod news;

pub use ath::{render_alert, AthMonitor, AthRecord, AthRecords, RecordsError};
pub use news::DailyNews;

use crate::services::MessageSender;
use authorized_store::AuthorizedStore;
use chrono::NaiveTime;
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{error, info, warn};

pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// When a job fires: once after `first`, then every `period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    pub first: Duration,
    pub period: Duration,
}

impl Schedule {
    /// First run one period from now.
    pub fn every(period: Duration) -> Self {
        Self {
            first: period,
            period,
        }
    }

    /// Once a day at the local wall-clock time `at`.
    pub fn daily_at(at: NaiveTime, now: NaiveTime) -> Self {
        Self {
            first: delay_until(now, at),
            period: DAY,
        }
    }

    fn interval(&self) -> Interval {
        let period = self.period.max(MIN_PERIOD);
        let mut ticker = interval_at(Instant::now() + self.first, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }
}

/// Time from `now` until the next occurrence of `at`. A time equal to
/// `now` means tomorrow.
pub fn delay_until(now: NaiveTime, at: NaiveTime) -> Duration {
    let day_ms = DAY.as_millis() as i64;
    let mut ms = at.signed_duration_since(now).num_milliseconds();
    if ms <= 0 {
        ms += day_ms;
    }
    Duration::from_millis(ms as u64)
}

/// Resolves once the shutdown flag is set or its sender is gone.
pub(crate) async fn stopped(shutdown: &mut watch::Receiver<bool>) {
    loop {
        let stop = *shutdown.borrow();
        if stop || shutdown.changed().await.is_err() {
            return;
        }
    }
}

/// Send `text` to every number in the current authorized view.
/// Returns how many deliveries succeeded.
pub(crate) async fn broadcast(
    store: &AuthorizedStore,
    sender: &dyn MessageSender,
    text: &str,
    prefix: &str,
) -> usize {
    let view = store.view().await;
    let mut delivered = 0;

    for number in view.numbers() {
        match sender.send_to(number, text).await {
            Ok(()) => {
                delivered += 1;
                info!("{} Broadcast sent to {}", prefix, number);
            }
            Err(e) => warn!("{} Broadcast to {} failed: {}", prefix, number, e),
        }
    }

    delivered
}

/// Set of running background jobs sharing one shutdown flag.
pub struct ScheduledJobs {
    tasks: JoinSet<()>,
    shutdown: watch::Sender<bool>,
}

impl Default for ScheduledJobs {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduledJobs {
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            tasks: JoinSet::new(),
            shutdown,
        }
    }

    /// Start a job. It receives the shutdown flag and must return once the
    /// flag is set.
    pub fn spawn<F, Fut>(&mut self, name: &'static str, job: F)
    where
        F: FnOnce(watch::Receiver<bool>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        info!("Starting job {}", name);
        let stop = self.shutdown.subscribe();
        self.tasks.spawn(job(stop));
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Signal every job to stop and wait up to `grace` for them.
    /// Returns how many had to be aborted.
    pub async fn shutdown(mut self, grace: Duration) -> usize {
        self.shutdown.send_replace(true);

        let drained = tokio::time::timeout(grace, async {
            while let Some(joined) = self.tasks.join_next().await {
                if let Err(e) = joined {
                    error!("Job failed: {}", e);
                }
            }
        })
        .await;

        if drained.is_err() {
            let aborted = self.tasks.len();
            warn!("Aborting {} jobs after grace period", aborted);
            self.tasks.abort_all();
            return aborted;
        }

        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_delay_until_later_today() {
        assert_eq!(delay_until(time(9, 0), time(10, 0)), Duration::from_secs(3600));
        assert_eq!(delay_until(time(9, 59), time(10, 0)), Duration::from_secs(60));
    }

    #[test]
    fn test_delay_until_wraps_to_tomorrow() {
        assert_eq!(delay_until(time(10, 0), time(10, 0)), DAY);
        assert_eq!(
            delay_until(time(11, 0), time(10, 0)),
            Duration::from_secs(23 * 3600)
        );
    }

    #[test]
    fn test_daily_schedule() {
        let schedule = Schedule::daily_at(time(10, 0), time(8, 30));
        assert_eq!(schedule.first, Duration::from_secs(90 * 60));
        assert_eq!(schedule.period, DAY);
        assert_eq!(Schedule::every(Duration::from_secs(300)).first, Duration::from_secs(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_idle_jobs() {
        let mut jobs = ScheduledJobs::new();
        jobs.spawn("idle", |mut stop| async move { stopped(&mut stop).await });
        jobs.spawn("idle", |mut stop| async move { stopped(&mut stop).await });
        assert_eq!(jobs.len(), 2);

        assert_eq!(jobs.shutdown(Duration::from_secs(1)).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_aborts_stuck_jobs() {
        let mut jobs = ScheduledJobs::new();
        jobs.spawn("stuck", |_stop| std::future::pending::<()>());

        assert_eq!(jobs.shutdown(Duration::from_secs(1)).await, 1);
    }
}
