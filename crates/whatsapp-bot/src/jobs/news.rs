//! Daily crypto news broadcast.

use super::{broadcast, stopped, Schedule};
use crate::services::{MessageSender, NewsService};
use authorized_store::AuthorizedStore;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, warn};

pub struct DailyNews {
    prefix: String,
    news: Arc<dyn NewsService>,
    sender: Arc<dyn MessageSender>,
    store: Arc<AuthorizedStore>,
}

impl DailyNews {
    pub fn new(
        bot_name: &str,
        news: Arc<dyn NewsService>,
        sender: Arc<dyn MessageSender>,
        store: Arc<AuthorizedStore>,
    ) -> Self {
        Self {
            prefix: format!("[{}]", bot_name),
            news,
            sender,
            store,
        }
    }

    /// Fetch the digest once and send it to every authorized number.
    /// Returns how many deliveries succeeded.
    pub async fn broadcast(&self) -> usize {
        info!("{} Fetching crypto news for the daily broadcast", self.prefix);

        let digest = match self.news.digest().await {
            Ok(digest) => digest,
            Err(e) => {
                error!("{} Daily news failed: {}", self.prefix, e);
                return 0;
            }
        };

        if digest.trim().is_empty() {
            warn!("{} No news available, skipping broadcast", self.prefix);
            return 0;
        }

        broadcast(&self.store, self.sender.as_ref(), &digest, &self.prefix).await
    }

    pub async fn run(self, schedule: Schedule, mut shutdown: watch::Receiver<bool>) {
        info!(
            "{} Daily news scheduled in {:?}, then every {:?}",
            self.prefix, schedule.first, schedule.period
        );
        let mut ticker = schedule.interval();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let delivered = self.broadcast().await;
                    info!("{} Daily news delivered to {} numbers", self.prefix, delivered);
                }
                _ = stopped(&mut shutdown) => break,
            }
        }

        info!("{} Daily news stopped", self.prefix);
    }
}
