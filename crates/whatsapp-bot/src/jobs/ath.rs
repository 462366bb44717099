//! All-time-high monitor: polls the configured coins and alerts every
//! authorized number when one trades above both its official ATH and the
//! highest price already alerted.

use super::{broadcast, stopped, Schedule};
use crate::services::{MessageSender, PriceService};
use authorized_store::AuthorizedStore;
use chrono::{DateTime, Local, Utc};
use market_data::PriceSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::fs;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug)]
pub enum RecordsError {
    #[error("Failed to write ATH records: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode ATH records: {0}")]
    Json(#[from] serde_json::Error),
}

/// Highest price alerted for one coin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AthRecord {
    pub ath: f64,
    pub timestamp: DateTime<Utc>,
}

/// Per-coin records kept in a JSON file keyed by upper-case symbol.
#[derive(Debug)]
pub struct AthRecords {
    path: PathBuf,
    records: BTreeMap<String, AthRecord>,
}

impl AthRecords {
    /// Read the records file. A missing or undecodable file starts empty.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let records = match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(records) => records,
                Err(e) => {
                    warn!("Failed to decode {:?}: {}, starting with no records", path, e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No ATH records at {:?}, starting fresh", path);
                BTreeMap::new()
            }
            Err(e) => {
                warn!("Failed to read {:?}: {}, starting with no records", path, e);
                BTreeMap::new()
            }
        };

        Self { path, records }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, symbol: &str) -> Option<&AthRecord> {
        self.records.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn insert(&mut self, symbol: impl Into<String>, record: AthRecord) {
        self.records.insert(symbol.into(), record);
    }

    /// Write every record atomically (temp file, then rename).
    pub async fn save(&self) -> Result<(), RecordsError> {
        let data = serde_json::to_vec_pretty(&self.records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &data).await?;
        fs::rename(&temp_path, &self.path).await?;

        debug!("Wrote {} ATH records to {:?}", self.records.len(), self.path);
        Ok(())
    }
}

/// Alert text for a coin that broke its official ATH.
pub fn render_alert(symbol: &str, snapshot: PriceSnapshot, at: DateTime<Utc>) -> String {
    format!(
        "🚨 *NOVO RECORD HISTÓRICO (ATH)*\n\n\
         *{}*: preço atual U$ {:.2} (ATH anterior: U$ {:.2})\n\n\
         🕒 ATH superado em {}",
        symbol,
        snapshot.current_usd,
        snapshot.ath_usd,
        at.with_timezone(&Local).format("%d/%m/%Y %H:%M")
    )
}

pub struct AthMonitor {
    prefix: String,
    coins: Vec<String>,
    prices: Arc<dyn PriceService>,
    sender: Arc<dyn MessageSender>,
    store: Arc<AuthorizedStore>,
    records: AthRecords,
}

impl AthMonitor {
    pub fn new(
        bot_name: &str,
        coins: &[String],
        prices: Arc<dyn PriceService>,
        sender: Arc<dyn MessageSender>,
        store: Arc<AuthorizedStore>,
        records: AthRecords,
    ) -> Self {
        let coins = coins
            .iter()
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .collect();

        Self {
            prefix: format!("[{}]", bot_name),
            coins,
            prices,
            sender,
            store,
            records,
        }
    }

    pub fn records(&self) -> &AthRecords {
        &self.records
    }

    /// Check every coin once. Returns the symbols that set a new record.
    pub async fn check(&mut self) -> Vec<String> {
        debug!("{} Checking all-time highs", self.prefix);
        let mut broken = Vec::new();

        for symbol in &self.coins {
            let snapshot = match self.prices.usd_snapshot(symbol).await {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!("{} [{}] price lookup failed: {}", self.prefix, symbol, e);
                    continue;
                }
            };

            let last = self.records.get(symbol).map(|r| r.ath).unwrap_or_default();
            if snapshot.current_usd <= snapshot.ath_usd || snapshot.current_usd <= last {
                debug!(
                    "{} [{}] U$ {:.2} below official ATH U$ {:.2}",
                    self.prefix, symbol, snapshot.current_usd, snapshot.ath_usd
                );
                continue;
            }

            info!(
                "{} [{}] broke its all-time high: U$ {:.2} > U$ {:.2}",
                self.prefix, symbol, snapshot.current_usd, snapshot.ath_usd
            );

            let now = Utc::now();
            let alert = render_alert(symbol, snapshot, now);
            broadcast(&self.store, self.sender.as_ref(), &alert, &self.prefix).await;

            self.records.insert(
                symbol.clone(),
                AthRecord {
                    ath: snapshot.current_usd,
                    timestamp: now,
                },
            );
            if let Err(e) = self.records.save().await {
                error!(
                    "{} Failed to persist ATH records at {}: {}",
                    self.prefix,
                    self.records.path().display(),
                    e
                );
            }

            broken.push(symbol.clone());
        }

        broken
    }

    pub async fn run(mut self, schedule: Schedule, mut shutdown: watch::Receiver<bool>) {
        info!(
            "{} ATH monitor watching {} every {:?}",
            self.prefix,
            self.coins.join(","),
            schedule.period
        );
        let mut ticker = schedule.interval();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.check().await;
                }
                _ = stopped(&mut shutdown) => break,
            }
        }

        info!("{} ATH monitor stopped", self.prefix);
    }
}
