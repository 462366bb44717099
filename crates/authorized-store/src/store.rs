//! File-backed store for runtime-authorized numbers.

use crate::error::StoreError;
use crate::phone::{validate, PhoneIdentity};
use crate::types::{AddOutcome, AuthorizedView, RemoveOutcome};
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

/// Authorized-number store.
///
/// Holds the immutable fixed set supplied at startup and persists the
/// dynamic set as a sorted JSON array of strings. Fixed numbers are never
/// written to disk. Every read-modify-write of the file runs under a single
/// mutex so concurrent admin commands cannot lose updates.
pub struct AuthorizedStore {
    fixed: BTreeSet<PhoneIdentity>,
    path: PathBuf,
    view: RwLock<AuthorizedView>,
    write_lock: Mutex<()>,
}

impl AuthorizedStore {
    /// Create a store without touching the file.
    ///
    /// Fixed entries that fail validation are skipped with a warning. The
    /// initial view holds the fixed set only; call [`load`](Self::load) to
    /// merge the persisted numbers.
    pub fn new<I, S>(fixed: I, path: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fixed_set = BTreeSet::new();
        for raw in fixed {
            let raw = raw.as_ref();
            match validate(raw) {
                Some(number) => {
                    fixed_set.insert(number);
                }
                None if raw.trim().is_empty() => {}
                None => warn!("Ignoring invalid fixed number: {}", raw.trim()),
            }
        }

        Self {
            view: RwLock::new(AuthorizedView::new(fixed_set.clone(), BTreeSet::new())),
            fixed: fixed_set,
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Create a store and load the persisted numbers.
    pub async fn open<I, S>(fixed: I, path: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let store = Self::new(fixed, path);
        let view = store.load().await;
        info!(
            "Authorized-number store ready ({} fixed, {} dynamic, path={:?})",
            view.fixed().len(),
            view.dynamic().len(),
            store.path
        );
        store
    }

    /// Path of the durable file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Numbers sourced from configuration.
    pub fn fixed_numbers(&self) -> &BTreeSet<PhoneIdentity> {
        &self.fixed
    }

    /// Reload the dynamic set from disk and rebuild the view.
    ///
    /// A missing or undecodable file is replaced by an empty one and the
    /// fixed set alone is returned. Never fails.
    pub async fn load(&self) -> AuthorizedView {
        let _guard = self.write_lock.lock().await;
        self.load_locked().await
    }

    /// Persist a candidate full list.
    ///
    /// Entries failing validation and entries belonging to the fixed set are
    /// dropped; the remainder is deduplicated and written in ascending order.
    /// Returns the numbers actually written.
    #[instrument(skip(self, candidates), fields(candidates = candidates.len()))]
    pub async fn save<S: AsRef<str>>(
        &self,
        candidates: &[S],
    ) -> Result<Vec<PhoneIdentity>, StoreError> {
        let mutable = self.sanitize(candidates);
        let _guard = self.write_lock.lock().await;
        self.persist_locked(&mutable).await?;
        Ok(mutable.into_iter().collect())
    }

    /// Authorize a new number at runtime.
    #[instrument(skip(self))]
    pub async fn add(&self, candidate: &str) -> Result<AddOutcome, StoreError> {
        let candidate = candidate.trim();

        if candidate.is_empty() {
            return Err(StoreError::EmptyInput);
        }
        if self.is_fixed(candidate) {
            return Err(StoreError::FixedNumberConflict(candidate.to_string()));
        }
        let number =
            validate(candidate).ok_or_else(|| StoreError::InvalidFormat(candidate.to_string()))?;

        let _guard = self.write_lock.lock().await;
        let view = self.load_locked().await;

        if view.dynamic().contains(&number) {
            info!("Number {} was already authorized", number);
            return Ok(AddOutcome::AlreadyAuthorized(number));
        }

        let mut dynamic = view.dynamic().clone();
        dynamic.insert(number.clone());
        self.persist_locked(&dynamic).await?;

        info!("Number {} authorized", number);
        Ok(AddOutcome::Added(number))
    }

    /// Revoke a runtime-authorized number on behalf of `requester`.
    #[instrument(skip(self))]
    pub async fn remove(&self, requester: &str, target: &str) -> Result<RemoveOutcome, StoreError> {
        let target_key = canonical(target);

        if canonical(requester) == target_key {
            return Err(StoreError::SelfRemovalBlocked(requester.trim().to_string()));
        }
        if self.is_fixed(target) {
            return Err(StoreError::FixedNumberProtected(target.trim().to_string()));
        }

        let _guard = self.write_lock.lock().await;
        let view = self.load_locked().await;

        let mut dynamic = view.dynamic().clone();
        let before = dynamic.len();
        dynamic.retain(|n| n.as_str() != target_key);
        let removed = dynamic.len() != before;

        self.persist_locked(&dynamic).await?;

        if removed {
            info!("Number {} removed by {}", target_key, requester.trim());
            Ok(RemoveOutcome::Removed(target_key))
        } else {
            info!("Number {} was not in the list, nothing changed", target_key);
            Ok(RemoveOutcome::NotPresent(target_key))
        }
    }

    /// Check membership in the fixed set.
    pub fn is_fixed(&self, candidate: &str) -> bool {
        let trimmed = candidate.trim();
        self.fixed.iter().any(|n| n.as_str() == trimmed)
            || validate(trimmed).is_some_and(|n| self.fixed.contains(&n))
    }

    /// Snapshot of the current authorized view.
    pub async fn view(&self) -> AuthorizedView {
        self.view.read().await.clone()
    }

    /// Check whether a sender may interact with the bot.
    pub async fn is_authorized(&self, sender: &str) -> bool {
        self.view.read().await.contains(sender)
    }

    async fn load_locked(&self) -> AuthorizedView {
        let dynamic = self.read_dynamic().await;
        let view = AuthorizedView::new(self.fixed.clone(), dynamic);
        *self.view.write().await = view.clone();
        view
    }

    async fn read_dynamic(&self) -> BTreeSet<PhoneIdentity> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                if e.kind() == ErrorKind::NotFound {
                    warn!(
                        "Authorized file {:?} not found, creating an empty one",
                        self.path
                    );
                } else {
                    warn!(
                        "Failed to read {:?}: {}, replacing with an empty list",
                        self.path, e
                    );
                }
                self.recreate_empty().await;
                return BTreeSet::new();
            }
        };

        match serde_json::from_slice::<Vec<String>>(&bytes) {
            Ok(entries) => {
                let total = entries.len();
                let dynamic = self.sanitize(entries.as_slice());
                if dynamic.len() != total {
                    debug!(
                        "Dropped {} invalid, duplicate or fixed entries from {:?}",
                        total - dynamic.len(),
                        self.path
                    );
                }
                dynamic
            }
            Err(e) => {
                warn!(
                    "Failed to decode {:?}: {}, replacing with an empty list",
                    self.path, e
                );
                self.recreate_empty().await;
                BTreeSet::new()
            }
        }
    }

    async fn recreate_empty(&self) {
        if let Err(e) = self.write_file(&BTreeSet::new()).await {
            warn!("Could not recreate authorized file: {}", e);
        }
    }

    async fn persist_locked(&self, mutable: &BTreeSet<PhoneIdentity>) -> Result<(), StoreError> {
        self.write_file(mutable).await?;
        *self.view.write().await = AuthorizedView::new(self.fixed.clone(), mutable.clone());
        info!(
            "Authorized list saved with {} mutable number(s)",
            mutable.len()
        );
        Ok(())
    }

    async fn write_file(&self, mutable: &BTreeSet<PhoneIdentity>) -> Result<(), StoreError> {
        let list: Vec<&str> = mutable.iter().map(PhoneIdentity::as_str).collect();
        let data = serde_json::to_vec(&list)?;

        let persistence = |source| StoreError::Persistence {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(persistence)?;
        }

        // Write atomically using temp file + rename
        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &data).await.map_err(persistence)?;
        fs::rename(&temp_path, &self.path).await.map_err(persistence)?;

        debug!("Wrote {} bytes to {:?}", data.len(), self.path);
        Ok(())
    }

    fn sanitize<S: AsRef<str>>(&self, candidates: &[S]) -> BTreeSet<PhoneIdentity> {
        candidates
            .iter()
            .filter_map(|c| validate(c.as_ref()))
            .filter(|n| !self.fixed.contains(n))
            .collect()
    }
}

/// Comparable form of a number: validated when possible, trimmed otherwise.
fn canonical(number: &str) -> String {
    validate(number)
        .map(PhoneIdentity::into_inner)
        .unwrap_or_else(|| number.trim().to_string())
}
