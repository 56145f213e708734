//! Debounced auto-save scheduling driven by store revisions.
//!
//! The manager never writes anything itself. The host polls it, receives a
//! [`ProjectSnapshot`] when a save is due, persists it however it likes, and
//! reports back with [`AutoSaveManager::mark_saved`] or
//! [`AutoSaveManager::mark_save_failed`].

use std::time::Duration;
use web_time::Instant;

use super::shared::SharedProjectStore;
use super::snapshot::ProjectSnapshot;

/// Decides when the project should be persisted.
///
/// Two timers gate a save:
/// 1. **Debounce delay**: time since the last observed change, so bursts of
///    edits (a box drag) produce one save.
/// 2. **Minimum interval**: time since the last save attempt.
#[derive(Debug)]
pub struct AutoSaveManager {
    save_interval: Duration,
    debounce_delay: Duration,
    last_save: Option<Instant>,
    last_change: Option<Instant>,
    /// Latest store revision seen by [`Self::observe`].
    observed_revision: u64,
    /// Revision contained in the last successful save.
    saved_revision: u64,
    enabled: bool,
}

impl AutoSaveManager {
    pub const DEFAULT_SAVE_INTERVAL: Duration = Duration::from_secs(60);
    pub const DEFAULT_DEBOUNCE_DELAY: Duration = Duration::from_secs(5);

    pub fn new() -> Self {
        Self {
            save_interval: Self::DEFAULT_SAVE_INTERVAL,
            debounce_delay: Self::DEFAULT_DEBOUNCE_DELAY,
            last_save: None,
            last_change: None,
            observed_revision: 0,
            saved_revision: 0,
            enabled: true,
        }
    }

    pub fn disabled() -> Self {
        let mut manager = Self::new();
        manager.enabled = false;
        manager
    }

    pub fn with_save_interval(mut self, interval: Duration) -> Self {
        self.save_interval = interval;
        self
    }

    pub fn with_debounce_delay(mut self, delay: Duration) -> Self {
        self.debounce_delay = delay;
        self
    }

    /// Record the store's current revision. A newer revision restarts the debounce timer.
    pub fn observe(&mut self, revision: u64) {
        if revision > self.observed_revision {
            self.observed_revision = revision;
            self.last_change = Some(Instant::now());
            log::trace!("Auto-save: observed revision {}", revision);
        }
    }

    /// Whether changes exist that no successful save contains.
    pub fn is_dirty(&self) -> bool {
        self.observed_revision > self.saved_revision
    }

    pub fn should_save(&self) -> bool {
        if !self.enabled || !self.is_dirty() {
            return false;
        }
        let Some(last_change) = self.last_change else {
            return false;
        };
        if last_change.elapsed() < self.debounce_delay {
            return false;
        }
        if let Some(last_save) = self.last_save
            && last_save.elapsed() < self.save_interval
        {
            return false;
        }
        true
    }

    /// Observe the shared store and, if a save is due, take a consistent snapshot of it.
    pub fn poll(&mut self, store: &SharedProjectStore) -> Option<ProjectSnapshot> {
        self.observe(store.revision());
        if !self.should_save() {
            return None;
        }
        let snapshot = store.snapshot();
        log::debug!("Auto-save: snapshot at revision {}", snapshot.revision);
        Some(snapshot)
    }

    /// Record a successful save of the snapshot taken at `revision`.
    ///
    /// Edits made after the snapshot keep the manager dirty.
    pub fn mark_saved(&mut self, revision: u64) {
        self.last_save = Some(Instant::now());
        self.saved_revision = self.saved_revision.max(revision);
        if !self.is_dirty() {
            self.last_change = None;
        }
        log::trace!("Auto-save: saved revision {}", revision);
    }

    /// Record a failed save. The changes stay dirty and the interval delays the retry.
    pub fn mark_save_failed(&mut self) {
        self.last_save = Some(Instant::now());
        log::warn!(
            "Auto-save failed; revision {} still unsaved",
            self.observed_revision
        );
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        log::debug!("Auto-save: enabled = {}", enabled);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn time_since_last_save(&self) -> Option<Duration> {
        self.last_save.map(|t| t.elapsed())
    }

    /// Forget all state, e.g. after opening another project.
    pub fn reset(&mut self) {
        self.last_save = None;
        self.last_change = None;
        self.observed_revision = 0;
        self.saved_revision = 0;
    }
}

impl Default for AutoSaveManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::store::{AnnotationStore, NewImage, ProjectStore};

    fn immediate() -> AutoSaveManager {
        AutoSaveManager::new()
            .with_debounce_delay(Duration::ZERO)
            .with_save_interval(Duration::ZERO)
    }

    #[test]
    fn test_initial_state() {
        let manager = AutoSaveManager::new();
        assert!(!manager.is_dirty());
        assert!(!manager.should_save());
        assert!(manager.is_enabled());
    }

    #[test]
    fn test_disabled() {
        let mut manager = AutoSaveManager::disabled()
            .with_debounce_delay(Duration::ZERO);
        manager.observe(3);
        assert!(manager.is_dirty());
        assert!(!manager.should_save());
    }

    #[test]
    fn test_debounce_prevents_immediate_save() {
        let mut manager = AutoSaveManager::new()
            .with_debounce_delay(Duration::from_secs(10))
            .with_save_interval(Duration::ZERO);
        manager.observe(1);
        assert!(!manager.should_save());
    }

    #[test]
    fn test_stale_revision_is_ignored() {
        let mut manager = immediate();
        manager.observe(5);
        manager.mark_saved(5);
        manager.observe(4);
        assert!(!manager.is_dirty());
    }

    #[test]
    fn test_edits_after_snapshot_stay_dirty() {
        let mut manager = immediate();
        manager.observe(2);
        manager.mark_saved(1);
        assert!(manager.is_dirty());
        manager.mark_saved(2);
        assert!(!manager.is_dirty());
    }

    #[test]
    fn test_failed_save_stays_dirty() {
        let mut manager = immediate();
        manager.observe(1);
        manager.mark_save_failed();
        assert!(manager.is_dirty());
        assert!(manager.should_save());
    }

    #[test]
    fn test_poll_snapshots_shared_store() {
        let shared = SharedProjectStore::new(ProjectStore::new("autosave"));
        let mut manager = immediate();
        assert!(manager.poll(&shared).is_none());

        let image = shared.with_mut(|store| {
            store.add_class("person");
            store.add_image(NewImage::new("a.jpg", 100, 100, "blob:a"))
        });
        let mut handle = shared.clone();
        handle.create_box(Rect::new(0.0, 0.0, 10.0, 10.0), 0, image);

        let snapshot = manager.poll(&shared).unwrap();
        assert_eq!(snapshot.file.boxes.len(), 1);
        manager.mark_saved(snapshot.revision);
        assert!(manager.poll(&shared).is_none());
    }
}
