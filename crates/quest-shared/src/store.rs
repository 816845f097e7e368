//! Progress store for the local learner.
//!
//! Three records live under namespaced keys: `profile`, `progress`
//! (chapter id -> ChapterProgress) and `badges`. Reads never fail: a missing,
//! unreadable or malformed record yields defaults. Failed writes are dropped
//! and latch the degraded flag so the front-end can warn that nothing will
//! survive the session.
//!
//! Every mutation takes `&mut self`, so a read-modify-write cannot interleave
//! with another operation on the same store.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use crate::error::QuestError;
use crate::leveling::level_for;
use crate::profile::{Badge, ChapterProgress, ProfilePatch, UserProfile};
use crate::storage::KeyValueBackend;
use crate::streaks::{advance_streak, Clock, LocalClock};

const PROFILE_KEY: &str = "profile";
const PROGRESS_KEY: &str = "progress";
const BADGES_KEY: &str = "badges";

/// Outcome of an XP award
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpAward {
    pub new_total_xp: u64,
    pub leveled_up: bool,
    pub new_level: u32,
}

pub struct ProgressStore {
    backend: Box<dyn KeyValueBackend>,
    clock: Box<dyn Clock>,
    degraded: AtomicBool,
}

impl ProgressStore {
    pub fn new(backend: impl KeyValueBackend + 'static) -> Self {
        Self::with_clock(backend, LocalClock)
    }

    pub fn with_clock(
        backend: impl KeyValueBackend + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        Self {
            backend: Box::new(backend),
            clock: Box::new(clock),
            degraded: AtomicBool::new(false),
        }
    }

    /// True once any persistence call has failed this session
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    pub fn backend_name(&self) -> String {
        self.backend.describe()
    }

    fn read_record<T: DeserializeOwned>(&self, key: &str, fallback: impl FnOnce() -> T) -> T {
        match self.backend.read(key) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    warn!(key, error = %e, "malformed record, using defaults");
                    fallback()
                }
            },
            Ok(None) => fallback(),
            // Not UTF-8: the record is corrupt, the backend still works
            Err(QuestError::Io(e)) if e.kind() == ErrorKind::InvalidData => {
                warn!(key, error = %e, "unreadable record, using defaults");
                fallback()
            }
            Err(e) => {
                self.mark_degraded(key, &e.to_string());
                fallback()
            }
        }
    }

    fn write_record<T: Serialize>(&self, key: &str, value: &T) {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                self.mark_degraded(key, &e.to_string());
                return;
            }
        };
        if let Err(e) = self.backend.write(key, &json) {
            self.mark_degraded(key, &e.to_string());
        }
    }

    fn mark_degraded(&self, key: &str, error: &str) {
        if !self.degraded.swap(true, Ordering::Relaxed) {
            warn!(
                key,
                error,
                backend = %self.backend.describe(),
                "persistence unavailable, progress will not be saved"
            );
        } else {
            debug!(key, error, "persistence call dropped");
        }
    }

    pub fn get_profile(&self) -> UserProfile {
        self.read_record(PROFILE_KEY, UserProfile::default)
    }

    pub fn save_profile(&mut self, patch: ProfilePatch) {
        let mut profile = self.get_profile();
        profile.merge(patch);
        self.write_record(PROFILE_KEY, &profile);
    }

    pub fn get_progress(&self, chapter_id: &str) -> ChapterProgress {
        self.get_all_progress()
            .remove(chapter_id)
            .unwrap_or_else(|| ChapterProgress::not_started(chapter_id))
    }

    pub fn get_all_progress(&self) -> BTreeMap<String, ChapterProgress> {
        self.read_record(PROGRESS_KEY, BTreeMap::new)
    }

    /// Full overwrite of one chapter's record
    pub fn save_progress(&mut self, chapter_id: &str, progress: ChapterProgress) {
        let mut all = self.get_all_progress();
        all.insert(chapter_id.to_string(), progress);
        self.write_record(PROGRESS_KEY, &all);
    }

    pub fn get_xp(&self) -> u64 {
        self.get_profile().total_xp
    }

    pub fn add_xp(&mut self, amount: u64) -> XpAward {
        let profile = self.get_profile();
        let old_level = profile.level;
        let new_total_xp = profile.total_xp.saturating_add(amount);
        let new_level = level_for(new_total_xp);

        self.save_profile(ProfilePatch {
            total_xp: Some(new_total_xp),
            xp: Some(new_total_xp),
            level: Some(new_level),
            ..Default::default()
        });

        let leveled_up = new_level > old_level;
        if leveled_up {
            info!(new_level, new_total_xp, "level up");
        } else {
            debug!(amount, new_total_xp, "xp added");
        }

        XpAward {
            new_total_xp,
            leveled_up,
            new_level,
        }
    }

    pub fn get_badges(&self) -> Vec<Badge> {
        self.read_record(BADGES_KEY, Vec::new)
    }

    /// Returns the held badge unchanged if it was already unlocked
    pub fn unlock_badge(&mut self, badge_id: &str) -> Badge {
        let mut badges = self.get_badges();
        if let Some(existing) = badges.iter().find(|b| b.id == badge_id) {
            return existing.clone();
        }
        let badge = Badge::new(badge_id, Utc::now());
        badges.push(badge.clone());
        self.write_record(BADGES_KEY, &badges);
        info!(badge = badge_id, "badge unlocked");
        badge
    }

    pub fn get_streak(&self) -> u32 {
        self.get_profile().streak
    }

    /// Record today's activity and return the resulting streak
    pub fn record_activity(&mut self) -> u32 {
        let profile = self.get_profile();
        let today = self.clock.today();
        let update = advance_streak(profile.streak, profile.last_active_date, today);
        if update.changed {
            self.save_profile(ProfilePatch {
                streak: Some(update.streak),
                last_active_date: Some(update.last_active_date),
                ..Default::default()
            });
        }
        update.streak
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileBackend, MemoryBackend, UnavailableBackend};
    use crate::streaks::FixedClock;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn memory_store() -> ProgressStore {
        ProgressStore::new(MemoryBackend::new())
    }

    #[test]
    fn test_defaults_when_empty() {
        let store = memory_store();
        assert_eq!(store.get_profile(), UserProfile::default());
        assert_eq!(store.get_progress("1"), ChapterProgress::not_started("1"));
        assert!(store.get_badges().is_empty());
        assert!(!store.is_degraded());
    }

    #[test]
    fn test_add_xp_keeps_level_in_sync() {
        let mut store = memory_store();
        let award = store.add_xp(40);
        assert_eq!(award.new_total_xp, 40);
        assert!(!award.leveled_up);

        let award = store.add_xp(100);
        assert_eq!(award.new_total_xp, 140);
        assert_eq!(award.new_level, 2);
        assert!(award.leveled_up);

        let profile = store.get_profile();
        assert_eq!(profile.level, level_for(profile.total_xp));
        assert_eq!(profile.xp, profile.total_xp);
    }

    #[test]
    fn test_unlock_badge_once() {
        let mut store = memory_store();
        let first = store.unlock_badge("x");
        let second = store.unlock_badge("x");
        assert_eq!(first, second);
        assert_eq!(store.get_badges().len(), 1);
    }

    #[test]
    fn test_record_activity_with_clock() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let mut store = ProgressStore::with_clock(MemoryBackend::new(), FixedClock(day));
        assert_eq!(store.record_activity(), 1);
        assert_eq!(store.record_activity(), 1);
        assert_eq!(store.get_profile().last_active_date, Some(day));
    }

    #[test]
    fn test_unavailable_backend_degrades() {
        let mut store = ProgressStore::new(UnavailableBackend);
        assert_eq!(store.get_profile(), UserProfile::default());
        assert!(store.is_degraded());

        let award = store.add_xp(20);
        assert_eq!(award.new_total_xp, 20);
        // Write was dropped
        assert_eq!(store.get_xp(), 0);
    }

    #[test]
    fn test_malformed_record_falls_back() {
        let backend = MemoryBackend::new();
        backend.write("profile", "not json").unwrap();
        let store = ProgressStore::new(backend);
        assert_eq!(store.get_profile(), UserProfile::default());
        assert!(!store.is_degraded());
    }

    #[test]
    fn test_non_utf8_record_falls_back() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("dq-badges.json"), [0xff, 0xfe, 0x00]).unwrap();
        let mut store = ProgressStore::new(FileBackend::new(dir.path()));

        assert!(store.get_badges().is_empty());
        assert!(!store.is_degraded());
        store.add_xp(20);
        assert_eq!(store.get_xp(), 20);
        assert!(!store.is_degraded());
    }
}
