//! File-backed store persistence and degraded mode.

use quest_shared::profile::ChapterStatus;
use quest_shared::{
    ChapterProgress, FileBackend, ProfilePatch, ProgressStore, UnavailableBackend, UserProfile,
};
use tempfile::tempdir;

#[test]
fn test_records_survive_reopen() {
    let dir = tempdir().unwrap();
    {
        let mut store = ProgressStore::new(FileBackend::new(dir.path()));
        store.add_xp(140);
        store.unlock_badge("first-container");
        let mut progress = ChapterProgress::not_started("2");
        progress.status = ChapterStatus::InProgress;
        store.save_progress("2", progress);
    }

    let store = ProgressStore::new(FileBackend::new(dir.path()));
    assert_eq!(store.get_xp(), 140);
    assert_eq!(store.get_profile().level, 2);
    assert_eq!(store.get_badges().len(), 1);
    assert_eq!(store.get_progress("2").status, ChapterStatus::InProgress);
    assert_eq!(store.get_all_progress().len(), 1);
    assert!(dir.path().join("dq-profile.json").exists());
    assert!(dir.path().join("dq-progress.json").exists());
    assert!(dir.path().join("dq-badges.json").exists());
}

#[test]
fn test_save_progress_overwrites_one_chapter() {
    let dir = tempdir().unwrap();
    let mut store = ProgressStore::new(FileBackend::new(dir.path()));
    store.save_progress("1", ChapterProgress::not_started("1"));
    store.save_progress("2", ChapterProgress::not_started("2"));

    let mut updated = ChapterProgress::not_started("1");
    updated.xp_earned = 40;
    store.save_progress("1", updated);

    assert_eq!(store.get_progress("1").xp_earned, 40);
    assert_eq!(store.get_progress("2").xp_earned, 0);
}

#[test]
fn test_save_profile_merges() {
    let dir = tempdir().unwrap();
    let mut store = ProgressStore::new(FileBackend::new(dir.path()));
    store.add_xp(30);
    store.save_profile(ProfilePatch {
        locale: Some(quest_shared::Locale::En),
        ..Default::default()
    });

    let profile = store.get_profile();
    assert_eq!(profile.total_xp, 30);
    assert_eq!(profile.locale, quest_shared::Locale::En);
}

#[test]
fn test_unavailable_storage_never_panics() {
    let mut store = ProgressStore::new(UnavailableBackend);
    assert_eq!(store.get_profile(), UserProfile::default());
    assert_eq!(store.record_activity(), 1);
    let badge = store.unlock_badge("x");
    assert_eq!(badge.id, "x");
    assert!(store.get_badges().is_empty());
    assert!(store.is_degraded());
}
