//! Chapter completion: bonus XP, completed progress record, trigger badge.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::badges::BadgeTriggers;
use crate::catalog::Chapter;
use crate::profile::{Badge, ChapterProgress, ChapterStatus, Section};
use crate::store::{ProgressStore, XpAward};

/// What to do when a chapter is completed a second time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionPolicy {
    /// Skip XP and keep the first completion record
    #[default]
    Guarded,
    /// Re-award XP and overwrite the record every time
    AllowRepeat,
}

/// Everything needed to complete a chapter, detached from the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub chapter_id: u32,
    pub completion_xp: u64,
    pub badge: Option<String>,
    /// Checkpoint bonus paid together with the completion XP
    pub checkpoint_xp: u64,
    pub policy: CompletionPolicy,
}

impl CompletionRequest {
    pub fn new(chapter: &Chapter, triggers: &BadgeTriggers, policy: CompletionPolicy) -> Self {
        Self {
            chapter_id: chapter.id,
            completion_xp: chapter.completion_xp,
            badge: triggers.badge_for(chapter.id).map(str::to_string),
            checkpoint_xp: 0,
            policy,
        }
    }

    /// Pay a checkpoint bonus under the same repeat guard as the completion XP
    pub fn with_checkpoint_bonus(mut self, xp: u64) -> Self {
        self.checkpoint_xp = xp;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionReport {
    /// None when the guard skipped the award
    pub xp: Option<XpAward>,
    /// Checkpoint bonus included in `xp`, zero when skipped
    pub checkpoint_xp: u64,
    pub progress: ChapterProgress,
    pub badge: Option<Badge>,
    pub already_completed: bool,
}

pub fn complete_chapter(
    store: &mut ProgressStore,
    request: &CompletionRequest,
    now: DateTime<Utc>,
) -> CompletionReport {
    let key = request.chapter_id.to_string();
    let existing = store.get_progress(&key);
    let already_completed = existing.is_completed();

    let guarded = already_completed && request.policy == CompletionPolicy::Guarded;
    let (xp, checkpoint_xp, progress) = if guarded {
        info!(
            chapter = request.chapter_id,
            "chapter already completed, no bonus"
        );
        (None, 0, existing)
    } else {
        let award = store.add_xp(request.completion_xp + request.checkpoint_xp);
        let progress = ChapterProgress {
            chapter_id: key.clone(),
            status: ChapterStatus::Completed,
            sections_completed: Section::ALL.into_iter().collect(),
            xp_earned: request.completion_xp,
            completed_at: Some(now),
        };
        store.save_progress(&key, progress.clone());
        info!(
            chapter = request.chapter_id,
            xp = request.completion_xp,
            checkpoint = request.checkpoint_xp,
            total = award.new_total_xp,
            "chapter completed"
        );
        (Some(award), request.checkpoint_xp, progress)
    };

    let badge = request.badge.as_deref().map(|id| store.unlock_badge(id));

    CompletionReport {
        xp,
        checkpoint_xp,
        progress,
        badge,
        already_completed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badges::FIRST_CONTAINER;
    use crate::catalog::Catalog;
    use crate::storage::MemoryBackend;

    fn request(id: u32, policy: CompletionPolicy) -> CompletionRequest {
        let catalog = Catalog::builtin().unwrap();
        CompletionRequest::new(catalog.get(id).unwrap(), &BadgeTriggers::default(), policy)
    }

    #[test]
    fn test_completion_awards_and_records() {
        let mut store = ProgressStore::new(MemoryBackend::new());
        let req = request(1, CompletionPolicy::Guarded);
        let report = complete_chapter(&mut store, &req, Utc::now());

        assert_eq!(report.xp.unwrap().new_total_xp, 100);
        assert!(report.xp.unwrap().leveled_up);
        assert!(report.badge.is_none());
        assert!(!report.already_completed);

        let progress = store.get_progress("1");
        assert_eq!(progress.status, ChapterStatus::Completed);
        assert_eq!(progress.sections_completed.len(), 5);
        assert_eq!(progress.xp_earned, 100);
        assert!(progress.completed_at.is_some());
    }

    #[test]
    fn test_trigger_chapter_unlocks_badge() {
        let mut store = ProgressStore::new(MemoryBackend::new());
        let req = request(2, CompletionPolicy::Guarded);
        let report = complete_chapter(&mut store, &req, Utc::now());
        assert_eq!(report.badge.unwrap().id, FIRST_CONTAINER);
        assert_eq!(store.get_badges().len(), 1);
    }

    #[test]
    fn test_guarded_repeat_is_noop() {
        let mut store = ProgressStore::new(MemoryBackend::new());
        let req = request(2, CompletionPolicy::Guarded);
        let first = complete_chapter(&mut store, &req, Utc::now());
        let second = complete_chapter(&mut store, &req, Utc::now());

        assert!(second.already_completed);
        assert!(second.xp.is_none());
        assert_eq!(second.progress.completed_at, first.progress.completed_at);
        assert_eq!(store.get_xp(), 100);
        assert_eq!(store.get_badges().len(), 1);
    }

    #[test]
    fn test_allow_repeat_readds_xp() {
        let mut store = ProgressStore::new(MemoryBackend::new());
        let req = request(1, CompletionPolicy::AllowRepeat);
        complete_chapter(&mut store, &req, Utc::now());
        let second = complete_chapter(&mut store, &req, Utc::now());

        assert!(second.already_completed);
        assert_eq!(second.xp.unwrap().new_total_xp, 200);
        assert_eq!(store.get_xp(), 200);
    }

    #[test]
    fn test_checkpoint_bonus_paid_once() {
        let mut store = ProgressStore::new(MemoryBackend::new());
        let req = request(2, CompletionPolicy::Guarded);
        let req = req.with_checkpoint_bonus(30);
        let first = complete_chapter(&mut store, &req, Utc::now());
        let second = complete_chapter(&mut store, &req, Utc::now());

        assert_eq!(first.checkpoint_xp, 30);
        assert_eq!(first.xp.unwrap().new_total_xp, 130);
        assert_eq!(first.progress.xp_earned, 100);
        assert_eq!(second.checkpoint_xp, 0);
        assert!(second.xp.is_none());
        assert_eq!(store.get_xp(), 130);
    }

    #[test]
    fn test_allow_repeat_pays_bonus_again() {
        let mut store = ProgressStore::new(MemoryBackend::new());
        let req = request(1, CompletionPolicy::AllowRepeat);
        let req = req.with_checkpoint_bonus(30);
        complete_chapter(&mut store, &req, Utc::now());
        let second = complete_chapter(&mut store, &req, Utc::now());

        assert_eq!(second.checkpoint_xp, 30);
        assert_eq!(store.get_xp(), 260);
    }
}
