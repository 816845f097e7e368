//! Ordered, non-blocking access to the progress store.
//!
//! The store is moved into a single tokio task. Handles send commands over
//! an unbounded mpsc channel, so mutations are applied in exactly the order
//! they were issued. A caller can fire an XP award and keep going; the
//! returned [`PendingAward`] may be awaited later or simply dropped.

use chrono::Utc;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::completion::{complete_chapter, CompletionReport, CompletionRequest};
use crate::error::{QuestError, Result};
use crate::profile::{Badge, ChapterProgress, ProfilePatch, UserProfile};
use crate::store::{ProgressStore, XpAward};

enum StoreCommand {
    GetProfile(oneshot::Sender<UserProfile>),
    SaveProfile(ProfilePatch),
    GetProgress(String, oneshot::Sender<ChapterProgress>),
    GetAllProgress(oneshot::Sender<BTreeMap<String, ChapterProgress>>),
    SaveProgress(String, ChapterProgress),
    AddXp(u64, oneshot::Sender<XpAward>),
    GetBadges(oneshot::Sender<Vec<Badge>>),
    UnlockBadge(String, oneshot::Sender<Badge>),
    RecordActivity(oneshot::Sender<u32>),
    CompleteChapter(CompletionRequest, oneshot::Sender<CompletionReport>),
    IsDegraded(oneshot::Sender<bool>),
}

pub struct StoreWorker;

impl StoreWorker {
    /// Move the store into a background task; must run inside a tokio runtime
    pub fn spawn(store: ProgressStore) -> (StoreHandle, JoinHandle<ProgressStore>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(Self::run(store, rx));
        (StoreHandle { tx }, task)
    }

    async fn run(
        mut store: ProgressStore,
        mut rx: mpsc::UnboundedReceiver<StoreCommand>,
    ) -> ProgressStore {
        debug!(backend = %store.backend_name(), "store worker started");
        while let Some(cmd) = rx.recv().await {
            // A dropped receiver just means the caller did not wait
            match cmd {
                StoreCommand::GetProfile(reply) => {
                    let _ = reply.send(store.get_profile());
                }
                StoreCommand::SaveProfile(patch) => store.save_profile(patch),
                StoreCommand::GetProgress(id, reply) => {
                    let _ = reply.send(store.get_progress(&id));
                }
                StoreCommand::GetAllProgress(reply) => {
                    let _ = reply.send(store.get_all_progress());
                }
                StoreCommand::SaveProgress(id, progress) => store.save_progress(&id, progress),
                StoreCommand::AddXp(amount, reply) => {
                    let _ = reply.send(store.add_xp(amount));
                }
                StoreCommand::GetBadges(reply) => {
                    let _ = reply.send(store.get_badges());
                }
                StoreCommand::UnlockBadge(id, reply) => {
                    let _ = reply.send(store.unlock_badge(&id));
                }
                StoreCommand::RecordActivity(reply) => {
                    let _ = reply.send(store.record_activity());
                }
                StoreCommand::CompleteChapter(request, reply) => {
                    let _ = reply.send(complete_chapter(&mut store, &request, Utc::now()));
                }
                StoreCommand::IsDegraded(reply) => {
                    let _ = reply.send(store.is_degraded());
                }
            }
        }
        debug!("store worker stopped");
        store
    }
}

/// XP award issued to the worker but not necessarily applied yet
pub struct PendingAward {
    rx: oneshot::Receiver<XpAward>,
}

impl Future for PendingAward {
    type Output = Result<XpAward>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|r| r.map_err(|_| QuestError::WorkerStopped))
    }
}

#[derive(Clone)]
pub struct StoreHandle {
    tx: mpsc::UnboundedSender<StoreCommand>,
}

impl StoreHandle {
    fn send(&self, cmd: StoreCommand) -> Result<()> {
        self.tx.send(cmd).map_err(|_| QuestError::WorkerStopped)
    }

    async fn ask<T>(&self, make: impl FnOnce(oneshot::Sender<T>) -> StoreCommand) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.send(make(reply))?;
        rx.await.map_err(|_| QuestError::WorkerStopped)
    }

    /// Queue an XP award without waiting for it
    pub fn add_xp(&self, amount: u64) -> PendingAward {
        let (reply, rx) = oneshot::channel();
        // If the worker is gone the reply sender drops and the award resolves to an error
        let _ = self.send(StoreCommand::AddXp(amount, reply));
        PendingAward { rx }
    }

    pub fn save_profile(&self, patch: ProfilePatch) -> Result<()> {
        self.send(StoreCommand::SaveProfile(patch))
    }

    pub fn save_progress(&self, chapter_id: &str, progress: ChapterProgress) -> Result<()> {
        self.send(StoreCommand::SaveProgress(chapter_id.to_string(), progress))
    }

    pub async fn profile(&self) -> Result<UserProfile> {
        self.ask(StoreCommand::GetProfile).await
    }

    pub async fn progress(&self, chapter_id: &str) -> Result<ChapterProgress> {
        let id = chapter_id.to_string();
        self.ask(|reply| StoreCommand::GetProgress(id, reply)).await
    }

    pub async fn all_progress(&self) -> Result<BTreeMap<String, ChapterProgress>> {
        self.ask(StoreCommand::GetAllProgress).await
    }

    pub async fn badges(&self) -> Result<Vec<Badge>> {
        self.ask(StoreCommand::GetBadges).await
    }

    pub async fn unlock_badge(&self, badge_id: &str) -> Result<Badge> {
        let id = badge_id.to_string();
        self.ask(|reply| StoreCommand::UnlockBadge(id, reply)).await
    }

    pub async fn record_activity(&self) -> Result<u32> {
        self.ask(StoreCommand::RecordActivity).await
    }

    pub async fn complete_chapter(&self, request: CompletionRequest) -> Result<CompletionReport> {
        self.ask(|reply| StoreCommand::CompleteChapter(request, reply)).await
    }

    pub async fn is_degraded(&self) -> Result<bool> {
        self.ask(StoreCommand::IsDegraded).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;

    #[tokio::test]
    async fn test_awards_apply_in_order() {
        let (handle, task) = StoreWorker::spawn(ProgressStore::new(MemoryBackend::new()));

        let pending: Vec<_> = (0..10).map(|_| handle.add_xp(10)).collect();
        let mut totals = Vec::new();
        for award in pending {
            totals.push(award.await.unwrap().new_total_xp);
        }
        assert_eq!(totals, (1..=10).map(|i| i * 10).collect::<Vec<u64>>());

        drop(handle);
        let store = task.await.unwrap();
        assert_eq!(store.get_xp(), 100);
    }

    #[tokio::test]
    async fn test_dropped_award_still_applies() {
        let (handle, _task) = StoreWorker::spawn(ProgressStore::new(MemoryBackend::new()));
        drop(handle.add_xp(20));
        let profile = handle.profile().await.unwrap();
        assert_eq!(profile.total_xp, 20);
    }

    #[tokio::test]
    async fn test_stopped_worker_reports_error() {
        let (handle, task) = StoreWorker::spawn(ProgressStore::new(MemoryBackend::new()));
        task.abort();
        let _ = task.await;
        let result = handle.add_xp(5).await;
        assert!(matches!(result, Err(QuestError::WorkerStopped)));
        assert!(handle.profile().await.is_err());
    }
}
