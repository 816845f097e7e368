//! Shared engines for Docker Quest.
//!
//! Leveling, streaks, the progress store and its ordered worker, the chapter
//! catalog, the practice-terminal state machine, the checkpoint quiz and
//! chapter completion. Front-ends compose these; nothing here does I/O to
//! the terminal.

pub mod badges;
pub mod catalog;
pub mod checkpoint;
pub mod completion;
pub mod config;
pub mod error;
pub mod leveling;
pub mod locale;
pub mod profile;
pub mod rewards;
pub mod simulation;
pub mod storage;
pub mod store;
pub mod store_worker;
pub mod streaks;

pub use badges::BadgeTriggers;
pub use catalog::{Catalog, Chapter, CheckpointQuestion, SimulationStep};
pub use checkpoint::{CheckpointQuiz, QuizAnswer};
pub use completion::{complete_chapter, CompletionPolicy, CompletionReport, CompletionRequest};
pub use config::QuestConfig;
pub use error::QuestError;
pub use leveling::{level_for, progress_to_next, title_for, LevelProgress, LEVEL_THRESHOLDS};
pub use locale::{Locale, LocalizedText, Os};
pub use profile::{Badge, ChapterProgress, ChapterStatus, ProfilePatch, Section, UserProfile};
pub use rewards::XP_TABLE;
pub use simulation::{Advance, Simulation, SimState, Submission, TranscriptEntry};
pub use storage::{FileBackend, KeyValueBackend, MemoryBackend, UnavailableBackend};
pub use store::{ProgressStore, XpAward};
pub use store_worker::{PendingAward, StoreHandle, StoreWorker};
pub use streaks::{Clock, FixedClock, LocalClock};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
