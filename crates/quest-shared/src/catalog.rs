//! Chapter catalog: the read-only curriculum content.
//!
//! The engines only depend on the shape defined here. A catalog ships with
//! the crate (`data/chapters.json`) and can be replaced by any JSON file of
//! the same shape.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{QuestError, Result};
use crate::locale::LocalizedText;

const BUILTIN_CATALOG: &str = include_str!("../data/chapters.json");

/// One exact-match command exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStep {
    pub prompt: LocalizedText,
    pub expected_command: String,
    #[serde(default)]
    pub alternative_commands: Vec<String>,
    /// Canned output shown on success
    pub output: String,
    pub hint: LocalizedText,
    pub xp: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointQuestion {
    pub question: LocalizedText,
    pub options: Vec<LocalizedText>,
    pub correct_index: usize,
    pub explanation: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterIntro {
    pub overview: LocalizedText,
    pub why: LocalizedText,
    pub before: LocalizedText,
    pub after: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalPractice {
    pub instructions: LocalizedText,
    pub commands: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: u32,
    pub slug: String,
    /// Course tier the chapter belongs to
    pub level: u32,
    pub icon: String,
    pub title: LocalizedText,
    pub intro: ChapterIntro,
    pub goals: Vec<LocalizedText>,
    pub concept: LocalizedText,
    pub simulation: Vec<SimulationStep>,
    pub local_practice: LocalPractice,
    pub checkpoint: Vec<CheckpointQuestion>,
    pub completion_xp: u64,
}

impl Chapter {
    /// Progress records are keyed by the chapter id as a string
    pub fn progress_key(&self) -> String {
        self.id.to_string()
    }

    /// The single checkpoint question shown at the end of the chapter
    pub fn checkpoint_question(&self) -> Option<&CheckpointQuestion> {
        self.checkpoint.first()
    }

    pub fn simulation_xp(&self) -> u64 {
        self.simulation.iter().map(|s| s.xp).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    chapters: Vec<Chapter>,
}

impl Catalog {
    /// Catalog bundled with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let catalog = Self::from_json(&raw)?;
        debug!(path = %path.display(), chapters = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(raw)
            .map_err(|e| QuestError::Catalog(format!("invalid catalog: {}", e)))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_chapters(chapters: Vec<Chapter>) -> Result<Self> {
        let catalog = Self { chapters };
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for chapter in &self.chapters {
            if !seen.insert(chapter.id) {
                return Err(QuestError::Catalog(format!(
                    "duplicate chapter id {}",
                    chapter.id
                )));
            }
            if chapter.simulation.is_empty() {
                return Err(QuestError::Catalog(format!(
                    "chapter {} has no simulation steps",
                    chapter.id
                )));
            }
            for question in &chapter.checkpoint {
                if question.correct_index >= question.options.len() {
                    return Err(QuestError::Catalog(format!(
                        "chapter {} checkpoint answer {} out of range ({} options)",
                        chapter.id,
                        question.correct_index,
                        question.options.len()
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    pub fn get(&self, id: u32) -> Result<&Chapter> {
        self.chapters
            .iter()
            .find(|c| c.id == id)
            .ok_or(QuestError::ChapterNotFound(id))
    }

    pub fn by_level(&self, level: u32) -> Vec<&Chapter> {
        self.chapters.iter().filter(|c| c.level == level).collect()
    }

    pub fn ids(&self) -> Vec<u32> {
        self.chapters.iter().map(|c| c.id).collect()
    }

    /// Course tiers present in the catalog, ascending
    pub fn levels(&self) -> Vec<u32> {
        let levels: BTreeSet<u32> = self.chapters.iter().map(|c| c.level).collect();
        levels.into_iter().collect()
    }

    pub fn next_after(&self, id: u32) -> Option<&Chapter> {
        let pos = self.chapters.iter().position(|c| c.id == id)?;
        self.chapters.get(pos + 1)
    }
}
