//! Learner profile, chapter progress and badge records.
//!
//! These are the three persisted record kinds. Field names serialize in
//! camelCase so blobs stay readable by other front-ends of the curriculum.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::locale::{Locale, Os};

/// The single local learner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    /// Always `level_for(total_xp)`
    pub level: u32,
    /// Mirrors `total_xp`
    pub xp: u64,
    #[serde(rename = "totalXP")]
    pub total_xp: u64,
    /// Consecutive active days
    pub streak: u32,
    /// Stored as "YYYY-MM-DD", or "" when never active
    #[serde(with = "date_or_empty")]
    pub last_active_date: Option<NaiveDate>,
    pub locale: Locale,
    pub os: Os,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            total_xp: 0,
            streak: 0,
            last_active_date: None,
            locale: Locale::Ja,
            os: Os::Windows,
        }
    }
}

/// Partial profile update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub level: Option<u32>,
    pub xp: Option<u64>,
    pub total_xp: Option<u64>,
    pub streak: Option<u32>,
    pub last_active_date: Option<NaiveDate>,
    pub locale: Option<Locale>,
    pub os: Option<Os>,
}

impl UserProfile {
    /// Shallow merge of a patch into this profile
    pub fn merge(&mut self, patch: ProfilePatch) {
        if let Some(level) = patch.level {
            self.level = level;
        }
        if let Some(xp) = patch.xp {
            self.xp = xp;
        }
        if let Some(total_xp) = patch.total_xp {
            self.total_xp = total_xp;
        }
        if let Some(streak) = patch.streak {
            self.streak = streak;
        }
        if let Some(date) = patch.last_active_date {
            self.last_active_date = Some(date);
        }
        if let Some(locale) = patch.locale {
            self.locale = locale;
        }
        if let Some(os) = patch.os {
            self.os = os;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChapterStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

/// Parts of a chapter a learner can work through
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Intro,
    Concept,
    Simulation,
    LocalPractice,
    Checkpoint,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Intro,
        Section::Concept,
        Section::Simulation,
        Section::LocalPractice,
        Section::Checkpoint,
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterProgress {
    pub chapter_id: String,
    pub status: ChapterStatus,
    #[serde(default)]
    pub sections_completed: BTreeSet<Section>,
    #[serde(rename = "xpEarned", default)]
    pub xp_earned: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ChapterProgress {
    pub fn not_started(chapter_id: impl Into<String>) -> Self {
        Self {
            chapter_id: chapter_id.into(),
            status: ChapterStatus::NotStarted,
            sections_completed: BTreeSet::new(),
            xp_earned: 0,
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ChapterStatus::Completed
    }
}

/// One-time achievement, unique per id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub slug: String,
    pub earned_at: DateTime<Utc>,
}

impl Badge {
    pub fn new(id: &str, earned_at: DateTime<Utc>) -> Self {
        Self {
            id: id.to_string(),
            slug: id.to_string(),
            earned_at,
        }
    }
}

mod date_or_empty {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format(FORMAT).to_string()),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = String::deserialize(d)?;
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(&raw, FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile() {
        let profile = UserProfile::default();
        assert_eq!(profile.level, 1);
        assert_eq!(profile.total_xp, 0);
        assert!(profile.last_active_date.is_none());
    }

    #[test]
    fn test_profile_json_shape() {
        let mut profile = UserProfile::default();
        profile.total_xp = 140;
        profile.last_active_date = NaiveDate::from_ymd_opt(2026, 10, 16);

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["totalXP"], 140);
        assert_eq!(json["lastActiveDate"], "2026-10-16");
        assert_eq!(json["locale"], "ja");
        assert_eq!(json["os"], "windows");
    }

    #[test]
    fn test_empty_date_reads_as_none() {
        let json = r#"{"level":1,"xp":0,"totalXP":0,"streak":0,
            "lastActiveDate":"","locale":"en","os":"mac"}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert!(profile.last_active_date.is_none());
        assert_eq!(profile.locale, Locale::En);
        assert_eq!(profile.os, Os::Mac);
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut profile = UserProfile::default();
        profile.streak = 4;
        profile.merge(ProfilePatch {
            total_xp: Some(20),
            xp: Some(20),
            ..Default::default()
        });
        assert_eq!(profile.total_xp, 20);
        assert_eq!(profile.streak, 4);
    }

    #[test]
    fn test_progress_status_serialization() {
        let progress = ChapterProgress::not_started("3");
        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["status"], "not_started");
        assert_eq!(json["chapterId"], "3");
        assert!(json.get("completedAt").is_none());
    }
}
