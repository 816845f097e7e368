//! Badge triggers and badge display.
//!
//! A trigger maps a completed chapter id to the badge it unlocks. Unlocking
//! itself lives in the store so it stays idempotent per badge id.

use std::collections::BTreeMap;

use crate::locale::{Locale, LocalizedText};
use crate::profile::Badge;

/// Badge unlocked by completing the first-container chapter
pub const FIRST_CONTAINER: &str = "first-container";

/// Completed chapter id -> badge id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeTriggers {
    by_chapter: BTreeMap<u32, String>,
}

impl Default for BadgeTriggers {
    fn default() -> Self {
        let mut triggers = Self::empty();
        triggers.insert(2, FIRST_CONTAINER);
        triggers
    }
}

impl BadgeTriggers {
    pub fn empty() -> Self {
        Self {
            by_chapter: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, chapter_id: u32, badge_id: &str) {
        self.by_chapter.insert(chapter_id, badge_id.to_string());
    }

    pub fn badge_for(&self, chapter_id: u32) -> Option<&str> {
        self.by_chapter.get(&chapter_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_chapter.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_chapter.is_empty()
    }
}

/// Display metadata for known badges
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeInfo {
    pub id: &'static str,
    pub symbol: &'static str,
    pub name: LocalizedText,
}

pub fn known_badges() -> Vec<BadgeInfo> {
    vec![BadgeInfo {
        id: FIRST_CONTAINER,
        symbol: "[🐳]",
        name: LocalizedText::new("はじめてのコンテナ", "First Container"),
    }]
}

/// Display line for a held badge; unknown ids fall back to the raw slug
pub fn describe_badge(badge: &Badge, locale: Locale) -> String {
    match known_badges().into_iter().find(|info| info.id == badge.id) {
        Some(info) => format!(
            "{} {} ({})",
            info.symbol,
            info.name.get(locale),
            badge.earned_at.format("%Y-%m-%d")
        ),
        None => format!(
            "[*] {} ({})",
            badge.slug,
            badge.earned_at.format("%Y-%m-%d")
        ),
    }
}

/// Compact one-line summary of held badges
pub fn format_badges(badges: &[Badge], max_display: usize) -> String {
    if badges.is_empty() {
        return String::new();
    }
    let known = known_badges();
    let symbols: Vec<&str> = badges
        .iter()
        .take(max_display)
        .map(|b| {
            known
                .iter()
                .find(|info| info.id == b.id)
                .map(|info| info.symbol)
                .unwrap_or("[*]")
        })
        .collect();

    if badges.len() > max_display {
        format!("{} +{} more", symbols.join(" "), badges.len() - max_display)
    } else {
        symbols.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_default_trigger() {
        let triggers = BadgeTriggers::default();
        assert_eq!(triggers.badge_for(2), Some(FIRST_CONTAINER));
        assert_eq!(triggers.badge_for(1), None);
        assert_eq!(triggers.len(), 1);
    }

    #[test]
    fn test_extensible_triggers() {
        let mut triggers = BadgeTriggers::default();
        triggers.insert(10, "compose-captain");
        assert_eq!(triggers.badge_for(10), Some("compose-captain"));
        assert_eq!(triggers.badge_for(2), Some(FIRST_CONTAINER));
    }

    #[test]
    fn test_format_badges() {
        let badges = vec![
            Badge::new(FIRST_CONTAINER, Utc::now()),
            Badge::new("mystery", Utc::now()),
        ];
        assert_eq!(format_badges(&badges, 5), "[🐳] [*]");
        assert_eq!(format_badges(&badges, 1), "[🐳] +1 more");
        assert_eq!(format_badges(&[], 3), "");
    }

    #[test]
    fn test_describe_unknown_badge() {
        let badge = Badge::new("mystery", Utc::now());
        assert!(describe_badge(&badge, Locale::En).contains("mystery"));
    }
}
