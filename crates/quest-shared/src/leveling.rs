//! Leveling engine: cumulative XP to level, progress bar and tier title.
//!
//! All functions here are pure. The threshold table is ascending and
//! `LEVEL_THRESHOLDS[0]` is always 0, so every XP total maps to a level.

use crate::locale::Locale;

/// Cumulative XP needed to reach level `i + 1`
pub const LEVEL_THRESHOLDS: [u64; 30] = [
    0, 100, 220, 360, 520, // Lv 1-5: Beginner
    700, 900, 1120, 1360, 1620, // Lv 6-10: Apprentice
    1900, 2200, 2520, 2860, 3220, // Lv 11-15: Sailor
    3600, 4000, 4420, 4860, 5320, // Lv 16-20: Architect
    5800, 6300, 6820, 7360, 7920, // Lv 21-25: Maestro
    8500, 9100, 9720, 10360, 11020, // Lv 26-30: Master
];

/// Highest reachable level
pub const MAX_LEVEL: u32 = LEVEL_THRESHOLDS.len() as u32;

/// Level for a cumulative XP total (1-based, scanned top down)
pub fn level_for(total_xp: u64) -> u32 {
    LEVEL_THRESHOLDS
        .iter()
        .rposition(|&threshold| total_xp >= threshold)
        .map(|idx| idx as u32 + 1)
        .unwrap_or(1)
}

/// Progress inside the current level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelProgress {
    /// XP earned since the current level's threshold
    pub current: u64,
    /// XP span of the current level (0 at max level)
    pub needed: u64,
    /// current / needed, clamped to [0, 1]
    pub fraction: f64,
}

impl LevelProgress {
    /// Percentage for display (0-100)
    pub fn percent(&self) -> u8 {
        (self.fraction * 100.0).round() as u8
    }
}

pub fn progress_to_next(total_xp: u64) -> LevelProgress {
    let level = level_for(total_xp) as usize;
    let floor = LEVEL_THRESHOLDS[level - 1];
    // Last threshold is its own successor at max level
    let ceiling = LEVEL_THRESHOLDS
        .get(level)
        .copied()
        .unwrap_or(LEVEL_THRESHOLDS[LEVEL_THRESHOLDS.len() - 1]);

    let current = total_xp - floor;
    let needed = ceiling.saturating_sub(floor);
    let fraction = if needed == 0 {
        1.0
    } else {
        (current as f64 / needed as f64).min(1.0)
    };

    LevelProgress {
        current,
        needed,
        fraction,
    }
}

/// Named tier a level belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelTier {
    Beginner,
    Apprentice,
    Sailor,
    Architect,
    Maestro,
    Master,
}

impl LevelTier {
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=5 => LevelTier::Beginner,
            6..=10 => LevelTier::Apprentice,
            11..=15 => LevelTier::Sailor,
            16..=20 => LevelTier::Architect,
            21..=25 => LevelTier::Maestro,
            _ => LevelTier::Master,
        }
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        let (ja, en) = match self {
            LevelTier::Beginner => ("🐣 コンテナビギナー", "🐣 Container Beginner"),
            LevelTier::Apprentice => ("🐋 ドッカーアプレンティス", "🐋 Docker Apprentice"),
            LevelTier::Sailor => ("⚓ コンテナセーラー", "⚓ Container Sailor"),
            LevelTier::Architect => ("🏗️ イメージアーキテクト", "🏗️ Image Architect"),
            LevelTier::Maestro => ("🎼 コンポーズマエストロ", "🎼 Compose Maestro"),
            LevelTier::Master => ("🐳 ドッカーマスター", "🐳 Docker Master"),
        };
        match locale {
            Locale::Ja => ja,
            Locale::En => en,
        }
    }
}

pub fn title_for(level: u32, locale: Locale) -> &'static str {
    LevelTier::for_level(level).label(locale)
}
