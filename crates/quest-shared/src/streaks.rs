//! Daily activity streaks.
//!
//! Days are compared as calendar dates supplied by a [`Clock`]. The default
//! clock uses the device-local date, so a streak day ends at local midnight.

use chrono::{Local, NaiveDate};

/// Source of "today" for streak bookkeeping
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Device-local calendar date
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Result of recording activity for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub streak: u32,
    pub last_active_date: NaiveDate,
    /// False when activity was already recorded today
    pub changed: bool,
}

/// Apply one day of activity to a streak
pub fn advance_streak(
    streak: u32,
    last_active: Option<NaiveDate>,
    today: NaiveDate,
) -> StreakUpdate {
    if last_active == Some(today) {
        return StreakUpdate {
            streak,
            last_active_date: today,
            changed: false,
        };
    }

    let consecutive = last_active
        .and_then(|last| last.succ_opt())
        .map(|next| next == today)
        .unwrap_or(false);

    let streak = if consecutive { streak + 1 } else { 1 };

    StreakUpdate {
        streak,
        last_active_date: today,
        changed: true,
    }
}
