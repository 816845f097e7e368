//! Terminal output helpers: headers, XP bar, transcript lines.

use owo_colors::OwoColorize;
use std::io::{self, Write};

use quest_shared::leveling::{progress_to_next, title_for};
use quest_shared::simulation::TranscriptEntry;
use quest_shared::{Locale, UserProfile};

use crate::text::texts;

pub mod symbols {
    pub const PROGRESS_FULL: &str = "█";
    pub const PROGRESS_EMPTY: &str = "░";
}

pub const HR: &str = "──────────────────────────────────────────────────────────────";

pub fn print_header(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", title.bold())?;
    writeln!(out, "{}", HR.dimmed())
}

pub fn print_kv(out: &mut impl Write, key: &str, value: &str, key_width: usize) -> io::Result<()> {
    writeln!(out, "  {:width$} {}", key, value, width = key_width)
}

/// Format a progress bar
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0)) * width as f64) as usize;
    let empty = width.saturating_sub(filled);
    format!(
        "[{}{}]",
        symbols::PROGRESS_FULL.repeat(filled),
        symbols::PROGRESS_EMPTY.repeat(empty)
    )
}

/// One-line XP footer: level, bar, current/needed, badges, streak
pub fn xp_line(profile: &UserProfile, badge_count: usize, locale: Locale) -> String {
    let t = texts(locale);
    let progress = progress_to_next(profile.total_xp);
    let mut line = format!(
        "📊 Lv.{} {} {}/{} XP  🏆×{}",
        profile.level,
        progress_bar(progress.fraction, 20),
        progress.current,
        progress.needed,
        badge_count
    );
    if profile.streak > 0 {
        line.push_str(&format!("  🔥{}{}", profile.streak, t.days));
    }
    line
}

pub fn level_title(profile: &UserProfile, locale: Locale) -> &'static str {
    title_for(profile.level, locale)
}

pub fn print_transcript_entry(
    out: &mut impl Write,
    entry: &TranscriptEntry,
    locale: Locale,
) -> io::Result<()> {
    let t = texts(locale);
    match entry {
        TranscriptEntry::Prompt(text) => writeln!(out, "💡 {}", text.cyan()),
        TranscriptEntry::Command(cmd) => writeln!(out, "$ {}", cmd.bold()),
        TranscriptEntry::Output(text) => writeln!(out, "{}", text.dimmed()),
        TranscriptEntry::Success { xp } => {
            let line = format!("{} +{}XP", t.success, xp);
            writeln!(out, "{}", line.green())
        }
        TranscriptEntry::Error { command } => {
            let line = format!("bash: {}: {}", command, t.not_found);
            writeln!(out, "{}", line.red())
        }
        TranscriptEntry::TryAgain => writeln!(out, "💡 {}", t.try_again.yellow()),
    }
}
