//! Non-interactive commands: status, chapter list, chapter view, badges.

use anyhow::Result;
use owo_colors::OwoColorize;
use std::io::Write;

use quest_shared::badges::{describe_badge, format_badges};
use quest_shared::{
    Chapter, ChapterStatus, CompletionReport, CompletionRequest, Locale, Os, ProfilePatch,
    QuestError,
};

use crate::app::App;
use crate::text::texts;
use crate::ui;

const KEY_WIDTH: usize = 16;

pub async fn status(app: &App, out: &mut impl Write) -> Result<()> {
    let t = texts(app.locale);
    let profile = app.store.profile().await?;
    let badges = app.store.badges().await?;
    let all = app.store.all_progress().await?;
    let done = app
        .catalog
        .chapters()
        .iter()
        .filter(|c| all.get(&c.progress_key()).is_some_and(|p| p.is_completed()))
        .count();

    ui::print_header(out, "🐳 Docker Quest")?;
    let title = ui::level_title(&profile, app.locale);
    let level = format!("{} {}", profile.level, title);
    let streak = format!("🔥 {} {}", profile.streak, t.days);
    let chapters = format!("{}/{}", done, app.catalog.len());

    ui::print_kv(out, t.level, &level, KEY_WIDTH)?;
    ui::print_kv(out, "XP", &profile.total_xp.to_string(), KEY_WIDTH)?;
    ui::print_kv(out, t.streak, &streak, KEY_WIDTH)?;
    ui::print_kv(out, t.badges, &format_badges(&badges, 5), KEY_WIDTH)?;
    ui::print_kv(out, t.chapters, &chapters, KEY_WIDTH)?;
    writeln!(out)?;
    writeln!(out, "{}", ui::xp_line(&profile, badges.len(), app.locale))?;
    Ok(())
}

pub async fn chapters(app: &App, out: &mut impl Write) -> Result<()> {
    let t = texts(app.locale);
    let all = app.store.all_progress().await?;
    for level in app.catalog.levels() {
        ui::print_header(out, &format!("{} {}", t.level, level))?;
        for chapter in app.catalog.by_level(level) {
            let status = all
                .get(&chapter.progress_key())
                .map(|p| p.status)
                .unwrap_or_default();
            let mark = match status {
                ChapterStatus::Completed => "✔".green().to_string(),
                ChapterStatus::InProgress => "…".yellow().to_string(),
                ChapterStatus::NotStarted => "·".dimmed().to_string(),
            };
            writeln!(
                out,
                "  {} {:>2}. {} {}",
                mark,
                chapter.id,
                chapter.icon,
                chapter.title.get(app.locale)
            )?;
        }
    }
    Ok(())
}

pub fn show(app: &App, chapter: &Chapter, out: &mut impl Write) -> Result<()> {
    let t = texts(app.locale);
    let l = app.locale;

    let title = chapter.title.get(l);
    ui::print_header(out, &format!("{} {}. {}", chapter.icon, chapter.id, title))?;
    writeln!(out, "{}", t.intro.bold())?;
    writeln!(out, "{}", chapter.intro.overview.get(l))?;
    writeln!(out)?;
    writeln!(out, "{}", t.why.bold())?;
    writeln!(out, "{}", chapter.intro.why.get(l))?;
    writeln!(out)?;
    writeln!(out, "{} {}", "✗".red(), t.before.bold())?;
    writeln!(out, "  {}", chapter.intro.before.get(l))?;
    writeln!(out, "{} {}", "✓".green(), t.after.bold())?;
    writeln!(out, "  {}", chapter.intro.after.get(l))?;

    ui::print_header(out, &format!("🎯 {}", t.goals))?;
    for goal in &chapter.goals {
        writeln!(out, "  • {}", goal.get(l))?;
    }

    ui::print_header(out, "📖")?;
    writeln!(out, "{}", chapter.concept.get(l))?;

    let terminal = app.os.terminal_name();
    ui::print_header(out, &format!("💻 {} ({})", t.local_practice, terminal))?;
    let practice = &chapter.local_practice;
    writeln!(out, "{}", practice.instructions.get(l))?;
    let prompt = app.os.shell_prompt();
    for command in &practice.commands {
        writeln!(out, "  {} {}", prompt.dimmed(), command.cyan())?;
    }
    Ok(())
}

pub async fn complete(
    app: &App,
    chapter: &Chapter,
    out: &mut impl Write,
) -> Result<CompletionReport> {
    let request = CompletionRequest::new(chapter, &app.triggers, app.policy);
    let report = app.store.complete_chapter(request).await?;
    print_completion(out, app, chapter, &report).await?;
    Ok(report)
}

/// Completion banner, level-up and badge notices, pointer to the next chapter
pub async fn print_completion(
    out: &mut impl Write,
    app: &App,
    chapter: &Chapter,
    report: &CompletionReport,
) -> Result<()> {
    let t = texts(app.locale);
    writeln!(out)?;
    match &report.xp {
        Some(award) => {
            writeln!(out, "{}", t.chapter_complete.green().bold())?;
            writeln!(out, "  +{} XP", chapter.completion_xp)?;
            if award.leveled_up {
                writeln!(out, "  🎉 {} Lv.{}", t.level_up.bold(), award.new_level)?;
            }
        }
        None => writeln!(out, "{}", t.already_complete.yellow())?,
    }
    if let Some(badge) = &report.badge {
        let described = describe_badge(badge, app.locale);
        writeln!(out, "  {} {}", t.badge_earned.bold(), described)?;
    }
    if let Some(next) = app.catalog.next_after(chapter.id) {
        writeln!(
            out,
            "  {} → questctl show {} ({})",
            t.next_chapter,
            next.id,
            next.title.get(app.locale)
        )?;
    }
    let profile = app.store.profile().await?;
    let badges = app.store.badges().await?;
    writeln!(out, "{}", ui::xp_line(&profile, badges.len(), app.locale))?;
    Ok(())
}

pub async fn badges(app: &App, out: &mut impl Write) -> Result<()> {
    let t = texts(app.locale);
    let badges = app.store.badges().await?;
    ui::print_header(out, &format!("🏆 {}", t.badges))?;
    if badges.is_empty() {
        writeln!(out, "  -")?;
    }
    for badge in &badges {
        writeln!(out, "  {}", describe_badge(badge, app.locale))?;
    }
    Ok(())
}

/// Persist display preferences to the profile
pub fn set(app: &App, locale: Option<Locale>, os: Option<Os>) -> Result<()> {
    app.store.save_profile(ProfilePatch {
        locale,
        os,
        ..Default::default()
    })?;
    Ok(())
}

/// View shown when a chapter id does not resolve; not an application failure
pub fn not_found(app: &App, err: &QuestError, out: &mut impl Write) -> Result<()> {
    let t = texts(app.locale);
    writeln!(out, "{}: {}", t.chapter_missing.red().bold(), err)?;
    let ids: Vec<String> = app.catalog.ids().iter().map(u32::to_string).collect();
    writeln!(out, "  {}", ids.join(", ").dimmed())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Overrides;
    use quest_shared::{Catalog, MemoryBackend, ProgressStore, QuestConfig, UnavailableBackend};

    async fn app_with(store: ProgressStore) -> App {
        let config = QuestConfig::default();
        let overrides = Overrides {
            locale: Some(Locale::En),
            ..Default::default()
        };
        App::with_store(Catalog::builtin().unwrap(), store, &config, overrides)
            .await
            .unwrap()
    }

    fn text(out: Vec<u8>) -> String {
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_complete_twice_is_guarded() {
        let app = app_with(ProgressStore::new(MemoryBackend::new())).await;
        let chapter = app.catalog.get(2).unwrap().clone();

        let mut out = Vec::new();
        let first = complete(&app, &chapter, &mut out).await.unwrap();
        assert!(first.xp.is_some());
        assert!(text(out).contains("Chapter Complete!"));

        let mut out = Vec::new();
        let second = complete(&app, &chapter, &mut out).await.unwrap();
        assert!(second.already_completed);
        assert!(second.xp.is_none());
        assert!(text(out).contains("already completed"));
        let profile = app.store.profile().await.unwrap();
        assert_eq!(profile.total_xp, chapter.completion_xp);
    }

    #[tokio::test]
    async fn test_status_and_chapters_after_completion() {
        let app = app_with(ProgressStore::new(MemoryBackend::new())).await;
        let chapter = app.catalog.get(1).unwrap().clone();
        complete(&app, &chapter, &mut Vec::new()).await.unwrap();

        let mut out = Vec::new();
        status(&app, &mut out).await.unwrap();
        let status_text = text(out);
        assert!(status_text.contains(&format!("1/{}", app.catalog.len())));

        let mut out = Vec::new();
        chapters(&app, &mut out).await.unwrap();
        assert!(text(out).contains("✔"));
    }

    #[tokio::test]
    async fn test_show_uses_os_prompt() {
        let app = app_with(ProgressStore::new(MemoryBackend::new())).await;
        let chapter = app.catalog.get(2).unwrap();
        let mut out = Vec::new();
        show(&app, chapter, &mut out).unwrap();
        assert!(text(out).contains(Os::Windows.shell_prompt()));
    }

    #[tokio::test]
    async fn test_not_found_lists_ids() {
        let app = app_with(ProgressStore::new(MemoryBackend::new())).await;
        let err = app.catalog.get(99).unwrap_err();
        let mut out = Vec::new();
        not_found(&app, &err, &mut out).unwrap();
        let shown = text(out);
        assert!(shown.contains("Chapter not found"));
        assert!(shown.contains("1, 2, 3"));
        assert!(shown.contains("11, 12"));
    }

    #[tokio::test]
    async fn test_unavailable_storage_still_renders() {
        let app = app_with(ProgressStore::new(UnavailableBackend)).await;
        let chapter = app.catalog.get(2).unwrap().clone();
        let report = complete(&app, &chapter, &mut Vec::new()).await.unwrap();
        assert!(report.xp.is_some());
        assert!(app.is_degraded().await);
        status(&app, &mut Vec::new()).await.unwrap();
    }
}
