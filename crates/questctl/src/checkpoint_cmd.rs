//! Checkpoint quiz followed by chapter completion.

use anyhow::Result;
use owo_colors::OwoColorize;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use quest_shared::{Chapter, CheckpointQuiz, CompletionReport, CompletionRequest, QuizAnswer};

use crate::app::App;
use crate::commands::print_completion;
use crate::text::texts;
use crate::ui;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointOutcome {
    pub answer: Option<QuizAnswer>,
    pub completion: Option<CompletionReport>,
}

/// Ask the chapter's question; any locked answer completes the chapter
pub async fn run<R, W>(
    app: &App,
    chapter: &Chapter,
    input: R,
    out: &mut W,
) -> Result<CheckpointOutcome>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let t = texts(app.locale);
    let locale = app.locale;

    let request = CompletionRequest::new(chapter, &app.triggers, app.policy);

    let Some(question) = chapter.checkpoint_question() else {
        let report = app.store.complete_chapter(request).await?;
        print_completion(out, app, chapter, &report).await?;
        return Ok(CheckpointOutcome {
            answer: None,
            completion: Some(report),
        });
    };

    let mut quiz = CheckpointQuiz::new(question);
    ui::print_header(out, &format!("✅ {}", t.checkpoint))?;
    writeln!(out, "{}", question.question.get(locale).bold())?;
    for (i, option) in question.options.iter().enumerate() {
        writeln!(out, "  {}) {}", i + 1, option.get(locale))?;
    }

    let mut lines = input.lines();
    let answer = loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            return Ok(CheckpointOutcome {
                answer: None,
                completion: None,
            });
        };
        let choice = line.trim().parse::<usize>().ok();
        let picked = choice.and_then(|n| n.checked_sub(1));
        if let Some(answer) = picked.and_then(|idx| quiz.select(idx)) {
            break answer;
        }
    };

    let request = if answer.correct {
        request.with_checkpoint_bonus(answer.xp_awarded)
    } else {
        request
    };
    let report = app.store.complete_chapter(request).await?;

    if answer.correct {
        let label = format!("⭕ {}", t.correct);
        let bonus = report.checkpoint_xp;
        if bonus > 0 {
            writeln!(out, "{} +{} XP", label.green().bold(), bonus)?;
        } else {
            writeln!(out, "{}", label.green().bold())?;
        }
    } else {
        let label = format!("❌ {}", t.incorrect);
        let right = question.options[answer.correct_index].get(locale);
        writeln!(out, "{} → {}", label.red().bold(), right)?;
    }
    writeln!(out, "{}", question.explanation.get(locale).dimmed())?;
    print_completion(out, app, chapter, &report).await?;

    Ok(CheckpointOutcome {
        answer: Some(answer),
        completion: Some(report),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Overrides;
    use quest_shared::badges::FIRST_CONTAINER;
    use quest_shared::{Catalog, Locale, MemoryBackend, ProgressStore, QuestConfig};

    async fn test_app() -> App {
        let overrides = Overrides {
            locale: Some(Locale::En),
            ..Default::default()
        };
        App::with_store(
            Catalog::builtin().unwrap(),
            ProgressStore::new(MemoryBackend::new()),
            &QuestConfig::default(),
            overrides,
        )
        .await
        .unwrap()
    }

    fn correct_input(chapter: &Chapter) -> String {
        format!("{}\n", chapter.checkpoint[0].correct_index + 1)
    }

    #[tokio::test]
    async fn test_correct_answer_completes_chapter() {
        let app = test_app().await;
        let chapter = app.catalog.get(2).unwrap().clone();
        let input = format!("9\nabc\n{}", correct_input(&chapter));
        let mut out = Vec::new();

        let outcome = run(&app, &chapter, input.as_bytes(), &mut out)
            .await
            .unwrap();

        let answer = outcome.answer.unwrap();
        assert!(answer.correct);
        let report = outcome.completion.unwrap();
        assert_eq!(report.badge.unwrap().id, FIRST_CONTAINER);
        let profile = app.store.profile().await.unwrap();
        assert_eq!(profile.total_xp, 30 + chapter.completion_xp);
        assert!(app.store.progress("2").await.unwrap().is_completed());
    }

    #[tokio::test]
    async fn test_wrong_answer_still_completes() {
        let app = test_app().await;
        let chapter = app.catalog.get(1).unwrap().clone();
        let question = &chapter.checkpoint[0];
        let wrong = (question.correct_index + 1) % question.options.len() + 1;
        let input = format!("{}\n", wrong);
        let mut out = Vec::new();

        let outcome = run(&app, &chapter, input.as_bytes(), &mut out)
            .await
            .unwrap();

        assert!(!outcome.answer.unwrap().correct);
        let report = outcome.completion.unwrap();
        assert!(report.badge.is_none());
        let profile = app.store.profile().await.unwrap();
        assert_eq!(profile.total_xp, chapter.completion_xp);
        assert!(String::from_utf8(out).unwrap().contains("Incorrect"));
    }

    #[tokio::test]
    async fn test_repeat_checkpoint_pays_once() {
        let app = test_app().await;
        let chapter = app.catalog.get(2).unwrap().clone();
        let input = correct_input(&chapter);

        let first = run(&app, &chapter, input.as_bytes(), &mut Vec::new())
            .await
            .unwrap();
        let mut out = Vec::new();
        let second = run(&app, &chapter, input.as_bytes(), &mut out)
            .await
            .unwrap();

        assert_eq!(first.completion.unwrap().checkpoint_xp, 30);
        assert!(second.answer.unwrap().correct);
        let report = second.completion.unwrap();
        assert!(report.already_completed);
        assert_eq!(report.checkpoint_xp, 0);
        assert_eq!(app.store.profile().await.unwrap().total_xp, 130);
        assert!(!String::from_utf8(out).unwrap().contains("+30 XP"));
    }

    #[tokio::test]
    async fn test_no_answer_changes_nothing() {
        let app = test_app().await;
        let chapter = app.catalog.get(1).unwrap().clone();
        let mut out = Vec::new();

        let outcome = run(&app, &chapter, &b""[..], &mut out).await.unwrap();

        let nothing = CheckpointOutcome {
            answer: None,
            completion: None,
        };
        assert_eq!(outcome, nothing);
        assert_eq!(app.store.profile().await.unwrap().total_xp, 0);
    }
}
