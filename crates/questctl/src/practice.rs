//! Interactive practice terminal.
//!
//! Reads commands line by line, feeds them to the simulation and prints the
//! transcript as it grows. XP is queued on the store worker as soon as a
//! step is accepted; the awards are collected at the end for the summary.

use anyhow::Result;
use owo_colors::OwoColorize;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use quest_shared::simulation::{Advance, Simulation, Submission};
use quest_shared::{Chapter, PendingAward, XpAward};

use crate::app::App;
use crate::text::texts;
use crate::ui;

const HINT_COMMAND: &str = ":hint";
const QUIT_COMMAND: &str = ":quit";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PracticeSummary {
    pub completed: bool,
    pub xp_earned: u64,
    pub last_award: Option<XpAward>,
    pub leveled_up: bool,
}

pub async fn run<R, W>(
    app: &App,
    chapter: &Chapter,
    input: R,
    out: &mut W,
) -> Result<PracticeSummary>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let t = texts(app.locale);
    let sim = Simulation::new(&chapter.simulation, app.locale);
    let mut sim = sim.with_step_delay(app.step_delay);
    let mut lines = input.lines();
    let mut printed = 0;
    let mut pending: Vec<PendingAward> = Vec::new();
    let mut summary = PracticeSummary::default();

    ui::print_header(
        out,
        &format!(
            "{} {}  {} ({})",
            chapter.icon,
            chapter.title.get(app.locale),
            t.terminal_title,
            app.os.terminal_name()
        ),
    )?;

    while !sim.is_completed() {
        for entry in &sim.transcript()[printed..] {
            ui::print_transcript_entry(out, entry, app.locale)?;
        }
        printed = sim.transcript().len();

        let (current, total) = sim.step_label();
        let prompt = app.os.shell_prompt();
        write!(out, "{} {}/{} {} ", t.step.dimmed(), current, total, prompt)?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            debug!("practice input closed");
            break;
        };
        match line.trim() {
            HINT_COMMAND => {
                if let Some(hint) = sim.hint() {
                    writeln!(out, "💡 {}: {}", t.hint, hint.yellow())?;
                }
                continue;
            }
            QUIT_COMMAND => break,
            _ => {}
        }

        match sim.submit(&line) {
            Submission::Accepted { xp, advance } => {
                pending.push(app.store.add_xp(xp));
                summary.xp_earned += xp;
                if let Advance::NextStep { after } = advance {
                    for entry in &sim.transcript()[printed..] {
                        ui::print_transcript_entry(out, entry, app.locale)?;
                    }
                    printed = sim.transcript().len();
                    if !after.is_zero() {
                        tokio::time::sleep(after).await;
                    }
                    sim.advance();
                }
            }
            Submission::Rejected | Submission::Empty | Submission::Ignored => {}
        }
    }

    for entry in &sim.transcript()[printed..] {
        ui::print_transcript_entry(out, entry, app.locale)?;
    }

    for award in pending {
        let award = award.await?;
        summary.leveled_up |= award.leveled_up;
        summary.last_award = Some(award);
    }
    summary.completed = sim.is_completed();

    if summary.completed {
        writeln!(out)?;
        writeln!(out, "{}", t.all_steps_done.green().bold())?;
    }
    if summary.xp_earned > 0 {
        writeln!(out, "{}: +{} XP", t.xp_gained, summary.xp_earned)?;
    }
    if let Some(award) = summary.last_award.filter(|_| summary.leveled_up) {
        writeln!(out, "🎉 {} Lv.{}", t.level_up.bold(), award.new_level)?;
    }
    Ok(summary)
}
