//! questctl - Docker Quest in the terminal
//!
//! Learn Docker chapter by chapter: read, practice commands in a simulated
//! shell, answer the checkpoint and collect XP, levels, badges and streaks.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use quest_shared::{Locale, Os, QuestConfig, QuestError, VERSION};
use questctl::app::{App, Overrides};
use questctl::text::texts;
use questctl::{checkpoint_cmd, commands, practice};

const LOG_ENV: &str = "QUEST_LOG";

#[derive(Parser)]
#[command(name = "questctl")]
#[command(
    about = "Docker Quest - learn Docker through gamified chapters",
    long_about = None
)]
#[command(version = VERSION)]
struct Cli {
    /// Display language (ja, en)
    #[arg(long, global = true)]
    locale: Option<Locale>,

    /// Directory holding progress records
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Keep progress in memory only
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show level, XP, streak and badges
    Status,

    /// List chapters grouped by level
    Chapters,

    /// Read a chapter
    Show { id: u32 },

    /// Practice a chapter's commands in the simulated terminal
    Practice { id: u32 },

    /// Answer a chapter's checkpoint and complete it
    Checkpoint { id: u32 },

    /// Mark a chapter complete
    Complete { id: u32 },

    /// List earned badges
    Badges,

    /// Save display preferences to the profile
    Set {
        /// Language to store (ja, en)
        #[arg(long)]
        lang: Option<Locale>,

        /// Shell flavour for local practice (win, mac)
        #[arg(long)]
        os: Option<Os>,
    },
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e.downcast_ref::<QuestError>().map_or(1, QuestError::code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = QuestConfig::load()?;
    let overrides = Overrides {
        locale: cli.locale,
        data_dir: cli.data_dir,
        ephemeral: cli.ephemeral,
    };
    let app = App::open(&config, overrides).await?;

    let streak = app.store.record_activity().await?;
    debug!(streak, "activity recorded");

    let mut out = io::stdout().lock();
    let result = dispatch(&app, cli.command, &mut out).await;
    out.flush()?;

    if app.is_degraded().await {
        eprintln!("{}", texts(app.locale).degraded);
    }
    app.shutdown().await?;
    result
}

async fn dispatch(app: &App, command: Commands, out: &mut impl Write) -> Result<()> {
    let chapter_id = match &command {
        Commands::Show { id }
        | Commands::Practice { id }
        | Commands::Checkpoint { id }
        | Commands::Complete { id } => Some(*id),
        _ => None,
    };
    let chapter = match chapter_id.map(|id| app.catalog.get(id)) {
        Some(Ok(chapter)) => Some(chapter),
        Some(Err(e)) if e.is_view_local() => return commands::not_found(app, &e, out),
        Some(Err(e)) => return Err(e.into()),
        None => None,
    };

    match (command, chapter) {
        (Commands::Status, _) => commands::status(app, out).await,
        (Commands::Chapters, _) => commands::chapters(app, out).await,
        (Commands::Badges, _) => commands::badges(app, out).await,
        (Commands::Set { lang, os }, _) => commands::set(app, lang, os),
        (Commands::Show { .. }, Some(chapter)) => commands::show(app, chapter, out),
        (Commands::Practice { .. }, Some(chapter)) => {
            let input = BufReader::new(tokio::io::stdin());
            practice::run(app, chapter, input, out).await.map(|_| ())
        }
        (Commands::Checkpoint { .. }, Some(chapter)) => {
            let input = BufReader::new(tokio::io::stdin());
            checkpoint_cmd::run(app, chapter, input, out).await.map(|_| ())
        }
        (Commands::Complete { .. }, Some(chapter)) => {
            commands::complete(app, chapter, out).await.map(|_| ())
        }
        (_, None) => Ok(()),
    }
}
