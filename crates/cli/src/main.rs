mod capture_cmd;
mod container_tag;
mod hook_cmd;
mod tracker_cmd;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "supermemory-claude",
    about = "Capture Claude Code conversations into supermemory"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture new transcript entries and print the formatted block
    Capture {
        /// Path to the session transcript (JSONL)
        #[arg(long)]
        transcript: Option<PathBuf>,

        /// Session identifier the capture cursor is keyed by
        #[arg(long)]
        session_id: Option<String>,

        /// Working directory the capture is attributed to
        #[arg(long)]
        cwd: Option<PathBuf>,
    },

    /// Print the container tags derived for a working directory
    Tags {
        /// Working directory to derive tags for (defaults to the current one)
        #[arg(long)]
        cwd: Option<PathBuf>,
    },

    /// Inspect or clear a session's capture cursor
    Tracker {
        #[command(subcommand)]
        action: TrackerAction,
    },

    /// Manage the Claude Code Stop hook
    Hook {
        #[command(subcommand)]
        action: HookAction,
    },
}

#[derive(Subcommand)]
enum TrackerAction {
    /// Print the last captured uuid for a session
    Show {
        #[arg(long)]
        session_id: String,
    },
    /// Remove a session's cursor so the next capture starts from the top
    Clear {
        #[arg(long)]
        session_id: String,
    },
}

#[derive(Subcommand)]
enum HookAction {
    /// Install the Stop hook in ~/.claude/settings.json
    Install,
    /// Remove the Stop hook
    Uninstall,
    /// Show whether the hook is installed
    Status,
}

fn main() {
    // stdout carries the capture block, so diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Capture {
            transcript,
            session_id,
            cwd,
        } => capture_cmd::run_capture(transcript, session_id, cwd),
        Commands::Tags { cwd } => container_tag::run_tags(cwd),
        Commands::Tracker { action } => match action {
            TrackerAction::Show { session_id } => tracker_cmd::show(&session_id),
            TrackerAction::Clear { session_id } => tracker_cmd::clear(&session_id),
        },
        Commands::Hook { action } => match action {
            HookAction::Install => hook_cmd::install(),
            HookAction::Uninstall => hook_cmd::uninstall(),
            HookAction::Status => hook_cmd::status(),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
