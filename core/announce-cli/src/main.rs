//! announce: command-line front end for Morning Announcements.
//!
//! Operates on a JSON deck file. The `update` subcommand is the one a daily
//! scheduler calls; the rest edit or inspect the deck by hand.
//!
//! ## Subcommands
//!
//! - `update`: run the two-pass lifecycle update
//! - `add`, `duplicate`, `move`: edit slides
//! - `show`: list slides with their lifecycle state
//! - `qr`: add QR code tiles for links in a text selection
//! - `timer`: manage the daily update timer

mod commands;
mod logging;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "announce")]
#[command(about = "Morning Announcements slide lifecycle")]
#[command(version)]
struct Cli {
    /// Deck file to operate on
    #[arg(long, global = true, default_value = "announcements.json")]
    deck: PathBuf,

    /// Config file (defaults to ~/.announce/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the lifecycle update over every slide
    Update {
        /// Wall-clock time to run as, e.g. "2024-01-15 09:00"
        #[arg(long)]
        now: Option<String>,

        /// Only run if the daily timer is due
        #[arg(long)]
        scheduled: bool,
    },

    /// Append a slide with the given notes lines
    Add {
        /// One notes line (repeatable)
        #[arg(long = "line")]
        lines: Vec<String>,
    },

    /// Duplicate a slide, notes included
    Duplicate {
        #[arg(value_name = "SLIDE")]
        slide: String,
    },

    /// Move a slide to an insertion index
    Move {
        #[arg(value_name = "SLIDE")]
        slide: String,

        #[arg(value_name = "INDEX")]
        index: usize,
    },

    /// List slides with lifecycle state and notes
    Show {
        /// Wall-clock time to classify against
        #[arg(long)]
        now: Option<String>,
    },

    /// Insert QR code tiles for the links found in a text selection
    Qr {
        #[arg(value_name = "SLIDE")]
        slide: String,

        /// Selected text containing the links
        #[arg(long)]
        text: String,
    },

    /// Manage the daily update timer
    Timer {
        #[command(subcommand)]
        action: TimerAction,
    },
}

#[derive(Subcommand)]
enum TimerAction {
    /// Schedule a daily update
    Set {
        /// Hour of day, 0-23
        #[arg(long)]
        hour: String,

        /// Must be "Yes, I'm sure"
        #[arg(long)]
        confirm: String,
    },

    /// Remove the daily update
    Remove,

    /// Show the timer and its next firing
    Show,
}

fn main() {
    let _logging_guard = logging::init();
    let cli = Cli::parse();
    let deck = cli.deck.as_path();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Update { now, scheduled } => {
            commands::update(deck, config, now.as_deref(), scheduled)
        }
        Commands::Add { lines } => commands::add(deck, &lines),
        Commands::Duplicate { slide } => commands::duplicate(deck, &slide),
        Commands::Move { slide, index } => commands::move_slide(deck, &slide, index),
        Commands::Show { now } => commands::show(deck, now.as_deref()),
        Commands::Qr { slide, text } => commands::qr(deck, &slide, &text),
        Commands::Timer { action } => match action {
            TimerAction::Set { hour, confirm } => commands::timer_set(deck, &confirm, &hour),
            TimerAction::Remove => commands::timer_remove(deck),
            TimerAction::Show => commands::timer_show(deck),
        },
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "announce failed");
        std::process::exit(1);
    }
}
