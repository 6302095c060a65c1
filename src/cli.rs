//! Command-line interface for tictactoe_tutor.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tic-tac-toe tutor - run block programs against lesson opponents
#[derive(Parser, Debug)]
#[command(name = "tictactoe_tutor")]
#[command(about = "Lesson-driven tic-tac-toe for block-programming learners", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a program as successive run/continue actions
    Run {
        /// Program file (JSON, or TOML with a .toml extension)
        #[arg(short, long)]
        program: PathBuf,

        /// Lesson to start at (overrides the config file)
        #[arg(short, long)]
        lesson: Option<u8>,

        /// Path to a tutor config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Maximum number of run/continue actions
        #[arg(short, long, default_value = "9")]
        turns: u32,

        /// Play on four boards at once
        #[arg(long)]
        quad: bool,

        /// Accept every advance prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List the lessons
    Lessons,

    /// Show a lesson's teaching text and hints
    Hints {
        /// Lesson number
        #[arg(short, long, default_value = "1")]
        lesson: u8,
    },

    /// Parse and validate a program without running it
    Check {
        /// Program file
        #[arg(short, long)]
        program: PathBuf,
    },
}
