//! Tic-tac-toe tutor - command-line front end.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use std::rc::Rc;
use tictactoe_tutor::{
    ConsolePresenter, LESSONS, LessonId, Program, RunError, Tutor, TutorConfig, Variant,
};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            program,
            lesson,
            config,
            turns,
            quad,
            yes,
        } => run_program(program, lesson, config, turns, quad, yes).await,
        Command::Lessons => {
            list_lessons();
            Ok(())
        }
        Command::Hints { lesson } => show_hints(lesson),
        Command::Check { program } => check_program(program),
    }
}

/// Runs a program until the lesson is judged or the turn limit is reached.
#[instrument(skip_all, fields(program = %program_path.display()))]
async fn run_program(
    program_path: PathBuf,
    lesson: Option<u8>,
    config_path: Option<PathBuf>,
    turns: u32,
    quad: bool,
    yes: bool,
) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => TutorConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TutorConfig::default(),
    };
    if let Some(number) = lesson {
        let id = LessonId::new(number).ok_or_else(|| anyhow!("no lesson {number}"))?;
        config = config.with_start_lesson(id);
    }
    if quad {
        config = config.with_variant(Variant::Quad);
    }

    let program = Program::load(&program_path)
        .with_context(|| format!("loading program {}", program_path.display()))?;

    let tutor = Tutor::new(config, Rc::new(ConsolePresenter::new(yes)));
    tutor.start();

    for turn in 1..=turns {
        info!(turn, "Run/continue");
        let report = match tutor.run(&program).await {
            Ok(report) => report,
            Err(RunError::GameOver) => {
                warn!("Every board is finished");
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if report.curriculum_complete {
            break;
        }
        let Some(verdict) = report.verdict else {
            continue;
        };
        if !verdict.passed && !*tutor.config().auto_retry() {
            break;
        }
        if verdict.passed && report.advanced_to.is_none() {
            break;
        }
    }

    for (index, status) in tutor.statuses().iter().enumerate() {
        println!("Board {}: {}", index + 1, status.message());
    }
    println!("Progress: lesson {} ({})", tutor.progress().current(), tutor.progress().phase());
    Ok(())
}

fn list_lessons() {
    for lesson in &LESSONS {
        println!(
            "{}. {:<22} opponent: {:<8} goal: {:?}",
            lesson.id, lesson.name, lesson.strategy, lesson.end
        );
    }
}

fn show_hints(number: u8) -> Result<()> {
    let id = LessonId::new(number).ok_or_else(|| anyhow!("no lesson {number}"))?;
    let lesson = id.lesson();
    println!("Lesson {}: {}\n\n{}\n", lesson.id, lesson.name, lesson.teaching);
    for (index, hint) in lesson.hints.iter().enumerate() {
        println!("Hint {}: {}", index + 1, hint);
    }
    Ok(())
}

fn check_program(path: PathBuf) -> Result<()> {
    let program =
        Program::load(&path).with_context(|| format!("loading program {}", path.display()))?;
    if program.is_empty() {
        warn!(path = %path.display(), "Program has no blocks");
    }
    println!("{}: {} top-level blocks, OK", path.display(), program.blocks().len());
    Ok(())
}
