//! Ages Coach CLI - strategic advice for a Through the Ages position.
//!
//! - `ages-coach --state game.json` - top 3 move suggestions
//! - `ages-coach --state game.json --move "Draft Code of Laws"` - evaluate a move

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use ages_coach_core::{AnthropicClient, Coach, CoachConfig, CoachingMode, GameState};

const WIDTH: usize = 60;

#[derive(Parser)]
#[command(name = "ages-coach")]
#[command(about = "Through the Ages AI coaching", version)]
struct Cli {
    /// Path to game state JSON file
    #[arg(long)]
    state: PathBuf,

    /// Proposed move to evaluate (free text). Omit to get top 3 suggestions.
    #[arg(long = "move")]
    proposed_move: Option<String>,

    /// Model to use (default from config, claude-sonnet-4-6)
    #[arg(long)]
    model: Option<String>,

    /// Skip injecting strategy YAML into the prompt
    #[arg(long)]
    no_strategy: bool,

    /// Project root directory (config, prompts/, strategy/)
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the coaching output
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "debug" } else { "info" })
    });
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let project_root = match cli.project {
        Some(p) => p,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let mut config = CoachConfig::load_from_project(&project_root)?;
    config.resolve_paths(&project_root);

    let state_path = resolve_state_path(&cli.state, &project_root)?;
    let state_json = std::fs::read_to_string(&state_path)
        .with_context(|| format!("Failed to read {}", state_path.display()))?;
    let game_state = GameState::from_json(&state_json)?;
    tracing::debug!(path = %state_path.display(), "Loaded game state");

    let model = cli.model.unwrap_or_else(|| config.model.clone());
    let mode = match cli.proposed_move {
        Some(proposed_move) => CoachingMode::Evaluate { proposed_move },
        None => CoachingMode::Suggest,
    };

    print_state(&game_state);
    match &mode {
        CoachingMode::Evaluate { proposed_move } => println!("Evaluating move: {proposed_move}"),
        CoachingMode::Suggest => println!("Mode: suggest top 3 moves"),
    }
    println!("Model: {model}");

    let client = AnthropicClient::from_config(&config)?;
    let coach = Coach::from_config(client, &config, !cli.no_strategy)?;

    println!("\nCalling Claude API...\n");
    let advice = coach.advise(&game_state, &mode, &model).await?;

    println!("{}", header(mode.label()));
    println!();
    println!("{advice}");
    println!("\n{}\n", "=".repeat(WIDTH));
    Ok(())
}

/// The path as given, else relative to the project root.
fn resolve_state_path(state: &Path, project_root: &Path) -> Result<PathBuf> {
    if state.is_file() {
        return Ok(state.to_path_buf());
    }
    let candidate = project_root.join(state);
    if candidate.is_file() {
        return Ok(candidate);
    }
    anyhow::bail!("Game state file not found: {}", state.display())
}

fn print_state(state: &GameState) {
    println!("{}", header("Through the Ages - Coaching System"));
    println!("\n{}", divider());
    println!("CURRENT GAME STATE");
    println!("{}", divider());
    println!("{}", ages_coach_core::format_game_state(state));

    if let Some(summary) = state.military_summary() {
        println!("\n{summary}");
    }
    println!("\n{}", divider());
}

fn divider() -> String {
    "-".repeat(WIDTH)
}

fn header(title: &str) -> String {
    let pad = WIDTH.saturating_sub(title.len() + 2) / 2;
    let rule = "=".repeat(WIDTH);
    format!("\n{rule}\n{} {title}\n{rule}", " ".repeat(pad))
}
