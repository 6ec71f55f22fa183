use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use judgeboard::output;
use judgeboard::rubric::{validate_rubric, Rubric};
use judgeboard::service::JudgingService;
use judgeboard::store::{self, SubmitPayload};

const EXIT_SUCCESS: i32 = 0;
const EXIT_VALIDATION: i32 = 1;
const EXIT_STATE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the combined leaderboard (default if no subcommand)
    List,
    /// Show the per-team, per-category score breakdown
    Breakdown,
    /// Show rank positions by judge
    Rankings,
    /// Show award winners
    Awards,
    /// Show summary stats and a liveness ping
    Status,
    /// Replace the entire team list (not additive)
    SetTeams {
        /// Team names in display order
        names: Vec<String>,
    },
    /// Replace the entire judge list (not additive)
    SetJudges {
        /// Judge names
        names: Vec<String>,
    },
    /// Submit one judge's scores and ranking from a JSON payload file
    Submit {
        /// Judge name (must be in the current roster)
        #[arg(long)]
        judge: String,
        /// Path to a JSON file: {"scores": {team: {category: value}}, "ranking": [team, ...]}
        payload: PathBuf,
    },
    /// Remove one judge's scores and ranking
    ClearJudge { judge: String },
    /// Remove one team's scores across all judges
    ClearTeam { team: String },
    /// Remove all scores and rankings, keeping teams and judges
    ClearScores,
    /// Wipe everything: teams, judges, scores, rankings
    Reset,
}

#[derive(Parser, Debug)]
#[command(name = "judgeboard")]
#[command(about = "Multi-judge scoring and leaderboard aggregation", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the judging state file
    #[arg(short, long, global = true, default_value = "judging.json")]
    state: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let Cli {
        verbose,
        state: state_path,
        command,
    } = Cli::parse();
    let command = command.unwrap_or(Commands::List);

    // Validate the rubric at startup; a failure here is a build defect,
    // not a user error
    let rubric = Rubric::standard();
    if let Err(errors) = validate_rubric(&rubric) {
        eprintln!("Rubric config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let state = match store::load_state(&state_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("State error: {:#}", e);
            std::process::exit(EXIT_STATE);
        }
    };

    if verbose {
        eprintln!(
            "Loaded state from {}: {} teams, {} judges, {} submissions",
            state_path.display(),
            state.teams.len(),
            state.judges.len(),
            state.scores.len()
        );
    }

    let service = JudgingService::new(rubric, state);
    let use_colors = output::should_use_colors();

    match command {
        Commands::List => {
            let results = service.results();
            println!(
                "{}",
                output::format_leaderboard(&results, service.rubric(), use_colors)
            );
        }
        Commands::Breakdown => {
            let snapshot = service.snapshot();
            let results = service.results();
            println!(
                "{}",
                output::format_breakdown(&snapshot, service.rubric(), &results, use_colors)
            );
        }
        Commands::Rankings => {
            let snapshot = service.snapshot();
            let results = service.results();
            println!(
                "{}",
                output::format_rankings(&snapshot, &results, use_colors)
            );
        }
        Commands::Awards => {
            let results = service.results();
            println!("{}", output::format_awards(&results, use_colors));
        }
        Commands::Status => {
            let results = service.results();
            let ping = service.ping();
            println!("{}", output::format_status(&results, &ping, use_colors));
        }
        Commands::SetTeams { names } => {
            let count = names.len();
            apply_write(service.set_teams(names));
            save_and_ack(&state_path, service, &format!("teams set ({})", count));
        }
        Commands::SetJudges { names } => {
            let count = names.len();
            apply_write(service.set_judges(names));
            save_and_ack(&state_path, service, &format!("judges set ({})", count));
        }
        Commands::Submit { judge, payload } => {
            let payload = match read_payload(&payload) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Payload error: {:#}", e);
                    std::process::exit(EXIT_VALIDATION);
                }
            };
            apply_write(service.submit_scores(&judge, payload));
            if verbose {
                let progress = service.judge_progress(&judge);
                eprintln!(
                    "{}: {}/{} teams scored{}",
                    judge,
                    progress.teams_scored,
                    progress.team_count,
                    if progress.done { ", done" } else { "" }
                );
            }
            save_and_ack(&state_path, service, &format!("scores saved for {}", judge));
        }
        Commands::ClearJudge { judge } => {
            service.clear_judge(&judge);
            save_and_ack(&state_path, service, &format!("cleared judge {}", judge));
        }
        Commands::ClearTeam { team } => {
            service.clear_team(&team);
            save_and_ack(&state_path, service, &format!("cleared team {}", team));
        }
        Commands::ClearScores => {
            service.clear_scores();
            save_and_ack(&state_path, service, "cleared all scores and rankings");
        }
        Commands::Reset => {
            service.reset();
            save_and_ack(&state_path, service, "state reset");
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

fn read_payload(path: &Path) -> anyhow::Result<SubmitPayload> {
    use anyhow::Context;
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read payload file at {}", path.display()))?;
    let payload: SubmitPayload =
        serde_json::from_str(&content).context("Failed to parse payload JSON")?;
    Ok(payload)
}

fn apply_write(result: Result<(), judgeboard::JudgingError>) {
    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(EXIT_VALIDATION);
    }
}

fn save_and_ack(state_path: &Path, service: JudgingService, message: &str) {
    let state = service.into_state();
    if let Err(e) = store::save_state(state_path, &state) {
        eprintln!("Failed to save state: {:#}", e);
        std::process::exit(EXIT_STATE);
    }
    println!("ok: {}", message);
}
