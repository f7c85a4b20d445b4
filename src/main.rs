//! Main entry point for the foos-ladder CLI
//!
//! A thin text front end over the engine: parses one command per input
//! line and renders the engine's output as plain tables. All rating logic
//! lives in the library.

use anyhow::Result;
use clap::Parser;
use foos_ladder::commands::{parse_command, Command};
use foos_ladder::config::AppConfig;
use foos_ladder::engine::LadderEngine;
use foos_ladder::types::{BestPlayers, MatchReport};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;

/// Foos Ladder - role-based Elo ratings for office foosball
#[derive(Parser)]
#[command(
    name = "foos-ladder",
    version,
    about = "Track offense/defense Elo ratings and rank tiers for foosball matches",
    long_about = "Foos Ladder records match results from free-form lines like \
                 `alice, bob win carol ; dan`, updates per-role Elo ratings with \
                 rank protection, and persists the ladder to a plain text file."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Store file override
    #[arg(short, long, value_name = "FILE", help = "Override the store file path")]
    store: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Dry run mode (validate config and exit)
    #[arg(
        long,
        help = "Validate configuration and exit without starting the command loop"
    )]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }
    if let Some(store) = &args.store {
        config.store.file = store.to_string_lossy().into_owned();
    }

    Ok(config)
}

fn print_report(report: &MatchReport) {
    println!(
        "Recorded {} (x{:.2}), {} participants:",
        report.win_type,
        report.multiplier,
        report.lines.len()
    );
    for line in &report.lines {
        println!(
            "  {:<20} {:<8} {:>4} -> {:>4} ({:+})",
            line.display, line.role, line.old_rating, line.new_rating, line.delta
        );
    }
}

fn print_rows(rows: &[foos_ladder::types::PlayerRow]) {
    if rows.is_empty() {
        println!("No players.");
        return;
    }
    println!(
        "{:<4} {:<20} {:>5} {:>5} {:>5} {:>6} {:>5}  {}",
        "No.", "Name", "Avg", "Off", "Def", "Games", "Win%", "Rank"
    );
    for row in rows {
        println!(
            "{:<4} {:<20} {:>5} {:>5} {:>5} {:>6} {:>4}%  {}",
            row.position,
            row.display,
            row.avg,
            row.offense,
            row.defense,
            row.played,
            row.win_rate,
            row.rank_display
        );
    }
}

fn print_best(best: &BestPlayers) {
    let fmt_i32 = |slot: &Option<(String, i32)>| {
        slot.as_ref()
            .map(|(name, v)| format!("{name} ({v})"))
            .unwrap_or_else(|| "-".to_string())
    };
    let fmt_u32 = |slot: &Option<(String, u32)>| {
        slot.as_ref()
            .map(|(name, v)| format!("{name} ({v})"))
            .unwrap_or_else(|| "-".to_string())
    };
    println!("Best average: {}", fmt_i32(&best.best_avg));
    println!("Best offense: {}", fmt_i32(&best.best_offense));
    println!("Best defense: {}", fmt_i32(&best.best_defense));
    println!("Most played:  {}", fmt_u32(&best.most_played));
    println!("Best win %:   {}", fmt_u32(&best.best_win_rate));
}

fn print_help() {
    println!("Commands:");
    println!("  <team1> <wintype> <team2>   record a match, team1 wins");
    println!("                              team: players comma-separated,");
    println!("                              `offense ; defense` to split roles");
    println!("                              win types: win, smallwin, closewin,");
    println!("                              bigwin, perfectwin");
    println!("  pp [tier]                   list players, optionally one tier");
    println!("  best                        leaders per dimension");
    println!("  name                        list all player names");
    println!("  add <name>[, off, def, played, win%]");
    println!("  combine <a>, <b>            merge b's stats into a");
    println!("  expect <a>, <b>             expected win rate preview");
    println!("  save                        force a store write");
    println!("  quit                        exit");
}

/// Dispatch one parsed command. Returns false when the loop should stop.
fn dispatch(engine: &mut LadderEngine, command: Command) -> bool {
    let outcome = match command {
        Command::Match { raw } => engine.process_match(&raw).map(|report| {
            print_report(&report);
        }),
        Command::ListPlayers { tier } => engine.list_players(tier.as_deref()).map(|rows| {
            print_rows(&rows);
        }),
        Command::Best => {
            print_best(&engine.best_players());
            Ok(())
        }
        Command::Names => {
            println!("{}", engine.names().join(", "));
            Ok(())
        }
        Command::Add { name, stats } => engine.add(&name, stats).map(|()| {
            println!("Added {name}.");
        }),
        Command::Combine { a, b } => engine.combine(&a, &b).map(|()| {
            println!("Combined {b} into {a}.");
        }),
        Command::Expect { a, b } => engine.expected_win_rate(&a, &b).map(|rate| {
            println!("{a} vs {b}: {rate:.1}% expected win rate");
        }),
        Command::Save => engine.save().map(|()| {
            println!("Saved.");
        }),
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Quit => return false,
    };

    if let Err(e) = outcome {
        println!("error: {e}");
    }
    true
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Foos Ladder {}", foos_ladder::VERSION);
    info!("   Store file: {}", config.store.file);
    info!("   Log level: {}", config.service.log_level);

    if args.dry_run {
        info!("Configuration validation successful");
        return Ok(());
    }

    let mut engine = LadderEngine::new(config)?;
    engine.load()?;
    info!("Loaded {} players", engine.player_count());

    println!("Type `help` for commands, `quit` to exit.");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(command) => {
                if !dispatch(&mut engine, command) {
                    break;
                }
            }
            Err(e) => println!("error: {e}"),
        }
    }

    Ok(())
}
