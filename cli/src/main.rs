//! Headless session runner - plays scripted rounds against the payout engine.
//!
//! Usage:
//!   cargo run --release --bin plinko-sim -- --rounds 20 --balls 3 --stake 25 --risk high
//!   cargo run --release --bin plinko-sim -- --config session.json --json > events.jsonl
//!   cargo run --release --bin plinko-sim -- --save-snapshot snap.json
//!   cargo run --release --bin plinko-sim -- --resume snap.json --rounds 5

use anyhow::{bail, Context, Result};
use clap::Parser;
use plinko_payout_core::models::GameEvent;
use plinko_payout_core::payout::RiskTier;
use plinko_payout_core::session::{
    BetSizer, SessionConfig, SessionController, SessionError, SessionSnapshot,
};
use serde_json::json;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run Plinko payout sessions headlessly", long_about = None)]
struct Args {
    /// JSON session config; omitted fields take their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the opening balance
    #[arg(long)]
    balance: Option<i64>,

    #[arg(short, long, default_value = "10")]
    rounds: usize,

    /// Balls dropped per round
    #[arg(short, long, default_value = "1")]
    balls: usize,

    /// Stake per ball; clamped into [min_stake, balance] before each drop
    #[arg(short, long, default_value = "10")]
    stake: i64,

    /// Risk tier: low, medium or high
    #[arg(long)]
    risk: Option<RiskTier>,

    /// Board width in peg rows
    #[arg(short, long)]
    lines: Option<usize>,

    /// Boards to buy before playing
    #[arg(long, value_delimiter = ',')]
    unlock: Vec<usize>,

    /// Tick bound per round before the run is declared stalled
    #[arg(long, default_value = "10000")]
    max_ticks: u64,

    /// Print every event as a JSON line
    #[arg(long)]
    json: bool,

    /// Resume from a snapshot written by --save-snapshot
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Write a snapshot after the last round
    #[arg(long)]
    save_snapshot: Option<PathBuf>,

    /// Log filter when RUST_LOG is unset (e.g. info, plinko_payout_core=debug)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_level).context("invalid --log-level")?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn build_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => SessionConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }
    if let Some(balance) = args.balance {
        config.opening_balance = balance;
    }

    config.validate()?;
    if args.balls == 0 || args.balls > config.max_concurrent_balls {
        bail!("balls must be between 1 and {}", config.max_concurrent_balls);
    }
    Ok(config)
}

fn open_session(args: &Args, config: SessionConfig) -> Result<SessionController> {
    let mut session = match &args.resume {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read snapshot {}", path.display()))?;
            let snapshot = SessionSnapshot::from_json(&raw)?;
            SessionController::restore(config, &snapshot)?
        }
        None => SessionController::new(config)?,
    };

    for &line_count in &args.unlock {
        if session.unlock_board(line_count)? {
            info!(line_count, balance = session.balance(), "bought board");
        }
    }
    if let Some(line_count) = args.lines {
        session.select_board(line_count)?;
    }
    if let Some(risk) = args.risk {
        session.set_risk_tier(risk)?;
    }
    Ok(session)
}

/// Play up to `rounds` rounds; stops early once the balance cannot cover a stake
fn play(session: &mut SessionController, args: &Args) -> Result<usize> {
    let config = session.config();
    let mut sizer = BetSizer::new(config.min_stake, config.bet_step);
    let mut played = 0;
    for _ in 0..args.rounds {
        let mut dropped = 0;
        for _ in 0..args.balls {
            let stake = sizer.set(args.stake, session.balance());
            match session.place_bet(stake) {
                Ok(_) => dropped += 1,
                Err(SessionError::InsufficientBalance { required, available }) => {
                    warn!(required, available, "out of credits");
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }
        if dropped == 0 {
            break;
        }

        session.run_until_idle(args.max_ticks)?;
        played += 1;
    }
    Ok(played)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let config = build_config(&args)?;
    let opening = config.opening_balance;
    let mut session = open_session(&args, config)?;

    if args.json {
        session.subscribe(|event: &GameEvent| match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(err) => warn!(%err, "failed to encode event"),
        });
    }

    let played = play(&mut session, &args)?;

    if let Some(path) = &args.save_snapshot {
        let snapshot = session.snapshot()?;
        std::fs::write(path, snapshot.to_json()?)
            .with_context(|| format!("failed to write snapshot {}", path.display()))?;
        info!(path = %path.display(), "snapshot written");
    }

    let log = session.event_log();
    let summary = json!({
        "session_id": session.session_id().to_string(),
        "rounds": played,
        "balls": log.events_of_type("BallSettled").len(),
        "wins": log.events_of_type("CoefficientWon").len(),
        "big_wins": log.events_of_type("BigWin").len(),
        "line_count": session.board().line_count(),
        "risk": session.board().risk_tier().as_str(),
        "opening_balance": opening,
        "balance": session.balance(),
        "ticks": session.current_tick(),
    });

    if args.json {
        println!("{summary}");
    } else {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = Args::parse_from([
            "plinko-sim",
            "--seed",
            "7",
            "--risk",
            "high",
            "--lines",
            "12",
            "--balls",
            "3",
        ]);
        let config = build_config(&args).expect("config should build");
        assert_eq!(config.rng_seed, 7);
        assert_eq!(args.risk, Some(RiskTier::High));
        assert_eq!(args.lines, Some(12));
    }

    #[test]
    fn parses_unlock_list() {
        let args = Args::parse_from(["plinko-sim", "--unlock", "13,14"]);
        assert_eq!(args.unlock, vec![13, 14]);
    }

    #[test]
    fn rejects_too_many_balls() {
        let args = Args::parse_from(["plinko-sim", "--balls", "6"]);
        let err = build_config(&args).unwrap_err();
        assert!(err.to_string().contains("balls"), "unexpected error: {err}");
    }

    #[test]
    fn rejects_unknown_risk() {
        assert!(Args::try_parse_from(["plinko-sim", "--risk", "extreme"]).is_err());
    }

    #[test]
    fn plays_requested_rounds() {
        let args = Args::parse_from(["plinko-sim", "--rounds", "4", "--balls", "2"]);
        let config = build_config(&args).unwrap();
        let mut session = open_session(&args, config).unwrap();

        assert_eq!(play(&mut session, &args).unwrap(), 4);
        assert_eq!(session.event_log().events_of_type("GamePlayed").len(), 4);
        assert_eq!(session.active_balls(), 0);
    }

    #[test]
    fn rejects_config_above_concurrency_ceiling() {
        let path = std::env::temp_dir().join(format!("plinko-sim-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"max_concurrent_balls": 10}"#).unwrap();
        let args = Args::parse_from(["plinko-sim", "--config", path.to_str().unwrap()]);
        let result = build_config(&args);
        std::fs::remove_file(&path).unwrap();

        assert!(result.is_err());
    }

    #[test]
    fn clamps_stake_to_balance() {
        let args = Args::parse_from(["plinko-sim", "--stake", "5000", "--rounds", "1"]);
        let config = build_config(&args).unwrap();
        let mut session = open_session(&args, config).unwrap();

        assert_eq!(play(&mut session, &args).unwrap(), 1);
        let bets = session.event_log().events_of_type("BetPlaced");
        assert!(matches!(bets.as_slice(), [GameEvent::BetPlaced { stake: 1000, .. }]));
    }

    #[test]
    fn stops_when_out_of_credits() {
        let args = Args::parse_from(["plinko-sim", "--balance", "5", "--rounds", "50"]);
        let config = build_config(&args).unwrap();
        let mut session = open_session(&args, config).unwrap();

        assert_eq!(play(&mut session, &args).unwrap(), 0);
        assert_eq!(session.balance(), 5);
        assert!(session.event_log().is_empty());
    }
}
