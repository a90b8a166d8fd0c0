mod session;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tt_core::{Estimator, MAX_TAP_RATE, MIN_TAP_RATE, is_valid_tap_rate};
use tt_store::{SessionRecord, Store};

use crate::session::SessionLimits;

#[derive(Parser)]
#[command(name = "tt", about = "Tap-to-likes estimator and session runner")]
struct Cli {
    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expected likes for a duration at a tap rate
    Estimate {
        /// Duration in minutes
        #[arg(long)]
        minutes: i64,

        /// Taps per second (defaults to the stored preference)
        #[arg(long)]
        rate: Option<i64>,
    },

    /// Expected likes from an observed tap count
    FromTaps {
        /// Tap count shown by a live counter
        #[arg(long)]
        taps: i64,
    },

    /// Minutes of tapping needed to reach a target like count
    Target {
        /// Desired number of likes
        #[arg(long)]
        likes: i64,

        /// Taps per second (defaults to the stored preference)
        #[arg(long)]
        rate: Option<i64>,
    },

    /// Full calculation trace from duration and rate to likes
    Breakdown {
        /// Duration in minutes
        #[arg(long)]
        minutes: i64,

        /// Taps per second (defaults to the stored preference)
        #[arg(long)]
        rate: Option<i64>,

        /// Observed tap count, if a counter was running
        #[arg(long)]
        taps: Option<i64>,
    },

    /// Compare expected likes across tap rates over one duration
    Compare {
        /// Duration in minutes
        #[arg(long)]
        minutes: i64,

        /// Comma-separated rates, e.g. 1,5,10
        #[arg(long, value_delimiter = ',', required = true)]
        rates: Vec<i64>,
    },

    /// Quick-reference table for common durations
    Table {
        /// Taps per second (defaults to the stored preference)
        #[arg(long)]
        rate: Option<i64>,
    },

    /// Show or set the stored tap rate preference
    Rate {
        /// New rate in taps per second
        #[arg(long)]
        set: Option<i64>,
    },

    /// Run a live tap session at a fixed cadence
    Run {
        /// Taps per second (defaults to the stored preference)
        #[arg(long)]
        rate: Option<i64>,

        /// Stop after this many seconds
        #[arg(long)]
        seconds: Option<u64>,

        /// Stop after this many taps
        #[arg(long)]
        taps: Option<u64>,
    },

    /// Recorded sessions, most recent first
    History {
        /// Maximum number of sessions to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn open_store() -> Result<Store> {
    Store::open_default().context("failed to open store")
}

fn build_estimator() -> Result<Estimator> {
    let calibration = tt_store::load_calibration(&tt_store::default_base_dir())
        .context("failed to load calibration")?;
    Ok(Estimator::new(calibration))
}

/// An explicit --rate must be in the supported window; otherwise fall back
/// to the stored preference, which is valid by construction.
fn resolve_rate(store: &Store, rate: Option<i64>) -> Result<i64> {
    match rate {
        Some(rate) if is_valid_tap_rate(rate) => Ok(rate),
        Some(rate) => anyhow::bail!(
            "tap rate {rate} outside supported range {MIN_TAP_RATE}..={MAX_TAP_RATE}"
        ),
        None => Ok(store.tap_rate()?),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Estimate { minutes, rate } => cmd_estimate(&cli, *minutes, *rate),
        Commands::FromTaps { taps } => cmd_from_taps(&cli, *taps),
        Commands::Target { likes, rate } => cmd_target(&cli, *likes, *rate),
        Commands::Breakdown {
            minutes,
            rate,
            taps,
        } => cmd_breakdown(&cli, *minutes, *rate, *taps),
        Commands::Compare { minutes, rates } => cmd_compare(&cli, *minutes, rates),
        Commands::Table { rate } => cmd_table(&cli, *rate),
        Commands::Rate { set } => cmd_rate(&cli, *set),
        Commands::Run {
            rate,
            seconds,
            taps,
        } => cmd_run(&cli, *rate, *seconds, *taps).await,
        Commands::History { limit } => cmd_history(&cli, *limit),
    }
}

fn cmd_estimate(cli: &Cli, minutes: i64, rate: Option<i64>) -> Result<()> {
    let store = open_store()?;
    let estimator = build_estimator()?;
    let rate = resolve_rate(&store, rate)?;
    let likes = estimator.likes_from_duration(minutes, rate);

    if cli.json {
        println!(
            "{}",
            serde_json::json!({
                "minutes": minutes,
                "tap_rate": rate,
                "expected_likes": likes,
            })
        );
    } else {
        println!("{minutes} min at {rate} taps/sec → {likes} likes");
    }
    Ok(())
}

fn cmd_from_taps(cli: &Cli, taps: i64) -> Result<()> {
    let estimator = build_estimator()?;
    let likes = estimator.likes_from_taps(taps);

    if cli.json {
        println!(
            "{}",
            serde_json::json!({ "taps": taps, "expected_likes": likes })
        );
    } else {
        println!("{taps} taps → {likes} likes");
    }
    Ok(())
}

fn cmd_target(cli: &Cli, likes: i64, rate: Option<i64>) -> Result<()> {
    let store = open_store()?;
    let estimator = build_estimator()?;
    let rate = resolve_rate(&store, rate)?;
    let minutes = estimator.minutes_for_target(likes, rate)?;

    if cli.json {
        println!(
            "{}",
            serde_json::json!({
                "target_likes": likes,
                "tap_rate": rate,
                "minutes": minutes,
            })
        );
    } else {
        println!("{likes} likes at {rate} taps/sec → {minutes} min");
    }
    Ok(())
}

fn cmd_breakdown(cli: &Cli, minutes: i64, rate: Option<i64>, taps: Option<i64>) -> Result<()> {
    let store = open_store()?;
    let estimator = build_estimator()?;
    let rate = resolve_rate(&store, rate)?;
    let breakdown = estimator.breakdown(minutes, rate, taps);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        println!("{breakdown}");
    }
    Ok(())
}

fn cmd_compare(cli: &Cli, minutes: i64, rates: &[i64]) -> Result<()> {
    let estimator = build_estimator()?;
    let rows = estimator.compare_rates(minutes, rates)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("comparison over {minutes} min");
        for row in rows {
            println!("  {row}");
        }
    }
    Ok(())
}

fn cmd_table(cli: &Cli, rate: Option<i64>) -> Result<()> {
    let store = open_store()?;
    let estimator = build_estimator()?;
    let rate = resolve_rate(&store, rate)?;
    let rows = estimator.quick_reference(rate);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        println!("quick reference at {rate} taps/sec");
        for row in rows {
            println!("  {row}");
        }
    }
    Ok(())
}

fn cmd_rate(cli: &Cli, set: Option<i64>) -> Result<()> {
    let store = open_store()?;

    if let Some(rate) = set {
        store.set_tap_rate(rate)?;
        if cli.json {
            println!("{}", serde_json::json!({ "tap_rate": rate }));
        } else {
            println!("tap rate set to {rate}");
        }
        return Ok(());
    }

    let rate = store.tap_rate()?;
    if cli.json {
        println!("{}", serde_json::json!({ "tap_rate": rate }));
    } else {
        println!("tap rate: {rate}");
    }
    Ok(())
}

async fn cmd_run(
    cli: &Cli,
    rate: Option<i64>,
    seconds: Option<u64>,
    taps: Option<u64>,
) -> Result<()> {
    let store = open_store()?;
    let estimator = build_estimator()?;
    let rate = resolve_rate(&store, rate)?;

    let pidfile = acquire_pidfile()?;
    let started_unix = tt_store::now_unix_secs();
    tracing::info!("starting session at {rate} taps/sec");

    let limits = SessionLimits {
        max_seconds: seconds,
        max_taps: taps,
    };
    let summary = session::run(&estimator, rate, limits).await;

    release_pidfile(&pidfile);

    let record = SessionRecord::new(
        started_unix,
        summary.elapsed_secs,
        rate,
        summary.taps,
        summary.estimated_likes,
    );
    store
        .record_session(&record)
        .context("failed to record session")?;

    if cli.json {
        println!(
            "{}",
            serde_json::json!({
                "tap_rate": rate,
                "taps": summary.taps,
                "elapsed_secs": summary.elapsed_secs,
                "estimated_likes": summary.estimated_likes,
            })
        );
    } else {
        println!(
            "session done: {} taps in {}s → {} likes",
            summary.taps, summary.elapsed_secs, summary.estimated_likes
        );
    }
    Ok(())
}

fn cmd_history(cli: &Cli, limit: usize) -> Result<()> {
    let store = open_store()?;
    let sessions = store.recent_sessions(limit)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("no sessions recorded");
        return Ok(());
    }

    let mut total_taps = 0i64;
    let mut total_likes = 0i64;
    for s in &sessions {
        total_taps += s.taps;
        total_likes += s.estimated_likes;
        println!(
            "{}  rate {:>2}  {:>8} taps  {:>8} likes  {:>6}s",
            tt_store::format_unix(s.started_unix),
            s.tap_rate,
            s.taps,
            s.estimated_likes,
            s.duration_secs
        );
    }
    println!(
        "total: {} sessions, {} taps, {} likes",
        sessions.len(),
        total_taps,
        total_likes
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Single-session pidfile
// ---------------------------------------------------------------------------

fn pidfile_path() -> PathBuf {
    tt_store::default_base_dir().join("tt-run.pid")
}

/// At most one session loop at a time: refuse to start while a live run
/// holds the pidfile, clean up after a dead one, then write our own.
fn acquire_pidfile() -> Result<PathBuf> {
    let path = pidfile_path();
    if let Ok(content) = std::fs::read_to_string(&path)
        && let Ok(pid) = content.trim().parse::<u32>()
    {
        if is_process_alive(pid) {
            anyhow::bail!("another session (PID {pid}) is already running");
        }
        tracing::info!("cleaned up stale pidfile (PID {pid} is dead)");
        let _ = std::fs::remove_file(&path);
    }

    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let mut f = std::fs::File::create(&path).context("failed to write pidfile")?;
    write!(f, "{}", std::process::id())?;
    Ok(path)
}

fn release_pidfile(path: &Path) {
    let _ = std::fs::remove_file(path);
}

#[cfg(unix)]
fn is_process_alive(pid: u32) -> bool {
    // kill(pid, 0) checks existence without sending a signal
    unsafe { libc::kill(pid as libc::pid_t, 0) == 0 }
}

#[cfg(not(unix))]
fn is_process_alive(_pid: u32) -> bool {
    false // conservative: assume dead on non-unix
}
