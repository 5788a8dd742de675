//! # tempokit CLI
//!
//! Command-line front end for the tempokit library. Every subcommand prints
//! pretty JSON on stdout; logs go to stderr.
//!
//! Usage:
//!   tempokit parse "2024-01-01 10:07:00.000000 +0000"
//!   tempokit round "2024-01-01 10:07:00.000000 +0000" --granularity 5 --ceil
//!   tempokit fill START [END] --granularity 10
//!   tempokit days 2024-01-01 2024-01-03
//!   tempokit format "2024-01-01 10:07:00.000000 +0530" --pattern "%H:%M" --utc

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tempokit::{
    dates_between, delta_days, fill_intervals, round_down_one_minute, round_to_boundary,
    time_delta, to_instant, to_text, to_utc_text, Clock, DayEntry, EngineConfig, Instant,
    Normalized, ParseOptions, SystemClock, TargetZone, TimeInput, DAY_FORMAT,
};

#[derive(Parser)]
#[command(
    name = "tempokit",
    version,
    about = "Normalize, round, and enumerate timestamps"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Input datetime pattern (defaults to DATE_FORMAT or the canonical pattern)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Zone attached to offset-less input: UTC, +05:30, or an IANA name
    #[arg(long, global = true)]
    tz: Option<String>,

    /// Attach the zone even to input that carries its own offset
    #[arg(long, global = true)]
    force_zone: bool,

    /// JSON config file with `datetime_format` and `timezone`
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a value into an offset-aware instant
    Parse {
        value: String,
    },

    /// Round to a minute-granularity boundary
    Round {
        value: String,

        /// Boundary size in minutes
        #[arg(short, long, default_value_t = 5)]
        granularity: u32,

        /// Ceiling mode (no forward step)
        #[arg(long)]
        ceil: bool,
    },

    /// Last fully elapsed minute before a value
    LastMinute {
        value: String,
    },

    /// Every boundary between two values, inclusive
    Fill {
        start: String,

        /// Defaults to now
        end: Option<String>,

        /// Step in minutes
        #[arg(short, long, default_value_t = 10)]
        granularity: u32,
    },

    /// Every calendar day between two dates, inclusive, with epoch seconds
    Days {
        start: String,

        /// Defaults to today
        end: Option<String>,

        /// Day-level pattern
        #[arg(long, default_value = DAY_FORMAT)]
        day_format: String,

        /// Emit dates as structured values (same JSON shape, ISO dates)
        #[arg(long)]
        dates: bool,
    },

    /// Render a value with an output pattern
    Format {
        value: String,

        /// Output pattern
        #[arg(short, long)]
        pattern: String,

        /// Convert to UTC before rendering
        #[arg(long)]
        utc: bool,
    },

    /// Distance between two values (end defaults to now)
    Delta {
        start: String,
        end: Option<String>,
    },
}

// ── Output shapes ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ParseOutput {
    instant: Instant,
    timestamp: i64,
    fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl From<&Normalized> for ParseOutput {
    fn from(normalized: &Normalized) -> Self {
        let instant = normalized.instant();
        Self {
            instant,
            timestamp: instant.timestamp(),
            fallback: normalized.is_fallback(),
            reason: normalized.reason().map(ToString::to_string),
        }
    }
}

#[derive(Serialize)]
struct RoundOutput {
    original: Instant,
    rounded: Instant,
}

#[derive(Serialize)]
struct DaysOutput {
    dates: Vec<DayEntry>,
    timestamps: Vec<i64>,
}

#[derive(Serialize)]
struct FormatOutput {
    text: Option<String>,
}

#[derive(Serialize)]
struct DeltaOutput {
    seconds: f64,
    days: i64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    let options = parse_options(&cli, &config)?;
    tracing::debug!(format = %options.format, zone = %options.zone, "resolved parse options");
    let clock = SystemClock;

    let output = run(cli.command, &options, &clock)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "tempokit=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// File config when given, otherwise the environment.
fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let config = match &cli.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let config: EngineConfig = serde_json::from_str(&contents)
                .with_context(|| format!("parsing config {}", path.display()))?;
            config.validate()?;
            config
        }
        None => EngineConfig::from_env()?,
    };
    Ok(config)
}

fn parse_options(cli: &Cli, config: &EngineConfig) -> Result<ParseOptions> {
    let mut options = config.parse_options()?.with_force_zone(cli.force_zone);
    if let Some(format) = &cli.format {
        options = options.with_format(format.as_str());
    }
    if let Some(tz) = &cli.tz {
        let zone: TargetZone = tz.parse().with_context(|| format!("--tz {tz}"))?;
        options = options.with_zone(zone);
    }
    Ok(options)
}

fn run(command: Commands, options: &ParseOptions, clock: &dyn Clock) -> Result<serde_json::Value> {
    let normalize = |value: &str| to_instant(value, options, clock).instant();

    let value = match command {
        Commands::Parse { value } => {
            serde_json::to_value(ParseOutput::from(&to_instant(value.as_str(), options, clock)))?
        }
        Commands::Round {
            value,
            granularity,
            ceil,
        } => {
            let original = normalize(&value);
            serde_json::to_value(RoundOutput {
                original,
                rounded: round_to_boundary(original, granularity, ceil),
            })?
        }
        Commands::LastMinute { value } => {
            let original = normalize(&value);
            serde_json::to_value(RoundOutput {
                original,
                rounded: round_down_one_minute(original),
            })?
        }
        Commands::Fill {
            start,
            end,
            granularity,
        } => {
            let start = normalize(&start);
            let end = end.as_deref().map(normalize);
            serde_json::to_value(fill_intervals(start, end, granularity, clock))?
        }
        Commands::Days {
            start,
            end,
            day_format,
            dates,
        } => {
            let (dates, timestamps) = dates_between(
                start.as_str(),
                end.as_deref().map(TimeInput::from),
                &day_format,
                !dates,
                options,
                clock,
            );
            serde_json::to_value(DaysOutput { dates, timestamps })?
        }
        Commands::Format {
            value,
            pattern,
            utc,
        } => {
            let instant = normalize(&value);
            let text = if utc {
                to_utc_text(&instant, &pattern)
            } else {
                to_text(&instant, &pattern)
            };
            serde_json::to_value(FormatOutput { text })?
        }
        Commands::Delta { start, end } => {
            let end = end.as_deref().map(TimeInput::from);
            serde_json::to_value(DeltaOutput {
                seconds: time_delta(start.as_str(), end.clone(), options, clock),
                days: delta_days(start.as_str(), end, options, clock),
            })?
        }
    };
    Ok(value)
}
