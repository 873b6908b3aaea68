mod report;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::fs::{self, File};
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use report::{
    EventReport, ReportOptions, generate_console_report, generate_event_list,
    generate_json_report, generate_markdown_report,
};
use timed_events::{Clock, EncounterTier, EventCatalog, EventEngine, FixedClock, SystemClock};

const DEFAULT_FRIENDSHIP_BASELINE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored human-readable summary
    Console,
    /// Machine-readable JSON
    Json,
    /// Markdown tables
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "timed-events-tester", version)]
#[command(about = "Evaluate a timed event catalog at an instant and report every overlay query")]
struct Args {
    /// Catalog JSON file (defaults to the bundled catalog)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Instant to evaluate, RFC 3339 (defaults to now)
    #[arg(long)]
    at: Option<DateTime<Utc>>,

    /// Language used to resolve the banner asset key
    #[arg(long)]
    lang: Option<String>,

    /// Baseline for the classic friendship multiplier floor
    #[arg(long, default_value_t = DEFAULT_FRIENDSHIP_BASELINE)]
    friendship_baseline: f64,

    /// Resolve an encounter tier, as KEY=NORMAL_TIER (repeatable)
    #[arg(long = "encounter-tier", value_parser = parse_tier_query)]
    encounter_tiers: Vec<(String, EncounterTier)>,

    /// Seed for picking one of the active event encounters
    #[arg(long)]
    seed: Option<u64>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// List catalog events with their status and exit
    #[arg(long)]
    list_events: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let clock: Box<dyn Clock> = match args.at {
        Some(at) => Box::new(FixedClock(at)),
        None => Box::new(SystemClock),
    };
    let engine = EventEngine::new(catalog, clock.as_ref());
    let mut output_target = OutputTarget::new(args.output.clone())?;

    if args.list_events {
        generate_event_list(output_target.writer(), engine.catalog(), engine.now())?;
        output_target.flush_inner()?;
        return Ok(());
    }

    let active = engine.current();
    if args.verbose {
        eprintln!(
            "{} {} active of {} at {}",
            "🔎".bright_cyan(),
            active.events().len(),
            engine.catalog().len(),
            active.now().to_rfc3339()
        );
    }

    let mut rng = args.seed.map(ChaCha20Rng::seed_from_u64);
    let report = EventReport::build(
        engine.catalog(),
        &active,
        ReportOptions {
            friendship_baseline: args.friendship_baseline,
            lang: args.lang.as_deref(),
            tier_queries: &args.encounter_tiers,
            rng: rng.as_mut(),
        },
    );

    match args.report {
        ReportFormat::Console => generate_console_report(output_target.writer(), &report)?,
        ReportFormat::Json => generate_json_report(output_target.writer(), &report)?,
        ReportFormat::Markdown => generate_markdown_report(output_target.writer(), &report)?,
    }
    output_target.flush_inner()?;
    Ok(())
}

fn load_catalog(path: Option<&Path>) -> Result<EventCatalog> {
    let Some(path) = path else {
        log::debug!("using bundled event catalog");
        return Ok(EventCatalog::load_from_static());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let catalog = EventCatalog::from_json(&json)
        .with_context(|| format!("invalid event catalog {}", path.display()))?;
    log::info!("loaded {} events from {}", catalog.len(), path.display());
    Ok(catalog)
}

fn parse_tier_query(raw: &str) -> Result<(String, EncounterTier)> {
    let Some((key, tier)) = raw.split_once('=') else {
        bail!("expected KEY=TIER, got `{raw}`");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("encounter key is empty in `{raw}`");
    }
    let Some(tier) = EncounterTier::from_label(tier) else {
        bail!("unknown tier `{tier}` (expected common, great, ultra, rogue or master)");
    };
    Ok((key.to_string(), tier))
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}
