//! blinkgate CLI
//!
//! Usage:
//!   blinkgate --input frames.jsonl               # Replay recorded frames
//!   tracker | blinkgate --detect-both            # Replay from stdin
//!   blinkgate --input frames.jsonl --json        # JSON lines output
//!   blinkgate --serve                            # HTTP API server

use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use tracing::{info, warn};

use blinkgate::core::{replay, run_server, EyeBlinkDetector, ReplaySummary};
use blinkgate::types::{BlinkDecision, DetectorConfig, EyeBlink};
use blinkgate::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "blinkgate",
    version = VERSION,
    about = "Detect debounced left/right/both eye blinks from per-frame closure confidences",
    long_about = "blinkgate turns per-frame eye closure confidences (0.0-1.0 per eye)\n\
                  into discrete blink events: LEFT, RIGHT or BOTH.\n\n\
                  Input is one JSON object per line, either an eye sample\n  \
                  {\"left\": 0.9, \"right\": 0.1, \"timestamp_s\": 1.5}\n\
                  or a tracker frame in sensor orientation\n  \
                  {\"timestamp_s\": 1.5, \"faces\": [{\"eye_blink_left\": 0.1, \"eye_blink_right\": 0.9}]}\n\n\
                  A blink fires when exactly one eye is above the sensitivity\n\
                  (or both, with --detect-both), then nothing fires until the\n\
                  cool-down has passed."
)]
struct Args {
    /// JSON lines file to replay (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Detector config file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Closure threshold, confidence strictly above counts as closed
    #[arg(long)]
    sensitivity: Option<f32>,

    /// Seconds between two blinks
    #[arg(long)]
    cool_down: Option<f64>,

    /// Report both eyes closed as a BOTH blink
    #[arg(short, long)]
    detect_both: bool,

    /// Face frames come from a rear/unmirrored camera
    #[arg(long)]
    no_mirror: bool,

    /// Output as JSON lines
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Print every frame, not only blinks
    #[arg(short, long)]
    verbose: bool,

    /// Run as HTTP API server
    #[arg(short, long)]
    serve: bool,

    /// Server address
    #[arg(long, default_value = "127.0.0.1:3000")]
    addr: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blinkgate=info".into()),
        )
        .init();

    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    let result = if args.serve {
        run_serve(&args).await
    } else {
        run_replay(&args)
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// File config (if any) with command line overrides
fn resolve_config(args: &Args) -> blinkgate::Result<DetectorConfig> {
    let base = match &args.config {
        Some(path) => DetectorConfig::from_json_file(path)?,
        None => DetectorConfig::new(args.detect_both),
    };

    let mut builder = DetectorConfig::builder(base.detect_both_eyes || args.detect_both)
        .sensitivity(args.sensitivity.unwrap_or(base.sensitivity))
        .cool_down(base.cool_down);
    if let Some(secs) = args.cool_down {
        builder = builder.cool_down_secs(secs);
    }
    builder.build()
}

/// Replay JSON lines from a file or stdin
fn run_replay(args: &Args) -> blinkgate::Result<()> {
    let config = resolve_config(args)?;
    let mut detector = EyeBlinkDetector::new(config);
    info!(
        sensitivity = config.sensitivity,
        cool_down_secs = config.cool_down_secs(),
        detect_both_eyes = config.detect_both_eyes,
        "detector ready"
    );
    if !config.has_recommended_sensitivity() {
        warn!(
            "sensitivity {} is outside the recommended {}-{} range",
            config.sensitivity,
            blinkgate::RECOMMENDED_SENSITIVITY_MIN,
            blinkgate::RECOMMENDED_SENSITIVITY_MAX
        );
    }

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(File::open(path)?)),
        None => Box::new(io::stdin().lock()),
    };

    if !args.json {
        print_header(&config);
    }

    let summary = replay(reader, &mut detector, !args.no_mirror, |decision| {
        print_decision(decision, args);
    })?;

    if args.json {
        print_json(&summary);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

/// Print one decision according to the output flags
fn print_decision(decision: &BlinkDecision, args: &Args) {
    if decision.blink.is_none() && !args.verbose {
        return;
    }
    if args.json {
        print_json(decision);
    } else if args.no_color {
        println!("{}", decision.to_parseable_string());
    } else {
        println!("{}", decision.to_terminal_string());
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{}", json),
        Err(e) => warn!("failed to serialize output: {}", e),
    }
}

/// Print header
fn print_header(config: &DetectorConfig) {
    println!("{}", format!("blinkgate v{}", VERSION).bold());
    println!(
        "sensitivity={} | cool-down={:.2}s | both-eyes={}",
        config.sensitivity,
        config.cool_down_secs(),
        if config.detect_both_eyes { "on" } else { "off" }
    );
    println!();
}

/// Print end-of-input summary
fn print_summary(summary: &ReplaySummary) {
    println!();
    println!(
        "Frames: {} | skipped (no face): {} | malformed: {}",
        summary.frames, summary.skipped, summary.malformed
    );
    let per_side: Vec<String> = EyeBlink::ALL
        .iter()
        .map(|side| format!("{}={}", side, summary.blinks.get(*side)).color(side.color()).to_string())
        .collect();
    println!("Blinks: {} ({})", summary.blinks.total(), per_side.join(", "));
}

/// Run HTTP API server
async fn run_serve(args: &Args) -> blinkgate::Result<()> {
    println!("{}", format!("blinkgate API server v{}", VERSION).bold());
    println!();

    run_server(&args.addr).await
}
