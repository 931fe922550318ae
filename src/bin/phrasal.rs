use std::env;
use std::ffi::OsString;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, LevelFilter};
use phrasal::{PhraseArtifacts, PhraseConfig, PhrasePipeline};

/// Long options also accepted with a single leading dash (`-train`, `-min-count`, ...).
const LEGACY_FLAGS: &[&str] = &[
    "train",
    "output",
    "min-count",
    "threshold",
    "debug",
    "hash-capacity",
    "report",
];

#[derive(Parser, Debug)]
#[command(
    name = "phrasal",
    author,
    version,
    about = "Merge frequently co-occurring word pairs into phrase tokens",
    long_about = None,
    after_help = "Example:\n  phrasal -train text.txt -output phrases.txt -threshold 100 -debug 2"
)]
struct Cli {
    /// Use text data from <FILE> to learn phrases
    #[arg(long, value_name = "FILE")]
    train: PathBuf,

    /// Write the phrase-merged corpus to <FILE> (stdout when omitted)
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Discard words and pairs that appear fewer than <INT> times
    #[arg(long = "min-count", value_name = "INT", default_value_t = 5)]
    min_count: u64,

    /// Score a pair must exceed to form a phrase (higher means fewer phrases)
    #[arg(
        long,
        value_name = "FLOAT",
        default_value_t = 100.0,
        allow_negative_numbers = true
    )]
    threshold: f64,

    /// Verbosity: 0 warnings only, 1 summaries, 2 progress, 3+ debug
    #[arg(long, value_name = "INT", default_value_t = 2)]
    debug: u8,

    /// Slots in the vocabulary hash table
    #[arg(
        long = "hash-capacity",
        value_name = "SLOTS",
        default_value_t = PhraseConfig::default().hash_capacity
    )]
    hash_capacity: usize,

    /// Write a JSON run report to <PATH>
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = normalize_legacy_flags(env::args_os());
    if args.len() <= 1 {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    }
    let cli = Cli::parse_from(args);
    init_logging(cli.debug);
    run(cli)
}

/// Rewrites `-flag` to `--flag` for the known long options.
fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .enumerate()
        .map(|(position, arg)| {
            if position == 0 {
                return arg;
            }
            let legacy = arg
                .to_str()
                .and_then(|text| text.strip_prefix('-'))
                .filter(|name| LEGACY_FLAGS.contains(name));
            match legacy {
                Some(name) => OsString::from(format!("--{name}")),
                None => arg,
            }
        })
        .collect()
}

fn init_logging(debug: u8) {
    let level = match debug {
        0 => LevelFilter::Warn,
        1 | 2 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    builder.filter_level(level);
    let _ = builder.try_init();
}

fn run(cli: Cli) -> Result<()> {
    let cfg = PhraseConfig::builder()
        .min_count(cli.min_count)
        .threshold(cli.threshold)
        .hash_capacity(cli.hash_capacity)
        .show_progress(cli.debug > 1)
        .build()?;
    let pipeline = PhrasePipeline::new(cfg);
    info!("starting training using file {}", cli.train.display());

    let spinner = if cli.debug > 1 {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} detecting phrases... {elapsed}")?
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let artifacts = match &cli.output {
        Some(output) => pipeline.run_paths(&cli.train, output).with_context(|| {
            format!(
                "failed to write phrases from {} to {}",
                cli.train.display(),
                output.display()
            )
        })?,
        None => {
            let stdout = io::stdout();
            pipeline
                .run_to_writer(&cli.train, BufWriter::new(stdout.lock()))
                .with_context(|| {
                    format!("failed to write phrases from {}", cli.train.display())
                })?
        }
    };
    if let Some(pb) = spinner {
        pb.finish_with_message("phrases written");
    }
    let elapsed = start.elapsed();

    if let Some(report_path) = &cli.report {
        artifacts
            .report(pipeline.config())
            .save(report_path)
            .with_context(|| format!("failed to save report to {}", report_path.display()))?;
        info!("wrote run report to {}", report_path.display());
    }

    if cli.debug > 0 {
        print_summary(&artifacts, cli.output.is_some(), elapsed);
    }
    Ok(())
}

fn print_summary(artifacts: &PhraseArtifacts, output_to_file: bool, elapsed: Duration) {
    // Without -output the corpus itself occupies stdout.
    if output_to_file {
        print!("{artifacts}");
        println!("   duration {elapsed:.2?}");
    } else {
        eprint!("{artifacts}");
        eprintln!("   duration {elapsed:.2?}");
    }
}
