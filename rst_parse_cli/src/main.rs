//! # rst-parse
//!
//! Command-line front end for the shift-reduce RST parser.
//!
//! ```bash
//! # Greedy parse, one JSON record per document on stdout
//! rst-parse parse -p model.json doc1.json doc2.json
//!
//! # Beam search keeping 3 trees
//! rst-parse parse -p model.json -a 4 -s 16 -n 3 doc.json
//!
//! # Training examples from a gold derivation
//! rst-parse extract doc.json doc.actions > doc.examples.jsonl
//! ```

use clap::{ArgAction, Args, Parser, Subcommand};
use rst_parser::batch::{self, BatchConfig};
use rst_parser::config::{build_info, LoggingPreferences, RuntimeConfig};
use rst_parser::logging::{LogLevel, LoggingService, StructuredLogger};
use rst_parser::pipeline;
use rst_parser::search::ShiftReduceParser;
use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

type CliResult<T> = Result<T, Box<dyn Error>>;

#[derive(Parser, Debug)]
#[command(name = "rst-parse", author, version)]
#[command(about = "Shift-reduce RST discourse parser over pre-segmented documents")]
#[command(propagate_version = true)]
struct Cli {
    /// Print more status information; repeat for more detail
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Runtime configuration file (TOML) with [parser] and [logging] sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse segmented documents into ranked RST trees
    Parse(ParseArgs),

    /// Replay a gold action sequence and print training examples
    Extract(ExtractArgs),
}

#[derive(Args, Debug)]
struct ParseArgs {
    /// Segmented document files (JSON)
    #[arg(required = true)]
    input_paths: Vec<PathBuf>,

    /// Path to the RST parsing model (JSON weights)
    #[arg(short = 'p', long)]
    parsing_model: PathBuf,

    /// Candidate actions expanded per state
    #[arg(short = 'a', long)]
    max_acts: Option<usize>,

    /// Beam width
    #[arg(short = 's', long)]
    max_states: Option<usize>,

    /// Number of trees to return per document
    #[arg(short = 'n', long)]
    n_best: Option<usize>,

    /// Stop searching once a state has taken this many actions
    #[arg(long)]
    max_steps: Option<usize>,

    /// Worker threads for multi-document input
    #[arg(short = 'j', long, default_value_t = 1)]
    threads: usize,

    /// Do not write <input>_<rank>.parentedtree files
    #[arg(long)]
    no_tree_files: bool,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Segmented document file (JSON)
    document: PathBuf,

    /// Gold derivation, one action per line (e.g. `S:text`, `B:ROOT`)
    gold_actions: PathBuf,

    /// Print the derived tree instead of feature vectors
    #[arg(long)]
    no_features: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli, &mut io::stdout().lock()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns false when some document failed
fn run(cli: &Cli, out: &mut impl Write) -> CliResult<bool> {
    let config = match &cli.config {
        Some(path) => RuntimeConfig::from_toml_file(path)?,
        None => RuntimeConfig::default(),
    };
    let logger = build_logger(cli.verbose, &config.logging);
    logger.log_debug(&format!(
        "rst-parse {} ({})",
        env!("CARGO_PKG_VERSION"),
        build_info::source_info()
    ));

    match &cli.command {
        Command::Parse(args) => run_parse(args, &config, &logger, out),
        Command::Extract(args) => run_extract(args, &config, &logger, out),
    }
}

/// `-v` count to level: warnings by default, then info, then debug
fn verbosity_level(verbose: u8) -> LogLevel {
    match verbose {
        0 => LogLevel::Warning,
        1 => LogLevel::Info,
        _ => LogLevel::Debug,
    }
}

fn level_filter(level: LogLevel) -> log::LevelFilter {
    match level {
        LogLevel::Error => log::LevelFilter::Error,
        LogLevel::Warning => log::LevelFilter::Warn,
        LogLevel::Info => log::LevelFilter::Info,
        LogLevel::Debug => log::LevelFilter::Debug,
    }
}

fn build_logger(verbose: u8, preferences: &LoggingPreferences) -> LoggingService {
    let level = if verbose > 0 {
        verbosity_level(verbose)
    } else {
        preferences.min_log_level
    };

    if preferences.use_structured_logging {
        return LoggingService::new(Arc::new(StructuredLogger::new(level)), level);
    }

    // a second init (tests) keeps the first logger
    let _ = env_logger::Builder::new()
        .filter_level(level_filter(level))
        .target(env_logger::Target::Stderr)
        .try_init();
    LoggingService::log_crate(level)
}

fn run_parse(
    args: &ParseArgs,
    config: &RuntimeConfig,
    logger: &LoggingService,
    out: &mut impl Write,
) -> CliResult<bool> {
    let mut parser_config = config.parser;
    if let Some(max_acts) = args.max_acts {
        parser_config.max_acts = max_acts;
    }
    if let Some(max_states) = args.max_states {
        parser_config.max_states = max_states;
    }
    if let Some(n_best) = args.n_best {
        parser_config.n_best = n_best;
    }
    if args.max_steps.is_some() {
        parser_config.max_steps = args.max_steps;
    }

    let parser = ShiftReduceParser::new(parser_config)?;
    let model = pipeline::load_model(&args.parsing_model, logger)?;

    let results = batch::process_files(
        &args.input_paths,
        &BatchConfig::with_threads(args.threads),
        &parser,
        &model,
        logger,
    )?;

    for (path, output) in &results.successful_files {
        writeln!(out, "{}", output.to_json()?)?;
        if !args.no_tree_files {
            output.write_parented_trees(path)?;
        }
    }
    for (path, error) in &results.failed_files {
        eprintln!("Error: {}: {}", path.display(), error);
    }

    Ok(results.failure_count() == 0)
}

fn run_extract(
    args: &ExtractArgs,
    config: &RuntimeConfig,
    logger: &LoggingService,
    out: &mut impl Write,
) -> CliResult<bool> {
    let parser = ShiftReduceParser::new(config.parser)?;
    let document = pipeline::load_document(&args.document, logger)?;
    let gold = read_gold_actions(&args.gold_actions)?;

    let training =
        pipeline::extract_training_data(&document, &gold, !args.no_features, &parser, logger)?;

    if args.no_features {
        for scored in &training.trees {
            writeln!(out, "{}", serde_json::to_string(scored)?)?;
        }
    } else {
        write!(out, "{}", pipeline::training_examples_to_json_lines(&training.examples)?)?;
    }
    Ok(true)
}

/// One action per line; blank lines and `#` comments are skipped
fn read_gold_actions(path: &Path) -> CliResult<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read gold actions {}: {}", path.display(), e))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
