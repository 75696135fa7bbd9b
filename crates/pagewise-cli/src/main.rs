//! pagewise - combined page-wise text export with headings

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use pagewise_cli::{run_ingest, Config, IngestOptions, IngestOutcome, DEFAULT_OUT_DIR};
use pagewise_core::ERRORS_FILE;
use std::io::{self, BufRead};
use std::path::PathBuf;

/// Verbosity level for output control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Verbosity {
    /// Suppress all output except errors
    Quiet,
    /// Normal output (default)
    Normal,
    /// Debug logging
    Verbose,
}

impl Verbosity {
    /// Create from CLI flags
    const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Check if output should be shown (not quiet)
    const fn should_show_output(self) -> bool {
        !matches!(self, Self::Quiet)
    }

    /// Default log filter; `RUST_LOG` overrides it
    const fn log_filter(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn",
            Self::Verbose => "debug",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "pagewise",
    about = "Combined page-wise text export with headings",
    long_about = "Convert PDF, DOCX, PPTX and HTML files and write one combined text report\n\
                  with a block per page listing the headings found on it.\n\
                  \n\
                  Writes combined.txt and _errors.txt into the output directory.",
    version
)]
struct Args {
    /// Input files (.pdf, .docx, .pptx, .html); other paths are ignored
    #[arg(long, num_args = 1.., value_name = "PATH", required_unless_present = "stdin")]
    files: Vec<PathBuf>,

    /// Read additional file paths from stdin (one per line)
    #[arg(long)]
    stdin: bool,

    /// Output directory [default: out_txt]
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Hide GPUs from the conversion engine (sets CUDA_VISIBLE_DEVICES=-1)
    #[arg(long)]
    cpu_only: bool,

    /// Maximum pages (PDF) or slides (PPTX) to read per file
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Also write combined.json with sections and pages per file
    #[arg(long)]
    json: bool,

    /// Config file to use instead of ./.pagewise.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,

    /// Show detailed processing information
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
}

fn init_logging(verbosity: Verbosity) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(verbosity.log_filter()))
        .target(env_logger::Target::Stderr)
        .init();
}

/// Non-empty lines of stdin as paths
fn read_stdin_paths() -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read file list from stdin")?;
        let line = line.trim();
        if !line.is_empty() {
            paths.push(PathBuf::from(line));
        }
    }
    Ok(paths)
}

fn progress_bar(verbosity: Verbosity) -> ProgressBar {
    if !verbosity.should_show_output() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
            .expect("template is compile-time constant")
            .progress_chars("█▓▒░  "),
    );
    pb
}

fn main() -> Result<()> {
    let args = Args::parse();
    let verbosity = Verbosity::from_flags(args.quiet, args.verbose);
    init_logging(verbosity);

    // CLI args > explicit or project config > user config > defaults
    let config = match &args.config {
        Some(path) => {
            let explicit = Config::load_from_file(path)?;
            Config::merge(Config::load_user_config(), Some(explicit))
        }
        None => {
            let (user_config, project_config) = Config::discover_configs();
            Config::merge(user_config, project_config)
        }
    };
    let defaults = config.ingest();

    let options = IngestOptions {
        out_dir: args
            .out
            .or(defaults.out)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR)),
        max_pages: args.max_pages.or(defaults.max_pages),
        json: args.json || defaults.json.unwrap_or(false),
    };

    if args.cpu_only || defaults.cpu_only.unwrap_or(false) {
        std::env::set_var("CUDA_VISIBLE_DEVICES", "-1");
        log::debug!("CUDA_VISIBLE_DEVICES=-1");
    }

    let mut files = args.files;
    if args.stdin {
        files.extend(read_stdin_paths()?);
    }

    let progress = progress_bar(verbosity);
    let outcome = run_ingest(&files, &options, &progress)?;

    if let IngestOutcome::Completed { files, errors } = outcome {
        if errors > 0 && verbosity.should_show_output() {
            eprintln!(
                "{} {errors} of {files} file(s) failed, see {}",
                "Warning:".yellow().bold(),
                options.out_dir.join(ERRORS_FILE).display()
            );
        }
    }
    println!("{}", outcome.summary());

    Ok(())
}
