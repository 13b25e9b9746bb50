//! texlint CLI - lint texture assets against GLES backend profiles.
//!
//! This is the main entry point for the texlint command-line application.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use texlint::prelude::*;

/// texlint - texture asset linter for GLES backends
#[derive(Parser)]
#[command(name = "texlint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (use RUST_LOG=debug for more detail)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint DDS/PNG/JPG assets matching glob patterns
    Lint {
        /// Comma-separated glob patterns, e.g. "textures/*.dds,ui/*.png"
        patterns: String,

        /// Search pattern directories recursively
        #[arg(short, long)]
        recursive: bool,

        /// Directory patterns are resolved against
        #[arg(short = 'C', long, default_value = ".")]
        base_dir: PathBuf,

        /// Lint profile
        #[arg(short, long, env = "TEXLINT_PROFILE", default_value = "es2")]
        profile: String,

        /// Override the profile's bytes-per-pixel threshold
        #[arg(long)]
        max_bpp: Option<u32>,

        /// ImageMagick `identify` executable used for PNG/JPG
        #[arg(long, env = "TEXLINT_IDENTIFY", default_value = "identify")]
        identify: PathBuf,

        /// Seconds to wait for the image tool per file
        #[arg(long, env = "TEXLINT_TOOL_TIMEOUT", default_value_t = 30)]
        tool_timeout: u64,

        /// Which findings make the process exit nonzero
        #[arg(long, value_enum, default_value_t = FailOn::Never)]
        fail_on: FailOn,

        /// Report format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Dump the header of a DDS file
    Inspect {
        /// Input DDS file
        input: PathBuf,
    },

    /// List built-in lint profiles
    Profiles,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FailOn {
    Never,
    Errors,
    Warnings,
}

impl FailOn {
    /// Whether the findings in `report` should fail the run.
    fn is_failure(self, report: &LintReport) -> bool {
        match self {
            FailOn::Never => false,
            FailOn::Errors => report.error_count() > 0,
            FailOn::Warnings => !report.is_clean(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

struct LintArgs {
    scan: ScanOptions,
    profile: LintProfile,
    inspector: IdentifyInspector,
    fail_on: FailOn,
    format: OutputFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Only initialize logging if verbose or RUST_LOG is set
    if cli.verbose || std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env()
                    .add_directive(if cli.verbose { "texlint=debug".parse()? } else { "texlint=warn".parse()? }),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Lint {
            patterns,
            recursive,
            base_dir,
            profile,
            max_bpp,
            identify,
            tool_timeout,
            fail_on,
            format,
        } => {
            let mut profile = LintProfile::by_name(&profile)?;
            if let Some(max) = max_bpp {
                profile = profile.with_max_bytes_per_pixel(max);
            }
            let args = LintArgs {
                scan: ScanOptions::new(base_dir, &patterns, recursive),
                profile,
                inspector: IdentifyInspector::new(identify, Duration::from_secs(tool_timeout)),
                fail_on,
                format,
            };
            cmd_lint(args)?;
        }
        Commands::Inspect { input } => {
            cmd_inspect(&input)?;
        }
        Commands::Profiles => {
            cmd_profiles();
        }
    }

    Ok(())
}

fn cmd_lint(args: LintArgs) -> Result<()> {
    // Keep stdout clean for the JSON document
    let json = args.format == OutputFormat::Json;
    let status = |line: String| {
        if json {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    };

    let assets = scan(&args.scan).context("Failed to gather assets")?;

    for summary in &assets.patterns {
        status(format!("globbing {}...", summary.pattern));
        status(format!(
            "{} textures added, {} unknown files skipped",
            summary.textures_added, summary.unknown_skipped
        ));
    }
    for ext in &assets.unknown_extensions {
        status(format!("Unknown file type '{}'", ext));
    }

    if assets.needs_image_tool() {
        args.inspector
            .probe()
            .context("PNG/JPG assets need ImageMagick's identify")?;
    }

    status(format!("Linting {} assets with profile {}...", assets.total(), args.profile));

    let pb = ProgressBar::new(assets.total() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} assets ({percent}%)")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let linter = Linter::new(args.profile, args.inspector);
    let mut report = LintReport::new();
    linter.lint_assets(&assets, &mut report, |done, _| pb.set_position(done as u64));
    pb.finish_and_clear();

    match args.format {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    status(format!(
        "Linted {} assets in {:?}: {} errors, {} warnings",
        report.file_count(),
        start.elapsed(),
        report.error_count(),
        report.warning_count()
    ));

    if args.fail_on.is_failure(&report) {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_inspect(input: &Path) -> Result<()> {
    let dds = DdsFile::read(input)
        .with_context(|| format!("Failed to read DDS header of {}", input.display()))?;
    println!("{}", input.display());
    println!("{dds}");

    Ok(())
}

fn cmd_profiles() {
    for profile in LintProfile::ALL {
        println!("{profile}");
        for format in profile.supported_formats {
            println!("  {format}");
        }
    }
}
