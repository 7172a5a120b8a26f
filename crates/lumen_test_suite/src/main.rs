//! Visual Test Runner
//!
//! Command-line tool for running visual regression tests for Lumen.
//!
//! Usage:
//!   lumen-visual-tests                      # Run all tests
//!   lumen-visual-tests --filter ripple      # Run tests matching "ripple"
//!   lumen-visual-tests --list               # List all tests
//!   lumen-visual-tests --update-references  # Re-record reference images

use anyhow::Result;
use clap::Parser;
use lumen_test_suite::{tests, SuiteConfig, TestHarness, TestHarnessConfig, TestRunner};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "lumen-visual-tests")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Visual regression tests for Lumen effects", long_about = None)]
struct Cli {
    /// Suite configuration file (defaults to ./lumen.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Only run tests whose name or category contains this pattern
    #[arg(short, long)]
    filter: Option<String>,

    /// List all tests and exit
    #[arg(long)]
    list: bool,

    /// Output directory for rendered frames
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite reference images with the new output
    #[arg(long)]
    update_references: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    if cli.list {
        println!("Available test suites:");
        for suite in tests::all_suites() {
            println!("\n  {}:", suite.name);
            for case in &suite.cases {
                println!("    - {}", case.name);
            }
        }
        return Ok(());
    }

    let suite_config = match &cli.config {
        Some(path) => SuiteConfig::load(path)?,
        None => SuiteConfig::load_from_dir(&std::env::current_dir()?)?,
    };

    let mut harness_config = TestHarnessConfig::from(suite_config);
    if let Some(output) = cli.output {
        harness_config.output_dir = output;
    }
    harness_config.update_references = cli.update_references;

    println!("╔══════════════════════════════════════════╗");
    println!("║      LUMEN VISUAL REGRESSION TESTS       ║");
    println!("╚══════════════════════════════════════════╝\n");

    let mut runner = TestRunner::with_harness(TestHarness::with_config(harness_config)?);

    for suite in tests::all_suites() {
        runner.add_suite(suite);
    }

    if let Some(ref pattern) = cli.filter {
        println!("Running tests matching: {}\n", pattern);
        runner.filter(pattern);
    }

    let result = runner.run();

    result.print_summary();

    // Exit with error code if any tests failed
    if result.all_passed() {
        println!("\nAll tests passed!");
        Ok(())
    } else {
        std::process::exit(1);
    }
}
