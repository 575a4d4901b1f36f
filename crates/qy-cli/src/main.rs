//! Quarry CLI
//!
//! - `quarry run`: run one exhaustive search, show progress, write the CSV
//! - `quarry presets`: list the built-in search presets
//!
//! Exits non-zero on configuration or output errors.

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use qy_search::{SearchEngine, SearchReport};
use qy_sinks::{ConsoleProgress, CsvResultSink};
use qy_types::{SearchConfig, PRESET_NAMES};

mod args;

use args::{Cli, Commands, RunArgs};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the progress line and reports,
    // or only the JSON report with --json.
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => run(&args),
        Commands::Presets => list_presets(),
    }
}

fn run(args: &RunArgs) -> anyhow::Result<()> {
    let config = args.to_config().context("invalid search configuration")?;
    let mut engine = SearchEngine::new(config.clone()).context("invalid search configuration")?;

    // Create the output directory before spending hours scanning.
    let mut sink = CsvResultSink::for_config(&config).with_context(|| {
        format!("cannot prepare output directory {}", config.output_dir.display())
    })?;

    let banner = format!("{} - {} threads...", config.name, engine.workers());
    info!(scorer = engine.scorer_name(), workers = engine.workers(), "search configured");
    let outcome = if args.json {
        eprintln!("{banner}");
        engine.run(&mut ConsoleProgress::stderr(), &mut sink)
    } else {
        println!("{banner}");
        engine.run(&mut ConsoleProgress::stdout(), &mut sink)
    };
    let report = outcome.with_context(|| format!("search {} failed", config.name))?;

    write_outcome(&mut io::stdout().lock(), &report, args.json)?;
    info!(
        path = %sink.path().display(),
        points = report.points_scanned,
        "results written"
    );
    Ok(())
}

/// The final stdout summary: the pretty JSON report alone, or one line
/// naming the best candidate.
fn write_outcome<W: Write>(out: &mut W, report: &SearchReport, json: bool) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, report)?;
        writeln!(out)?;
    } else if let Some(best) = report.best() {
        writeln!(out, "best score {} at {:?}", best.score, best.coordinate)?;
    } else {
        writeln!(out, "no candidate scored below the sentinel")?;
    }
    Ok(())
}

fn list_presets() -> anyhow::Result<()> {
    for name in PRESET_NAMES {
        let preset = SearchConfig::preset(name)?;
        println!(
            "{name:<14} strategy={:<13} dimensions={} step={} keep={}",
            preset.strategy, preset.dimensions, preset.step, preset.keep
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use qy_search::{MemorySink, NullProgress};
    use qy_types::StrategyKind;

    fn small_report() -> SearchReport {
        let config = SearchConfig::new("cli", StrategyKind::Midpoint)
            .with_domain(0.25, 0.75)
            .with_step(1 << 20)
            .with_keep(2)
            .with_workers(2);
        SearchEngine::new(config)
            .unwrap()
            .run(&mut NullProgress, &mut MemorySink::default())
            .unwrap()
    }

    #[test]
    fn json_outcome_is_the_whole_output() {
        let report = small_report();
        let mut out = Vec::new();
        write_outcome(&mut out, &report, true).unwrap();

        let parsed: SearchReport = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.id, report.id);
        assert_eq!(parsed.results, report.results);
    }

    #[test]
    fn plain_outcome_names_the_best_candidate() {
        let report = small_report();
        let mut out = Vec::new();
        write_outcome(&mut out, &report, false).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("best score "));
        assert_eq!(text.lines().count(), 1);
    }
}
