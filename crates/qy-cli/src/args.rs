//! Command-line arguments and how they become a [`SearchConfig`].

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use qy_types::{OutputColumns, QyResult, SearchConfig, StrategyKind};

/// Preset used when neither a preset, a config file nor a strategy is given.
pub const DEFAULT_PRESET: &str = "coirrational";

/// Quarry - exhaustive search for well-behaved float constants
#[derive(Debug, Parser)]
#[command(name = "quarry")]
#[command(version = "0.1.0")]
#[command(about = "Exhaustive bit-ordered search over [0, 1] coordinates")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run one search and write its results as CSV
    Run(RunArgs),
    /// List the built-in presets
    Presets,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Start from a named preset (test1d, coirrational, test3d)
    #[arg(long, conflicts_with = "config")]
    pub preset: Option<String>,

    /// Start from a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Run name, also the result file's base name
    #[arg(long)]
    pub name: Option<String>,

    /// Scoring strategy (midpoint, coirrational, product)
    #[arg(long)]
    pub strategy: Option<StrategyKind>,

    /// Number of coordinates per point
    #[arg(long)]
    pub dimensions: Option<usize>,

    /// Encoded increment between visited values
    #[arg(long)]
    pub step: Option<u32>,

    /// Number of best candidates to keep
    #[arg(short, long)]
    pub keep: Option<usize>,

    /// Worker threads (defaults to available parallelism)
    #[arg(short, long, env = "QUARRY_WORKERS")]
    pub workers: Option<usize>,

    /// Lower bound of every dimension
    #[arg(long)]
    pub domain_min: Option<f32>,

    /// Exclusive upper bound of every dimension
    #[arg(long)]
    pub domain_max: Option<f32>,

    /// Coordinate columns to write (raw, encoded, both)
    #[arg(long)]
    pub columns: Option<OutputColumns>,

    /// Directory for result files
    #[arg(short, long, env = "QUARRY_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    /// Base configuration (file, preset, strategy or the default preset)
    /// with every explicit flag applied on top. Not yet validated.
    pub fn to_config(&self) -> QyResult<SearchConfig> {
        let mut config = if let Some(path) = &self.config {
            SearchConfig::from_json_file(path)?
        } else if let Some(preset) = &self.preset {
            SearchConfig::preset(preset)?
        } else if let Some(strategy) = self.strategy {
            SearchConfig::new(strategy.as_str(), strategy)
        } else {
            SearchConfig::preset(DEFAULT_PRESET)?
        };

        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
            config.dimensions = strategy.dimensions();
        }
        if let Some(name) = &self.name {
            config.name = name.clone();
        }
        if let Some(dimensions) = self.dimensions {
            config.dimensions = dimensions;
        }
        if let Some(step) = self.step {
            config.step = step;
        }
        if let Some(keep) = self.keep {
            config.keep = keep;
        }
        if let Some(workers) = self.workers {
            config.workers = Some(workers);
        }
        if let Some(min) = self.domain_min {
            config.domain_min = min;
        }
        if let Some(max) = self.domain_max {
            config.domain_max = max;
        }
        if let Some(columns) = self.columns {
            config.output_columns = columns;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qy_types::{ConfigError, QyError};

    fn run_args(argv: &[&str]) -> RunArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Run(args) => args,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn no_flags_uses_default_preset() {
        let config = RunArgs::default().to_config().unwrap();
        assert_eq!(config, SearchConfig::preset(DEFAULT_PRESET).unwrap());
    }

    #[test]
    fn flags_override_preset() {
        let args = run_args(&[
            "quarry", "run", "--preset", "test3d", "--step", "4096", "--keep", "2",
            "--workers", "3", "--columns", "raw", "--output-dir", "results",
        ]);
        let config = args.to_config().unwrap();
        assert_eq!(config.name, "test3d");
        assert_eq!(config.strategy, StrategyKind::Product);
        assert_eq!(config.step, 4096);
        assert_eq!(config.keep, 2);
        assert_eq!(config.workers, Some(3));
        assert_eq!(config.output_columns, OutputColumns::Raw);
        assert_eq!(config.output_dir, PathBuf::from("results"));
    }

    #[test]
    fn strategy_alone_builds_a_fresh_config() {
        let args = run_args(&["quarry", "run", "--strategy", "midpoint", "--domain-max", "0.75"]);
        let config = args.to_config().unwrap();
        assert_eq!(config.name, "midpoint");
        assert_eq!(config.dimensions, 1);
        assert_eq!(config.domain_max, 0.75);
    }

    #[test]
    fn unknown_values_are_rejected() {
        assert!(Cli::try_parse_from(["quarry", "run", "--strategy", "simplex"]).is_err());
        assert!(Cli::try_parse_from(["quarry", "run", "--columns", "all"]).is_err());

        let args = run_args(&["quarry", "run", "--preset", "test9d"]);
        assert!(matches!(
            args.to_config(),
            Err(QyError::Config(ConfigError::UnknownPreset(_)))
        ));
    }

    #[test]
    fn preset_and_config_conflict() {
        assert!(Cli::try_parse_from(["quarry", "run", "--preset", "test1d", "--config", "x.json"])
            .is_err());
    }

    #[test]
    fn config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let written = SearchConfig::new("from-file", StrategyKind::Coirrational).with_step(77);
        std::fs::write(&path, serde_json::to_string(&written).unwrap()).unwrap();

        let args = run_args(&["quarry", "run", "--config", path.to_str().unwrap(), "-k", "9"]);
        let config = args.to_config().unwrap();
        assert_eq!(config.name, "from-file");
        assert_eq!(config.step, 77);
        assert_eq!(config.keep, 9);
    }
}
