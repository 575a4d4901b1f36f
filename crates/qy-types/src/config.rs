//! Search configuration: built once per run, validated, then read-only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::candidate::OutputColumns;
use crate::errors::{ConfigError, QyResult};

/// Built-in scoring strategies selectable at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Distance of `x0` from 0.5.
    Midpoint,
    /// Mutual irrationality of two values against the golden ratio conjugate.
    Coirrational,
    /// Distance of `fract(x0 * x1 * x2)` from 0.618.
    Product,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 3] = [Self::Midpoint, Self::Coirrational, Self::Product];

    /// Number of coordinates the strategy scores.
    pub fn dimensions(self) -> usize {
        match self {
            Self::Midpoint => 1,
            Self::Coirrational => 2,
            Self::Product => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Midpoint => "midpoint",
            Self::Coirrational => "coirrational",
            Self::Product => "product",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownStrategy(s.to_string()))
    }
}

/// Everything one exhaustive search run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Run name; also the base name of the result file.
    pub name: String,

    /// Number of coordinates per point (D).
    pub dimensions: usize,

    /// Encoded increment between visited values of a dimension.
    pub step: u32,

    /// How many best candidates to retain (K).
    pub keep: usize,

    pub strategy: StrategyKind,

    /// Worker count override. `None` uses the available hardware parallelism.
    #[serde(default)]
    pub workers: Option<usize>,

    /// Inclusive lower bound of every dimension.
    #[serde(default = "default_domain_min")]
    pub domain_min: f32,

    /// Exclusive upper bound of every dimension.
    #[serde(default = "default_domain_max")]
    pub domain_max: f32,

    #[serde(default)]
    pub output_columns: OutputColumns,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_domain_min() -> f32 {
    0.0
}

fn default_domain_max() -> f32 {
    1.0
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

/// Named presets reproducing the classic search variants.
pub const PRESET_NAMES: [&str; 3] = ["test1d", "coirrational", "test3d"];

impl SearchConfig {
    pub fn new(name: impl Into<String>, strategy: StrategyKind) -> Self {
        Self {
            name: name.into(),
            dimensions: strategy.dimensions(),
            step: 1,
            keep: 5,
            strategy,
            workers: None,
            domain_min: default_domain_min(),
            domain_max: default_domain_max(),
            output_columns: OutputColumns::default(),
            output_dir: default_output_dir(),
        }
    }

    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "test1d" => Ok(Self::new(name, StrategyKind::Midpoint).with_step(1)),
            "coirrational" => Ok(Self::new(name, StrategyKind::Coirrational).with_step(1024 * 16)),
            "test3d" => Ok(Self::new(name, StrategyKind::Product).with_step(1024 * 256)),
            _ => Err(ConfigError::UnknownPreset(name.to_string())),
        }
    }

    /// Load a configuration from a JSON file. The result is not yet validated.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> QyResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    pub fn with_step(mut self, step: u32) -> Self {
        self.step = step;
        self
    }

    pub fn with_keep(mut self, keep: usize) -> Self {
        self.keep = keep;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_domain(mut self, min: f32, max: f32) -> Self {
        self.domain_min = min;
        self.domain_max = max;
        self
    }

    pub fn with_output_columns(mut self, columns: OutputColumns) -> Self {
        self.output_columns = columns;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Check everything that can be checked without a scorer in hand.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dimensions == 0 {
            return Err(ConfigError::ZeroDimensions);
        }
        if self.step == 0 {
            return Err(ConfigError::ZeroStep);
        }
        if self.keep == 0 {
            return Err(ConfigError::ZeroKeep);
        }
        if self.workers == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }
        let (min, max) = (self.domain_min, self.domain_max);
        let finite = min.is_finite() && max.is_finite();
        if !finite || min < 0.0 || max > 1.0 || min >= max || min.is_sign_negative() {
            return Err(ConfigError::InvalidDomain { min, max });
        }
        Ok(())
    }

    /// Worker count to use: the override, else the hardware parallelism (at least 1).
    pub fn resolved_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
        .max(1)
    }
}
