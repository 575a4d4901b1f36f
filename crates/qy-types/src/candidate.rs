//! Scored points and the description of how they are persisted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ConfigError;

/// Reserved score meaning "excluded". Ranks as +infinity: no candidate
/// carrying it (or anything not strictly below it) is ever reported.
pub const SENTINEL_SCORE: f32 = f32::MAX;

/// Whether `score` is a real, rankable score.
#[inline]
pub fn is_live_score(score: f32) -> bool {
    score < SENTINEL_SCORE
}

/// A coordinate tuple together with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub coordinate: Vec<f32>,
    pub score: f32,
}

impl Candidate {
    pub fn new(coordinate: Vec<f32>, score: f32) -> Self {
        Self { coordinate, score }
    }

    pub fn dimensions(&self) -> usize {
        self.coordinate.len()
    }
}

/// Which per-coordinate columns a result sink persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OutputColumns {
    /// Float values only.
    Raw,
    /// Bit-ordered integer encodings only.
    Encoded,
    #[default]
    Both,
}

impl OutputColumns {
    pub fn includes_raw(self) -> bool {
        matches!(self, Self::Raw | Self::Both)
    }

    pub fn includes_encoded(self) -> bool {
        matches!(self, Self::Encoded | Self::Both)
    }
}

impl fmt::Display for OutputColumns {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Raw => "raw",
            Self::Encoded => "encoded",
            Self::Both => "both",
        };
        f.pad(name)
    }
}

impl FromStr for OutputColumns {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "encoded" => Ok(Self::Encoded),
            "both" => Ok(Self::Both),
            _ => Err(ConfigError::UnknownColumns(s.to_string())),
        }
    }
}

/// Shape of a result table, handed to a result sink with the candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultHeader {
    pub dimensions: usize,
    pub columns: OutputColumns,
}

impl ResultHeader {
    pub fn new(dimensions: usize, columns: OutputColumns) -> Self {
        Self {
            dimensions,
            columns,
        }
    }

    /// Column names: `x0..x{D-1}`, then `x0_encoded..x{D-1}_encoded`, then `score`.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.dimensions * 2 + 1);
        if self.columns.includes_raw() {
            names.extend((0..self.dimensions).map(|i| format!("x{i}")));
        }
        if self.columns.includes_encoded() {
            names.extend((0..self.dimensions).map(|i| format!("x{i}_encoded")));
        }
        names.push("score".to_string());
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_not_live() {
        assert!(!is_live_score(SENTINEL_SCORE));
        assert!(!is_live_score(f32::INFINITY));
        assert!(!is_live_score(f32::NAN));
        assert!(is_live_score(0.0));
        assert!(is_live_score(1.0e30));
    }

    #[test]
    fn header_with_both_column_sets() {
        let header = ResultHeader::new(2, OutputColumns::Both);
        assert_eq!(
            header.column_names(),
            vec!["x0", "x1", "x0_encoded", "x1_encoded", "score"]
        );
    }

    #[test]
    fn header_with_single_column_set() {
        assert_eq!(
            ResultHeader::new(3, OutputColumns::Raw).column_names(),
            vec!["x0", "x1", "x2", "score"]
        );
        assert_eq!(
            ResultHeader::new(1, OutputColumns::Encoded).column_names(),
            vec!["x0_encoded", "score"]
        );
    }

    #[test]
    fn output_columns_parse() {
        assert_eq!("RAW".parse::<OutputColumns>().unwrap(), OutputColumns::Raw);
        assert_eq!("both".parse::<OutputColumns>().unwrap(), OutputColumns::Both);
        assert!("neither".parse::<OutputColumns>().is_err());
    }
}
