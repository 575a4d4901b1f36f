use std::path::{Path, PathBuf};

use qy_search::{result_row, ResultSink};
use qy_types::{Candidate, QyError, QyResult, ResultHeader, SearchConfig};
use tracing::info;

/// Writes results to `<output_dir>/<name>.csv`.
#[derive(Debug, Clone)]
pub struct CsvResultSink {
    path: PathBuf,
}

impl CsvResultSink {
    /// Creates `output_dir` (and parents) if it does not exist yet.
    pub fn new<P: AsRef<Path>>(output_dir: P, name: &str) -> QyResult<Self> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)?;

        Ok(Self {
            path: output_dir.join(format!("{name}.csv")),
        })
    }

    pub fn for_config(config: &SearchConfig) -> QyResult<Self> {
        Self::new(&config.output_dir, &config.name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn csv_error(e: csv::Error) -> QyError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => QyError::Io(io),
        other => QyError::Csv(format!("{other:?}")),
    }
}

impl ResultSink for CsvResultSink {
    fn write(&mut self, header: &ResultHeader, results: &[Candidate]) -> QyResult<()> {
        let mut writer = csv::Writer::from_path(&self.path).map_err(csv_error)?;

        writer
            .write_record(header.column_names())
            .map_err(csv_error)?;
        for candidate in results {
            writer
                .write_record(result_row(header, candidate))
                .map_err(csv_error)?;
        }
        writer.flush()?;

        info!("Wrote {} results to {}", results.len(), self.path.display());
        Ok(())
    }
}
