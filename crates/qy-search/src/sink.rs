//! Where finished results go.

use qy_types::{Candidate, QyResult, ResultHeader};

use crate::encoding::encode;

/// Receives the final, sorted result list of a run.
pub trait ResultSink {
    /// `results` are ascending by score and contain no sentinel entries.
    fn write(&mut self, header: &ResultHeader, results: &[Candidate]) -> QyResult<()>;
}

/// Keeps results in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub header: Option<ResultHeader>,
    pub results: Vec<Candidate>,
}

impl ResultSink for MemorySink {
    fn write(&mut self, header: &ResultHeader, results: &[Candidate]) -> QyResult<()> {
        self.header = Some(*header);
        self.results = results.to_vec();
        Ok(())
    }
}

/// Render one candidate as table cells matching [`ResultHeader::column_names`].
pub fn result_row(header: &ResultHeader, candidate: &Candidate) -> Vec<String> {
    let mut row = Vec::with_capacity(header.dimensions * 2 + 1);
    if header.columns.includes_raw() {
        row.extend(candidate.coordinate.iter().map(|x| x.to_string()));
    }
    if header.columns.includes_encoded() {
        row.extend(candidate.coordinate.iter().map(|&x| encode(x).to_string()));
    }
    row.push(candidate.score.to_string());
    row
}
