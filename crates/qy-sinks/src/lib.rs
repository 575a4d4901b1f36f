//! Collaborators at the edge of a search run: the CSV result file and the
//! single-line console progress display.

pub mod console;
pub mod csv_sink;

pub use console::{format_duration, ConsoleProgress};
pub use csv_sink::CsvResultSink;
