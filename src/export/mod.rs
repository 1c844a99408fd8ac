//! CSV export of rubric responses.
//!
//! ```text
//! RubricModel + SelectionState
//!        │  table()      one record per grid row, entities decoded
//!        ▼
//!   ExportTable
//!        │  CsvSerializer
//!        ▼
//!   UTF-8 CSV bytes
//!        │  FileSaver
//!        ▼
//!   rubric-<id>-responses.csv
//! ```
//!
//! The serializer and the saver are capabilities passed in by whoever
//! builds the pipeline (the TUI saves into a directory, the headless
//! `export` command may write to stdout).
//!
//! # Module Structure
//!
//! - `error` - `ExportError` (encoding and delivery failures)
//! - `saver` - `FileSaver` and its directory/path/stdout implementations

mod error;
mod saver;

#[cfg(test)]
mod tests;

pub use error::ExportError;
pub use saver::{DirectorySaver, FileSaver, PathSaver, Saved, StdoutSaver};

use crate::html::unescape_html_entities;
use crate::l10n::Labels;
use crate::rubric::RubricModel;
use crate::selection::SelectionState;

/// One exported grid row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseRow {
    pub indicator: String,
    pub level: String,
    pub guidelines: String,
    pub evidence: String,
}

impl ResponseRow {
    pub fn fields(&self) -> [&str; 4] {
        [
            self.indicator.as_str(),
            self.level.as_str(),
            self.guidelines.as_str(),
            self.evidence.as_str(),
        ]
    }
}

/// Header plus one row per grid row, in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    pub header: [String; 4],
    pub rows: Vec<ResponseRow>,
}

impl ExportTable {
    /// All records, header first
    pub fn records(&self) -> impl Iterator<Item = [&str; 4]> {
        let header = [
            self.header[0].as_str(),
            self.header[1].as_str(),
            self.header[2].as_str(),
            self.header[3].as_str(),
        ];
        std::iter::once(header).chain(self.rows.iter().map(ResponseRow::fields))
    }

    /// Number of records including the header
    pub fn len(&self) -> usize {
        self.rows.len() + 1
    }
}

/// CSV encoding capability
pub trait CsvSerializer {
    fn serialize(&self, table: &ExportTable) -> Result<Vec<u8>, ExportError>;
}

/// RFC 4180 writer backed by the `csv` crate
#[derive(Debug, Clone)]
pub struct CsvWriterSerializer {
    crlf: bool,
}

impl Default for CsvWriterSerializer {
    fn default() -> Self {
        Self { crlf: true }
    }
}

impl CsvWriterSerializer {
    pub fn new(crlf: bool) -> Self {
        Self { crlf }
    }
}

impl CsvSerializer for CsvWriterSerializer {
    fn serialize(&self, table: &ExportTable) -> Result<Vec<u8>, ExportError> {
        let terminator = if self.crlf {
            csv::Terminator::CRLF
        } else {
            csv::Terminator::Any(b'\n')
        };

        let mut writer = csv::WriterBuilder::new()
            .terminator(terminator)
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(Vec::new());

        for record in table.records() {
            writer.write_record(record)?;
        }

        writer
            .into_inner()
            .map_err(|e| ExportError::Encode(e.into_error().into()))
    }
}

/// File name for an instance's responses, e.g. `rubric-42-responses.csv`.
///
/// Characters outside `[A-Za-z0-9._-]` in the id are replaced with `-`.
pub fn response_file_name(instance_id: &str) -> String {
    let id: String = instance_id
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("rubric-{}-responses.csv", id)
}

/// Builds the response table and delivers it as CSV
pub struct ExportPipeline {
    labels: Labels,
    serializer: Box<dyn CsvSerializer>,
    saver: Box<dyn FileSaver>,
}

impl ExportPipeline {
    pub fn new(
        labels: Labels,
        serializer: impl CsvSerializer + 'static,
        saver: impl FileSaver + 'static,
    ) -> Self {
        Self {
            labels,
            serializer: Box::new(serializer),
            saver: Box::new(saver),
        }
    }

    /// Snapshot the current responses. Missing lookups become "".
    pub fn table(&self, model: &RubricModel, state: &SelectionState) -> ExportTable {
        let header = self.labels.export_header().map(str::to_string);

        let rows = model
            .grid_rows()
            .iter()
            .map(|row| {
                let indicator = unescape_html_entities(model.row_text(&row.row_id));

                let (level, guidelines) = match state.selection(&row.row_id) {
                    Some(column_id) => (
                        unescape_html_entities(model.column_text(column_id)),
                        unescape_html_entities(model.selected_cell_text(&row.row_id, column_id)),
                    ),
                    None => (String::new(), String::new()),
                };

                // Evidence is typed by the user, never entity-encoded
                let evidence = state.evidence(&row.row_id).to_string();

                ResponseRow {
                    indicator,
                    level,
                    guidelines,
                    evidence,
                }
            })
            .collect();

        ExportTable { header, rows }
    }

    /// Encode the current responses as UTF-8 CSV
    pub fn export_csv(
        &self,
        model: &RubricModel,
        state: &SelectionState,
    ) -> Result<Vec<u8>, ExportError> {
        let table = self.table(model, state);
        self.serializer.serialize(&table)
    }

    /// Encode and hand the file to the saver
    pub fn download(
        &self,
        model: &RubricModel,
        state: &SelectionState,
        instance_id: &str,
    ) -> Result<Saved, ExportError> {
        let table = self.table(model, state);
        let bytes = self.serializer.serialize(&table)?;
        let file_name = response_file_name(instance_id);
        tracing::debug!("Exporting {} records as {}", table.len(), file_name);
        self.saver.save(&file_name, &bytes)
    }
}
