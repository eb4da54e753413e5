//! Incremental report output

use crate::models::ReportRow;
use crate::Result;
use csv::{QuoteStyle, WriterBuilder};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Appends accepted rows to a delimited file, or accumulates them for a
/// single pretty JSON document when no file target is configured. Rows are
/// kept in memory in both modes, in emission order.
#[derive(Debug)]
pub struct ReportEmitter {
    output: Option<PathBuf>,
    overwrite: bool,
    rows: Vec<ReportRow>,
}

impl ReportEmitter {
    pub fn new(output: Option<PathBuf>, overwrite: bool) -> Self {
        Self {
            output,
            overwrite,
            rows: Vec::new(),
        }
    }

    /// Truncates the target when overwriting was requested. Called once
    /// before the first emission.
    pub fn init(&mut self) -> Result<()> {
        if let Some(path) = &self.output {
            if self.overwrite {
                fs::write(path, "")?;
            }
        }
        Ok(())
    }

    pub fn emit(&mut self, row: ReportRow) -> Result<()> {
        if let Some(path) = &self.output {
            append_row(path, &row)?;
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn has_output_file(&self) -> bool {
        self.output.is_some()
    }

    /// The pretty JSON document for the no-file mode; `None` when a file
    /// target is configured.
    pub fn to_json(&self) -> Result<Option<String>> {
        if self.output.is_some() {
            return Ok(None);
        }
        Ok(Some(serde_json::to_string_pretty(&self.rows)?))
    }
}

// The header goes in whenever the target is missing or empty, so an
// append-without-overwrite run on an existing report keeps accumulating
// rows under the original header.
fn append_row(path: &Path, row: &ReportRow) -> Result<()> {
    let needs_header = fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    // Title and Assignee arrive pre-quoted from csv_record; everything else
    // is delimiter-free, so the writer must not quote again
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .from_writer(file);

    if needs_header {
        writer.write_record(ReportRow::HEADER)?;
    }
    writer.write_record(row.csv_record())?;
    writer.flush()?;

    Ok(())
}
