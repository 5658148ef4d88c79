//! Converts a tabular sequence dataset into FASTA.
//!
//! The input is a CSV with a header row; the sequence and name fields are
//! addressed by zero-based column index. Each data row becomes one FASTA
//! entry. No validation of the sequence alphabet or of duplicate names is
//! performed here.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::info;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InputFormatError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row} has no column {col}")]
    MissingColumn { row: usize, col: usize },
}

/// Writes one FASTA entry per CSV data row to `output`.
///
/// The header row is skipped unconditionally. A row that is too short to
/// contain one of the referenced columns aborts the conversion with
/// [`InputFormatError::MissingColumn`]. The output file is created or
/// overwritten.
pub fn csv_to_fasta(
    input: &Path,
    seq_col: usize,
    name_col: usize,
    output: &Path,
) -> Result<(), InputFormatError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(input)?;

    let mut writer = BufWriter::new(File::create(output)?);
    let mut n_records = 0usize;

    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        // Data rows start after the header, so row numbers are 1-based here.
        let row = idx + 1;
        let name = record
            .get(name_col)
            .ok_or(InputFormatError::MissingColumn { row, col: name_col })?;
        let seq = record
            .get(seq_col)
            .ok_or(InputFormatError::MissingColumn { row, col: seq_col })?;
        writeln!(writer, ">{}", name)?;
        writeln!(writer, "{}", seq)?;
        n_records += 1;
    }

    writer.flush()?;
    info!(
        "Converted {} CSV rows into FASTA records at {}",
        n_records,
        output.display()
    );
    Ok(())
}
