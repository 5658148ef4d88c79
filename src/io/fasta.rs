//! FASTA record loading.
//!
//! Leverages the `needletail` crate for parsing, which also handles
//! compressed files automatically.

use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use needletail::parse_fastx_file;

/// Loads a FASTA file into two order-aligned vectors: uppercased sequence
/// strings and their identifiers.
///
/// The identifier is the first whitespace-delimited token of the header
/// line. A missing or malformed file propagates the parser's error.
pub fn load_fasta(path: &Path) -> Result<(Vec<String>, Vec<String>)> {
    let mut reader = parse_fastx_file(path)
        .with_context(|| format!("failed to open FASTA file {}", path.display()))?;

    let mut sequences = Vec::new();
    let mut ids = Vec::new();

    while let Some(record) = reader.next() {
        let record = record.context("failed to parse FASTA record")?;
        let id = record
            .id()
            .split(|b: &u8| b.is_ascii_whitespace())
            .next()
            .unwrap_or(b"");
        ids.push(String::from_utf8_lossy(id).into_owned());
        sequences.push(String::from_utf8_lossy(&record.seq()).to_uppercase());
    }

    info!("Loaded {} sequences from {}", ids.len(), path.display());
    Ok((sequences, ids))
}
