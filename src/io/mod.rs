//! File input/output for the pipeline.
//!
//! Groups the two stages that touch the filesystem on the way in:
//! - `convert`: CSV -> FASTA format conversion.
//! - `fasta`: FASTA record loading.

pub mod convert;
pub mod fasta;

pub use convert::InputFormatError;
