//! Data models for the merge pass.
//!
//! Input files found by the scanner and the outcome of a run.

use std::fmt;
use std::path::PathBuf;

/// A trace file selected for merging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File name as listed in the input directory
    pub name: String,
    /// File size in bytes
    pub size: u64,
    /// Same file as the merge output; counted but never read
    pub is_output: bool,
}

/// Statistics for a completed merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeSummary {
    /// Number of input files listed, including those without records
    pub files_processed: usize,
    /// Number of input files that contributed at least one record
    pub files_with_records: usize,
    /// Number of record lines written after the header
    pub records_written: usize,
    /// Marker token used to select records
    pub marker: String,
    /// Path of the written output file
    pub output: PathBuf,
}

/// Result of a merge run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No file with the required extension exists; nothing was written.
    NoInputs {
        input_dir: PathBuf,
        extension: String,
    },
    /// The output file was written.
    Merged(MergeSummary),
}

impl MergeOutcome {
    /// Number of input files processed (zero for `NoInputs`).
    pub fn files_processed(&self) -> usize {
        match self {
            MergeOutcome::NoInputs { .. } => 0,
            MergeOutcome::Merged(summary) => summary.files_processed,
        }
    }
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeOutcome::NoInputs {
                input_dir,
                extension,
            } => write!(
                f,
                "No {} files found in the specified folder: {}",
                extension.trim_start_matches('.'),
                input_dir.display()
            ),
            MergeOutcome::Merged(summary) => write!(
                f,
                "Merged lines starting with '{}' from {} text files into {}.",
                summary.marker,
                summary.files_processed,
                summary.output.display()
            ),
        }
    }
}
