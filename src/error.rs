//! Error types for the merge pass.
//!
//! Everything below `main` returns [`MergeError`]; `main` converts to
//! `anyhow` for reporting.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by the scanner and aggregator.
pub type MergeResult<T> = Result<T, MergeError>;

/// Failures that abort a merge run.
#[derive(Debug, Error)]
pub enum MergeError {
    /// The input directory does not exist.
    #[error("Input directory not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// The input path exists but is not a directory.
    #[error("Input path is not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    /// Listing the input directory failed.
    #[error("Failed to scan {}", path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// An input file could not be read as text.
    #[error("Failed to read {}", path.display())]
    ReadInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The output file could not be created or truncated.
    #[error("Failed to create output file {}", path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing to (or flushing) the output file failed.
    #[error("Failed to write output file {}", path.display())]
    WriteOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MergeError {
    /// Returns true for the not-found class of failures on the input side.
    pub fn is_not_found(&self) -> bool {
        match self {
            MergeError::InputNotFound { .. } | MergeError::NotADirectory { .. } => true,
            MergeError::ReadInput { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let missing = MergeError::InputNotFound {
            path: PathBuf::from("nowhere"),
        };
        assert!(missing.is_not_found());
        assert!(missing.to_string().contains("nowhere"));

        let write = MergeError::WriteOutput {
            path: PathBuf::from("results.sd3"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        assert!(!write.is_not_found());
    }
}
