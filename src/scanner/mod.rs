//! Input discovery for the merge pass.
//!
//! Lists the top level of the input directory and keeps regular files whose
//! name ends with the configured extension.

use crate::error::{MergeError, MergeResult};
use crate::models::InputFile;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Scanner for trace files in a single directory.
pub struct TraceScanner {
    input_dir: PathBuf,
    extension: String,
    output: Option<PathBuf>,
}

impl TraceScanner {
    /// Create a scanner for `input_dir` matching names ending in `extension`.
    pub fn new(input_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            input_dir: input_dir.into(),
            extension: extension.into(),
            output: None,
        }
    }

    /// Flag `path` as the output file if it turns up among the inputs.
    ///
    /// It is still listed and counted; the merge gives it an empty block.
    pub fn with_output(mut self, path: &Path) -> Self {
        self.output = fs::canonicalize(path).ok();
        self
    }

    /// Check if a file name has the required extension.
    pub fn matches(&self, name: &str) -> bool {
        name.ends_with(&self.extension)
    }

    /// List matching files, ordered by file name.
    pub fn scan(&self) -> MergeResult<Vec<InputFile>> {
        let metadata = match fs::metadata(&self.input_dir) {
            Ok(m) => m,
            Err(_) => {
                return Err(MergeError::InputNotFound {
                    path: self.input_dir.clone(),
                })
            }
        };

        if !metadata.is_dir() {
            return Err(MergeError::NotADirectory {
                path: self.input_dir.clone(),
            });
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.input_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|source| MergeError::Scan {
                path: self.input_dir.clone(),
                source,
            })?;

            let name = entry.file_name().to_string_lossy().to_string();
            if !self.matches(&name) {
                continue;
            }

            let path = entry.path().to_path_buf();

            // Follows symlinks, unlike entry.file_type()
            if !path.is_file() {
                debug!("Skipping non-file entry {}", path.display());
                continue;
            }

            let is_output = self.is_output(&path);
            if is_output {
                warn!("{} is also the output file, its old content is ignored", name);
            }

            let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            debug!("Found {} ({} bytes)", name, size);
            files.push(InputFile {
                path,
                name,
                size,
                is_output,
            });
        }

        Ok(files)
    }

    fn is_output(&self, path: &Path) -> bool {
        match self.output {
            Some(ref output) => fs::canonicalize(path)
                .map(|p| &p == output)
                .unwrap_or(false),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) {
        fs::write(dir.path().join(name), "FittsTask,1\n").unwrap();
    }

    #[test]
    fn test_scan_filters_by_extension() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "b.sd3");
        touch(&dir, "a.sd3");
        touch(&dir, "notes.txt");
        touch(&dir, "upper.SD3");
        touch(&dir, "a.sd3.bak");

        let files = TraceScanner::new(dir.path(), ".sd3").scan().unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();

        assert_eq!(names, vec!["a.sd3", "b.sd3"]);
        assert!(files.iter().all(|f| f.size > 0));
    }

    #[test]
    fn test_scan_ignores_directories_and_nested_files() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested.sd3")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("deep.sd3"), "FittsTask\n").unwrap();

        let files = TraceScanner::new(dir.path(), ".sd3").scan().unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_scan_flags_output_file() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "p1.sd3");
        touch(&dir, "results.sd3");

        let output = dir.path().join("results.sd3");
        let files = TraceScanner::new(dir.path(), ".sd3")
            .with_output(&output)
            .scan()
            .unwrap();

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "p1.sd3");
        assert!(!files[0].is_output);
        assert_eq!(files[1].name, "results.sd3");
        assert!(files[1].is_output);
    }

    #[test]
    fn test_scan_missing_directory() {
        let dir = TempDir::new().unwrap();
        let err = TraceScanner::new(dir.path().join("missing"), ".sd3")
            .scan()
            .unwrap_err();
        assert!(matches!(err, MergeError::InputNotFound { .. }));
    }

    #[test]
    fn test_scan_file_instead_of_directory() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "single.sd3");
        let err = TraceScanner::new(dir.path().join("single.sd3"), ".sd3")
            .scan()
            .unwrap_err();
        assert!(matches!(err, MergeError::NotADirectory { .. }));
        assert!(err.is_not_found());
    }
}
