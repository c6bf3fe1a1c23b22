//! Record selection and the single aggregation pass.
//!
//! Each input file is read whole, its marker lines are trimmed and kept, and
//! the surviving lines are appended to the output as one block per file.

use crate::config::MergeConfig;
use crate::error::{MergeError, MergeResult};
use crate::models::{InputFile, MergeOutcome, MergeSummary};
use crate::scanner::TraceScanner;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Default output file, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "results.sd3";

/// Keep the trimmed lines of `content` that start with `marker`.
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
pub fn select_records<'a>(content: &'a str, marker: &str) -> Vec<&'a str> {
    content
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|line| line.starts_with(marker))
        .collect()
}

/// Write one file's records: joined by `\n`, plus a trailing `\n`.
///
/// Nothing at all is written for an empty slice.
pub fn write_block<W: Write>(out: &mut W, records: &[&str]) -> io::Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    out.write_all(records.join("\n").as_bytes())?;
    out.write_all(b"\n")
}

/// Runs the aggregation pass with a fixed extension, marker and header.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: MergeConfig,
}

impl Aggregator {
    pub fn new(config: MergeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// List the files a run over `input_dir` would read.
    pub fn inputs(&self, input_dir: &Path, output_path: &Path) -> MergeResult<Vec<InputFile>> {
        TraceScanner::new(input_dir, self.config.extension.as_str())
            .with_output(output_path)
            .scan()
    }

    /// Merge marker lines from every input file in `input_dir` into `output_path`.
    ///
    /// The output is left untouched when there are no input files.
    pub fn aggregate(&self, input_dir: &Path, output_path: &Path) -> MergeResult<MergeOutcome> {
        let files = self.inputs(input_dir, output_path)?;

        if files.is_empty() {
            info!(
                "No {} files in {}, output not written",
                self.config.extension,
                input_dir.display()
            );
            return Ok(MergeOutcome::NoInputs {
                input_dir: input_dir.to_path_buf(),
                extension: self.config.extension.clone(),
            });
        }

        let file = File::create(output_path).map_err(|source| MergeError::CreateOutput {
            path: output_path.to_path_buf(),
            source,
        })?;
        let mut out = BufWriter::new(file);
        let write_err = |source: io::Error| MergeError::WriteOutput {
            path: output_path.to_path_buf(),
            source,
        };

        out.write_all(self.config.header_block().as_bytes())
            .map_err(write_err)?;

        let mut files_with_records = 0;
        let mut records_written = 0;

        for input in &files {
            // Already truncated by File::create above
            if input.is_output {
                debug!("{}: output file, empty block", input.name);
                continue;
            }

            let content =
                fs::read_to_string(&input.path).map_err(|source| MergeError::ReadInput {
                    path: input.path.clone(),
                    source,
                })?;

            let records = select_records(&content, &self.config.marker);
            debug!("{}: {} records", input.name, records.len());

            if !records.is_empty() {
                files_with_records += 1;
                records_written += records.len();
            }
            write_block(&mut out, &records).map_err(write_err)?;
        }

        out.flush().map_err(write_err)?;

        info!(
            "Wrote {} records from {}/{} files to {}",
            records_written,
            files_with_records,
            files.len(),
            output_path.display()
        );

        Ok(MergeOutcome::Merged(MergeSummary {
            files_processed: files.len(),
            files_with_records,
            records_written,
            marker: self.config.marker.clone(),
            output: output_path.to_path_buf(),
        }))
    }
}
