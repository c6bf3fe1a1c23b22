//! Configuration file handling.
//!
//! Settings are only read from a file passed with `--config`; without it the
//! built-in defaults apply.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name written by `--init-config`.
pub const DEFAULT_CONFIG_FILE: &str = "sd3merge.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Merge settings.
    #[serde(default)]
    pub merge: MergeConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    crate::merge::DEFAULT_OUTPUT.to_string()
}

/// What gets selected and what is written ahead of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Literal, case-sensitive file name suffix of input files.
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Prefix a trimmed line must start with to be copied.
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Lines written once at the top of the output.
    #[serde(default = "default_header")]
    pub header: Vec<String>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            marker: default_marker(),
            header: default_header(),
        }
    }
}

fn default_extension() -> String {
    ".sd3".to_string()
}

fn default_marker() -> String {
    "FittsTask".to_string()
}

fn default_header() -> Vec<String> {
    vec![
        "TRACE DATA".to_string(),
        "App,Participant,Condition,Session,Group,TaskType,SelectionMethod,Block,Sequence,A,W,Trial,from_x,from_y,to_x,to_y,{t_x_y}".to_string(),
    ]
}

impl MergeConfig {
    /// Header block as written to the output, one `\n` after each line.
    pub fn header_block(&self) -> String {
        let mut block = String::new();
        for line in &self.header {
            block.push_str(line);
            block.push('\n');
        }
        block
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every run a no-op or select everything.
    pub fn validate(&self) -> Result<()> {
        if self.merge.extension.is_empty() {
            anyhow::bail!("merge.extension must not be empty");
        }
        if self.merge.marker.is_empty() {
            anyhow::bail!("merge.marker must not be empty");
        }
        if self.general.output.is_empty() {
            anyhow::bail!("general.output must not be empty");
        }
        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.to_string_lossy().into_owned();
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.output, crate::merge::DEFAULT_OUTPUT);
        assert_eq!(config.merge.extension, ".sd3");
        assert_eq!(config.merge.marker, "FittsTask");
        assert_eq!(config.merge.header.len(), 2);
    }

    #[test]
    fn test_header_block() {
        let block = MergeConfig::default().header_block();
        assert_eq!(
            block,
            "TRACE DATA\nApp,Participant,Condition,Session,Group,TaskType,SelectionMethod,Block,Sequence,A,W,Trial,from_x,from_y,to_x,to_y,{t_x_y}\n"
        );
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_content = r#"
[general]
output = "merged.sd3"

[merge]
marker = "FittsTrial"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "merged.sd3");
        assert!(!config.general.verbose);
        assert_eq!(config.merge.marker, "FittsTrial");
        assert_eq!(config.merge.extension, ".sd3");
        assert_eq!(config.merge.header, default_header());
    }

    #[test]
    fn test_load_rejects_empty_marker() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[merge]\nmarker = \"\"\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("marker"));
    }

    #[test]
    fn test_default_toml_roundtrips() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[merge]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.merge, MergeConfig::default());
    }
}
