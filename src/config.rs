//! Configuration file support for ferro-sv.
//!
//! Layout and reconstruction constants can be tuned with a TOML file.
//!
//! # Example Configuration
//!
//! ```toml
//! [layout]
//! bubble-margin = 5.0
//! bubble-padding = 4.0
//! expand-threshold = 50
//!
//! [reconstruction]
//! transcript-mode = "consensus"
//! empty-gene-length = 20
//! ```
//!
//! # Config File Locations
//!
//! Configuration is searched in this order (first found wins):
//! 1. `.ferro-sv.toml` in current directory
//! 2. `~/.config/ferro/sv.toml`
//!
//! CLI flags take precedence over config file settings.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Parsed configuration from a `.ferro-sv.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SvConfig {
    /// Density layout constants.
    pub layout: LayoutConfig,
    /// Junction reconstruction constants.
    pub reconstruction: ReconstructConfig,
}

/// Constants of the density layout engine (pixel values are screen pixels).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LayoutConfig {
    /// Gap a variant may keep from an open bubble and still join it.
    pub bubble_margin: f64,
    /// Added to the label radius of every bubble.
    pub bubble_padding: f64,
    /// Aggregates below this count are expanded back into their variants.
    pub expand_threshold: u32,
    /// Estimated width of one label character.
    pub label_char_width: f64,
    /// Estimated height of a label line.
    pub label_line_height: f64,
    /// Keep aggregates collapsed regardless of their count.
    pub collapsed: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            bubble_margin: 5.0,
            bubble_padding: 4.0,
            expand_threshold: 50,
            label_char_width: 7.0,
            label_line_height: 12.0,
            collapsed: false,
        }
    }
}

/// How a gene's exon structure is derived from its transcripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptMode {
    /// One canonical transcript per gene.
    #[default]
    Canonical,
    /// Greedy union of all transcripts.
    Consensus,
}

/// Constants of the junction reconstructor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReconstructConfig {
    /// Half width (bp) of the gene query window around each breakpoint.
    pub breakpoint_window: u64,
    /// Nominal length of a gene-less segment; placeholders take a quarter of it.
    pub empty_gene_length: i64,
    /// Longest range (bp) queried for genes inside a duplication.
    pub duplicated_genes_max_range: u64,
    /// Scale factor passed with the duplicated-gene query.
    pub duplicated_genes_scale_factor: f64,
    /// Structure derivation mode.
    pub transcript_mode: TranscriptMode,
}

impl Default for ReconstructConfig {
    fn default() -> Self {
        Self {
            breakpoint_window: 1,
            empty_gene_length: 20,
            duplicated_genes_max_range: 100_000_000,
            duplicated_genes_scale_factor: 0.001,
            transcript_mode: TranscriptMode::Canonical,
        }
    }
}

impl ReconstructConfig {
    /// Length given to the placeholder exon of an empty gene.
    pub fn placeholder_length(&self) -> i64 {
        self.empty_gene_length / 4
    }
}

/// Configuration loading error.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// IO error reading or writing a config file.
    #[error("Config IO error: {0}")]
    Io(String),
    /// TOML syntax or type error.
    #[error("Config parse error: {0}")]
    Parse(String),
}

impl SvConfig {
    /// Load configuration from the default locations.
    pub fn load() -> Option<Self> {
        let cwd_config = PathBuf::from(".ferro-sv.toml");
        if cwd_config.exists() {
            match Self::load_from_path(&cwd_config) {
                Ok(config) => return Some(config),
                Err(e) => log::warn!("Ignoring {}: {}", cwd_config.display(), e),
            }
        }

        if let Some(home) = dirs_home() {
            let home_config = home.join(".config").join("ferro").join("sv.toml");
            if home_config.exists() {
                match Self::load_from_path(&home_config) {
                    Ok(config) => return Some(config),
                    Err(e) => log::warn!("Ignoring {}: {}", home_config.display(), e),
                }
            }
        }

        None
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML content.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize to TOML (used to print a sample config).
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Write configuration to a TOML file.
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Apply CLI overrides. CLI arguments take precedence.
    pub fn merge_with_cli(
        mut self,
        collapsed: Option<bool>,
        transcript_mode: Option<TranscriptMode>,
    ) -> Self {
        if let Some(collapsed) = collapsed {
            self.layout.collapsed = collapsed;
        }
        if let Some(mode) = transcript_mode {
            self.reconstruction.transcript_mode = mode;
        }
        self
    }
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
