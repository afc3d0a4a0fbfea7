pub mod resolve;

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub use self::resolve::CompareOverrides;

/// Optional config file, looked up in the working directory.
pub const CONFIG_FILE: &str = "pixelsift.toml";

/// Fully-resolved comparison settings. Immutable for the duration of a
/// comparison call; safe to share across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Per-pixel color-difference sensitivity for the diff provider (0.0-1.0).
    pub threshold: f64,
    /// Count anti-aliased pixels as differences instead of filtering them out.
    pub include_anti_aliasing: bool,
    /// Opacity of the dimmed base image in the diff visualization (0.0-1.0).
    pub alpha_threshold: f64,
    /// Longest allowed side of the canonical canvas.
    pub max_canvas_side: u32,
    /// RGBA fill behind both images on the canonical canvas.
    pub background_color: [u8; 4],
    /// Clusters smaller than this never count as significant.
    pub min_cluster_size: u32,
    /// Verdict fails when significant clusters exceed this count.
    pub max_significant_clusters: usize,
    /// Verdict fails when significant pixels exceed this total.
    pub max_total_diff_pixels: u64,
    /// Fraction of line-like pixels above which a cluster reads as a
    /// line shift (0.0-1.0).
    pub line_shift_ratio: f64,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            include_anti_aliasing: false,
            alpha_threshold: 0.1,
            max_canvas_side: 400,
            background_color: [255, 255, 255, 255],
            min_cluster_size: 4,
            max_significant_clusters: 4,
            max_total_diff_pixels: 40,
            line_shift_ratio: 0.8,
        }
    }
}

impl CompareConfig {
    /// Validate range constraints serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("threshold", self.threshold),
            ("alpha_threshold", self.alpha_threshold),
            ("line_shift_ratio", self.line_shift_ratio),
        ] {
            validate_ratio(value).map_err(|e| format!("{name}: {e}"))?;
        }
        if self.max_canvas_side == 0 {
            return Err("max_canvas_side must be > 0".into());
        }
        if self.min_cluster_size == 0 {
            return Err("min_cluster_size must be > 0".into());
        }
        Ok(())
    }
}

pub fn validate_ratio(v: f64) -> Result<f64, String> {
    if !(0.0..=1.0).contains(&v) {
        return Err(format!("must be between 0.0 and 1.0, got {v}"));
    }
    Ok(v)
}

/// clap value parser for ratio-valued flags.
pub fn parse_ratio(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    validate_ratio(v)
}

/// Load the config file if present; built-in defaults otherwise.
pub fn load() -> Result<CompareConfig> {
    load_from(Path::new(CONFIG_FILE))
}

pub fn load_from(path: &Path) -> Result<CompareConfig> {
    if !path.exists() {
        return Ok(CompareConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: CompareConfig =
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))?;
    Ok(config)
}
