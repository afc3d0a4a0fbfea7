use super::CompareConfig;

/// Per-call overrides. `None` means "inherit from the tier below".
///
/// Serves both CLI argument parsing and the engine's per-call override
/// parameter. Overlay is key-by-key; the most specific tier wins.
#[derive(Clone, Debug, Default, clap::Args)]
pub struct CompareOverrides {
    /// Per-pixel color-difference sensitivity (0.0-1.0)
    #[arg(long, value_parser = crate::config::parse_ratio)]
    pub threshold: Option<f64>,

    /// Count anti-aliased pixels as differences (true/false)
    #[arg(long = "include-aa")]
    pub include_anti_aliasing: Option<bool>,

    /// Opacity of the dimmed base image in the diff output (0.0-1.0)
    #[arg(long, value_parser = crate::config::parse_ratio)]
    pub alpha_threshold: Option<f64>,

    /// Longest allowed side of the canonical canvas
    #[arg(long = "max-side")]
    pub max_canvas_side: Option<u32>,

    #[arg(skip)]
    pub background_color: Option<[u8; 4]>,

    /// Clusters smaller than this never count as significant
    #[arg(long)]
    pub min_cluster_size: Option<u32>,

    /// Fail when significant clusters exceed this count
    #[arg(long = "max-clusters")]
    pub max_significant_clusters: Option<usize>,

    /// Fail when significant pixels exceed this total
    #[arg(long = "max-diff-pixels")]
    pub max_total_diff_pixels: Option<u64>,

    /// Fraction of line-like pixels that marks a cluster as a line
    /// shift (0.0-1.0)
    #[arg(long, value_parser = crate::config::parse_ratio)]
    pub line_shift_ratio: Option<f64>,
}

impl CompareOverrides {
    /// Overlay non-None fields onto a resolved config.
    pub fn apply(&self, config: &mut CompareConfig) {
        if let Some(v) = self.threshold {
            config.threshold = v;
        }
        if let Some(v) = self.include_anti_aliasing {
            config.include_anti_aliasing = v;
        }
        if let Some(v) = self.alpha_threshold {
            config.alpha_threshold = v;
        }
        if let Some(v) = self.max_canvas_side {
            config.max_canvas_side = v;
        }
        if let Some(v) = self.background_color {
            config.background_color = v;
        }
        if let Some(v) = self.min_cluster_size {
            config.min_cluster_size = v;
        }
        if let Some(v) = self.max_significant_clusters {
            config.max_significant_clusters = v;
        }
        if let Some(v) = self.max_total_diff_pixels {
            config.max_total_diff_pixels = v;
        }
        if let Some(v) = self.line_shift_ratio {
            config.line_shift_ratio = v;
        }
    }
}

impl CompareConfig {
    /// Resolve the three-tier cascade for one comparison call:
    /// built-in defaults -> instance config (self) -> per-call
    /// overrides. The result is validated and then never mutated.
    pub fn resolved(&self, overrides: Option<&CompareOverrides>) -> Result<Self, String> {
        let mut config = self.clone();
        if let Some(overrides) = overrides {
            overrides.apply(&mut config);
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_overrides_keeps_instance_config() {
        let base = CompareConfig {
            threshold: 0.3,
            ..Default::default()
        };
        let resolved = base.resolved(None).unwrap();
        assert_eq!(resolved.threshold, 0.3);
        assert_eq!(
            resolved.min_cluster_size,
            CompareConfig::default().min_cluster_size
        );
    }

    #[test]
    fn overrides_win_key_by_key() {
        let base = CompareConfig {
            threshold: 0.3,
            max_canvas_side: 200,
            ..Default::default()
        };
        let overrides = CompareOverrides {
            threshold: Some(0.5),
            min_cluster_size: Some(9),
            ..Default::default()
        };
        let resolved = base.resolved(Some(&overrides)).unwrap();
        // Overridden keys take the per-call value.
        assert_eq!(resolved.threshold, 0.5);
        assert_eq!(resolved.min_cluster_size, 9);
        // Untouched keys keep the instance value.
        assert_eq!(resolved.max_canvas_side, 200);
    }

    #[test]
    fn invalid_override_fails_resolution() {
        let overrides = CompareOverrides {
            line_shift_ratio: Some(2.0),
            ..Default::default()
        };
        let err = CompareConfig::default()
            .resolved(Some(&overrides))
            .unwrap_err();
        assert!(err.contains("line_shift_ratio"), "{err}");
    }

    #[test]
    fn resolution_does_not_touch_the_instance() {
        let base = CompareConfig::default();
        let overrides = CompareOverrides {
            threshold: Some(0.9),
            ..Default::default()
        };
        let _ = base.resolved(Some(&overrides)).unwrap();
        assert_eq!(base.threshold, CompareConfig::default().threshold);
    }
}
