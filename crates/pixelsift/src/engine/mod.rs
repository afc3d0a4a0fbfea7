pub mod canonical;
pub mod cluster;
pub mod error;
pub mod input;
pub mod mask;

use image::RgbaImage;
use serde::Serialize;
use tracing::debug;

pub use self::cluster::{Bounds, Cluster, ClusterCounts};
pub use self::error::CompareError;
pub use self::input::ImageInput;

use crate::config::{CompareConfig, CompareOverrides};

/// Verdict and diagnostics for one comparison. Constructed once,
/// returned, never mutated.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// True when no significant difference survived clustering.
    pub ok: bool,
    /// Raw differing pixels reported by the diff provider.
    pub diff_pixels: u64,
    /// Pixels on the canonical canvas.
    pub total_pixels: u64,
    /// `diff_pixels / total_pixels`; 0.0 means identical.
    pub score: f64,
    /// Diff visualization; `None` when no pixel differed.
    #[serde(skip)]
    pub diff_image: Option<RgbaImage>,
    pub details: DiffDetails,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffDetails {
    pub total_diff_pixels: u64,
    /// Sum of sizes of non-line-shift clusters meeting the size floor.
    pub significant_diff_pixels: u64,
    /// Every discovered cluster, line shifts and sub-threshold ones
    /// included.
    pub clusters: Vec<Cluster>,
    pub analysis: ClusterCounts,
}

/// A named baseline/candidate pair for batch comparison.
pub struct NamedPair {
    pub name: String,
    pub expected: ImageInput,
    pub actual: ImageInput,
}

/// One entry of a batch run. A failed pair keeps its slot; it never
/// aborts the rest of the batch.
pub struct BatchEntry {
    pub name: String,
    pub outcome: Result<ComparisonResult, CompareError>,
}

impl BatchEntry {
    pub fn ok(&self) -> bool {
        matches!(&self.outcome, Ok(result) if result.ok)
    }
}

/// Facade owning the instance configuration and wiring
/// canonicalize -> diff -> cluster -> evaluate.
#[derive(Clone, Default)]
pub struct Engine {
    config: CompareConfig,
}

impl Engine {
    pub fn new(config: CompareConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompareConfig {
        &self.config
    }

    /// Compare a candidate frame against the expected baseline.
    ///
    /// Per-call overrides resolve over the instance config over the
    /// built-in defaults; the resolved value is immutable for the
    /// duration of the call.
    pub fn compare(
        &self,
        expected: ImageInput,
        actual: ImageInput,
        overrides: Option<&CompareOverrides>,
    ) -> Result<ComparisonResult, CompareError> {
        if expected.is_absent() {
            return Err(CompareError::Validation("expected image is missing".into()));
        }
        if actual.is_absent() {
            return Err(CompareError::Validation("actual image is missing".into()));
        }
        let config = self
            .config
            .resolved(overrides)
            .map_err(CompareError::Validation)?;

        let expected = expected.into_rgba()?;
        let actual = actual.into_rgba()?;

        let (left, right) = canonical::canonicalize(&expected, &actual, &config)?;
        let total_pixels = u64::from(left.width()) * u64::from(left.height());

        let masked = mask::diff_mask(left, right, &config);
        if masked.diff_pixels == 0 {
            // Nothing differs; clustering is skipped entirely.
            return Ok(ComparisonResult {
                ok: true,
                diff_pixels: 0,
                total_pixels,
                score: 0.0,
                diff_image: masked.diff_image,
                details: DiffDetails::default(),
            });
        }

        let diff_image = masked.diff_image.ok_or_else(|| CompareError::Comparison {
            source: anyhow::anyhow!(
                "diff provider reported {} differing pixels but produced no mask",
                masked.diff_pixels
            ),
        })?;

        let analysis = cluster::analyze(&diff_image, &config);
        let counts = analysis.counts;
        let ok = counts.significant_pixels == 0
            || (counts.significant_pixels <= config.max_total_diff_pixels
                && counts.significant_clusters <= config.max_significant_clusters);
        debug!(
            ok,
            diff_pixels = masked.diff_pixels,
            significant_pixels = counts.significant_pixels,
            significant_clusters = counts.significant_clusters,
            "verdict"
        );

        Ok(ComparisonResult {
            ok,
            diff_pixels: masked.diff_pixels,
            total_pixels,
            score: masked.diff_pixels as f64 / total_pixels as f64,
            diff_image: Some(diff_image),
            details: DiffDetails {
                total_diff_pixels: masked.diff_pixels,
                significant_diff_pixels: counts.significant_pixels,
                clusters: analysis.clusters,
                analysis: counts,
            },
        })
    }

    /// Compare pairs strictly in input order, one at a time. A failing
    /// pair degrades to an error entry in its slot.
    pub fn compare_batch(
        &self,
        pairs: Vec<NamedPair>,
        overrides: Option<&CompareOverrides>,
    ) -> Vec<BatchEntry> {
        pairs
            .into_iter()
            .map(|pair| {
                let outcome = self.compare(pair.expected, pair.actual, overrides);
                if let Err(e) = &outcome {
                    debug!(name = %pair.name, error = %e, "pair failed");
                }
                BatchEntry {
                    name: pair.name,
                    outcome,
                }
            })
            .collect()
    }
}
