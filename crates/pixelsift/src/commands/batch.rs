use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::debug;

use crate::config::{self, CompareOverrides};
use crate::engine::{BatchEntry, CompareError, Engine, ImageInput};
use crate::report::{json, terminal};

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default, rename = "pair")]
    pairs: Vec<ManifestPair>,
}

#[derive(Debug, Deserialize)]
struct ManifestPair {
    name: String,
    expected: PathBuf,
    actual: PathBuf,
}

/// `pixelsift batch` — compare every manifest pair, in manifest order.
/// Returns exit code: 0 = every pair ok, 1 otherwise.
pub async fn batch(
    manifest_path: PathBuf,
    diff_dir: Option<PathBuf>,
    json_output: bool,
    overrides: CompareOverrides,
) -> Result<i32> {
    let engine = Engine::new(config::load()?);
    let manifest = read_manifest(&manifest_path)?;
    if manifest.pairs.is_empty() {
        bail!("{} has no [[pair]] entries", manifest_path.display());
    }

    let total = manifest.pairs.len();
    debug!(total, "running batch");
    let start = Instant::now();
    let entries =
        tokio::task::spawn_blocking(move || run_pairs(&engine, manifest.pairs, &overrides))
            .await
            .context("Batch task panicked")?;

    if let Some(dir) = &diff_dir {
        write_diff_images(dir, &entries)?;
    }

    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut errored = 0usize;
    for entry in &entries {
        match &entry.outcome {
            Ok(result) if result.ok => passed += 1,
            Ok(_) => failed += 1,
            Err(_) => errored += 1,
        }
    }

    if json_output {
        println!("{}", json::render_batch(&entries)?);
    } else {
        for entry in &entries {
            terminal::print_batch_line(entry);
        }
        terminal::print_summary(total, passed, failed, errored, start.elapsed());
    }

    Ok(if failed > 0 || errored > 0 { 1 } else { 0 })
}

fn read_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Pairs run strictly in manifest order. A pair that cannot even be
/// read degrades to an error entry like any other per-pair failure.
fn run_pairs(
    engine: &Engine,
    pairs: Vec<ManifestPair>,
    overrides: &CompareOverrides,
) -> Vec<BatchEntry> {
    pairs
        .into_iter()
        .map(|pair| {
            let outcome = load_inputs(&pair)
                .and_then(|(expected, actual)| engine.compare(expected, actual, Some(overrides)));
            BatchEntry {
                name: pair.name,
                outcome,
            }
        })
        .collect()
}

fn load_inputs(pair: &ManifestPair) -> Result<(ImageInput, ImageInput), CompareError> {
    Ok((read_input(&pair.expected)?, read_input(&pair.actual)?))
}

fn read_input(path: &Path) -> Result<ImageInput, CompareError> {
    let bytes = std::fs::read(path)
        .map_err(|e| CompareError::Validation(format!("cannot read {}: {e}", path.display())))?;
    Ok(ImageInput::Encoded(bytes))
}

fn write_diff_images(dir: &Path, entries: &[BatchEntry]) -> Result<()> {
    for entry in entries {
        if let Ok(result) = &entry.outcome
            && !result.ok
            && let Some(img) = &result.diff_image
        {
            let path = dir.join(format!("{}.png", entry.name));
            super::write_png(&path, img)?;
        }
    }
    Ok(())
}
