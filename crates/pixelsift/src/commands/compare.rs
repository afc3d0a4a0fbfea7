use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::{self, CompareOverrides};
use crate::engine::{Engine, ImageInput};
use crate::report::{json, terminal};

/// `pixelsift compare` — canonicalize, diff, cluster, report.
/// Returns exit code: 0 = match, 1 = significant difference.
pub async fn compare(
    expected: PathBuf,
    actual: PathBuf,
    diff_output: Option<PathBuf>,
    json_output: bool,
    overrides: CompareOverrides,
) -> Result<i32> {
    let engine = Engine::new(config::load()?);

    let expected_bytes = std::fs::read(&expected)
        .with_context(|| format!("Failed to read {}", expected.display()))?;
    let actual_bytes = std::fs::read(&actual)
        .with_context(|| format!("Failed to read {}", actual.display()))?;

    debug!(expected = %expected.display(), actual = %actual.display(), "comparing");
    let result = tokio::task::spawn_blocking(move || {
        engine.compare(
            ImageInput::Encoded(expected_bytes),
            ImageInput::Encoded(actual_bytes),
            Some(&overrides),
        )
    })
    .await
    .context("Compare task panicked")??;

    if let (Some(path), Some(img)) = (&diff_output, &result.diff_image) {
        super::write_png(path, img)?;
    }

    if json_output {
        println!("{}", json::render(&result)?);
    } else {
        terminal::print_result(&actual.display().to_string(), &result);
    }

    Ok(if result.ok { 0 } else { 1 })
}
