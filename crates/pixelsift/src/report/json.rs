use anyhow::{Context, Result};
use serde_json::Value;

use crate::engine::{BatchEntry, ComparisonResult};

/// JSON document for a single comparison.
pub fn render(result: &ComparisonResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize result")
}

/// JSON array for a batch run. Failed pairs serialize to
/// `{name, ok: false, error}`.
pub fn render_batch(entries: &[BatchEntry]) -> Result<String> {
    let mut values = Vec::with_capacity(entries.len());
    for entry in entries {
        values.push(entry_value(entry)?);
    }
    serde_json::to_string_pretty(&values).context("Failed to serialize batch results")
}

fn entry_value(entry: &BatchEntry) -> Result<Value> {
    match &entry.outcome {
        Ok(result) => {
            let mut value =
                serde_json::to_value(result).context("Failed to serialize result")?;
            if let Value::Object(map) = &mut value {
                map.insert("name".into(), Value::String(entry.name.clone()));
            }
            Ok(value)
        }
        Err(e) => Ok(serde_json::json!({
            "name": entry.name,
            "ok": false,
            "error": e.to_string(),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CompareError, Engine};
    use image::{Rgba, RgbaImage};

    fn passing_result() -> ComparisonResult {
        let img = RgbaImage::from_pixel(10, 10, Rgba([4, 5, 6, 255]));
        Engine::default()
            .compare(img.clone().into(), img.into(), None)
            .unwrap()
    }

    #[test]
    fn single_result_renders_expected_keys() {
        let rendered = render(&passing_result()).unwrap();
        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["ok"], Value::Bool(true));
        assert_eq!(value["diffPixels"], 0);
        assert_eq!(value["details"]["analysis"]["totalClusters"], 0);
    }

    #[test]
    fn batch_error_entry_degrades_to_name_ok_error() {
        let entries = vec![
            BatchEntry {
                name: "good".into(),
                outcome: Ok(passing_result()),
            },
            BatchEntry {
                name: "bad".into(),
                outcome: Err(CompareError::Validation("expected image is missing".into())),
            },
        ];
        let rendered = render_batch(&entries).unwrap();
        let value: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0]["name"], "good");
        assert_eq!(value[0]["ok"], Value::Bool(true));
        assert_eq!(value[1]["name"], "bad");
        assert_eq!(value[1]["ok"], Value::Bool(false));
        assert!(value[1]["error"].as_str().unwrap().contains("invalid input"));
    }
}
