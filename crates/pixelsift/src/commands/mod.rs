mod batch;
mod compare;

use std::path::Path;

use anyhow::{Context, Result};

pub use batch::batch;
pub use compare::compare;

/// Encode and write a diff visualization PNG, creating parent dirs.
pub(crate) fn write_png(path: &Path, img: &image::RgbaImage) -> Result<()> {
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
        .context("Failed to encode diff image")?;
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, &png).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
