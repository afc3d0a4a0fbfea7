use image::RgbaImage;

use super::error::CompareError;

/// The three image shapes the engine accepts.
///
/// Normalization is an exhaustive match over this enum, not property
/// probing on opaque values.
pub enum ImageInput {
    /// An already-decoded RGBA surface.
    Surface(RgbaImage),
    /// Raw RGBA bytes with explicit dimensions (`data.len()` must equal
    /// `width * height * 4`).
    Raw {
        width: u32,
        height: u32,
        data: Vec<u8>,
    },
    /// Encoded image bytes (PNG, ...) handed to the codec.
    Encoded(Vec<u8>),
}

impl ImageInput {
    /// True when there is no payload at all. Caught by validation
    /// before any decode or pixel work.
    pub(crate) fn is_absent(&self) -> bool {
        match self {
            Self::Surface(_) => false,
            Self::Raw { data, .. } => data.is_empty(),
            Self::Encoded(bytes) => bytes.is_empty(),
        }
    }

    /// Normalize to an owned pixel buffer.
    pub(crate) fn into_rgba(self) -> Result<RgbaImage, CompareError> {
        let img = match self {
            Self::Surface(img) => img,
            Self::Raw {
                width,
                height,
                data,
            } => {
                let expected = width as usize * height as usize * 4;
                if data.len() != expected {
                    return Err(CompareError::UnsupportedInput(format!(
                        "raw buffer is {} bytes, {width}x{height} RGBA needs {expected}",
                        data.len(),
                    )));
                }
                RgbaImage::from_raw(width, height, data).ok_or_else(|| {
                    CompareError::UnsupportedInput(format!(
                        "raw buffer does not fit {width}x{height} RGBA"
                    ))
                })?
            }
            Self::Encoded(bytes) => image::load_from_memory(&bytes)
                .map_err(|e| CompareError::UnsupportedInput(format!("decode failed: {e}")))?
                .to_rgba8(),
        };

        if img.width() == 0 || img.height() == 0 {
            return Err(CompareError::EmptyImage {
                width: img.width(),
                height: img.height(),
            });
        }
        Ok(img)
    }
}

impl From<RgbaImage> for ImageInput {
    fn from(img: RgbaImage) -> Self {
        Self::Surface(img)
    }
}

impl From<Vec<u8>> for ImageInput {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Encoded(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 255]));
        let mut buf = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn surface_passes_through() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4]));
        let out = ImageInput::Surface(img.clone()).into_rgba().unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn raw_roundtrip() {
        let data = vec![7u8; 2 * 2 * 4];
        let out = ImageInput::Raw {
            width: 2,
            height: 2,
            data,
        }
        .into_rgba()
        .unwrap();
        assert_eq!(out.dimensions(), (2, 2));
        assert_eq!(out.get_pixel(1, 1).0, [7, 7, 7, 7]);
    }

    #[test]
    fn raw_length_mismatch_is_unsupported() {
        let err = ImageInput::Raw {
            width: 4,
            height: 4,
            data: vec![0u8; 10],
        }
        .into_rgba()
        .unwrap_err();
        assert!(matches!(err, CompareError::UnsupportedInput(_)), "{err}");
    }

    #[test]
    fn encoded_decodes() {
        let out = ImageInput::Encoded(png_bytes(5, 7)).into_rgba().unwrap();
        assert_eq!(out.dimensions(), (5, 7));
    }

    #[test]
    fn garbage_bytes_are_unsupported() {
        let err = ImageInput::Encoded(b"definitely not an image".to_vec())
            .into_rgba()
            .unwrap_err();
        assert!(matches!(err, CompareError::UnsupportedInput(_)), "{err}");
    }

    #[test]
    fn zero_area_surface_is_empty() {
        let err = ImageInput::Surface(RgbaImage::new(0, 8))
            .into_rgba()
            .unwrap_err();
        assert!(matches!(err, CompareError::EmptyImage { .. }), "{err}");
    }

    #[test]
    fn empty_blob_is_absent() {
        assert!(ImageInput::Encoded(Vec::new()).is_absent());
        assert!(!ImageInput::Encoded(png_bytes(1, 1)).is_absent());
    }
}
