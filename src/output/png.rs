use std::fs;
use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, RgbaImage};

use crate::cli::CompressionLevel;
use crate::error::SplitError;

/// Encode a sprite as PNG in memory, optionally recompressed with oxipng.
///
/// `path` is only used for error context.
pub fn encode_png(
    image: &RgbaImage,
    path: &Path,
    compress: Option<CompressionLevel>,
) -> Result<Vec<u8>, SplitError> {
    let mut png_data = Cursor::new(Vec::new());
    image
        .write_to(&mut png_data, ImageFormat::Png)
        .map_err(|e| SplitError::ImageSave {
            path: path.to_path_buf(),
            source: e,
        })?;

    let Some(level) = compress else {
        return Ok(png_data.into_inner());
    };

    let opts = match level {
        CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
        CompressionLevel::Max => oxipng::Options::max_compression(),
    };
    oxipng::optimize_from_memory(&png_data.into_inner(), &opts).map_err(|e| {
        SplitError::PngCompress {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })
}

/// Encode and write a sprite to `path`
pub fn save_png(
    image: &RgbaImage,
    path: &Path,
    compress: Option<CompressionLevel>,
) -> Result<(), SplitError> {
    let data = encode_png(image, path, compress)?;

    fs::write(path, data).map_err(|e| SplitError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_encode_roundtrip_preserves_pixels() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(0, 0, Rgba([1, 2, 3, 4]));
        img.put_pixel(2, 1, Rgba([200, 100, 50, 255]));

        for compress in [None, Some(CompressionLevel::Level(1))] {
            let bytes = encode_png(&img, Path::new("sprite.png"), compress).unwrap();
            let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
                .unwrap()
                .into_rgba8();
            assert_eq!(decoded, img);
        }
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("sprite.png");

        let err = save_png(&RgbaImage::new(1, 1), &path, None).unwrap_err();
        assert!(matches!(err, SplitError::OutputWrite { .. }));
    }
}
