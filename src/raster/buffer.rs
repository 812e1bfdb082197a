use image::RgbaImage;

use crate::error::SplitError;

/// Interleaved channels per pixel: R, G, B, A.
pub const BYTES_PER_PIXEL: usize = 4;

const ALPHA_CHANNEL: usize = 3;

/// Read-only view of a decoded RGBA8 buffer (row-major, no row padding).
///
/// The buffer length is validated once at construction, so every accessor
/// can rely on `data.len() == width * height * BYTES_PER_PIXEL`.
#[derive(Debug, Clone, Copy)]
pub struct Raster<'a> {
    width: u32,
    height: u32,
    data: &'a [u8],
}

impl<'a> Raster<'a> {
    /// Wrap a raw RGBA8 buffer.
    ///
    /// Fails fast if the buffer length does not match the dimensions; the
    /// buffer is never truncated or padded.
    pub fn new(width: u32, height: u32, data: &'a [u8]) -> Result<Self, SplitError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
            .ok_or(SplitError::DimensionOverflow { width, height })?;

        if data.len() != expected {
            return Err(SplitError::BufferSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Borrow the pixels of a decoded image
    pub fn from_image(image: &'a RgbaImage) -> Result<Self, SplitError> {
        let (width, height) = image.dimensions();
        Self::new(width, height, image.as_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of pixels (`width * height`)
    pub fn pixel_count(&self) -> usize {
        self.data.len() / BYTES_PER_PIXEL
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// RGBA value at `(x, y)`, or `None` outside the raster
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = self.offset(x, y);
        let px = self.data.get(start..start + BYTES_PER_PIXEL)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Whether the pixel at `(x, y)` has non-zero alpha.
    ///
    /// Any alpha in `1..=255` counts as opaque. Coordinates must be in range;
    /// the scanner clamps its probes to the raster before calling this.
    pub fn is_opaque(&self, x: u32, y: u32) -> bool {
        debug_assert!(x < self.width && y < self.height);
        self.data
            .get(self.offset(x, y) + ALPHA_CHANNEL)
            .is_some_and(|&alpha| alpha > 0)
    }

    /// Byte offset of the first channel of `(x, y)`
    pub(crate) fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_rejects_short_buffer() {
        let data = vec![0u8; 2 * 2 * BYTES_PER_PIXEL - 1];
        let err = Raster::new(2, 2, &data).unwrap_err();
        assert!(matches!(
            err,
            SplitError::BufferSize {
                expected: 16,
                actual: 15,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_long_buffer() {
        let data = vec![0u8; 2 * 2 * BYTES_PER_PIXEL + 4];
        assert!(Raster::new(2, 2, &data).is_err());
    }

    #[test]
    fn test_empty_raster() {
        let raster = Raster::new(0, 0, &[]).unwrap();
        assert_eq!(raster.pixel_count(), 0);
        assert_eq!(raster.pixel(0, 0), None);
    }

    #[test]
    fn test_pixel_access() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(2, 1, Rgba([10, 20, 30, 40]));
        let raster = Raster::from_image(&img).unwrap();

        assert_eq!(raster.dimensions(), (3, 2));
        assert_eq!(raster.pixel(2, 1), Some([10, 20, 30, 40]));
        assert_eq!(raster.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(raster.pixel(3, 0), None);
        assert_eq!(raster.pixel(0, 2), None);
    }

    #[test]
    fn test_partial_alpha_is_opaque() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(0, 0, Rgba([255, 255, 255, 0]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 1]));
        img.put_pixel(2, 0, Rgba([0, 0, 0, 254]));
        let raster = Raster::from_image(&img).unwrap();

        assert!(!raster.is_opaque(0, 0));
        assert!(raster.is_opaque(1, 0));
        assert!(raster.is_opaque(2, 0));
    }
}
