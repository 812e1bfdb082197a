use image::RgbaImage;

use super::{BYTES_PER_PIXEL, Raster};
use crate::error::SplitError;
use crate::scan::Component;

impl Raster<'_> {
    /// Copy the pixels inside `bounds` into a new image.
    ///
    /// Pixel `(lx, ly)` of the result is source pixel `(x + lx, y + ly)`,
    /// byte for byte. Transparent pixels inside the box are kept.
    pub fn crop(&self, bounds: Component) -> Result<RgbaImage, SplitError> {
        if !self.contains(&bounds) {
            return Err(SplitError::CropOutOfBounds {
                x: bounds.x,
                y: bounds.y,
                crop_width: bounds.width,
                crop_height: bounds.height,
                width: self.width(),
                height: self.height(),
            });
        }

        let row_len = bounds.width as usize * BYTES_PER_PIXEL;
        let mut pixels = Vec::with_capacity(row_len * bounds.height as usize);
        for y in bounds.y..bounds.bottom() {
            let start = self.offset(bounds.x, y);
            pixels.extend_from_slice(&self.data()[start..start + row_len]);
        }

        RgbaImage::from_raw(bounds.width, bounds.height, pixels).ok_or(
            SplitError::DimensionOverflow {
                width: bounds.width,
                height: bounds.height,
            },
        )
    }

    /// Whether `bounds` lies entirely inside the raster
    pub fn contains(&self, bounds: &Component) -> bool {
        u64::from(bounds.x) + u64::from(bounds.width) <= u64::from(self.width())
            && u64::from(bounds.y) + u64::from(bounds.height) <= u64::from(self.height())
    }
}
