mod buffer;
mod crop;

pub use buffer::{BYTES_PER_PIXEL, Raster};
