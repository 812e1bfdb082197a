use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("No valid images found in input")]
    NoImages,

    #[error("Raster buffer holds {actual} bytes, but {width}x{height} RGBA needs {expected}")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Raster dimensions {width}x{height} overflow the addressable buffer size")]
    DimensionOverflow { width: u32, height: u32 },

    #[error(
        "Crop region {crop_width}x{crop_height} at ({x}, {y}) exceeds raster bounds ({width}x{height})"
    )]
    CropOutOfBounds {
        x: u32,
        y: u32,
        crop_width: u32,
        crop_height: u32,
        width: u32,
        height: u32,
    },

    #[error("Failed to export sprite #{index} '{name}': {source}")]
    Export {
        index: usize,
        name: String,
        source: Box<SplitError>,
    },

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error(
        "Inputs '{first}' and '{second}' would both write sprites named '{stem}_N.png' into the same output directory"
    )]
    DuplicateBaseName {
        stem: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),

    #[error("Operation cancelled")]
    Cancelled,
}
