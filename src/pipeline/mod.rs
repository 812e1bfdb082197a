mod loader;
mod split;

pub use loader::{base_name, collect_image_paths, load_rgba};
pub use split::{
    DEFAULT_GAP, DEFAULT_OUTPUT_DIR, SplitOptions, SplitReport, scan_atlas, scan_atlases, split_atlas,
    split_atlases,
};
