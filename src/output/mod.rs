mod manifest;
mod png;

pub use manifest::write_manifest;
pub use png::{encode_png, save_png};
