mod exporter;
mod sink;

pub use exporter::{ExportedSprite, Exporter, export, sprite_name};
pub use sink::{DirectorySink, MemorySink, SpriteSink};
