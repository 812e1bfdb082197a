pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod raster;
pub mod scan;

pub use cli::{CliArgs, Command, CommonArgs, CompressionLevel};
pub use error::SplitError;
pub use export::{DirectorySink, ExportedSprite, Exporter, MemorySink, SpriteSink, export};
pub use pipeline::{SplitOptions, SplitReport, split_atlas, split_atlases};
pub use progress::{ChannelProgress, LogProgress, NoProgress, Progress, ProgressSink};
pub use raster::{BYTES_PER_PIXEL, Raster};
pub use scan::{Component, Components, Scanner, scan};
