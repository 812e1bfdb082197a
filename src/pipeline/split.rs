use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use log::{debug, info};
use rayon::prelude::*;

use super::loader::{base_name, collect_image_paths, load_rgba};
use crate::cli::CompressionLevel;
use crate::error::SplitError;
use crate::export::{DirectorySink, ExportedSprite, Exporter};
use crate::output::write_manifest;
use crate::progress::{LogProgress, Progress, ProgressSink};
use crate::raster::Raster;
use crate::scan::{Component, Scanner};

pub const DEFAULT_GAP: u32 = 2;
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Settings shared by every atlas in a batch
#[derive(Debug, Clone)]
pub struct SplitOptions {
    pub gap: u32,
    pub output_dir: PathBuf,
    pub compress: Option<CompressionLevel>,
    /// Also write `<base>.json` describing the exported sprites
    pub manifest: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            gap: DEFAULT_GAP,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            compress: None,
            manifest: false,
        }
    }
}

/// Outcome of splitting one atlas
#[derive(Debug, Clone)]
pub struct SplitReport {
    pub source: PathBuf,
    pub base_name: String,
    pub width: u32,
    pub height: u32,
    pub gap: u32,
    pub sprites: Vec<ExportedSprite>,
}

/// Decode, scan and export a single atlas file into `options.output_dir`
pub fn split_atlas(
    path: &Path,
    options: &SplitOptions,
    progress: &mut dyn ProgressSink,
    cancel_token: Option<&Arc<AtomicBool>>,
) -> Result<SplitReport> {
    progress.report(&Progress::Reading);
    debug!("Reading image: {}", path.display());
    info!("Using gap tolerance: {} pixels", options.gap);

    let image = load_rgba(path)?;
    let raster = Raster::from_image(&image)?;

    let mut scanner = Scanner::new(options.gap);
    if let Some(token) = cancel_token {
        scanner = scanner.cancel_token(Arc::clone(token));
    }
    let components = scanner.scan(&raster, progress)?;
    debug!("Found {} components in {}", components.len(), path.display());

    if !options.output_dir.exists() {
        fs::create_dir_all(&options.output_dir).map_err(|e| SplitError::OutputWrite {
            path: options.output_dir.clone(),
            source: e,
        })?;
    }

    let base_name = base_name(path);
    let mut exporter = Exporter::new(base_name.clone());
    if let Some(token) = cancel_token {
        exporter = exporter.cancel_token(Arc::clone(token));
    }
    let mut sink = DirectorySink::new(&options.output_dir).compress(options.compress);
    let sprites = exporter
        .export(&raster, &components, &mut sink, progress)
        .with_context(|| format!("failed to split {}", path.display()))?;

    let report = SplitReport {
        source: path.to_path_buf(),
        base_name,
        width: raster.width(),
        height: raster.height(),
        gap: options.gap,
        sprites,
    };

    if options.manifest {
        let manifest_path = write_manifest(&report, &options.output_dir)?;
        info!("Generated {}", manifest_path.display());
    }

    Ok(report)
}

/// Split every atlas found in `inputs`, one file per rayon task.
///
/// Each file logs its own progress. The first failure aborts the batch;
/// files already written by other tasks are kept. Inputs sharing a file
/// stem are rejected up front since their sprites would overwrite each
/// other in the shared output directory.
pub fn split_atlases(
    inputs: &[impl AsRef<Path>],
    options: &SplitOptions,
    cancel_token: Option<&Arc<AtomicBool>>,
) -> Result<Vec<SplitReport>> {
    let paths = collect_image_paths(inputs)?;
    if paths.is_empty() {
        return Err(SplitError::NoImages.into());
    }
    check_unique_base_names(&paths)?;

    info!("Splitting {} atlases...", paths.len());

    paths
        .par_iter()
        .map(|path| {
            let mut progress = LogProgress::new(path.display().to_string());
            split_atlas(path, options, &mut progress, cancel_token)
        })
        .collect()
}

fn check_unique_base_names(paths: &[PathBuf]) -> Result<(), SplitError> {
    let mut seen: HashMap<String, &PathBuf> = HashMap::new();
    for path in paths {
        let stem = base_name(path);
        if let Some(first) = seen.get(&stem) {
            return Err(SplitError::DuplicateBaseName {
                stem,
                first: (*first).clone(),
                second: path.clone(),
            });
        }
        seen.insert(stem, path);
    }
    Ok(())
}

/// Decode and scan without writing anything
pub fn scan_atlas(path: &Path, gap: u32) -> Result<Vec<Component>> {
    let image = load_rgba(path)?;
    let raster = Raster::from_image(&image)?;
    Ok(crate::scan::scan(&raster, gap))
}

/// Scan every atlas found in `inputs`, in path order
pub fn scan_atlases(
    inputs: &[impl AsRef<Path>],
    gap: u32,
) -> Result<Vec<(PathBuf, Vec<Component>)>> {
    let paths = collect_image_paths(inputs)?;
    if paths.is_empty() {
        return Err(SplitError::NoImages.into());
    }

    paths
        .into_iter()
        .map(|path| {
            let components = scan_atlas(&path, gap)
                .with_context(|| format!("failed to scan {}", path.display()))?;
            Ok((path, components))
        })
        .collect()
}
