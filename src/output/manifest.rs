use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::error::SplitError;
use crate::pipeline::SplitReport;

#[derive(Serialize)]
struct Manifest {
    meta: Meta,
    source: String,
    size: Size,
    gap: u32,
    sprites: Vec<ManifestSprite>,
}

#[derive(Serialize)]
struct Meta {
    app: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct Size {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct ManifestSprite {
    name: String,
    frame: Frame,
}

#[derive(Serialize)]
struct Frame {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

/// Write `<base_name>.json` listing every exported sprite and its frame in
/// the source atlas. Returns the path written.
pub fn write_manifest(report: &SplitReport, output_dir: &Path) -> Result<PathBuf> {
    let manifest = Manifest {
        meta: Meta {
            app: "atlas-split",
            version: env!("CARGO_PKG_VERSION"),
        },
        source: report
            .source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        size: Size {
            w: report.width,
            h: report.height,
        },
        gap: report.gap,
        sprites: report
            .sprites
            .iter()
            .map(|sprite| ManifestSprite {
                name: sprite.name.clone(),
                frame: Frame {
                    x: sprite.bounds.x,
                    y: sprite.bounds.y,
                    w: sprite.bounds.width,
                    h: sprite.bounds.height,
                },
            })
            .collect(),
    };

    let json_path = output_dir.join(format!("{}.json", report.base_name));
    let content = serde_json::to_string_pretty(&manifest)?;

    fs::write(&json_path, content).map_err(|e| SplitError::OutputWrite {
        path: json_path.clone(),
        source: e,
    })?;

    Ok(json_path)
}
