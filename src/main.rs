use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;

use atlas_split::cli::{CliArgs, Command, CommonArgs, CompressionLevel};
use atlas_split::config::LoadedConfig;
use atlas_split::pipeline::{
    DEFAULT_GAP, DEFAULT_OUTPUT_DIR, SplitOptions, scan_atlases, split_atlases,
};
use atlas_split::scan::Component;

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = CliArgs::parse();

    let args = match &cli.command {
        Command::Split(args) => args.clone(),
        Command::Scan(args) => CommonArgs::from(args.clone()),
    };

    let merged = merge_config_with_args(&args)?;

    env_logger::Builder::new()
        .filter_level(if merged.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    match &cli.command {
        Command::Split(_) => {
            info!("atlas-split v{}", env!("CARGO_PKG_VERSION"));

            let options = SplitOptions {
                gap: merged.gap,
                output_dir: merged.output,
                compress: merged.compress,
                manifest: merged.manifest,
            };
            let reports = split_atlases(&merged.input, &options, None)?;

            info!(
                "Exported {} sprites from {} atlases into {}",
                reports.iter().map(|r| r.sprites.len()).sum::<usize>(),
                reports.len(),
                options.output_dir.display()
            );
        }
        Command::Scan(_) => print_scan(&merged.input, merged.gap)?,
    }

    info!("Done!");

    Ok(())
}

#[derive(Serialize)]
struct ScanOutput {
    source: String,
    components: Vec<Component>,
}

#[allow(clippy::print_stdout)]
fn print_scan(inputs: &[PathBuf], gap: u32) -> Result<()> {
    let mut results = Vec::new();
    for (path, components) in scan_atlases(inputs, gap)? {
        info!("{}: {} components", path.display(), components.len());
        results.push(ScanOutput {
            source: path.display().to_string(),
            components,
        });
    }

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    input: Vec<PathBuf>,
    output: PathBuf,
    gap: u32,
    compress: Option<CompressionLevel>,
    manifest: bool,
    verbose: bool,
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &CommonArgs) -> Result<MergedConfig> {
    let loaded_config = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };

    // Determine input files: CLI args override config
    let input = if !args.input.is_empty() {
        args.input.clone()
    } else if let Some(ref lc) = loaded_config {
        lc.resolve_inputs()
            .context("failed to resolve input files from config")?
    } else {
        // This shouldn't happen due to clap's required_unless_present
        Vec::new()
    };

    // Determine output directory: CLI > config > default
    let output = args.output.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.resolve_output_dir())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    });

    let gap = args.gap.unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.gap)
            .unwrap_or(DEFAULT_GAP)
    });

    // Compress: CLI option overrides config
    let compress = if args.compress.is_some() {
        args.compress
    } else if let Some(ref lc) = loaded_config {
        lc.compression()?
    } else {
        None
    };

    // Boolean flags: CLI presence sets them to true, otherwise use config
    let manifest = if args.manifest {
        true
    } else if let Some(ref lc) = loaded_config {
        lc.config.manifest
    } else {
        false
    };

    Ok(MergedConfig {
        input,
        output,
        gap,
        compress,
        manifest,
        verbose: args.verbose,
    })
}
