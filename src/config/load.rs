use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::types::{CompressConfig, SplitConfig};
use crate::cli::CompressionLevel;

/// A loaded configuration file with its associated directory.
///
/// Paths in the config are relative to the config file location,
/// so we need to track where the config was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed configuration
    pub config: SplitConfig,
    /// The directory containing the config file
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    /// Load a config file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: SplitConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { config, config_dir })
    }

    /// Resolve input patterns to actual file paths.
    ///
    /// Glob patterns are expanded, and all paths are resolved relative
    /// to the config file directory.
    pub fn resolve_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut results = Vec::new();

        for pattern in &self.config.input {
            if is_glob_pattern(pattern) {
                let full_pattern = self.config_dir.join(pattern);
                let pattern_str = full_pattern.to_string_lossy();

                let paths = glob::glob(&pattern_str)
                    .with_context(|| format!("invalid glob pattern: {}", pattern))?;

                for entry in paths {
                    let path =
                        entry.with_context(|| format!("failed to read glob entry: {}", pattern))?;
                    results.push(path);
                }
            } else {
                results.push(self.config_dir.join(pattern));
            }
        }

        Ok(results)
    }

    /// Resolve the output directory relative to the config file directory.
    pub fn resolve_output_dir(&self) -> PathBuf {
        self.config_dir.join(&self.config.output_dir)
    }

    /// Compression level from the config, validated like the CLI flag.
    pub fn compression(&self) -> Result<Option<CompressionLevel>> {
        match &self.config.compress {
            None => Ok(None),
            Some(CompressConfig::Level(n)) => n
                .to_string()
                .parse::<CompressionLevel>()
                .map(Some)
                .map_err(|e: String| anyhow::anyhow!("{} in config file", e)),
            Some(CompressConfig::Max(s)) => s
                .parse::<CompressionLevel>()
                .map(Some)
                .map_err(|e: String| anyhow::anyhow!("{} in config file", e)),
        }
    }
}

/// Check if a pattern contains glob characters.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("*.png"));
        assert!(is_glob_pattern("atlases/**/*.png"));
        assert!(is_glob_pattern("sheet?.png"));
        assert!(is_glob_pattern("sheet[0-9].png"));
        assert!(!is_glob_pattern("sheet.png"));
        assert!(!is_glob_pattern("atlases/items.png"));
    }

    #[test]
    fn test_load_resolves_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"").unwrap();
        std::fs::write(dir.path().join("b.png"), b"").unwrap();
        let config_path = dir.path().join("split.json");
        std::fs::write(
            &config_path,
            r#"{ "input": ["*.png", "extra.png"], "output_dir": "sprites", "gap": 4 }"#,
        )
        .unwrap();

        let loaded = LoadedConfig::load(&config_path).unwrap();
        let mut inputs = loaded.resolve_inputs().unwrap();
        inputs.sort();

        assert_eq!(loaded.config.gap, 4);
        assert_eq!(loaded.resolve_output_dir(), dir.path().join("sprites"));
        assert_eq!(
            inputs,
            vec![
                dir.path().join("a.png"),
                dir.path().join("b.png"),
                dir.path().join("extra.png"),
            ]
        );
    }

    #[test]
    fn test_compression_validation() {
        let mut loaded = LoadedConfig {
            config: SplitConfig::default(),
            config_dir: PathBuf::from("."),
        };
        assert_eq!(loaded.compression().unwrap(), None);

        loaded.config.compress = Some(CompressConfig::Level(3));
        assert_eq!(loaded.compression().unwrap(), Some(CompressionLevel::Level(3)));

        loaded.config.compress = Some(CompressConfig::Max("max".to_string()));
        assert_eq!(loaded.compression().unwrap(), Some(CompressionLevel::Max));

        loaded.config.compress = Some(CompressConfig::Level(9));
        assert!(loaded.compression().is_err());
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("split.json");
        std::fs::write(&config_path, "{ not json").unwrap();

        assert!(LoadedConfig::load(&config_path).is_err());
    }
}
