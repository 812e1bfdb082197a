use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "atlas-split")]
#[command(version, about = "Split sprite atlases into individual sprites", long_about = None)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Split atlases into one PNG per sprite
    Split(CommonArgs),
    /// Print the sprite bounding boxes as JSON without writing files
    Scan(ScanArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Atlas image files or directories
    #[arg(required_unless_present = "config")]
    pub input: Vec<PathBuf>,

    /// Load settings from a JSON config file (only input and gap are used)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Max distance in pixels between opaque pixels of the same sprite [default: 2]
    #[arg(short, long, value_name = "PIXELS")]
    pub gap: Option<u32>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl From<ScanArgs> for CommonArgs {
    fn from(args: ScanArgs) -> Self {
        CommonArgs {
            input: args.input,
            config: args.config,
            output: None,
            gap: args.gap,
            compress: None,
            manifest: false,
            verbose: args.verbose,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Atlas image files or directories
    #[arg(required_unless_present = "config")]
    pub input: Vec<PathBuf>,

    /// Load settings from a JSON config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output directory for sprite files [default: output]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Max distance in pixels between opaque pixels of the same sprite [default: 2]
    #[arg(short, long, value_name = "PIXELS")]
    pub gap: Option<u32>,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Write a <name>.json manifest next to the sprites
    #[arg(long)]
    pub manifest: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_level_parse() {
        assert_eq!("max".parse::<CompressionLevel>(), Ok(CompressionLevel::Max));
        assert_eq!("MAX".parse::<CompressionLevel>(), Ok(CompressionLevel::Max));
        assert_eq!("4".parse::<CompressionLevel>(), Ok(CompressionLevel::Level(4)));
        assert!("7".parse::<CompressionLevel>().is_err());
        assert!("fast".parse::<CompressionLevel>().is_err());
    }

    #[test]
    fn test_parse_split_command() {
        let cli = CliArgs::try_parse_from([
            "atlas-split",
            "split",
            "sheet.png",
            "-o",
            "out",
            "--gap",
            "3",
            "--compress",
        ])
        .unwrap();

        let Command::Split(args) = cli.command else {
            panic!("expected split command");
        };
        assert_eq!(args.input, vec![PathBuf::from("sheet.png")]);
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert_eq!(args.gap, Some(3));
        assert_eq!(args.compress, Some(CompressionLevel::Level(2)));
        assert!(!args.manifest);
    }

    #[test]
    fn test_scan_rejects_output_flags() {
        for flag in ["--manifest", "--compress", "-o"] {
            let mut argv = vec!["atlas-split", "scan", "sheet.png", flag];
            if flag == "-o" {
                argv.push("out");
            }
            assert!(CliArgs::try_parse_from(argv).is_err(), "{flag} accepted");
        }

        let cli = CliArgs::try_parse_from(["atlas-split", "scan", "sheet.png", "-g", "5"]).unwrap();
        let Command::Scan(args) = cli.command else {
            panic!("expected scan command");
        };
        let common = CommonArgs::from(args);
        assert_eq!(common.gap, Some(5));
        assert_eq!(common.output, None);
        assert!(!common.manifest);
    }

    #[test]
    fn test_input_required_without_config() {
        assert!(CliArgs::try_parse_from(["atlas-split", "scan"]).is_err());
        assert!(CliArgs::try_parse_from(["atlas-split", "scan", "-c", "split.json"]).is_ok());
    }
}
