//! Command-line configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use rmap_build::{parse_int, BuildConfig};

/// A backend the driver can run.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum OutputFormat {
    /// Indented text dump of the resolved tree.
    Tree,
    /// Declarations with every attribute explicit, as JSON.
    Explicit,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Tree, OutputFormat::Explicit];

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Tree => "tree",
            OutputFormat::Explicit => "explicit",
        }
    }

    /// File extension, including the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Tree => ".txt",
            OutputFormat::Explicit => ".json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| {
                format!("unknown output format `{s}` (expected one of: tree, explicit)")
            })
    }
}

/// Driver configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// A declaration file, or a directory of them.
    pub source: PathBuf,
    pub outputs: Vec<OutputFormat>,
    /// Directory for one file per root and output; stdout when `None`.
    pub output_dir: Option<PathBuf>,
    pub verbose: bool,
    /// Run traversals on a thread pool.
    pub parallel: bool,
    pub build: BuildConfig,
}

impl Config {
    pub fn new(source: impl Into<PathBuf>, outputs: Vec<OutputFormat>) -> Self {
        Config {
            source: source.into(),
            outputs,
            output_dir: None,
            verbose: false,
            parallel: true,
            build: BuildConfig::default(),
        }
    }

    /// Parse arguments (without the program name):
    ///
    /// ```text
    /// <formats> <source> [--output <dir>] [--base=<addr>] [--bus-width=<bits>]
    ///                    [--no-parallel] [-v|--verbose]
    /// ```
    ///
    /// `<formats>` is a comma-separated list.
    ///
    /// # Errors
    ///
    /// Returns a message suitable for printing above the usage text.
    pub fn from_args(args: &[String]) -> Result<Config, String> {
        let mut positional = Vec::new();
        let mut output_dir = None;
        let mut verbose = false;
        let mut parallel = true;
        let mut build = BuildConfig::default();

        let mut args = args.iter();
        while let Some(arg) = args.next() {
            if arg == "-o" || arg == "--output" {
                let dir = args
                    .next()
                    .ok_or_else(|| format!("`{arg}` needs a directory"))?;
                output_dir = (dir != "-").then(|| PathBuf::from(dir));
            } else if let Some(dir) = arg.strip_prefix("--output=") {
                output_dir = (dir != "-").then(|| PathBuf::from(dir));
            } else if let Some(base) = arg.strip_prefix("--base=") {
                build.default_base =
                    parse_int(base).ok_or_else(|| format!("invalid base address `{base}`"))?;
            } else if let Some(width) = arg.strip_prefix("--bus-width=") {
                build.default_bus_width = parse_int(width)
                    .and_then(|w| u32::try_from(w).ok())
                    .ok_or_else(|| format!("invalid bus width `{width}`"))?;
            } else if arg == "--no-parallel" {
                parallel = false;
            } else if arg == "-v" || arg == "--verbose" {
                verbose = true;
            } else if arg.starts_with('-') && arg != "-" {
                return Err(format!("unknown option `{arg}`"));
            } else {
                positional.push(arg.as_str());
            }
        }

        let [formats, source] = positional.as_slice() else {
            return Err("expected an output format list and a source path".to_string());
        };
        let outputs = formats
            .split(',')
            .map(str::parse)
            .collect::<Result<Vec<OutputFormat>, _>>()?;

        Ok(Config {
            source: PathBuf::from(source),
            outputs,
            output_dir,
            verbose,
            parallel,
            build,
        })
    }
}

pub const USAGE: &str = "\
Usage: rmapc <formats> <source> [options]

Formats (comma-separated): tree, explicit
Source: a declaration file (.json) or a directory of them

Options:
  -o, --output <dir>   Write one file per root and format (default: stdout)
  --base=<addr>        Default memory-map base (default: 0x8000_0000)
  --bus-width=<bits>   Default memory-map bus width (default: 32)
  --no-parallel        Run traversals sequentially
  -v, --verbose        Trace construction to stderr";

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_minimal() {
        let config = Config::from_args(&args(&["tree", "src"])).unwrap();
        assert_eq!(config, Config::new("src", vec![OutputFormat::Tree]));
    }

    #[test]
    fn test_all_options() {
        let config = Config::from_args(&args(&[
            "-v",
            "tree,explicit",
            "maps",
            "-o",
            "out",
            "--base=0x4000_0000",
            "--bus-width=64",
            "--no-parallel",
        ]))
        .unwrap();
        assert_eq!(config.outputs, OutputFormat::ALL);
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
        assert_eq!(config.build.default_base, 0x4000_0000);
        assert_eq!(config.build.default_bus_width, 64);
        assert!(config.verbose);
        assert!(!config.parallel);
    }

    #[test]
    fn test_dash_means_stdout() {
        let config = Config::from_args(&args(&["tree", "src", "--output=-"])).unwrap();
        assert_eq!(config.output_dir, None);
    }

    #[test]
    fn test_errors() {
        assert!(Config::from_args(&args(&["tree"])).is_err());
        assert!(Config::from_args(&args(&["html", "src"])).is_err());
        assert!(Config::from_args(&args(&["tree", "src", "--frobnicate"])).is_err());
        assert!(Config::from_args(&args(&["tree", "src", "-o"])).is_err());
        assert!(Config::from_args(&args(&["tree", "src", "--base=zero"])).is_err());
    }
}
