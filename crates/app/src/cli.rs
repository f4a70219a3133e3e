use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ptac_core::{ConfigError, PtacConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing with a summary line
    Text,
    /// A single JSON object mapping display key to text
    Json,
}

/// Process images to extract text using OCR in parallel
#[derive(Parser, Debug)]
#[command(name = "ptac", author, version)]
#[command(after_help = "Examples:
  ptac --source /path/to/images
  ptac --source ./screenshots --workers 4
  ptac --source ./set1 ./set2 --export-csv
  ptac --source ./test-questions --no-preprocessing")]
pub struct Args {
    /// Folder(s) containing images to process
    #[arg(short, long = "source", value_name = "DIR", required = true, num_args = 1..)]
    pub sources: Vec<PathBuf>,

    /// Number of images processed at once (default: CPU count)
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable image preprocessing (use original image for OCR)
    #[arg(long)]
    pub no_preprocessing: bool,

    /// Write a CSV per folder pairing question text with the answer key
    #[arg(long)]
    pub export_csv: bool,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Extra arguments for the OCR engine, e.g. "--oem 3 --psm 6"
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true)]
    pub tesseract_config: Option<String>,

    /// OCR language
    #[arg(long, value_name = "LANG")]
    pub lang: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Args {
    /// Default log directive when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Configuration file (if any) with command-line flags applied on top.
    pub fn resolve_config(&self) -> Result<PtacConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => PtacConfig::load(path)?,
            None => PtacConfig::default(),
        };
        Ok(self.apply_overrides(base))
    }

    pub fn apply_overrides(&self, mut config: PtacConfig) -> PtacConfig {
        if let Some(workers) = self.workers {
            config.workers = Some(workers);
        }
        if self.no_preprocessing {
            config.preprocess = false;
        }
        if let Some(tesseract_config) = &self.tesseract_config {
            config.tesseract_config = tesseract_config.clone();
        }
        if let Some(lang) = &self.lang {
            config.lang = lang.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("ptac").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn source_is_required() {
        assert!(Args::try_parse_from(["ptac"]).is_err());
        assert!(Args::try_parse_from(["ptac", "--workers", "2"]).is_err());
    }

    #[test]
    fn several_sources_in_one_flag_or_repeated() {
        let args = parse(&["-s", "a", "b"]);
        assert_eq!(args.sources, [PathBuf::from("a"), PathBuf::from("b")]);

        let args = parse(&["--source", "a", "--source", "b"]);
        assert_eq!(args.sources.len(), 2);
    }

    #[test]
    fn defaults() {
        let args = parse(&["-s", "imgs"]);
        assert_eq!(args.workers, None);
        assert!(!args.verbose);
        assert!(!args.no_preprocessing);
        assert!(!args.export_csv);
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.log_level(), "info");
        assert_eq!(args.resolve_config().unwrap(), PtacConfig::default());
    }

    #[test]
    fn flags_override_config() {
        let args = parse(&[
            "-s",
            "imgs",
            "-w",
            "3",
            "-v",
            "--no-preprocessing",
            "--tesseract-config",
            "--oem 1 --psm 6",
            "--lang",
            "deu",
            "--format",
            "json",
        ]);
        assert_eq!(args.log_level(), "debug");
        assert_eq!(args.format, OutputFormat::Json);

        let config = args.apply_overrides(PtacConfig::default());
        assert_eq!(config.workers, Some(3));
        assert!(!config.preprocess);
        assert_eq!(config.tesseract_config, "--oem 1 --psm 6");
        assert_eq!(config.lang, "deu");
    }

    #[test]
    fn config_file_values_survive_when_flags_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ptac.toml");
        std::fs::write(&path, "workers = 5\nlang = \"fra\"\ncsv_file_name = \"out.csv\"\n").unwrap();

        let args = parse(&["-s", "imgs", "-c", path.to_str().unwrap(), "--lang", "ita"]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.workers, Some(5));
        assert_eq!(config.lang, "ita");
        assert_eq!(config.csv_file_name, "out.csv");
        assert!(config.preprocess);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = parse(&["-s", "imgs", "-c", "/nonexistent/ptac.toml"]);
        assert!(matches!(args.resolve_config(), Err(ConfigError::Read { .. })));
    }
}
