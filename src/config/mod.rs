pub mod toml_config;

use crate::core::ConfigProvider;
use crate::domain::ports::RecordFormat;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};

#[cfg(feature = "cli")]
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "small-library")]
#[command(about = "Interactive catalog of books, borrowers and loans")]
pub struct CliConfig {
    /// Directory holding the catalog files [default: .]
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Record format: legacy (books.txt, ...) or csv (books.csv, ...) [default: legacy]
    #[arg(long)]
    pub format: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON on stderr")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Merges the TOML file, if any, under the explicit command-line flags.
    pub fn resolve(&self) -> Result<Settings> {
        validation::validate_existing_file("config", self.config.as_deref())?;
        let file = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        file.validate()?;

        let format = match &self.format {
            Some(format) => {
                validation::validate_non_empty_string("format", format)?;
                format.parse()?
            }
            None => file.record_format(),
        };

        Ok(Settings {
            data_dir: self
                .data_dir
                .clone()
                .unwrap_or_else(|| file.data_dir().to_string()),
            format,
            verbose: self.verbose || file.verbose(),
            log_json: self.log_json || file.json_logs(),
        })
    }
}

/// Effective configuration of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: String,
    pub format: RecordFormat,
    pub verbose: bool,
    pub log_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: ".".to_string(),
            format: RecordFormat::Legacy,
            verbose: false,
            log_json: false,
        }
    }
}

impl ConfigProvider for Settings {
    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn record_format(&self) -> RecordFormat {
        self.format
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("data_dir", &self.data_dir)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::parse_from(std::iter::once("small-library").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_without_flags() {
        let settings = parse(&[]).resolve().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_flags_override_toml() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[storage]\ndata_dir = \"/from/toml\"\nformat = \"csv\"\n")
            .unwrap();
        let path = file.path().to_str().unwrap();

        let settings = parse(&["--config", path]).resolve().unwrap();
        assert_eq!(settings.data_dir, "/from/toml");
        assert_eq!(settings.format, RecordFormat::Csv);

        let settings = parse(&["--config", path, "--format", "legacy", "--data-dir", "here"])
            .resolve()
            .unwrap();
        assert_eq!(settings.data_dir, "here");
        assert_eq!(settings.format, RecordFormat::Legacy);
    }

    #[test]
    fn test_missing_config_file_is_rejected() {
        assert!(parse(&["--config", "/no/such/library.toml"]).resolve().is_err());
    }

    #[test]
    fn test_invalid_format_flag() {
        assert!(parse(&["--format", "yaml"]).resolve().is_err());
        assert!(parse(&["--data-dir", ""]).resolve().unwrap().validate().is_err());
    }
}
