use std::fs;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;

use crate::Args;

/// Allowed extension input: ASCII letters and digits, at most 10 characters.
static EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]{1,10}$").expect("Invalid extension regex"));

/// Final config combined from CLI arguments and the user config file.
#[derive(Debug)]
pub struct Config {
    pub(crate) reference_ext: String,
    pub(crate) target_ext: String,
    pub(crate) dryrun: bool,
    pub(crate) verbose: bool,
}

/// Config from the user config file.
#[derive(Debug, Default, Deserialize)]
struct PickerConfig {
    #[serde(default)]
    reference_ext: Option<String>,
    #[serde(default)]
    target_ext: Option<String>,
    #[serde(default)]
    dryrun: bool,
    #[serde(default)]
    verbose: bool,
}

/// Wrapper needed for parsing the user config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    picker: PickerConfig,
}

impl PickerConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be read or parsed.
    fn get_user_config() -> Result<Self> {
        let Some(path) = file_picker::config::config_path() else {
            return Ok(Self::default());
        };

        match fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse config file {}:\n{e}", path.display())),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {error}",
                path.display()
            )),
        }
    }

    /// Parse config from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.picker)
            .context("Failed to parse picker config TOML")
    }
}

impl Config {
    /// Create config from given command line args and user config file.
    ///
    /// CLI arguments take priority over config file values.
    ///
    /// # Errors
    /// Returns an error if the config file cannot be read or parsed,
    /// or if either extension is missing or invalid.
    pub fn from_args(args: Args) -> Result<Self> {
        let user_config = PickerConfig::get_user_config()?;

        let reference_ext = args
            .reference_ext
            .or(user_config.reference_ext)
            .context("Reference file extension must be given with --reference-ext or in the config file")?;
        let target_ext = args
            .target_ext
            .or(user_config.target_ext)
            .context("Target file extension must be given with --target-ext or in the config file")?;

        Ok(Self {
            reference_ext: validate_extension(&reference_ext)?,
            target_ext: validate_extension(&target_ext)?,
            dryrun: args.print || user_config.dryrun,
            verbose: args.verbose || user_config.verbose,
        })
    }
}

/// Validate raw extension input and return it lowercased.
///
/// A leading dot is tolerated so both `srt` and `.srt` work.
///
/// # Errors
/// Returns an error unless the input is 1-10 ASCII letters or digits.
fn validate_extension(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_start_matches('.');
    if EXTENSION_RE.is_match(trimmed) {
        Ok(trimmed.to_lowercase())
    } else {
        anyhow::bail!("Invalid file extension '{raw}': use 1 to 10 ASCII letters or digits")
    }
}
