//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/dance-draw/dance-draw.toml`
//! 3. Explicit config: file passed with `--config`
//! 4. Environment variables: `DANCE_DRAW__*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{expand_env_vars, DrawOrder, SeedStrategy};

/// Sampling behaviour.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DrawConfig {
    /// Listing order of drawn items
    pub order: DrawOrder,
    /// Seed derivation when no seed is forced
    pub seed_strategy: SeedStrategy,
}

/// Output file settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    /// File name prefix for report and record
    pub file_prefix: String,
    /// Write the JSON reproducibility record next to the report
    pub write_record: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_prefix: "dance_draw".into(),
            write_record: true,
        }
    }
}

/// Report content settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
    /// Heading placed before the competition name
    pub heading: String,
    /// Image shown at the top of the report
    pub logo: Option<String>,
    /// Link to the tool's source, shown in the technical details
    pub source_url: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            heading: "Drawn dances for".into(),
            logo: None,
            source_url: None,
        }
    }
}

/// Raw sections for intermediate parsing (every field optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDrawConfig {
    pub order: Option<DrawOrder>,
    pub seed_strategy: Option<SeedStrategy>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawOutputConfig {
    pub file_prefix: Option<String>,
    pub write_record: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawReportConfig {
    pub heading: Option<String>,
    pub logo: Option<String>,
    pub source_url: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub draw: RawDrawConfig,
    pub output: RawOutputConfig,
    pub report: RawReportConfig,
}

/// Unified configuration for dance-draw.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub draw: DrawConfig,
    pub output: OutputConfig,
    pub report: ReportConfig,
}

/// Get the XDG config directory for dance-draw.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dance-draw").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("dance-draw.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins for every field it specifies.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            draw: DrawConfig {
                order: overlay.draw.order.unwrap_or(self.draw.order),
                seed_strategy: overlay
                    .draw
                    .seed_strategy
                    .unwrap_or(self.draw.seed_strategy),
            },
            output: OutputConfig {
                file_prefix: overlay
                    .output
                    .file_prefix
                    .clone()
                    .unwrap_or_else(|| self.output.file_prefix.clone()),
                write_record: overlay
                    .output
                    .write_record
                    .unwrap_or(self.output.write_record),
            },
            report: ReportConfig {
                heading: overlay
                    .report
                    .heading
                    .clone()
                    .unwrap_or_else(|| self.report.heading.clone()),
                logo: overlay
                    .report
                    .logo
                    .clone()
                    .or_else(|| self.report.logo.clone()),
                source_url: overlay
                    .report
                    .source_url
                    .clone()
                    .or_else(|| self.report.source_url.clone()),
            },
        }
    }

    /// Expand `~`, `$VAR` and `${VAR}` in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(logo) = &self.report.logo {
            self.report.logo = Some(expand_env_vars(logo));
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; it must exist
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config, if present
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit config file
        if let Some(path) = explicit {
            let path = PathBuf::from(expand_env_vars(&path.to_string_lossy()));
            let raw = load_raw_settings(&path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply DANCE_DRAW__* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("DANCE_DRAW").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("draw.order") {
            settings.draw.order = parse_order(&val)?;
        }
        if let Ok(val) = config.get_string("draw.seed_strategy") {
            settings.draw.seed_strategy = parse_strategy(&val)?;
        }
        if let Ok(val) = config.get_string("output.file_prefix") {
            settings.output.file_prefix = val;
        }
        if let Ok(val) = config.get_bool("output.write_record") {
            settings.output.write_record = val;
        }
        if let Ok(val) = config.get_string("report.heading") {
            settings.report.heading = val;
        }
        if let Ok(val) = config.get_string("report.logo") {
            settings.report.logo = Some(val);
        }
        if let Ok(val) = config.get_string("report.source_url") {
            settings.report.source_url = Some(val);
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# dance-draw configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/dance-draw/dance-draw.toml
#   Explicit: file passed with --config
#   Env:      DANCE_DRAW__<SECTION>__<KEY> environment variables

[draw]
# Listing order of drawn dances: "selection" (draw order) or "original" (list order)
# order = "selection"

# Seed derivation without --force-seed: "timestamp" or "entropy"
# seed_strategy = "timestamp"

[output]
# File name prefix: <prefix>_<Competition_Name>_seed_<seed>.md
# file_prefix = "dance_draw"

# Write the JSON reproducibility record next to the report
# write_record = true

[report]
# heading = "Drawn dances for"
# logo = "~/assets/logo.png"
# source_url = "https://github.com/rghs/bis-dance-draw"
"#
        .to_string()
    }
}

fn parse_order(val: &str) -> Result<DrawOrder, ApplicationError> {
    match val.to_ascii_lowercase().as_str() {
        "selection" => Ok(DrawOrder::Selection),
        "original" => Ok(DrawOrder::Original),
        other => Err(ApplicationError::Config {
            message: format!("invalid draw.order '{other}': expected selection or original"),
        }),
    }
}

fn parse_strategy(val: &str) -> Result<SeedStrategy, ApplicationError> {
    match val.to_ascii_lowercase().as_str() {
        "timestamp" => Ok(SeedStrategy::Timestamp),
        "entropy" => Ok(SeedStrategy::Entropy),
        other => Err(ApplicationError::Config {
            message: format!("invalid draw.seed_strategy '{other}': expected timestamp or entropy"),
        }),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
