//! Configuration file loading for cfgfix.
//!
//! Discovers and loads `cfgfix.toml` from the working directory.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use cfgfix_core::settings::{
    CheckSettings, DEFAULT_BACKUP_SUFFIX, DEFAULT_DOCUMENT_PATH, FixSettings,
};
use cfgfix_domain::DEFAULT_PLACEHOLDER_API_URLS;
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "cfgfix.toml";

/// Top-level configuration from cfgfix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CfgfixConfig {
    pub document: DocumentConfig,
    pub prompts: PromptsConfig,
    pub placeholders: PlaceholdersConfig,
    pub backups: BackupsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Path of the JSON document to validate and fix.
    pub path: Utf8PathBuf,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            path: Utf8PathBuf::from(DEFAULT_DOCUMENT_PATH),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Ask the operator for values rules cannot derive.
    pub interactive: bool,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self { interactive: true }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaceholdersConfig {
    /// Sample values of `api.baseUrl` that must be replaced.
    pub api_urls: Vec<String>,
}

impl Default for PlaceholdersConfig {
    fn default() -> Self {
        Self {
            api_urls: DEFAULT_PLACEHOLDER_API_URLS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Backups section of the config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackupsConfig {
    /// Whether to copy the document aside before overwriting it.
    pub enabled: bool,

    /// Suffix for backup files.
    pub suffix: String,
}

impl Default for BackupsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}

/// Discover the cfgfix.toml config file in `dir`.
///
/// Returns `None` if no config file is found.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a cfgfix.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<CfgfixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<CfgfixConfig> {
    let config: CfgfixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from `dir`, or return the default if there is none.
pub fn load_or_default(dir: &Utf8Path) -> anyhow::Result<CfgfixConfig> {
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(CfgfixConfig::default()),
    }
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub document: Utf8PathBuf,
    pub interactive: bool,
    pub dry_run: bool,
    pub placeholder_api_urls: Vec<String>,
    pub backups: BackupsConfig,
}

impl MergedConfig {
    pub fn fix_settings(&self) -> FixSettings {
        FixSettings {
            document: self.document.clone(),
            dry_run: self.dry_run,
            placeholder_api_urls: self.placeholder_api_urls.clone(),
            backup_enabled: self.backups.enabled,
            backup_suffix: self.backups.suffix.clone(),
        }
    }

    pub fn check_settings(&self, validate_only: bool) -> CheckSettings {
        CheckSettings {
            fix: self.fix_settings(),
            validate_only,
        }
    }
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: CfgfixConfig,
}

impl ConfigMerger {
    pub fn new(config: CfgfixConfig) -> Self {
        Self { config }
    }

    /// Merge with the global CLI arguments.
    ///
    /// `--config` replaces the document path; `--no-interactive` and
    /// `--dry-run` can only switch behaviour off/on, never back.
    pub fn merge_cli_args(
        self,
        cli_document: Option<&Utf8Path>,
        no_interactive: bool,
        dry_run: bool,
    ) -> MergedConfig {
        let document = cli_document
            .map(Utf8Path::to_path_buf)
            .unwrap_or(self.config.document.path);

        MergedConfig {
            document,
            interactive: self.config.prompts.interactive && !no_interactive,
            dry_run,
            placeholder_api_urls: self.config.placeholders.api_urls,
            backups: self.config.backups,
        }
    }
}
