//! Clap-free settings for the fix and check pipelines.

use camino::Utf8PathBuf;
use cfgfix_domain::{DEFAULT_PLACEHOLDER_API_URLS, PlannerConfig};

pub const DEFAULT_DOCUMENT_PATH: &str = "config/platform.json";
pub const DEFAULT_BACKUP_SUFFIX: &str = ".cfgfix.bak";

/// Settings for the fix pipeline.
#[derive(Debug, Clone)]
pub struct FixSettings {
    pub document: Utf8PathBuf,

    /// Report what would change without writing anything.
    pub dry_run: bool,

    // Rules
    pub placeholder_api_urls: Vec<String>,

    // Backups
    pub backup_enabled: bool,
    pub backup_suffix: String,
}

impl Default for FixSettings {
    fn default() -> Self {
        Self {
            document: Utf8PathBuf::from(DEFAULT_DOCUMENT_PATH),
            dry_run: false,
            placeholder_api_urls: DEFAULT_PLACEHOLDER_API_URLS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            backup_enabled: true,
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
        }
    }
}

impl FixSettings {
    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            placeholder_api_urls: self.placeholder_api_urls.clone(),
        }
    }

    pub fn backup_suffix(&self) -> Option<String> {
        self.backup_enabled.then(|| self.backup_suffix.clone())
    }
}

/// Settings for validate → fix → validate.
#[derive(Debug, Clone, Default)]
pub struct CheckSettings {
    pub fix: FixSettings,

    /// Stop after the first validation.
    pub validate_only: bool,
}
