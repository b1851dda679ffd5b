//! Fix explanations for the `cfgfix explain` command.
//!
//! Input mode and environment scope come from the rule's own metadata
//! ([`cfgfix_domain::FixerMeta`]); this module adds the prose: what the fix
//! does, why, and how to make the same change by hand.

use cfgfix_domain::{FixerMeta, builtin_fixer_metas};
use cfgfix_types::ops::InputMode;

/// Information about a cfgfix rule.
#[derive(Debug, Clone)]
pub struct FixExplanation {
    /// Short key for the fix (user-facing, e.g., "production-hardening").
    pub key: &'static str,
    /// Fix ID recorded in reports (e.g., "config.production_hardening").
    pub fix_id: &'static str,
    pub title: &'static str,
    /// Detailed description of what the fix does.
    pub description: &'static str,
    /// Why the rule exists.
    pub rationale: &'static str,
    /// How to apply the change manually.
    pub remediation: &'static str,
    /// Document fields the rule reads or writes.
    pub fields: &'static [&'static str],
}

/// Registry of all available fix explanations, in rule order.
pub static FIX_REGISTRY: &[FixExplanation] = &[
    FixExplanation {
        key: "placeholder-api-url",
        fix_id: "config.placeholder_api_url",
        title: "Replace Placeholder API URL",
        description: r#"Detects an `api.baseUrl` that is still one of the sample URLs shipped
in templates (by default `https://api.example.com`, configurable under
`[placeholders] api_urls` in cfgfix.toml) and asks for the real endpoint.

The answer must be an absolute http(s) URL. An empty answer skips the rule.
In production, a plain `http://` answer has to be confirmed separately."#,
        rationale: r#"A placeholder base URL passes every shape check, so nothing else catches
it before deployment. Only the operator knows the correct endpoint, which is
why this rule asks instead of guessing."#,
        remediation: r#"Edit the document and set the real endpoint:

    "api": {
      "baseUrl": "https://api.your-domain.io"
    }

In non-interactive runs the placeholder is left in place and reported as a
warning."#,
        fields: &["api.baseUrl"],
    },
    FixExplanation {
        key: "cors-origins",
        fix_id: "config.cors_origins",
        title: "Explicit CORS Origins In Production",
        description: r#"When `security.corsEnabled` is true in production and
`security.allowedOrigins` contains `"*"`, asks for a comma-separated list of
allowed origins and replaces the wildcard with it.

Every entry must be an http(s) URL. If any entry is not, the whole list is
rejected and the wildcard stays."#,
        rationale: r#"A wildcard origin lets any site make credentialed browser requests
against the API. That is acceptable while developing and never in production."#,
        remediation: r#"List the origins that really need access:

    "security": {
      "corsEnabled": true,
      "allowedOrigins": ["https://app.your-domain.io"]
    }"#,
        fields: &["security.corsEnabled", "security.allowedOrigins"],
    },
    FixExplanation {
        key: "development-logging",
        fix_id: "config.development_logging",
        title: "Verbose Logging In Development",
        description: r#"Sets `database.enableLogging` to `true` and `logging.level` to
`"debug"` in development documents."#,
        rationale: r#"Development environments are where query logs and debug output are
useful, and where they cost nothing."#,
        remediation: r#"    "database": { "enableLogging": true },
    "logging": { "level": "debug" }"#,
        fields: &["database.enableLogging", "logging.level"],
    },
    FixExplanation {
        key: "production-hardening",
        fix_id: "config.production_hardening",
        title: "Production Hardening",
        description: r#"Sets `security.enableSSL` and `security.enableHSTS` to `true` and
`database.enableLogging` to `false` in production documents."#,
        rationale: r#"Production traffic must be encrypted and pinned to HTTPS. Database
query logs in production leak data into log storage and slow queries down."#,
        remediation: r#"    "security": { "enableSSL": true, "enableHSTS": true },
    "database": { "enableLogging": false }"#,
        fields: &[
            "security.enableSSL",
            "security.enableHSTS",
            "database.enableLogging",
        ],
    },
    FixExplanation {
        key: "performance",
        fix_id: "config.performance",
        title: "Re-enable Caching And Compression",
        description: r#"Sets `performance.caching.enabled` and
`performance.compression.enabled` back to `true` when either is explicitly
`false`. Absent values are left alone."#,
        rationale: r#"Switching caching or compression off is almost always a leftover from
debugging. An absent value means "use the platform default", which is on."#,
        remediation: r#"    "performance": {
      "caching": { "enabled": true },
      "compression": { "enabled": true }
    }"#,
        fields: &["performance.caching.enabled", "performance.compression.enabled"],
    },
    FixExplanation {
        key: "log-directory",
        fix_id: "config.log_directory",
        title: "Create Log Directory",
        description: r#"Creates the directory named by `logging.logDirectory` when it does
not exist. Relative paths resolve against the directory holding the
document. The document itself is not changed."#,
        rationale: r#"A service that cannot open its log directory usually fails at
startup, long after the configuration was accepted."#,
        remediation: r#"Create the directory yourself, for example:

    mkdir -p config/logs

If a file already occupies the path, the rule only reports it."#,
        fields: &["logging.logDirectory"],
    },
];

/// Look up an explanation by key or fix id.
pub fn lookup_fix(query: &str) -> Option<&'static FixExplanation> {
    let query_lower = query.to_lowercase();
    let query_normalized = query_lower.replace('_', "-");

    FIX_REGISTRY.iter().find(|fix| {
        fix.key == query_normalized
            || fix.fix_id == query_lower
            // Suffix of the fix id, e.g. "production_hardening".
            || fix.fix_id.ends_with(&format!(".{query_lower}"))
    })
}

/// List all available fix keys.
pub fn list_fix_keys() -> Vec<&'static str> {
    FIX_REGISTRY.iter().map(|f| f.key).collect()
}

/// Metadata of the built-in rule behind an explanation.
pub fn meta_for(fix: &FixExplanation) -> Option<FixerMeta> {
    builtin_fixer_metas()
        .into_iter()
        .find(|m| m.fix_key == fix.key)
}

pub fn format_input_mode(input: InputMode) -> &'static str {
    match input {
        InputMode::Automatic => "Automatic",
        InputMode::Prompted => "Prompted",
    }
}

pub fn input_mode_meaning(input: InputMode) -> &'static str {
    match input {
        InputMode::Automatic => {
            "AUTOMATIC fixes are fully determined by the document and its environment.\n\
             They run in every mode, including `--no-interactive`."
        }
        InputMode::Prompted => {
            "PROMPTED fixes need a value only the operator knows.\n\
             With `--no-interactive` they leave the document unchanged and record a warning."
        }
    }
}

/// Environments the rule applies to, for display.
pub fn format_scope(meta: &FixerMeta) -> String {
    if meta.environments.is_empty() {
        return "all environments".to_string();
    }
    meta.environments
        .iter()
        .map(|e| e.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
