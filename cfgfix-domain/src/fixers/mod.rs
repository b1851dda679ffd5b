use crate::planner::FixContext;
use crate::ports::Prompter;
use cfgfix_types::document::{ConfigDocument, Environment, FieldPath};
use cfgfix_types::ops::{InputMode, OpKind};
use cfgfix_types::plan::{PlannedFix, RulePlan};
use serde_json::Value;

mod cors_origins;
mod development_logging;
mod log_directory;
mod performance;
mod placeholder_api_url;
mod production_hardening;

/// Static description of a fix rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixerMeta {
    /// Short user-facing key, e.g. `production-hardening`.
    pub fix_key: &'static str,
    /// Stable id recorded on every fix, e.g. `config.production_hardening`.
    pub fix_id: &'static str,
    pub description: &'static str,
    pub input: InputMode,
    /// Environments the rule applies to; empty means all.
    pub environments: &'static [Environment],
}

pub trait Fixer {
    fn meta(&self) -> FixerMeta;

    fn plan(
        &self,
        ctx: &FixContext,
        doc: &ConfigDocument,
        prompter: &mut dyn Prompter,
    ) -> anyhow::Result<RulePlan>;
}

/// Built-in rules, in the order they run.
pub fn builtin_fixers() -> Vec<Box<dyn Fixer>> {
    vec![
        Box::new(placeholder_api_url::PlaceholderApiUrlFixer),
        Box::new(cors_origins::CorsOriginsFixer),
        Box::new(development_logging::DevelopmentLoggingFixer),
        Box::new(production_hardening::ProductionHardeningFixer),
        Box::new(performance::PerformanceFixer),
        Box::new(log_directory::LogDirectoryFixer),
    ]
}

pub fn builtin_fixer_metas() -> Vec<FixerMeta> {
    builtin_fixers().iter().map(|f| f.meta()).collect()
}

/// Plan `path = target` unless the document already holds exactly `target`.
fn force_value(
    fix_id: &str,
    doc: &ConfigDocument,
    path: &str,
    target: Value,
    reason: &str,
) -> Option<PlannedFix> {
    let field = FieldPath::from(path);
    let current = doc.get(&field);
    if current == Some(&target) {
        return None;
    }
    Some(PlannedFix {
        fix_id: fix_id.to_string(),
        from: current.cloned().unwrap_or(Value::Null),
        reason: reason.to_string(),
        op: OpKind::JsonSet {
            json_path: field.clone(),
            value: target,
        },
        field,
    })
}

/// Whether `s` parses as an absolute http(s) URL with a host.
fn is_http_url(s: &str) -> bool {
    match url::Url::parse(s) {
        Ok(u) => matches!(u.scheme(), "http" | "https") && u.host_str().is_some(),
        Err(_) => false,
    }
}
