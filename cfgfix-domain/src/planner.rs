use crate::fixers::{self, Fixer};
use crate::ports::Prompter;
use anyhow::Context;
use camino::Utf8PathBuf;
use cfgfix_types::document::{ConfigDocument, Environment};
use cfgfix_types::plan::RulePlan;
use cfgfix_types::report::FixWarning;
use tracing::debug;

/// Sample API URLs shipped in templates that must not reach a real deployment.
pub const DEFAULT_PLACEHOLDER_API_URLS: &[&str] = &["https://api.example.com"];

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Values of `api.baseUrl` treated as placeholders.
    pub placeholder_api_urls: Vec<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            placeholder_api_urls: DEFAULT_PLACEHOLDER_API_URLS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FixContext {
    /// Environment declared by the document, if recognised.
    pub environment: Option<Environment>,

    /// Directory containing the document; relative paths resolve against it.
    pub document_dir: Utf8PathBuf,

    pub config: PlannerConfig,
}

impl FixContext {
    pub fn for_document(
        doc: &ConfigDocument,
        document_dir: Utf8PathBuf,
        config: PlannerConfig,
    ) -> Self {
        Self {
            environment: doc.environment(),
            document_dir,
            config,
        }
    }
}

/// Runs the fix rules in their fixed order.
pub struct Planner {
    fixers: Vec<Box<dyn Fixer>>,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

impl Planner {
    pub fn new() -> Self {
        Self {
            fixers: fixers::builtin_fixers(),
        }
    }

    pub fn fixers(&self) -> &[Box<dyn Fixer>] {
        &self.fixers
    }

    /// Plan one rule against the document as it stands now.
    ///
    /// Environment-scoped rules are skipped when the document's environment
    /// is outside their scope. When the environment is unknown they are
    /// skipped with [`unknown_environment_warning`], identical for every
    /// rule so callers can record it once.
    pub fn plan_rule(
        &self,
        fixer: &dyn Fixer,
        ctx: &FixContext,
        doc: &ConfigDocument,
        prompter: &mut dyn Prompter,
    ) -> anyhow::Result<RulePlan> {
        let meta = fixer.meta();
        if !meta.environments.is_empty() {
            match ctx.environment {
                None => {
                    debug!(fix = meta.fix_key, "environment unknown, rule skipped");
                    return Ok(RulePlan::default().warn(unknown_environment_warning()));
                }
                Some(env) if !meta.environments.contains(&env) => {
                    debug!(fix = meta.fix_key, environment = %env, "rule not in scope");
                    return Ok(RulePlan::default());
                }
                Some(_) => {}
            }
        }

        fixer
            .plan(ctx, doc, prompter)
            .with_context(|| format!("rule {}", meta.fix_key))
    }
}

pub fn unknown_environment_warning() -> FixWarning {
    FixWarning::new(
        "config.environment",
        Some("platform.environment".into()),
        "platform.environment is missing or unrecognised; environment-specific rules skipped",
    )
}
