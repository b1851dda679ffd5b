use super::{Fixer, FixerMeta, force_value};
use crate::planner::FixContext;
use crate::ports::Prompter;
use cfgfix_types::document::{ConfigDocument, Environment, LogLevel};
use cfgfix_types::ops::InputMode;
use cfgfix_types::plan::RulePlan;
use serde_json::Value;

pub struct DevelopmentLoggingFixer;

impl DevelopmentLoggingFixer {
    const FIX_ID: &'static str = "config.development_logging";
    const DESCRIPTION: &'static str =
        "Turns on database query logging and debug-level logs in development";
}

impl Fixer for DevelopmentLoggingFixer {
    fn meta(&self) -> FixerMeta {
        FixerMeta {
            fix_key: "development-logging",
            fix_id: Self::FIX_ID,
            description: Self::DESCRIPTION,
            input: InputMode::Automatic,
            environments: &[Environment::Development],
        }
    }

    fn plan(
        &self,
        _ctx: &FixContext,
        doc: &ConfigDocument,
        _prompter: &mut dyn Prompter,
    ) -> anyhow::Result<RulePlan> {
        let fixes = [
            force_value(
                Self::FIX_ID,
                doc,
                "database.enableLogging",
                Value::Bool(true),
                "development environments log database queries",
            ),
            force_value(
                Self::FIX_ID,
                doc,
                "logging.level",
                Value::String(LogLevel::Debug.to_string()),
                "development environments log at debug level",
            ),
        ];

        Ok(RulePlan {
            fixes: fixes.into_iter().flatten().collect(),
            warnings: vec![],
        })
    }
}
