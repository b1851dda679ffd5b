use super::{Fixer, FixerMeta, force_value};
use crate::planner::FixContext;
use crate::ports::Prompter;
use cfgfix_types::document::{ConfigDocument, Environment};
use cfgfix_types::ops::InputMode;
use cfgfix_types::plan::RulePlan;
use serde_json::Value;

pub struct ProductionHardeningFixer;

impl ProductionHardeningFixer {
    const FIX_ID: &'static str = "config.production_hardening";
    const DESCRIPTION: &'static str =
        "Requires SSL and HSTS and disables database query logging in production";

    const RULES: &'static [(&'static str, bool, &'static str)] = &[
        ("security.enableSSL", true, "production traffic must use SSL"),
        ("security.enableHSTS", true, "production responses must send HSTS"),
        (
            "database.enableLogging",
            false,
            "production databases must not log queries",
        ),
    ];
}

impl Fixer for ProductionHardeningFixer {
    fn meta(&self) -> FixerMeta {
        FixerMeta {
            fix_key: "production-hardening",
            fix_id: Self::FIX_ID,
            description: Self::DESCRIPTION,
            input: InputMode::Automatic,
            environments: &[Environment::Production],
        }
    }

    fn plan(
        &self,
        _ctx: &FixContext,
        doc: &ConfigDocument,
        _prompter: &mut dyn Prompter,
    ) -> anyhow::Result<RulePlan> {
        let fixes = Self::RULES
            .iter()
            .filter_map(|(path, target, reason)| {
                force_value(Self::FIX_ID, doc, path, Value::Bool(*target), reason)
            })
            .collect();
        Ok(RulePlan {
            fixes,
            warnings: vec![],
        })
    }
}
