use super::{Fixer, FixerMeta, force_value};
use crate::planner::FixContext;
use crate::ports::Prompter;
use cfgfix_types::document::{ConfigDocument, FieldPath};
use cfgfix_types::ops::InputMode;
use cfgfix_types::plan::RulePlan;
use serde_json::Value;

pub struct PerformanceFixer;

impl PerformanceFixer {
    const FIX_ID: &'static str = "config.performance";
    const DESCRIPTION: &'static str =
        "Re-enables response caching and compression that were explicitly switched off";
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("performance.caching.enabled", "caching was disabled"),
        ("performance.compression.enabled", "compression was disabled"),
    ];
}

impl Fixer for PerformanceFixer {
    fn meta(&self) -> FixerMeta {
        FixerMeta {
            fix_key: "performance",
            fix_id: Self::FIX_ID,
            description: Self::DESCRIPTION,
            input: InputMode::Automatic,
            environments: &[],
        }
    }

    fn plan(
        &self,
        _ctx: &FixContext,
        doc: &ConfigDocument,
        _prompter: &mut dyn Prompter,
    ) -> anyhow::Result<RulePlan> {
        // Only an explicit `false` counts; absent means "use the default".
        let fixes = Self::FIELDS
            .iter()
            .filter(|(path, _)| doc.get_bool(&FieldPath::from(*path)) == Some(false))
            .filter_map(|(path, reason)| {
                force_value(Self::FIX_ID, doc, path, Value::Bool(true), reason)
            })
            .collect();
        Ok(RulePlan {
            fixes,
            warnings: vec![],
        })
    }
}
