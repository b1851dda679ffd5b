use super::{Fixer, FixerMeta, is_http_url};
use crate::planner::FixContext;
use crate::ports::Prompter;
use cfgfix_types::document::{ConfigDocument, Environment, FieldPath};
use cfgfix_types::ops::{InputMode, OpKind};
use cfgfix_types::plan::{PlannedFix, RulePlan};
use cfgfix_types::report::FixWarning;
use serde_json::Value;

pub struct CorsOriginsFixer;

impl CorsOriginsFixer {
    const FIX_ID: &'static str = "config.cors_origins";
    const DESCRIPTION: &'static str =
        "Replaces a wildcard CORS origin in production with an explicit origin list";
    const FIELD: &'static str = "security.allowedOrigins";

    fn has_wildcard(origins: &Value) -> bool {
        match origins {
            Value::String(s) => s.trim() == "*",
            Value::Array(items) => items.iter().any(|v| v.as_str().map(str::trim) == Some("*")),
            _ => false,
        }
    }

    fn warn(message: String) -> RulePlan {
        RulePlan::default().warn(FixWarning::new(
            Self::FIX_ID,
            Some(FieldPath::from(Self::FIELD)),
            message,
        ))
    }
}

impl Fixer for CorsOriginsFixer {
    fn meta(&self) -> FixerMeta {
        FixerMeta {
            fix_key: "cors-origins",
            fix_id: Self::FIX_ID,
            description: Self::DESCRIPTION,
            input: InputMode::Prompted,
            environments: &[Environment::Production],
        }
    }

    fn plan(
        &self,
        _ctx: &FixContext,
        doc: &ConfigDocument,
        prompter: &mut dyn Prompter,
    ) -> anyhow::Result<RulePlan> {
        if doc.get_bool(&"security.corsEnabled".into()) != Some(true) {
            return Ok(RulePlan::default());
        }
        let field = FieldPath::from(Self::FIELD);
        let Some(current) = doc.get(&field) else {
            return Ok(RulePlan::default());
        };
        if !Self::has_wildcard(current) {
            return Ok(RulePlan::default());
        }

        if !prompter.interactive() {
            return Ok(Self::warn(format!(
                "{field} allows '*' in production; prompts disabled, left unchanged"
            )));
        }

        let answer = prompter.ask(
            "CORS allows any origin ('*') in production. \
             Enter allowed origins, comma-separated (empty to skip)",
        )?;
        let origins: Vec<String> = answer
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if origins.is_empty() {
            return Ok(Self::warn(format!(
                "no origins given; {field} still allows '*' in production"
            )));
        }

        let invalid: Vec<&str> = origins
            .iter()
            .map(String::as_str)
            .filter(|o| !is_http_url(o))
            .collect();
        if !invalid.is_empty() {
            return Ok(Self::warn(format!(
                "rejected origin list, not http(s) URLs: {}; {field} still allows '*'",
                invalid.join(", ")
            )));
        }

        Ok(RulePlan::default().fix(PlannedFix {
            fix_id: Self::FIX_ID.to_string(),
            field: field.clone(),
            from: current.clone(),
            reason: "replaced wildcard CORS origin for production".to_string(),
            op: OpKind::JsonSet {
                json_path: field,
                value: Value::Array(origins.into_iter().map(Value::String).collect()),
            },
        }))
    }
}
