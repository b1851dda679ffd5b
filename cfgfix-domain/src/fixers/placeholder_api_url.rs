use super::{Fixer, FixerMeta, is_http_url};
use crate::planner::FixContext;
use crate::ports::Prompter;
use cfgfix_types::document::{ConfigDocument, Environment, FieldPath};
use cfgfix_types::ops::{InputMode, OpKind};
use cfgfix_types::plan::{PlannedFix, RulePlan};
use cfgfix_types::report::FixWarning;
use serde_json::Value;
use tracing::debug;

pub struct PlaceholderApiUrlFixer;

impl PlaceholderApiUrlFixer {
    const FIX_ID: &'static str = "config.placeholder_api_url";
    const DESCRIPTION: &'static str =
        "Replaces a sample api.baseUrl with the real endpoint supplied by the operator";
    const FIELD: &'static str = "api.baseUrl";

    fn is_placeholder(ctx: &FixContext, url: &str) -> bool {
        let url = url.trim().trim_end_matches('/');
        ctx.config
            .placeholder_api_urls
            .iter()
            .any(|p| p.trim().trim_end_matches('/') == url)
    }

    fn warn(message: String) -> RulePlan {
        RulePlan::default().warn(FixWarning::new(
            Self::FIX_ID,
            Some(FieldPath::from(Self::FIELD)),
            message,
        ))
    }
}

impl Fixer for PlaceholderApiUrlFixer {
    fn meta(&self) -> FixerMeta {
        FixerMeta {
            fix_key: "placeholder-api-url",
            fix_id: Self::FIX_ID,
            description: Self::DESCRIPTION,
            input: InputMode::Prompted,
            environments: &[],
        }
    }

    fn plan(
        &self,
        ctx: &FixContext,
        doc: &ConfigDocument,
        prompter: &mut dyn Prompter,
    ) -> anyhow::Result<RulePlan> {
        let field = FieldPath::from(Self::FIELD);
        let Some(current) = doc.get_str(&field) else {
            return Ok(RulePlan::default());
        };
        if !Self::is_placeholder(ctx, current) {
            return Ok(RulePlan::default());
        }

        if !prompter.interactive() {
            return Ok(Self::warn(format!(
                "{field} is still the placeholder '{current}'; prompts disabled, left unchanged"
            )));
        }

        let answer = prompter.ask(&format!(
            "{field} is the placeholder '{current}'. Enter the real API base URL (empty to skip)"
        ))?;
        let Some(answer) = answer.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()) else {
            return Ok(Self::warn(format!(
                "no replacement given; {field} is still the placeholder '{current}'"
            )));
        };

        if !is_http_url(&answer) {
            return Ok(Self::warn(format!(
                "'{answer}' is not a valid http(s) URL; {field} left unchanged"
            )));
        }
        if Self::is_placeholder(ctx, &answer) {
            return Ok(Self::warn(format!(
                "'{answer}' is itself a placeholder; {field} left unchanged"
            )));
        }

        if ctx.environment == Some(Environment::Production) && !answer.starts_with("https://") {
            let accepted = prompter.confirm(
                &format!("'{answer}' is not HTTPS. Use it in production anyway?"),
                false,
            )?;
            if !accepted {
                debug!(url = %answer, "non-HTTPS replacement declined");
                return Ok(Self::warn(format!(
                    "non-HTTPS URL '{answer}' rejected for production; {field} left unchanged"
                )));
            }
        }

        Ok(RulePlan::default().fix(PlannedFix {
            fix_id: Self::FIX_ID.to_string(),
            field: field.clone(),
            from: Value::String(current.to_string()),
            reason: "replaced placeholder API URL".to_string(),
            op: OpKind::JsonSet {
                json_path: field,
                value: Value::String(answer),
            },
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixers::testing::{ctx_for, doc, plan_unattended, set_value};
    use crate::ports::ScriptedPrompter;
    use serde_json::json;

    fn placeholder_doc(env: &str) -> ConfigDocument {
        doc(json!({
            "platform": {"environment": env},
            "api": {"baseUrl": "https://api.example.com/", "timeout": 5000}
        }))
    }

    fn plan_with(d: &ConfigDocument, answers: &[&str]) -> (RulePlan, ScriptedPrompter) {
        let mut prompter = ScriptedPrompter::new(answers.iter().copied());
        let plan = PlaceholderApiUrlFixer
            .plan(&ctx_for(d), d, &mut prompter)
            .unwrap();
        (plan, prompter)
    }

    #[test]
    fn real_urls_are_left_alone() {
        let d = doc(json!({"api": {"baseUrl": "https://api.acme.io"}}));
        let (plan, prompter) = plan_with(&d, &[]);
        assert!(plan.is_empty());
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn unattended_runs_warn_instead_of_guessing() {
        let plan = plan_unattended(&PlaceholderApiUrlFixer, &placeholder_doc("staging"));
        assert!(plan.fixes.is_empty());
        assert_eq!(plan.warnings.len(), 1);
        assert!(plan.warnings[0].message.contains("prompts disabled"));
    }

    #[test]
    fn replaces_placeholder_with_operator_answer() {
        let (plan, _) = plan_with(&placeholder_doc("staging"), &["  https://api.acme.io  "]);
        assert_eq!(plan.fixes.len(), 1);
        assert_eq!(plan.fixes[0].from, json!("https://api.example.com/"));
        assert_eq!(set_value(&plan.fixes[0]), &json!("https://api.acme.io"));
    }

    #[test]
    fn empty_answer_skips() {
        let (plan, _) = plan_with(&placeholder_doc("staging"), &[""]);
        assert!(plan.fixes.is_empty());
        assert!(plan.warnings[0].message.contains("no replacement"));
    }

    #[test]
    fn rejects_answers_that_are_not_urls() {
        let (plan, _) = plan_with(&placeholder_doc("staging"), &["api.acme.io"]);
        assert!(plan.fixes.is_empty());
        assert!(plan.warnings[0].message.contains("not a valid"));
    }

    #[test]
    fn answering_with_another_placeholder_changes_nothing() {
        let (plan, _) = plan_with(&placeholder_doc("staging"), &["https://api.example.com"]);
        assert!(plan.fixes.is_empty());
        assert!(plan.warnings[0].message.contains("itself a placeholder"));
    }

    #[test]
    fn plain_http_in_production_needs_confirmation() {
        let (plan, prompter) =
            plan_with(&placeholder_doc("production"), &["http://api.acme.io", "n"]);
        assert!(plan.fixes.is_empty());
        assert!(plan.warnings[0].message.contains("rejected for production"));
        assert_eq!(prompter.asked.len(), 2);

        let (plan, _) =
            plan_with(&placeholder_doc("production"), &["http://api.acme.io", "yes"]);
        assert_eq!(plan.fixes.len(), 1);
    }

    #[test]
    fn plain_http_outside_production_is_not_questioned() {
        let (plan, prompter) =
            plan_with(&placeholder_doc("development"), &["http://localhost:8080"]);
        assert_eq!(plan.fixes.len(), 1);
        assert_eq!(prompter.asked.len(), 1);
    }
}
