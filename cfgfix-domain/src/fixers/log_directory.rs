use super::{Fixer, FixerMeta};
use crate::planner::FixContext;
use crate::ports::Prompter;
use camino::Utf8Path;
use cfgfix_types::document::{ConfigDocument, FieldPath};
use cfgfix_types::ops::{InputMode, OpKind};
use cfgfix_types::plan::{PlannedFix, RulePlan};
use cfgfix_types::report::FixWarning;
use serde_json::Value;

pub struct LogDirectoryFixer;

impl LogDirectoryFixer {
    const FIX_ID: &'static str = "config.log_directory";
    const DESCRIPTION: &'static str =
        "Creates the directory named by logging.logDirectory if it is missing";
    const FIELD: &'static str = "logging.logDirectory";
}

impl Fixer for LogDirectoryFixer {
    fn meta(&self) -> FixerMeta {
        FixerMeta {
            fix_key: "log-directory",
            fix_id: Self::FIX_ID,
            description: Self::DESCRIPTION,
            input: InputMode::Automatic,
            environments: &[],
        }
    }

    fn plan(
        &self,
        ctx: &FixContext,
        doc: &ConfigDocument,
        _prompter: &mut dyn Prompter,
    ) -> anyhow::Result<RulePlan> {
        let field = FieldPath::from(Self::FIELD);
        let Some(dir) = doc.get_str(&field).map(str::trim).filter(|d| !d.is_empty()) else {
            return Ok(RulePlan::default());
        };

        let dir = Utf8Path::new(dir);
        let resolved = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            ctx.document_dir.join(dir)
        };

        if resolved.is_dir() {
            return Ok(RulePlan::default());
        }
        if resolved.exists() {
            return Ok(RulePlan::default().warn(FixWarning::new(
                Self::FIX_ID,
                Some(field),
                format!("{resolved} exists but is not a directory"),
            )));
        }

        Ok(RulePlan::default().fix(PlannedFix {
            fix_id: Self::FIX_ID.to_string(),
            field,
            from: Value::Null,
            reason: "log directory did not exist".to_string(),
            op: OpKind::EnsureDir {
                path: resolved.to_string(),
            },
        }))
    }
}
