//! Validate, fix and check pipelines, extracted from the CLI.
//!
//! Operator input goes through [`Prompter`]; text that has to appear while
//! the run is still in progress goes through [`Console`]. Reports are
//! returned to the caller for rendering.

use crate::ports::Console;
use crate::settings::{CheckSettings, FixSettings};
use anyhow::Context;
use camino::Utf8Path;
use cfgfix_domain::{FixContext, Planner, Prompter, validate_file};
use cfgfix_edit::{
    ApplyOptions, EditError, PersistOptions, apply_fix, ensure_default_sections, load_document,
    persist_document, render_diff,
};
use cfgfix_types::document::ConfigDocument;
use cfgfix_types::report::{CheckReport, FixReport, FixWarning, SaveOutcome, ValidationReport};
use cfgfix_types::schema;
use tracing::{debug, info, warn};

const SAVE_FIX_ID: &str = "config.save";
const SECTIONS_FIX_ID: &str = "config.default_sections";

/// Validate the document at `path`.
pub fn run_validate(path: &Utf8Path) -> ValidationReport {
    let report = validate_file(path);
    info!(document = %path, verdict = ?report.verdict, "validated");
    report
}

/// Run every fix rule against the document, then decide whether to save.
///
/// Errors only when the document cannot be loaded at all. Problems applying
/// individual fixes or writing files become warnings on the report.
pub fn run_fix(
    settings: &FixSettings,
    prompter: &mut dyn Prompter,
    console: &mut dyn Console,
) -> anyhow::Result<FixReport> {
    let path = settings.document.as_path();
    let loaded = load_document(path).with_context(|| format!("load {path}"))?;
    let mut doc = loaded.document.clone();
    let mut report = FixReport::new(path.as_str(), doc.environment());

    if let Err(err) = ensure_default_sections(&mut doc) {
        warn!(error = %err, "could not create default sections");
        push_warning(
            &mut report,
            FixWarning::new(SECTIONS_FIX_ID, None, err.to_string()),
        );
    }

    let document_dir = match path.parent() {
        Some(dir) if !dir.as_str().is_empty() => dir.to_path_buf(),
        _ => ".".into(),
    };
    let ctx = FixContext::for_document(&doc, document_dir, settings.planner_config());
    let apply_opts = ApplyOptions {
        dry_run: settings.dry_run,
    };

    let planner = Planner::new();
    let mut rules_run = 0u64;
    for fixer in planner.fixers() {
        let meta = fixer.meta();
        let plan = planner.plan_rule(fixer.as_ref(), &ctx, &doc, prompter)?;
        rules_run += 1;
        debug!(
            fix = meta.fix_key,
            fixes = plan.fixes.len(),
            warnings = plan.warnings.len(),
            "rule planned"
        );

        for warning in plan.warnings {
            push_warning(&mut report, warning);
        }
        for fix in &plan.fixes {
            match apply_fix(&mut doc, fix, &apply_opts) {
                Ok(record) => report.fixes.push(record),
                Err(err) => {
                    warn!(
                        fix = meta.fix_key,
                        op = fix.op.label(),
                        field = %fix.field,
                        error = %err,
                        "fix not applied"
                    );
                    push_warning(
                        &mut report,
                        FixWarning::new(&fix.fix_id, Some(fix.field.clone()), format!("{err:#}")),
                    );
                }
            }
        }
    }
    report.tally(rules_run);

    let document_fixes = report.summary.document_fixes;
    if document_fixes == 0 {
        debug!("no document fixes, nothing to save");
        return Ok(report);
    }

    let after = doc.to_pretty_string().context("serialize fixed document")?;
    let diff = render_diff(path, &loaded.text, &after);
    if !diff.is_empty() {
        console.show(&diff);
        report.diff = Some(diff);
    }

    report.saved = save(settings, prompter, &doc, &loaded.sha256, document_fixes)?;
    if let SaveOutcome::Failed { reason } = &report.saved {
        let warning = FixWarning::new(SAVE_FIX_ID, None, reason.clone());
        push_warning(&mut report, warning);
        report.tally(rules_run);
    }
    Ok(report)
}

/// Validate, and unless `validate_only`, fix and validate again.
///
/// The final validation reads the document back from disk, so it reflects
/// what was actually saved.
pub fn run_check(
    settings: &CheckSettings,
    prompter: &mut dyn Prompter,
    console: &mut dyn Console,
) -> CheckReport {
    let path = settings.fix.document.as_path();
    let initial = run_validate(path);
    let mut report = CheckReport {
        schema: schema::CFGFIX_CHECK_V1.to_string(),
        initial,
        fix: None,
        fix_error: None,
        revalidation: None,
    };
    if settings.validate_only {
        return report;
    }

    match run_fix(&settings.fix, prompter, console) {
        Ok(fix) => report.fix = Some(fix),
        Err(err) => {
            warn!(error = %format!("{err:#}"), "fix stage failed");
            report.fix_error = Some(format!("{err:#}"));
        }
    }

    report.revalidation = Some(run_validate(path));
    report
}

fn save(
    settings: &FixSettings,
    prompter: &mut dyn Prompter,
    doc: &ConfigDocument,
    expected_sha256: &str,
    document_fixes: u64,
) -> anyhow::Result<SaveOutcome> {
    let path = settings.document.as_path();
    if settings.dry_run {
        info!(document = %path, "dry run, not saving");
        return Ok(SaveOutcome::DryRun);
    }

    if prompter.interactive() {
        let question = format!("Save {document_fixes} fix(es) to {path}?");
        if !prompter.confirm(&question, true)? {
            info!(document = %path, "save declined");
            return Ok(SaveOutcome::Declined);
        }
    }

    let opts = PersistOptions {
        backup_suffix: settings.backup_suffix(),
    };
    Ok(match persist_document(path, doc, expected_sha256, &opts) {
        Ok(outcome) => SaveOutcome::Saved {
            backup: outcome.backup.map(|b| b.into_string()),
        },
        Err(err @ EditError::PreconditionMismatch { .. }) => {
            warn!(document = %path, error = %err, "refusing to overwrite");
            SaveOutcome::Failed {
                reason: err.to_string(),
            }
        }
        Err(err) => {
            warn!(document = %path, error = %err, "save failed");
            SaveOutcome::Failed {
                reason: format!("could not save {path}: {err}"),
            }
        }
    })
}

/// Record `warning` unless an identical one is already there.
fn push_warning(report: &mut FixReport, warning: FixWarning) {
    if !report.warnings.contains(&warning) {
        report.warnings.push(warning);
    }
}
