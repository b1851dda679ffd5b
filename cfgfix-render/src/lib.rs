//! Rendering helpers (plain text) for terminal status output.

use cfgfix_types::report::{
    CheckReport, FixKind, FixRecord, FixReport, SaveOutcome, ValidationReport, Verdict,
};
use serde_json::Value;

pub fn render_validation(report: &ValidationReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "validate {}: {}\n",
        report.document,
        verdict_label(report.verdict)
    ));
    if let Some(p) = &report.platform {
        out.push_str(&format!(
            "- Platform: {} {} ({})\n",
            p.name, p.version, p.environment
        ));
    }
    match &report.failure {
        Some(f) => out.push_str(&format!("- Error {}: {}\n", f.code, f.message)),
        None => out.push_str(&format!("- Checks passed: {}\n", report.checks.len())),
    }
    out
}

pub fn render_fix_report(report: &FixReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("fix {}\n", report.document));
    if let Some(env) = report.environment {
        out.push_str(&format!("- Environment: {env}\n"));
    }
    out.push_str(&format!(
        "- Rules run: {}\n- Fixes: {} (document {})\n- Warnings: {}\n- Saved: {}\n",
        report.summary.rules_run,
        report.summary.fixes,
        report.summary.document_fixes,
        report.summary.warnings,
        save_label(&report.saved)
    ));

    if report.fixes.is_empty() {
        out.push_str("\nNo fixes applied.\n");
    } else {
        out.push_str("\nFixes:\n");
        for (i, fix) in report.fixes.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, describe_fix(fix)));
        }
    }

    if !report.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for w in &report.warnings {
            match &w.field {
                Some(field) => {
                    out.push_str(&format!("- [{}] {}: {}\n", w.fix_id, field, w.message))
                }
                None => out.push_str(&format!("- [{}] {}\n", w.fix_id, w.message)),
            }
        }
    }
    out
}

pub fn render_check(report: &CheckReport) -> String {
    let mut out = render_validation(&report.initial);

    if let Some(fix) = &report.fix {
        out.push('\n');
        out.push_str(&render_fix_report(fix));
    }
    if let Some(err) = &report.fix_error {
        out.push_str(&format!("\nfix skipped: {err}\n"));
    }
    if let Some(revalidation) = &report.revalidation {
        out.push('\n');
        out.push_str(&render_validation(revalidation));
    }

    let verdict = if report.passed() {
        Verdict::Pass
    } else {
        Verdict::Fail
    };
    out.push_str(&format!("\nResult: {}\n", verdict_label(verdict)));
    out
}

fn describe_fix(fix: &FixRecord) -> String {
    match fix.kind {
        FixKind::Document => format!(
            "{}: {} -> {} ({}) [{}]",
            fix.field,
            value_label(&fix.from),
            value_label(&fix.to),
            fix.reason,
            fix.fix_id
        ),
        FixKind::Filesystem => format!(
            "{}: created {} ({}) [{}]",
            fix.field,
            fix.to.as_str().unwrap_or("-"),
            fix.reason,
            fix.fix_id
        ),
    }
}

fn value_label(v: &Value) -> String {
    match v {
        Value::Null => "(unset)".to_string(),
        other => other.to_string(),
    }
}

fn verdict_label(v: Verdict) -> &'static str {
    match v {
        Verdict::Pass => "PASS",
        Verdict::Fail => "FAIL",
    }
}

fn save_label(s: &SaveOutcome) -> String {
    match s {
        SaveOutcome::NotNeeded => "not needed".to_string(),
        SaveOutcome::Saved { backup: Some(b) } => format!("yes (backup {b})"),
        SaveOutcome::Saved { backup: None } => "yes".to_string(),
        SaveOutcome::Declined => "no (declined)".to_string(),
        SaveOutcome::DryRun => "no (dry run)".to_string(),
        SaveOutcome::Failed { reason } => format!("failed ({reason})"),
    }
}
