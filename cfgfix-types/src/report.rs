use crate::document::{Environment, FieldPath};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
}

/// Identity fields read from the `platform` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub name: String,
    pub version: String,
    pub environment: Environment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// Stable numeric error code.
    pub code: u32,
    pub message: String,
}

/// Outcome of one validation pass over one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub schema: String,
    pub document: String,
    pub verdict: Verdict,

    /// Names of the checks that passed, in the order they ran.
    #[serde(default)]
    pub checks: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<PlatformInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<ValidationFailure>,
}

impl ValidationReport {
    pub fn passed(&self) -> bool {
        self.verdict == Verdict::Pass
    }
}

/// What a recorded fix changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixKind {
    Document,
    Filesystem,
}

/// A before/after/reason triple for one applied rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixRecord {
    pub fix_id: String,
    pub field: FieldPath,
    pub from: serde_json::Value,
    pub to: serde_json::Value,
    pub reason: String,
    pub kind: FixKind,
}

/// An issue a rule detected but did not (or could not) correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixWarning {
    pub fix_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<FieldPath>,

    pub message: String,
}

impl FixWarning {
    pub fn new(fix_id: &str, field: Option<FieldPath>, message: impl Into<String>) -> Self {
        Self {
            fix_id: fix_id.to_string(),
            field,
            message: message.into(),
        }
    }
}

/// What happened to the modified document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveOutcome {
    /// No document fixes were made.
    NotNeeded,
    Saved {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        backup: Option<String>,
    },
    Declined,
    DryRun,
    Failed { reason: String },
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixSummary {
    pub rules_run: u64,
    pub fixes: u64,
    pub document_fixes: u64,
    pub warnings: u64,
}

/// Outcome of one auto-fix pass over one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixReport {
    pub schema: String,
    pub document: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,

    #[serde(default)]
    pub fixes: Vec<FixRecord>,

    #[serde(default)]
    pub warnings: Vec<FixWarning>,

    pub summary: FixSummary,
    pub saved: SaveOutcome,

    /// Unified diff of the document, when it changed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl FixReport {
    pub fn new(document: impl Into<String>, environment: Option<Environment>) -> Self {
        Self {
            schema: crate::schema::CFGFIX_FIX_V1.to_string(),
            document: document.into(),
            environment,
            fixes: vec![],
            warnings: vec![],
            summary: FixSummary::default(),
            saved: SaveOutcome::NotNeeded,
            diff: None,
        }
    }

    pub fn document_fixes(&self) -> impl Iterator<Item = &FixRecord> {
        self.fixes.iter().filter(|f| f.kind == FixKind::Document)
    }

    /// Recompute `summary` from the recorded fixes and warnings.
    pub fn tally(&mut self, rules_run: u64) {
        self.summary = FixSummary {
            rules_run,
            fixes: self.fixes.len() as u64,
            document_fixes: self.document_fixes().count() as u64,
            warnings: self.warnings.len() as u64,
        };
    }
}

/// Outcome of validate → fix → validate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckReport {
    pub schema: String,
    pub initial: ValidationReport,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<FixReport>,

    /// Set when the fix stage could not run at all (e.g. unreadable document).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revalidation: Option<ValidationReport>,
}

impl CheckReport {
    /// The last validation that ran decides the outcome.
    pub fn passed(&self) -> bool {
        self.revalidation
            .as_ref()
            .unwrap_or(&self.initial)
            .passed()
    }
}
