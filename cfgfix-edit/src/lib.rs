//! Edit engine for cfgfix.
//!
//! Responsibilities:
//! - Make sure the sections rules write into exist.
//! - Apply planned fixes (in memory, plus log directory creation).
//! - Generate a unified diff preview.
//! - Write the document back, guarded by a sha256 precondition and a backup.

mod error;

pub use error::{EditError, EditResult};

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use cfgfix_types::document::{ConfigDocument, FieldPath};
use cfgfix_types::ops::OpKind;
use cfgfix_types::plan::PlannedFix;
use cfgfix_types::report::{FixKind, FixRecord};
use fs_err as fs;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// Objects created before any rule runs, parents first.
pub const DEFAULT_SECTIONS: &[&str] = &[
    "security",
    "database",
    "logging",
    "performance",
    "performance.caching",
    "performance.compression",
];

#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Record filesystem fixes without performing them.
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct PersistOptions {
    /// Copy the original to `<path><suffix>` before overwriting. `None`
    /// disables backups. An existing backup is replaced, so it always holds
    /// the document as it was before the most recent save.
    pub backup_suffix: Option<String>,
}

impl Default for PersistOptions {
    fn default() -> Self {
        Self {
            backup_suffix: Some(".cfgfix.bak".to_string()),
        }
    }
}

/// A document as read from disk, with the hash of the exact bytes read.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub path: Utf8PathBuf,
    pub text: String,
    pub sha256: String,
    pub document: ConfigDocument,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistOutcome {
    pub backup: Option<Utf8PathBuf>,
}

/// Read and parse the document at `path`.
pub fn load_document(path: &Utf8Path) -> anyhow::Result<LoadedDocument> {
    let bytes = fs::read(path)?;
    let sha256 = sha256_hex(&bytes);
    let text = String::from_utf8(bytes).with_context(|| format!("{path} is not UTF-8"))?;
    let document = ConfigDocument::parse(&text).with_context(|| format!("parse {path}"))?;
    Ok(LoadedDocument {
        path: path.to_path_buf(),
        text,
        sha256,
        document,
    })
}

/// Create any missing [`DEFAULT_SECTIONS`]; returns the ones created.
pub fn ensure_default_sections(doc: &mut ConfigDocument) -> EditResult<Vec<FieldPath>> {
    let mut created = Vec::new();
    for section in DEFAULT_SECTIONS {
        let path = FieldPath::from(*section);
        let made = doc
            .ensure_object(&path)
            .map_err(|source| EditError::Document {
                field: path.clone(),
                source,
            })?;
        if made {
            created.push(path);
        }
    }
    Ok(created)
}

/// Apply one planned fix and return its record.
///
/// `JsonSet` changes `doc`; `EnsureDir` creates the directory unless
/// `opts.dry_run` is set.
pub fn apply_fix(
    doc: &mut ConfigDocument,
    fix: &PlannedFix,
    opts: &ApplyOptions,
) -> EditResult<FixRecord> {
    match &fix.op {
        OpKind::JsonSet { json_path, value } => {
            let previous = doc
                .set(json_path, value.clone())
                .map_err(|source| EditError::Document {
                    field: json_path.clone(),
                    source,
                })?;
            debug!(field = %json_path, from = ?previous, to = %value, "applied json_set");
            Ok(FixRecord {
                fix_id: fix.fix_id.clone(),
                field: fix.field.clone(),
                from: previous.unwrap_or(Value::Null),
                to: value.clone(),
                reason: fix.reason.clone(),
                kind: FixKind::Document,
            })
        }
        OpKind::EnsureDir { path } => {
            if opts.dry_run {
                debug!(path = %path, "dry-run: not creating directory");
            } else {
                fs::create_dir_all(path).with_context(|| format!("create directory {path}"))?;
                info!(path = %path, "created directory");
            }
            Ok(FixRecord {
                fix_id: fix.fix_id.clone(),
                field: fix.field.clone(),
                from: fix.from.clone(),
                to: Value::String(path.clone()),
                reason: fix.reason.clone(),
                kind: FixKind::Filesystem,
            })
        }
    }
}

/// Unified diff between two renderings of the document at `path`.
///
/// Empty when they are identical.
pub fn render_diff(path: &Utf8Path, before: &str, after: &str) -> String {
    if before == after {
        return String::new();
    }

    let patch = diffy::create_patch(before, after).to_string();
    // Swap diffy's generic header for one naming the file.
    let hunks = patch
        .split_once("\n+++ ")
        .and_then(|(_, rest)| rest.split_once('\n'))
        .map(|(_, hunks)| hunks)
        .unwrap_or(&patch);

    let mut out = format!("--- a/{path}\n+++ b/{path}\n{hunks}");
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

/// Write `doc` back to `path`.
///
/// Refuses to write if the file's current sha256 differs from
/// `expected_sha256` (the hash taken at load). With backups enabled the
/// current file is copied aside first.
pub fn persist_document(
    path: &Utf8Path,
    doc: &ConfigDocument,
    expected_sha256: &str,
    opts: &PersistOptions,
) -> EditResult<PersistOutcome> {
    let current = fs::read(path).context("re-read before write")?;
    let actual = sha256_hex(&current);
    if actual != expected_sha256 {
        return Err(EditError::PreconditionMismatch {
            message: format!(
                "{path} changed since it was loaded \
                 (expected sha256 {expected_sha256}, found {actual})"
            ),
        });
    }

    let contents = doc.to_pretty_string().context("serialize document")?;

    let backup = match &opts.backup_suffix {
        Some(suffix) => {
            let backup = Utf8PathBuf::from(format!("{path}{suffix}"));
            if backup.exists() {
                debug!(backup = %backup, "replacing previous backup");
            }
            fs::write(&backup, &current).with_context(|| format!("write backup {backup}"))?;
            debug!(backup = %backup, "wrote backup");
            Some(backup)
        }
        None => None,
    };

    fs::write(path, contents).with_context(|| format!("write {path}"))?;
    info!(path = %path, "saved document");
    Ok(PersistOutcome { backup })
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
