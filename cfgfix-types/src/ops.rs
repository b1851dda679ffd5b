use crate::document::FieldPath;
use serde::{Deserialize, Serialize};

/// Whether a rule can run unattended.
///
/// - automatic: fully determined by the document and its environment
/// - prompted: needs an operator-supplied value; skipped with a warning
///   when prompts are disabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    Automatic,
    Prompted,
}

impl InputMode {
    pub fn needs_input(self) -> bool {
        matches!(self, InputMode::Prompted)
    }
}

/// A single change a rule wants made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpKind {
    /// Set a document field, creating parent objects as needed.
    JsonSet {
        json_path: FieldPath,
        value: serde_json::Value,
    },
    /// Create a directory on disk (relative paths resolve against the
    /// document's directory).
    EnsureDir { path: String },
}

impl OpKind {
    pub fn label(&self) -> &'static str {
        match self {
            OpKind::JsonSet { .. } => "json_set",
            OpKind::EnsureDir { .. } => "ensure_dir",
        }
    }
}
