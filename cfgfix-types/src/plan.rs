use crate::document::FieldPath;
use crate::ops::OpKind;
use crate::report::FixWarning;
use serde::{Deserialize, Serialize};

/// A change a rule has decided on but not yet applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedFix {
    pub fix_id: String,
    pub field: FieldPath,

    /// Value observed when the rule ran; `null` when absent.
    pub from: serde_json::Value,

    pub reason: String,
    pub op: OpKind,
}

/// Everything one rule produced for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RulePlan {
    #[serde(default)]
    pub fixes: Vec<PlannedFix>,

    #[serde(default)]
    pub warnings: Vec<FixWarning>,
}

impl RulePlan {
    pub fn fix(mut self, fix: PlannedFix) -> Self {
        self.fixes.push(fix);
        self
    }

    pub fn warn(mut self, warning: FixWarning) -> Self {
        self.warnings.push(warning);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty() && self.warnings.is_empty()
    }
}
