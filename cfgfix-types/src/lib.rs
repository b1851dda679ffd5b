//! Shared DTOs (schemas-as-code) for the cfgfix workspace.
//!
//! # Design constraints
//! - The document model is a thin wrapper over `serde_json::Value`; rules
//!   address fields by dotted [`document::FieldPath`].
//! - Report types serialize; prefer adding optional fields over changing
//!   semantics.

pub mod document;
pub mod ops;
pub mod plan;
pub mod report;

/// Schema identifiers.
pub mod schema {
    pub const CFGFIX_VALIDATION_V1: &str = "cfgfix.validation.v1";
    pub const CFGFIX_FIX_V1: &str = "cfgfix.fix.v1";
    pub const CFGFIX_CHECK_V1: &str = "cfgfix.check.v1";
}
