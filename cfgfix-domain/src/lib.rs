//! Domain logic: decide whether a configuration document is valid, and what
//! should be corrected in it.
//!
//! This crate owns *what* should be fixed and why. It does not own *how*
//! changes reach the document or the disk; that's `cfgfix-edit` and
//! `cfgfix-core`.

mod fixers;
mod planner;
mod ports;
mod validate;

pub use fixers::{Fixer, FixerMeta, builtin_fixer_metas};
pub use planner::{
    DEFAULT_PLACEHOLDER_API_URLS, FixContext, Planner, PlannerConfig, unknown_environment_warning,
};
pub use ports::{NonInteractive, Prompter, ScriptedPrompter, parse_yes_no};
pub use validate::{ValidationError, ValidationResult, validate_file, validate_str};
