//! Embeddable core library for cfgfix.
//!
//! Provides a clap-free entry point suitable for linking into other host
//! processes (deploy tooling, editors, test harnesses).
//!
//! # Ports
//!
//! Interaction is abstracted behind port traits:
//! - [`Prompter`] (from `cfgfix-domain`) for operator answers
//! - [`Console`](ports::Console) for status output shown while a run is in
//!   progress
//!
//! The [`adapters`] module provides terminal-backed and in-memory
//! implementations.
//!
//! # Entry points
//!
//! - [`run_validate`](pipeline::run_validate) - validate one document
//! - [`run_fix`](pipeline::run_fix) - apply the fix rules and optionally save
//! - [`run_check`](pipeline::run_check) - validate, fix, validate again

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-export the prompter port so callers don't need cfgfix-domain directly.
pub use cfgfix_domain::{NonInteractive, Prompter, ScriptedPrompter};
