mod config;
mod explain;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use cfgfix_core::adapters::{LinePrompter, StdoutConsole};
use cfgfix_core::pipeline::{run_check, run_fix, run_validate};
use cfgfix_core::{NonInteractive, Prompter};
use cfgfix_render::{render_check, render_fix_report, render_validation};
use clap::{Parser, Subcommand};
use config::{ConfigMerger, MergedConfig};
use std::io;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "cfgfix",
    version,
    about = "Validate and auto-fix platform JSON configuration documents."
)]
struct Cli {
    /// Path of the JSON document (default: config/platform.json, or
    /// [document] path in cfgfix.toml).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<Utf8PathBuf>,

    /// Never prompt; rules that need an answer record a warning instead.
    #[arg(long, global = true, default_value_t = false)]
    no_interactive: bool,

    /// Only validate when no subcommand is given.
    #[arg(long, default_value_t = false)]
    validate_only: bool,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate, auto-fix, then validate again (the default).
    Check(CheckArgs),
    /// Validate the document and report the first problem found.
    Validate,
    /// Apply the fix rules and offer to save the result.
    Fix(FixArgs),
    /// Explain what a fix does and how to make the change by hand.
    Explain(ExplainArgs),
    /// List all fix rules.
    ListFixes(ListFixesArgs),
}

#[derive(Debug, Parser)]
struct CheckArgs {
    /// Stop after the first validation.
    #[arg(long, default_value_t = false)]
    validate_only: bool,

    /// Run the fix rules without writing anything.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[derive(Debug, Parser)]
struct FixArgs {
    /// Show what would change without writing anything.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Fix key or fix ID to explain (e.g., "production-hardening", "config.cors_origins").
    fix_key: String,
}

#[derive(Debug, Parser)]
struct ListFixesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        None => cmd_check(
            &cli,
            CheckArgs {
                validate_only: cli.validate_only,
                dry_run: false,
            },
        ),
        Some(Command::Check(ref args)) => cmd_check(
            &cli,
            CheckArgs {
                validate_only: args.validate_only || cli.validate_only,
                dry_run: args.dry_run,
            },
        ),
        Some(Command::Validate) => cmd_validate(&cli),
        Some(Command::Fix(ref args)) => cmd_fix(&cli, args),
        Some(Command::Explain(ref args)) => cmd_explain(args),
        Some(Command::ListFixes(ref args)) => cmd_list_fixes(args),
    }
}

fn merged_config(cli: &Cli, dry_run: bool) -> anyhow::Result<MergedConfig> {
    let file_config =
        config::load_or_default(Utf8Path::new(".")).context("load cfgfix.toml config")?;
    let merged = ConfigMerger::new(file_config).merge_cli_args(
        cli.config.as_deref(),
        cli.no_interactive,
        dry_run,
    );
    debug!(
        "merged config: document={}, interactive={}, dry_run={}, backups={}",
        merged.document, merged.interactive, merged.dry_run, merged.backups.enabled
    );
    Ok(merged)
}

fn prompter(merged: &MergedConfig) -> Box<dyn Prompter> {
    if merged.interactive {
        Box::new(LinePrompter::new(io::stdin().lock(), io::stdout()))
    } else {
        Box::new(NonInteractive)
    }
}

fn exit_code(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn cmd_check(cli: &Cli, args: CheckArgs) -> anyhow::Result<ExitCode> {
    let merged = merged_config(cli, args.dry_run)?;
    let settings = merged.check_settings(args.validate_only);
    let mut prompter = prompter(&merged);

    let report = run_check(&settings, prompter.as_mut(), &mut StdoutConsole);
    print!("{}", render_check(&report));
    Ok(exit_code(report.passed()))
}

fn cmd_validate(cli: &Cli) -> anyhow::Result<ExitCode> {
    let merged = merged_config(cli, false)?;
    let report = run_validate(&merged.document);
    print!("{}", render_validation(&report));
    Ok(exit_code(report.passed()))
}

fn cmd_fix(cli: &Cli, args: &FixArgs) -> anyhow::Result<ExitCode> {
    let merged = merged_config(cli, args.dry_run)?;
    let settings = merged.fix_settings();
    let mut prompter = prompter(&merged);

    let report = run_fix(&settings, prompter.as_mut(), &mut StdoutConsole)?;
    print!("{}", render_fix_report(&report));
    Ok(ExitCode::SUCCESS)
}

fn cmd_explain(args: &ExplainArgs) -> anyhow::Result<ExitCode> {
    use explain::{
        format_input_mode, format_scope, input_mode_meaning, list_fix_keys, lookup_fix, meta_for,
    };

    let Some(fix) = lookup_fix(&args.fix_key) else {
        let available = list_fix_keys().join(", ");
        anyhow::bail!(
            "Unknown fix key: '{}'\n\nAvailable fixes: {}",
            args.fix_key,
            available
        );
    };
    let meta = meta_for(fix).with_context(|| format!("no built-in rule for {}", fix.key))?;

    println!("================================================================================");
    println!("FIX: {}", fix.title);
    println!("================================================================================");
    println!();
    println!("Key:     {}", fix.key);
    println!("Fix ID:  {}", fix.fix_id);
    println!("Input:   {}", format_input_mode(meta.input));
    println!("Scope:   {}", format_scope(&meta));
    println!();

    println!("DESCRIPTION");
    println!("--------------------------------------------------------------------------------");
    println!("{}", fix.description);
    println!();

    println!("FIELDS");
    println!("--------------------------------------------------------------------------------");
    for field in fix.fields {
        println!("  - {field}");
    }
    println!();

    println!("INPUT MODE: {}", format_input_mode(meta.input));
    println!("--------------------------------------------------------------------------------");
    println!("{}", input_mode_meaning(meta.input));
    println!();

    println!("RATIONALE");
    println!("--------------------------------------------------------------------------------");
    println!("{}", fix.rationale);
    println!();

    println!("REMEDIATION GUIDANCE");
    println!("--------------------------------------------------------------------------------");
    println!("{}", fix.remediation);
    println!();

    Ok(ExitCode::SUCCESS)
}

fn cmd_list_fixes(args: &ListFixesArgs) -> anyhow::Result<ExitCode> {
    use explain::{FIX_REGISTRY, format_input_mode, format_scope, meta_for};

    let rows = FIX_REGISTRY
        .iter()
        .map(|fix| {
            meta_for(fix)
                .map(|meta| (fix, meta))
                .with_context(|| format!("no built-in rule for {}", fix.key))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    match args.format {
        OutputFormat::Text => {
            println!("Available fixes:\n");
            println!("  {:<22} {:<10} {:<18} TITLE", "KEY", "INPUT", "SCOPE");
            println!("  {:<22} {:<10} {:<18} -----", "---", "-----", "-----");
            for (fix, meta) in &rows {
                println!(
                    "  {:<22} {:<10} {:<18} {}",
                    fix.key,
                    format_input_mode(meta.input),
                    format_scope(meta),
                    fix.title
                );
            }
            println!();
            println!("Use 'cfgfix explain <key>' for details.");
        }
        OutputFormat::Json => {
            let fixes: Vec<_> = rows
                .iter()
                .map(|(fix, meta)| {
                    let environments: Vec<_> =
                        meta.environments.iter().map(|e| e.as_str()).collect();
                    serde_json::json!({
                        "key": fix.key,
                        "fix_id": fix.fix_id,
                        "title": fix.title,
                        "input": format_input_mode(meta.input).to_lowercase(),
                        "environments": environments,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&fixes)?);
        }
    }
    Ok(ExitCode::SUCCESS)
}
