use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use cfgfix_core::adapters::BufferConsole;
use cfgfix_core::pipeline::{run_check, run_fix, run_validate};
use cfgfix_core::settings::{CheckSettings, FixSettings};
use cfgfix_core::{NonInteractive, Prompter, ScriptedPrompter};
use cfgfix_types::report::{FixKind, FixReport, SaveOutcome};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

fn fixture(name: &str) -> Utf8PathBuf {
    Utf8Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Copy a fixture to `<tmp>/config/platform.json`.
fn stage(name: &str) -> (TempDir, Utf8PathBuf) {
    let text = fs::read_to_string(fixture(name)).expect("read fixture");
    stage_text(&text)
}

fn stage_text(text: &str) -> (TempDir, Utf8PathBuf) {
    let td = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).expect("utf8 tempdir");
    let path = root.join("config").join("platform.json");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, text).unwrap();
    (td, path)
}

fn settings(path: &Utf8Path) -> FixSettings {
    FixSettings {
        document: path.to_path_buf(),
        ..FixSettings::default()
    }
}

/// Fix the document at `path` with prompts disabled.
fn fix_unattended(path: &Utf8Path) -> Result<FixReport> {
    run_fix(&settings(path), &mut NonInteractive, &mut BufferConsole::default())
}

fn read_json(path: &Utf8Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn development_fix_matches_golden_output() {
    let (_td, path) = stage("development.json");
    let original = fs::read_to_string(&path).unwrap();

    let report = fix_unattended(&path).unwrap();

    let db = report
        .fixes
        .iter()
        .find(|f| f.field.to_string() == "database.enableLogging")
        .expect("database logging fix");
    assert_eq!(db.from, json!(false));
    assert_eq!(db.to, json!(true));
    assert_eq!(db.fix_id, "config.development_logging");
    assert_eq!(report.summary.document_fixes, 2);

    let expected = fs::read_to_string(fixture("development.fixed.json")).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), expected);

    let backup = format!("{path}.cfgfix.bak");
    assert_eq!(
        report.saved,
        SaveOutcome::Saved {
            backup: Some(backup.clone())
        }
    );
    assert_eq!(fs::read_to_string(backup).unwrap(), original);
}

#[test]
fn production_wildcard_is_left_alone_without_prompts() {
    let (_td, path) = stage("production_wildcard.json");

    let report = fix_unattended(&path).unwrap();

    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.fix_id == "config.cors_origins")
    );
    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.fix_id == "config.placeholder_api_url")
    );
    assert!(
        report
            .fixes
            .iter()
            .all(|f| f.field.to_string() != "security.allowedOrigins")
    );

    let saved = read_json(&path);
    assert_eq!(saved["security"]["allowedOrigins"], json!(["*"]));
    assert_eq!(saved["security"]["enableSSL"], json!(true));
    assert_eq!(saved["security"]["enableHSTS"], json!(true));
    assert_eq!(saved["database"]["enableLogging"], json!(false));
    assert_eq!(saved["performance"]["caching"]["enabled"], json!(true));
    assert_eq!(saved["api"]["baseUrl"], json!("https://api.example.com"));
}

#[test]
fn check_on_correct_production_config_changes_nothing() {
    let (_td, path) = stage("production_ok.json");
    let before = fs::read(&path).unwrap();
    let check = CheckSettings {
        fix: settings(&path),
        validate_only: false,
    };

    let report = run_check(&check, &mut NonInteractive, &mut BufferConsole::default());

    assert!(report.initial.passed());
    let fix = report.fix.as_ref().expect("fix ran");
    assert!(fix.fixes.is_empty());
    assert!(fix.warnings.is_empty());
    assert_eq!(fix.saved, SaveOutcome::NotNeeded);
    assert!(report.revalidation.as_ref().unwrap().passed());
    assert!(report.passed());
    assert_eq!(fs::read(&path).unwrap(), before);
    assert!(!Utf8PathBuf::from(format!("{path}.cfgfix.bak")).exists());
}

#[test]
fn validate_only_stops_after_first_validation() {
    let (_td, path) = stage("production_wildcard.json");
    let before = fs::read(&path).unwrap();
    let check = CheckSettings {
        fix: settings(&path),
        validate_only: true,
    };

    let report = run_check(&check, &mut NonInteractive, &mut BufferConsole::default());

    assert!(report.passed());
    assert!(report.fix.is_none());
    assert!(report.revalidation.is_none());
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn missing_section_fails_both_validations() {
    let (_td, path) = stage("missing_global.json");
    let check = CheckSettings {
        fix: settings(&path),
        validate_only: false,
    };

    let report = run_check(&check, &mut NonInteractive, &mut BufferConsole::default());

    let failure = report.initial.failure.as_ref().expect("failure");
    assert!(failure.message.contains("global"), "{}", failure.message);
    assert_eq!(report.fix.as_ref().unwrap().saved, SaveOutcome::NotNeeded);
    assert!(!report.revalidation.as_ref().unwrap().passed());
    assert!(!report.passed());
}

#[test]
fn declined_save_leaves_file_byte_identical() {
    let (_td, path) = stage("production_wildcard.json");
    let before = fs::read(&path).unwrap();
    // Skip the placeholder, skip the origins, then refuse to save.
    let mut prompter = ScriptedPrompter::new(["", "", "no"]);

    let report = run_fix(&settings(&path), &mut prompter, &mut BufferConsole::default()).unwrap();

    assert_eq!(report.saved, SaveOutcome::Declined);
    assert_eq!(report.summary.document_fixes, 4);
    assert_eq!(prompter.asked[2], format!("Save 4 fix(es) to {path}?"));
    assert_eq!(fs::read(&path).unwrap(), before);
    assert!(!Utf8PathBuf::from(format!("{path}.cfgfix.bak")).exists());
}

#[test]
fn interactive_answers_replace_placeholder_and_origins() {
    let (_td, path) = stage("production_wildcard.json");
    let mut prompter = ScriptedPrompter::new([
        "https://api.atlas.io",
        "https://app.atlas.io, https://admin.atlas.io",
        "yes",
    ]);

    let report = run_fix(&settings(&path), &mut prompter, &mut BufferConsole::default()).unwrap();

    assert!(report.saved.is_saved());
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    let saved = read_json(&path);
    assert_eq!(saved["api"]["baseUrl"], json!("https://api.atlas.io"));
    assert_eq!(
        saved["security"]["allowedOrigins"],
        json!(["https://app.atlas.io", "https://admin.atlas.io"])
    );
    assert!(run_validate(&path).passed());
}

#[test]
fn dry_run_shows_diff_and_writes_nothing() {
    let (_td, path) = stage("production_wildcard.json");
    let before = fs::read(&path).unwrap();
    let mut console = BufferConsole::default();
    let opts = FixSettings {
        dry_run: true,
        ..settings(&path)
    };

    let report = run_fix(&opts, &mut NonInteractive, &mut console).unwrap();

    assert_eq!(report.saved, SaveOutcome::DryRun);
    let diff = report.diff.as_deref().expect("diff");
    assert!(diff.starts_with(&format!("--- a/{path}\n+++ b/{path}\n")));
    assert!(diff.contains("-    \"enableSSL\": false,"));
    assert!(diff.contains("+    \"enableSSL\": true,"));
    assert_eq!(console.shown, [diff.to_string()]);
    assert_eq!(fs::read(&path).unwrap(), before);
}

/// Confirms the save, but rewrites the file first.
struct TamperingPrompter {
    path: Utf8PathBuf,
}

impl Prompter for TamperingPrompter {
    fn interactive(&self) -> bool {
        true
    }

    fn ask(&mut self, _question: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn confirm(&mut self, _question: &str, _default: bool) -> Result<bool> {
        fs::write(&self.path, "{\"edited\": true}\n")?;
        Ok(true)
    }
}

#[test]
fn file_changed_before_save_is_not_overwritten() {
    let (_td, path) = stage("development.json");
    let mut prompter = TamperingPrompter { path: path.clone() };

    let report = run_fix(&settings(&path), &mut prompter, &mut BufferConsole::default()).unwrap();

    let SaveOutcome::Failed { reason } = &report.saved else {
        panic!("expected failed save, got {:?}", report.saved);
    };
    assert!(reason.contains("precondition mismatch"), "{reason}");
    assert!(report.warnings.iter().any(|w| w.fix_id == "config.save"));
    assert_eq!(report.summary.warnings, report.warnings.len() as u64);
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"edited\": true}\n");
}

#[test]
fn unreadable_document_is_reported_by_check() {
    let td = TempDir::new().unwrap();
    let path = Utf8PathBuf::from_path_buf(td.path().join("absent.json")).unwrap();

    let err = fix_unattended(&path).unwrap_err();
    assert!(format!("{err:#}").contains("absent.json"));

    let check = CheckSettings {
        fix: settings(&path),
        validate_only: false,
    };
    let report = run_check(&check, &mut NonInteractive, &mut BufferConsole::default());
    assert!(report.fix.is_none());
    assert!(report.fix_error.is_some());
    assert!(!report.revalidation.unwrap().passed());
}

#[test]
fn log_directory_is_created_next_to_the_document() {
    let text = json!({
        "platform": {"name": "atlas", "version": "1.0.0", "environment": "staging"},
        "global": {"enabled": true, "timezone": "UTC"},
        "security": {},
        "database": {},
        "logging": {"level": "info", "logDirectory": "var/log"},
        "performance": {"caching": {}, "compression": {}}
    })
    .to_string();
    let (_td, path) = stage_text(&text);

    let report = fix_unattended(&path).unwrap();

    assert_eq!(report.fixes.len(), 1);
    assert_eq!(report.fixes[0].kind, FixKind::Filesystem);
    assert!(path.parent().unwrap().join("var/log").is_dir());
    // Nothing in the document changed, so it is not rewritten.
    assert_eq!(report.saved, SaveOutcome::NotNeeded);
    assert_eq!(fs::read_to_string(&path).unwrap(), text);
}

#[test]
fn unknown_environment_is_warned_about_once() {
    let text = json!({
        "platform": {"name": "atlas", "version": "1.0.0", "environment": "qa"},
        "global": {"enabled": true, "timezone": "UTC"}
    })
    .to_string();
    let (_td, path) = stage_text(&text);

    let report = fix_unattended(&path).unwrap();

    assert_eq!(report.environment, None);
    let env_warnings = report
        .warnings
        .iter()
        .filter(|w| w.fix_id == "config.environment")
        .count();
    assert_eq!(env_warnings, 1);
    assert_eq!(report.summary.rules_run, 6);
}
