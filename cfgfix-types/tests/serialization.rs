use cfgfix_types::document::{Environment, FieldPath};
use cfgfix_types::ops::{InputMode, OpKind};
use cfgfix_types::report::{
    CheckReport, FixKind, FixRecord, FixReport, FixWarning, SaveOutcome, ValidationFailure,
    ValidationReport, Verdict,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn failing_report() -> ValidationReport {
    ValidationReport {
        schema: cfgfix_types::schema::CFGFIX_VALIDATION_V1.to_string(),
        document: "config/platform.json".to_string(),
        verdict: Verdict::Fail,
        checks: vec!["json".to_string()],
        platform: None,
        failure: Some(ValidationFailure {
            code: 61,
            message: "missing required section: platform".to_string(),
        }),
    }
}

#[test]
fn enums_serialize_snake_case() {
    assert_eq!(serde_json::to_value(Environment::Production).unwrap(), json!("production"));
    assert_eq!(serde_json::to_value(InputMode::Prompted).unwrap(), json!("prompted"));
    assert_eq!(serde_json::to_value(FixKind::Filesystem).unwrap(), json!("filesystem"));
    assert_eq!(serde_json::to_value(Verdict::Pass).unwrap(), json!("pass"));
}

#[test]
fn field_path_serializes_as_dotted_string() {
    let record = FixRecord {
        fix_id: "config.development_logging".to_string(),
        field: FieldPath::from("database.enableLogging"),
        from: json!(false),
        to: json!(true),
        reason: "development needs query logging".to_string(),
        kind: FixKind::Document,
    };

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(value["field"], json!("database.enableLogging"));
    assert_eq!(value["from"], json!(false));
    assert_eq!(value["to"], json!(true));

    let back: FixRecord = serde_json::from_value(value).unwrap();
    assert_eq!(back, record);
}

#[test]
fn op_kind_is_internally_tagged() {
    let op = OpKind::JsonSet {
        json_path: "security.enableHSTS".into(),
        value: json!(true),
    };
    let value = serde_json::to_value(&op).unwrap();
    assert_eq!(value["type"], json!("json_set"));
    assert_eq!(value["json_path"], json!("security.enableHSTS"));
    assert_eq!(op.label(), "json_set");
    assert_eq!(OpKind::EnsureDir { path: "logs".into() }.label(), "ensure_dir");
}

#[test]
fn save_outcome_is_tagged_by_status() {
    let saved = SaveOutcome::Saved { backup: None };
    assert_eq!(serde_json::to_value(&saved).unwrap(), json!({"status": "saved"}));
    assert_eq!(
        serde_json::to_value(SaveOutcome::Failed { reason: "disk full".into() }).unwrap(),
        json!({"status": "failed", "reason": "disk full"})
    );
}

#[test]
fn fix_report_omits_empty_optionals() {
    let report = FixReport::new("config/platform.json", None);
    let value = serde_json::to_value(&report).unwrap();
    assert!(value.get("environment").is_none());
    assert!(value.get("diff").is_none());
    assert_eq!(value["schema"], json!(cfgfix_types::schema::CFGFIX_FIX_V1));
}

#[test]
fn tally_counts_document_fixes_separately() {
    let mut report = FixReport::new("c.json", Some(Environment::Development));
    report.fixes.push(FixRecord {
        fix_id: "a".into(),
        field: "logging.level".into(),
        from: json!("info"),
        to: json!("debug"),
        reason: "r".into(),
        kind: FixKind::Document,
    });
    report.fixes.push(FixRecord {
        fix_id: "b".into(),
        field: "logging.logDirectory".into(),
        from: json!(null),
        to: json!("/var/log/app"),
        reason: "r".into(),
        kind: FixKind::Filesystem,
    });
    report
        .warnings
        .push(FixWarning::new("c", None, "prompts disabled"));

    report.tally(6);
    assert_eq!(report.summary.rules_run, 6);
    assert_eq!(report.summary.fixes, 2);
    assert_eq!(report.summary.document_fixes, 1);
    assert_eq!(report.summary.warnings, 1);
}

#[test]
fn check_report_uses_last_validation() {
    let mut passing = failing_report();
    passing.verdict = Verdict::Pass;
    passing.failure = None;

    let check = CheckReport {
        schema: cfgfix_types::schema::CFGFIX_CHECK_V1.to_string(),
        initial: failing_report(),
        fix: None,
        fix_error: None,
        revalidation: Some(passing),
    };
    assert!(check.passed());

    let validate_only = CheckReport {
        revalidation: None,
        ..check
    };
    assert!(!validate_only.passed());
}
