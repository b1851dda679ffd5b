//! Validation errors and the fixed sequence of document checks.

use camino::Utf8Path;
use cfgfix_types::document::{
    ConfigDocument, DocumentError, Environment, FieldPath, LogLevel, REQUIRED_SECTIONS,
    json_type_name,
};
use cfgfix_types::report::{PlatformInfo, ValidationFailure, ValidationReport, Verdict};
use fs_err as fs;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;
use url::Url;

// ASCII digits only; `\d` would also accept other Unicode digits.
static SEMVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("semver pattern"));

const MIN_SESSION_TIMEOUT: f64 = 60.0;
const MIN_API_TIMEOUT: f64 = 1000.0;
const LOGIN_ATTEMPTS: std::ops::RangeInclusive<f64> = 1.0..=10.0;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Why a document failed validation. The first failing check wins.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("cannot read {path}: {message}")]
    Io { path: String, message: String },

    #[error("invalid JSON: {0}")]
    Parse(String),

    #[error("missing required section: {0}")]
    MissingSection(String),

    #[error("missing required field: {0}")]
    MissingField(FieldPath),

    #[error("{field} must be {expected}, found {found}")]
    InvalidType {
        field: FieldPath,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: FieldPath, message: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::Io { .. } => 60,
            ValidationError::Parse(_) => 61,
            ValidationError::MissingSection(_) => 62,
            ValidationError::MissingField(_) => 63,
            ValidationError::InvalidType { .. } => 64,
            ValidationError::InvalidValue { .. } => 65,
        }
    }

    fn invalid(field: &FieldPath, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.clone(),
            message: message.into(),
        }
    }
}

impl From<DocumentError> for ValidationError {
    fn from(e: DocumentError) -> Self {
        match e {
            DocumentError::Parse(inner) => ValidationError::Parse(inner.to_string()),
            other => ValidationError::Parse(other.to_string()),
        }
    }
}

/// Read and validate the document at `path`.
pub fn validate_file(path: &Utf8Path) -> ValidationReport {
    match fs::read_to_string(path) {
        Ok(text) => validate_str(&text, path.as_str()),
        Err(e) => fail_report(
            path.as_str(),
            vec![],
            ValidationError::Io {
                path: path.to_string(),
                message: e.to_string(),
            },
        ),
    }
}

/// Validate document text; `label` names the document in the report.
pub fn validate_str(text: &str, label: &str) -> ValidationReport {
    let doc = match ConfigDocument::parse(text) {
        Ok(d) => d,
        Err(e) => return fail_report(label, vec![], e.into()),
    };

    let mut checks = vec!["json".to_string()];
    match run_checks(&doc, &mut checks) {
        Ok(platform) => {
            debug!(document = label, checks = checks.len(), "validation passed");
            ValidationReport {
                schema: cfgfix_types::schema::CFGFIX_VALIDATION_V1.to_string(),
                document: label.to_string(),
                verdict: Verdict::Pass,
                checks,
                platform: Some(platform),
                failure: None,
            }
        }
        Err(e) => fail_report(label, checks, e),
    }
}

fn fail_report(label: &str, checks: Vec<String>, e: ValidationError) -> ValidationReport {
    debug!(document = label, error = %e, "validation failed");
    ValidationReport {
        schema: cfgfix_types::schema::CFGFIX_VALIDATION_V1.to_string(),
        document: label.to_string(),
        verdict: Verdict::Fail,
        checks,
        platform: None,
        failure: Some(ValidationFailure {
            code: e.code(),
            message: e.to_string(),
        }),
    }
}

fn run_checks(doc: &ConfigDocument, passed: &mut Vec<String>) -> ValidationResult<PlatformInfo> {
    for section in REQUIRED_SECTIONS {
        match doc.section(section) {
            None => return Err(ValidationError::MissingSection(section.to_string())),
            Some(Value::Object(_)) => {}
            Some(other) => {
                return Err(ValidationError::InvalidType {
                    field: FieldPath::from(*section),
                    expected: "an object",
                    found: json_type_name(other),
                });
            }
        }
    }
    passed.push("sections".to_string());

    let name = non_empty_str(doc, &"platform.name".into())?;
    passed.push("platform.name".to_string());

    let version_path = FieldPath::from("platform.version");
    let version = non_empty_str(doc, &version_path)?;
    if !SEMVER.is_match(version) {
        return Err(ValidationError::invalid(
            &version_path,
            format!("'{version}' is not of the form MAJOR.MINOR.PATCH"),
        ));
    }
    passed.push("platform.version".to_string());

    let env_path = FieldPath::from("platform.environment");
    let environment: Environment = non_empty_str(doc, &env_path)?.parse().map_err(|e| {
        ValidationError::invalid(
            &env_path,
            format!("{e}; expected production, staging or development"),
        )
    })?;
    passed.push("platform.environment".to_string());

    let enabled_path = FieldPath::from("global.enabled");
    match doc.get(&enabled_path) {
        Some(Value::Bool(_)) => {}
        Some(other) => {
            return Err(ValidationError::InvalidType {
                field: enabled_path,
                expected: "a boolean",
                found: json_type_name(other),
            });
        }
        None => return Err(ValidationError::MissingField(enabled_path)),
    }
    passed.push("global.enabled".to_string());

    non_empty_str(doc, &"global.timezone".into())?;
    passed.push("global.timezone".to_string());

    if doc.has_section("authentication") {
        check_authentication(doc)?;
        passed.push("authentication".to_string());
    }
    if doc.has_section("api") {
        check_api(doc)?;
        passed.push("api".to_string());
    }
    if doc.has_section("logging") {
        check_logging(doc)?;
        passed.push("logging".to_string());
    }

    Ok(PlatformInfo {
        name: name.to_string(),
        version: version.to_string(),
        environment,
    })
}

fn check_authentication(doc: &ConfigDocument) -> ValidationResult<()> {
    let timeout_path = FieldPath::from("authentication.sessionTimeout");
    if let Some(timeout) = optional_number(doc, &timeout_path)?
        && timeout < MIN_SESSION_TIMEOUT
    {
        return Err(ValidationError::invalid(
            &timeout_path,
            format!("{timeout} is below the minimum of {MIN_SESSION_TIMEOUT} seconds"),
        ));
    }

    let attempts_path = FieldPath::from("authentication.maxLoginAttempts");
    if let Some(attempts) = optional_number(doc, &attempts_path)? {
        let whole = attempts.fract() == 0.0;
        if !whole || !LOGIN_ATTEMPTS.contains(&attempts) {
            return Err(ValidationError::invalid(
                &attempts_path,
                format!(
                    "{attempts} is not a whole number in {}..={}",
                    LOGIN_ATTEMPTS.start(),
                    LOGIN_ATTEMPTS.end()
                ),
            ));
        }
    }
    Ok(())
}

fn check_api(doc: &ConfigDocument) -> ValidationResult<()> {
    let url_path = FieldPath::from("api.baseUrl");
    let base = non_empty_str(doc, &url_path)?;
    Url::parse(base).map_err(|e| {
        ValidationError::invalid(&url_path, format!("'{base}' is not a valid URL ({e})"))
    })?;

    let timeout_path = FieldPath::from("api.timeout");
    if let Some(timeout) = optional_number(doc, &timeout_path)?
        && timeout < MIN_API_TIMEOUT
    {
        return Err(ValidationError::invalid(
            &timeout_path,
            format!("{timeout} is below the minimum of {MIN_API_TIMEOUT} ms"),
        ));
    }
    Ok(())
}

fn check_logging(doc: &ConfigDocument) -> ValidationResult<()> {
    let level_path = FieldPath::from("logging.level");
    let Some(v) = doc.get(&level_path) else {
        return Ok(());
    };
    let level = v.as_str().ok_or_else(|| ValidationError::InvalidType {
        field: level_path.clone(),
        expected: "a string",
        found: json_type_name(v),
    })?;
    level.parse::<LogLevel>().map_err(|e| {
        ValidationError::invalid(&level_path, format!("{e}; expected debug, info, warn or error"))
    })?;
    Ok(())
}

fn non_empty_str<'a>(doc: &'a ConfigDocument, path: &FieldPath) -> ValidationResult<&'a str> {
    match doc.get(path) {
        None | Some(Value::Null) => Err(ValidationError::MissingField(path.clone())),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(ValidationError::MissingField(path.clone()))
        }
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(ValidationError::InvalidType {
            field: path.clone(),
            expected: "a string",
            found: json_type_name(other),
        }),
    }
}

fn optional_number(doc: &ConfigDocument, path: &FieldPath) -> ValidationResult<Option<f64>> {
    match doc.get(path) {
        None => Ok(None),
        Some(v) => v.as_f64().map(Some).ok_or_else(|| ValidationError::InvalidType {
            field: path.clone(),
            expected: "a number",
            found: json_type_name(v),
        }),
    }
}
