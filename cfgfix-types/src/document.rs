//! In-memory model of the platform configuration document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Sections every document must carry.
pub const REQUIRED_SECTIONS: &[&str] = &["platform", "global"];

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("document root must be a JSON object, found {found}")]
    NotAnObject { found: &'static str },

    #[error("cannot descend into `{path}`: it is {found}, not an object")]
    NotAContainer { path: FieldPath, found: &'static str },

    #[error("empty field path")]
    EmptyPath,
}

/// Dotted path to a field, e.g. `security.enableSSL`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FieldPath(Vec<String>);

impl FieldPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for FieldPath {
    fn from(dotted: &str) -> Self {
        Self(
            dotted
                .split('.')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

impl From<String> for FieldPath {
    fn from(dotted: String) -> Self {
        FieldPath::from(dotted.as_str())
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Deployment environment declared by `platform.environment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Production,
    Staging,
    Development,
}

impl Environment {
    pub const ALL: [Environment; 3] = [
        Environment::Production,
        Environment::Staging,
        Environment::Development,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Production => "production",
            Environment::Staging => "staging",
            Environment::Development => "development",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Environment::ALL
            .into_iter()
            .find(|e| e.as_str() == s)
            .ok_or_else(|| format!("unknown environment '{s}'"))
    }
}

/// Logging level accepted by `logging.level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| format!("unknown log level '{s}'"))
    }
}

/// The configuration document: a JSON object of named sections.
///
/// Key order is preserved, so a rewritten document only differs from the
/// original where a fix changed it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    root: Map<String, Value>,
}

impl ConfigDocument {
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(DocumentError::NotAnObject {
                found: json_type_name(&other),
            }),
        }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// Pretty JSON with a trailing newline, the on-disk form.
    pub fn to_pretty_string(&self) -> Result<String, DocumentError> {
        let mut out = serde_json::to_string_pretty(&self.root)?;
        out.push('\n');
        Ok(out)
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.root.contains_key(name)
    }

    pub fn section(&self, name: &str) -> Option<&Value> {
        self.root.get(name)
    }

    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        let (first, rest) = path.segments().split_first()?;
        let mut cur = self.root.get(first)?;
        for seg in rest {
            cur = cur.as_object()?.get(seg)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, path: &FieldPath) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn get_bool(&self, path: &FieldPath) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    /// The declared environment, if present and recognised.
    pub fn environment(&self) -> Option<Environment> {
        self.get_str(&FieldPath::from("platform.environment"))
            .and_then(|s| s.parse().ok())
    }

    /// Set `path` to `value`, creating missing intermediate objects.
    ///
    /// Returns the previous value, if any.
    pub fn set(&mut self, path: &FieldPath, value: Value) -> Result<Option<Value>, DocumentError> {
        let (last, parents) = path.segments().split_last().ok_or(DocumentError::EmptyPath)?;
        let container = self.container_mut(parents)?;
        Ok(container.insert(last.clone(), value))
    }

    /// Make sure an object exists at `path`. Returns true when one was created.
    pub fn ensure_object(&mut self, path: &FieldPath) -> Result<bool, DocumentError> {
        let (last, parents) = path.segments().split_last().ok_or(DocumentError::EmptyPath)?;
        let container = self.container_mut(parents)?;
        match container.get(last) {
            Some(Value::Object(_)) => Ok(false),
            Some(other) => Err(DocumentError::NotAContainer {
                path: path.clone(),
                found: json_type_name(other),
            }),
            None => {
                container.insert(last.clone(), Value::Object(Map::new()));
                Ok(true)
            }
        }
    }

    fn container_mut(
        &mut self,
        segments: &[String],
    ) -> Result<&mut Map<String, Value>, DocumentError> {
        let mut cur = &mut self.root;
        for (i, seg) in segments.iter().enumerate() {
            let entry = cur
                .entry(seg.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            let found = json_type_name(entry);
            cur = entry.as_object_mut().ok_or_else(|| DocumentError::NotAContainer {
                path: FieldPath::new(segments[..=i].iter().cloned()),
                found,
            })?;
        }
        Ok(cur)
    }
}

/// Human name of a JSON value's type, for error messages.
pub fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
