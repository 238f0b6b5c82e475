use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Severity of a log entry
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }

    /// Capitalized label used when displaying entries
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Info => "Info",
            LogLevel::Warning => "Warning",
            LogLevel::Error => "Error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extra key/value details attached to an entry, in insertion order
pub type LogContext = Map<String, Value>;

/// A single recorded event
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub time: String,
    pub level: LogLevel,
    pub message: String,
    #[serde(default)]
    pub context: LogContext,
}

impl LogEntry {
    /// Render the scalar context values as `key: value | key: value`
    pub fn context_summary(&self) -> String {
        self.context
            .iter()
            .filter_map(|(key, value)| scalar_text(value).map(|text| format!("{}: {}", key, text)))
            .join(" | ")
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Build a context map from `(key, value)` pairs, keeping their order
pub fn context<K, V, I>(pairs: I) -> LogContext
where
    K: Into<String>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_keeps_insertion_order() {
        let ctx = context([("zeta", json!("z")), ("alpha", json!(1)), ("mid", json!(true))]);
        let keys: Vec<&String> = ctx.keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_context_summary_skips_non_scalars() {
        let entry = LogEntry {
            time: "2024-01-01 10:00:00".to_string(),
            level: LogLevel::Error,
            message: "Email sending failed from composer.".to_string(),
            context: context([
                ("to", json!("user@example.com")),
                ("nested", json!({"a": 1})),
                ("port", json!(587)),
                ("ok", json!(false)),
            ]),
        };
        assert_eq!(
            entry.context_summary(),
            "to: user@example.com | port: 587 | ok: false"
        );
    }

    #[test]
    fn test_entry_deserializes_without_context() {
        let entry: LogEntry = serde_json::from_value(json!({
            "time": "2024-01-01 10:00:00",
            "level": "warning",
            "message": "SMTP not fully configured"
        }))
        .unwrap();
        assert_eq!(entry.level, LogLevel::Warning);
        assert!(entry.context.is_empty());
        assert_eq!(entry.level.label(), "Warning");
    }
}
