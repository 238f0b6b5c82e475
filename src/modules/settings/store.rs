use serde_json::{Map, Value};

use super::model::{Encryption, SettingsForm, SmtpSettings};
use crate::modules::store::OptionsStore;
use crate::modules::utils::io::sanitize_email;
use crate::SETTINGS_KEY;

/// Errors raised while saving settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    InvalidPort,
    PortOutOfRange,
    InvalidEncryption,
    Storage(String),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::InvalidPort => write!(f, "port must be a positive number"),
            SettingsError::PortOutOfRange => write!(f, "port must not exceed 65535"),
            SettingsError::InvalidEncryption => write!(f, "invalid encryption type"),
            SettingsError::Storage(msg) => write!(f, "Failed to store settings: {}", msg),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Loads and saves the SMTP settings record
pub struct SettingsStore<'a> {
    options: &'a dyn OptionsStore,
    site_name: String,
}

impl<'a> SettingsStore<'a> {
    pub fn new(options: &'a dyn OptionsStore, site_name: &str) -> Self {
        Self {
            options,
            site_name: site_name.to_string(),
        }
    }

    pub fn defaults(&self) -> SmtpSettings {
        SmtpSettings::defaults(&self.site_name)
    }

    /// Current settings, with defaults filling anything missing from storage
    pub fn get(&self) -> SmtpSettings {
        match self.options.get(SETTINGS_KEY) {
            Some(Value::Object(stored)) => merge_with_defaults(self.defaults(), &stored),
            _ => self.defaults(),
        }
    }

    /// Validate the submitted form and persist it; nothing is written on error
    pub fn save(&self, form: &SettingsForm) -> Result<SmtpSettings, SettingsError> {
        let settings = validate(form)?;

        let value = serde_json::to_value(&settings)
            .map_err(|e| SettingsError::Storage(e.to_string()))?;
        self.options
            .set(SETTINGS_KEY, value)
            .map_err(SettingsError::Storage)?;

        Ok(settings)
    }
}

/// Turn raw form input into a settings record
pub fn validate(form: &SettingsForm) -> Result<SmtpSettings, SettingsError> {
    let port = parse_port(&form.port)?;
    let encryption = form
        .encryption
        .trim()
        .parse::<Encryption>()
        .map_err(|_| SettingsError::InvalidEncryption)?;

    Ok(SmtpSettings {
        enabled: form.enabled.as_deref().map_or(false, is_truthy),
        host: form.host.clone(),
        port,
        encryption,
        username: form.username.clone(),
        password: form.password.clone(),
        from_email: sanitize_email(&form.from_email),
        from_name: form.from_name.clone(),
    })
}

fn parse_port(raw: &str) -> Result<u16, SettingsError> {
    let port: i64 = raw.trim().parse().map_err(|_| SettingsError::InvalidPort)?;
    if port <= 0 {
        return Err(SettingsError::InvalidPort);
    }
    u16::try_from(port).map_err(|_| SettingsError::PortOutOfRange)
}

// A submitted checkbox is on unless its value is empty or "0"
fn is_truthy(value: &str) -> bool {
    !matches!(value.trim(), "" | "0")
}

/// Overlay stored values onto the default record field by field.
///
/// A stored field only wins when it is present and has a usable value;
/// anything else keeps the default, so older or hand-edited records load.
pub fn merge_with_defaults(defaults: SmtpSettings, stored: &Map<String, Value>) -> SmtpSettings {
    let text = |key: &str, fallback: String| -> String {
        match stored.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => fallback,
        }
    };

    let enabled = match stored.get("enabled") {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(defaults.enabled, |n| n != 0.0),
        Some(Value::String(s)) => is_truthy(s),
        Some(Value::Null) => false,
        _ => defaults.enabled,
    };

    let port = match stored.get("port") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
    .and_then(|p| u16::try_from(p).ok())
    .filter(|p| *p > 0)
    .unwrap_or(defaults.port);

    let encryption = stored
        .get("encryption")
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Encryption>().ok())
        .unwrap_or(defaults.encryption);

    SmtpSettings {
        enabled,
        host: text("host", defaults.host),
        port,
        encryption,
        username: text("username", defaults.username),
        password: text("password", defaults.password),
        from_email: text("from_email", defaults.from_email),
        from_name: text("from_name", defaults.from_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::store::{JsonFileStore, MemoryStore};
    use serde_json::json;

    fn complete_form() -> SettingsForm {
        SettingsForm {
            enabled: Some("1".to_string()),
            host: "smtp.example.com".to_string(),
            port: "465".to_string(),
            encryption: "ssl".to_string(),
            username: "mailer@example.com".to_string(),
            password: "s3cret-pass".to_string(),
            from_email: "noreply@example.com".to_string(),
            from_name: "Example Blog".to_string(),
        }
    }

    #[test]
    fn test_get_without_stored_data_returns_defaults() {
        let options = MemoryStore::new();
        let store = SettingsStore::new(&options, "Example Blog");
        assert_eq!(store.get(), SmtpSettings::defaults("Example Blog"));
    }

    #[test]
    fn test_get_fills_missing_fields_from_defaults() {
        let options = MemoryStore::new();
        options
            .set(SETTINGS_KEY, json!({"host": "mail.example.org", "port": 2525}))
            .unwrap();
        let store = SettingsStore::new(&options, "Example Blog");

        let settings = store.get();
        assert_eq!(settings.host, "mail.example.org");
        assert_eq!(settings.port, 2525);
        assert!(settings.enabled);
        assert_eq!(settings.encryption, Encryption::Tls);
        assert_eq!(settings.username, "");
        assert_eq!(settings.from_name, "Example Blog");
    }

    #[test]
    fn test_get_repairs_legacy_and_malformed_values() {
        let options = MemoryStore::new();
        options
            .set(
                SETTINGS_KEY,
                json!({
                    "enabled": 0,
                    "port": "25",
                    "encryption": "starttls",
                    "host": ["not", "a", "string"],
                    "unknown_key": "ignored"
                }),
            )
            .unwrap();
        let store = SettingsStore::new(&options, "Blog");

        let settings = store.get();
        assert!(!settings.enabled);
        assert_eq!(settings.port, 25);
        assert_eq!(settings.encryption, Encryption::Tls);
        assert_eq!(settings.host, "");
    }

    #[test]
    fn test_get_ignores_non_object_records() {
        let options = MemoryStore::new();
        options.set(SETTINGS_KEY, json!("garbage")).unwrap();
        let store = SettingsStore::new(&options, "Blog");
        assert_eq!(store.get(), SmtpSettings::defaults("Blog"));
    }

    #[test]
    fn test_save_then_get_round_trip() {
        let options = MemoryStore::new();
        let store = SettingsStore::new(&options, "Blog");

        let saved = store.save(&complete_form()).unwrap();
        assert_eq!(store.get(), saved);
        assert_eq!(saved.port, 465);
        assert_eq!(saved.encryption, Encryption::Ssl);
        assert_eq!(saved.password, "s3cret-pass");

        // Saving the form built from the record yields the same record
        let again = store.save(&SettingsForm::from(&saved)).unwrap();
        assert_eq!(again, saved);
        assert_eq!(store.get(), saved);
    }

    #[test]
    fn test_invalid_port_is_rejected_without_write() {
        let options = MemoryStore::new();
        let store = SettingsStore::new(&options, "Blog");
        let original = store.save(&complete_form()).unwrap();

        for bad_port in ["0", "-5", "abc", ""] {
            let mut form = complete_form();
            form.host = "other.example.com".to_string();
            form.port = bad_port.to_string();
            assert_eq!(store.save(&form), Err(SettingsError::InvalidPort));
            assert_eq!(store.get(), original);
        }

        let mut form = complete_form();
        form.port = "70000".to_string();
        assert_eq!(store.save(&form), Err(SettingsError::PortOutOfRange));
        assert_eq!(store.get(), original);
    }

    #[test]
    fn test_invalid_encryption_is_rejected_without_write() {
        let options = MemoryStore::new();
        let store = SettingsStore::new(&options, "Blog");

        let mut form = complete_form();
        form.encryption = "rot13".to_string();
        let err = store.save(&form).unwrap_err();
        assert_eq!(err, SettingsError::InvalidEncryption);
        assert_eq!(err.to_string(), "invalid encryption type");
        assert!(options.get(SETTINGS_KEY).is_none());
    }

    #[test]
    fn test_invalid_from_email_is_coerced_to_empty() {
        let options = MemoryStore::new();
        let store = SettingsStore::new(&options, "Blog");

        let mut form = complete_form();
        form.from_email = "not an address".to_string();
        let saved = store.save(&form).unwrap();
        assert_eq!(saved.from_email, "");
    }

    #[test]
    fn test_enabled_checkbox_semantics() {
        let options = MemoryStore::new();
        let store = SettingsStore::new(&options, "Blog");

        let mut form = complete_form();
        form.enabled = None;
        assert!(!store.save(&form).unwrap().enabled);

        form.enabled = Some("on".to_string());
        assert!(store.save(&form).unwrap().enabled);

        form.enabled = Some("0".to_string());
        assert!(!store.save(&form).unwrap().enabled);

        for spelled_out in ["off", "no", "false", "yes"] {
            form.enabled = Some(spelled_out.to_string());
            assert!(store.save(&form).unwrap().enabled, "{}", spelled_out);
        }

        form.enabled = Some(" ".to_string());
        assert!(!store.save(&form).unwrap().enabled);
    }

    #[test]
    fn test_save_reports_damaged_options_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, "{\"wpsmtp_settings\": {\"host\": \"smtp.exa").unwrap();

        let options = JsonFileStore::new(&path);
        let store = SettingsStore::new(&options, "Blog");

        let err = store.save(&complete_form()).unwrap_err();
        assert!(matches!(err, SettingsError::Storage(_)));
        assert!(err.to_string().starts_with("Failed to store settings: "));
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\"wpsmtp_settings\": {\"host\": \"smtp.exa"
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SettingsError::InvalidPort.to_string(),
            "port must be a positive number"
        );
        assert_eq!(
            SettingsError::Storage("disk full".to_string()).to_string(),
            "Failed to store settings: disk full"
        );
    }
}
