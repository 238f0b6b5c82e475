use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transport security requested for the SMTP connection
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Encryption {
    None,
    /// Implicit TLS from the first byte (usually port 465)
    Ssl,
    /// STARTTLS upgrade (usually port 587)
    #[default]
    Tls,
}

impl Encryption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encryption::None => "none",
            Encryption::Ssl => "ssl",
            Encryption::Tls => "tls",
        }
    }

    /// Security mode handed to the transport; `none` disables it entirely
    pub fn transport_mode(&self) -> &'static str {
        match self {
            Encryption::None => "",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Encryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encryption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Encryption::None),
            "ssl" => Ok(Encryption::Ssl),
            "tls" => Ok(Encryption::Tls),
            other => Err(format!("unknown encryption type: {}", other)),
        }
    }
}

/// Outgoing SMTP relay configuration, one record per installation
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
    pub encryption: Encryption,
    pub username: String,
    // Stored as plain text
    pub password: String,
    pub from_email: String,
    pub from_name: String,
}

impl SmtpSettings {
    /// Default record; the sender name falls back to the site display name
    pub fn defaults(site_name: &str) -> Self {
        Self {
            enabled: true,
            host: String::new(),
            port: crate::DEFAULT_SMTP_PORT,
            encryption: Encryption::Tls,
            username: String::new(),
            password: String::new(),
            from_email: String::new(),
            from_name: site_name.to_string(),
        }
    }

    /// True when host and credentials are all present. A host of only
    /// whitespace counts as missing.
    pub fn is_complete(&self) -> bool {
        !self.host.trim().is_empty() && !self.username.is_empty() && !self.password.is_empty()
    }
}

/// Raw values as submitted from the settings form.
///
/// Every field is text, the way a form delivers it; `enabled` is the
/// checkbox, present only when ticked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsForm {
    pub enabled: Option<String>,
    pub host: String,
    pub port: String,
    pub encryption: String,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
}

impl From<&SmtpSettings> for SettingsForm {
    /// Pre-fill the form with the current record
    fn from(settings: &SmtpSettings) -> Self {
        Self {
            enabled: settings.enabled.then(|| "1".to_string()),
            host: settings.host.clone(),
            port: settings.port.to_string(),
            encryption: settings.encryption.as_str().to_string(),
            username: settings.username.clone(),
            password: settings.password.clone(),
            from_email: settings.from_email.clone(),
            from_name: settings.from_name.clone(),
        }
    }
}
