use lettre::message::Mailbox;
use lettre::Address;

/// Errors raised while configuring the outgoing transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    InvalidSender(String),
    InvalidHost(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::InvalidSender(msg) => write!(f, "Invalid from address: {}", msg),
            TransportError::InvalidHost(msg) => write!(f, "Invalid SMTP host: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

/// Mutable description of how the next message leaves the machine.
///
/// A fresh value starts in the environment default mode: no SMTP relay,
/// the local MTA, and the installation's default sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub is_smtp: bool,
    pub host: String,
    pub smtp_auth: bool,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// `""` (disabled), `"ssl"` or `"tls"`
    pub smtp_secure: String,
    pub from: Mailbox,
}

impl TransportConfig {
    pub fn new(default_from: Mailbox) -> Self {
        Self {
            is_smtp: false,
            host: "localhost".to_string(),
            smtp_auth: false,
            port: 25,
            username: String::new(),
            password: String::new(),
            smtp_secure: String::new(),
            from: default_from,
        }
    }

    /// Switch to SMTP relay mode
    pub fn use_smtp(&mut self) {
        self.is_smtp = true;
    }

    /// Set the sender identity shown to recipients
    pub fn set_from(&mut self, email: &str, name: &str) -> Result<(), TransportError> {
        let address = email
            .trim()
            .parse::<Address>()
            .map_err(|e| TransportError::InvalidSender(format!("{} ({})", email, e)))?;
        let name = name.trim();
        self.from = Mailbox::new((!name.is_empty()).then(|| name.to_string()), address);
        Ok(())
    }
}

/// Sender used until the dispatch policy sets one from the settings
pub fn default_sender(address: &str, site_name: &str) -> Result<Mailbox, TransportError> {
    let address = address
        .trim()
        .parse::<Address>()
        .map_err(|e| TransportError::InvalidSender(format!("{} ({})", address, e)))?;
    let name = site_name.trim();
    Ok(Mailbox::new((!name.is_empty()).then(|| name.to_string()), address))
}
