use serde_json::json;
use std::fmt;

use crate::modules::email::{compose, ComposeRequest, MailDelivery, Mailer};
use crate::modules::logs::{context, LogEntry, LogStore};
use crate::modules::settings::{SettingsForm, SettingsStore};
use crate::modules::utils::logging::log_mail_event;
use crate::LOG_DISPLAY_LIMIT;

/// Feedback shown to the administrator after an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Success(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Success(msg) | Notice::Error(msg) => f.write_str(msg),
        }
    }
}

/// Handlers behind the settings page: save, send and clear
pub struct AdminActions<'a, D: MailDelivery> {
    settings: &'a SettingsStore<'a>,
    logs: &'a LogStore<'a>,
    mailer: &'a Mailer<'a, D>,
}

impl<'a, D: MailDelivery> AdminActions<'a, D> {
    pub fn new(
        settings: &'a SettingsStore<'a>,
        logs: &'a LogStore<'a>,
        mailer: &'a Mailer<'a, D>,
    ) -> Self {
        Self {
            settings,
            logs,
            mailer,
        }
    }

    /// Validate and store the submitted settings
    pub fn save_settings(&self, form: &SettingsForm) -> Notice {
        match self.settings.save(form) {
            Ok(saved) => {
                self.logs.info(
                    "SMTP settings updated via admin UI.",
                    context([
                        ("host", json!(saved.host)),
                        ("port", json!(saved.port)),
                        ("encryption", json!(saved.encryption.as_str())),
                        ("enabled", json!(saved.enabled)),
                    ]),
                );
                Notice::Success("SMTP settings saved.".to_string())
            }
            Err(e) => Notice::Error(capitalize(&e.to_string())),
        }
    }

    /// Send an ad-hoc message and record the outcome
    pub fn send_email(&self, request: &ComposeRequest) -> Notice {
        let mail = match compose(request) {
            Ok(mail) => mail,
            Err(e) => return Notice::Error(e),
        };

        let sent = self.mailer.send(&mail);
        let details = context([("to", json!(mail.to)), ("subject", json!(mail.subject))]);

        if sent {
            log_mail_event("composer", &mail.to, true, None);
            self.logs.info("Email sent successfully from composer.", details);
            Notice::Success(format!("Email sent to {}.", mail.to))
        } else {
            log_mail_event("composer", &mail.to, false, Some("delivery failed"));
            self.logs.error("Email sending failed from composer.", details);
            Notice::Error("Email failed. Check logs for more details.".to_string())
        }
    }

    pub fn clear_logs(&self) -> Notice {
        self.logs.clear();
        Notice::Success("Logs cleared.".to_string())
    }

    /// Entries shown on the settings page, newest first
    pub fn recent_logs(&self) -> Vec<LogEntry> {
        self.logs.list(Some(LOG_DISPLAY_LIMIT))
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>() + ".",
        None => String::new(),
    }
}
