use std::fmt;

use crate::modules::logs::{LogEntry, LogLevel, LogStore};
use crate::modules::settings::SmtpSettings;
use crate::DASHBOARD_ENTRIES;

/// How outgoing mail currently leaves the site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayStatus {
    Disabled,
    NotConfigured,
    Relaying { host: String, port: u16 },
}

impl fmt::Display for RelayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayStatus::Disabled => write!(f, "SMTP relay disabled"),
            RelayStatus::NotConfigured => write!(f, "SMTP enabled but not fully configured"),
            RelayStatus::Relaying { host, port } => write!(f, "Relaying via {}:{}", host, port),
        }
    }
}

/// Data for the dashboard widget
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub status: RelayStatus,
    pub error_count: usize,
    pub recent: Vec<LogEntry>,
}

pub fn summarize(settings: &SmtpSettings, logs: &LogStore) -> DashboardSummary {
    let status = if !settings.enabled {
        RelayStatus::Disabled
    } else if !settings.is_complete() {
        RelayStatus::NotConfigured
    } else {
        RelayStatus::Relaying {
            host: settings.host.clone(),
            port: settings.port,
        }
    };

    let entries = logs.list(None);
    let error_count = entries
        .iter()
        .filter(|entry| entry.level == LogLevel::Error)
        .count();

    DashboardSummary {
        status,
        error_count,
        recent: entries.into_iter().take(DASHBOARD_ENTRIES).collect(),
    }
}

impl fmt::Display for DashboardSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.status)?;
        writeln!(f, "Errors in log: {}", self.error_count)?;
        if self.recent.is_empty() {
            return write!(f, "No log entries yet.");
        }
        for entry in &self.recent {
            write!(f, "\n[{}] {:<7} {}", entry.time, entry.level.label(), entry.message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::logs::LogContext;
    use crate::modules::store::MemoryStore;

    fn relay_settings() -> SmtpSettings {
        let mut settings = SmtpSettings::defaults("Blog");
        settings.host = "smtp.example.com".to_string();
        settings.username = "relay".to_string();
        settings.password = "secret".to_string();
        settings
    }

    #[test]
    fn test_status_variants() {
        let options = MemoryStore::new();
        let logs = LogStore::new(&options);

        let mut disabled = relay_settings();
        disabled.enabled = false;
        assert_eq!(summarize(&disabled, &logs).status, RelayStatus::Disabled);

        let incomplete = SmtpSettings::defaults("Blog");
        assert_eq!(summarize(&incomplete, &logs).status, RelayStatus::NotConfigured);

        let summary = summarize(&relay_settings(), &logs);
        assert_eq!(summary.status.to_string(), "Relaying via smtp.example.com:587");
        assert!(summary.to_string().ends_with("No log entries yet."));
    }

    #[test]
    fn test_error_count_and_recent_entries() {
        let options = MemoryStore::new();
        let logs = LogStore::new(&options);

        for i in 0..8 {
            if i % 2 == 0 {
                logs.error(&format!("failure {}", i), LogContext::new());
            } else {
                logs.info(&format!("success {}", i), LogContext::new());
            }
        }

        let summary = summarize(&relay_settings(), &logs);
        assert_eq!(summary.error_count, 4);
        assert_eq!(summary.recent.len(), DASHBOARD_ENTRIES);
        assert_eq!(summary.recent[0].message, "success 7");

        let rendered = summary.to_string();
        assert!(rendered.contains("Errors in log: 4"));
        assert!(rendered.contains("success 7"));
        assert!(!rendered.contains("failure 0"));
    }
}
