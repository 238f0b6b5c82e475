use log::{debug, warn};
use serde_json::json;

use super::transport::{TransportConfig, TransportError};
use crate::modules::logs::{context, LogContext, LogStore};
use crate::modules::settings::SmtpSettings;

/// What the policy did with the transport for one outgoing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchDecision {
    /// SMTP relay disabled; transport left at its default
    Disabled,
    /// Host or credentials missing; transport left at its default
    Incomplete,
    /// Relay settings applied
    Applied,
    /// Applying the settings failed; transport left at its default
    Failed(TransportError),
}

/// Decides, per outgoing message, whether and how the relay is used
pub struct MailDispatchPolicy<'a> {
    logs: &'a LogStore<'a>,
}

impl<'a> MailDispatchPolicy<'a> {
    pub fn new(logs: &'a LogStore<'a>) -> Self {
        Self { logs }
    }

    /// Apply `settings` to `transport`, recording the outcome in the log.
    /// Never fails; errors become log entries.
    pub fn apply(
        &self,
        settings: &SmtpSettings,
        transport: &mut TransportConfig,
    ) -> DispatchDecision {
        if !settings.enabled {
            debug!("SMTP relay disabled, using the default transport");
            return DispatchDecision::Disabled;
        }

        if !settings.is_complete() {
            self.logs.warning(
                "SMTP not fully configured (missing host/username/password).",
                LogContext::new(),
            );
            return DispatchDecision::Incomplete;
        }

        match configure_transport(settings, transport) {
            Ok(()) => {
                self.logs.info(
                    "SMTP configuration applied for outgoing email.",
                    context([
                        ("host", json!(settings.host)),
                        ("port", json!(settings.port)),
                        ("encryption", json!(settings.encryption.as_str())),
                        (
                            "username",
                            json!(if settings.username.is_empty() { "[empty]" } else { "[set]" }),
                        ),
                    ]),
                );
                DispatchDecision::Applied
            }
            Err(e) => {
                warn!("Failed to apply SMTP configuration: {}", e);
                self.logs.error(
                    &format!("SMTP configuration could not be applied: {}", e),
                    context([("error", json!(e.to_string()))]),
                );
                DispatchDecision::Failed(e)
            }
        }
    }
}

/// Map the settings onto the transport. The transport is only updated when
/// every step succeeds.
pub fn configure_transport(
    settings: &SmtpSettings,
    transport: &mut TransportConfig,
) -> Result<(), TransportError> {
    let host = &settings.host;
    if host.is_empty() || host.chars().any(char::is_whitespace) {
        return Err(TransportError::InvalidHost(host.clone()));
    }

    let mut configured = transport.clone();
    configured.use_smtp();
    configured.host = host.clone();
    configured.smtp_auth = true;
    configured.port = settings.port;
    configured.username = settings.username.clone();
    configured.password = settings.password.clone();
    configured.smtp_secure = settings.encryption.transport_mode().to_string();

    if !settings.from_email.is_empty() {
        configured.set_from(&settings.from_email, &settings.from_name)?;
    }

    *transport = configured;
    Ok(())
}
