use lettre::message::Mailbox;
use log::{error, info};
use serde_json::Value;

use super::delivery::{DeliveryError, MailDelivery, OutgoingMail};
use super::policy::MailDispatchPolicy;
use super::transport::TransportConfig;
use crate::modules::logs::{LogContext, LogStore};
use crate::modules::settings::SettingsStore;

/// Sends mail using the stored relay settings
pub struct Mailer<'a, D: MailDelivery> {
    settings: &'a SettingsStore<'a>,
    logs: &'a LogStore<'a>,
    delivery: D,
    default_from: Mailbox,
}

impl<'a, D: MailDelivery> Mailer<'a, D> {
    pub fn new(
        settings: &'a SettingsStore<'a>,
        logs: &'a LogStore<'a>,
        delivery: D,
        default_from: Mailbox,
    ) -> Self {
        Self {
            settings,
            logs,
            delivery,
            default_from,
        }
    }

    pub fn delivery(&self) -> &D {
        &self.delivery
    }

    /// Configure a fresh transport for this message and hand it to the
    /// delivery layer. Returns whether delivery succeeded; failures are
    /// recorded through `on_failure`.
    pub fn send(&self, mail: &OutgoingMail) -> bool {
        let settings = self.settings.get();
        let mut transport = TransportConfig::new(self.default_from.clone());
        MailDispatchPolicy::new(self.logs).apply(&settings, &mut transport);

        match self.delivery.deliver(mail, &transport) {
            Ok(()) => {
                info!("Message delivered via {}:{}", transport.host, transport.port);
                true
            }
            Err(e) => {
                self.on_failure(&e);
                false
            }
        }
    }

    /// Failure callback for the delivery layer
    pub fn on_failure(&self, err: &DeliveryError) {
        error!("Mail delivery failed: {}", err.message);
        self.logs.error(&err.message, failure_context(err.data.as_ref()));
    }
}

/// Normalize delivery failure data into a log context.
///
/// Objects keep their keys, with nested values flattened to JSON text;
/// any other value is wrapped under `raw_data`.
pub fn failure_context(data: Option<&Value>) -> LogContext {
    let mut context = LogContext::new();
    match data {
        None | Some(Value::Null) => {}
        Some(Value::Object(map)) => {
            for (key, value) in map {
                context.insert(key.clone(), flatten(value));
            }
        }
        Some(other) => {
            context.insert("raw_data".to_string(), flatten(other));
        }
    }
    context
}

fn flatten(value: &Value) -> Value {
    match value {
        Value::Array(_) | Value::Object(_) => Value::String(value.to_string()),
        scalar => scalar.clone(),
    }
}
