use std::fmt;
use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};
use serde_json::{json, Value};

use super::transport::TransportConfig;

/// Extra header attached to an outgoing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailHeader {
    Cc(Vec<String>),
    Bcc(Vec<String>),
}

impl fmt::Display for MailHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailHeader::Cc(addresses) => write!(f, "Cc: {}", addresses.join(", ")),
            MailHeader::Bcc(addresses) => write!(f, "Bcc: {}", addresses.join(", ")),
        }
    }
}

/// A message ready to hand to the delivery layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub headers: Vec<MailHeader>,
}

/// Failure reported by the delivery layer, with optional structured details
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryError {
    pub message: String,
    pub data: Option<Value>,
}

impl DeliveryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for DeliveryError {}

/// Sends a message through a configured transport
pub trait MailDelivery {
    fn deliver(
        &self,
        mail: &OutgoingMail,
        transport: &TransportConfig,
    ) -> Result<(), DeliveryError>;
}

/// Delivery over SMTP using lettre
pub struct LettreDelivery {
    timeout: Duration,
}

impl Default for LettreDelivery {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }
}

impl LettreDelivery {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn build_transport(&self, transport: &TransportConfig) -> Result<SmtpTransport, DeliveryError> {
        // Outside SMTP mode the message goes to the local MTA
        if !transport.is_smtp {
            return Ok(SmtpTransport::builder_dangerous("localhost")
                .port(25)
                .timeout(Some(self.timeout))
                .build());
        }

        let tls = match transport.smtp_secure.as_str() {
            "" => Tls::None,
            mode => {
                let parameters = TlsParameters::new(transport.host.clone()).map_err(|e| {
                    DeliveryError::new(format!("Failed to build TLS parameters: {}", e))
                })?;
                if mode == "ssl" {
                    Tls::Wrapper(parameters)
                } else {
                    Tls::Required(parameters)
                }
            }
        };

        let mut builder = SmtpTransport::builder_dangerous(transport.host.as_str())
            .port(transport.port)
            .tls(tls)
            .timeout(Some(self.timeout));

        if transport.smtp_auth {
            builder = builder.credentials(Credentials::new(
                transport.username.clone(),
                transport.password.clone(),
            ));
        }

        Ok(builder.build())
    }
}

/// Assemble the MIME message for `mail` as an HTML email
pub fn build_message(mail: &OutgoingMail, from: &Mailbox) -> Result<Message, DeliveryError> {
    let invalid = |field: &str, reason: String| {
        DeliveryError::new(format!("Invalid {} address: {}", field, reason)).with_data(json!({
            "to": mail.to,
            "subject": mail.subject,
        }))
    };

    let mut builder = Message::builder()
        .from(from.clone())
        .to(mail.to.parse::<Mailbox>().map_err(|e| invalid("to", e.to_string()))?)
        .subject(mail.subject.as_str());

    for header in &mail.headers {
        match header {
            MailHeader::Cc(addresses) => {
                for address in addresses {
                    let mailbox = address
                        .parse::<Mailbox>()
                        .map_err(|e| invalid("cc", e.to_string()))?;
                    builder = builder.cc(mailbox);
                }
            }
            MailHeader::Bcc(addresses) => {
                for address in addresses {
                    let mailbox = address
                        .parse::<Mailbox>()
                        .map_err(|e| invalid("bcc", e.to_string()))?;
                    builder = builder.bcc(mailbox);
                }
            }
        }
    }

    builder
        .header(ContentType::TEXT_HTML)
        .body(mail.html_body.clone())
        .map_err(|e| DeliveryError::new(format!("Failed to create email: {}", e)))
}

impl MailDelivery for LettreDelivery {
    fn deliver(
        &self,
        mail: &OutgoingMail,
        transport: &TransportConfig,
    ) -> Result<(), DeliveryError> {
        let message = build_message(mail, &transport.from)?;
        let mailer = self.build_transport(transport)?;

        mailer.send(&message).map(|_| ()).map_err(|e| {
            let mut data = json!({
                "to": mail.to,
                "subject": mail.subject,
                "host": transport.host,
                "port": transport.port,
            });
            if let Some(code) = e.status() {
                data["smtp_code"] = json!(code.to_string());
            }
            DeliveryError::new(format!("SMTP Error: {}", e)).with_data(data)
        })
    }
}
