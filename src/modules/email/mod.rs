pub mod composer;
pub mod delivery;
pub mod mailer;
pub mod policy;
pub mod transport;

pub use composer::{compose, nl2br, parse_address_list, ComposeRequest};
pub use delivery::{DeliveryError, LettreDelivery, MailDelivery, MailHeader, OutgoingMail};
pub use mailer::{failure_context, Mailer};
pub use policy::{configure_transport, DispatchDecision, MailDispatchPolicy};
pub use transport::{default_sender, TransportConfig, TransportError};
