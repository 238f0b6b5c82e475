pub mod model;
pub mod store;

pub use model::{Encryption, SettingsForm, SmtpSettings};
pub use store::{merge_with_defaults, SettingsError, SettingsStore};
