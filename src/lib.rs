// First, declare the modules folder itself
mod modules;

// Re-export everything from modules for easier access
pub use modules::{admin, config, email, logs, settings, store, utils};

// Re-export commonly used types
pub use modules::admin::AdminActions;
pub use modules::config::AppConfig;
pub use modules::email::{LettreDelivery, MailDispatchPolicy, Mailer};
pub use modules::logs::{LogEntry, LogLevel, LogStore};
pub use modules::settings::{SettingsStore, SmtpSettings};
pub use modules::store::{JsonFileStore, MemoryStore, OptionsStore};

// Storage keys
pub const SETTINGS_KEY: &str = "wpsmtp_settings";
pub const LOG_KEY: &str = "wpsmtp_logs";

// Constants
pub const OPTIONS_FILE: &str = "smtp_mailer_options.json";
pub const DEFAULT_SITE_NAME: &str = "SMTP Mailer";
pub const DEFAULT_FROM_ADDRESS: &str = "mailer@localhost";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const MAX_LOG_ENTRIES: usize = 50;
pub const LOG_DISPLAY_LIMIT: usize = 25;
pub const DASHBOARD_ENTRIES: usize = 5;
