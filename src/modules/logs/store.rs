use log::{error, warn};
use serde_json::Value;

use super::model::{LogContext, LogEntry, LogLevel};
use crate::modules::store::OptionsStore;
use crate::modules::utils::time::current_local_time;
use crate::{LOG_KEY, MAX_LOG_ENTRIES};

/// Rolling history of mail events, capped at `MAX_LOG_ENTRIES`
pub struct LogStore<'a> {
    options: &'a dyn OptionsStore,
}

impl<'a> LogStore<'a> {
    pub fn new(options: &'a dyn OptionsStore) -> Self {
        Self { options }
    }

    /// Append an entry stamped with the current local time.
    ///
    /// Oldest entries are dropped once the cap is exceeded. Stored items
    /// that `list` cannot read are written back untouched and count toward
    /// the cap. Storage failures only reach the operator log.
    pub fn append(&self, level: LogLevel, message: &str, context: LogContext) {
        let entry = LogEntry {
            time: current_local_time(),
            level,
            message: message.to_string(),
            context,
        };
        let entry = match serde_json::to_value(&entry) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to serialize log entry: {}", e);
                return;
            }
        };

        let mut items = self.stored_items();
        items.push(entry);
        if items.len() > MAX_LOG_ENTRIES {
            let excess = items.len() - MAX_LOG_ENTRIES;
            items.drain(..excess);
        }

        if let Err(e) = self.options.set(LOG_KEY, Value::Array(items)) {
            error!("Failed to store log entry: {}", e);
        }
    }

    pub fn info(&self, message: &str, context: LogContext) {
        self.append(LogLevel::Info, message, context);
    }

    pub fn warning(&self, message: &str, context: LogContext) {
        self.append(LogLevel::Warning, message, context);
    }

    pub fn error(&self, message: &str, context: LogContext) {
        self.append(LogLevel::Error, message, context);
    }

    /// Entries newest first, optionally limited to the first `limit`.
    /// Unreadable items are skipped.
    pub fn list(&self, limit: Option<usize>) -> Vec<LogEntry> {
        let mut entries = self.load();
        entries.reverse();
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        entries
    }

    /// Remove the whole history
    pub fn clear(&self) {
        if let Err(e) = self.options.delete(LOG_KEY) {
            error!("Failed to clear log entries: {}", e);
        }
    }

    // Raw items in stored order, oldest first
    fn stored_items(&self) -> Vec<Value> {
        match self.options.get(LOG_KEY) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        }
    }

    fn load(&self) -> Vec<LogEntry> {
        self.stored_items()
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable log entry: {}", e);
                    None
                }
            })
            .collect()
    }
}
