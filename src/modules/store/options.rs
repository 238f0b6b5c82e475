use std::cell::RefCell;
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use log::warn;
use serde_json::{Map, Value};
use tempfile::NamedTempFile;

/// Key-value store holding the persisted records, one JSON value per key
pub trait OptionsStore {
    /// Fetch the value stored under `key`, if any
    fn get(&self, key: &str) -> Option<Value>;

    /// Store `value` under `key`, replacing what was there
    fn set(&self, key: &str, value: Value) -> Result<(), String>;

    /// Remove `key`; removing a missing key is not an error
    fn delete(&self, key: &str) -> Result<(), String>;
}

/// In-memory store, mostly useful for tests
#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<Map<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OptionsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) -> Result<(), String> {
        self.values.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), String> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk.
///
/// Every call re-reads the file, so two instances pointing at the same path
/// see each other's writes. There is no locking: concurrent writers race and
/// the last write wins.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // A missing or blank file is an empty store. A file that exists but
    // cannot be read as a JSON object is an error, so writers never replace it.
    fn load(&self) -> Result<Map<String, Value>, String> {
        let mut contents = String::new();
        match File::open(&self.path) {
            Ok(mut file) => file.read_to_string(&mut contents).map_err(|e| {
                format!("Failed to read options file {}: {}", self.path.display(), e)
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(format!(
                    "Failed to open options file {}: {}",
                    self.path.display(),
                    e
                ))
            }
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&contents) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(format!(
                "Options file {} does not hold a JSON object",
                self.path.display()
            )),
            Err(e) => Err(format!(
                "Failed to parse options file {}: {}",
                self.path.display(),
                e
            )),
        }
    }

    // Written to a temporary file beside the target, then renamed over it
    fn persist(&self, values: &Map<String, Value>) -> Result<(), String> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("Failed to create directory {}: {}", dir.display(), e))?;

        let data = serde_json::to_string_pretty(values)
            .map_err(|e| format!("Failed to serialize options: {}", e))?;

        let mut file = NamedTempFile::new_in(dir).map_err(|e| self.write_error(e))?;
        file.write_all(data.as_bytes())
            .and_then(|_| file.as_file().sync_all())
            .map_err(|e| self.write_error(e))?;
        file.persist(&self.path).map_err(|e| self.write_error(e))?;
        Ok(())
    }

    fn write_error(&self, e: impl fmt::Display) -> String {
        format!("Failed to write options file {}: {}", self.path.display(), e)
    }
}

impl OptionsStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        match self.load() {
            Ok(mut values) => values.remove(key),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: Value) -> Result<(), String> {
        let mut values = self.load()?;
        values.insert(key.to_string(), value);
        self.persist(&values)
    }

    fn delete(&self, key: &str) -> Result<(), String> {
        let mut values = self.load()?;
        if values.remove(key).is_none() {
            return Ok(());
        }
        self.persist(&values)
    }
}
