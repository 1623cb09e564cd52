use serde::{Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;

use crate::StorageError;

/// Key/value backend holding JSON text, e.g. the browser's `localStorage`.
pub trait StoragePort {
    fn read(&self, key: &'static str) -> Result<Option<String>, StorageError>;

    fn write(&mut self, key: &'static str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &'static str) -> Result<(), StorageError>;
}

/// Names the storage slot a persisted type lives in.
pub trait StorageKey {
    const KEY: &'static str;
}

/// In-memory port, used by tests and when no browser storage is available.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStorage {
    entries: BTreeMap<&'static str, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl StoragePort for MemoryStorage {
    fn read(&self, key: &'static str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &'static str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key, value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &'static str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Result of reading one persisted value.
#[derive(Clone, Debug, PartialEq)]
pub enum Loaded<T> {
    Missing,
    Found(T),
    Corrupt,
}

impl<T> Loaded<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Missing | Self::Corrupt => None,
        }
    }

    pub const fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt)
    }
}

/// Typed JSON access on top of a [`StoragePort`].
#[derive(Clone, Debug)]
pub struct CalendarStore<P> {
    port: P,
}

impl<P: StoragePort> CalendarStore<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn load<T: StorageKey + DeserializeOwned>(&self) -> Loaded<T> {
        let raw = match self.port.read(T::KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Loaded::Missing,
            Err(err) => {
                log::warn!("{}", err);
                return Loaded::Corrupt;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Loaded::Found(value),
            Err(err) => {
                log::warn!("Discarding corrupt {}: {}", T::KEY, err);
                Loaded::Corrupt
            }
        }
    }

    pub fn load_or_default<T: StorageKey + DeserializeOwned + Default>(&self) -> T {
        self.load().found().unwrap_or_default()
    }

    pub fn save<T: StorageKey + Serialize>(&mut self, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|err| StorageError::Encode {
            key: T::KEY,
            reason: err.to_string(),
        })?;
        self.port.write(T::KEY, &raw)
    }

    pub fn clear<T: StorageKey>(&mut self) -> Result<(), StorageError> {
        self.port.remove(T::KEY)
    }
}
