use advent_core::{StorageError, StoragePort};
use gloo::storage::{LocalStorage, Storage};

/// [`StoragePort`] backed by the browser's `localStorage`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct BrowserStorage;

impl StoragePort for BrowserStorage {
    fn read(&self, key: &'static str) -> Result<Option<String>, StorageError> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|err| StorageError::Read {
                key,
                reason: format!("{:?}", err),
            })
    }

    fn write(&mut self, key: &'static str, value: &str) -> Result<(), StorageError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| StorageError::Write {
                key,
                reason: format!("{:?}", err),
            })
    }

    fn remove(&mut self, key: &'static str) -> Result<(), StorageError> {
        LocalStorage::raw()
            .remove_item(key)
            .map_err(|err| StorageError::Write {
                key,
                reason: format!("{:?}", err),
            })
    }
}
