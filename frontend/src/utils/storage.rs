//! Key/value persistence for client state.
//!
//! The browser build stores values in `localStorage`; host builds (tests,
//! tooling) keep them in memory.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use leavedesk_workflow::{WorkflowError, WorkflowResult};

pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> WorkflowResult<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> WorkflowResult<()>;

    fn remove_item(&self, key: &str) -> WorkflowResult<()>;
}

#[derive(Clone, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> WorkflowResult<Option<String>> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> WorkflowResult<()> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> WorkflowResult<()> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::{local_storage, window, LocalStorage};

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::KeyValueStorage;
    use leavedesk_workflow::{WorkflowError, WorkflowResult};
    use web_sys::{Storage, Window};

    pub fn window() -> WorkflowResult<Window> {
        web_sys::window().ok_or_else(|| WorkflowError::State("No window object".to_string()))
    }

    pub fn local_storage() -> WorkflowResult<Storage> {
        window()?
            .local_storage()
            .map_err(|_| WorkflowError::State("No localStorage".to_string()))?
            .ok_or_else(|| WorkflowError::State("No localStorage".to_string()))
    }

    #[derive(Clone, Copy, Default)]
    pub struct LocalStorage;

    impl KeyValueStorage for LocalStorage {
        fn get_item(&self, key: &str) -> WorkflowResult<Option<String>> {
            local_storage()?
                .get_item(key)
                .map_err(|_| WorkflowError::State(format!("Failed to read {}", key)))
        }

        fn set_item(&self, key: &str, value: &str) -> WorkflowResult<()> {
            local_storage()?
                .set_item(key, value)
                .map_err(|_| WorkflowError::State(format!("Failed to write {}", key)))
        }

        fn remove_item(&self, key: &str) -> WorkflowResult<()> {
            local_storage()?
                .remove_item(key)
                .map_err(|_| WorkflowError::State(format!("Failed to remove {}", key)))
        }
    }
}

/// Storage for the current build target.
pub fn default_storage() -> Rc<dyn KeyValueStorage> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(LocalStorage)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(MemoryStorage::new())
    }
}

/// Reads a JSON value, dropping entries that no longer parse.
pub fn read_json<T: serde::de::DeserializeOwned>(
    storage: &dyn KeyValueStorage,
    key: &str,
) -> WorkflowResult<Option<T>> {
    let Some(raw) = storage.get_item(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            log::warn!("discarding unreadable {}: {}", key, err);
            storage.remove_item(key)?;
            Ok(None)
        }
    }
}

pub fn write_json<T: serde::Serialize>(
    storage: &dyn KeyValueStorage,
    key: &str,
    value: &T,
) -> WorkflowResult<()> {
    let raw = serde_json::to_string(value)
        .map_err(|err| WorkflowError::State(format!("Failed to serialize {}: {}", key, err)))?;
    storage.set_item(key, &raw)
}
