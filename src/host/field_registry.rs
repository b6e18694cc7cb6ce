//! Field registry: string keys mapped to JSON construction entry points.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use serde_json::Value;
use thiserror::Error;

use crate::fields::text_field::TextField;
use crate::fields::FieldError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("field type `{0}` is already registered")]
    Duplicate(String),
    #[error("field type `{0}` is not registered")]
    Unknown(String),
    #[error(transparent)]
    Field(#[from] FieldError),
}

/// JSON construction entry point for one field type.
pub type FieldCtor = Box<dyn Fn(&Value) -> Result<TextField, FieldError> + Send>;

#[derive(Default)]
pub struct FieldRegistry {
    ctors: HashMap<String, FieldCtor>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a field type. Registering the same key twice is an
    /// integration error and is reported, not absorbed.
    pub fn register(&mut self, key: &str, ctor: FieldCtor) -> Result<(), RegistryError> {
        if self.ctors.contains_key(key) {
            return Err(RegistryError::Duplicate(key.to_string()));
        }
        self.ctors.insert(key.to_string(), ctor);
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.ctors.contains_key(key)
    }

    /// Builds a field instance from its JSON options.
    pub fn create(&self, key: &str, options: &Value) -> Result<TextField, RegistryError> {
        let ctor = self
            .ctors
            .get(key)
            .ok_or_else(|| RegistryError::Unknown(key.to_string()))?;
        Ok(ctor(options)?)
    }
}

static GLOBAL_FIELD_REGISTRY: OnceLock<Arc<Mutex<FieldRegistry>>> = OnceLock::new();

/// Process-wide registry handle. Core logic should take a registry reference
/// as a parameter; this accessor exists for host wiring at load time.
pub fn field_registry() -> Arc<Mutex<FieldRegistry>> {
    GLOBAL_FIELD_REGISTRY
        .get_or_init(|| Arc::new(Mutex::new(FieldRegistry::new())))
        .clone()
}
