//! Immutable operation-name to handler mapping.

use std::collections::HashMap;

use serde_json::{Map, Value};

use cadbridge_protocol::Success;

use crate::host::{HostError, HostModel};

use super::errors::{DispatchError, RegistrationError};
use super::operations;

/// Work ready to run on the host-safe context.
pub type PreparedCall = Box<dyn FnOnce(&mut dyn HostModel) -> Result<Success, HostError> + Send>;

/// Validates raw arguments and prepares the host call.
///
/// Handlers run on the socket thread and must not touch host state.
pub type Handler = fn(&Map<String, Value>) -> Result<PreparedCall, DispatchError>;

/// Read-only table of registered operations.
///
/// Built once at startup and shared between threads; lookups take no locks.
#[derive(Debug, Clone)]
pub struct DispatchTable {
    handlers: HashMap<&'static str, Handler>,
}

impl DispatchTable {
    /// Starts an empty table.
    #[must_use]
    pub fn builder() -> DispatchTableBuilder {
        DispatchTableBuilder::default()
    }

    /// Table holding every standard operation.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::Duplicate` if two standard handlers share
    /// a name.
    pub fn standard() -> Result<Self, RegistrationError> {
        Ok(operations::register_standard(Self::builder())?.build())
    }

    /// Looks up the handler for `operation`.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::UnknownOperation` naming the operation when
    /// nothing is registered under it.
    pub fn resolve(&self, operation: &str) -> Result<Handler, DispatchError> {
        self.handlers
            .get(operation)
            .copied()
            .ok_or_else(|| DispatchError::unknown_operation(operation))
    }

    /// Registered operation names in sorted order.
    #[must_use]
    pub fn operations(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Number of registered operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no operation is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Collects registrations for a [`DispatchTable`].
#[derive(Debug, Default)]
pub struct DispatchTableBuilder {
    handlers: HashMap<&'static str, Handler>,
}

impl DispatchTableBuilder {
    /// Registers `handler` under `operation`.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::Duplicate` when the name is taken.
    pub fn register(
        mut self,
        operation: &'static str,
        handler: Handler,
    ) -> Result<Self, RegistrationError> {
        if self.handlers.insert(operation, handler).is_some() {
            return Err(RegistrationError::Duplicate { operation });
        }
        Ok(self)
    }

    /// Freezes the registrations.
    #[must_use]
    pub fn build(self) -> DispatchTable {
        DispatchTable {
            handlers: self.handlers,
        }
    }
}
