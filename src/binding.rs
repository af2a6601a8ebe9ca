use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::models::{FieldDescriptor, FieldValue};

/// Behaviour a rendered field reports back to its host.
///
/// Descriptors stay plain data; a presentation layer supplies one
/// implementation per rendered form and binds it with [`BoundField`].
pub trait FieldHandlers: Send + Sync {
    fn on_change(&self, name: &str, value: &FieldValue);
    fn on_select(&self, name: &str, value: &FieldValue);
    fn set_value(&self, name: &str, value: &FieldValue);
}

/// Handlers that ignore every call. Used where no UI context exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandlers;

impl FieldHandlers for NoopHandlers {
    fn on_change(&self, _name: &str, _value: &FieldValue) {}
    fn on_select(&self, _name: &str, _value: &FieldValue) {}
    fn set_value(&self, _name: &str, _value: &FieldValue) {}
}

/// A descriptor paired with live handlers.
///
/// Serializes as the bare descriptor; handlers never reach the wire.
#[derive(Clone)]
pub struct BoundField {
    pub descriptor: FieldDescriptor,
    handlers: Arc<dyn FieldHandlers>,
}

impl BoundField {
    pub fn new(descriptor: FieldDescriptor, handlers: Arc<dyn FieldHandlers>) -> Self {
        Self { descriptor, handlers }
    }

    pub fn noop(descriptor: FieldDescriptor) -> Self {
        Self::new(descriptor, Arc::new(NoopHandlers))
    }

    pub fn change(&self, value: &FieldValue) {
        self.handlers.on_change(&self.descriptor.name, value);
    }

    pub fn select(&self, value: &FieldValue) {
        self.handlers.on_select(&self.descriptor.name, value);
    }

    pub fn set_value(&self, value: &FieldValue) {
        self.handlers.set_value(&self.descriptor.name, value);
    }

    pub fn into_descriptor(self) -> FieldDescriptor {
        self.descriptor
    }
}

impl fmt::Debug for BoundField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundField")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl Serialize for BoundField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.descriptor.serialize(serializer)
    }
}
