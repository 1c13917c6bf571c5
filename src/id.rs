use std::{hash::Hash, sync::Arc};

use uuid::Uuid;

/// Opaque identifier of one running actor instance.
///
/// Assigned by the runtime when an actor starts and never reused. The
/// internal encoding belongs to the runtime; callers only get equality,
/// hashing and display.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActrId(Uuid);

impl ActrId {
    /// Mint a fresh identity. Called by runtime implementations at actor
    /// start; ids are never reused.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ActrId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Logical actor category used for discovery.
///
/// Many [`ActrId`]s may share one type. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActrType(Arc<str>);

impl ActrType {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    /// Derives a type tag from a Rust type name.
    pub fn of<T>() -> Self {
        Self(Arc::from(std::any::type_name::<T>()))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActrType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl std::fmt::Display for ActrType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
