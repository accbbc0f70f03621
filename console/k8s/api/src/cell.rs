use crate::{core, Time};
use chrono::{DateTime, Utc};
use kube::Resource;
use std::marker::PhantomData;

/// A typed Kubernetes object viewed as a selection cell.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceCell<K>(K);

/// Converts snapshots of the typed resource `K` into cells.
///
/// The inverse conversion is checked by the type system, so it never fails.
pub struct KubeCells<K>(PhantomData<fn() -> K>);

// === impl ResourceCell ===

impl<K> ResourceCell<K> {
    pub fn new(resource: K) -> Self {
        Self(resource)
    }

    pub fn get_ref(&self) -> &K {
        &self.0
    }

    pub fn into_inner(self) -> K {
        self.0
    }
}

impl<K: Resource> core::Cell for ResourceCell<K> {
    fn name(&self) -> &str {
        self.0.meta().name.as_deref().unwrap_or_default()
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.0.meta().creation_timestamp.as_ref().map(|Time(ts)| *ts)
    }
}

// === impl KubeCells ===

impl<K> KubeCells<K> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<K> Default for KubeCells<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Clone for KubeCells<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for KubeCells<K> {}

impl<K> std::fmt::Debug for KubeCells<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("KubeCells")
            .field(&std::any::type_name::<K>())
            .finish()
    }
}

impl<K: Resource> core::Adapter for KubeCells<K> {
    type Resource = K;
    type Cell = ResourceCell<K>;

    #[inline]
    fn to_cell(&self, resource: K) -> ResourceCell<K> {
        ResourceCell(resource)
    }

    #[inline]
    fn from_cell(
        &self,
        ResourceCell(resource): ResourceCell<K>,
    ) -> Result<K, core::ConversionError> {
        Ok(resource)
    }
}
