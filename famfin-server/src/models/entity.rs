//! Shared shape of every table-backed resource

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A storage-assigned-identity resource with a create payload and a
/// changeset type.
pub trait Entity: Clone + Serialize + Send + Sync + 'static {
    /// Human name used in not-found messages ("Account").
    const KIND: &'static str;

    /// URL path segment and table name ("accounts").
    const COLLECTION: &'static str;

    /// Validated creation payload.
    type New: DeserializeOwned + Send + 'static;

    /// Validated changeset.
    type Patch: DeserializeOwned + Send + 'static;

    fn id(&self) -> i64;

    /// Build the stored entity from its creation payload and assigned id.
    fn create(id: i64, new: Self::New) -> Self;

    /// Apply a validated changeset. Absent fields stay as they are.
    fn apply(&mut self, patch: Self::Patch);
}
