//! Entity trait shared by books and users.

use crate::error::EntityKind;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Borrow;
use std::hash::Hash;

/// Trait for types the catalog stores in a keyed document.
///
/// Implementors must provide:
/// - `id()`: the stable, immutable identifier used as the document key
/// - serde `Serialize`/`Deserialize` for the record layout
///
/// On load, every document key must equal the `id()` of the record stored
/// under it.
pub trait CatalogEntity: Serialize + DeserializeOwned {
    /// Identifier type, used as the document key.
    type Id: Clone + Eq + Hash + Borrow<str> + Serialize;

    /// Which kind of entity this is, for error messages.
    const KIND: EntityKind;

    /// Returns the entity's identifier.
    ///
    /// This ID must not change over the entity's lifetime.
    fn id(&self) -> &Self::Id;
}
