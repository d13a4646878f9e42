//! Storage-side projection of a place
//!
//! `Place` is the domain-facing entity and never carries derived keys.
//! `PlaceRecord` pairs it with the keys the primary store indexes on, and
//! is the only shape that crosses the primary store boundary on writes.

use crate::keys::DerivedKeys;
use crate::query::{IndexName, RangeKey};
use crate::types::{FieldValue, Place, PlaceField, PlaceId};
use serde::{Deserialize, Serialize};

/// A place together with its derived secondary keys
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    /// Canonical entity
    pub place: Place,
    /// Derived keys
    pub keys: DerivedKeys,
}

impl PlaceRecord {
    /// Pair a place with its keys
    pub fn new(place: Place, keys: DerivedKeys) -> Self {
        PlaceRecord { place, keys }
    }

    /// Place id
    pub fn id(&self) -> PlaceId {
        self.place.id
    }

    /// Partition and range key of this record in an index, if it belongs there
    ///
    /// Indexes are sparse: a record lacking either attribute is absent.
    pub fn index_key(&self, index: IndexName) -> Option<(String, RangeKey)> {
        match index {
            IndexName::InAdmin1 => Some((
                self.keys.key_in_admin1.clone()?,
                RangeKey::Number(self.place.population?),
            )),
            IndexName::Admin1 => Some((
                self.keys.key_admin1.clone()?,
                RangeKey::Text(self.place.admin1_code.clone()?),
            )),
            IndexName::MainPlaces => Some((
                self.keys.key_main.clone()?,
                RangeKey::Number(self.place.population?),
            )),
        }
    }

    /// Strip the derived keys
    pub fn into_place(self) -> Place {
        self.place
    }
}

/// A conditional partial update as sent to the primary store
///
/// `keys`, when present, is the complete post-update key set: present keys
/// are written, absent keys are removed from the stored record. They are
/// derived from `expected` merged with the change, so the store refuses the
/// write once the stored entity no longer equals `expected`.
///
/// `keys: None` keeps the stored keys and index entries as they are. It is
/// only valid for changes that touch no key field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordUpdate {
    /// Target place
    pub id: PlaceId,
    /// Values to write
    pub set: Vec<FieldValue>,
    /// Fields to remove
    pub remove: Vec<PlaceField>,
    /// Keys after the update, or `None` to keep the stored ones
    pub keys: Option<DerivedKeys>,
    /// Entity the keys were derived from; `None` writes unconditionally
    pub expected: Option<Place>,
}

impl RecordUpdate {
    /// Whether any written or removed field feeds key derivation
    pub fn touches_keys(&self) -> bool {
        self.set.iter().any(|v| v.field().affects_keys())
            || self.remove.iter().any(|f| f.affects_keys())
    }
}
