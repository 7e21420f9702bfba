//! In-memory model table
//!
//! Pure mutation logic over the id → entry mapping. The store in the parent
//! module wraps these operations with file I/O and locking.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Flags attached to one model id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    #[serde(default)]
    pub active: bool,
}

/// A model id together with its flag, used for list projections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub id: String,
    #[serde(default)]
    pub active: bool,
}

/// Accepted on-disk shapes
///
/// The canonical shape is the mapping. The list of records is still read so
/// older files keep working; it is never written. Neither shape is validated:
/// list items without a string `id` are skipped, and anything but a boolean
/// `active` reads as inactive.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredShape {
    Mapping(BTreeMap<String, Value>),
    Records(Vec<Value>),
}

impl From<StoredShape> for ModelTable {
    fn from(shape: StoredShape) -> Self {
        match shape {
            StoredShape::Mapping(entries) => Self(
                entries
                    .into_iter()
                    .map(|(id, value)| (id, ModelEntry::from_value(&value)))
                    .collect(),
            ),
            StoredShape::Records(items) => Self(
                items
                    .iter()
                    .filter_map(|item| {
                        let id = item.get("id").and_then(Value::as_str)?;
                        Some((id.to_string(), ModelEntry::from_value(item)))
                    })
                    .collect(),
            ),
        }
    }
}

impl ModelEntry {
    fn from_value(value: &Value) -> Self {
        Self {
            active: value
                .get("active")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }
}

/// Mapping of model id to its entry, kept sorted by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredShape")]
pub struct ModelTable(BTreeMap<String, ModelEntry>);

impl ModelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ModelEntry> {
        self.0.get(id)
    }

    /// True only for a registered id whose flag is set
    pub fn is_active(&self, id: &str) -> bool {
        self.0.get(id).is_some_and(|entry| entry.active)
    }

    /// Set the flag for `id`, creating the entry when absent
    pub fn upsert(&mut self, id: &str, active: bool) {
        self.0.entry(id.to_string()).or_default().active = active;
    }

    /// Flip the flag for `id`; returns the new value, or `None` if unknown
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        self.0.get_mut(id).map(|entry| {
            entry.active = !entry.active;
            entry.active
        })
    }

    /// Remove `id`; returns whether an entry existed
    pub fn remove(&mut self, id: &str) -> bool {
        self.0.remove(id).is_some()
    }

    /// All entries in id order
    pub fn records(&self) -> Vec<ModelRecord> {
        self.0
            .iter()
            .map(|(id, entry)| ModelRecord {
                id: id.clone(),
                active: entry.active,
            })
            .collect()
    }

    /// Ids whose flag is set, in id order
    pub fn active_ids(&self) -> Vec<String> {
        self.0
            .iter()
            .filter(|(_, entry)| entry.active)
            .map(|(id, _)| id.clone())
            .collect()
    }
}
