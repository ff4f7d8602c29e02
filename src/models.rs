//! Core data models for docproxy
//!
//! Defines the value types shared by the proxy subsystem:
//! - `Visibility` / `SlotKey`: stable identity of one storage slot of an object
//! - `ObjectState`: the ordered slot map of a document or stand-in
//! - `Identifier`: ordered identifier field values bound to a stand-in

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Visibility of a declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

/// Identity of a storage slot.
///
/// Public and protected slots are shared along the inheritance chain, so they
/// are keyed by name only. Private slots belong to the declaring type, which
/// lets a subclass and its ancestor each own a private `name` without the two
/// collapsing into one slot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SlotKey {
    Public(String),
    Protected(String),
    Private { declaring: String, name: String },
}

impl SlotKey {
    /// Build the slot key a field declared on `declaring` with `visibility` occupies
    pub fn for_field(declaring: &str, name: &str, visibility: Visibility) -> Self {
        match visibility {
            Visibility::Public => SlotKey::Public(name.to_string()),
            Visibility::Protected => SlotKey::Protected(name.to_string()),
            Visibility::Private => SlotKey::Private {
                declaring: declaring.to_string(),
                name: name.to_string(),
            },
        }
    }

    pub fn public(name: impl Into<String>) -> Self {
        SlotKey::Public(name.into())
    }

    pub fn protected(name: impl Into<String>) -> Self {
        SlotKey::Protected(name.into())
    }

    pub fn private(declaring: impl Into<String>, name: impl Into<String>) -> Self {
        SlotKey::Private {
            declaring: declaring.into(),
            name: name.into(),
        }
    }

    /// Bare field name, without visibility qualification
    pub fn name(&self) -> &str {
        match self {
            SlotKey::Public(name) | SlotKey::Protected(name) => name,
            SlotKey::Private { name, .. } => name,
        }
    }

    pub fn visibility(&self) -> Visibility {
        match self {
            SlotKey::Public(_) => Visibility::Public,
            SlotKey::Protected(_) => Visibility::Protected,
            SlotKey::Private { .. } => Visibility::Private,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKey::Public(name) => write!(f, "{}", name),
            SlotKey::Protected(name) => write!(f, "protected.{}", name),
            SlotKey::Private { declaring, name } => write!(f, "private[{}].{}", declaring, name),
        }
    }
}

/// Error returned when a rendered slot key cannot be parsed back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSlotKeyError(pub String);

impl fmt::Display for ParseSlotKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid slot key '{}'", self.0)
    }
}

impl std::error::Error for ParseSlotKeyError {}

impl FromStr for SlotKey {
    type Err = ParseSlotKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseSlotKeyError(s.to_string());

        if let Some(name) = s.strip_prefix("protected.") {
            if name.is_empty() {
                return Err(invalid());
            }
            return Ok(SlotKey::protected(name));
        }

        if let Some(rest) = s.strip_prefix("private[") {
            // The declaring type may itself contain dots, the field name may not.
            let (declaring, name) = rest.rsplit_once("].").ok_or_else(invalid)?;
            if declaring.is_empty() || name.is_empty() || name.contains('.') {
                return Err(invalid());
            }
            return Ok(SlotKey::private(declaring, name));
        }

        if s.is_empty() {
            return Err(invalid());
        }
        Ok(SlotKey::public(s))
    }
}

impl Serialize for SlotKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Ordered slot map holding the state of one object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectState {
    slots: BTreeMap<SlotKey, Value>,
}

impl ObjectState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, slot: SlotKey, value: Value) -> Self {
        self.slots.insert(slot, value);
        self
    }

    pub fn get(&self, slot: &SlotKey) -> Option<&Value> {
        self.slots.get(slot)
    }

    pub fn contains(&self, slot: &SlotKey) -> bool {
        self.slots.contains_key(slot)
    }

    pub fn insert(&mut self, slot: SlotKey, value: Value) -> Option<Value> {
        self.slots.insert(slot, value)
    }

    pub fn remove(&mut self, slot: &SlotKey) -> Option<Value> {
        self.slots.remove(slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotKey, &Value)> {
        self.slots.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &SlotKey> {
        self.slots.keys()
    }
}

impl FromIterator<(SlotKey, Value)> for ObjectState {
    fn from_iter<I: IntoIterator<Item = (SlotKey, Value)>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

/// Ordered identifier field values for one document.
///
/// Field order follows the class's identifier declaration order when built
/// through `ClassDescriptor::identifier`; lookups are by name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier {
    values: Vec<(String, Value)>,
}

impl Identifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-field identifier, the common `{id: ...}` case
    pub fn single(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().with(field, value)
    }

    /// Builder-style insert; replaces an existing value for the same field
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        let value = value.into();
        match self.values.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.values.push((field, value)),
        }
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let object: serde_json::Map<String, Value> = self
            .values
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        write!(f, "{}", Value::Object(object))
    }
}
