//! Mapping metadata consumed by the proxy subsystem
//!
//! A `ClassDescriptor` is produced by the metadata collaborator (see
//! `domain::ports::MetadataSource`) and read here only. It replaces runtime
//! reflection with an explicit table: identifier/persistent/association field
//! names plus the declared state of the type and each of its ancestors.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProxyError, ProxyResult};
use crate::models::{Identifier, ObjectState, SlotKey, Visibility};

/// Kind of mapped type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    /// Independently persisted document
    #[default]
    Document,
    /// Shares mapping with subclasses but is never persisted itself
    MappedSuperclass,
    /// Value embedded in another document, has no identity of its own
    Embedded,
}

/// A field as declared on one type of the hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredField {
    pub name: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    /// Value the slot holds before any load
    #[serde(default)]
    pub default: Option<Value>,
}

impl DeclaredField {
    pub fn new(name: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            name: name.into(),
            visibility,
            is_static: false,
            default: None,
        }
    }

    pub fn public(name: impl Into<String>) -> Self {
        Self::new(name, Visibility::Public)
    }

    pub fn protected(name: impl Into<String>) -> Self {
        Self::new(name, Visibility::Protected)
    }

    pub fn private(name: impl Into<String>) -> Self {
        Self::new(name, Visibility::Private)
    }

    pub fn static_field(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// Declared state of one type in the hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclaredType {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<DeclaredField>,
}

impl DeclaredType {
    pub fn new(name: impl Into<String>, fields: Vec<DeclaredField>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// Custom serialization routine defined by the mapped type
pub type CustomSerializer = Arc<dyn Fn(&ObjectState) -> ObjectState + Send + Sync>;

/// Serialization hooks a mapped type may define
#[derive(Clone, Default)]
pub struct SerializationHooks {
    /// Full custom serializer; takes precedence over everything else
    pub custom: Option<CustomSerializer>,
    /// Legacy field selection: names of the fields to keep when serializing
    pub legacy_fields: Option<Vec<String>>,
}

impl fmt::Debug for SerializationHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializationHooks")
            .field("custom", &self.custom.is_some())
            .field("legacy_fields", &self.legacy_fields)
            .finish()
    }
}

/// Read-only mapping description of one type
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    name: String,
    identifier: Vec<String>,
    fields: BTreeSet<String>,
    associations: BTreeSet<String>,
    /// Most derived type first, root last
    hierarchy: Vec<DeclaredType>,
    kind: ClassKind,
    is_abstract: bool,
    source_file: Option<PathBuf>,
    serialization: SerializationHooks,
}

impl ClassDescriptor {
    /// Start describing the type `name`
    pub fn builder(name: impl Into<String>) -> ClassDescriptorBuilder {
        ClassDescriptorBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identifier_fields(&self) -> &[String] {
        &self.identifier
    }

    pub fn is_identifier(&self, field: &str) -> bool {
        self.identifier.iter().any(|f| f == field)
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn has_association(&self, field: &str) -> bool {
        self.associations.contains(field)
    }

    /// Persistent field names, identifier fields included, sorted
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    pub fn association_names(&self) -> impl Iterator<Item = &str> {
        self.associations.iter().map(String::as_str)
    }

    /// Persistent field or association
    pub fn is_mapped(&self, field: &str) -> bool {
        self.has_field(field) || self.has_association(field)
    }

    pub fn hierarchy(&self) -> &[DeclaredType] {
        &self.hierarchy
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_mapped_superclass(&self) -> bool {
        self.kind == ClassKind::MappedSuperclass
    }

    pub fn is_embedded(&self) -> bool {
        self.kind == ClassKind::Embedded
    }

    /// Abstract, mapped-superclass and embedded types never get their own stand-in
    pub fn is_instantiable(&self) -> bool {
        !(self.is_abstract || self.is_mapped_superclass() || self.is_embedded())
    }

    pub fn source_file(&self) -> Option<&Path> {
        self.source_file.as_deref()
    }

    pub fn serialization(&self) -> &SerializationHooks {
        &self.serialization
    }

    /// Slot addressed by the name `field`.
    ///
    /// Resolution order: the type's own declaration of any visibility, the
    /// nearest inherited public/protected declaration, the nearest ancestor's
    /// private declaration, and finally a dynamic public slot.
    pub fn slot_for(&self, field: &str) -> SlotKey {
        let declared_as = |depth: usize, visible: bool| {
            let declared = &self.hierarchy[depth];
            declared
                .fields
                .iter()
                .filter(|f| f.name == field && !f.is_static)
                .find(|f| !visible || depth == 0 || f.visibility != Visibility::Private)
                .map(|f| SlotKey::for_field(&declared.name, &f.name, f.visibility))
        };

        (0..self.hierarchy.len())
            .find_map(|depth| declared_as(depth, true))
            .or_else(|| (1..self.hierarchy.len()).find_map(|depth| declared_as(depth, false)))
            .unwrap_or_else(|| SlotKey::public(field))
    }

    /// Slots of every persistent field and association, including those
    /// declared privately by ancestors
    pub fn mapped_slots(&self) -> Vec<SlotKey> {
        let mut slots: Vec<SlotKey> = Vec::new();
        let mut seen_names: BTreeSet<&str> = BTreeSet::new();

        for declared in &self.hierarchy {
            for f in declared.fields.iter().filter(|f| !f.is_static) {
                if !self.is_mapped(&f.name) {
                    continue;
                }
                let slot = SlotKey::for_field(&declared.name, &f.name, f.visibility);
                if !slots.contains(&slot) {
                    slots.push(slot);
                }
                seen_names.insert(f.name.as_str());
            }
        }

        // Mapped but never declared: lives in a dynamic public slot
        for name in self.fields.iter().chain(self.associations.iter()) {
            if !seen_names.contains(name.as_str()) {
                let slot = SlotKey::public(name.clone());
                if !slots.contains(&slot) {
                    slots.push(slot);
                }
            }
        }

        slots
    }

    /// Build an identifier in declaration order, failing on missing fields
    pub fn identifier(&self, values: &Identifier) -> ProxyResult<Identifier> {
        let mut ordered = Identifier::new();
        for field in &self.identifier {
            let value = values
                .get(field)
                .ok_or_else(|| ProxyError::MissingIdentifierValue {
                    class: self.name.clone(),
                    field: field.clone(),
                })?;
            ordered = ordered.with(field.clone(), value.clone());
        }
        Ok(ordered)
    }

    /// Build the state of a fully loaded document from field values keyed by
    /// name, placing each value in the slot the type declares for it
    pub fn document<'a, I>(&self, values: I) -> ObjectState
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        values
            .into_iter()
            .map(|(name, value)| (self.slot_for(name), value))
            .collect()
    }
}

/// Builder for `ClassDescriptor`
#[derive(Debug, Clone)]
pub struct ClassDescriptorBuilder {
    descriptor: ClassDescriptor,
}

impl ClassDescriptorBuilder {
    fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            descriptor: ClassDescriptor {
                hierarchy: vec![DeclaredType::new(name.clone(), Vec::new())],
                name,
                identifier: Vec::new(),
                fields: BTreeSet::new(),
                associations: BTreeSet::new(),
                kind: ClassKind::Document,
                is_abstract: false,
                source_file: None,
                serialization: SerializationHooks::default(),
            },
        }
    }

    /// Identifier field; also mapped as a persistent field
    pub fn identifier(mut self, field: impl Into<String>) -> Self {
        let field = field.into();
        self.descriptor.fields.insert(field.clone());
        self.descriptor.identifier.push(field);
        self
    }

    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.descriptor.fields.insert(field.into());
        self
    }

    pub fn association(mut self, field: impl Into<String>) -> Self {
        self.descriptor.associations.insert(field.into());
        self
    }

    /// Declare a field on the type itself
    pub fn declare(mut self, field: DeclaredField) -> Self {
        self.descriptor.hierarchy[0].fields.push(field);
        self
    }

    /// Append the next ancestor (call from nearest to root)
    pub fn ancestor(mut self, declared: DeclaredType) -> Self {
        self.descriptor.hierarchy.push(declared);
        self
    }

    pub fn kind(mut self, kind: ClassKind) -> Self {
        self.descriptor.kind = kind;
        self
    }

    pub fn abstract_type(mut self, is_abstract: bool) -> Self {
        self.descriptor.is_abstract = is_abstract;
        self
    }

    pub fn source_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.descriptor.source_file = Some(path.into());
        self
    }

    pub fn custom_serializer(mut self, serializer: CustomSerializer) -> Self {
        self.descriptor.serialization.custom = Some(serializer);
        self
    }

    pub fn legacy_serialize_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.descriptor.serialization.legacy_fields =
            Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> ClassDescriptor {
        self.descriptor
    }
}
