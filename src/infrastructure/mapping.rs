//! TOML mapping file loader
//!
//! Describes mapped types for the `docproxy generate` command:
//!
//! ```toml
//! [[class]]
//! name = "app::User"
//! source_file = "src/user.rs"
//! parent = "app::Person"
//! identifier = ["id"]
//! fields = ["name"]
//! associations = ["groups"]
//! serialize_fields = ["name"]
//!
//! [[class.declared]]
//! name = "id"
//! visibility = "private"
//! ```
//!
//! A class inherits the mapped fields of its parent chain and gets the
//! parent's declared fields as ancestor state. Relative `source_file` paths
//! are resolved against the mapping file's directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ProxyError, ProxyResult};
use crate::infrastructure::metadata::InMemoryMetadata;
use crate::metadata::{ClassDescriptor, ClassKind, DeclaredField, DeclaredType};

/// One `[[class]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassEntry {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub source_file: Option<PathBuf>,
    #[serde(default)]
    pub identifier: Vec<String>,
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub associations: Vec<String>,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub serialize_fields: Option<Vec<String>>,
    #[serde(default)]
    pub declared: Vec<DeclaredField>,
}

/// Parsed mapping file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MappingFile {
    #[serde(default, rename = "class")]
    pub classes: Vec<ClassEntry>,
}

impl MappingFile {
    /// Load and parse a mapping file
    pub fn load(path: &Path) -> ProxyResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    /// Parse mapping content; `path` is used for messages and relative paths
    pub fn parse(content: &str, path: &Path) -> ProxyResult<Self> {
        let mut mapping: MappingFile =
            toml::from_str(content).map_err(|e| ProxyError::InvalidMapping {
                file: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for entry in &mut mapping.classes {
            if let Some(source) = entry.source_file.take() {
                entry.source_file = Some(if source.is_relative() {
                    base.join(source)
                } else {
                    source
                });
            }
        }

        Ok(mapping)
    }

    /// Resolve parent chains into class descriptors
    pub fn into_metadata(self, path: &Path) -> ProxyResult<InMemoryMetadata> {
        let invalid = |message: String| ProxyError::InvalidMapping {
            file: path.to_path_buf(),
            message,
        };

        let mut by_name: BTreeMap<&str, &ClassEntry> = BTreeMap::new();
        for entry in &self.classes {
            if !is_type_path(&entry.name) {
                return Err(invalid(format!(
                    "class name {:?} is not a type path like 'app::User'",
                    entry.name
                )));
            }
            if by_name.insert(entry.name.as_str(), entry).is_some() {
                return Err(invalid(format!("class '{}' is declared twice", entry.name)));
            }
        }

        let mut metadata = InMemoryMetadata::new();
        for entry in &self.classes {
            let chain = parent_chain(entry, &by_name).map_err(invalid)?;
            metadata.register(build_descriptor(&chain));
        }
        Ok(metadata)
    }
}

/// `::`-separated identifiers, optionally with a leading `::`
fn is_type_path(name: &str) -> bool {
    let name = name.strip_prefix("::").unwrap_or(name);
    !name.is_empty()
        && name.split("::").all(|segment| {
            !segment.is_empty() && segment.chars().all(|c| c.is_alphanumeric() || c == '_')
        })
}

/// `entry` followed by its ancestors, nearest first
fn parent_chain<'a>(
    entry: &'a ClassEntry,
    by_name: &BTreeMap<&str, &'a ClassEntry>,
) -> Result<Vec<&'a ClassEntry>, String> {
    let mut chain = vec![entry];
    let mut current = entry;

    while let Some(parent) = current.parent.as_deref() {
        let next = by_name
            .get(parent)
            .copied()
            .ok_or_else(|| format!("class '{}' extends unknown class '{}'", current.name, parent))?;
        if chain.iter().any(|seen| seen.name == next.name) {
            return Err(format!("inheritance cycle through '{}'", next.name));
        }
        chain.push(next);
        current = next;
    }

    Ok(chain)
}

fn build_descriptor(chain: &[&ClassEntry]) -> ClassDescriptor {
    let entry = chain[0];
    let mut builder = ClassDescriptor::builder(entry.name.clone())
        .kind(entry.kind)
        .abstract_type(entry.is_abstract);

    // Identifier comes from the nearest class that declares one
    if let Some(owner) = chain.iter().find(|c| !c.identifier.is_empty()) {
        for field in &owner.identifier {
            builder = builder.identifier(field.clone());
        }
    }

    for class in chain {
        for field in &class.fields {
            builder = builder.field(field.clone());
        }
        for association in &class.associations {
            builder = builder.association(association.clone());
        }
    }

    for field in &entry.declared {
        builder = builder.declare(field.clone());
    }
    for ancestor in &chain[1..] {
        builder = builder.ancestor(DeclaredType::new(
            ancestor.name.clone(),
            ancestor.declared.clone(),
        ));
    }

    if let Some(source) = &entry.source_file {
        builder = builder.source_file(source.clone());
    }
    if let Some(selection) = &entry.serialize_fields {
        builder = builder.legacy_serialize_fields(selection.iter().cloned());
    }

    builder.build()
}
