//! In-memory metadata source

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::ports::MetadataSource;
use crate::metadata::ClassDescriptor;

/// Class descriptors registered up front, looked up by type name
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetadata {
    classes: BTreeMap<String, Arc<ClassDescriptor>>,
}

impl InMemoryMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor, replacing any previous one with the same name
    pub fn register(&mut self, class: ClassDescriptor) -> Arc<ClassDescriptor> {
        let class = Arc::new(class);
        self.classes
            .insert(class.name().to_string(), Arc::clone(&class));
        class
    }

    pub fn with(mut self, class: ClassDescriptor) -> Self {
        self.register(class);
        self
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl FromIterator<ClassDescriptor> for InMemoryMetadata {
    fn from_iter<I: IntoIterator<Item = ClassDescriptor>>(iter: I) -> Self {
        let mut metadata = Self::new();
        for class in iter {
            metadata.register(class);
        }
        metadata
    }
}

impl MetadataSource for InMemoryMetadata {
    fn class_descriptor(&self, name: &str) -> Option<Arc<ClassDescriptor>> {
        // Leading `::` is an absolute path spelling of the same type
        self.classes
            .get(name.trim_start_matches("::"))
            .cloned()
    }

    fn all_class_descriptors(&self) -> Vec<Arc<ClassDescriptor>> {
        self.classes.values().cloned().collect()
    }
}
