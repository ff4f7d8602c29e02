//! MetadataSource port - the mapping collaborator

use std::sync::Arc;

use crate::metadata::ClassDescriptor;

/// Provides class descriptors by mapped type name
pub trait MetadataSource: Send + Sync {
    /// Descriptor for `name`, or `None` when the type is not mapped
    fn class_descriptor(&self, name: &str) -> Option<Arc<ClassDescriptor>>;

    /// Every mapped type, in a stable order
    fn all_class_descriptors(&self) -> Vec<Arc<ClassDescriptor>>;
}
