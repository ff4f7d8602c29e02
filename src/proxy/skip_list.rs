//! Skip set computation
//!
//! The skip set holds every slot of a type that the mapping layer does not
//! manage. Those slots keep their declared defaults on a stand-in and never
//! trigger a load; only mapped slots participate in lazy initialization.

use std::collections::{BTreeSet, HashSet};

use crate::metadata::ClassDescriptor;
use crate::models::{SlotKey, Visibility};

/// Builds the skip set of a class
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipListBuilder;

impl SkipListBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Walk the hierarchy from the most derived type to the root.
    ///
    /// The most derived type sees its own fields of every visibility plus the
    /// public/protected fields it inherits; each ancestor then contributes
    /// only its private fields. Static and mapped fields are never skipped.
    pub fn build(&self, class: &ClassDescriptor) -> BTreeSet<SlotKey> {
        let mut skipped = BTreeSet::new();
        // Non-private names already claimed by a more derived declaration
        let mut visible: HashSet<&str> = HashSet::new();

        for (depth, declared) in class.hierarchy().iter().enumerate() {
            for field in &declared.fields {
                let private = field.visibility == Visibility::Private;
                let seen_from_child = depth == 0 || private || !visible.contains(field.name.as_str());
                if !private {
                    visible.insert(field.name.as_str());
                }

                if !seen_from_child || field.is_static || class.is_mapped(&field.name) {
                    continue;
                }

                skipped.insert(SlotKey::for_field(
                    &declared.name,
                    &field.name,
                    field.visibility,
                ));
            }
        }

        skipped
    }
}
