//! Serialization of stand-ins and real documents
//!
//! A stand-in serializes exactly like the real document it stands for: its
//! lazy bookkeeping slot is dropped, and a legacy field selection is mapped
//! back onto the slots the real object would have used.

use crate::metadata::ClassDescriptor;
use crate::models::{ObjectState, SlotKey};

/// Name of the private bookkeeping slot every stand-in carries
pub const LAZY_STATE_FIELD: &str = "lazyObjectState";

/// Bookkeeping slot of the stand-in type `stand_in`
pub fn lazy_state_slot(stand_in: &str) -> SlotKey {
    SlotKey::private(stand_in, LAZY_STATE_FIELD)
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Warning,
}

/// Non-fatal problem found while serializing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: DiagnosticSeverity,
    pub message: String,
    /// Selected field the message is about
    pub field: Option<String>,
}

/// Serialized state plus anything worth reporting
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Serialized {
    pub state: ObjectState,
    pub diagnostics: Vec<Diagnostic>,
}

/// Serialize `state` of an instance of `class`.
///
/// `stand_in` names the stand-in type when `state` belongs to a proxy, so
/// its bookkeeping slot can be excluded.
pub fn serialize_state(
    class: &ClassDescriptor,
    state: &ObjectState,
    stand_in: Option<&str>,
) -> Serialized {
    let hooks = class.serialization();

    let mut properties = match &hooks.custom {
        Some(custom) => custom(state),
        None => state.clone(),
    };
    if let Some(stand_in) = stand_in {
        properties.remove(&lazy_state_slot(stand_in));
    }

    let selection = match (&hooks.custom, &hooks.legacy_fields) {
        (None, Some(selection)) => selection,
        _ => {
            return Serialized {
                state: properties,
                diagnostics: Vec::new(),
            }
        }
    };

    select_fields(class.name(), &properties, selection.as_slice())
}

/// Re-derive a legacy field selection from `properties`.
///
/// Each selected name is looked up as the public slot, then the slot private
/// to `class_name`, then the protected slot. The first hit is kept under its
/// own key; a name found nowhere is omitted and reported.
pub fn select_fields<S: AsRef<str>>(
    class_name: &str,
    properties: &ObjectState,
    selection: &[S],
) -> Serialized {
    let mut data = ObjectState::new();
    let mut diagnostics = Vec::new();

    for name in selection.iter().map(AsRef::as_ref) {
        let candidates = [
            SlotKey::public(name),
            SlotKey::private(class_name, name),
            SlotKey::protected(name),
        ];

        let found = candidates
            .into_iter()
            .find_map(|slot| properties.get(&slot).cloned().map(|value| (slot, value)));

        match found {
            Some((slot, value)) => {
                data.insert(slot, value);
            }
            None => {
                let message = format!(
                    "serialize(): \"{}\" returned as member variable from legacy field selection but does not exist",
                    name
                );
                tracing::warn!(class = class_name, field = name, "{}", message);
                diagnostics.push(Diagnostic {
                    severity: DiagnosticSeverity::Warning,
                    message,
                    field: Some(name.to_string()),
                });
            }
        }
    }

    Serialized {
        state: data,
        diagnostics,
    }
}
