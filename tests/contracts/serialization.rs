//! Serialization contracts
//!
//! A stand-in serializes exactly like the real document it stands for.

use serde_json::json;

use crate::common::*;
use docproxy::proxy::{serialize_state, DiagnosticSeverity};
use docproxy::{AutoGenerate, ClassDescriptor, DeclaredField, Identifier, ObjectState};

/// CONTRACT: proxy and real document serialize identically
mod parity {
    use super::*;

    #[test]
    fn contract_loaded_proxy_serializes_like_the_document() {
        let harness = Harness::with_ana();
        let class = harness.class("app::User");
        let factory = harness.factory(AutoGenerate::Eval);
        let proxy = factory.get_proxy(&class, Identifier::single("id", 42)).unwrap();
        proxy.load().unwrap();

        let document = class.document([
            ("id", json!(42)),
            ("name", json!("Ana")),
            ("visits", json!(0)),
        ]);

        assert_eq!(
            proxy.serialize(),
            serialize_state(&class, &document, None)
        );
    }

    #[test]
    fn contract_serialized_proxy_reconstructs_without_bookkeeping() {
        let harness = Harness::with_ana();
        let class = harness.class("app::User");
        let factory = harness.factory(AutoGenerate::Eval);
        let proxy = factory.get_proxy(&class, Identifier::single("id", 42)).unwrap();
        proxy.load().unwrap();

        let encoded = serde_json::to_value(&proxy.serialize().state).unwrap();
        let restored: ObjectState = serde_json::from_value(encoded).unwrap();

        let lazy_slot = docproxy::proxy::lazy_state_slot(proxy.stand_in_name());
        assert!(proxy.slots().contains(&lazy_slot));
        assert!(!restored.contains(&lazy_slot));
        assert!(restored
            .keys()
            .all(|slot| slot.name() != docproxy::proxy::LAZY_STATE_FIELD));

        let document = class.document([
            ("id", json!(42)),
            ("name", json!("Ana")),
            ("visits", json!(0)),
        ]);
        assert_eq!(restored, serialize_state(&class, &document, None).state);
    }

    #[test]
    fn contract_serializing_never_loads() {
        let harness = Harness::with_ana();
        let factory = harness.factory(AutoGenerate::Eval);
        let proxy = factory
            .get_proxy(&harness.class("app::User"), Identifier::single("id", 42))
            .unwrap();

        let serialized = proxy.serialize();

        assert_eq!(harness.store.load_count(), 0);
        assert!(serialized
            .state
            .keys()
            .all(|slot| slot.name() != docproxy::proxy::LAZY_STATE_FIELD));
    }
}

/// CONTRACT: legacy field selections warn about names that do not exist
mod legacy_selection {
    use super::*;

    fn legacy_user() -> ClassDescriptor {
        ClassDescriptor::builder("app::User")
            .identifier("id")
            .field("name")
            .declare(DeclaredField::private("id"))
            .declare(DeclaredField::private("name"))
            .legacy_serialize_fields(["name", "nickname"])
            .build()
    }

    #[test]
    fn contract_unknown_selected_field_is_reported_and_omitted() {
        let harness = Harness::new(vec![legacy_user()]);
        let class = harness.class("app::User");
        harness.store.insert(
            "app::User",
            &Identifier::single("id", 9),
            class.document([("id", json!(9)), ("name", json!("Lee"))]),
        );
        let factory = harness.factory(AutoGenerate::Eval);
        let proxy = factory.get_proxy(&class, Identifier::single("id", 9)).unwrap();
        proxy.load().unwrap();

        let serialized = proxy.serialize();

        assert_eq!(serialized.state.len(), 1);
        assert_eq!(serialized.diagnostics.len(), 1);
        let diagnostic = &serialized.diagnostics[0];
        assert_eq!(diagnostic.severity, DiagnosticSeverity::Warning);
        assert_eq!(diagnostic.field.as_deref(), Some("nickname"));
        assert_eq!(
            diagnostic.message,
            "serialize(): \"nickname\" returned as member variable from legacy field selection but does not exist"
        );
    }
}
