//! Lazy loading contracts
//!
//! A proxy is handed out without touching the store and loads at most once,
//! on the first access to a mapped slot.

use serde_json::json;

use crate::common::*;
use docproxy::{AutoGenerate, Identifier, LazyStatus, ProxyError};

/// CONTRACT: getProxy never loads
mod get_proxy {
    use super::*;

    #[test]
    fn contract_get_proxy_does_not_touch_the_store() {
        let harness = Harness::with_ana();
        let factory = harness.factory(AutoGenerate::Eval);

        let proxy = factory
            .get_proxy(&harness.class("app::User"), Identifier::single("id", 42))
            .unwrap();

        assert_eq!(proxy.status(), LazyStatus::Uninitialized);
        assert_eq!(harness.store.load_count(), 0);
        assert_eq!(proxy.stand_in_name(), "Proxies::__CG__::app::User");
    }

    #[test]
    fn contract_identifier_and_skipped_slots_are_read_without_loading() {
        let harness = Harness::with_ana();
        let factory = harness.factory(AutoGenerate::Eval);
        let proxy = factory
            .get_proxy(&harness.class("app::User"), Identifier::single("id", 42))
            .unwrap();

        assert_eq!(proxy.get("id").unwrap(), Some(json!(42)));
        assert_eq!(proxy.get("visits").unwrap(), Some(json!(0)));

        assert!(!proxy.is_initialized());
        assert_eq!(harness.store.load_count(), 0);
    }

    #[test]
    fn contract_missing_identifier_value_is_rejected() {
        let harness = Harness::with_ana();
        let factory = harness.factory(AutoGenerate::Eval);

        let err = factory
            .get_proxy(&harness.class("app::User"), Identifier::single("uuid", 42))
            .unwrap_err();

        assert!(matches!(err, ProxyError::MissingIdentifierValue { ref field, .. } if field == "id"));
    }

    #[test]
    fn contract_stand_in_names_resolve_to_their_target() {
        let harness = Harness::with_ana();
        let factory = harness.factory(AutoGenerate::Eval);

        let proxy = factory
            .get_proxy_by_name("Proxies::__CG__::app::User", Identifier::single("id", 42))
            .unwrap();
        assert_eq!(proxy.class().name(), "app::User");

        let err = factory
            .get_proxy_by_name("app::Ghost", Identifier::single("id", 1))
            .unwrap_err();
        assert!(matches!(err, ProxyError::UnknownClass { .. }));
    }

    #[test]
    fn contract_each_call_hands_out_a_new_instance() {
        let harness = Harness::with_ana();
        let factory = harness.factory(AutoGenerate::Eval);
        let class = harness.class("app::User");

        let first = factory.get_proxy(&class, Identifier::single("id", 42)).unwrap();
        let second = factory.get_proxy(&class, Identifier::single("id", 42)).unwrap();

        assert_ne!(first, second);
        assert_eq!(first, first.clone());
    }
}

/// CONTRACT: the first mapped access loads exactly once
mod initialization {
    use super::*;

    #[test]
    fn contract_user_42_loads_as_ana() {
        let harness = Harness::with_ana();
        let factory = harness.factory(AutoGenerate::Eval);
        let proxy = factory
            .get_proxy(&harness.class("app::User"), Identifier::single("id", 42))
            .unwrap();

        assert_eq!(proxy.get("name").unwrap(), Some(json!("Ana")));
        assert_eq!(proxy.get("name").unwrap(), Some(json!("Ana")));

        assert!(proxy.is_initialized());
        assert_eq!(harness.store.load_count(), 1);
    }

    #[test]
    fn contract_writes_load_before_they_land() {
        let harness = Harness::with_ana();
        let factory = harness.factory(AutoGenerate::Eval);
        let proxy = factory
            .get_proxy(&harness.class("app::User"), Identifier::single("id", 42))
            .unwrap();

        proxy.set("name", json!("Bea")).unwrap();

        assert_eq!(harness.store.load_count(), 1);
        assert_eq!(proxy.get("name").unwrap(), Some(json!("Bea")));
    }

    #[test]
    fn contract_identifier_fields_are_immutable() {
        let harness = Harness::with_ana();
        let factory = harness.factory(AutoGenerate::Eval);
        let proxy = factory
            .get_proxy(&harness.class("app::User"), Identifier::single("id", 42))
            .unwrap();

        let err = proxy.set("id", json!(7)).unwrap_err();

        assert!(matches!(err, ProxyError::IdentifierImmutable { .. }));
        assert_eq!(proxy.get("id").unwrap(), Some(json!(42)));
    }

    #[test]
    fn contract_not_found_leaves_the_proxy_retryable() {
        let harness = Harness::with_ana();
        let factory = harness.factory(AutoGenerate::Eval);
        let class = harness.class("app::User");
        let proxy = factory.get_proxy(&class, Identifier::single("id", 7)).unwrap();

        let err = proxy.get("name").unwrap_err();
        assert!(matches!(err, ProxyError::DocumentNotFound { .. }));
        assert_eq!(
            err.to_string(),
            "The \"app::User\" document with identifier {\"id\":7} could not be found."
        );
        assert_eq!(proxy.status(), LazyStatus::Uninitialized);

        harness.store.insert(
            "app::User",
            &Identifier::single("id", 7),
            class.document([("id", json!(7)), ("name", json!("Gus"))]),
        );

        assert_eq!(proxy.get("name").unwrap(), Some(json!("Gus")));
        assert_eq!(harness.store.load_count(), 2);
    }

    #[test]
    fn contract_load_resolving_to_the_same_proxy_initializes_it() {
        let harness = Harness::new(vec![user_class()]);
        let factory = harness.factory(AutoGenerate::Eval);
        let proxy = factory
            .get_proxy(&harness.class("app::User"), Identifier::single("id", 42))
            .unwrap();
        harness.store.insert_managed(&proxy);

        proxy.load().unwrap();

        assert!(proxy.is_initialized());
        assert_eq!(proxy.get("id").unwrap(), Some(json!(42)));
        assert_eq!(harness.store.load_count(), 1);
    }

    #[test]
    fn contract_state_of_a_managed_instance_is_copied() {
        let harness = Harness::new(vec![user_class()]);
        let factory = harness.factory(AutoGenerate::Eval);
        let class = harness.class("app::User");

        let managed = factory.get_proxy(&class, Identifier::single("id", 5)).unwrap();
        harness.store.insert_managed(&managed);
        // The managed instance resolves to itself, then takes a name
        managed.set("name", json!("Kim")).unwrap();

        let other = factory.get_proxy(&class, Identifier::single("id", 5)).unwrap();
        assert_eq!(other.get("name").unwrap(), Some(json!("Kim")));
        assert!(!other.same_instance(&managed));
    }

    #[test]
    fn contract_unloaded_managed_instance_is_loaded_before_copying() {
        // The managed instance belongs to a session whose store holds Kim
        let session = Harness::new(vec![user_class()]);
        let class = session.class("app::User");
        session.store.insert(
            "app::User",
            &Identifier::single("id", 5),
            class.document([("id", json!(5)), ("name", json!("Kim"))]),
        );
        let managed = session
            .factory(AutoGenerate::Eval)
            .get_proxy(&class, Identifier::single("id", 5))
            .unwrap();

        let harness = Harness::new(vec![user_class()]);
        harness.store.insert_managed(&managed);
        let other = harness
            .factory(AutoGenerate::Eval)
            .get_proxy(&class, Identifier::single("id", 5))
            .unwrap();

        assert_eq!(other.get("name").unwrap(), Some(json!("Kim")));
        assert!(other.is_initialized());
        assert!(managed.is_initialized());
        assert_eq!(session.store.load_count(), 1);
    }

    #[test]
    fn contract_private_fields_of_ancestors_are_loaded() {
        let harness = Harness::new(vec![admin_class()]);
        let class = harness.class("app::Admin");
        harness.store.insert(
            "app::Admin",
            &Identifier::single("id", 1),
            class.document([
                ("id", json!(1)),
                ("level", json!(3)),
                ("email", json!("root@example.com")),
            ]),
        );
        let factory = harness.factory(AutoGenerate::Eval);
        let proxy = factory.get_proxy(&class, Identifier::single("id", 1)).unwrap();

        assert_eq!(proxy.get("notes").unwrap(), Some(json!("")));
        assert_eq!(harness.store.load_count(), 0);

        assert_eq!(proxy.get("email").unwrap(), Some(json!("root@example.com")));
        assert_eq!(proxy.get("level").unwrap(), Some(json!(3)));
        assert_eq!(harness.store.load_count(), 1);
    }
}
