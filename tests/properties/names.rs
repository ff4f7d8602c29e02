//! Property tests for stand-in naming.

use std::path::Path;

use proptest::prelude::*;

use docproxy::proxy::stand_in_name;
use docproxy::{ClassNameResolver, ProxyFactory};

fn type_path() -> impl Strategy<Value = String> {
    let segment = proptest::string::string_regex("[A-Za-z_][A-Za-z0-9_]{0,12}").unwrap();
    proptest::collection::vec(segment, 1..=4)
        .prop_map(|segments| segments.join("::"))
        .prop_filter("marker segment is reserved", |path| {
            !path.split("::").any(|segment| segment == "__CG__")
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: resolving a stand-in name yields the type it was built from.
    #[test]
    fn property_stand_in_names_resolve_to_target(
        target in type_path(),
        namespace in type_path(),
    ) {
        let resolver = ClassNameResolver::new();
        let name = stand_in_name(&target, &namespace);

        prop_assert!(resolver.is_stand_in(&name));
        prop_assert_eq!(resolver.resolve(&name), target.as_str());
        prop_assert_eq!(resolver.resolve(&target), target.as_str());
    }

    /// PROPERTY: stand-in names of stand-in names still resolve to the type.
    #[test]
    fn property_resolution_is_idempotent(
        target in type_path(),
        namespace in type_path(),
    ) {
        let resolver = ClassNameResolver::new();
        let once = stand_in_name(&target, &namespace);
        let twice = stand_in_name(&once, &namespace);

        prop_assert_eq!(resolver.resolve(&twice), target.as_str());
    }

    /// PROPERTY: stand-in files land directly in the base dir, flattened.
    #[test]
    fn property_proxy_file_names_are_flat(
        target in type_path(),
        namespace in type_path(),
    ) {
        let base = Path::new("/var/proxies");
        let direct = ProxyFactory::proxy_file_name(&target, base);
        let decorated = ProxyFactory::proxy_file_name(&stand_in_name(&target, &namespace), base);

        prop_assert_eq!(&direct, &decorated);
        prop_assert_eq!(direct.parent(), Some(base));
        let file = direct.file_name().unwrap().to_string_lossy().to_string();
        prop_assert!(file.starts_with("__CG__"));
        prop_assert!(file.ends_with(".rs"));
        prop_assert!(!file.contains("::"));
    }
}
