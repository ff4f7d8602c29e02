//! Property tests for slot key formatting/parsing.

use proptest::prelude::*;

use docproxy::SlotKey;

fn field_name() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z_][A-Za-z0-9_]{0,16}").unwrap()
}

fn slot_key() -> impl Strategy<Value = SlotKey> {
    let declaring = proptest::collection::vec(field_name(), 1..=3)
        .prop_map(|segments| segments.join("::"));
    prop_oneof![
        field_name().prop_map(SlotKey::public),
        field_name().prop_map(SlotKey::protected),
        (declaring, field_name()).prop_map(|(d, n)| SlotKey::private(d, n)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `parse(display(key)) == key`.
    #[test]
    fn property_slot_key_round_trips(key in slot_key()) {
        let parsed: SlotKey = key.to_string().parse().unwrap();
        prop_assert_eq!(parsed, key);
    }

    /// PROPERTY: parsing arbitrary text never panics.
    #[test]
    fn property_slot_key_parse_never_panics(input in ".*") {
        let _ = input.parse::<SlotKey>();
    }

    /// PROPERTY: private slots of different declaring types never collide.
    #[test]
    fn property_private_slots_are_scoped(
        name in field_name(),
        a in field_name(),
        b in field_name(),
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(
            SlotKey::private(a.clone(), name.clone()).to_string(),
            SlotKey::private(b, name).to_string()
        );
    }
}
