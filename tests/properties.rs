// Property tests for validated values and the menu builder.

use proptest::prelude::*;

use fiordispino_cli::console::ScriptedConsole;
use fiordispino_cli::menu::{Entry, MenuBuilder, MenuError};
use fiordispino_cli::values::{
    whole_number, Description, GlobalRating, Genre, Key, Selection, Vote,
};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// Any string of the key alphabet and length is a key that renders as itself.
    #[test]
    fn valid_keys_render_as_typed(raw in "[A-Za-z0-9_-]{1,10}") {
        let key = Key::new(raw.clone()).unwrap();
        prop_assert_eq!(key.to_string(), raw);
    }

    #[test]
    fn keys_longer_than_ten_are_refused(raw in "[A-Za-z0-9]{11,40}") {
        prop_assert!(Key::new(raw).is_err());
    }

    #[test]
    fn descriptions_render_as_typed(raw in "[A-Za-z0-9;.,_-][A-Za-z0-9 ;.,_-]{0,60}") {
        let description = Description::new(raw.clone()).unwrap();
        prop_assert_eq!(description.as_str(), raw.as_str());
    }

    #[test]
    fn genres_refuse_digits(prefix in "[A-Za-z ]{0,10}", digit in "[0-9]", suffix in "[A-Za-z ]{0,10}") {
        let raw = format!("{prefix}{digit}{suffix}");
        prop_assert!(Genre::new(raw).is_err());
    }

    /// Values order the same way as their raw strings.
    #[test]
    fn keys_order_like_strings(a in "[a-z0-9]{1,10}", b in "[a-z0-9]{1,10}") {
        let (ka, kb) = (Key::new(a.clone()).unwrap(), Key::new(b.clone()).unwrap());
        prop_assert_eq!(ka.cmp(&kb), a.cmp(&b));
    }

    #[test]
    fn global_rating_parts_round_trip(integer in 0u32..10, decimal in 0u32..100) {
        let rating = GlobalRating::create(integer, decimal).unwrap();
        prop_assert_eq!(u32::from(rating.integer()), integer);
        prop_assert_eq!(u32::from(rating.decimal()), decimal);
        prop_assert_eq!(rating.to_string(), format!("{integer}.{decimal:02}"));
    }

    #[test]
    fn ten_only_with_zero_decimals(decimal in 1u32..100) {
        prop_assert!(GlobalRating::create(10, decimal).is_err());
    }

    #[test]
    fn votes_accept_one_to_ten(vote in any::<u8>()) {
        prop_assert_eq!(Vote::new(vote).is_ok(), (1..=10).contains(&vote));
    }

    #[test]
    fn whole_numbers_respect_bounds(value in -1000i64..1000, low in -100i64..100, span in 0i64..100) {
        let high = low + span;
        let parsed = whole_number(&value.to_string(), low..=high);
        prop_assert_eq!(parsed.is_ok(), (low..=high).contains(&value));
    }

    #[test]
    fn selections_are_zero_based(len in 1usize..50, pick in 1usize..50) {
        prop_assume!(pick <= len);
        prop_assert_eq!(Selection::parse(&pick.to_string(), len), Ok(Selection::Item(pick - 1)));
        prop_assert_eq!(Selection::parse("0", len), Ok(Selection::Cancel));
        prop_assert!(Selection::parse(&(len + 1).to_string(), len).is_err());
    }

    /// Entries come out in registration order, duplicates excluded.
    #[test]
    fn builder_keeps_first_registration(keys in proptest::collection::vec("[a-e]", 1..12)) {
        let mut builder = MenuBuilder::<ScriptedConsole>::new(Description::new("Props").unwrap());
        let mut expected: Vec<String> = Vec::new();
        for key in &keys {
            builder = match builder.with_entry(Entry::create(key, "Entry").unwrap().exit()) {
                Ok(next) => {
                    prop_assert!(!expected.contains(key));
                    expected.push(key.clone());
                    next
                }
                Err(duplicate) => {
                    prop_assert!(expected.contains(key));
                    prop_assert_eq!(duplicate.key().as_str(), key.as_str());
                    duplicate.into_builder()
                }
            };
        }
        let menu = builder.build().unwrap();
        let actual: Vec<String> = menu.entries().iter().map(|e| e.key().to_string()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn builder_without_exit_never_builds(keys in proptest::collection::hash_set("[a-z]{1,3}", 0..8)) {
        let entries = keys.iter().map(|key| Entry::create(key, "Stay").unwrap());
        let builder = MenuBuilder::<ScriptedConsole>::new(Description::new("Props").unwrap())
            .with_entries(entries)
            .unwrap();
        prop_assert!(matches!(builder.build(), Err(MenuError::NoExit(_))));
    }
}
