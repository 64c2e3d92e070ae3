//! Property-based tests for listing extraction and order checks

#[cfg(test)]
mod tests {
    use crate::core::listing::{filter_labels, Item};
    use crate::core::order::ExpectedOrder;
    use proptest::prelude::*;

    // File-like labels drawn from a small alphabet so that collisions happen often
    fn label() -> impl Strategy<Value = String> {
        "[a1. ]{1,4}"
    }

    proptest! {
        #[test]
        fn test_filter_output_is_subsequence_of_rendered(
            rendered in prop::collection::vec(label(), 0..20),
            wanted in prop::collection::vec(label(), 0..5),
        ) {
            let items: Vec<Item> = rendered.iter().map(Item::new).collect();
            let filtered = filter_labels(&items, &wanted);

            let mut cursor = rendered.iter();
            for label in &filtered {
                prop_assert!(cursor.any(|r| r == label));
            }
        }

        #[test]
        fn test_filter_only_returns_wanted_labels(
            rendered in prop::collection::vec(label(), 0..20),
            wanted in prop::collection::vec(label(), 0..5),
        ) {
            let items: Vec<Item> = rendered.iter().map(Item::new).collect();
            for label in filter_labels(&items, &wanted) {
                prop_assert!(wanted.contains(&label));
            }
        }

        #[test]
        fn test_filter_count_matches_exact_occurrences(
            rendered in prop::collection::vec(label(), 0..20),
            wanted in prop::collection::vec(label(), 0..5),
        ) {
            let items: Vec<Item> = rendered.iter().map(Item::new).collect();
            let expected = rendered.iter().filter(|r| wanted.contains(r)).count();
            prop_assert_eq!(filter_labels(&items, &wanted).len(), expected);
        }

        #[test]
        fn test_rendered_order_always_satisfies_itself(
            labels in prop::collection::hash_set("[a-z0-9]{1,6}", 1..8),
        ) {
            let labels: Vec<String> = labels.into_iter().collect();
            let mut rendered = labels.clone();
            rendered.reverse();

            let expected = ExpectedOrder::from_rendered(&labels, &rendered).unwrap();
            prop_assert!(expected.check(&rendered).is_ok());
            prop_assert_eq!(expected.rendered(), rendered);
        }
    }
}
