use proptest::prelude::*;

use crate::property::{extend_list, flatten_index_map, IndexKey, Value};

fn values() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec("[a-z]{1,6}".prop_map(Value::from), 0..6)
}

// Property: extension always yields n entries, copies the prefix, then repeats the last
proptest! {
    #[test]
    fn prop_extend_list_fills_to_length(list in values(), n in 0usize..12) {
        let extended = extend_list(&list, n);
        prop_assert_eq!(extended.len(), n);

        for (i, slot) in extended.iter().enumerate() {
            match list.last() {
                None => prop_assert!(slot.is_none()),
                Some(last) => prop_assert_eq!(slot.as_ref(), Some(list.get(i).unwrap_or(last))),
            }
        }
    }
}

// Property: formatting indices as "i,j,k" or "(i, j, k)" parses back to the same indices
proptest! {
    #[test]
    fn prop_index_key_parse_roundtrip(indices in prop::collection::vec(0usize..1000, 2..6)) {
        let plain = indices.iter().map(usize::to_string).collect::<Vec<_>>().join(",");
        let tupled = format!("({})", plain.replace(',', ", "));

        for text in [plain, tupled] {
            let key = IndexKey::parse(&text).unwrap();
            prop_assert_eq!(key.indices(), indices.as_slice());
        }
    }

    #[test]
    fn prop_index_key_single(index in 0usize..100_000) {
        prop_assert_eq!(IndexKey::parse(&index.to_string()).unwrap(), IndexKey::Single(index));
    }

    #[test]
    fn prop_index_key_rejects_words(word in "[a-z]{1,8}") {
        prop_assert!(IndexKey::parse(&word).is_err());
    }
}

// Property: a tuple key is the same as one entry per index
proptest! {
    #[test]
    fn prop_tuple_keys_flatten_like_singles(
        indices in prop::collection::btree_set(0usize..20, 1..6),
        color in "[a-z]{3,8}",
    ) {
        let indices: Vec<usize> = indices.into_iter().collect();
        let tupled = flatten_index_map(&[(IndexKey::Many(indices.clone()), Value::from(color.as_str()))]);
        let singles: Vec<(IndexKey, Value)> = indices
            .iter()
            .map(|&i| (IndexKey::Single(i), Value::from(color.as_str())))
            .collect();
        prop_assert_eq!(tupled, flatten_index_map(&singles));
    }
}
