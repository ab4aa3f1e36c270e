//! Property-based tests for the round-trip guarantees
//!
//! Values are generated as Rust data, converted to nodes, and pushed through each
//! text and binary form.

use json_node::{from_object, parse, to_typed, Node};
use proptest::prelude::*;
use serde::{Deserialize, Serialize};

fn text_roundtrip<T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug>(
    value: &T,
) -> bool {
    let text = from_object(value).to_compact_string();
    match parse(&text) {
        Ok(node) => match to_typed::<T>(&node) {
            Ok(back) => *value == back,
            Err(e) => {
                eprintln!("Extraction failed: {}", e);
                eprintln!("Text was: {}", text);
                false
            }
        },
        Err(e) => {
            eprintln!("Parse failed: {}", e);
            eprintln!("Text was: {}", text);
            false
        }
    }
}

fn binary_roundtrip(node: &Node) -> bool {
    match node.to_bytes().and_then(|bytes| Node::from_bytes(&bytes)) {
        Ok(back) => back == *node && back.to_compact_string() == node.to_compact_string(),
        Err(e) => {
            eprintln!("Binary round trip failed: {}", e);
            false
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Record {
    id: i32,
    label: String,
    enabled: bool,
    scores: Vec<i64>,
}

fn record_strategy() -> impl Strategy<Value = Record> {
    (
        any::<i32>(),
        "[a-zA-Z0-9 _:,{}\\[\\]\"\\\\-]{0,24}",
        any::<bool>(),
        prop::collection::vec(any::<i64>(), 0..8),
    )
        .prop_map(|(id, label, enabled, scores)| Record {
            id,
            label,
            enabled,
            scores,
        })
}

proptest! {
    #[test]
    fn prop_i32(n in any::<i32>()) {
        prop_assert!(text_roundtrip(&n));
    }

    #[test]
    fn prop_i64(n in any::<i64>()) {
        prop_assert!(text_roundtrip(&n));
    }

    #[test]
    fn prop_bool(b in any::<bool>()) {
        prop_assert!(text_roundtrip(&b));
    }

    #[test]
    fn prop_vec_i32(v in prop::collection::vec(any::<i32>(), 0..20)) {
        prop_assert!(text_roundtrip(&v));
    }

    #[test]
    fn prop_strings(s in "\\PC{0,32}") {
        prop_assert!(text_roundtrip(&vec![s]));
    }

    #[test]
    fn prop_record(record in record_strategy()) {
        prop_assert!(text_roundtrip(&record));
    }

    #[test]
    fn prop_finite_doubles(x in -1.0e12f64..1.0e12f64) {
        let node = parse(&from_object(&vec![x]).to_compact_string()).unwrap();
        prop_assert_eq!(node[0].as_double(), x);
    }

    #[test]
    fn prop_reparse_is_idempotent(record in record_strategy()) {
        let first = from_object(&record).to_compact_string();
        let second = parse(&first).unwrap().to_compact_string();
        prop_assert_eq!(&first, &second);
        let pretty = parse(&first).unwrap().to_pretty_string();
        prop_assert_eq!(parse(&pretty).unwrap().to_compact_string(), first);
    }

    #[test]
    fn prop_binary_record(record in record_strategy()) {
        prop_assert!(binary_roundtrip(&from_object(&record)));
    }

    #[test]
    fn prop_binary_scalars(n in any::<i32>(), x in any::<f64>(), b in any::<bool>(), s in "\\PC{0,16}") {
        prop_assume!(x.is_finite());
        let node = Node::from(vec![Node::from(n), Node::from(x), Node::from(b), Node::from(s)]);
        prop_assert!(binary_roundtrip(&node));
    }
}
