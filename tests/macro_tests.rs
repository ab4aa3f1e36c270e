use json_node::{json_node, JsonObject, Kind, Node};
use serde::Serialize;

#[test]
fn test_json_node_macro_null() {
    let value = json_node!(null);
    assert!(value.is_null());
    assert_eq!(value.kind(), Kind::Null);
}

#[test]
fn test_json_node_macro_booleans() {
    let true_val = json_node!(true);
    assert!(true_val.as_bool());
    assert_eq!(true_val.kind(), Kind::Boolean);

    let false_val = json_node!(false);
    assert!(!false_val.as_bool());
    assert_eq!(false_val.to_compact_string(), "false");
}

#[test]
fn test_json_node_macro_numbers() {
    let int_val = json_node!(42);
    assert_eq!(int_val.as_int(), 42);
    assert_eq!(int_val.kind(), Kind::Integer);

    let float_val = json_node!(3.5);
    assert_eq!(float_val.as_double(), 3.5);
    assert_eq!(float_val.kind(), Kind::Float);

    let negative_val = json_node!(-123);
    assert_eq!(negative_val.as_int(), -123);
}

#[test]
fn test_json_node_macro_strings() {
    let string_val = json_node!("hello world");
    assert_eq!(string_val.as_str(), Some("hello world"));
    assert_eq!(string_val.to_compact_string(), r#""hello world""#);

    let empty_string = json_node!("");
    assert_eq!(empty_string.as_str(), Some(""));
    assert_eq!(empty_string.to_compact_string(), r#""""#);
}

#[test]
fn test_json_node_macro_arrays() {
    let empty_array = json_node!([]);
    assert!(empty_array.is_array());
    assert!(empty_array.is_empty());

    let number_array = json_node!([1, 2, 3]);
    assert_eq!(number_array.count(), 3);
    assert_eq!(number_array[2].as_int(), 3);

    let mixed_array = json_node!([1, "hello", true, null]);
    assert_eq!(mixed_array.to_compact_string(), r#"[1,"hello",true,null]"#);
}

#[test]
fn test_json_node_macro_objects() {
    let empty_object = json_node!({});
    assert_eq!(empty_object, Node::Object(JsonObject::new()));

    let simple_object = json_node!({
        "name": "Alice",
        "age": 30,
        "active": true,
    });
    assert_eq!(simple_object.keys().collect::<Vec<_>>(), vec!["name", "age", "active"]);
    assert_eq!(simple_object["age"].as_int(), 30);
}

#[test]
fn test_json_node_macro_nested() {
    let nested = json_node!({
        "user": {
            "name": "Bob",
            "roles": ["admin", "dev"]
        },
        "matrix": [[1, 2], [3, 4]],
        "empty": {}
    });

    assert_eq!(nested["user"]["roles"][1].as_str(), Some("dev"));
    assert_eq!(nested["matrix"][1][0].as_int(), 3);
    assert_eq!(
        nested.to_compact_string(),
        r#"{"user":{"name":"Bob","roles":["admin","dev"]},"matrix":[[1,2],[3,4]],"empty":{}}"#
    );
}

#[test]
fn test_json_node_macro_expressions() {
    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    let count = 7;
    let point = Point { x: 1, y: 2 };
    let names = vec!["a", "b"];
    let node = json_node!({
        "count": count,
        "point": point,
        "names": names
    });

    assert_eq!(node["count"].as_int(), 7);
    assert_eq!(node["point"]["y"].as_int(), 2);
    assert_eq!(node["names"].count(), 2);
}

#[test]
fn test_json_node_macro_matches_parse() {
    let built = json_node!({"a": [1, {"b": null}], "c": "text"});
    let parsed = json_node::parse(r#"{"a":[1,{"b":null}],"c":"text"}"#).unwrap();
    assert_eq!(built, parsed);
}
