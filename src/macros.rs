/// Builds a [`Node`](crate::Node) from JSON-like literal syntax.
///
/// Any other expression is converted with [`from_object`](crate::from_object).
///
/// ```rust
/// use json_node::json_node;
///
/// let id = 7;
/// let node = json_node!({
///     "id": id,
///     "tags": ["a", "b"],
///     "meta": { "ok": true, "note": null }
/// });
/// assert_eq!(
///     node.to_compact_string(),
///     r#"{"id":7,"tags":["a","b"],"meta":{"ok":true,"note":null}}"#
/// );
/// ```
#[macro_export]
macro_rules! json_node {
    (null) => {
        $crate::Node::null()
    };

    (true) => {
        $crate::Node::from(true)
    };

    (false) => {
        $crate::Node::from(false)
    };

    ([]) => {
        $crate::Node::array()
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Node::from(vec![$($crate::json_node!($elem)),*])
    };

    ({}) => {
        $crate::Node::object()
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::JsonObject::new();
        $(
            object.insert($key, $crate::json_node!($value));
        )*
        $crate::Node::Object(object)
    }};

    ($other:expr) => {
        $crate::from_object(&$other)
    };
}
