//! Building nested structure by writing through missing paths.
//!
//! Run with: cargo run --example lazy_paths

use json_node::Node;

fn main() {
    let mut scene = Node::object();

    // Every missing step along the way is created on write
    scene["camera"]["position"][0].set_double(0.0);
    scene["camera"]["position"][1].set_double(1.8);
    scene["camera"]["position"][2].set_double(-10.0);
    scene["camera"]["fov"].set_int(60);
    scene["lights"].add(Node::from("sun"));
    scene["lights"].add(Node::from("fill"));

    println!("{}\n", scene.to_pretty_string());

    // Reads never create anything
    assert_eq!(scene["camera"]["near"].as_double_or(0.3), 0.3);
    assert!(scene["missing"]["deeper"].is_lazy());
    assert!(!scene.contains_key("missing"));

    for leaf in scene.deep_children() {
        println!("leaf {} ({})", leaf.value(), leaf.kind());
    }
}
