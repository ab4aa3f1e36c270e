//! One tree, every output format.
//!
//! Run with: cargo run --example renderers

use json_node::{json_node, FormatOptions, Node};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    let node = json_node!({
        "name": "Player",
        "active": "true",
        "health": 87.5,
        "inventory": ["sword", "shield"],
        "stats": [{"level": 3, "xp": 1200}, {"level": 4, "xp": 0}],
        "notes": {}
    });

    println!("Compact:\n{}\n", node.to_compact_string());
    println!("Pretty:\n{}\n", node.to_pretty_string());
    println!(
        "Pretty, two spaces:\n{}\n",
        node.to_pretty_string_with(&FormatOptions::json().with_indent(2))
    );
    println!("YAML:\n{}\n", node.to_yaml_string());

    let bytes = node.to_bytes()?;
    let back = Node::from_bytes(&bytes)?;
    assert_eq!(back, node);
    println!("Binary: {} bytes, round trip ok", bytes.len());

    Ok(())
}
