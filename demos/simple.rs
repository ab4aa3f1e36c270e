//! Reading a tool call and writing a typed reply.
//!
//! Run with: cargo run --example simple

use json_node::{from_object, parse, to_typed};
use serde::{Deserialize, Serialize};
use std::error::Error;

#[derive(Debug, Deserialize, PartialEq)]
struct MoveArgs {
    target: String,
    position: Vec<f32>,
    relative: bool,
}

#[derive(Debug, Serialize)]
struct MoveReply {
    target: String,
    moved: bool,
    warnings: Vec<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    // A peer that serialized its arguments twice
    let raw = r#""{\"target\":\"Cube\",\"position\":[\"1.5\",2,0],\"relative\":\"TRUE\"}""#;

    let args = parse(raw)?;
    println!("Parsed arguments:\n{}\n", args.to_pretty_string());

    let typed: MoveArgs = to_typed(&args)?;
    assert_eq!(typed.position, vec![1.5, 2.0, 0.0]);
    assert!(typed.relative);

    let reply = from_object(&MoveReply {
        target: typed.target,
        moved: true,
        warnings: vec![],
    });
    println!("Reply: {}", reply);

    Ok(())
}
