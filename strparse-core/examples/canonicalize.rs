//! Print the canonical form of a relaxed JSON document read from stdin.
//!
//! Set `RUST_LOG=debug` to see where the parser skipped or recovered.

use std::io::Read;
use strparse_core::json::tree::Document;

fn main() -> std::io::Result<()> {
    env_logger::init();

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;

    let doc = Document::parse(&input);
    println!("{}", doc);
    eprintln!("{} nodes", doc.len());
    Ok(())
}
