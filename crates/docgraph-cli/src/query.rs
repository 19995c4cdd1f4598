//! The `query` subcommand
//!
//! Loads one exported index and looks up a qualified name or function
//! signature, printing what a generator would know about the entity.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{bail, Context, Result};

use docgraph_core::node::Genus;
use docgraph_core::{Database, NodeId};

pub fn run(index_path: &Path, target: &str) -> Result<()> {
    let file = File::open(index_path)
        .with_context(|| format!("cannot open index {}", index_path.display()))?;
    let mut db = Database::new("query");
    db.load_index(BufReader::new(file))
        .with_context(|| format!("cannot load index {}", index_path.display()))?;

    let found = if target.contains('(') {
        db.find_function_node(target)
    } else {
        let path: Vec<String> = target.split("::").map(str::to_string).collect();
        db.find_node_by_path(&path, Genus::DontCare)
    };
    let Some(node) = found else {
        bail!("no entity matches '{target}'");
    };

    print_node(&db, node);
    Ok(())
}

fn print_node(db: &Database, node: NodeId) {
    let arena = db.arena();
    let entity = &arena[node];
    println!("name:    {}", arena.plain_full_name(node));
    println!("kind:    {:?}", entity.node_type());
    println!("access:  {:?}", entity.access);
    println!("status:  {:?}", entity.status());
    if !entity.since.is_empty() {
        println!("since:   {}", entity.since);
    }
    if let Some(function) = entity.as_function() {
        println!("signature: {}", arena.function_signature(node));
        if function.overload_number > 0 {
            println!("overload:  {}", function.overload_number);
        }
    }
    if let Some(class) = entity.as_class() {
        let bases: Vec<String> = class
            .bases
            .iter()
            .filter_map(|b| b.node.map(|n| arena.plain_full_name(n)))
            .collect();
        if !bases.is_empty() {
            println!("bases:   {}", bases.join(", "));
        }
    }
    if entity.had_doc {
        println!("documented in its home module");
    }
}
