//! Test utilities for docgraph
//!
//! This module provides common helpers for building small documentation
//! databases in tests: declaring classes and functions without spelling out
//! full [`Declaration`] values every time.

use crate::database::{Database, DeclKind, Declaration, FunctionDecl};
use crate::location::Location;
use crate::node::{Access, NodeId};

/// A throwaway source location for declared test entities
#[must_use]
pub fn test_location(line: u32) -> Location {
    Location::new("test.h", line, 1)
}

/// Declare a public class at the given parent path
pub fn declare_class(db: &mut Database, parent: &[&str], name: &str) -> NodeId {
    db.declare(&Declaration {
        kind: DeclKind::Class,
        parent_path: parent.iter().map(|s| (*s).to_string()).collect(),
        name: name.to_string(),
        access: Access::Public,
        location: test_location(1),
    })
}

/// Declare a public namespace at the given parent path
pub fn declare_namespace(db: &mut Database, parent: &[&str], name: &str) -> NodeId {
    db.declare(&Declaration {
        kind: DeclKind::Namespace,
        parent_path: parent.iter().map(|s| (*s).to_string()).collect(),
        name: name.to_string(),
        access: Access::Public,
        location: test_location(1),
    })
}

/// Declare a public member function from a raw signature string
pub fn declare_function(
    db: &mut Database,
    parent: &[&str],
    name: &str,
    signature: &str,
) -> NodeId {
    declare_function_with(db, parent, name, signature, FunctionDecl::default())
}

/// Declare a member function with full control over the function details
///
/// The `signature` argument overrides whatever `details.signature` holds.
pub fn declare_function_with(
    db: &mut Database,
    parent: &[&str],
    name: &str,
    signature: &str,
    details: FunctionDecl,
) -> NodeId {
    db.declare(&Declaration {
        kind: DeclKind::Function(FunctionDecl {
            signature: Some(signature.to_string()),
            ..details
        }),
        parent_path: parent.iter().map(|s| (*s).to_string()).collect(),
        name: name.to_string(),
        access: Access::Public,
        location: test_location(10),
    })
}

/// Attach a comment at a fresh location and return the documented nodes
pub fn comment(db: &mut Database, line: u32, text: &str) -> Vec<NodeId> {
    db.attach_comment(text, Location::new("test.cpp", line, 1))
}
