//! Docgraph Core - Documentation model for C++/QML API reference
//!
//! This crate provides the core functionality:
//! - Doc: parsed documentation comments, topic and metacommands
//! - Params: C++ parameter list parsing and signatures
//! - Node: the typed node graph of documented entities
//! - Attach: binding comments to declared entities
//! - Resolve: inheritance, overloads, properties, cross-module merging
//! - Index: module index export and loading
//! - Database: the façade front ends and generators talk to

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Source locations for entities, comments and diagnostics
pub mod location;

/// Error and diagnostic types
pub mod error;

/// Documentation comment model - topics, metacommands, brief and body
pub mod doc;

/// Parameter model - parsing C++ parameter lists into typed parameters
pub mod params;

/// Node graph - arena-allocated nodes for every documented entity
pub mod node;

/// The documentation database façade
pub mod database;

/// Comment attachment - resolving topic commands to nodes
mod attach;

/// Resolution passes run once input is complete
pub mod resolve;

/// Module index files - cross-module linking without reparsing
pub mod index;

/// Test utilities - helpers for building small documentation trees
pub mod testutil;

pub use database::{Database, DeclKind, Declaration, FunctionDecl, PropertyDecl};
pub use doc::Doc;
pub use error::{Diagnostic, DiagnosticKind, Error};
pub use location::Location;
pub use node::{Node, NodeId, NodeType};
pub use params::{Parameter, Parameters};
