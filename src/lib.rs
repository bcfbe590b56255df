//! Typed Graph
//!
//! A statically-typed access layer over an untyped, transactional property
//! graph. Domain code declares its vertex kinds, edge kinds and properties
//! once as constants, and every read is decoded back into the declared type.
//!
//! # Layers
//!
//! - [`schema`]: vertex/edge/property declarations and the [`Schema`] registry
//! - [`untyped`]: the capability traits [`UntypedGraph`] and [`UntypedTransaction`]
//! - [`adapter`]: [`EngineGraph`], the capability interface over the in-crate engine
//! - [`tx`]: [`Tx`], the scoped transaction with commit-on-drop
//! - [`graph`]: the backing engine (store, type registry, native transactions)
//!
//! ## Example Usage
//!
//! ```rust
//! use typed_graph::{GraphDatabase, Tx, UntypedGraph};
//! use typed_graph::schema::{EdgeDef, Property, VertexDef};
//!
//! const PERSON: VertexDef = VertexDef::new("Person");
//! const KNOWS: EdgeDef = EdgeDef::new("knows");
//! const NAME: Property<String> = Property::of_vertex(&PERSON, "name");
//!
//! let db = GraphDatabase::new();
//! let mut tx = Tx::begin(&db).unwrap();
//! let mut graph = tx.graph();
//!
//! let alice = graph.add_vertex(&PERSON).unwrap();
//! let bob = graph.add_vertex(&PERSON).unwrap();
//! graph.set_vertex(alice, &NAME, "Alice".to_string()).unwrap();
//! graph.add_edge(alice, &KNOWS, bob).unwrap();
//!
//! assert_eq!(graph.out_one_v(alice, &KNOWS).unwrap(), Some(bob));
//! assert_eq!(graph.in_one_v(bob, &KNOWS).unwrap(), Some(alice));
//! assert_eq!(graph.out_one_e(bob, &KNOWS).unwrap(), None);
//! assert_eq!(graph.get_vertex(alice, &NAME).unwrap().as_deref(), Some("Alice"));
//!
//! tx.success();
//! tx.commit().unwrap();
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod adapter;
pub mod config;
pub mod error;
pub mod graph;
pub mod schema;
pub mod tx;
pub mod untyped;

// Re-export main types for convenience
pub use adapter::{EdgeHandle, EngineGraph};
pub use config::{ConfigError, ConfigResult, EngineConfig, ResourceQuotas};
pub use error::{GraphError, GraphResult};
pub use graph::{
    ConstraintDefinition, DecodeError, Direction, EdgeId, EdgeType, GraphDatabase, Label, NodeId,
    PropertyValue, Timestamp, TxStatus,
};
pub use schema::{EdgeKind, ElementKind, PropertyKey, PropertyKind, Schema, SchemaError, VertexKind};
pub use tx::Tx;
pub use untyped::{UntypedGraph, UntypedTransaction};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
