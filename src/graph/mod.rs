//! Backing graph engine
//!
//! An in-memory property graph with:
//! - Nodes carrying one immutable label and a property map
//! - Directed, typed relationships with their own properties
//! - Interned label and relationship-type handles
//! - Uniqueness constraints over (label, property key)
//! - Lock-based transactions with an undo journal

pub mod constraint;
pub mod edge;
pub mod engine;
mod journal;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

pub use constraint::ConstraintDefinition;
pub use edge::Edge;
pub use engine::{GraphDatabase, Transaction, TxStatus};
pub use node::Node;
pub use property::{DecodeError, FromPropertyValue, PropertyMap, PropertyValue, Timestamp};
pub use store::{GraphStatistics, GraphStore};
pub use types::{Direction, EdgeId, EdgeType, Label, NodeId};
