//! Errors surfaced by the engine, the adapter and transactions

use crate::graph::{ConstraintDefinition, DecodeError, Direction, EdgeId, Label, NodeId, PropertyValue};
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("Invalid edge: source node {0} does not exist")]
    InvalidEdgeSource(NodeId),

    #[error("Invalid edge: target node {0} does not exist")]
    InvalidEdgeTarget(NodeId),

    /// An exactly-one traversal matched more than one edge
    #[error("expected at most one {direction} '{edge_type}' edge on {vertex}, found {count}")]
    CardinalityViolation {
        vertex: String,
        edge_type: String,
        direction: Direction,
        count: usize,
    },

    #[error("property '{key}': {source}")]
    DecodeMismatch {
        key: String,
        #[source]
        source: DecodeError,
    },

    #[error("{label}.{property} = {value} already held by {existing}")]
    ConstraintViolation {
        label: Label,
        property: String,
        value: PropertyValue,
        existing: NodeId,
    },

    #[error("constraint {0} already exists")]
    ConstraintAlreadyExists(ConstraintDefinition),

    /// Uniqueness is only enforced among vertices
    #[error("property '{owner}.{key}' is on an edge type and cannot be unique")]
    EdgePropertyConstraint { owner: String, key: String },

    #[error("transaction is no longer open")]
    TransactionClosed,

    /// The commit could not be applied; every mutation was rolled back
    #[error("commit failed: {0}")]
    CommitFailed(Box<GraphError>),

    /// The calling thread already holds the engine through an open transaction
    #[error("this thread already has an open transaction")]
    TransactionAlreadyOpen,

    #[error("database has been shut down")]
    DatabaseShutdown,

    #[error("quota exceeded: at most {limit} {resource}")]
    QuotaExceeded { resource: &'static str, limit: usize },
}

impl GraphError {
    pub(crate) fn decode(key: &str, source: DecodeError) -> Self {
        GraphError::DecodeMismatch {
            key: key.to_string(),
            source,
        }
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
