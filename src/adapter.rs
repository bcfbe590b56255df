//! Backend adapter: the capability interface over [`GraphDatabase`]
//!
//! [`EngineGraph`] is bound to one open native transaction and delegates
//! every call to it. Type identifiers become engine handles by name, and
//! `out_v`/`in_v` are always derived from the edge sequences so the two
//! directions can never disagree.
//!
//! [`GraphDatabase`]: crate::graph::GraphDatabase

use crate::error::{GraphError, GraphResult};
use crate::graph::{ConstraintDefinition, Direction, Edge, EdgeId, EdgeType, Label, NodeId, PropertyValue, Transaction};
use crate::schema::{EdgeKind, ElementKind, PropertyKey, Schema, VertexKind};
use crate::untyped::{Edges, UntypedGraph};
use tracing::debug;

/// Engine edge handle
///
/// Carries both endpoints so `source`/`target` never touch the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeHandle {
    id: EdgeId,
    source: NodeId,
    target: NodeId,
}

impl EdgeHandle {
    pub fn id(&self) -> EdgeId {
        self.id
    }
}

impl From<&Edge> for EdgeHandle {
    fn from(edge: &Edge) -> Self {
        EdgeHandle {
            id: edge.id,
            source: edge.source,
            target: edge.target,
        }
    }
}

/// Relationship type handle for an edge kind, without registering it
fn rel_type(kind: &dyn EdgeKind) -> EdgeType {
    EdgeType::new(kind.label())
}

pub struct EngineGraph<'t, 'db> {
    tx: &'t mut Transaction<'db>,
}

impl<'t, 'db> EngineGraph<'t, 'db> {
    pub(crate) fn new(tx: &'t mut Transaction<'db>) -> Self {
        EngineGraph { tx }
    }

    /// Lookup-or-create the engine label for a vertex kind
    pub fn vertex_label(&mut self, kind: &dyn VertexKind) -> GraphResult<Label> {
        self.tx.label(kind.label())
    }

    /// Lookup-or-create the engine relationship type for an edge kind
    pub fn relationship_type(&mut self, kind: &dyn EdgeKind) -> GraphResult<EdgeType> {
        self.tx.relationship_type(kind.label())
    }

    pub fn label_of(&self, vertex: NodeId) -> GraphResult<&Label> {
        Ok(self.tx.node(vertex)?.label())
    }

    pub fn edge_type_of(&self, edge: EdgeHandle) -> GraphResult<&EdgeType> {
        Ok(&self.tx.relationship(edge.id)?.edge_type)
    }

    /// Ask the engine for a uniqueness constraint on (owner label, key)
    ///
    /// The engine refuses a second identical constraint with
    /// [`GraphError::ConstraintAlreadyExists`](crate::GraphError::ConstraintAlreadyExists).
    pub fn unique_constraint_for(&mut self, property: &dyn PropertyKey) -> GraphResult<ConstraintDefinition> {
        let label = self.constrained_label(property)?;
        self.tx.create_unique_constraint(label, property.key())
    }

    /// Return the oldest constraint already covering `property`, or create one
    ///
    /// Lookup and creation run under the transaction's engine lock, so no
    /// other caller can slip a constraint in between.
    pub fn create_or_get_unique_constraint_for(&mut self, property: &dyn PropertyKey) -> GraphResult<ConstraintDefinition> {
        let label = self.constrained_label(property)?;
        let existing = self
            .tx
            .constraints_for(&label)?
            .into_iter()
            .find(|c| c.property_key == property.key());

        match existing {
            Some(constraint) => {
                debug!("reusing constraint {}", constraint);
                Ok(constraint)
            }
            None => self.tx.create_unique_constraint(label, property.key()),
        }
    }

    /// Get-or-create a constraint for every unique property in `schema`
    pub fn ensure_schema(&mut self, schema: &Schema) -> GraphResult<Vec<ConstraintDefinition>> {
        for label in schema.vertex_labels() {
            self.tx.label(label)?;
        }
        for label in schema.edge_labels() {
            self.tx.relationship_type(label)?;
        }
        schema
            .unique_properties()
            .map(|property| self.create_or_get_unique_constraint_for(property))
            .collect()
    }

    /// Vertex label owning `property`; edge properties are refused before
    /// anything is registered
    fn constrained_label(&mut self, property: &dyn PropertyKey) -> GraphResult<Label> {
        if property.owner_kind() == ElementKind::Edge {
            return Err(GraphError::EdgePropertyConstraint {
                owner: property.owner().to_string(),
                key: property.key().to_string(),
            });
        }
        self.tx.label(property.owner())
    }

    fn edges(&self, vertex: NodeId, kind: &dyn EdgeKind, direction: Direction) -> GraphResult<Edges<'_, EdgeHandle>> {
        let edges = self.tx.relationships(vertex, rel_type(kind), direction)?;
        Ok(Box::new(edges.map(EdgeHandle::from)))
    }
}

impl UntypedGraph for EngineGraph<'_, '_> {
    type Vertex = NodeId;
    type Edge = EdgeHandle;

    fn add_vertex(&mut self, kind: &dyn VertexKind) -> GraphResult<NodeId> {
        let label = self.vertex_label(kind)?;
        self.tx.create_node(label)
    }

    fn add_edge(&mut self, from: NodeId, kind: &dyn EdgeKind, to: NodeId) -> GraphResult<EdgeHandle> {
        let edge_type = self.relationship_type(kind)?;
        let id = self.tx.create_relationship(from, to, edge_type)?;
        Ok(EdgeHandle {
            id,
            source: from,
            target: to,
        })
    }

    fn vertex_property(&self, vertex: NodeId, property: &dyn PropertyKey) -> GraphResult<Option<PropertyValue>> {
        Ok(self.tx.node(vertex)?.get_property(property.key()).cloned())
    }

    fn set_vertex_property(
        &mut self,
        vertex: NodeId,
        property: &dyn PropertyKey,
        value: PropertyValue,
    ) -> GraphResult<NodeId> {
        self.tx.set_node_property(vertex, property.key(), value)?;
        Ok(vertex)
    }

    fn edge_property(&self, edge: EdgeHandle, property: &dyn PropertyKey) -> GraphResult<Option<PropertyValue>> {
        Ok(self.tx.relationship(edge.id)?.get_property(property.key()).cloned())
    }

    fn set_edge_property(
        &mut self,
        edge: EdgeHandle,
        property: &dyn PropertyKey,
        value: PropertyValue,
    ) -> GraphResult<EdgeHandle> {
        self.tx.set_relationship_property(edge.id, property.key(), value)?;
        Ok(edge)
    }

    fn source(&self, edge: EdgeHandle) -> NodeId {
        edge.source
    }

    fn target(&self, edge: EdgeHandle) -> NodeId {
        edge.target
    }

    fn out_e(&self, vertex: NodeId, kind: &dyn EdgeKind) -> GraphResult<Edges<'_, EdgeHandle>> {
        self.edges(vertex, kind, Direction::Outgoing)
    }

    fn in_e(&self, vertex: NodeId, kind: &dyn EdgeKind) -> GraphResult<Edges<'_, EdgeHandle>> {
        self.edges(vertex, kind, Direction::Incoming)
    }
}
