//! Capability interface every backing engine adapter implements
//!
//! Two disjoint traits: [`UntypedGraph`] covers elements, properties and
//! traversal, and [`UntypedTransaction`] alone can commit or roll back.
//! Code holding only a graph cannot end the transaction it runs in.
//!
//! # Cardinality
//!
//! | accessor                 | 0 matches  | 1 match       | >1 matches                      |
//! |--------------------------|------------|---------------|---------------------------------|
//! | `out_e` / `in_e`         | empty      | one item      | every match                     |
//! | `out_one_e` / `in_one_e` | `Ok(None)` | `Ok(Some(e))` | `Err(CardinalityViolation)`     |
//! | `*_at_most_one_*`        | `Ok(None)` | `Ok(Some(e))` | `Err(CardinalityViolation)`     |

use crate::error::{GraphError, GraphResult};
use crate::graph::{Direction, PropertyValue, TxStatus};
use crate::schema::{EdgeKind, PropertyKey, PropertyKind, VertexKind};
use std::fmt::Debug;
use std::hash::Hash;

/// Lazily evaluated edges from a traversal
pub type Edges<'a, E> = Box<dyn Iterator<Item = E> + 'a>;

/// Lazily evaluated vertices from a traversal
pub type Vertices<'a, V> = Box<dyn Iterator<Item = V> + 'a>;

pub trait UntypedGraph {
    type Vertex: Copy + Eq + Hash + Debug;
    type Edge: Copy + Eq + Debug;

    fn add_vertex(&mut self, kind: &dyn VertexKind) -> GraphResult<Self::Vertex>;

    /// Fails if either endpoint does not exist
    fn add_edge(&mut self, from: Self::Vertex, kind: &dyn EdgeKind, to: Self::Vertex) -> GraphResult<Self::Edge>;

    /// Raw stored value, `None` if the key is not set
    fn vertex_property(&self, vertex: Self::Vertex, property: &dyn PropertyKey) -> GraphResult<Option<PropertyValue>>;

    fn set_vertex_property(
        &mut self,
        vertex: Self::Vertex,
        property: &dyn PropertyKey,
        value: PropertyValue,
    ) -> GraphResult<Self::Vertex>;

    fn edge_property(&self, edge: Self::Edge, property: &dyn PropertyKey) -> GraphResult<Option<PropertyValue>>;

    fn set_edge_property(
        &mut self,
        edge: Self::Edge,
        property: &dyn PropertyKey,
        value: PropertyValue,
    ) -> GraphResult<Self::Edge>;

    fn source(&self, edge: Self::Edge) -> Self::Vertex;

    fn target(&self, edge: Self::Edge) -> Self::Vertex;

    /// Edges of `kind` leaving `vertex`, in store order
    fn out_e(&self, vertex: Self::Vertex, kind: &dyn EdgeKind) -> GraphResult<Edges<'_, Self::Edge>>;

    /// Edges of `kind` arriving at `vertex`, in store order
    fn in_e(&self, vertex: Self::Vertex, kind: &dyn EdgeKind) -> GraphResult<Edges<'_, Self::Edge>>;

    /// Decode a vertex property as `P::Value`
    fn get_vertex<P: PropertyKind>(&self, vertex: Self::Vertex, property: &P) -> GraphResult<Option<P::Value>>
    where
        Self: Sized,
    {
        decode(property, self.vertex_property(vertex, property)?)
    }

    fn set_vertex<P: PropertyKind>(
        &mut self,
        vertex: Self::Vertex,
        property: &P,
        value: P::Value,
    ) -> GraphResult<Self::Vertex>
    where
        Self: Sized,
    {
        self.set_vertex_property(vertex, property, value.into())
    }

    /// Decode an edge property as `P::Value`
    fn get_edge<P: PropertyKind>(&self, edge: Self::Edge, property: &P) -> GraphResult<Option<P::Value>>
    where
        Self: Sized,
    {
        decode(property, self.edge_property(edge, property)?)
    }

    fn set_edge<P: PropertyKind>(&mut self, edge: Self::Edge, property: &P, value: P::Value) -> GraphResult<Self::Edge>
    where
        Self: Sized,
    {
        self.set_edge_property(edge, property, value.into())
    }

    fn out_v(&self, vertex: Self::Vertex, kind: &dyn EdgeKind) -> GraphResult<Vertices<'_, Self::Vertex>> {
        let edges = self.out_e(vertex, kind)?;
        Ok(Box::new(edges.map(move |edge| self.target(edge))))
    }

    fn in_v(&self, vertex: Self::Vertex, kind: &dyn EdgeKind) -> GraphResult<Vertices<'_, Self::Vertex>> {
        let edges = self.in_e(vertex, kind)?;
        Ok(Box::new(edges.map(move |edge| self.source(edge))))
    }

    fn out_one_e(&self, vertex: Self::Vertex, kind: &dyn EdgeKind) -> GraphResult<Option<Self::Edge>> {
        exactly_one(self.out_e(vertex, kind)?, &vertex, kind, Direction::Outgoing)
    }

    fn in_one_e(&self, vertex: Self::Vertex, kind: &dyn EdgeKind) -> GraphResult<Option<Self::Edge>> {
        exactly_one(self.in_e(vertex, kind)?, &vertex, kind, Direction::Incoming)
    }

    fn out_at_most_one_e(&self, vertex: Self::Vertex, kind: &dyn EdgeKind) -> GraphResult<Option<Self::Edge>> {
        self.out_one_e(vertex, kind)
    }

    fn in_at_most_one_e(&self, vertex: Self::Vertex, kind: &dyn EdgeKind) -> GraphResult<Option<Self::Edge>> {
        self.in_one_e(vertex, kind)
    }

    fn out_one_v(&self, vertex: Self::Vertex, kind: &dyn EdgeKind) -> GraphResult<Option<Self::Vertex>> {
        Ok(self.out_one_e(vertex, kind)?.map(|edge| self.target(edge)))
    }

    fn in_one_v(&self, vertex: Self::Vertex, kind: &dyn EdgeKind) -> GraphResult<Option<Self::Vertex>> {
        Ok(self.in_one_e(vertex, kind)?.map(|edge| self.source(edge)))
    }

    fn out_at_most_one_v(&self, vertex: Self::Vertex, kind: &dyn EdgeKind) -> GraphResult<Option<Self::Vertex>> {
        Ok(self.out_at_most_one_e(vertex, kind)?.map(|edge| self.target(edge)))
    }

    fn in_at_most_one_v(&self, vertex: Self::Vertex, kind: &dyn EdgeKind) -> GraphResult<Option<Self::Vertex>> {
        Ok(self.in_at_most_one_e(vertex, kind)?.map(|edge| self.source(edge)))
    }
}

/// The only capability that can end a transaction
pub trait UntypedTransaction {
    type Graph<'a>: UntypedGraph
    where
        Self: 'a;

    /// Element operations bound to this transaction
    fn graph(&mut self) -> Self::Graph<'_>;

    /// Persist if marked successful, otherwise discard; returns the final status
    fn commit(self) -> GraphResult<TxStatus>
    where
        Self: Sized;

    /// Discard unconditionally
    fn rollback(self) -> GraphResult<()>
    where
        Self: Sized;
}

fn decode<P: PropertyKind>(property: &P, value: Option<PropertyValue>) -> GraphResult<Option<P::Value>> {
    value
        .map(|v| v.decode::<P::Value>().map_err(|e| GraphError::decode(property.key(), e)))
        .transpose()
}

/// Pull at most two items; count the rest only to report a violation
fn exactly_one<T, V: Debug>(
    mut matches: impl Iterator<Item = T>,
    vertex: &V,
    kind: &dyn EdgeKind,
    direction: Direction,
) -> GraphResult<Option<T>> {
    let Some(first) = matches.next() else {
        return Ok(None);
    };
    if matches.next().is_none() {
        return Ok(Some(first));
    }
    Err(GraphError::CardinalityViolation {
        vertex: format!("{:?}", vertex),
        edge_type: kind.label().to_string(),
        direction,
        count: 2 + matches.count(),
    })
}
