//! In-memory graph storage
//!
//! The store itself is not transactional; [`super::engine::Transaction`]
//! journals every mutation it makes here so it can undo them.

use super::constraint::ConstraintDefinition;
use super::edge::Edge;
use super::node::Node;
use super::property::{PropertyValue, ValueKey};
use super::types::{Direction, EdgeId, EdgeType, Label, NodeId};
use crate::config::ResourceQuotas;
use crate::error::{GraphError, GraphResult};
use indexmap::{IndexMap, IndexSet};
use std::collections::{HashMap, HashSet};

/// Nodes holding each value under one uniqueness constraint
///
/// A value may have several holders while a transaction is open; commit
/// rejects any touched node that shares its value.
type UniqueIndex = HashMap<ValueKey, HashSet<NodeId>>;

/// In-memory graph storage
///
/// - nodes: NodeId -> Node (arena, `None` once a node is undone)
/// - edges: EdgeId -> Edge
/// - outgoing / incoming: NodeId -> Vec<EdgeId> adjacency lists
/// - label_index: Label -> NodeIds carrying it
/// - labels / edge_types: interned type handles in registration order
/// - constraints: uniqueness constraints in creation order, each with its value index
#[derive(Debug)]
pub struct GraphStore {
    nodes: Vec<Option<Node>>,
    edges: Vec<Option<Edge>>,
    outgoing: Vec<Vec<EdgeId>>,
    incoming: Vec<Vec<EdgeId>>,
    label_index: HashMap<Label, HashSet<NodeId>>,
    labels: IndexSet<Label>,
    edge_types: IndexSet<EdgeType>,
    constraints: IndexMap<ConstraintDefinition, UniqueIndex>,
    quotas: ResourceQuotas,
    node_count: usize,
    edge_count: usize,
    next_node_id: u64,
    next_edge_id: u64,
    /// Number of committed transactions
    pub(crate) current_version: u64,
}

/// Snapshot of store sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    pub label_count: usize,
    pub edge_type_count: usize,
    pub constraint_count: usize,
    pub committed_version: u64,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::with_quotas(ResourceQuotas::unlimited(), 1024)
    }

    pub fn with_quotas(quotas: ResourceQuotas, capacity: usize) -> Self {
        GraphStore {
            // Slot 0 is never handed out; ids start at 1.
            nodes: Vec::with_capacity(capacity),
            edges: Vec::with_capacity(capacity * 4),
            outgoing: Vec::with_capacity(capacity),
            incoming: Vec::with_capacity(capacity),
            label_index: HashMap::new(),
            labels: IndexSet::new(),
            edge_types: IndexSet::new(),
            constraints: IndexMap::new(),
            quotas,
            node_count: 0,
            edge_count: 0,
            next_node_id: 1,
            next_edge_id: 1,
            current_version: 0,
        }
    }

    /// Look up or register a label handle
    pub fn resolve_label(&mut self, name: &str) -> Label {
        if let Some(label) = self.labels.get(name) {
            return label.clone();
        }
        let label = Label::new(name);
        self.labels.insert(label.clone());
        label
    }

    /// Look up or register a relationship type handle
    pub fn resolve_edge_type(&mut self, name: &str) -> EdgeType {
        if let Some(edge_type) = self.edge_types.get(name) {
            return edge_type.clone();
        }
        let edge_type = EdgeType::new(name);
        self.edge_types.insert(edge_type.clone());
        edge_type
    }

    pub fn create_node(&mut self, label: Label) -> GraphResult<NodeId> {
        if let Some(limit) = self.quotas.max_nodes {
            if self.node_count >= limit {
                return Err(GraphError::QuotaExceeded { resource: "nodes", limit });
            }
        }

        let node_id = NodeId::new(self.next_node_id);
        self.next_node_id += 1;
        let idx = node_id.index();

        if idx >= self.nodes.len() {
            self.nodes.resize(idx + 1, None);
            self.outgoing.resize(idx + 1, Vec::new());
            self.incoming.resize(idx + 1, Vec::new());
        }

        self.label_index
            .entry(label.clone())
            .or_default()
            .insert(node_id);
        self.nodes[idx] = Some(Node::new(node_id, label));
        self.node_count += 1;
        Ok(node_id)
    }

    /// Remove a node that has no remaining relationships
    pub(crate) fn remove_node(&mut self, id: NodeId) -> GraphResult<Node> {
        let idx = id.index();
        let node = self
            .nodes
            .get_mut(idx)
            .and_then(Option::take)
            .ok_or(GraphError::NodeNotFound(id))?;
        debug_assert!(self.outgoing[idx].is_empty() && self.incoming[idx].is_empty());

        if let Some(ids) = self.label_index.get_mut(node.label()) {
            ids.remove(&id);
        }
        for (key, value) in &node.properties {
            self.reindex(id, node.label(), key, Some(ValueKey::from(value)), None);
        }
        self.node_count -= 1;
        Ok(node)
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> GraphResult<&mut Node> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(GraphError::NodeNotFound(id))
    }

    pub fn has_node(&self, id: NodeId) -> bool {
        self.get_node(id).is_some()
    }

    pub fn create_edge(&mut self, source: NodeId, target: NodeId, edge_type: EdgeType) -> GraphResult<EdgeId> {
        if !self.has_node(source) {
            return Err(GraphError::InvalidEdgeSource(source));
        }
        if !self.has_node(target) {
            return Err(GraphError::InvalidEdgeTarget(target));
        }
        if let Some(limit) = self.quotas.max_edges {
            if self.edge_count >= limit {
                return Err(GraphError::QuotaExceeded { resource: "edges", limit });
            }
        }

        let edge_id = EdgeId::new(self.next_edge_id);
        self.next_edge_id += 1;
        let idx = edge_id.index();

        self.outgoing[source.index()].push(edge_id);
        self.incoming[target.index()].push(edge_id);

        if idx >= self.edges.len() {
            self.edges.resize(idx + 1, None);
        }

        self.edges[idx] = Some(Edge::new(edge_id, source, target, edge_type));
        self.edge_count += 1;
        Ok(edge_id)
    }

    pub(crate) fn remove_edge(&mut self, id: EdgeId) -> GraphResult<Edge> {
        let edge = self
            .edges
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(GraphError::EdgeNotFound(id))?;

        self.outgoing[edge.source.index()].retain(|e| *e != id);
        self.incoming[edge.target.index()].retain(|e| *e != id);
        self.edge_count -= 1;
        Ok(edge)
    }

    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index()).and_then(Option::as_ref)
    }

    fn edge_mut(&mut self, id: EdgeId) -> GraphResult<&mut Edge> {
        self.edges
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(GraphError::EdgeNotFound(id))
    }

    /// Set a node property, returning the value it replaced
    pub fn set_node_property(
        &mut self,
        id: NodeId,
        key: &str,
        value: PropertyValue,
    ) -> GraphResult<Option<PropertyValue>> {
        let new_key = ValueKey::from(&value);
        let node = self.node_mut(id)?;
        let label = node.label().clone();
        let previous = node.set_property(key, value);
        self.reindex(id, &label, key, previous.as_ref().map(ValueKey::from), Some(new_key));
        Ok(previous)
    }

    pub(crate) fn remove_node_property(&mut self, id: NodeId, key: &str) -> GraphResult<Option<PropertyValue>> {
        let node = self.node_mut(id)?;
        let label = node.label().clone();
        let previous = node.remove_property(key);
        self.reindex(id, &label, key, previous.as_ref().map(ValueKey::from), None);
        Ok(previous)
    }

    /// Move `node` from its old value to its new one in every unique index
    /// covering (label, key)
    fn reindex(&mut self, node: NodeId, label: &Label, key: &str, old: Option<ValueKey>, new: Option<ValueKey>) {
        let covering = self
            .constraints
            .iter_mut()
            .filter(|(c, _)| &c.label == label && c.property_key == key);
        for (_, index) in covering {
            if let Some(old) = &old {
                if let Some(holders) = index.get_mut(old) {
                    holders.remove(&node);
                    if holders.is_empty() {
                        index.remove(old);
                    }
                }
            }
            if let Some(new) = &new {
                index.entry(new.clone()).or_default().insert(node);
            }
        }
    }

    /// Set an edge property, returning the value it replaced
    pub fn set_edge_property(
        &mut self,
        id: EdgeId,
        key: &str,
        value: PropertyValue,
    ) -> GraphResult<Option<PropertyValue>> {
        Ok(self.edge_mut(id)?.set_property(key, value))
    }

    pub(crate) fn remove_edge_property(&mut self, id: EdgeId, key: &str) -> GraphResult<Option<PropertyValue>> {
        Ok(self.edge_mut(id)?.remove_property(key))
    }

    /// Relationships of one type touching `node` in one direction, in
    /// insertion order
    pub fn relationships(
        &self,
        node: NodeId,
        edge_type: EdgeType,
        direction: Direction,
    ) -> GraphResult<impl Iterator<Item = &Edge> + '_> {
        if !self.has_node(node) {
            return Err(GraphError::NodeNotFound(node));
        }
        let adjacency = match direction {
            Direction::Outgoing => &self.outgoing[node.index()],
            Direction::Incoming => &self.incoming[node.index()],
        };
        Ok(adjacency
            .iter()
            .filter_map(move |id| self.get_edge(*id))
            .filter(move |edge| edge.edge_type == edge_type))
    }

    pub fn nodes_with_label<'a>(&'a self, label: &Label) -> impl Iterator<Item = &'a Node> + 'a {
        self.label_index
            .get(label)
            .into_iter()
            .flat_map(|ids| ids.iter())
            .filter_map(move |id| self.get_node(*id))
    }

    /// Constraints on `label`, oldest first
    pub fn constraints_for<'a>(&'a self, label: &'a Label) -> impl Iterator<Item = &'a ConstraintDefinition> + 'a {
        self.constraints.keys().filter(move |c| &c.label == label)
    }

    /// Register a constraint after checking existing data satisfies it
    pub fn add_constraint(&mut self, constraint: ConstraintDefinition) -> GraphResult<()> {
        if self.constraints.contains_key(&constraint) {
            return Err(GraphError::ConstraintAlreadyExists(constraint));
        }

        let mut index = UniqueIndex::new();
        for node in self.nodes_with_label(&constraint.label) {
            let Some(value) = node.get_property(&constraint.property_key) else {
                continue;
            };
            let holders = index.entry(ValueKey::from(value)).or_default();
            if let Some(existing) = holders.iter().next() {
                return Err(GraphError::ConstraintViolation {
                    label: constraint.label.clone(),
                    property: constraint.property_key.clone(),
                    value: value.clone(),
                    existing: *existing,
                });
            }
            holders.insert(node.id);
        }

        self.constraints.insert(constraint, index);
        Ok(())
    }

    pub(crate) fn remove_constraint(&mut self, constraint: &ConstraintDefinition) -> bool {
        self.constraints.shift_remove(constraint).is_some()
    }

    /// Check `node` against every constraint on its label
    pub fn check_unique(&self, node: NodeId) -> GraphResult<()> {
        let Some(current) = self.get_node(node) else {
            return Ok(());
        };

        for (constraint, index) in &self.constraints {
            if &constraint.label != current.label() {
                continue;
            }
            let Some(value) = current.get_property(&constraint.property_key) else {
                continue;
            };
            let clash = index
                .get(&ValueKey::from(value))
                .and_then(|holders| holders.iter().filter(|id| **id != node).min());
            if let Some(existing) = clash {
                return Err(GraphError::ConstraintViolation {
                    label: constraint.label.clone(),
                    property: constraint.property_key.clone(),
                    value: value.clone(),
                    existing: *existing,
                });
            }
        }
        Ok(())
    }

    pub fn statistics(&self) -> GraphStatistics {
        GraphStatistics {
            node_count: self.node_count,
            edge_count: self.edge_count,
            label_count: self.labels.len(),
            edge_type_count: self.edge_types.len(),
            constraint_count: self.constraints.len(),
            committed_version: self.current_version,
        }
    }
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}
