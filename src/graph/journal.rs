//! Undo journal for native transactions
//!
//! Every mutation a transaction applies to the store is recorded here;
//! rolling back replays the entries newest-first.

use super::constraint::ConstraintDefinition;
use super::property::PropertyValue;
use super::store::GraphStore;
use super::types::{EdgeId, NodeId};
use std::collections::HashSet;
use tracing::warn;

#[derive(Debug, Clone)]
pub(crate) enum UndoEntry {
    NodeCreated(NodeId),
    EdgeCreated(EdgeId),
    NodePropertySet {
        id: NodeId,
        key: String,
        previous: Option<PropertyValue>,
    },
    EdgePropertySet {
        id: EdgeId,
        key: String,
        previous: Option<PropertyValue>,
    },
    ConstraintCreated(ConstraintDefinition),
}

#[derive(Debug, Default)]
pub(crate) struct Journal {
    entries: Vec<UndoEntry>,
}

impl Journal {
    pub(crate) fn record(&mut self, entry: UndoEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Nodes whose properties were written, deduplicated
    pub(crate) fn touched_nodes(&self) -> HashSet<NodeId> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                UndoEntry::NodePropertySet { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    /// Revert every recorded mutation, newest first
    pub(crate) fn undo(&mut self, store: &mut GraphStore) {
        while let Some(entry) = self.entries.pop() {
            let result = match &entry {
                UndoEntry::NodeCreated(id) => store.remove_node(*id).map(drop),
                UndoEntry::EdgeCreated(id) => store.remove_edge(*id).map(drop),
                UndoEntry::NodePropertySet { id, key, previous } => match previous {
                    Some(value) => store.set_node_property(*id, key, value.clone()).map(drop),
                    None => store.remove_node_property(*id, key).map(drop),
                },
                UndoEntry::EdgePropertySet { id, key, previous } => match previous {
                    Some(value) => store.set_edge_property(*id, key, value.clone()).map(drop),
                    None => store.remove_edge_property(*id, key).map(drop),
                },
                UndoEntry::ConstraintCreated(constraint) => {
                    store.remove_constraint(constraint);
                    Ok(())
                }
            };
            // Entries are replayed in reverse, so every target still exists.
            if let Err(e) = result {
                warn!("undo of {:?} failed: {}", entry, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use crate::graph::{ConstraintDefinition, EdgeType};

    #[test]
    fn test_undo_restores_store() {
        let mut store = GraphStore::new();
        let label = store.resolve_label("Person");
        let existing = store.create_node(label.clone()).unwrap();
        store.set_node_property(existing, "name", "Alice".into()).unwrap();

        let mut journal = Journal::default();

        let created = store.create_node(label.clone()).unwrap();
        journal.record(UndoEntry::NodeCreated(created));

        let edge = store.create_edge(existing, created, EdgeType::new("knows")).unwrap();
        journal.record(UndoEntry::EdgeCreated(edge));

        let previous = store.set_node_property(existing, "name", "Alicia".into()).unwrap();
        journal.record(UndoEntry::NodePropertySet {
            id: existing,
            key: "name".to_string(),
            previous,
        });

        let previous = store.set_node_property(existing, "age", 30i64.into()).unwrap();
        journal.record(UndoEntry::NodePropertySet {
            id: existing,
            key: "age".to_string(),
            previous,
        });

        let constraint = ConstraintDefinition::unique(label, "name");
        store.add_constraint(constraint.clone()).unwrap();
        journal.record(UndoEntry::ConstraintCreated(constraint));

        assert_eq!(journal.len(), 5);
        assert_eq!(journal.touched_nodes().len(), 1);

        journal.undo(&mut store);

        assert_eq!(journal.len(), 0);
        let stats = store.statistics();
        assert_eq!(stats.node_count, 1);
        assert_eq!(stats.edge_count, 0);
        assert_eq!(stats.constraint_count, 0);
        let node = store.get_node(existing).unwrap();
        assert_eq!(node.get_property("name").unwrap().as_string(), Some("Alice"));
        assert!(node.get_property("age").is_none());
    }

    #[test]
    fn test_undo_restores_unique_index() {
        let mut store = GraphStore::new();
        let label = store.resolve_label("Person");
        store.add_constraint(ConstraintDefinition::unique(label.clone(), "email")).unwrap();
        let a = store.create_node(label.clone()).unwrap();
        store.set_node_property(a, "email", "x".into()).unwrap();

        let mut journal = Journal::default();
        let previous = store.set_node_property(a, "email", "y".into()).unwrap();
        journal.record(UndoEntry::NodePropertySet {
            id: a,
            key: "email".to_string(),
            previous,
        });
        let b = store.create_node(label.clone()).unwrap();
        journal.record(UndoEntry::NodeCreated(b));
        let previous = store.set_node_property(b, "email", "x".into()).unwrap();
        journal.record(UndoEntry::NodePropertySet {
            id: b,
            key: "email".to_string(),
            previous,
        });

        journal.undo(&mut store);

        let c = store.create_node(label).unwrap();
        store.set_node_property(c, "email", "y".into()).unwrap();
        assert!(store.check_unique(c).is_ok());
        store.set_node_property(c, "email", "x".into()).unwrap();
        assert!(matches!(
            store.check_unique(c),
            Err(GraphError::ConstraintViolation { existing, .. }) if existing == a
        ));
    }
}
