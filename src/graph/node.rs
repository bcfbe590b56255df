//! Node records held by the engine

use super::property::{PropertyMap, PropertyValue};
use super::types::{Label, NodeId};

/// A node in the property graph
///
/// The label is fixed at creation; there is no way to change it afterwards.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique identifier for this node
    pub id: NodeId,

    label: Label,

    /// Properties associated with this node
    pub properties: PropertyMap,
}

impl Node {
    pub fn new(id: NodeId, label: Label) -> Self {
        Node {
            id,
            label,
            properties: PropertyMap::new(),
        }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Set a property value, returning the previous one
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value.into())
    }

    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn remove_property(&mut self, key: &str) -> Option<PropertyValue> {
        self.properties.remove(key)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}
