//! Schema declarations
//!
//! Domain types describe themselves through three small traits. Nothing here
//! is generic over the whole schema: a vertex kind only knows its label, and
//! a property only knows its key, its owner's label and its value type.
//!
//! ```
//! use typed_graph::schema::{EdgeDef, Property, Schema, VertexDef};
//!
//! const PERSON: VertexDef = VertexDef::new("Person");
//! const KNOWS: EdgeDef = EdgeDef::new("knows");
//! const EMAIL: Property<String> = Property::of_vertex(&PERSON, "email").unique();
//! const SINCE: Property<i64> = Property::of_edge(&KNOWS, "since");
//!
//! let mut schema = Schema::new();
//! schema.register_vertex(&PERSON).unwrap();
//! schema.register_edge(&KNOWS).unwrap();
//! schema.register_property(&EMAIL).unwrap();
//! schema.register_property(&SINCE).unwrap();
//! assert_eq!(schema.unique_properties().count(), 1);
//! ```

use crate::graph::{FromPropertyValue, PropertyValue};
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;

/// A vertex type, identified by a stable label
pub trait VertexKind {
    fn label(&self) -> &str;
}

/// An edge type, identified by a stable label
pub trait EdgeKind {
    fn label(&self) -> &str;
}

/// Whether a label names a vertex type or an edge type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Vertex,
    Edge,
}

/// Untyped view of a property: its key and the label of the element type
/// that owns it
pub trait PropertyKey {
    fn key(&self) -> &str;

    fn owner(&self) -> &str;

    fn owner_kind(&self) -> ElementKind;

    /// Whether values must be unique among vertices of the owner type
    fn is_unique(&self) -> bool {
        false
    }
}

/// A property with a known value type
pub trait PropertyKind: PropertyKey {
    type Value: FromPropertyValue + Into<PropertyValue>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexDef {
    label: &'static str,
}

impl VertexDef {
    pub const fn new(label: &'static str) -> Self {
        VertexDef { label }
    }
}

impl VertexKind for VertexDef {
    fn label(&self) -> &str {
        self.label
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeDef {
    label: &'static str,
}

impl EdgeDef {
    pub const fn new(label: &'static str) -> Self {
        EdgeDef { label }
    }
}

impl EdgeKind for EdgeDef {
    fn label(&self) -> &str {
        self.label
    }
}

/// Property declared as a constant, typed by its value
pub struct Property<T> {
    owner: &'static str,
    owner_kind: ElementKind,
    key: &'static str,
    unique: bool,
    _value: PhantomData<fn() -> T>,
}

impl<T> Property<T> {
    pub const fn of_vertex(owner: &VertexDef, key: &'static str) -> Self {
        Property {
            owner: owner.label,
            owner_kind: ElementKind::Vertex,
            key,
            unique: false,
            _value: PhantomData,
        }
    }

    pub const fn of_edge(owner: &EdgeDef, key: &'static str) -> Self {
        Property {
            owner: owner.label,
            owner_kind: ElementKind::Edge,
            key,
            unique: false,
            _value: PhantomData,
        }
    }

    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

// Manual impls: derives would require `T: Clone` etc.
impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Property<T> {}

impl<T> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("owner", &self.owner)
            .field("owner_kind", &self.owner_kind)
            .field("key", &self.key)
            .field("unique", &self.unique)
            .finish()
    }
}

impl<T> PropertyKey for Property<T> {
    fn key(&self) -> &str {
        self.key
    }

    fn owner(&self) -> &str {
        self.owner
    }

    fn owner_kind(&self) -> ElementKind {
        self.owner_kind
    }

    fn is_unique(&self) -> bool {
        self.unique
    }
}

impl<T: FromPropertyValue + Into<PropertyValue>> PropertyKind for Property<T> {
    type Value = T;
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("label '{0}' is already declared")]
    DuplicateLabel(String),

    #[error("property '{owner}.{key}' is already declared")]
    DuplicateProperty { owner: String, key: String },

    #[error("property '{owner}.{key}' belongs to an undeclared type")]
    UnknownOwner { owner: String, key: String },

    #[error("property '{owner}.{key}' is on an edge type and cannot be unique")]
    UniqueOnEdgeProperty { owner: String, key: String },
}

pub type SchemaResult<T> = Result<T, SchemaError>;

/// A property as recorded by the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    pub owner: String,
    pub key: String,
    pub owner_kind: ElementKind,
    pub unique: bool,
}

impl PropertyKey for PropertyEntry {
    fn key(&self) -> &str {
        &self.key
    }

    fn owner(&self) -> &str {
        &self.owner
    }

    fn owner_kind(&self) -> ElementKind {
        self.owner_kind
    }

    fn is_unique(&self) -> bool {
        self.unique
    }
}

/// Registry of declared types and properties, in declaration order
///
/// Labels share one namespace across vertex and edge types so a property's
/// owner is never ambiguous.
#[derive(Debug, Default)]
pub struct Schema {
    vertices: IndexSet<String>,
    edges: IndexSet<String>,
    properties: IndexMap<(String, String), PropertyEntry>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_vertex(&mut self, kind: &dyn VertexKind) -> SchemaResult<()> {
        let label = kind.label();
        self.ensure_free(label)?;
        self.vertices.insert(label.to_string());
        Ok(())
    }

    pub fn register_edge(&mut self, kind: &dyn EdgeKind) -> SchemaResult<()> {
        let label = kind.label();
        self.ensure_free(label)?;
        self.edges.insert(label.to_string());
        Ok(())
    }

    /// Register a property; its owner must already be declared
    pub fn register_property(&mut self, property: &dyn PropertyKey) -> SchemaResult<()> {
        let owner = property.owner().to_string();
        let key = property.key().to_string();

        let owner_kind = property.owner_kind();
        let declared = match owner_kind {
            ElementKind::Vertex => self.vertices.contains(&owner),
            ElementKind::Edge => self.edges.contains(&owner),
        };
        if !declared {
            return Err(SchemaError::UnknownOwner { owner, key });
        }
        if property.is_unique() && owner_kind == ElementKind::Edge {
            return Err(SchemaError::UniqueOnEdgeProperty { owner, key });
        }

        let slot = (owner.clone(), key.clone());
        if self.properties.contains_key(&slot) {
            return Err(SchemaError::DuplicateProperty { owner, key });
        }
        self.properties.insert(
            slot,
            PropertyEntry {
                owner,
                key,
                owner_kind,
                unique: property.is_unique(),
            },
        );
        Ok(())
    }

    fn ensure_free(&self, label: &str) -> SchemaResult<()> {
        if self.vertices.contains(label) || self.edges.contains(label) {
            return Err(SchemaError::DuplicateLabel(label.to_string()));
        }
        Ok(())
    }

    pub fn vertex_labels(&self) -> impl Iterator<Item = &str> {
        self.vertices.iter().map(String::as_str)
    }

    pub fn edge_labels(&self) -> impl Iterator<Item = &str> {
        self.edges.iter().map(String::as_str)
    }

    /// Vertex properties declared unique
    pub fn unique_properties(&self) -> impl Iterator<Item = &PropertyEntry> {
        self.properties.values().filter(|p| p.unique)
    }
}
