//! Shared fixtures: a small social schema and logging setup

#![allow(dead_code)]

use typed_graph::schema::{EdgeDef, Property, Schema, VertexDef};
use typed_graph::{GraphDatabase, Timestamp};

pub const PERSON: VertexDef = VertexDef::new("Person");
pub const COMPANY: VertexDef = VertexDef::new("Company");
pub const KNOWS: EdgeDef = EdgeDef::new("knows");
pub const WORKS_AT: EdgeDef = EdgeDef::new("worksAt");

pub const NAME: Property<String> = Property::of_vertex(&PERSON, "name");
pub const AGE: Property<i64> = Property::of_vertex(&PERSON, "age");
pub const EMAIL: Property<String> = Property::of_vertex(&PERSON, "email").unique();
pub const BORN: Property<Timestamp> = Property::of_vertex(&PERSON, "born");
pub const SINCE: Property<i64> = Property::of_edge(&KNOWS, "since");
pub const ROLE: Property<String> = Property::of_edge(&WORKS_AT, "role");

pub fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn social_schema() -> Schema {
    let mut schema = Schema::new();
    schema.register_vertex(&PERSON).unwrap();
    schema.register_vertex(&COMPANY).unwrap();
    schema.register_edge(&KNOWS).unwrap();
    schema.register_edge(&WORKS_AT).unwrap();
    schema.register_property(&NAME).unwrap();
    schema.register_property(&AGE).unwrap();
    schema.register_property(&EMAIL).unwrap();
    schema.register_property(&BORN).unwrap();
    schema.register_property(&SINCE).unwrap();
    schema.register_property(&ROLE).unwrap();
    schema
}

pub fn database() -> GraphDatabase {
    init_logging();
    GraphDatabase::new()
}
