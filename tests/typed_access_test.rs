//! Integration tests for typed element access and traversal

mod common;

use common::*;
use typed_graph::{Direction, GraphError, PropertyValue, Timestamp, Tx, UntypedGraph};

#[test]
fn test_person_knows_scenario() {
    let db = database();
    let mut tx = Tx::begin(&db).unwrap();
    let mut graph = tx.graph();

    let v1 = graph.add_vertex(&PERSON).unwrap();
    let v2 = graph.add_vertex(&PERSON).unwrap();
    graph.add_edge(v1, &KNOWS, v2).unwrap();

    assert_eq!(graph.out_one_v(v1, &KNOWS).unwrap(), Some(v2));
    assert_eq!(graph.in_one_v(v2, &KNOWS).unwrap(), Some(v1));
    assert_eq!(graph.out_one_e(v2, &KNOWS).unwrap(), None);
    assert_eq!(graph.in_one_e(v1, &KNOWS).unwrap(), None);
}

#[test]
fn test_vertex_property_round_trip() {
    let db = database();
    let mut tx = Tx::begin(&db).unwrap();
    let mut graph = tx.graph();

    let v = graph.add_vertex(&PERSON).unwrap();
    assert_eq!(graph.get_vertex(v, &NAME).unwrap(), None);

    let returned = graph.set_vertex(v, &NAME, "Alice".to_string()).unwrap();
    assert_eq!(returned, v);
    graph.set_vertex(v, &AGE, 30).unwrap();

    assert_eq!(graph.get_vertex(v, &NAME).unwrap(), Some("Alice".to_string()));
    assert_eq!(graph.get_vertex(v, &AGE).unwrap(), Some(30));

    // Overwrite keeps the latest value
    graph.set_vertex(v, &AGE, 31).unwrap();
    assert_eq!(graph.get_vertex(v, &AGE).unwrap(), Some(31));
}

#[test]
fn test_edge_property_round_trip() {
    let db = database();
    let mut tx = Tx::begin(&db).unwrap();
    let mut graph = tx.graph();

    let person = graph.add_vertex(&PERSON).unwrap();
    let company = graph.add_vertex(&COMPANY).unwrap();
    let job = graph.add_edge(person, &WORKS_AT, company).unwrap();

    let returned = graph.set_edge(job, &ROLE, "engineer".to_string()).unwrap();
    assert_eq!(returned, job);
    assert_eq!(graph.get_edge(job, &ROLE).unwrap(), Some("engineer".to_string()));
    assert_eq!(graph.get_edge(job, &SINCE).unwrap(), None);
}

#[test]
fn test_values_survive_commit() {
    let db = database();
    let v = {
        let mut tx = Tx::begin(&db).unwrap();
        let mut graph = tx.graph();
        let v = graph.add_vertex(&PERSON).unwrap();
        graph.set_vertex(v, &NAME, "Grace".to_string()).unwrap();
        tx.success();
        tx.commit().unwrap();
        v
    };

    let mut tx = Tx::begin(&db).unwrap();
    let graph = tx.graph();
    assert_eq!(graph.get_vertex(v, &NAME).unwrap(), Some("Grace".to_string()));
}

#[test]
fn test_timestamp_property_round_trip() {
    let db = database();
    let born = Timestamp::from_millis(-86_400_000);
    let v = {
        let mut tx = Tx::begin(&db).unwrap();
        let mut graph = tx.graph();
        let v = graph.add_vertex(&PERSON).unwrap();
        graph.set_vertex(v, &BORN, born).unwrap();
        assert_eq!(graph.vertex_property(v, &BORN).unwrap(), Some(PropertyValue::DateTime(-86_400_000)));
        tx.success();
        tx.commit().unwrap();
        v
    };

    let mut tx = Tx::begin(&db).unwrap();
    let mut graph = tx.graph();
    assert_eq!(graph.get_vertex(v, &BORN).unwrap(), Some(born));

    // A plain integer under the same key is not a timestamp.
    graph.set_vertex_property(v, &BORN, PropertyValue::Integer(0)).unwrap();
    assert!(matches!(
        graph.get_vertex(v, &BORN),
        Err(GraphError::DecodeMismatch { ref key, .. }) if key == "born"
    ));
}

#[test]
fn test_decode_mismatch_is_reported() {
    let db = database();
    let mut tx = Tx::begin(&db).unwrap();
    let mut graph = tx.graph();

    let v = graph.add_vertex(&PERSON).unwrap();
    // Store a string under a key declared as an integer.
    graph.set_vertex_property(v, &AGE, PropertyValue::from("thirty")).unwrap();

    let err = graph.get_vertex(v, &AGE).unwrap_err();
    match err {
        GraphError::DecodeMismatch { key, source } => {
            assert_eq!(key, "age");
            assert_eq!(source.expected, "Integer");
            assert_eq!(source.found, "String");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_edge_endpoint_integrity() {
    let db = database();
    let mut tx = Tx::begin(&db).unwrap();
    let mut graph = tx.graph();

    let a = graph.add_vertex(&PERSON).unwrap();
    let b = graph.add_vertex(&PERSON).unwrap();
    let e = graph.add_edge(a, &KNOWS, b).unwrap();

    assert_eq!(graph.source(e), a);
    assert_eq!(graph.target(e), b);

    let looped = graph.add_edge(a, &KNOWS, a).unwrap();
    assert_eq!(graph.source(looped), graph.target(looped));
}

#[test]
fn test_direction_consistency() {
    let db = database();
    let mut tx = Tx::begin(&db).unwrap();
    let mut graph = tx.graph();

    let hub = graph.add_vertex(&PERSON).unwrap();
    let friends: Vec<_> = (0..3).map(|_| graph.add_vertex(&PERSON).unwrap()).collect();
    for friend in &friends {
        graph.add_edge(hub, &KNOWS, *friend).unwrap();
    }
    let company = graph.add_vertex(&COMPANY).unwrap();
    graph.add_edge(hub, &WORKS_AT, company).unwrap();

    let out: Vec<_> = graph.out_v(hub, &KNOWS).unwrap().collect();
    assert_eq!(out, friends);

    for edge in graph.out_e(hub, &KNOWS).unwrap() {
        assert_eq!(graph.source(edge), hub);
        let incoming: Vec<_> = graph.in_e(graph.target(edge), &KNOWS).unwrap().collect();
        assert!(incoming.contains(&edge));
    }

    // Edge kinds are kept apart
    assert_eq!(graph.out_one_v(hub, &WORKS_AT).unwrap(), Some(company));
    assert_eq!(graph.in_v(company, &KNOWS).unwrap().count(), 0);
}

#[test]
fn test_exactly_one_rejects_many() {
    let db = database();
    let mut tx = Tx::begin(&db).unwrap();
    let mut graph = tx.graph();

    let a = graph.add_vertex(&PERSON).unwrap();
    let b = graph.add_vertex(&PERSON).unwrap();
    let c = graph.add_vertex(&PERSON).unwrap();
    graph.add_edge(a, &KNOWS, b).unwrap();
    graph.add_edge(a, &KNOWS, c).unwrap();

    let err = graph.out_one_v(a, &KNOWS).unwrap_err();
    assert_eq!(
        err,
        GraphError::CardinalityViolation {
            vertex: format!("{:?}", a),
            edge_type: "knows".to_string(),
            direction: Direction::Outgoing,
            count: 2,
        }
    );
    assert!(graph.out_at_most_one_e(a, &KNOWS).is_err());
    assert_eq!(graph.in_at_most_one_v(b, &KNOWS).unwrap(), Some(a));
    assert_eq!(graph.in_at_most_one_v(a, &KNOWS).unwrap(), None);
}
