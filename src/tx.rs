//! Scoped transaction wrapper
//!
//! A [`Tx`] is open from [`Tx::begin`] until it is consumed by
//! [`commit`](Tx::commit) or [`rollback`](Tx::rollback), or dropped.
//! Dropping an open `Tx` commits it, so mutations are kept only when
//! [`success`](Tx::success) was called first.
//!
//! ```
//! use typed_graph::{GraphDatabase, Tx, UntypedGraph};
//! use typed_graph::schema::VertexDef;
//!
//! const PERSON: VertexDef = VertexDef::new("Person");
//!
//! let db = GraphDatabase::new();
//! {
//!     let mut tx = Tx::begin(&db).unwrap();
//!     tx.graph().add_vertex(&PERSON).unwrap();
//!     tx.success();
//! }
//! assert_eq!(db.statistics().unwrap().node_count, 1);
//! ```

use crate::adapter::EngineGraph;
use crate::error::GraphResult;
use crate::graph::{GraphDatabase, Transaction, TxStatus};
use crate::untyped::UntypedTransaction;
use tracing::warn;

pub struct Tx<'db> {
    native: Transaction<'db>,
}

impl<'db> Tx<'db> {
    /// Open a transaction; blocks while another transaction holds the engine
    pub fn begin(db: &'db GraphDatabase) -> GraphResult<Self> {
        Ok(Tx { native: db.begin_tx()? })
    }

    pub fn id(&self) -> u64 {
        self.native.id()
    }

    pub fn status(&self) -> TxStatus {
        self.native.status()
    }

    /// Adapter bound to this transaction
    pub fn graph(&mut self) -> EngineGraph<'_, 'db> {
        EngineGraph::new(&mut self.native)
    }

    /// Mark the transaction to be persisted; it stays open
    pub fn success(&mut self) {
        self.native.success();
    }

    /// End the transaction, persisting only if [`success`](Tx::success) was called
    ///
    /// Returns [`TxStatus::Committed`] or, for an unmarked transaction,
    /// [`TxStatus::RolledBack`]. A commit whose uniqueness validation fails
    /// undoes every mutation and returns
    /// [`GraphError::CommitFailed`](crate::GraphError::CommitFailed).
    pub fn commit(mut self) -> GraphResult<TxStatus> {
        self.native.close()
    }

    /// Discard every mutation, ignoring any `success` mark
    pub fn rollback(mut self) -> GraphResult<()> {
        self.native.terminate()
    }
}

impl Drop for Tx<'_> {
    fn drop(&mut self) {
        if !self.native.is_open() {
            return;
        }
        if let Err(e) = self.native.close() {
            warn!(tx = self.native.id(), error = %e, "commit on drop failed");
        }
    }
}

impl<'db> UntypedTransaction for Tx<'db> {
    type Graph<'a> = EngineGraph<'a, 'db> where Self: 'a;

    fn graph(&mut self) -> Self::Graph<'_> {
        Tx::graph(self)
    }

    fn commit(self) -> GraphResult<TxStatus> {
        Tx::commit(self)
    }

    fn rollback(self) -> GraphResult<()> {
        Tx::rollback(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;
    use crate::schema::{Property, VertexDef};
    use crate::untyped::UntypedGraph;

    const PERSON: VertexDef = VertexDef::new("Person");
    const EMAIL: Property<String> = Property::of_vertex(&PERSON, "email");

    #[test]
    fn test_status_follows_lifecycle() {
        let db = GraphDatabase::new();
        let mut tx = Tx::begin(&db).unwrap();
        assert_eq!(tx.status(), TxStatus::Open);
        tx.success();
        assert_eq!(tx.status(), TxStatus::Open);
        assert_eq!(tx.commit().unwrap(), TxStatus::Committed);

        let tx = Tx::begin(&db).unwrap();
        tx.rollback().unwrap();
        assert!(!db.is_shutdown());
    }

    #[test]
    fn test_unmarked_commit_discards() {
        let db = GraphDatabase::new();
        let mut tx = Tx::begin(&db).unwrap();
        tx.graph().add_vertex(&PERSON).unwrap();
        assert_eq!(tx.commit().unwrap(), TxStatus::RolledBack);
        assert_eq!(db.statistics().unwrap().node_count, 0);
    }

    #[test]
    fn test_rollback_ignores_success_mark() {
        let db = GraphDatabase::new();
        let mut tx = Tx::begin(&db).unwrap();
        tx.graph().add_vertex(&PERSON).unwrap();
        tx.success();
        tx.rollback().unwrap();
        assert_eq!(db.statistics().unwrap().node_count, 0);
    }

    #[test]
    fn test_drop_commits_marked_tx() {
        let db = GraphDatabase::new();
        {
            let mut tx = Tx::begin(&db).unwrap();
            tx.graph().add_vertex(&PERSON).unwrap();
            tx.success();
        }
        {
            let mut tx = Tx::begin(&db).unwrap();
            tx.graph().add_vertex(&PERSON).unwrap();
        }
        assert_eq!(db.statistics().unwrap().node_count, 1);
    }

    #[test]
    fn test_failed_commit_reports_cause() {
        let db = GraphDatabase::new();
        let mut tx = Tx::begin(&db).unwrap();
        let mut graph = tx.graph();
        graph.create_or_get_unique_constraint_for(&EMAIL).unwrap();
        let a = graph.add_vertex(&PERSON).unwrap();
        let b = graph.add_vertex(&PERSON).unwrap();
        graph.set_vertex(a, &EMAIL, "a@example.com".to_string()).unwrap();
        graph.set_vertex(b, &EMAIL, "a@example.com".to_string()).unwrap();
        tx.success();

        let err = tx.commit().unwrap_err();
        assert!(matches!(err, GraphError::CommitFailed(cause) if matches!(*cause, GraphError::ConstraintViolation { .. })));
        let stats = db.statistics().unwrap();
        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.constraint_count, 0);
    }

    #[test]
    fn test_through_capability_trait() {
        fn populate<T: UntypedTransaction>(mut tx: T) -> GraphResult<TxStatus> {
            tx.graph().add_vertex(&PERSON)?;
            tx.commit()
        }

        let db = GraphDatabase::new();
        let mut tx = Tx::begin(&db).unwrap();
        tx.success();
        assert_eq!(populate(tx).unwrap(), TxStatus::Committed);
        assert_eq!(db.statistics().unwrap().node_count, 1);
    }
}
