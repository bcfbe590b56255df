//! Transactional engine over [`GraphStore`]
//!
//! Isolation is lock-based: a native [`Transaction`] owns the store mutex
//! from `begin_tx` until it closes, so transactions run one at a time.
//! The lock is not reentrant; a thread that already holds it gets
//! [`GraphError::TransactionAlreadyOpen`] instead of blocking on itself.
//! A transaction persists its mutations only when it was marked with
//! [`Transaction::success`] before [`Transaction::close`]; anything else
//! undoes them.

use super::constraint::ConstraintDefinition;
use super::edge::Edge;
use super::journal::{Journal, UndoEntry};
use super::node::Node;
use super::property::PropertyValue;
use super::store::{GraphStatistics, GraphStore};
use super::types::{Direction, EdgeId, EdgeType, Label, NodeId};
use crate::config::EngineConfig;
use crate::error::{GraphError, GraphResult};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};
use tracing::{debug, info};

/// Lifecycle of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatus {
    Open,
    Committed,
    RolledBack,
    /// Commit was attempted and could not be applied; mutations were undone
    Failed,
}

impl TxStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TxStatus::Open)
    }
}

/// The backing graph engine
#[derive(Debug)]
pub struct GraphDatabase {
    name: String,
    store: Mutex<GraphStore>,
    /// Thread of the open transaction, if any
    holder: Mutex<Option<ThreadId>>,
    shutdown: AtomicBool,
    next_tx_id: AtomicU64,
}

impl GraphDatabase {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        info!("Opening graph engine '{}'", config.name);
        GraphDatabase {
            store: Mutex::new(GraphStore::with_quotas(config.quotas, config.initial_capacity)),
            name: config.name,
            holder: Mutex::new(None),
            shutdown: AtomicBool::new(false),
            next_tx_id: AtomicU64::new(1),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start a native transaction, blocking while another one is open
    pub fn begin_tx(&self) -> GraphResult<Transaction<'_>> {
        if self.is_shutdown() {
            return Err(GraphError::DatabaseShutdown);
        }
        let store = self.lock()?;
        // Shutdown may have happened while waiting for the lock.
        if self.is_shutdown() {
            return Err(GraphError::DatabaseShutdown);
        }
        *self.holder() = Some(thread::current().id());
        let id = self.next_tx_id.fetch_add(1, Ordering::Relaxed);
        debug!(tx = id, "begin transaction");
        Ok(Transaction {
            id,
            db: self,
            store: Some(store),
            journal: Journal::default(),
            success: false,
            status: TxStatus::Open,
        })
    }

    /// Refuse new transactions. Waits for an open one to finish first.
    pub fn shutdown(&self) -> GraphResult<()> {
        let _store = self.lock()?;
        if !self.shutdown.swap(true, Ordering::SeqCst) {
            info!("Shut down graph engine '{}'", self.name);
        }
        Ok(())
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Committed sizes; blocks while a transaction is open
    pub fn statistics(&self) -> GraphResult<GraphStatistics> {
        Ok(self.lock()?.statistics())
    }

    fn lock(&self) -> GraphResult<MutexGuard<'_, GraphStore>> {
        if *self.holder() == Some(thread::current().id()) {
            return Err(GraphError::TransactionAlreadyOpen);
        }
        // A panicking transaction closes while unwinding, so the store
        // behind a poisoned lock is still consistent.
        Ok(self.store.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn holder(&self) -> MutexGuard<'_, Option<ThreadId>> {
        self.holder.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for GraphDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// A native engine transaction
///
/// Holds the store lock until it reaches a terminal state. Dropping an open
/// transaction terminates it.
#[derive(Debug)]
pub struct Transaction<'db> {
    id: u64,
    db: &'db GraphDatabase,
    store: Option<MutexGuard<'db, GraphStore>>,
    journal: Journal,
    success: bool,
    status: TxStatus,
}

impl<'db> Transaction<'db> {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn status(&self) -> TxStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == TxStatus::Open
    }

    fn store(&self) -> GraphResult<&GraphStore> {
        self.store.as_deref().ok_or(GraphError::TransactionClosed)
    }

    fn store_mut(&mut self) -> GraphResult<&mut GraphStore> {
        self.store.as_deref_mut().ok_or(GraphError::TransactionClosed)
    }

    pub fn label(&mut self, name: &str) -> GraphResult<Label> {
        Ok(self.store_mut()?.resolve_label(name))
    }

    pub fn relationship_type(&mut self, name: &str) -> GraphResult<EdgeType> {
        Ok(self.store_mut()?.resolve_edge_type(name))
    }

    pub fn create_node(&mut self, label: Label) -> GraphResult<NodeId> {
        let id = self.store_mut()?.create_node(label)?;
        self.journal.record(UndoEntry::NodeCreated(id));
        Ok(id)
    }

    pub fn create_relationship(&mut self, from: NodeId, to: NodeId, edge_type: EdgeType) -> GraphResult<EdgeId> {
        let id = self.store_mut()?.create_edge(from, to, edge_type)?;
        self.journal.record(UndoEntry::EdgeCreated(id));
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> GraphResult<&Node> {
        self.store()?.get_node(id).ok_or(GraphError::NodeNotFound(id))
    }

    pub fn relationship(&self, id: EdgeId) -> GraphResult<&Edge> {
        self.store()?.get_edge(id).ok_or(GraphError::EdgeNotFound(id))
    }

    pub fn set_node_property(&mut self, id: NodeId, key: &str, value: PropertyValue) -> GraphResult<()> {
        let previous = self.store_mut()?.set_node_property(id, key, value)?;
        self.journal.record(UndoEntry::NodePropertySet {
            id,
            key: key.to_string(),
            previous,
        });
        Ok(())
    }

    pub fn set_relationship_property(&mut self, id: EdgeId, key: &str, value: PropertyValue) -> GraphResult<()> {
        let previous = self.store_mut()?.set_edge_property(id, key, value)?;
        self.journal.record(UndoEntry::EdgePropertySet {
            id,
            key: key.to_string(),
            previous,
        });
        Ok(())
    }

    /// Relationships of `edge_type` on `node` in `direction`
    pub fn relationships(
        &self,
        node: NodeId,
        edge_type: EdgeType,
        direction: Direction,
    ) -> GraphResult<impl Iterator<Item = &Edge> + '_> {
        self.store()?.relationships(node, edge_type, direction)
    }

    /// Existing constraints on `label`, oldest first
    pub fn constraints_for(&self, label: &Label) -> GraphResult<Vec<ConstraintDefinition>> {
        Ok(self.store()?.constraints_for(label).cloned().collect())
    }

    /// Fails with [`GraphError::ConstraintAlreadyExists`] if it is already there
    pub fn create_unique_constraint(&mut self, label: Label, property_key: &str) -> GraphResult<ConstraintDefinition> {
        let constraint = ConstraintDefinition::unique(label, property_key);
        self.store_mut()?.add_constraint(constraint.clone())?;
        self.journal.record(UndoEntry::ConstraintCreated(constraint.clone()));
        debug!(tx = self.id, "created constraint {}", constraint);
        Ok(constraint)
    }

    /// Mark the transaction to be persisted when it closes
    pub fn success(&mut self) {
        self.success = true;
    }

    /// Finish the transaction: persist if marked, otherwise undo
    pub fn close(&mut self) -> GraphResult<TxStatus> {
        if self.status.is_terminal() {
            return Err(GraphError::TransactionClosed);
        }
        if !self.success {
            self.undo_and_release(TxStatus::RolledBack);
            return Ok(self.status);
        }

        let validation = {
            let store = self.store()?;
            self.journal
                .touched_nodes()
                .into_iter()
                .try_for_each(|node| store.check_unique(node))
        };
        if let Err(e) = validation {
            self.undo_and_release(TxStatus::Failed);
            return Err(GraphError::CommitFailed(Box::new(e)));
        }

        let changes = self.journal.len();
        let store = self.store_mut()?;
        store.current_version += 1;
        let version = store.current_version;
        self.journal.clear();
        self.status = TxStatus::Committed;
        self.release();
        debug!(tx = self.id, changes, version, "committed");
        Ok(self.status)
    }

    /// Undo immediately, ignoring any `success` mark
    pub fn terminate(&mut self) -> GraphResult<()> {
        if self.status.is_terminal() {
            return Err(GraphError::TransactionClosed);
        }
        self.undo_and_release(TxStatus::RolledBack);
        Ok(())
    }

    fn undo_and_release(&mut self, status: TxStatus) {
        if let Some(store) = self.store.as_deref_mut() {
            self.journal.undo(store);
        }
        self.release();
        self.status = status;
        debug!(tx = self.id, ?status, "closed without persisting");
    }

    /// Give the store lock back; the holder is cleared while still locked
    fn release(&mut self) {
        if self.store.is_some() {
            *self.db.holder() = None;
        }
        self.store = None;
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if self.is_open() {
            self.undo_and_release(TxStatus::RolledBack);
        }
    }
}
