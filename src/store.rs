//! The one mutable place in the crate: holds the current snapshot, applies
//! pure ops to it, persists the result and tells observers.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::io::snapshot_io::SnapshotError;
use crate::model::forest::Forest;
use crate::ops::group_ops;
use crate::ops::tree_ops::Parent;
use crate::util::dates::{Clock, LocalClock};
use crate::util::ids::{IdSource, UuidIds};

/// Durable storage for whole snapshots.
pub trait Persist {
    /// Store the complete forest, replacing whatever was stored before.
    fn persist(&mut self, forest: &Forest) -> Result<(), SnapshotError>;
}

/// Error type for store commands
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The mutation is applied in memory but was not saved
    #[error("snapshot not saved: {0}")]
    Persist(#[from] SnapshotError),
}

/// Handle returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(usize);

type Observer = Box<dyn FnMut(&Arc<Forest>)>;

pub struct TreeStore {
    snapshot: Arc<Forest>,
    persist: Box<dyn Persist>,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdSource>,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: usize,
}

impl TreeStore {
    /// Adopt `initial` (or an empty forest) with the wall clock and UUID ids.
    pub fn new(initial: Option<Forest>, persist: impl Persist + 'static) -> Self {
        TreeStore {
            snapshot: Arc::new(initial.unwrap_or_default()),
            persist: Box::new(persist),
            clock: Box::new(LocalClock),
            ids: Box::new(UuidIds),
            observers: Vec::new(),
            next_observer: 0,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_ids(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// The current snapshot. Later commands never modify it.
    pub fn snapshot(&self) -> Arc<Forest> {
        Arc::clone(&self.snapshot)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// The current snapshot with hidden tasks filtered out.
    pub fn visible(&self) -> Forest {
        group_ops::visible_forest(&self.snapshot, self.clock.today())
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    /// Call `observer` with every new snapshot.
    pub fn subscribe(&mut self, observer: impl FnMut(&Arc<Forest>) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    // -----------------------------------------------------------------------
    // Group commands
    // -----------------------------------------------------------------------

    /// Returns the new group's id, or `None` for a blank name.
    pub fn add_group(&mut self, name: &str) -> Result<Option<String>, StoreError> {
        let id = self.ids.generate_id();
        let next = group_ops::add_group(&self.snapshot, name, id.clone());
        let created = next.group(&id).is_some();
        self.commit("add_group", &id, next)?;
        Ok(created.then_some(id))
    }

    pub fn rename_group(&mut self, group_id: &str, name: &str) -> Result<(), StoreError> {
        let next = group_ops::rename_group(&self.snapshot, group_id, name);
        self.commit("rename_group", group_id, next)
    }

    pub fn delete_group(&mut self, group_id: &str) -> Result<(), StoreError> {
        let next = group_ops::delete_group(&self.snapshot, group_id);
        self.commit("delete_group", group_id, next)
    }

    pub fn reorder_groups(&mut self, active_id: &str, over_id: &str) -> Result<(), StoreError> {
        let next = group_ops::reorder_groups(&self.snapshot, active_id, over_id);
        self.commit("reorder_groups", active_id, next)
    }

    // -----------------------------------------------------------------------
    // Task commands
    // -----------------------------------------------------------------------

    /// Returns the new task's id, or `None` when nothing was inserted (blank
    /// name, unknown group or parent).
    pub fn add_task(
        &mut self,
        group_id: &str,
        parent: Parent<'_>,
        name: &str,
    ) -> Result<Option<String>, StoreError> {
        let id = self.ids.generate_id();
        let next = group_ops::add_task(&self.snapshot, group_id, parent, name, id.clone());
        let created = next.find_task(&id).is_some();
        self.commit("add_task", &id, next)?;
        Ok(created.then_some(id))
    }

    pub fn delete_task(&mut self, task_id: &str) -> Result<(), StoreError> {
        let next = group_ops::delete_task(&self.snapshot, task_id);
        self.commit("delete_task", task_id, next)
    }

    pub fn reorder_tasks(
        &mut self,
        group_id: &str,
        parent: Parent<'_>,
        active_id: &str,
        over_id: &str,
    ) -> Result<(), StoreError> {
        let next = group_ops::reorder_tasks(&self.snapshot, group_id, parent, active_id, over_id);
        self.commit("reorder_tasks", active_id, next)
    }

    pub fn toggle_completion(&mut self, task_id: &str) -> Result<(), StoreError> {
        let today = self.clock.today();
        let next = group_ops::toggle_completion(&self.snapshot, task_id, today);
        self.commit("toggle_completion", task_id, next)
    }

    /// Done for today: hidden until tomorrow.
    pub fn hide_task(&mut self, task_id: &str) -> Result<(), StoreError> {
        let tomorrow = self.clock.tomorrow();
        let next = group_ops::set_hidden(&self.snapshot, task_id, tomorrow);
        self.commit("hide_task", task_id, next)
    }

    /// Expand or collapse a group or task.
    pub fn set_open(&mut self, id: &str, is_open: bool) -> Result<(), StoreError> {
        let next = group_ops::set_open(&self.snapshot, id, is_open);
        self.commit("set_open", id, next)
    }

    pub fn rename_task(&mut self, task_id: &str, name: &str) -> Result<(), StoreError> {
        let next = group_ops::rename_task(&self.snapshot, task_id, name);
        self.commit("rename_task", task_id, next)
    }

    /// Retry saving the current snapshot, e.g. after a failed command.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.persist.persist(&self.snapshot)?;
        Ok(())
    }

    /// Adopt `next`, save it, then notify. Observers run even if saving
    /// failed, since the in-memory state did change.
    fn commit(&mut self, command: &str, target: &str, next: Forest) -> Result<(), StoreError> {
        let changed = *self.snapshot != next;
        debug!(command, target, changed, "store command");
        self.snapshot = Arc::new(next);

        let persisted = self.persist.persist(&self.snapshot);
        if let Err(e) = &persisted {
            warn!(command, error = %e, "persist failed; keeping in-memory snapshot");
        }

        for (_, observer) in &mut self.observers {
            observer(&self.snapshot);
        }
        persisted.map_err(StoreError::from)
    }
}

/// In-memory persistence port. Clones share the same saved list, so a test
/// can keep one handle and give the other to the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersist {
    saved: Rc<RefCell<Vec<Forest>>>,
    failing: Rc<RefCell<bool>>,
}

impl MemoryPersist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        *self.failing.borrow_mut() = failing;
    }

    /// Every snapshot saved so far, oldest first.
    pub fn saved(&self) -> Vec<Forest> {
        self.saved.borrow().clone()
    }

    pub fn last(&self) -> Option<Forest> {
        self.saved.borrow().last().cloned()
    }
}

impl Persist for MemoryPersist {
    fn persist(&mut self, forest: &Forest) -> Result<(), SnapshotError> {
        if *self.failing.borrow() {
            return Err(SnapshotError::Unavailable("memory store set to fail".into()));
        }
        self.saved.borrow_mut().push(forest.clone());
        Ok(())
    }
}

/// Discards every snapshot; for read-only views over a loaded forest.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPersist;

impl Persist for NullPersist {
    fn persist(&mut self, _forest: &Forest) -> Result<(), SnapshotError> {
        Ok(())
    }
}
