use chrono::Utc;
use log::debug;

use crate::io::storage::{Storage, StorageError};
use crate::model::task::{Task, TaskId};

/// Error type for store mutations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("task title must not be empty")]
    EmptyTitle,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What a change event reports happened to a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Add,
    Update,
    Remove,
}

/// Emitted after each single-task mutation, once the collection already
/// reflects it.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub task: Task,
}

/// Emitted whenever the dirty flag changes or is reasserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelState {
    pub modified: bool,
}

type ChangeListener = Box<dyn FnMut(&ChangeEvent)>;
type StateListener = Box<dyn FnMut(&ModelState)>;

/// Single source of truth for the task collection.
///
/// All mutation goes through the store, which applies it, notifies listeners
/// synchronously in registration order, and tracks whether unsaved changes
/// exist. Insertion order is display order; views hold read references only
/// and re-submit edited tasks through [`TaskStore::add_or_update`].
///
/// The store is built around an injected [`Storage`] backend and is meant to
/// be constructed once at startup and handed to collaborators by reference.
/// `&mut self` on every mutating operation also rules out a mutation landing
/// while a save is serializing the collection.
pub struct TaskStore {
    tasks: Vec<Task>,
    modified: bool,
    storage: Box<dyn Storage>,
    change_listeners: Vec<ChangeListener>,
    state_listeners: Vec<StateListener>,
}

impl TaskStore {
    pub fn new(storage: Box<dyn Storage>) -> TaskStore {
        TaskStore {
            tasks: Vec::new(),
            modified: false,
            storage,
            change_listeners: Vec::new(),
            state_listeners: Vec::new(),
        }
    }

    /// Subscribe to per-task change events.
    pub fn on_change(&mut self, listener: impl FnMut(&ChangeEvent) + 'static) {
        self.change_listeners.push(Box::new(listener));
    }

    /// Subscribe to dirty-flag events.
    pub fn on_model_state(&mut self, listener: impl FnMut(&ModelState) + 'static) {
        self.state_listeners.push(Box::new(listener));
    }

    /// All tasks in display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// True iff a mutation has occurred since the last load or save.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Commit a task: insert it if its id is new, otherwise replace the
    /// existing entry in place, keeping its position. Emits one Add or Update
    /// event plus a `{modified: true}` state event.
    ///
    /// A task with an empty (or whitespace-only) title is rejected and never
    /// enters the store; no events fire. `create_date` is stamped here.
    pub fn add_or_update(&mut self, mut task: Task) -> Result<(), StoreError> {
        if task.title.trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        task.create_date = Utc::now();
        self.commit(task);
        self.set_modified(true);
        Ok(())
    }

    /// Remove the task with the given id. An unknown id is a soft no-op: no
    /// event, no dirty-flag change.
    pub fn remove(&mut self, id: TaskId) {
        if let Some(idx) = self.tasks.iter().position(|t| t.id == id) {
            let task = self.tasks.remove(idx);
            self.emit_change(ChangeKind::Remove, task);
            self.set_modified(true);
        }
    }

    /// Remove every task satisfying `predicate`. Bulk path: no per-task
    /// Remove events, only a single `{modified: true}` state event when
    /// anything was removed.
    pub fn remove_where<P>(&mut self, predicate: P)
    where
        P: Fn(&Task) -> bool,
    {
        let before = self.tasks.len();
        self.tasks.retain(|t| !predicate(t));
        if self.tasks.len() != before {
            self.set_modified(true);
        }
    }

    /// Pull the full task set from storage. Each loaded task goes through the
    /// same insert path as [`TaskStore::add_or_update`], so listeners see one
    /// Add event apiece; afterwards the model counts as unmodified. Persisted
    /// `create_date` values are kept as-is.
    pub fn load(&mut self) -> Result<(), StoreError> {
        let tasks = self.storage.load_all()?;
        debug!("loaded {} tasks", tasks.len());
        for task in tasks {
            self.commit(task);
        }
        self.set_modified(false);
        Ok(())
    }

    /// Hand the current collection to storage. The dirty flag clears only
    /// after the backend reports success; on failure it stays set so the
    /// caller can warn or retry before unsaved state is lost.
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.storage.save_all(&self.tasks)?;
        debug!("saved {} tasks", self.tasks.len());
        self.set_modified(false);
        Ok(())
    }

    fn commit(&mut self, task: Task) {
        let kind = match self.tasks.iter().position(|t| t.id == task.id) {
            Some(idx) => {
                self.tasks[idx] = task.clone();
                ChangeKind::Update
            }
            None => {
                self.tasks.push(task.clone());
                ChangeKind::Add
            }
        };
        self.emit_change(kind, task);
    }

    fn emit_change(&mut self, kind: ChangeKind, task: Task) {
        let event = ChangeEvent { kind, task };
        for listener in &mut self.change_listeners {
            listener(&event);
        }
    }

    fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
        let state = ModelState { modified };
        for listener in &mut self.state_listeners {
            listener(&state);
        }
    }
}
