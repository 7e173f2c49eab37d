//! UI-agnostic core of a desktop to-do application: the task model, the
//! store that owns the collection and notifies views of changes, the
//! filter/search layer a view renders from, and file-backed persistence.
//!
//! The embedding GUI wires buttons to [`store::TaskStore`] commands,
//! subscribes to its events, and redraws from [`ops::filter::visible`].

pub mod io;
pub mod model;
pub mod ops;
pub mod store;

pub use model::{Priority, Task, TaskId};
pub use store::{ChangeEvent, ChangeKind, ModelState, StoreError, TaskStore};
