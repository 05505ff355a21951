//! Shared application state.
//!
//! One `AppState` is created at startup and shared (via `Arc`) between the
//! interactive shell and the scheduler thread. It owns everything the two
//! sides mutate: the target folder path and the undo log. The category
//! table and exclude rules are fixed after construction.
//!
//! The run lock serializes organizing runs, so a scheduler-fired run and a
//! user-initiated one never interleave their moves or log writes.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use crate::category::CategoryTable;
use crate::config::CompiledExcludes;
use crate::undo::{UndoLog, UndoRecord, UndoReport, undo_all};

pub struct AppState {
    table: CategoryTable,
    excludes: CompiledExcludes,
    folder: Mutex<Option<PathBuf>>,
    undo: Mutex<UndoLog>,
    run_lock: Mutex<()>,
}

impl AppState {
    pub fn new(table: CategoryTable, excludes: CompiledExcludes) -> Self {
        Self {
            table,
            excludes,
            folder: Mutex::new(None),
            undo: Mutex::new(UndoLog::new()),
            run_lock: Mutex::new(()),
        }
    }

    /// State with the built-in category table and default excludes.
    pub fn with_defaults() -> Self {
        Self::new(CategoryTable::default(), CompiledExcludes::default())
    }

    /// Sets the folder the organizer and scheduler operate on.
    pub fn set_folder(&self, path: PathBuf) {
        *self.folder.lock().expect("state mutex poisoned") = Some(path);
    }

    /// The currently configured folder, read at call time.
    ///
    /// The scheduler calls this when a job fires, so changing the folder
    /// between scheduling and firing affects the next run (late binding).
    pub fn folder(&self) -> Option<PathBuf> {
        self.folder.lock().expect("state mutex poisoned").clone()
    }

    pub fn category_table(&self) -> &CategoryTable {
        &self.table
    }

    pub fn excludes(&self) -> &CompiledExcludes {
        &self.excludes
    }

    /// Undoes the most recent run. See [`undo_all`].
    pub fn undo_last(&self) -> UndoReport {
        let mut log = self.undo.lock().expect("state mutex poisoned");
        undo_all(&mut log)
    }

    /// Number of currently undoable moves.
    pub fn undoable_moves(&self) -> usize {
        self.undo.lock().expect("state mutex poisoned").len()
    }

    /// Serializes organizing runs. Held by the organizer for the duration
    /// of a run.
    pub(crate) fn run_guard(&self) -> MutexGuard<'_, ()> {
        self.run_lock.lock().expect("state mutex poisoned")
    }

    /// Drops the previous run's undo records.
    pub(crate) fn clear_undo(&self) {
        self.undo.lock().expect("state mutex poisoned").clear();
    }

    /// Installs the finished run's undo records.
    pub(crate) fn store_undo(&self, records: Vec<UndoRecord>) {
        self.undo
            .lock()
            .expect("state mutex poisoned")
            .replace(records);
    }
}
