//! sortbot - organize a folder's files into category subfolders.
//!
//! This library maps file extensions to categories, moves a folder's
//! immediate files into category subfolders while recording every move for
//! undo, appends a human-readable run log inside the folder, and can repeat
//! the whole thing on a fixed interval from a background thread.

pub mod category;
pub mod config;
pub mod organizer;
pub mod output;
pub mod scheduler;
pub mod shell;
pub mod state;
pub mod undo;

pub use category::{CategoryTable, DEFAULT_CATEGORY};
pub use config::{CompiledExcludes, ConfigError, OrganizerConfig};
pub use organizer::{FileOutcome, OrganizeError, RunReport, organize};
pub use scheduler::{ScheduleError, Scheduler};
pub use state::AppState;
pub use undo::{UndoLog, UndoRecord, UndoReport};
