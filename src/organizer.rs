/// The organizing engine.
///
/// One run enumerates the immediate entries of the configured folder, moves
/// every non-excluded regular file into a subfolder named after its
/// category, records each move for undo, and appends a timestamped block to
/// the run log inside the folder. Subdirectories, the run log itself, and
/// configured excludes are left in place.
use chrono::Local;
use std::ffi::OsStr;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::state::AppState;
use crate::undo::UndoRecord;

/// Name of the append-only run log written inside the organized folder.
pub const LOG_FILE_NAME: &str = "log.txt";

/// Summary shown when a run found nothing to process.
pub const EMPTY_RUN_MESSAGE: &str = "No files to organize.";

/// Errors that abort a run before any file is touched.
#[derive(Debug)]
pub enum OrganizeError {
    /// No folder has been configured.
    NoFolder,
    /// The folder could not be enumerated.
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFolder => write!(f, "No folder selected."),
            Self::ReadDir { path, source } => {
                write!(f, "Error reading directory {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

/// Per-file result of a run. A failure never aborts the run; it is carried
/// here instead.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    Moved { name: String, category: String },
    Failed { name: String, reason: String },
}

impl FileOutcome {
    /// The log/summary line for this outcome.
    pub fn line(&self) -> String {
        match self {
            Self::Moved { name, category } => format!("Moved: {} → {}", name, category),
            Self::Failed { name, reason } => format!("Error moving {}: {}", name, reason),
        }
    }
}

/// Everything one run produced.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Per-file outcomes, in enumeration order.
    pub outcomes: Vec<FileOutcome>,
    /// Set when the moves succeeded but the run log could not be written.
    pub log_error: Option<String>,
}

impl RunReport {
    /// Newline-joined outcome lines, or the fixed empty-run message.
    pub fn summary(&self) -> String {
        if self.outcomes.is_empty() {
            return EMPTY_RUN_MESSAGE.to_string();
        }
        self.outcomes
            .iter()
            .map(FileOutcome::line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn moved(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Moved { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.moved()
    }
}

/// Runs the organizer against the folder configured in `state`.
///
/// Holds the state's run lock for the whole call, so at most one run
/// executes at a time. The undo log is cleared once enumeration has
/// succeeded and repopulated with this run's moves; on invalid input or an
/// unreadable folder no state is mutated.
///
/// Destination collisions keep `fs::rename` semantics (an existing file at
/// the destination is replaced); they are not detected or resolved here.
///
/// # Errors
///
/// [`OrganizeError::NoFolder`] when no folder is configured, and
/// [`OrganizeError::ReadDir`] when the folder cannot be enumerated.
/// Per-file move failures are not errors; they land in the report.
pub fn organize(state: &AppState) -> Result<RunReport, OrganizeError> {
    let _guard = state.run_guard();

    let folder = state.folder().ok_or(OrganizeError::NoFolder)?;
    if folder.as_os_str().is_empty() {
        return Err(OrganizeError::NoFolder);
    }

    let entries = fs::read_dir(&folder).map_err(|e| OrganizeError::ReadDir {
        path: folder.clone(),
        source: e,
    })?;

    // From here on the run counts: only the most recent run is undoable.
    state.clear_undo();

    let mut outcomes = Vec::new();
    let mut records = Vec::new();

    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() {
            continue;
        }

        // The raw name builds the destination path; the lossy form is for
        // exclusion matching and display only, so a non-UTF-8 name is
        // never rewritten on disk.
        let file_name = entry.file_name();
        let name = file_name.to_string_lossy().to_string();
        if state.excludes().is_excluded(&name) {
            continue;
        }

        let file_path = entry.path();
        let ext = file_path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        let category = state.category_table().resolve(&ext).to_string();

        match move_into_category(&folder, &file_path, &file_name, &category) {
            Ok(new_path) => {
                records.push(UndoRecord {
                    current_path: new_path,
                    original_path: file_path,
                });
                outcomes.push(FileOutcome::Moved { name, category });
            }
            Err(reason) => outcomes.push(FileOutcome::Failed { name, reason }),
        }
    }

    state.store_undo(records);

    let mut report = RunReport {
        outcomes,
        log_error: None,
    };

    // An empty run writes nothing, so a scheduled run over an already-clean
    // folder does not grow (or create) the log.
    if !report.outcomes.is_empty()
        && let Err(e) = append_run_log(&folder, &report.outcomes)
    {
        report.log_error = Some(e.to_string());
    }

    Ok(report)
}

/// Moves one file into `folder/<category>/`, creating the subfolder if
/// needed. Returns the file's new path.
fn move_into_category(
    folder: &Path,
    file_path: &Path,
    name: &OsStr,
    category: &str,
) -> Result<PathBuf, String> {
    let dest_dir = folder.join(category);
    fs::create_dir_all(&dest_dir)
        .map_err(|e| format!("could not create {}: {}", dest_dir.display(), e))?;

    let dest = dest_dir.join(name);
    fs::rename(file_path, &dest).map_err(|e| e.to_string())?;
    Ok(dest)
}

/// Appends a timestamped block to the run log: a header line followed by
/// one line per outcome.
fn append_run_log(folder: &Path, outcomes: &[FileOutcome]) -> std::io::Result<()> {
    let path = folder.join(LOG_FILE_NAME);
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    writeln!(file)?;
    writeln!(
        file,
        "--- Run at {} ---",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    for outcome in outcomes {
        writeln!(file, "{}", outcome.line())?;
    }
    Ok(())
}
