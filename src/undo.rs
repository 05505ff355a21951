/// Undo support for the most recent organizing run.
///
/// Every successful move is recorded as a (current location, original
/// location) pair. The log lives purely in memory: it covers exactly one
/// run, is cleared at the start of the next one, and does not survive a
/// process restart.
use std::fs;
use std::path::PathBuf;

/// One reversible file move.
#[derive(Debug, Clone)]
pub struct UndoRecord {
    /// Where the file ended up after the move.
    pub current_path: PathBuf,
    /// Where the file came from.
    pub original_path: PathBuf,
}

/// Ordered sequence of the last run's moves, in chronological order.
#[derive(Debug, Default)]
pub struct UndoLog {
    records: Vec<UndoRecord>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record for one completed move.
    pub fn record(&mut self, current_path: PathBuf, original_path: PathBuf) {
        self.records.push(UndoRecord {
            current_path,
            original_path,
        });
    }

    /// Drops all records.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Replaces the contents with a fresh run's records.
    pub fn replace(&mut self, records: Vec<UndoRecord>) {
        self.records = records;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Outcome of one undo sweep.
#[derive(Debug, Default)]
pub struct UndoReport {
    /// Files moved back to their original location.
    pub restored: usize,
    /// Records whose file was no longer at its post-move location.
    pub skipped: usize,
    /// Restores that failed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl UndoReport {
    /// True if every record was restored or safely skipped.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Reverses the recorded moves of the last run.
///
/// Records are processed in reverse chronological order, so later moves are
/// undone before earlier ones. A record whose file is gone from its
/// post-move location is skipped; a failed rename is reported on the
/// diagnostic channel and in the returned report, and the sweep continues.
/// The log is cleared unconditionally afterwards, so a failed restore
/// cannot be retried. Calling this with an empty log is a no-op that still
/// returns a (zero-move) report.
pub fn undo_all(log: &mut UndoLog) -> UndoReport {
    let mut report = UndoReport::default();

    for record in log.records.iter().rev() {
        if !record.current_path.exists() {
            report.skipped += 1;
            continue;
        }

        match fs::rename(&record.current_path, &record.original_path) {
            Ok(()) => report.restored += 1,
            Err(e) => {
                log::warn!(
                    "Failed to undo move for {}: {}",
                    record.current_path.display(),
                    e
                );
                report.failed.push((record.current_path.clone(), e.to_string()));
            }
        }
    }

    log.clear();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_undo_empty_log_is_noop() {
        let mut log = UndoLog::new();
        let report = undo_all(&mut log);

        assert_eq!(report.restored, 0);
        assert_eq!(report.skipped, 0);
        assert!(report.is_clean());
    }

    #[test]
    fn test_undo_restores_single_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();

        let original = base.join("photo.jpg");
        let moved = base.join("Images").join("photo.jpg");
        fs::create_dir(base.join("Images")).unwrap();
        fs::write(&moved, "pixels").unwrap();

        let mut log = UndoLog::new();
        log.record(moved.clone(), original.clone());

        let report = undo_all(&mut log);

        assert_eq!(report.restored, 1);
        assert!(original.exists());
        assert!(!moved.exists());
        assert!(log.is_empty());
    }

    #[test]
    fn test_undo_processes_in_reverse_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();
        fs::create_dir(base.join("Documents")).unwrap();

        // Two moves recorded against the same original path. Undoing in
        // reverse order means the earlier record wins the final position.
        let original = base.join("notes.txt");
        let first_moved = base.join("Documents").join("notes-a.txt");
        let second_moved = base.join("Documents").join("notes-b.txt");
        fs::write(&first_moved, "first").unwrap();
        fs::write(&second_moved, "second").unwrap();

        let mut log = UndoLog::new();
        log.record(first_moved.clone(), original.clone());
        log.record(second_moved.clone(), original.clone());

        let report = undo_all(&mut log);

        assert_eq!(report.restored, 2);
        let content = fs::read_to_string(&original).unwrap();
        assert_eq!(content, "first");
    }

    #[test]
    fn test_undo_skips_missing_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();

        let mut log = UndoLog::new();
        log.record(base.join("Images").join("gone.png"), base.join("gone.png"));

        let report = undo_all(&mut log);

        assert_eq!(report.restored, 0);
        assert_eq!(report.skipped, 1);
        assert!(report.is_clean());
    }

    #[test]
    fn test_undo_clears_log_even_after_failure() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();

        // Restoring onto a path whose parent does not exist fails the rename.
        let moved = base.join("stuck.txt");
        fs::write(&moved, "data").unwrap();

        let mut log = UndoLog::new();
        log.record(moved.clone(), base.join("no-such-dir").join("stuck.txt"));

        let report = undo_all(&mut log);

        assert_eq!(report.failed.len(), 1);
        assert!(!report.is_clean());
        assert!(log.is_empty());
    }

    #[test]
    fn test_second_undo_is_noop() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base = temp_dir.path();

        let original = base.join("song.mp3");
        let moved = base.join("Music").join("song.mp3");
        fs::create_dir(base.join("Music")).unwrap();
        fs::write(&moved, "audio").unwrap();

        let mut log = UndoLog::new();
        log.record(moved, original.clone());

        let first = undo_all(&mut log);
        assert_eq!(first.restored, 1);

        let second = undo_all(&mut log);
        assert_eq!(second.restored, 0);
        assert_eq!(second.skipped, 0);
        assert!(second.is_clean());
        assert!(original.exists());
    }
}
