//! Interactive shell.
//!
//! The thin front end: collects a folder path and an interval from the
//! user, drives the organizer, undo and scheduler, and reports results.
//! All state lives in [`AppState`]; the shell holds none of its own.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use crate::organizer;
use crate::output::OutputFormatter;
use crate::scheduler::Scheduler;
use crate::state::AppState;

/// Runs the command loop until `quit` or end of input.
pub fn run_shell(state: Arc<AppState>, scheduler: Arc<Scheduler>) -> io::Result<()> {
    OutputFormatter::info("sortbot interactive shell. Type 'help' for commands.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            break;
        };
        if !dispatch(line?.trim(), &state, &scheduler) {
            break;
        }
    }
    Ok(())
}

/// Executes one command line. Returns false when the shell should exit.
fn dispatch(line: &str, state: &Arc<AppState>, scheduler: &Arc<Scheduler>) -> bool {
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "folder" => cmd_folder(rest, state),
        "run" => cmd_run(state),
        "undo" => cmd_undo(state),
        "every" => cmd_every(rest, scheduler),
        "status" => cmd_status(state, scheduler),
        "help" => print_help(),
        "quit" | "exit" => return false,
        other => {
            OutputFormatter::warning(&format!("Unknown command '{}'. Type 'help'.", other));
        }
    }
    true
}

fn cmd_folder(rest: &str, state: &Arc<AppState>) {
    if rest.is_empty() {
        OutputFormatter::error("Usage: folder <path>");
        return;
    }
    let path = PathBuf::from(rest);
    state.set_folder(path.clone());
    OutputFormatter::success(&format!("Folder set to {}", path.display()));
}

fn cmd_run(state: &Arc<AppState>) {
    match organizer::organize(state) {
        Ok(report) => {
            OutputFormatter::plain(&report.summary());
            if let Some(e) = &report.log_error {
                OutputFormatter::warning(&format!("Could not write the run log: {}", e));
            }
        }
        Err(e) => OutputFormatter::error(&e.to_string()),
    }
}

fn cmd_undo(state: &Arc<AppState>) {
    let report = state.undo_last();
    OutputFormatter::success(&format!(
        "Undo complete: {} restored, {} skipped.",
        report.restored, report.skipped
    ));
    if !report.is_clean() {
        OutputFormatter::warning(&format!(
            "{} file(s) could not be restored; see diagnostics.",
            report.failed.len()
        ));
    }
}

fn cmd_every(rest: &str, scheduler: &Arc<Scheduler>) {
    let minutes: u64 = match rest.parse() {
        Ok(n) => n,
        Err(_) => {
            OutputFormatter::error("Please enter a valid number of minutes.");
            return;
        }
    };
    match scheduler.set_schedule(minutes) {
        Ok(()) => OutputFormatter::success(&format!(
            "Auto-organize scheduled every {} minute(s).",
            minutes
        )),
        Err(e) => OutputFormatter::error(&e.to_string()),
    }
}

fn cmd_status(state: &Arc<AppState>, scheduler: &Arc<Scheduler>) {
    match state.folder() {
        Some(folder) => OutputFormatter::plain(&format!("Folder: {}", folder.display())),
        None => OutputFormatter::plain("Folder: (none)"),
    }
    match scheduler.current_interval_minutes() {
        Some(minutes) => {
            OutputFormatter::plain(&format!("Schedule: every {} minute(s)", minutes));
        }
        None => OutputFormatter::plain("Schedule: off"),
    }
    OutputFormatter::plain(&format!("Undoable moves: {}", state.undoable_moves()));
}

fn print_help() {
    OutputFormatter::plain("Commands:");
    OutputFormatter::plain("  folder <path>   set the folder to organize");
    OutputFormatter::plain("  run             organize the folder now");
    OutputFormatter::plain("  undo            undo the last run");
    OutputFormatter::plain("  every <minutes> auto-organize on a fixed interval");
    OutputFormatter::plain("  status          show folder, schedule and undo state");
    OutputFormatter::plain("  quit            exit");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell_parts() -> (Arc<AppState>, Arc<Scheduler>) {
        let state = Arc::new(AppState::with_defaults());
        let scheduler = Scheduler::new(Arc::clone(&state));
        (state, scheduler)
    }

    #[test]
    fn test_quit_stops_the_loop() {
        let (state, scheduler) = shell_parts();
        assert!(!dispatch("quit", &state, &scheduler));
        assert!(!dispatch("exit", &state, &scheduler));
        assert!(dispatch("", &state, &scheduler));
    }

    #[test]
    fn test_folder_command_sets_state() {
        let (state, scheduler) = shell_parts();
        assert!(dispatch("folder /tmp/downloads", &state, &scheduler));
        assert_eq!(state.folder(), Some(PathBuf::from("/tmp/downloads")));
    }

    #[test]
    fn test_invalid_interval_leaves_schedule_untouched() {
        let (state, scheduler) = shell_parts();
        dispatch("every abc", &state, &scheduler);
        dispatch("every -5", &state, &scheduler);
        dispatch("every 0", &state, &scheduler);
        assert_eq!(scheduler.current_interval_minutes(), None);
    }

    #[test]
    fn test_valid_interval_arms_schedule() {
        let (state, scheduler) = shell_parts();
        dispatch("every 3", &state, &scheduler);
        assert_eq!(scheduler.current_interval_minutes(), Some(3));
    }

    #[test]
    fn test_unknown_command_keeps_shell_running() {
        let (state, scheduler) = shell_parts();
        assert!(dispatch("frobnicate", &state, &scheduler));
    }
}
