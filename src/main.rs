use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use sortbot::config::OrganizerConfig;
use sortbot::organizer;
use sortbot::output::OutputFormatter;
use sortbot::scheduler::Scheduler;
use sortbot::shell;
use sortbot::state::AppState;

/// Organize a folder's files into category subfolders, with undo and
/// scheduled auto-runs.
#[derive(Parser)]
#[command(name = "sortbot", version, about)]
struct Args {
    /// Folder to organize
    folder: Option<PathBuf>,

    /// Organize once and exit instead of starting the interactive shell
    #[arg(long)]
    once: bool,

    /// Schedule an automatic run every N minutes at startup
    #[arg(long, value_name = "MINUTES")]
    every: Option<u64>,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let config = match OrganizerConfig::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            process::exit(1);
        }
    };
    let excludes = match config.compile_excludes() {
        Ok(excludes) => excludes,
        Err(e) => {
            OutputFormatter::error(&e.to_string());
            process::exit(1);
        }
    };

    let state = Arc::new(AppState::new(config.category_table(), excludes));
    if let Some(folder) = args.folder {
        state.set_folder(folder);
    }

    if args.once {
        match organizer::organize(&state) {
            Ok(report) => {
                OutputFormatter::plain(&report.summary());
                if let Some(e) = &report.log_error {
                    OutputFormatter::warning(&format!("Could not write the run log: {}", e));
                }
            }
            Err(e) => {
                OutputFormatter::error(&e.to_string());
                process::exit(1);
            }
        }
        return;
    }

    let scheduler = Scheduler::new(Arc::clone(&state));
    if let Some(minutes) = args.every
        && let Err(e) = scheduler.set_schedule(minutes)
    {
        OutputFormatter::error(&e.to_string());
        process::exit(1);
    }

    if let Err(e) = shell::run_shell(state, scheduler) {
        OutputFormatter::error(&format!("Shell error: {}", e));
        process::exit(1);
    }
}
