use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use codepad::app::Workbench;
use codepad::kernel::services::adapters::SettingsStore;
use codepad::kernel::{Action, AppState, WorkspacePhase};

mod logging;

const OPEN_TIMEOUT: Duration = Duration::from_secs(10);

struct Args {
    dir: Option<PathBuf>,
    verbose: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        dir: None,
        verbose: false,
    };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-v" | "--verbose" => args.verbose = true,
            "-h" | "--help" => return Err(usage()),
            _ if arg.starts_with('-') => return Err(format!("unknown option: {arg}\n{}", usage())),
            _ if args.dir.is_none() => args.dir = Some(PathBuf::from(arg)),
            _ => return Err(usage()),
        }
    }
    Ok(args)
}

fn usage() -> String {
    "usage: codepad [--verbose] [DIR]\n\nOpens DIR (or the last workspace) and prints its tree.".to_string()
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let filter = if args.verbose {
        "codepad=debug"
    } else {
        "codepad=info"
    };
    let logging = logging::init(filter);
    if args.verbose {
        if let Some(guard) = logging.as_ref() {
            eprintln!("logging to {}", guard.log_dir().display());
        }
    }

    let settings = match SettingsStore::open_default() {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!(error = %e, "settings disabled");
            None
        }
    };

    let mut workbench = match Workbench::start(settings) {
        Ok(wb) => wb,
        Err(e) => {
            eprintln!("failed to start: {e}");
            return ExitCode::FAILURE;
        }
    };

    let target = args
        .dir
        .or_else(|| workbench.state().settings.workspace.current_path.clone());
    let Some(target) = target else {
        print_recent(workbench.state());
        return ExitCode::SUCCESS;
    };
    let target = std::fs::canonicalize(&target).unwrap_or(target);

    workbench.dispatch(Action::OpenWorkspace { path: target });
    let settled = workbench.run_until(OPEN_TIMEOUT, |wb| {
        !matches!(wb.state().phase, WorkspacePhase::Loading { .. })
    });
    if !settled {
        eprintln!("timed out opening workspace");
        return ExitCode::FAILURE;
    }
    if !workbench.state().is_folder_open() {
        eprintln!(
            "{}",
            workbench
                .state()
                .last_error
                .as_deref()
                .unwrap_or("failed to open workspace")
        );
        return ExitCode::FAILURE;
    }

    // git status and the settings write trail the root listing
    workbench.settle(Duration::from_millis(300), Duration::from_secs(3));
    print_workspace(workbench.state());
    ExitCode::SUCCESS
}

fn print_workspace(state: &AppState) {
    let Some(tree) = state.tree.as_ref() else {
        return;
    };
    match state.git.branch.as_deref() {
        Some(branch) => println!("{} ({branch})", state.root_directory_name()),
        None => println!("{}", state.root_directory_name()),
    }
    for row in tree.flatten_for_view() {
        let marker = tree
            .node(row.id)
            .and_then(|node| state.git.status_of(&node.path))
            .and_then(|status| status.primary_kind())
            .map_or(' ', |kind| kind.marker());
        let suffix = if row.is_dir { "/" } else { "" };
        println!(
            "{marker} {}{}{suffix}",
            "  ".repeat(usize::from(row.depth)),
            row.title
        );
    }
}

fn print_recent(state: &AppState) {
    let recent = state.settings.recent_workspaces();
    if recent.is_empty() {
        println!("{}", usage());
        return;
    }
    println!("recent workspaces:");
    for path in recent {
        println!("  {}", path.display());
    }
}
