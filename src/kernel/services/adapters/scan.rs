//! Workspace file scan feeding the quick-open palette.

use crate::kernel::palette::FileCandidate;
use ignore::WalkBuilder;
use std::path::Path;

pub const MAX_SCAN_FILES: usize = 10_000;

const IGNORED_NAMES: &[&str] = &[
    "node_modules",
    ".git",
    ".DS_Store",
    "dist",
    "build",
    "out",
    "coverage",
    ".vscode",
    ".idea",
    "tmp",
    "temp",
    "bin",
    "obj",
    "target",
];

pub fn is_ignored_name(name: &str) -> bool {
    IGNORED_NAMES.contains(&name)
}

/// Lists files under `root`, skipping well-known build and VCS folders and
/// anything `.gitignore` excludes. Stops after [`MAX_SCAN_FILES`].
pub fn scan_files(root: &Path) -> Vec<FileCandidate> {
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .require_git(false)
        .filter_entry(|entry| {
            entry
                .file_name()
                .to_str()
                .map_or(true, |name| !is_ignored_name(name))
        })
        .build();

    let mut out = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        out.push(FileCandidate::new(root, entry.into_path(), name));
        if out.len() >= MAX_SCAN_FILES {
            tracing::info!(root = %root.display(), "scan truncated at {MAX_SCAN_FILES} files");
            break;
        }
    }
    out.sort_by(|a, b| a.path.cmp(&b.path));
    out
}
