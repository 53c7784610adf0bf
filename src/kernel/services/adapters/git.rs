//! Git CLI adapter: branch and porcelain status for the workspace.
//!
//! Every failure (git missing, not a repository, non-zero exit) degrades to
//! "no VCS info" rather than an error.

use crate::kernel::git::{GitFileStatus, GitFileStatusKind};
use std::path::{Path, PathBuf};
use tokio::process::Command;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GitSnapshot {
    pub root: PathBuf,
    pub branch: Option<String>,
    pub branches: Vec<String>,
    pub statuses: Vec<(PathBuf, GitFileStatus)>,
}

pub async fn snapshot(workspace: &Path) -> GitSnapshot {
    let mut snap = GitSnapshot {
        root: workspace.to_path_buf(),
        ..Default::default()
    };

    let Some(top) = run_git(workspace, &["rev-parse", "--show-toplevel"]).await else {
        return snap;
    };
    let top = String::from_utf8_lossy(&top).trim().to_string();
    if !top.is_empty() {
        snap.root = PathBuf::from(top);
    }

    snap.branch = run_git(&snap.root, &["rev-parse", "--abbrev-ref", "HEAD"])
        .await
        .map(|out| String::from_utf8_lossy(&out).trim().to_string())
        .filter(|b| !b.is_empty());

    if let Some(out) = run_git(&snap.root, &["branch", "--format=%(refname:short)"]).await {
        snap.branches = parse_branch_list(&String::from_utf8_lossy(&out));
    }

    if let Some(out) = run_git(&snap.root, &["status", "--porcelain", "-z"]).await {
        snap.statuses = parse_status_porcelain_z(&out, &snap.root);
    }

    snap
}

async fn run_git(cwd: &Path, args: &[&str]) -> Option<Vec<u8>> {
    let output = match Command::new("git")
        .args(args)
        .current_dir(cwd)
        .kill_on_drop(true)
        .output()
        .await
    {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!(error = %e, "git not runnable");
            return None;
        }
    };
    if !output.status.success() {
        tracing::debug!(?args, status = ?output.status.code(), "git exited with failure");
        return None;
    }
    Some(output.stdout)
}

pub fn parse_branch_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

/// Parses `git status --porcelain -z`. Paths come back absolute under
/// `repo_root`; for renames and copies the new path is kept.
pub fn parse_status_porcelain_z(data: &[u8], repo_root: &Path) -> Vec<(PathBuf, GitFileStatus)> {
    let mut out = Vec::new();
    let mut tokens = data.split(|b| *b == 0).filter(|t| !t.is_empty());
    while let Some(token) = tokens.next() {
        if token.len() < 4 || token[2] != b' ' {
            continue;
        }

        let x = token[0] as char;
        let y = token[1] as char;
        if (x == '!' && y == '!') || (x == ' ' && y == ' ') {
            continue;
        }

        let path = PathBuf::from(String::from_utf8_lossy(&token[3..]).to_string());
        if x == 'R' || x == 'C' {
            // source path of the rename
            let _ = tokens.next();
        }

        out.push((repo_root.join(path), status_from_xy(x, y)));
    }
    out
}

fn status_from_xy(x: char, y: char) -> GitFileStatus {
    if x == 'U' || y == 'U' || (x == 'A' && y == 'A') || (x == 'D' && y == 'D') {
        return GitFileStatus {
            index: Some(GitFileStatusKind::Conflict),
            worktree: Some(GitFileStatusKind::Conflict),
        };
    }

    if x == '?' && y == '?' {
        return GitFileStatus {
            index: Some(GitFileStatusKind::Untracked),
            worktree: Some(GitFileStatusKind::Untracked),
        };
    }

    GitFileStatus {
        index: kind_from_status_char(x),
        worktree: kind_from_status_char(y),
    }
}

fn kind_from_status_char(ch: char) -> Option<GitFileStatusKind> {
    match ch {
        ' ' => None,
        '?' => Some(GitFileStatusKind::Untracked),
        'A' => Some(GitFileStatusKind::Added),
        'D' => Some(GitFileStatusKind::Deleted),
        'U' => Some(GitFileStatusKind::Conflict),
        _ => Some(GitFileStatusKind::Modified),
    }
}
