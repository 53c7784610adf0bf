use super::*;
use crate::kernel::palette::FileCandidate;
use crate::kernel::services::ports::{DirEntryInfo, Settings};
use crate::kernel::state::WorkspacePhase;
use crate::kernel::tabs::path_key;
use crate::kernel::{FsOp, GitFileStatus, GitFileStatusKind};
use crate::models::LoadState;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

fn root() -> PathBuf {
    PathBuf::from("/ws")
}

fn generation(store: &Store) -> u64 {
    store.state.generation
}

fn open_store_with(settings: Settings, entries: Vec<DirEntryInfo>) -> Store {
    let mut store = Store::new(AppState::new(settings));
    store.dispatch(Action::OpenWorkspace { path: root() });
    let generation = generation(&store);
    store.dispatch(Action::DirLoaded {
        generation,
        path: root(),
        entries,
    });
    assert!(store.state.is_folder_open());
    store
}

fn open_store() -> Store {
    open_store_with(
        Settings::default(),
        vec![
            DirEntryInfo::dir("src"),
            DirEntryInfo::file("README.md"),
        ],
    )
}

fn open_tab(store: &mut Store, name: &str, content: &str) -> String {
    let path = root().join(name);
    let key = path_key(&path);
    store.dispatch(Action::OpenFile {
        key: key.clone(),
        title: name.to_string(),
        path: path.clone(),
    });
    let generation = generation(store);
    store.dispatch(Action::FileLoaded {
        generation,
        key: key.clone(),
        title: name.to_string(),
        path,
        content: content.to_string(),
    });
    key
}

fn writes(result: &DispatchResult) -> Vec<(String, u64)> {
    result
        .effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::WriteFile { content, revision, .. } => Some((content.clone(), *revision)),
            _ => None,
        })
        .collect()
}

#[test]
fn open_workspace_loads_root_then_opens() {
    let mut store = Store::new(AppState::default());

    let result = store.dispatch(Action::OpenWorkspace { path: root() });
    let generation = generation(&store);
    assert!(result.state_changed);
    assert_eq!(
        result.effects,
        vec![Effect::LoadDir {
            generation,
            path: root()
        }]
    );
    assert_eq!(store.state.phase, WorkspacePhase::Loading { root: root() });
    assert!(!store.state.is_folder_open());
    assert_eq!(store.state.root_directory_name(), "");

    let result = store.dispatch(Action::DirLoaded {
        generation,
        path: root(),
        entries: vec![DirEntryInfo::dir("src"), DirEntryInfo::file("a.txt")],
    });
    assert!(result.state_changed);
    assert!(store.state.is_folder_open());
    assert_eq!(store.state.root_directory_name(), "ws");
    assert_eq!(
        store.state.settings.workspace.current_path,
        Some(root())
    );
    assert!(result
        .effects
        .iter()
        .any(|e| matches!(e, Effect::PersistSettings(s) if s.workspace.current_path == Some(root()))));
    assert!(result
        .effects
        .iter()
        .any(|e| matches!(e, Effect::GitRefresh { root: r, .. } if *r == root())));

    let tree = store.state.tree.as_ref().unwrap();
    assert_eq!(tree.top_level().len(), 2);
}

#[test]
fn root_listing_failure_returns_to_no_workspace() {
    let mut store = Store::new(AppState::default());
    store.dispatch(Action::OpenWorkspace { path: root() });
    let generation = generation(&store);

    let result = store.dispatch(Action::DirLoadFailed {
        generation,
        path: root(),
        error: "permission denied".to_string(),
    });

    assert!(result.state_changed);
    assert_eq!(store.state.phase, WorkspacePhase::NoWorkspace);
    assert!(store.state.tree.is_none());
    assert!(store
        .state
        .last_error
        .as_deref()
        .unwrap()
        .contains("permission denied"));
    assert_eq!(store.state.settings.workspace.current_path, None);
}

#[test]
fn expanding_a_folder_loads_it_once() {
    let mut store = open_store();
    let src = store
        .state
        .tree
        .as_ref()
        .unwrap()
        .find_by_path(Path::new("/ws/src"))
        .unwrap();

    let result = store.dispatch(Action::ActivateNode { id: src });
    let generation = generation(&store);
    assert_eq!(
        result.effects,
        vec![Effect::LoadDir {
            generation,
            path: PathBuf::from("/ws/src")
        }]
    );
    let tree = store.state.tree.as_ref().unwrap();
    assert_eq!(tree.load_state(src), Some(LoadState::Loading));
    assert!(tree.is_expanded(src));

    store.dispatch(Action::DirLoaded {
        generation,
        path: PathBuf::from("/ws/src"),
        entries: vec![DirEntryInfo::file("main.rs")],
    });
    let tree = store.state.tree.as_ref().unwrap();
    assert_eq!(tree.load_state(src), Some(LoadState::Loaded));
    assert!(tree.find_by_path(Path::new("/ws/src/main.rs")).is_some());

    // collapse, then expand again without re-reading
    store.dispatch(Action::ActivateNode { id: src });
    assert!(!store.state.tree.as_ref().unwrap().is_expanded(src));
    let result = store.dispatch(Action::ActivateNode { id: src });
    assert!(result.effects.is_empty());
    assert!(store.state.tree.as_ref().unwrap().is_expanded(src));
}

#[test]
fn failed_folder_listing_is_marked_and_retried() {
    let mut store = open_store();
    let src = store
        .state
        .tree
        .as_ref()
        .unwrap()
        .find_by_path(Path::new("/ws/src"))
        .unwrap();
    store.dispatch(Action::ActivateNode { id: src });
    let generation = generation(&store);

    store.dispatch(Action::DirLoadFailed {
        generation,
        path: PathBuf::from("/ws/src"),
        error: "EACCES".to_string(),
    });
    let tree = store.state.tree.as_ref().unwrap();
    assert_eq!(tree.load_state(src), Some(LoadState::Failed));
    assert!(!tree.is_expanded(src));
    assert!(store.state.last_error.is_some());

    let result = store.dispatch(Action::ActivateNode { id: src });
    assert!(matches!(result.effects.as_slice(), [Effect::LoadDir { .. }]));
}

#[test]
fn replies_for_replaced_workspace_are_dropped() {
    let mut store = Store::new(AppState::default());
    store.dispatch(Action::OpenWorkspace {
        path: PathBuf::from("/a"),
    });
    let old = generation(&store);
    store.dispatch(Action::OpenWorkspace {
        path: PathBuf::from("/b"),
    });
    assert!(generation(&store) > old);

    let result = store.dispatch(Action::DirLoaded {
        generation: old,
        path: PathBuf::from("/a"),
        entries: vec![DirEntryInfo::file("stale.txt")],
    });

    assert!(!result.state_changed);
    assert!(result.effects.is_empty());
    assert_eq!(
        store.state.phase,
        WorkspacePhase::Loading {
            root: PathBuf::from("/b")
        }
    );
    assert!(store.state.tree.as_ref().unwrap().is_empty());
}

#[test]
fn file_read_finishing_after_close_is_ignored() {
    let mut store = open_store();
    let path = root().join("README.md");
    let key = path_key(&path);
    store.dispatch(Action::OpenFile {
        key: key.clone(),
        title: "README.md".to_string(),
        path: path.clone(),
    });
    let old = generation(&store);

    store.dispatch(Action::CloseWorkspace);
    let result = store.dispatch(Action::FileLoaded {
        generation: old,
        key,
        title: "README.md".to_string(),
        path,
        content: "late".to_string(),
    });

    assert!(!result.state_changed);
    assert!(store.state.tabs.is_empty());
}

#[test]
fn opening_a_file_requires_a_workspace() {
    let mut store = Store::new(AppState::default());
    let result = store.dispatch(Action::OpenFile {
        key: "k".to_string(),
        title: "a.txt".to_string(),
        path: PathBuf::from("/x/a.txt"),
    });

    assert!(result.effects.is_empty());
    assert!(store.state.tabs.is_empty());
    assert!(store.state.last_error.is_some());
    assert_eq!(store.state.notices.len(), 1);
}

#[test]
fn repeated_open_reads_file_once() {
    let mut store = open_store();
    let path = root().join("README.md");
    let key = path_key(&path);
    let open = Action::OpenFile {
        key: key.clone(),
        title: "README.md".to_string(),
        path: path.clone(),
    };

    let first = store.dispatch(open.clone());
    let second = store.dispatch(open.clone());
    assert_eq!(first.effects.len(), 1);
    assert!(second.effects.is_empty());

    let generation = generation(&store);
    store.dispatch(Action::FileLoaded {
        generation,
        key: key.clone(),
        title: "README.md".to_string(),
        path: path.clone(),
        content: "# readme".to_string(),
    });
    assert_eq!(store.state.tabs.len(), 1);
    assert_eq!(store.state.tabs.active_key(), Some(key.as_str()));
    assert!(store.state.pending_opens.is_empty());
    assert_eq!(store.state.settings.recent_files, vec![path]);

    let third = store.dispatch(open);
    assert!(third.effects.is_empty());
    assert_eq!(store.state.tabs.len(), 1);
}

#[test]
fn activating_a_file_node_opens_it() {
    let mut store = open_store();
    let readme = store
        .state
        .tree
        .as_ref()
        .unwrap()
        .find_by_path(Path::new("/ws/README.md"))
        .unwrap();

    let result = store.dispatch(Action::ActivateNode { id: readme });
    assert!(matches!(
        result.effects.as_slice(),
        [Effect::LoadFile { path, .. }] if path == Path::new("/ws/README.md")
    ));
    assert_eq!(store.state.tree.as_ref().unwrap().selected(), Some(readme));
}

#[test]
fn close_workspace_clears_tree_and_tabs() {
    let mut store = open_store();
    open_tab(&mut store, "README.md", "text");
    store.dispatch(Action::OpenFile {
        key: "pending".to_string(),
        title: "x".to_string(),
        path: root().join("x"),
    });

    let result = store.dispatch(Action::CloseWorkspace);

    assert!(result.state_changed);
    assert_eq!(store.state.phase, WorkspacePhase::NoWorkspace);
    assert!(store.state.tree.is_none());
    assert!(store.state.tabs.is_empty());
    assert_eq!(store.state.tabs.active_key(), None);
    assert!(store.state.pending_opens.is_empty());
    assert!(store.state.writes.is_empty());
    assert_eq!(store.state.settings.workspace.current_path, None);
    assert_eq!(store.state.settings.recent_workspaces(), &[root()]);
    assert!(matches!(
        result.effects.last(),
        Some(Effect::PersistSettings(s)) if s.workspace.current_path.is_none()
    ));

    assert!(!store.dispatch(Action::CloseWorkspace).state_changed);
}

#[test]
fn close_workspace_flushes_pending_autosave() {
    let mut store = open_store();
    open_tab(&mut store, "README.md", "");
    store.dispatch(Action::EditActive {
        content: "unsaved".to_string(),
        now: Instant::now(),
    });

    let result = store.dispatch(Action::CloseWorkspace);
    assert_eq!(writes(&result), vec![("unsaved".to_string(), 1)]);
}

#[test]
fn edit_autosaves_after_quiet_period() {
    let mut store = open_store();
    open_tab(&mut store, "README.md", "");
    let t0 = Instant::now();

    store.dispatch(Action::EditActive {
        content: "a".to_string(),
        now: t0,
    });
    store.dispatch(Action::EditActive {
        content: "ab".to_string(),
        now: t0 + Duration::from_millis(500),
    });
    let tab = store.state.tabs.active_tab().unwrap();
    assert!(tab.dirty);
    assert_eq!(tab.revision, 2);

    let early = store.dispatch(Action::Tick {
        now: t0 + Duration::from_millis(1200),
    });
    assert!(early.effects.is_empty());

    let due = store.dispatch(Action::Tick {
        now: t0 + Duration::from_millis(1500),
    });
    assert_eq!(writes(&due), vec![("ab".to_string(), 2)]);

    let generation = generation(&store);
    let key = store.state.tabs.active_key().unwrap().to_string();
    let saved = store.dispatch(Action::FileSaved {
        generation,
        key,
        path: root().join("README.md"),
        revision: 2,
    });
    assert!(saved.state_changed);
    assert!(!store.state.tabs.active_tab().unwrap().dirty);
    assert!(store.state.writes.is_empty());
}

#[test]
fn edit_during_write_stays_dirty_and_reruns() {
    let mut store = open_store();
    let key = open_tab(&mut store, "README.md", "");
    let path = root().join("README.md");
    let t0 = Instant::now();

    store.dispatch(Action::EditActive {
        content: "one".to_string(),
        now: t0,
    });
    let first = store.dispatch(Action::SaveActive);
    assert_eq!(writes(&first), vec![("one".to_string(), 1)]);

    store.dispatch(Action::EditActive {
        content: "two".to_string(),
        now: t0,
    });
    let queued = store.dispatch(Action::SaveActive);
    assert!(queued.effects.is_empty());

    let generation = generation(&store);
    let result = store.dispatch(Action::FileSaved {
        generation,
        key: key.clone(),
        path: path.clone(),
        revision: 1,
    });
    assert!(store.state.tabs.active_tab().unwrap().dirty);
    assert_eq!(writes(&result), vec![("two".to_string(), 2)]);

    store.dispatch(Action::FileSaved {
        generation,
        key,
        path,
        revision: 2,
    });
    assert!(!store.state.tabs.active_tab().unwrap().dirty);
}

#[test]
fn explicit_save_cancels_pending_autosave() {
    let mut store = open_store();
    open_tab(&mut store, "README.md", "");
    let t0 = Instant::now();
    store.dispatch(Action::EditActive {
        content: "x".to_string(),
        now: t0,
    });

    let save = store.dispatch(Action::SaveActive);
    assert_eq!(writes(&save).len(), 1);

    let later = store.dispatch(Action::Tick {
        now: t0 + Duration::from_secs(5),
    });
    assert!(later.effects.is_empty());
}

#[test]
fn zero_delay_disables_autosave() {
    let mut settings = Settings::default();
    settings.editor.autosave_delay_ms = 0;
    let mut store = open_store_with(settings, vec![DirEntryInfo::file("a.txt")]);
    open_tab(&mut store, "a.txt", "");
    let t0 = Instant::now();

    store.dispatch(Action::EditActive {
        content: "x".to_string(),
        now: t0,
    });
    let tick = store.dispatch(Action::Tick {
        now: t0 + Duration::from_secs(60),
    });
    assert!(tick.effects.is_empty());
    assert!(store.state.tabs.active_tab().unwrap().dirty);
}

#[test]
fn save_failure_keeps_tab_dirty() {
    let mut store = open_store();
    let key = open_tab(&mut store, "README.md", "");
    store.dispatch(Action::EditActive {
        content: "x".to_string(),
        now: Instant::now(),
    });
    store.dispatch(Action::SaveActive);

    let generation = generation(&store);
    let result = store.dispatch(Action::FileSaveFailed {
        generation,
        key,
        path: root().join("README.md"),
        error: "disk full".to_string(),
    });
    assert!(result.effects.is_empty());
    assert!(store.state.tabs.active_tab().unwrap().dirty);
    assert!(store.state.last_error.as_deref().unwrap().contains("disk full"));
    assert!(!store.state.writes.is_in_flight(&root().join("README.md")));
}

#[test]
fn closing_a_tab_flushes_pending_write() {
    let mut store = open_store();
    let key = open_tab(&mut store, "README.md", "");
    store.dispatch(Action::EditActive {
        content: "bye".to_string(),
        now: Instant::now(),
    });

    let result = store.dispatch(Action::CloseTab { key });
    assert_eq!(writes(&result), vec![("bye".to_string(), 1)]);
    assert!(store.state.tabs.is_empty());
}

#[test]
fn closing_tabs_moves_focus_to_neighbour() {
    let mut store = open_store_with(
        Settings::default(),
        vec![
            DirEntryInfo::file("a"),
            DirEntryInfo::file("b"),
            DirEntryInfo::file("c"),
        ],
    );
    let a = open_tab(&mut store, "a", "");
    let b = open_tab(&mut store, "b", "");
    let c = open_tab(&mut store, "c", "");

    store.dispatch(Action::ActivateTab { key: b.clone() });
    store.dispatch(Action::CloseTab { key: b });
    assert_eq!(store.state.tabs.active_key(), Some(a.as_str()));

    store.dispatch(Action::CloseTab { key: a });
    assert_eq!(store.state.tabs.active_key(), Some(c.as_str()));

    store.dispatch(Action::CloseTab { key: c });
    assert_eq!(store.state.tabs.active_key(), None);
}

#[test]
fn create_file_validates_and_refreshes_parent() {
    let mut store = open_store();

    let bad = store.dispatch(Action::CreateFile {
        parent: root(),
        name: "../evil".to_string(),
    });
    assert!(bad.effects.is_empty());
    assert!(store.state.last_error.is_some());

    let ok = store.dispatch(Action::CreateFile {
        parent: root(),
        name: "new.rs".to_string(),
    });
    let generation = generation(&store);
    assert_eq!(
        ok.effects,
        vec![Effect::CreateFile {
            generation,
            path: root().join("new.rs")
        }]
    );

    let done = store.dispatch(Action::FsOpSucceeded {
        generation,
        op: FsOp::CreateFile,
        path: root().join("new.rs"),
        to: None,
    });
    assert!(done.effects.contains(&Effect::LoadDir {
        generation,
        path: root()
    }));
}

#[test]
fn rename_retargets_open_tab() {
    let mut store = open_store();
    open_tab(&mut store, "README.md", "hi");
    let generation = generation(&store);

    store.dispatch(Action::RenamePath {
        from: root().join("README.md"),
        to: root().join("NOTES.md"),
    });
    let result = store.dispatch(Action::FsOpSucceeded {
        generation,
        op: FsOp::Rename,
        path: root().join("README.md"),
        to: Some(root().join("NOTES.md")),
    });

    assert!(result.state_changed);
    let tab = store.state.tabs.active_tab().unwrap();
    assert_eq!(tab.path, root().join("NOTES.md"));
    assert_eq!(tab.title, "NOTES.md");
    assert_eq!(tab.key, path_key(&root().join("NOTES.md")));
    assert_eq!(
        result.effects,
        vec![Effect::LoadDir {
            generation,
            path: root()
        }]
    );
}

#[test]
fn deleting_the_workspace_root_is_refused() {
    let mut store = open_store();
    let result = store.dispatch(Action::DeletePath {
        path: root(),
        is_dir: true,
    });
    assert!(result.effects.is_empty());
    assert!(store.state.last_error.is_some());

    let ok = store.dispatch(Action::DeletePath {
        path: root().join("src"),
        is_dir: true,
    });
    assert!(matches!(
        ok.effects.as_slice(),
        [Effect::DeletePath { is_dir: true, .. }]
    ));
}

#[test]
fn failed_fs_op_reports_error() {
    let mut store = open_store();
    let generation = generation(&store);
    store.dispatch(Action::FsOpFailed {
        generation,
        op: FsOp::CreateDir,
        path: root().join("x"),
        error: "exists".to_string(),
    });
    assert_eq!(
        store.state.last_error.as_deref(),
        Some("Failed to create folder: exists")
    );

    assert!(store.dispatch(Action::DismissNotice).state_changed);
    assert!(store.state.last_error.is_none());
}

#[test]
fn git_update_sets_and_clears_status() {
    let mut store = open_store();
    let generation = generation(&store);
    let status = GitFileStatus {
        index: None,
        worktree: Some(GitFileStatusKind::Modified),
    };

    let result = store.dispatch(Action::GitUpdated {
        generation,
        root: root(),
        branch: Some("main".to_string()),
        branches: vec!["main".to_string(), "dev".to_string()],
        statuses: vec![(root().join("README.md"), status)],
    });
    assert!(result.state_changed);
    assert_eq!(store.state.git.branch.as_deref(), Some("main"));
    assert_eq!(
        store.state.git.status_of(&root().join("README.md")),
        Some(status)
    );

    let same = store.dispatch(Action::GitUpdated {
        generation,
        root: root(),
        branch: Some("main".to_string()),
        branches: vec!["main".to_string(), "dev".to_string()],
        statuses: vec![(root().join("README.md"), status)],
    });
    assert!(!same.state_changed);

    store.dispatch(Action::GitUpdated {
        generation,
        root: root(),
        branch: None,
        branches: Vec::new(),
        statuses: Vec::new(),
    });
    assert!(!store.state.git.is_repo());
}

#[test]
fn search_palette_opens_scanned_file() {
    let mut store = open_store();
    let result = store.dispatch(Action::SearchOpen);
    let generation = generation(&store);
    assert_eq!(
        result.effects,
        vec![Effect::ScanFiles {
            generation,
            root: root()
        }]
    );

    let files = vec![
        FileCandidate::new(&root(), root().join("src/main.rs"), "main.rs".to_string()),
        FileCandidate::new(&root(), root().join("README.md"), "README.md".to_string()),
    ];
    store.dispatch(Action::FilesScanned { generation, files });
    store.dispatch(Action::SearchSetQuery {
        query: "read".to_string(),
    });
    assert_eq!(store.state.search.match_count(), 1);

    let confirm = store.dispatch(Action::SearchConfirm);
    assert!(!store.state.search.visible);
    assert!(matches!(
        confirm.effects.as_slice(),
        [Effect::LoadFile { title, .. }] if title == "README.md"
    ));
}

#[test]
fn search_needs_workspace() {
    let mut store = Store::new(AppState::default());
    let result = store.dispatch(Action::SearchOpen);
    assert!(result.effects.is_empty());
    assert!(!store.state.search.visible);
}

#[test]
fn terminal_lifecycle() {
    let mut store = open_store();

    let spawned = store.dispatch(Action::TerminalNew);
    let id = store.state.terminal.active.unwrap();
    assert!(store.state.terminal.panel_visible);
    assert!(matches!(
        spawned.effects.as_slice(),
        [Effect::TerminalSpawn { cwd, .. }] if *cwd == root()
    ));

    let input = store.dispatch(Action::TerminalInput {
        id,
        bytes: b"ls\r".to_vec(),
    });
    assert_eq!(
        input.effects,
        vec![Effect::TerminalWrite {
            id,
            bytes: b"ls\r".to_vec()
        }]
    );

    store.dispatch(Action::TerminalOutput {
        id,
        bytes: b"README.md\r\n".to_vec(),
    });
    assert!(store
        .state
        .terminal
        .session(id)
        .unwrap()
        .scrollback
        .contains("README.md"));

    store.dispatch(Action::TerminalExited { id, code: Some(0) });
    let after_exit = store.dispatch(Action::TerminalInput {
        id,
        bytes: b"x".to_vec(),
    });
    assert!(after_exit.effects.is_empty());

    let closed = store.dispatch(Action::TerminalClose { id });
    assert!(closed.effects.is_empty());
    assert!(store.state.terminal.sessions.is_empty());
    assert!(!store.state.terminal.panel_visible);
}

#[test]
fn terminal_spawn_failure_is_shown_inline() {
    let mut store = Store::new(AppState::default());
    store.dispatch(Action::TerminalTogglePanel);
    let id = store.state.terminal.active.unwrap();

    store.dispatch(Action::TerminalSpawnFailed {
        id,
        error: "no shell".to_string(),
    });

    let session = store.state.terminal.session(id).unwrap();
    assert!(session.exited);
    assert!(session.scrollback.contains("[SPAWN FAILED] no shell"));

    let kill = store.dispatch(Action::TerminalClose { id });
    assert!(kill.effects.is_empty());
}

#[test]
fn removing_recent_workspace_persists() {
    let mut store = open_store();
    store.dispatch(Action::CloseWorkspace);

    let result = store.dispatch(Action::RemoveRecentWorkspace { path: root() });
    assert!(store.state.settings.recent_workspaces().is_empty());
    assert!(matches!(
        result.effects.as_slice(),
        [Effect::PersistSettings(_)]
    ));

    let again = store.dispatch(Action::RemoveRecentWorkspace { path: root() });
    assert!(again.effects.is_empty());
}

fn write_paths(result: &DispatchResult) -> Vec<PathBuf> {
    result
        .effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::WriteFile { path, .. } => Some(path.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn closing_tab_during_write_keeps_latest_edit() {
    let mut store = open_store();
    let key = open_tab(&mut store, "README.md", "");
    let path = root().join("README.md");
    let t0 = Instant::now();

    store.dispatch(Action::EditActive {
        content: "v1".to_string(),
        now: t0,
    });
    let first = store.dispatch(Action::SaveActive);
    assert_eq!(writes(&first), vec![("v1".to_string(), 1)]);

    store.dispatch(Action::EditActive {
        content: "v2".to_string(),
        now: t0,
    });
    let close = store.dispatch(Action::CloseTab { key: key.clone() });
    assert!(writes(&close).is_empty());
    assert!(store.state.tabs.is_empty());

    let generation = generation(&store);
    let done = store.dispatch(Action::FileSaved {
        generation,
        key,
        path: path.clone(),
        revision: 1,
    });
    assert_eq!(writes(&done), vec![("v2".to_string(), 0)]);
    assert_eq!(write_paths(&done), vec![path.clone()]);

    store.dispatch(Action::FileSaved {
        generation,
        key: path_key(&path),
        path,
        revision: 0,
    });
    assert!(store.state.writes.is_empty());
}

#[test]
fn closing_workspace_during_write_keeps_latest_edit() {
    let mut store = open_store();
    let key = open_tab(&mut store, "README.md", "");
    let path = root().join("README.md");
    let t0 = Instant::now();

    store.dispatch(Action::EditActive {
        content: "v1".to_string(),
        now: t0,
    });
    store.dispatch(Action::SaveActive);
    let old = generation(&store);
    store.dispatch(Action::EditActive {
        content: "v2".to_string(),
        now: t0,
    });

    let close = store.dispatch(Action::CloseWorkspace);
    assert!(writes(&close).is_empty());
    assert!(store.state.tabs.is_empty());

    let done = store.dispatch(Action::FileSaved {
        generation: old,
        key,
        path: path.clone(),
        revision: 1,
    });
    assert!(!done.state_changed);
    assert_eq!(writes(&done), vec![("v2".to_string(), 0)]);
    assert!(matches!(
        done.effects.as_slice(),
        [Effect::WriteFile { generation, .. }] if *generation == store.state.generation
    ));
}

#[test]
fn rename_carries_pending_autosave() {
    let mut store = open_store();
    open_tab(&mut store, "README.md", "");
    let t0 = Instant::now();
    store.dispatch(Action::EditActive {
        content: "draft".to_string(),
        now: t0,
    });

    let generation = generation(&store);
    store.dispatch(Action::FsOpSucceeded {
        generation,
        op: FsOp::Rename,
        path: root().join("README.md"),
        to: Some(root().join("NOTES.md")),
    });

    let tick = store.dispatch(Action::Tick {
        now: t0 + Duration::from_secs(60),
    });
    assert_eq!(write_paths(&tick), vec![root().join("NOTES.md")]);
    assert_eq!(writes(&tick), vec![("draft".to_string(), 1)]);

    store.dispatch(Action::FileSaved {
        generation,
        key: path_key(&root().join("NOTES.md")),
        path: root().join("NOTES.md"),
        revision: 1,
    });
    assert!(!store.state.tabs.active_tab().unwrap().dirty);
}

#[test]
fn renaming_folder_moves_child_autosave() {
    let mut store = open_store();
    open_tab(&mut store, "src/lib.rs", "");
    let t0 = Instant::now();
    store.dispatch(Action::EditActive {
        content: "pub fn f() {}".to_string(),
        now: t0,
    });

    let generation = generation(&store);
    store.dispatch(Action::FsOpSucceeded {
        generation,
        op: FsOp::Rename,
        path: root().join("src"),
        to: Some(root().join("core")),
    });

    let tick = store.dispatch(Action::Tick {
        now: t0 + Duration::from_secs(60),
    });
    assert_eq!(write_paths(&tick), vec![root().join("core/lib.rs")]);
}

#[test]
fn rename_during_write_reissues_under_new_path() {
    let mut store = open_store();
    let key = open_tab(&mut store, "README.md", "");
    let t0 = Instant::now();

    store.dispatch(Action::EditActive {
        content: "v1".to_string(),
        now: t0,
    });
    store.dispatch(Action::SaveActive);
    store.dispatch(Action::EditActive {
        content: "v2".to_string(),
        now: t0,
    });
    assert!(store.dispatch(Action::SaveActive).effects.is_empty());

    let generation = generation(&store);
    let renamed = store.dispatch(Action::FsOpSucceeded {
        generation,
        op: FsOp::Rename,
        path: root().join("README.md"),
        to: Some(root().join("NOTES.md")),
    });
    assert_eq!(write_paths(&renamed), vec![root().join("NOTES.md")]);
    assert_eq!(writes(&renamed), vec![("v2".to_string(), 2)]);

    let old_done = store.dispatch(Action::FileSaved {
        generation,
        key,
        path: root().join("README.md"),
        revision: 1,
    });
    assert!(old_done.effects.is_empty());
    assert!(store.state.writes.is_in_flight(&root().join("NOTES.md")));
}

#[test]
fn deleting_folder_drops_child_autosave() {
    let mut store = open_store();
    open_tab(&mut store, "src/lib.rs", "");
    let t0 = Instant::now();
    store.dispatch(Action::EditActive {
        content: "unsaved".to_string(),
        now: t0,
    });

    let generation = generation(&store);
    store.dispatch(Action::FsOpSucceeded {
        generation,
        op: FsOp::Delete,
        path: root().join("src"),
        to: None,
    });

    let tick = store.dispatch(Action::Tick {
        now: t0 + Duration::from_secs(60),
    });
    assert!(tick.effects.is_empty());
    assert!(store.state.writes.is_empty());
    assert!(store.state.tabs.active_tab().unwrap().dirty);
}
