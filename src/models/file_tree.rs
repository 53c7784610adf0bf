//! 文件树数据模型
//!
//! Nodes live in a slotmap arena and are indexed by absolute path, so a
//! listing reply is patched into the tree with one exact lookup instead of
//! walking ancestors by path prefix.

use crate::kernel::services::ports::DirEntryInfo;
use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::{new_key_type, SlotMap};
use std::{
    fmt,
    path::{Path, PathBuf},
};

new_key_type! { pub struct NodeId; }

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    File,
    Dir,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, PartialEq, Eq)]
pub enum FileTreeError {
    InvalidNodeId,
    ParentNotDirectory,
    PathNotFound(PathBuf),
}

impl fmt::Display for FileTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileTreeError::InvalidNodeId => write!(f, "invalid node id"),
            FileTreeError::ParentNotDirectory => write!(f, "parent is not a directory"),
            FileTreeError::PathNotFound(p) => write!(f, "path not in tree: {}", p.display()),
        }
    }
}

impl std::error::Error for FileTreeError {}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub title: String,
    pub path: PathBuf,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Option<Vec<NodeId>>,
    load_state: LoadState,
}

impl TreeNode {
    fn new(title: String, path: PathBuf, kind: NodeKind, parent: Option<NodeId>) -> Self {
        let (children, load_state) = match kind {
            NodeKind::File => (None, LoadState::Loaded),
            NodeKind::Dir => (Some(Vec::new()), LoadState::NotLoaded),
        };
        Self {
            title,
            path,
            kind,
            parent,
            children,
            load_state,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::File
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// `None` for files; for directories the children in listing order.
    pub fn children(&self) -> Option<&[NodeId]> {
        self.children.as_deref()
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }
}

/// Value snapshot of a subtree, used for rendering and structural comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNodeView {
    pub key: NodeId,
    pub title: String,
    pub path: PathBuf,
    pub is_leaf: bool,
    pub children: Option<Vec<TreeNodeView>>,
}

#[derive(Debug, Clone)]
pub struct FileTreeRow {
    pub id: NodeId,
    pub depth: u16,
    pub title: String,
    pub is_dir: bool,
    pub is_expanded: bool,
    pub load_state: LoadState,
}

pub struct FileTree {
    arena: SlotMap<NodeId, TreeNode>,
    root: NodeId,
    id_by_path: FxHashMap<PathBuf, NodeId>,
    expanded: FxHashSet<NodeId>,
    selected: Option<NodeId>,
}

impl fmt::Debug for FileTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileTree")
            .field("root", &self.root_path())
            .field("nodes", &self.arena.len())
            .field("selected", &self.selected)
            .finish()
    }
}

impl FileTree {
    pub fn new(root_path: PathBuf) -> Self {
        let title = root_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| root_path.to_string_lossy().into_owned());

        let mut arena = SlotMap::with_key();
        let root = arena.insert(TreeNode::new(
            title,
            root_path.clone(),
            NodeKind::Dir,
            None,
        ));

        let mut id_by_path = FxHashMap::default();
        id_by_path.insert(root_path, root);

        let mut expanded = FxHashSet::default();
        expanded.insert(root);

        Self {
            arena,
            root,
            id_by_path,
            expanded,
            selected: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_path(&self) -> &Path {
        &self.arena[self.root].path
    }

    pub fn root_title(&self) -> &str {
        &self.arena[self.root].title
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.top_level().is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.arena.get(id)
    }

    /// The workspace's root sequence: the root directory's children.
    pub fn top_level(&self) -> &[NodeId] {
        self.arena[self.root].children.as_deref().unwrap_or(&[])
    }

    pub fn find_by_path(&self, path: &Path) -> Option<NodeId> {
        self.id_by_path
            .get(path)
            .copied()
            .filter(|id| self.arena.contains_key(*id))
    }

    pub fn load_state(&self, id: NodeId) -> Option<LoadState> {
        self.arena.get(id).map(|n| n.load_state)
    }

    pub fn set_load_state(&mut self, id: NodeId, state: LoadState) -> bool {
        match self.arena.get_mut(id) {
            Some(node) if node.kind == NodeKind::Dir && node.load_state != state => {
                node.load_state = state;
                true
            }
            _ => false,
        }
    }

    pub fn is_dir(&self, id: NodeId) -> bool {
        self.arena
            .get(id)
            .is_some_and(|n| n.kind == NodeKind::Dir)
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn set_selected(&mut self, id: Option<NodeId>) -> bool {
        let id = id.filter(|id| self.arena.contains_key(*id));
        if self.selected == id {
            return false;
        }
        self.selected = id;
        true
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn expand(&mut self, id: NodeId) -> bool {
        self.is_dir(id) && self.expanded.insert(id)
    }

    pub fn collapse(&mut self, id: NodeId) -> bool {
        id != self.root && self.expanded.remove(&id)
    }

    /// Replaces the children of the directory at `dir` with `entries`.
    ///
    /// Children whose path and kind survive keep their id, load state and
    /// loaded subtree. Children missing from `entries` are dropped together
    /// with everything below them.
    pub fn apply_listing(
        &mut self,
        dir: &Path,
        entries: Vec<DirEntryInfo>,
    ) -> Result<NodeId, FileTreeError> {
        let id = self
            .find_by_path(dir)
            .ok_or_else(|| FileTreeError::PathNotFound(dir.to_path_buf()))?;

        let (dir_path, previous) = {
            let node = self.arena.get(id).ok_or(FileTreeError::InvalidNodeId)?;
            let children = node
                .children
                .as_ref()
                .ok_or(FileTreeError::ParentNotDirectory)?;
            (node.path.clone(), children.clone())
        };

        let mut reusable: FxHashMap<PathBuf, NodeId> = previous
            .iter()
            .filter_map(|child| self.arena.get(*child).map(|n| (n.path.clone(), *child)))
            .collect();

        let mut next = Vec::with_capacity(entries.len());
        for entry in entries {
            let path = dir_path.join(&entry.name);
            let kind = entry.kind();

            if let Some(existing) = reusable.remove(&path) {
                if self.arena.get(existing).is_some_and(|n| n.kind == kind) {
                    next.push(existing);
                    continue;
                }
                self.remove_subtree(existing);
            }

            let child = self
                .arena
                .insert(TreeNode::new(entry.name, path.clone(), kind, Some(id)));
            self.id_by_path.insert(path, child);
            next.push(child);
        }

        for (_, stale) in reusable {
            self.remove_subtree(stale);
        }

        let node = self.arena.get_mut(id).ok_or(FileTreeError::InvalidNodeId)?;
        node.children = Some(next);
        node.load_state = LoadState::Loaded;
        Ok(id)
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let parent = self.arena.get(id).and_then(|n| n.parent);
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            let Some(node) = self.arena.remove(node_id) else {
                continue;
            };
            if self.id_by_path.get(&node.path) == Some(&node_id) {
                self.id_by_path.remove(&node.path);
            }
            self.expanded.remove(&node_id);
            if self.selected == Some(node_id) {
                self.selected = parent;
            }
            if let Some(children) = node.children {
                stack.extend(children);
            }
        }
    }

    pub fn snapshot(&self) -> Vec<TreeNodeView> {
        self.top_level()
            .iter()
            .filter_map(|id| self.view_of(*id))
            .collect()
    }

    pub fn view_of(&self, id: NodeId) -> Option<TreeNodeView> {
        let node = self.arena.get(id)?;
        Some(TreeNodeView {
            key: id,
            title: node.title.clone(),
            path: node.path.clone(),
            is_leaf: node.is_leaf(),
            children: node
                .children
                .as_ref()
                .map(|children| children.iter().filter_map(|c| self.view_of(*c)).collect()),
        })
    }

    pub fn flatten_for_view(&self) -> Vec<FileTreeRow> {
        let mut result = Vec::new();
        let mut stack: Vec<(NodeId, u16)> = self
            .top_level()
            .iter()
            .rev()
            .map(|id| (*id, 0))
            .collect();

        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.arena.get(id) else {
                continue;
            };
            let is_expanded = self.expanded.contains(&id);
            result.push(FileTreeRow {
                id,
                depth,
                title: node.title.clone(),
                is_dir: node.kind == NodeKind::Dir,
                is_expanded,
                load_state: node.load_state,
            });

            if is_expanded {
                if let Some(children) = &node.children {
                    stack.extend(children.iter().rev().map(|c| (*c, depth + 1)));
                }
            }
        }

        result
    }
}

#[cfg(test)]
#[path = "../../tests/unit/models/file_tree.rs"]
mod tests;
