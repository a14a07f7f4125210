//! Virtual file tree.
//!
//! The tree is a flat arena of nodes linked by parent ids, exactly the shape
//! it has in the persisted blob: no nested ownership, linear lookup, one root
//! with no parent. On top of that the module provides the derived views hosts
//! render from (sorted children, the expanded-row walk, ancestor paths) and
//! the mutations the shell dispatches (create, rename, cascading remove,
//! fold toggling).

use editor_shell_lang::{Language, file_icon_class, folder_icon_class};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Opaque identifier of a tree node.
///
/// Ids are stable across renames and persisted verbatim, so equality is the
/// only meaningful operation besides display.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wrap an existing id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying id string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Node kind: a leaf file or an expandable folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A file with text content.
    File,
    /// A folder containing child nodes.
    Folder,
}

/// One entry of the flat node arena.
///
/// The serialized form matches the persisted blob layout: camelCase keys,
/// `kind` stored under `"type"`, and the per-kind optionals (`content` for
/// files, `isOpen` for folders) omitted when absent but tolerated on read in
/// either position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique, stable node id.
    pub id: NodeId,
    #[serde(rename = "type")]
    /// File or folder.
    pub kind: NodeKind,
    /// Display name; drives language detection and sibling ordering.
    pub name: String,
    /// Parent node id; `None` only for the root folder.
    pub parent_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Text content (files only).
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Expanded flag (folders only).
    pub is_open: Option<bool>,
}

impl Node {
    /// Create a file node.
    pub fn file(
        id: NodeId,
        name: impl Into<String>,
        parent_id: Option<NodeId>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            kind: NodeKind::File,
            name: name.into(),
            parent_id,
            content: Some(content.into()),
            is_open: None,
        }
    }

    /// Create a folder node, expanded by default.
    pub fn folder(id: NodeId, name: impl Into<String>, parent_id: Option<NodeId>) -> Self {
        Self {
            id,
            kind: NodeKind::Folder,
            name: name.into(),
            parent_id,
            content: None,
            is_open: Some(true),
        }
    }

    /// Whether this node is a file.
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Whether this node is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Whether this node is the tree root.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether a folder is currently expanded. The root always reads as
    /// expanded; files always read as collapsed.
    pub fn is_expanded(&self) -> bool {
        if self.is_root() {
            return self.is_folder();
        }
        self.is_folder() && self.is_open.unwrap_or(false)
    }

    /// Language assigned to this node's name.
    pub fn language(&self) -> Language {
        Language::detect(&self.name)
    }

    /// Icon class hosts render in front of this node.
    pub fn icon_class(&self) -> &'static str {
        if self.is_folder() {
            folder_icon_class(self.is_expanded())
        } else {
            file_icon_class(&self.name)
        }
    }
}

/// Tree-level errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A node id was not found.
    NodeNotFound(NodeId),
    /// A create target parent was not found.
    ParentNotFound(NodeId),
    /// A create target parent is a file.
    ParentNotFolder(NodeId),
    /// The root folder cannot be removed.
    RootRemoval,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::NodeNotFound(id) => write!(f, "Node not found: {}", id),
            TreeError::ParentNotFound(id) => write!(f, "Parent not found: {}", id),
            TreeError::ParentNotFolder(id) => write!(f, "Parent is not a folder: {}", id),
            TreeError::RootRemoval => write!(f, "The root folder cannot be removed"),
        }
    }
}

impl std::error::Error for TreeError {}

/// The virtual file tree: a flat arena of parent-linked [`Node`]s.
///
/// Lookup is linear over the node list. That matches the persisted
/// representation one-to-one and is far below any interactive threshold for
/// the tree sizes this shell manages.
#[derive(Debug, Clone, Default)]
pub struct FileTree {
    nodes: Vec<Node>,
}

impl FileTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Rebuild a tree from a decoded node list (e.g. a loaded blob).
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// The fixed demo tree a fresh shell starts from: a `src` folder with a
    /// JavaScript file plus an HTML and a CSS file at the top level.
    pub fn seeded() -> Self {
        Self {
            nodes: vec![
                Node::folder(NodeId::from("root"), "root", None),
                Node::folder(NodeId::from("src"), "src", Some(NodeId::from("root"))),
                Node::file(
                    NodeId::from("f1"),
                    "main.js",
                    Some(NodeId::from("src")),
                    "// VS Code Web Clone\n\nclass Demo {\n    constructor() {\n        this.init();\n    }\n\n    init() {\n        console.log('Hello World');\n    }\n}",
                ),
                Node::file(
                    NodeId::from("f2"),
                    "index.html",
                    Some(NodeId::from("root")),
                    "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n    <meta charset=\"UTF-8\">\n    <title>Document</title>\n</head>\n<body>\n    <h1>Welcome</h1>\n</body>\n</html>",
                ),
                Node::file(
                    NodeId::from("f3"),
                    "style.css",
                    Some(NodeId::from("root")),
                    "body {\n    background-color: #1e1e1e;\n    color: #d4d4d4;\n    font-family: 'Segoe UI', sans-serif;\n}",
                ),
            ],
        }
    }

    /// All nodes in arena order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Node count.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node. `None` means the id is stale; callers degrade
    /// gracefully instead of erroring.
    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| &node.id == id)
    }

    /// The root folder, if the tree has one.
    pub fn root(&self) -> Option<&Node> {
        self.nodes.iter().find(|node| node.is_root())
    }

    /// Replace a file's content.
    pub fn set_content(&mut self, id: &NodeId, content: &str) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        node.content = Some(content.to_string());
        Ok(())
    }

    /// Create a node under `parent` and return its freshly minted id.
    ///
    /// Files start with empty content, folders start expanded. Sibling name
    /// duplicates are permitted.
    pub fn create(
        &mut self,
        kind: NodeKind,
        name: &str,
        parent: &NodeId,
    ) -> Result<NodeId, TreeError> {
        match self.get(parent) {
            None => return Err(TreeError::ParentNotFound(parent.clone())),
            Some(node) if !node.is_folder() => {
                return Err(TreeError::ParentNotFolder(parent.clone()));
            }
            Some(_) => {}
        }

        let id = self.mint_id();
        let node = match kind {
            NodeKind::File => Node::file(id.clone(), name, Some(parent.clone()), ""),
            NodeKind::Folder => Node::folder(id.clone(), name, Some(parent.clone())),
        };
        self.nodes.push(node);
        Ok(id)
    }

    /// Rename a node in place. Duplicates among siblings are permitted.
    pub fn rename(&mut self, id: &NodeId, name: &str) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        node.name = name.to_string();
        Ok(())
    }

    /// Remove a node and every transitive descendant.
    ///
    /// Returns all removed ids (the target first, then descendants level by
    /// level) so the session can drop any tabs pointing into the subtree.
    /// The root folder is refused.
    pub fn remove(&mut self, id: &NodeId) -> Result<Vec<NodeId>, TreeError> {
        let node = self
            .get(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))?;
        if node.is_root() {
            return Err(TreeError::RootRemoval);
        }

        let mut removed = vec![id.clone()];
        let mut cursor = 0;
        while cursor < removed.len() {
            let parent = removed[cursor].clone();
            for child in &self.nodes {
                if child.parent_id.as_ref() == Some(&parent) {
                    removed.push(child.id.clone());
                }
            }
            cursor += 1;
        }

        self.nodes.retain(|node| !removed.contains(&node.id));
        Ok(removed)
    }

    /// Flip a folder's expanded flag. Files and the root (which stays
    /// expanded) are left untouched; the return value says whether anything
    /// changed.
    pub fn toggle_open(&mut self, id: &NodeId) -> Result<bool, TreeError> {
        let node = self.get_mut(id)?;
        if !node.is_folder() || node.is_root() {
            return Ok(false);
        }
        let open = node.is_open.unwrap_or(false);
        node.is_open = Some(!open);
        Ok(true)
    }

    /// Collapse every folder except the root. Returns whether any folder
    /// actually changed state.
    pub fn collapse_all(&mut self) -> bool {
        let mut changed = false;
        for node in &mut self.nodes {
            if node.is_folder() && node.parent_id.is_some() && node.is_open != Some(false) {
                node.is_open = Some(false);
                changed = true;
            }
        }
        changed
    }

    /// Children of `parent` in display order: folders before files, then a
    /// case-insensitive name compare with a case-sensitive tiebreak.
    pub fn children_of(&self, parent: &NodeId) -> Vec<&Node> {
        let mut children: Vec<&Node> = self
            .nodes
            .iter()
            .filter(|node| node.parent_id.as_ref() == Some(parent))
            .collect();
        children.sort_by(|a, b| sibling_order(a, b));
        children
    }

    /// Depth-annotated preorder walk of the expanded tree, for the tree view.
    ///
    /// The root itself is not a row; its children start at depth 0. Collapsed
    /// folders contribute their own row but none of their descendants.
    pub fn visible_rows(&self) -> Vec<(usize, &Node)> {
        let mut rows = Vec::new();
        if let Some(root) = self.root() {
            let root_id = root.id.clone();
            self.push_rows(&root_id, 0, &mut rows);
        }
        rows
    }

    fn push_rows<'a>(&'a self, parent: &NodeId, depth: usize, rows: &mut Vec<(usize, &'a Node)>) {
        // Depth is bounded by the arena size; a hand-edited blob with a
        // parent cycle must not recurse forever.
        if depth > self.nodes.len() {
            return;
        }
        for child in self.children_of(parent) {
            rows.push((depth, child));
            if child.is_expanded() {
                self.push_rows(&child.id, depth + 1, rows);
            }
        }
    }

    /// Ancestor chain from the root down to `id` (inclusive), for
    /// breadcrumbs. A stale id yields an empty chain.
    pub fn path_of(&self, id: &NodeId) -> Vec<&Node> {
        let mut chain = Vec::new();
        let mut current = self.get(id);
        while let Some(node) = current {
            // Same cycle guard as the row walk.
            if chain.len() > self.nodes.len() {
                break;
            }
            chain.push(node);
            current = node.parent_id.as_ref().and_then(|pid| self.get(pid));
        }
        chain.reverse();
        chain
    }

    /// Case-insensitive substring search over file names. Folders never
    /// match, and an empty term matches nothing.
    pub fn search_files(&self, term: &str) -> Vec<&Node> {
        if term.is_empty() {
            return Vec::new();
        }
        let needle = term.to_lowercase();
        self.nodes
            .iter()
            .filter(|node| node.is_file() && node.name.to_lowercase().contains(&needle))
            .collect()
    }

    fn get_mut(&mut self, id: &NodeId) -> Result<&mut Node, TreeError> {
        self.nodes
            .iter_mut()
            .find(|node| &node.id == id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))
    }

    fn mint_id(&self) -> NodeId {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();

        // Same-millisecond mints get a sequence suffix until unique.
        let mut id = NodeId(format!("n_{}", millis));
        let mut seq = 1u32;
        while self.get(&id).is_some() {
            id = NodeId(format!("n_{}_{}", millis, seq));
            seq += 1;
        }
        id
    }
}

fn sibling_order(a: &Node, b: &Node) -> Ordering {
    match (a.kind, b.kind) {
        (NodeKind::Folder, NodeKind::File) => Ordering::Less,
        (NodeKind::File, NodeKind::Folder) => Ordering::Greater,
        _ => a
            .name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn test_seeded_shape() {
        let tree = FileTree::seeded();
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.root().map(|n| n.id.as_str()), Some("root"));
        assert_eq!(
            tree.nodes().iter().filter(|n| n.is_root()).count(),
            1 // 只有一个根
        );
        assert!(tree.get(&id("f1")).is_some_and(|n| n.is_file()));
        assert!(tree.get(&id("src")).is_some_and(|n| n.is_expanded()));
    }

    #[test]
    fn test_create_under_folder() {
        let mut tree = FileTree::seeded();
        let new_id = tree.create(NodeKind::File, "app.py", &id("src")).unwrap();

        let node = tree.get(&new_id).unwrap();
        assert_eq!(node.name, "app.py");
        assert_eq!(node.content.as_deref(), Some(""));
        assert_eq!(node.parent_id, Some(id("src")));
        assert!(new_id.as_str().starts_with("n_"));
    }

    #[test]
    fn test_create_rejects_file_parent_and_missing_parent() {
        let mut tree = FileTree::seeded();
        assert_eq!(
            tree.create(NodeKind::File, "x.js", &id("f1")),
            Err(TreeError::ParentNotFolder(id("f1")))
        );
        assert_eq!(
            tree.create(NodeKind::Folder, "x", &id("nope")),
            Err(TreeError::ParentNotFound(id("nope")))
        );
    }

    #[test]
    fn test_minted_ids_are_unique_within_a_millisecond() {
        let mut tree = FileTree::seeded();
        let a = tree.create(NodeKind::File, "a.js", &id("root")).unwrap();
        let b = tree.create(NodeKind::File, "b.js", &id("root")).unwrap();
        let c = tree.create(NodeKind::File, "c.js", &id("root")).unwrap();
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_rename_in_place() {
        let mut tree = FileTree::seeded();
        tree.rename(&id("f1"), "renamed.py").unwrap();
        assert_eq!(tree.get(&id("f1")).unwrap().name, "renamed.py");
        assert_eq!(
            tree.rename(&id("gone"), "x"),
            Err(TreeError::NodeNotFound(id("gone")))
        );
    }

    #[test]
    fn test_remove_cascades_to_all_descendants() {
        let mut tree = FileTree::seeded();
        let sub = tree.create(NodeKind::Folder, "sub", &id("src")).unwrap();
        let deep = tree.create(NodeKind::File, "deep.js", &sub).unwrap();

        let removed = tree.remove(&id("src")).unwrap();
        assert_eq!(removed[0], id("src"));
        assert!(removed.contains(&id("f1")));
        assert!(removed.contains(&sub));
        assert!(removed.contains(&deep));
        assert_eq!(removed.len(), 4);

        // 删除后不能留下孤儿
        for node in tree.nodes() {
            if let Some(parent) = &node.parent_id {
                assert!(tree.get(parent).is_some());
            }
        }
    }

    #[test]
    fn test_remove_refuses_root_and_stale_ids() {
        let mut tree = FileTree::seeded();
        assert_eq!(tree.remove(&id("root")), Err(TreeError::RootRemoval));
        assert_eq!(
            tree.remove(&id("gone")),
            Err(TreeError::NodeNotFound(id("gone")))
        );
    }

    #[test]
    fn test_toggle_open_flips_folders_only() {
        let mut tree = FileTree::seeded();
        assert!(tree.toggle_open(&id("src")).unwrap());
        assert!(!tree.get(&id("src")).unwrap().is_expanded());
        assert!(tree.toggle_open(&id("src")).unwrap());
        assert!(tree.get(&id("src")).unwrap().is_expanded());

        // Files and the root are untouched.
        assert!(!tree.toggle_open(&id("f1")).unwrap());
        assert!(!tree.toggle_open(&id("root")).unwrap());
        assert!(tree.get(&id("root")).unwrap().is_expanded());
    }

    #[test]
    fn test_collapse_all_keeps_root_expanded() {
        let mut tree = FileTree::seeded();
        assert!(tree.collapse_all());
        assert!(tree.get(&id("root")).unwrap().is_expanded());
        assert!(!tree.get(&id("src")).unwrap().is_expanded());
        // Second pass changes nothing.
        assert!(!tree.collapse_all());
    }

    #[test]
    fn test_children_sorted_folders_first_then_name() {
        let mut tree = FileTree::seeded();
        tree.create(NodeKind::Folder, "assets", &id("root")).unwrap();
        tree.create(NodeKind::File, "Index.html", &id("root")).unwrap();

        let names: Vec<&str> = tree
            .children_of(&id("root"))
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        // Folders first; "Index.html" ties "index.html" case-insensitively
        // and the uppercase variant wins the case-sensitive tiebreak.
        assert_eq!(
            names,
            vec!["assets", "src", "Index.html", "index.html", "style.css"]
        );
    }

    #[test]
    fn test_visible_rows_walks_expanded_folders_only() {
        let mut tree = FileTree::seeded();

        let rows: Vec<(usize, &str)> = tree
            .visible_rows()
            .iter()
            .map(|(depth, node)| (*depth, node.name.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                (0, "src"),
                (1, "main.js"),
                (0, "index.html"),
                (0, "style.css"),
            ]
        );

        tree.toggle_open(&id("src")).unwrap();
        let rows: Vec<&str> = tree
            .visible_rows()
            .iter()
            .map(|(_, node)| node.name.as_str())
            .collect();
        assert_eq!(rows, vec!["src", "index.html", "style.css"]);
    }

    #[test]
    fn test_path_of_runs_root_to_node() {
        let tree = FileTree::seeded();
        let path: Vec<&str> = tree
            .path_of(&id("f1"))
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(path, vec!["root", "src", "main.js"]);
        assert!(tree.path_of(&id("gone")).is_empty());
    }

    #[test]
    fn test_search_matches_files_case_insensitively() {
        let tree = FileTree::seeded();
        let hits: Vec<&str> = tree
            .search_files("MAIN")
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(hits, vec!["main.js"]);

        // Folders never match, empty terms match nothing.
        assert!(tree.search_files("src").is_empty());
        assert!(tree.search_files("").is_empty());
    }

    #[test]
    fn test_node_metadata_helpers() {
        let tree = FileTree::seeded();
        let main = tree.get(&id("f1")).unwrap();
        assert_eq!(main.language(), Language::JavaScript);
        assert_eq!(main.icon_class(), "fab fa-js icon-js");

        let src = tree.get(&id("src")).unwrap();
        assert_eq!(src.icon_class(), "fas fa-folder-open icon-folder");
    }
}
