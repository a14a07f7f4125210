//! Command Interface Layer
//!
//! Provides a unified command interface for convenient frontend integration.
//!
//! # Overview
//!
//! The Command Interface Layer is the single entry point collaborators (tree
//! view, tab strip, context menus, the text input) dispatch through. It
//! supports the following types of operations:
//!
//! - **Tree Operations**: Create, rename, delete nodes and fold folders
//! - **Tab Operations**: Open and close file tabs
//! - **Text Editing**: Replace the active buffer, insert indentation
//! - **Cursor Operations**: Move the caret
//!
//! Every mutation of the tree or of file content is immediately written
//! through to the blob store; tab and cursor state stay in memory.
//!
//! # Example
//!
//! ```rust
//! use editor_shell::{Command, EditCommand, MemoryStore, NodeId, ShellExecutor, TabCommand};
//!
//! let mut executor = ShellExecutor::new(Box::new(MemoryStore::new())).unwrap();
//!
//! // Open the seeded JavaScript file
//! executor.execute(Command::Tab(TabCommand::OpenFile {
//!     id: NodeId::from("f1"),
//! })).unwrap();
//!
//! // Replace its content; the change is persisted immediately
//! executor.execute(Command::Edit(EditCommand::SetText {
//!     text: "let x = 1".to_string(),
//! })).unwrap();
//! ```

use crate::session::EditorSession;
use crate::storage::{self, BlobStore, StorageError};
use crate::tree::{FileTree, Node, NodeId, NodeKind, TreeError};
use editor_shell_highlight::{Highlighter, escape, line_numbers};
use editor_shell_lang::Language;

/// File tree commands (the explorer side bar and context menus).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeCommand {
    /// Create a node and persist the tree
    CreateNode {
        /// File or folder.
        kind: NodeKind,
        /// Display name; an empty name is ignored (a cancelled prompt).
        name: String,
        /// Parent folder. `None` targets the active file's folder, falling
        /// back to the root.
        parent: Option<NodeId>,
    },
    /// Rename a node in place
    RenameNode {
        /// Node to rename.
        id: NodeId,
        /// New display name; an empty name is ignored.
        name: String,
    },
    /// Delete a node and its whole subtree
    DeleteNode {
        /// Node to delete.
        id: NodeId,
    },
    /// Flip a folder between expanded and collapsed
    ToggleFolder {
        /// Folder to toggle.
        id: NodeId,
    },
    /// Collapse every folder except the root
    CollapseAll,
}

/// Tab strip commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabCommand {
    /// Open a file in a tab and activate it
    OpenFile {
        /// File to open.
        id: NodeId,
    },
    /// Close a file's tab
    CloseFile {
        /// File to close.
        id: NodeId,
    },
}

/// Text editing commands against the active file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Replace the whole buffer content (the text input committed a value)
    SetText {
        /// New buffer content.
        text: String,
    },
    /// Replace the selection with a four-space indent
    InsertTab {
        /// Character offset of the selection start.
        start: usize,
        /// Character offset of the selection end.
        end: usize,
    },
}

/// Cursor commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorCommand {
    /// Move the caret to a character offset
    MoveTo {
        /// Character offset to move to (clamped to the buffer).
        offset: usize,
    },
}

/// Unified command type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// File tree commands
    Tree(TreeCommand),
    /// Tab strip commands
    Tab(TabCommand),
    /// Text editing commands
    Edit(EditCommand),
    /// Cursor command
    Cursor(CursorCommand),
}

/// Command execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Success, no return value
    Success,
    /// The command did not apply (stale id, empty name, no active file) and
    /// nothing changed
    Ignored,
    /// Success, returns the id of the created node
    Created(NodeId),
    /// Success, returns every removed node id (target first)
    Removed(Vec<NodeId>),
    /// Success, returns a caret offset
    Offset(usize),
}

/// Command error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// A tree invariant was violated (removing the root, creating under a
    /// file)
    Tree(TreeError),
    /// The write-through to the blob store failed
    Storage(String),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Tree(err) => {
                write!(f, "Tree command failed: {}", err)
            }
            CommandError::Storage(message) => {
                write!(f, "Persisting the tree failed: {}", message)
            }
        }
    }
}

impl std::error::Error for CommandError {}

impl From<TreeError> for CommandError {
    fn from(err: TreeError) -> Self {
        CommandError::Tree(err)
    }
}

impl From<StorageError> for CommandError {
    fn from(err: StorageError) -> Self {
        CommandError::Storage(err.to_string())
    }
}

/// Shell Core state
///
/// `ShellCore` aggregates the shell's components behind one context:
///
/// - **FileTree**: Flat parent-linked node arena
/// - **EditorSession**: Open tabs, active file, live buffer, caret
/// - **BlobStore**: Persistence backend the tree is written through to
/// - **Highlighter**: Markup renderer for the active buffer
///
/// A fresh core loads the tree from the store and seeds the fixed demo tree
/// when nothing (or nothing readable) is there.
///
/// # Example
///
/// ```rust
/// use editor_shell::{MemoryStore, ShellCore};
///
/// let core = ShellCore::new(Box::new(MemoryStore::new())).unwrap();
/// assert_eq!(core.tree.len(), 5);
/// assert!(core.session.active_file().is_none());
/// ```
pub struct ShellCore {
    /// Virtual file tree
    pub tree: FileTree,
    /// Tabbed editing surface
    pub session: EditorSession,
    /// Persistence backend
    store: Box<dyn BlobStore>,
    /// Markup renderer; `None` falls back to escaped plain text
    highlighter: Option<Highlighter>,
}

impl ShellCore {
    /// Create a core over `store`: load the persisted tree, or seed and
    /// persist the demo tree when the store is empty or unreadable.
    pub fn new(store: Box<dyn BlobStore>) -> Result<Self, StorageError> {
        let nodes = storage::load_nodes(store.as_ref());
        let mut core = Self {
            tree: FileTree::from_nodes(nodes),
            session: EditorSession::new(),
            store,
            highlighter: Highlighter::new().ok(),
        };
        if core.tree.is_empty() {
            core.tree = FileTree::seeded();
            core.persist()?;
        }
        Ok(core)
    }

    /// Serialize the full tree into the store.
    pub fn persist(&mut self) -> Result<(), StorageError> {
        storage::save_nodes(self.store.as_mut(), self.tree.nodes())
    }

    /// Copy the live buffer into the active file's node and persist.
    ///
    /// Returns whether anything was written; without an active (and still
    /// existing) file there is nothing to commit.
    pub fn commit_active(&mut self) -> Result<bool, StorageError> {
        let Some(id) = self.session.active_file().cloned() else {
            return Ok(false);
        };
        if self.tree.set_content(&id, &self.session.text()).is_err() {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Language of the active file, [`Language::PlainText`] when no file is
    /// open.
    pub fn language(&self) -> Language {
        self.session
            .active_file()
            .and_then(|id| self.tree.get(id))
            .map(|node| node.language())
            .unwrap_or_default()
    }

    /// Highlighted markup of the live buffer.
    pub fn render_markup(&self) -> String {
        let raw = self.session.text();
        match &self.highlighter {
            Some(highlighter) => highlighter.render(self.language(), &raw),
            None => escape(&raw),
        }
    }

    /// Gutter line numbers for the live buffer.
    pub fn gutter(&self) -> Vec<usize> {
        line_numbers(&self.session.text())
    }

    /// The persistence backend the tree is written through to.
    pub fn store(&self) -> &dyn BlobStore {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for ShellCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShellCore")
            .field("tree", &self.tree)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Command executor
///
/// Owns a [`ShellCore`] and funnels every collaborator command through one
/// dispatch point, keeping a history of the dispatched commands.
pub struct ShellExecutor {
    /// Shell Core
    core: ShellCore,
    /// Command history
    command_history: Vec<Command>,
}

impl ShellExecutor {
    /// Create an executor over a fresh core backed by `store`.
    pub fn new(store: Box<dyn BlobStore>) -> Result<Self, StorageError> {
        Ok(Self::from_core(ShellCore::new(store)?))
    }

    /// Create an executor over an existing core.
    pub fn from_core(core: ShellCore) -> Self {
        Self {
            core,
            command_history: Vec::new(),
        }
    }

    /// Execute command
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        // Save command to history
        self.command_history.push(command.clone());

        // Execute command
        match command {
            Command::Tree(tree_cmd) => self.execute_tree(tree_cmd),
            Command::Tab(tab_cmd) => self.execute_tab(tab_cmd),
            Command::Edit(edit_cmd) => self.execute_edit(edit_cmd),
            Command::Cursor(cursor_cmd) => self.execute_cursor(cursor_cmd),
        }
    }

    /// Batch execute commands (transactional)
    pub fn execute_batch(
        &mut self,
        commands: Vec<Command>,
    ) -> Result<Vec<CommandResult>, CommandError> {
        let mut results = Vec::new();

        for command in commands {
            let result = self.execute(command)?;
            results.push(result);
        }

        Ok(results)
    }

    /// Get command history
    pub fn get_command_history(&self) -> &[Command] {
        &self.command_history
    }

    /// Get a reference to the Shell Core
    pub fn core(&self) -> &ShellCore {
        &self.core
    }

    /// Get a mutable reference to the Shell Core
    pub fn core_mut(&mut self) -> &mut ShellCore {
        &mut self.core
    }

    // Private method: execute tree command
    fn execute_tree(&mut self, command: TreeCommand) -> Result<CommandResult, CommandError> {
        match command {
            TreeCommand::CreateNode { kind, name, parent } => {
                if name.is_empty() {
                    return Ok(CommandResult::Ignored);
                }
                let Some(parent) = parent.or_else(|| self.implicit_parent()) else {
                    return Ok(CommandResult::Ignored);
                };
                let id = match self.core.tree.create(kind, &name, &parent) {
                    Ok(id) => id,
                    Err(TreeError::ParentNotFound(_)) => return Ok(CommandResult::Ignored),
                    Err(err) => return Err(err.into()),
                };
                self.core.persist()?;
                if kind == NodeKind::File {
                    self.core.session.open(&self.core.tree, &id);
                }
                Ok(CommandResult::Created(id))
            }
            TreeCommand::RenameNode { id, name } => {
                if name.is_empty() {
                    return Ok(CommandResult::Ignored);
                }
                match self.core.tree.rename(&id, &name) {
                    Ok(()) => {
                        self.core.persist()?;
                        Ok(CommandResult::Success)
                    }
                    Err(TreeError::NodeNotFound(_)) => Ok(CommandResult::Ignored),
                    Err(err) => Err(err.into()),
                }
            }
            TreeCommand::DeleteNode { id } => match self.core.tree.remove(&id) {
                Ok(removed) => {
                    self.core.session.drop_tabs(&self.core.tree, &removed);
                    self.core.persist()?;
                    Ok(CommandResult::Removed(removed))
                }
                Err(TreeError::NodeNotFound(_)) => Ok(CommandResult::Ignored),
                Err(err) => Err(err.into()),
            },
            TreeCommand::ToggleFolder { id } => match self.core.tree.toggle_open(&id) {
                Ok(true) => {
                    self.core.persist()?;
                    Ok(CommandResult::Success)
                }
                Ok(false) => Ok(CommandResult::Ignored),
                Err(TreeError::NodeNotFound(_)) => Ok(CommandResult::Ignored),
                Err(err) => Err(err.into()),
            },
            TreeCommand::CollapseAll => {
                if self.core.tree.collapse_all() {
                    self.core.persist()?;
                    Ok(CommandResult::Success)
                } else {
                    Ok(CommandResult::Ignored)
                }
            }
        }
    }

    // Private method: execute tab command
    fn execute_tab(&mut self, command: TabCommand) -> Result<CommandResult, CommandError> {
        // Tabs live in memory only; nothing here touches the store.
        match command {
            TabCommand::OpenFile { id } => {
                if self.core.session.open(&self.core.tree, &id) {
                    Ok(CommandResult::Success)
                } else {
                    Ok(CommandResult::Ignored)
                }
            }
            TabCommand::CloseFile { id } => {
                if self.core.session.close(&self.core.tree, &id) {
                    Ok(CommandResult::Success)
                } else {
                    Ok(CommandResult::Ignored)
                }
            }
        }
    }

    // Private method: execute edit command
    fn execute_edit(&mut self, command: EditCommand) -> Result<CommandResult, CommandError> {
        match command {
            EditCommand::SetText { text } => {
                if !self.core.session.set_text(&text) {
                    return Ok(CommandResult::Ignored);
                }
                self.core.commit_active()?;
                Ok(CommandResult::Success)
            }
            EditCommand::InsertTab { start, end } => {
                let Some(caret) = self.core.session.insert_tab(start, end) else {
                    return Ok(CommandResult::Ignored);
                };
                self.core.commit_active()?;
                Ok(CommandResult::Offset(caret))
            }
        }
    }

    // Private method: execute cursor command
    fn execute_cursor(&mut self, command: CursorCommand) -> Result<CommandResult, CommandError> {
        match command {
            CursorCommand::MoveTo { offset } => {
                if self.core.session.set_cursor(offset) {
                    Ok(CommandResult::Success)
                } else {
                    Ok(CommandResult::Ignored)
                }
            }
        }
    }

    // Create targets fall back to the active file's folder, then to the root.
    fn implicit_parent(&self) -> Option<NodeId> {
        self.core
            .session
            .active_file()
            .and_then(|id| self.core.tree.get(id))
            .and_then(|node: &Node| node.parent_id.clone())
            .or_else(|| self.core.tree.root().map(|node| node.id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, STORE_KEY};

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    fn executor() -> ShellExecutor {
        ShellExecutor::new(Box::new(MemoryStore::new())).unwrap()
    }

    #[test]
    fn test_fresh_store_is_seeded_and_persisted() {
        let executor = executor();
        assert_eq!(executor.core().tree.len(), 5);

        // Seeding writes through immediately.
        let blob = executor.core().store().read(STORE_KEY).unwrap().unwrap();
        let nodes: Vec<Node> = serde_json::from_str(&blob).unwrap();
        assert_eq!(nodes, executor.core().tree.nodes());
    }

    #[test]
    fn test_existing_blob_is_not_reseeded() {
        let mut store = MemoryStore::new();
        let mut tree = FileTree::seeded();
        tree.rename(&id("f1"), "kept.js").unwrap();
        storage::save_nodes(&mut store, tree.nodes()).unwrap();

        let executor = ShellExecutor::new(Box::new(store)).unwrap();
        assert_eq!(executor.core().tree.get(&id("f1")).unwrap().name, "kept.js");
    }

    #[test]
    fn test_corrupt_blob_reseeds() {
        let mut store = MemoryStore::new();
        store.write(STORE_KEY, "][").unwrap();

        let executor = ShellExecutor::new(Box::new(store)).unwrap();
        assert_eq!(executor.core().tree.len(), 5);
        assert!(executor.core().tree.get(&id("root")).is_some());
    }

    #[test]
    fn test_create_file_opens_and_persists_it() {
        let mut executor = executor();
        let result = executor
            .execute(Command::Tree(TreeCommand::CreateNode {
                kind: NodeKind::File,
                name: "untitled.js".to_string(),
                parent: Some(id("src")),
            }))
            .unwrap();

        let CommandResult::Created(new_id) = result else {
            panic!("expected Created, got {:?}", result);
        };
        assert_eq!(executor.core().session.active_file(), Some(&new_id));

        let node = executor.core().tree.get(&new_id).unwrap();
        assert_eq!(node.parent_id, Some(id("src")));
        assert_eq!(node.content.as_deref(), Some(""));
    }

    #[test]
    fn test_create_folder_does_not_open_a_tab() {
        let mut executor = executor();
        let result = executor
            .execute(Command::Tree(TreeCommand::CreateNode {
                kind: NodeKind::Folder,
                name: "New Folder".to_string(),
                parent: None,
            }))
            .unwrap();

        assert!(matches!(result, CommandResult::Created(_)));
        assert!(executor.core().session.open_files().is_empty());
    }

    #[test]
    fn test_create_parent_defaults_to_active_files_folder() {
        let mut executor = executor();

        // No active file: the root is the target.
        let result = executor
            .execute(Command::Tree(TreeCommand::CreateNode {
                kind: NodeKind::Folder,
                name: "top".to_string(),
                parent: None,
            }))
            .unwrap();
        let CommandResult::Created(top) = result else {
            panic!("expected Created");
        };
        assert_eq!(
            executor.core().tree.get(&top).unwrap().parent_id,
            Some(id("root"))
        );

        // With main.js active, new nodes land next to it in src.
        executor
            .execute(Command::Tab(TabCommand::OpenFile { id: id("f1") }))
            .unwrap();
        let result = executor
            .execute(Command::Tree(TreeCommand::CreateNode {
                kind: NodeKind::File,
                name: "util.js".to_string(),
                parent: None,
            }))
            .unwrap();
        let CommandResult::Created(util) = result else {
            panic!("expected Created");
        };
        assert_eq!(
            executor.core().tree.get(&util).unwrap().parent_id,
            Some(id("src"))
        );
    }

    #[test]
    fn test_create_with_empty_name_is_ignored() {
        let mut executor = executor();
        let before = executor.core().tree.len();

        let result = executor
            .execute(Command::Tree(TreeCommand::CreateNode {
                kind: NodeKind::File,
                name: String::new(),
                parent: None,
            }))
            .unwrap();
        assert_eq!(result, CommandResult::Ignored);
        assert_eq!(executor.core().tree.len(), before);
    }

    #[test]
    fn test_create_under_file_is_an_error() {
        let mut executor = executor();
        let result = executor.execute(Command::Tree(TreeCommand::CreateNode {
            kind: NodeKind::File,
            name: "x.js".to_string(),
            parent: Some(id("f1")),
        }));
        assert_eq!(
            result,
            Err(CommandError::Tree(TreeError::ParentNotFolder(id("f1"))))
        );
    }

    #[test]
    fn test_create_under_stale_parent_is_ignored() {
        let mut executor = executor();
        let result = executor
            .execute(Command::Tree(TreeCommand::CreateNode {
                kind: NodeKind::File,
                name: "x.js".to_string(),
                parent: Some(id("gone")),
            }))
            .unwrap();
        assert_eq!(result, CommandResult::Ignored);
    }

    #[test]
    fn test_rename_persists_and_stale_rename_is_ignored() {
        let mut executor = executor();
        let result = executor
            .execute(Command::Tree(TreeCommand::RenameNode {
                id: id("f1"),
                name: "app.py".to_string(),
            }))
            .unwrap();
        assert_eq!(result, CommandResult::Success);
        assert_eq!(executor.core().tree.get(&id("f1")).unwrap().name, "app.py");

        let result = executor
            .execute(Command::Tree(TreeCommand::RenameNode {
                id: id("gone"),
                name: "x".to_string(),
            }))
            .unwrap();
        assert_eq!(result, CommandResult::Ignored);

        let result = executor
            .execute(Command::Tree(TreeCommand::RenameNode {
                id: id("f1"),
                name: String::new(),
            }))
            .unwrap();
        assert_eq!(result, CommandResult::Ignored);
        assert_eq!(executor.core().tree.get(&id("f1")).unwrap().name, "app.py");
    }

    #[test]
    fn test_delete_cascades_and_closes_tabs() {
        let mut executor = executor();
        executor
            .execute(Command::Tab(TabCommand::OpenFile { id: id("f2") }))
            .unwrap();
        executor
            .execute(Command::Tab(TabCommand::OpenFile { id: id("f1") }))
            .unwrap();

        let result = executor
            .execute(Command::Tree(TreeCommand::DeleteNode { id: id("src") }))
            .unwrap();
        let CommandResult::Removed(removed) = result else {
            panic!("expected Removed");
        };
        assert_eq!(removed, vec![id("src"), id("f1")]);

        assert!(executor.core().tree.get(&id("f1")).is_none());
        assert_eq!(executor.core().session.open_files(), &[id("f2")]);
        assert_eq!(executor.core().session.active_file(), Some(&id("f2")));
    }

    #[test]
    fn test_delete_root_is_an_error() {
        let mut executor = executor();
        let result = executor.execute(Command::Tree(TreeCommand::DeleteNode { id: id("root") }));
        assert_eq!(result, Err(CommandError::Tree(TreeError::RootRemoval)));
        assert_eq!(executor.core().tree.len(), 5);
    }

    #[test]
    fn test_toggle_folder_and_collapse_all() {
        let mut executor = executor();
        let result = executor
            .execute(Command::Tree(TreeCommand::ToggleFolder { id: id("src") }))
            .unwrap();
        assert_eq!(result, CommandResult::Success);

        // Files and stale ids fall through silently.
        let result = executor
            .execute(Command::Tree(TreeCommand::ToggleFolder { id: id("f1") }))
            .unwrap();
        assert_eq!(result, CommandResult::Ignored);
        let result = executor
            .execute(Command::Tree(TreeCommand::ToggleFolder { id: id("gone") }))
            .unwrap();
        assert_eq!(result, CommandResult::Ignored);

        let result = executor
            .execute(Command::Tree(TreeCommand::CollapseAll))
            .unwrap();
        assert_eq!(result, CommandResult::Success);
        // Everything already collapsed: nothing changes.
        let result = executor
            .execute(Command::Tree(TreeCommand::CollapseAll))
            .unwrap();
        assert_eq!(result, CommandResult::Ignored);
    }

    #[test]
    fn test_set_text_writes_through_to_the_node() {
        let mut executor = executor();
        executor
            .execute(Command::Tab(TabCommand::OpenFile { id: id("f3") }))
            .unwrap();

        let result = executor
            .execute(Command::Edit(EditCommand::SetText {
                text: "body { margin: 0; }".to_string(),
            }))
            .unwrap();
        assert_eq!(result, CommandResult::Success);
        assert_eq!(
            executor.core().tree.get(&id("f3")).unwrap().content.as_deref(),
            Some("body { margin: 0; }")
        );
    }

    #[test]
    fn test_edit_without_active_file_is_ignored() {
        let mut executor = executor();
        let result = executor
            .execute(Command::Edit(EditCommand::SetText {
                text: "orphan".to_string(),
            }))
            .unwrap();
        assert_eq!(result, CommandResult::Ignored);

        let result = executor
            .execute(Command::Edit(EditCommand::InsertTab { start: 0, end: 0 }))
            .unwrap();
        assert_eq!(result, CommandResult::Ignored);
    }

    #[test]
    fn test_insert_tab_returns_the_new_caret() {
        let mut executor = executor();
        executor
            .execute(Command::Tab(TabCommand::OpenFile { id: id("f3") }))
            .unwrap();
        executor
            .execute(Command::Edit(EditCommand::SetText {
                text: "abcdef".to_string(),
            }))
            .unwrap();

        let result = executor
            .execute(Command::Edit(EditCommand::InsertTab { start: 3, end: 3 }))
            .unwrap();
        assert_eq!(result, CommandResult::Offset(7));
        assert_eq!(executor.core().session.text(), "abc    def");
        assert_eq!(
            executor.core().tree.get(&id("f3")).unwrap().content.as_deref(),
            Some("abc    def")
        );
    }

    #[test]
    fn test_open_and_close_report_ignored_for_no_ops() {
        let mut executor = executor();
        let result = executor
            .execute(Command::Tab(TabCommand::OpenFile { id: id("src") }))
            .unwrap();
        assert_eq!(result, CommandResult::Ignored);

        let result = executor
            .execute(Command::Tab(TabCommand::CloseFile { id: id("f1") }))
            .unwrap();
        assert_eq!(result, CommandResult::Ignored);

        let result = executor
            .execute(Command::Tab(TabCommand::OpenFile { id: id("f1") }))
            .unwrap();
        assert_eq!(result, CommandResult::Success);
    }

    #[test]
    fn test_cursor_move_is_clamped_and_deduplicated() {
        let mut executor = executor();
        executor
            .execute(Command::Tab(TabCommand::OpenFile { id: id("f3") }))
            .unwrap();

        let result = executor
            .execute(Command::Cursor(CursorCommand::MoveTo { offset: 4 }))
            .unwrap();
        assert_eq!(result, CommandResult::Success);
        let result = executor
            .execute(Command::Cursor(CursorCommand::MoveTo { offset: 4 }))
            .unwrap();
        assert_eq!(result, CommandResult::Ignored);
    }

    #[test]
    fn test_execute_batch_and_history() {
        let mut executor = executor();
        let commands = vec![
            Command::Tab(TabCommand::OpenFile { id: id("f1") }),
            Command::Edit(EditCommand::SetText {
                text: "let a = 1".to_string(),
            }),
            Command::Cursor(CursorCommand::MoveTo { offset: 9 }),
        ];
        let results = executor.execute_batch(commands.clone()).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(executor.get_command_history(), commands.as_slice());
    }

    #[test]
    fn test_write_failure_surfaces_as_storage_error() {
        struct ReadOnlyStore(MemoryStore);

        impl BlobStore for ReadOnlyStore {
            fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
                self.0.read(key)
            }
            fn write(&mut self, _key: &str, _blob: &str) -> Result<(), StorageError> {
                Err(StorageError::Backend("read only".to_string()))
            }
        }

        let mut seeded = MemoryStore::new();
        storage::save_nodes(&mut seeded, FileTree::seeded().nodes()).unwrap();
        let mut executor = ShellExecutor::new(Box::new(ReadOnlyStore(seeded))).unwrap();

        let result = executor.execute(Command::Tree(TreeCommand::RenameNode {
            id: id("f1"),
            name: "x.js".to_string(),
        }));
        assert!(matches!(result, Err(CommandError::Storage(_))));
    }

    #[test]
    fn test_markup_and_gutter_follow_the_active_file() {
        let mut executor = executor();
        assert_eq!(executor.core().language(), Language::PlainText);

        executor
            .execute(Command::Tab(TabCommand::OpenFile { id: id("f1") }))
            .unwrap();
        assert_eq!(executor.core().language(), Language::JavaScript);

        executor
            .execute(Command::Edit(EditCommand::SetText {
                text: "// hi\nlet x = 1".to_string(),
            }))
            .unwrap();
        let markup = executor.core().render_markup();
        assert!(markup.contains("tok-com"));
        assert!(markup.contains("tok-kw"));
        assert_eq!(executor.core().gutter(), vec![1, 2]);
    }

    #[test]
    fn test_blob_tracks_every_edit() {
        let mut executor = executor();
        executor
            .execute(Command::Tab(TabCommand::OpenFile { id: id("f2") }))
            .unwrap();
        executor
            .execute(Command::Edit(EditCommand::SetText {
                text: "<p>hi</p>".to_string(),
            }))
            .unwrap();

        // 存储里的 blob 始终和内存树一致
        let blob = executor.core().store().read(STORE_KEY).unwrap().unwrap();
        let nodes: Vec<Node> = serde_json::from_str(&blob).unwrap();
        assert_eq!(nodes, executor.core().tree.nodes());
    }
}
