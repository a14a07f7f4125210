//! Shell State Interface
//!
//! Provides a complete state query interface for the shell, used for frontend
//! rendering and state synchronization.
//!
//! # Overview
//!
//! The state interface layer exposes the shell's internal state to the
//! frontend in a structured, immutable manner. It supports:
//!
//! - **State Queries**: Retrieve tree view, tab strip, editor pane and status
//!   bar snapshots
//! - **Version Tracking**: Track state changes through version numbers
//! - **Change Notifications**: Subscribe to state change events
//!
//! # Example
//!
//! ```rust
//! use editor_shell::{Command, MemoryStore, NodeId, ShellStateManager, TabCommand};
//!
//! let mut manager = ShellStateManager::new(Box::new(MemoryStore::new())).unwrap();
//!
//! // Query the tree view
//! let tree_state = manager.get_tree_state();
//! println!("Visible rows: {}", tree_state.rows.len());
//!
//! // Subscribe to state changes
//! manager.subscribe(|change| {
//!     println!("State changed: {:?}", change.change_type);
//! });
//!
//! // Open a file; subscribers hear about it
//! manager.execute(Command::Tab(TabCommand::OpenFile {
//!     id: NodeId::from("f1"),
//! })).unwrap();
//! ```

use crate::commands::{
    Command, CommandError, CommandResult, ShellCore, ShellExecutor, TabCommand, TreeCommand,
};
use crate::storage::{BlobStore, StorageError};
use crate::tree::{NodeId, NodeKind};
use editor_shell_lang::{Language, file_icon_class};

/// One visible row of the tree view.
#[derive(Debug, Clone)]
pub struct TreeRow {
    /// Node this row renders.
    pub id: NodeId,
    /// Indentation depth; the root's children sit at depth 0.
    pub depth: usize,
    /// Display name.
    pub name: String,
    /// File or folder.
    pub kind: NodeKind,
    /// Whether a folder row is currently expanded.
    pub is_expanded: bool,
    /// Icon class to render in front of the name.
    pub icon_class: &'static str,
}

/// Tree view state
#[derive(Debug, Clone)]
pub struct TreeViewState {
    /// Visible rows in display order (expanded folders only).
    pub rows: Vec<TreeRow>,
}

/// One tab of the tab strip.
#[derive(Debug, Clone)]
pub struct Tab {
    /// File this tab shows.
    pub id: NodeId,
    /// Display name.
    pub name: String,
    /// Icon class to render in front of the name.
    pub icon_class: &'static str,
    /// Whether this is the active tab.
    pub is_active: bool,
}

/// Tab strip state
#[derive(Debug, Clone)]
pub struct TabsState {
    /// Open tabs in display order. Tabs whose node no longer exists are
    /// skipped.
    pub tabs: Vec<Tab>,
    /// The active file, if any.
    pub active_file: Option<NodeId>,
}

/// Cursor state
#[derive(Debug, Clone)]
pub struct CursorState {
    /// Caret position as a character offset.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number.
    pub column: usize,
}

/// Editor pane state for the active file.
///
/// Absent entirely when no file is open (the pane shows its welcome screen
/// instead).
#[derive(Debug, Clone)]
pub struct EditorViewState {
    /// Active file id.
    pub file_id: NodeId,
    /// Active file name.
    pub file_name: String,
    /// Detected language of the active file.
    pub language: Language,
    /// Raw buffer content (what the text input holds).
    pub text: String,
    /// Escaped, span-annotated markup (what the overlay renders).
    pub markup: String,
    /// Gutter line numbers, one per line of `text`.
    pub gutter: Vec<usize>,
    /// Ancestor folder names plus the file name, root excluded.
    pub breadcrumbs: Vec<String>,
    /// Caret state.
    pub cursor: CursorState,
}

/// Status bar state
#[derive(Debug, Clone)]
pub struct StatusState {
    /// Language shown on the right ([`Language::PlainText`] when no file is
    /// open).
    pub language: Language,
    /// 1-based caret line.
    pub line: usize,
    /// 1-based caret column.
    pub column: usize,
}

/// Complete shell state snapshot
#[derive(Debug, Clone)]
pub struct ShellState {
    /// Tree view state
    pub tree_view: TreeViewState,
    /// Tab strip state
    pub tabs: TabsState,
    /// Editor pane state, `None` when no file is open
    pub editor: Option<EditorViewState>,
    /// Status bar state
    pub status: StatusState,
    /// State version this snapshot was taken at
    pub version: u64,
}

/// State change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChangeType {
    /// Tree structure modified (create, rename, delete, fold)
    TreeModified,
    /// Active document content modified
    DocumentModified,
    /// Tabs opened, closed or re-activated
    TabsChanged,
    /// Cursor moved
    CursorMoved,
}

/// State change record
#[derive(Debug, Clone)]
pub struct StateChange {
    /// Change type
    pub change_type: StateChangeType,
    /// Old version number
    pub old_version: u64,
    /// New version number
    pub new_version: u64,
    /// Node the change centers on, when one can be named
    pub affected_node: Option<NodeId>,
}

impl StateChange {
    /// Create a new state change record without an affected node.
    pub fn new(change_type: StateChangeType, old_version: u64, new_version: u64) -> Self {
        Self {
            change_type,
            old_version,
            new_version,
            affected_node: None,
        }
    }

    /// Attach the affected node to this change record.
    pub fn with_node(mut self, id: NodeId) -> Self {
        self.affected_node = Some(id);
        self
    }
}

/// State change callback function type
pub type StateChangeCallback = Box<dyn FnMut(&StateChange) + Send>;

/// Shell state manager
///
/// `ShellStateManager` wraps the command executor ([`ShellExecutor`]) and its
/// [`ShellCore`] and provides the following features:
///
/// - **State Queries**: Retrieve the per-surface snapshots (tree view, tabs,
///   editor pane, status bar)
/// - **Version Tracking**: Increment the version number after each effective
///   change, supporting incremental updates
/// - **Change Notifications**: Notify subscribers of state changes via
///   callback mechanism
pub struct ShellStateManager {
    /// Command executor (wraps ShellCore and maintains consistency)
    executor: ShellExecutor,
    /// State version number
    state_version: u64,
    /// State change callback list
    callbacks: Vec<StateChangeCallback>,
}

impl ShellStateManager {
    /// Create a state manager over a fresh core backed by `store`.
    pub fn new(store: Box<dyn BlobStore>) -> Result<Self, StorageError> {
        Ok(Self::from_executor(ShellExecutor::new(store)?))
    }

    /// Create a state manager over an existing executor.
    pub fn from_executor(executor: ShellExecutor) -> Self {
        Self {
            executor,
            state_version: 0,
            callbacks: Vec::new(),
        }
    }

    /// Get a reference to the Shell Core
    pub fn core(&self) -> &ShellCore {
        self.executor.core()
    }

    /// Get a mutable reference to the Shell Core
    pub fn core_mut(&mut self) -> &mut ShellCore {
        self.executor.core_mut()
    }

    /// Execute a command and automatically trigger state change
    /// notifications.
    ///
    /// Commands answered with [`CommandResult::Ignored`] changed nothing and
    /// do not bump the version; everything else increments it and notifies
    /// subscribers.
    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CommandError> {
        let change_type = Self::change_type_for_command(&command);
        let affected = Self::affected_node(&command);

        let result = self.executor.execute(command)?;

        if !matches!(result, CommandResult::Ignored) {
            let affected = match &result {
                CommandResult::Created(id) => Some(id.clone()),
                CommandResult::Removed(ids) => ids.first().cloned(),
                _ => affected,
            };
            self.mark_modified_internal(change_type, affected);
        }

        Ok(result)
    }

    fn change_type_for_command(command: &Command) -> StateChangeType {
        match command {
            Command::Tree(_) => StateChangeType::TreeModified,
            Command::Tab(_) => StateChangeType::TabsChanged,
            Command::Edit(_) => StateChangeType::DocumentModified,
            Command::Cursor(_) => StateChangeType::CursorMoved,
        }
    }

    fn affected_node(command: &Command) -> Option<NodeId> {
        match command {
            Command::Tree(
                TreeCommand::RenameNode { id, .. }
                | TreeCommand::DeleteNode { id }
                | TreeCommand::ToggleFolder { id },
            )
            | Command::Tab(TabCommand::OpenFile { id } | TabCommand::CloseFile { id }) => {
                Some(id.clone())
            }
            _ => None,
        }
    }

    /// Get current version number
    pub fn version(&self) -> u64 {
        self.state_version
    }

    /// Check if state has changed since a version
    pub fn has_changed_since(&self, version: u64) -> bool {
        self.state_version > version
    }

    /// Subscribe to state change notifications
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: FnMut(&StateChange) + Send + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    /// Bump the version and notify subscribers of an out-of-band change
    /// (e.g. the host mutated the core directly).
    pub fn mark_modified(&mut self, change_type: StateChangeType) {
        self.mark_modified_internal(change_type, None);
    }

    fn mark_modified_internal(&mut self, change_type: StateChangeType, node: Option<NodeId>) {
        let old_version = self.state_version;
        self.state_version += 1;

        let mut change = StateChange::new(change_type, old_version, self.state_version);
        if let Some(node) = node {
            change = change.with_node(node);
        }
        self.notify_callbacks(&change);
    }

    /// Get complete shell state snapshot
    pub fn get_full_state(&self) -> ShellState {
        ShellState {
            tree_view: self.get_tree_state(),
            tabs: self.get_tabs_state(),
            editor: self.get_editor_state(),
            status: self.get_status_state(),
            version: self.state_version,
        }
    }

    /// Get tree view state
    pub fn get_tree_state(&self) -> TreeViewState {
        let core = self.executor.core();
        TreeViewState {
            rows: core
                .tree
                .visible_rows()
                .into_iter()
                .map(|(depth, node)| TreeRow {
                    id: node.id.clone(),
                    depth,
                    name: node.name.clone(),
                    kind: node.kind,
                    is_expanded: node.is_expanded(),
                    icon_class: node.icon_class(),
                })
                .collect(),
        }
    }

    /// Get tab strip state
    pub fn get_tabs_state(&self) -> TabsState {
        let core = self.executor.core();
        let tabs = core
            .session
            .open_files()
            .iter()
            .filter_map(|id| core.tree.get(id))
            .map(|node| Tab {
                id: node.id.clone(),
                name: node.name.clone(),
                icon_class: file_icon_class(&node.name),
                is_active: Some(&node.id) == core.session.active_file(),
            })
            .collect();

        TabsState {
            tabs,
            active_file: core.session.active_file().cloned(),
        }
    }

    /// Get editor pane state, `None` when no file is open
    pub fn get_editor_state(&self) -> Option<EditorViewState> {
        let core = self.executor.core();
        let id = core.session.active_file()?.clone();
        let node = core.tree.get(&id)?;

        let (line, column) = core.session.cursor();
        let breadcrumbs = core
            .tree
            .path_of(&id)
            .into_iter()
            .filter(|ancestor| !ancestor.is_root())
            .map(|ancestor| ancestor.name.clone())
            .collect();

        Some(EditorViewState {
            file_id: id,
            file_name: node.name.clone(),
            language: node.language(),
            text: core.session.text(),
            markup: core.render_markup(),
            gutter: core.gutter(),
            breadcrumbs,
            cursor: CursorState {
                offset: core.session.cursor_offset(),
                line,
                column,
            },
        })
    }

    /// Get status bar state
    pub fn get_status_state(&self) -> StatusState {
        let core = self.executor.core();
        let (line, column) = core.session.cursor();
        StatusState {
            language: core.language(),
            line,
            column,
        }
    }

    /// Notify all callbacks
    fn notify_callbacks(&mut self, change: &StateChange) {
        for callback in &mut self.callbacks {
            callback(change);
        }
    }
}
