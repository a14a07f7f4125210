#![warn(missing_docs)]
//! Editor Shell - Headless Kernel for a Browser Code Editor Shell
//!
//! # Overview
//!
//! `editor-shell` is the headless kernel of a browser-based code editor
//! shell: a virtual, blob-persisted file tree plus a tabbed editing surface
//! whose rendering data (escaped highlight markup, line-number gutter,
//! cursor read-out) is derived on every change. It does not render anything
//! itself; the upper layer is assumed to be a thin view (a text input with a
//! markup overlay) that feeds commands in and snapshots out.
//!
//! # Core Features
//!
//! - **Virtual File Tree**: Flat parent-linked node arena with cascading
//!   delete and fold state
//! - **Blob Persistence**: Whole-tree JSON write-through to a pluggable
//!   key/value store
//! - **Tabbed Session**: Open files, active file, rope-backed live buffer
//! - **Render Pipeline**: Escaped, span-annotated markup plus gutter
//!   derivation per keystroke
//! - **State Tracking**: Version number mechanism and Change Notifications
//!   system
//!
//! # Architecture Layers
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Command Interface & State Management        │  ← Public API
//! ├──────────────────────────────────────────────┤
//! │  Editor Session (Tabs + Buffer + Cursor)     │  ← Editing Surface
//! ├──────────────────────────────────────────────┤
//! │  Highlight & Gutter (editor-shell-highlight) │  ← Rendering Data
//! ├──────────────────────────────────────────────┤
//! │  File Tree (Flat Parent-Linked Arena)        │  ← Virtual Filesystem
//! ├──────────────────────────────────────────────┤
//! │  Blob Storage (JSON Node List)               │  ← Persistence
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ## Using Command Interface
//!
//! ```rust
//! use editor_shell::{Command, EditCommand, MemoryStore, NodeId, ShellExecutor, TabCommand};
//!
//! let mut executor = ShellExecutor::new(Box::new(MemoryStore::new())).unwrap();
//!
//! // Open the seeded JavaScript file and replace its content
//! executor.execute(Command::Tab(TabCommand::OpenFile {
//!     id: NodeId::from("f1"),
//! })).unwrap();
//! executor.execute(Command::Edit(EditCommand::SetText {
//!     text: "console.log('hi')".to_string(),
//! })).unwrap();
//!
//! assert_eq!(executor.core().session.text(), "console.log('hi')");
//! ```
//!
//! ## Using State Management
//!
//! ```rust
//! use editor_shell::{MemoryStore, ShellStateManager};
//!
//! let mut manager = ShellStateManager::new(Box::new(MemoryStore::new())).unwrap();
//!
//! // Subscribe to state changes
//! manager.subscribe(|change| {
//!     println!("State changed: {:?}", change.change_type);
//! });
//!
//! // Query state
//! let tree_state = manager.get_tree_state();
//! println!("Visible rows: {}", tree_state.rows.len());
//! ```
//!
//! # Module Description
//!
//! - [`tree`] - Flat parent-linked file tree
//! - [`storage`] - JSON blob persistence behind the [`BlobStore`] trait
//! - [`buffer`] - Rope based live edit buffer
//! - [`session`] - Tab strip and active-file state machine
//! - [`commands`] - Unified command interface
//! - [`state`] - State management and query interface
//!
//! # Companion Crates
//!
//! - `editor-shell-lang` provides language detection and icon metadata
//! - `editor-shell-highlight` provides the regex highlight passes and the
//!   gutter derivation

pub mod buffer;
pub mod commands;
pub mod session;
pub mod state;
pub mod storage;
pub mod tree;

pub use buffer::TextBuffer;
pub use commands::{
    Command, CommandError, CommandResult, CursorCommand, EditCommand, ShellCore, ShellExecutor,
    TabCommand, TreeCommand,
};
pub use editor_shell_lang::Language;
pub use session::EditorSession;
pub use state::{
    CursorState, EditorViewState, ShellState, ShellStateManager, StateChange, StateChangeCallback,
    StateChangeType, StatusState, Tab, TabsState, TreeRow, TreeViewState,
};
pub use storage::{BlobStore, MemoryStore, STORE_KEY, StorageError};
pub use tree::{FileTree, Node, NodeId, NodeKind, TreeError};
