//! Editor session: open tabs, active file, live buffer.
//!
//! The session is the tab-strip state machine. It tracks which files are
//! open (insertion-ordered, no duplicates), which one is active, and keeps
//! the active file's content in a [`TextBuffer`] together with the cursor
//! offset. It never touches persistence; the shell facade decides when a
//! buffer change is written back to the tree and the blob store.
//!
//! Stale ids and folder ids degrade silently: operations that cannot apply
//! return `false` / `None` and leave the session exactly as it was.

use crate::buffer::TextBuffer;
use crate::tree::{FileTree, NodeId};

/// Tabbed editing surface over the file tree.
///
/// Either no file is open (`active_file` is `None`, the buffer is empty) or
/// one open file is active and mirrored in the buffer.
#[derive(Debug, Default)]
pub struct EditorSession {
    /// Open tabs in the order they were first opened.
    open_files: Vec<NodeId>,
    /// Currently active tab, always a member of `open_files`.
    active_file: Option<NodeId>,
    /// Live content of the active file.
    buffer: TextBuffer,
    /// Caret position as a character offset into the buffer.
    cursor_offset: usize,
}

impl EditorSession {
    /// Create a session with no open files.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open tabs in display order.
    pub fn open_files(&self) -> &[NodeId] {
        &self.open_files
    }

    /// The active file, if any.
    pub fn active_file(&self) -> Option<&NodeId> {
        self.active_file.as_ref()
    }

    /// Whether `id` has an open tab.
    pub fn is_open(&self, id: &NodeId) -> bool {
        self.open_files.contains(id)
    }

    /// The live buffer of the active file.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Current buffer content.
    pub fn text(&self) -> String {
        self.buffer.get_text()
    }

    /// Caret position as a character offset.
    pub fn cursor_offset(&self) -> usize {
        self.cursor_offset
    }

    /// Caret position as 1-based line and column.
    pub fn cursor(&self) -> (usize, usize) {
        self.buffer.cursor_position(self.cursor_offset)
    }

    /// Open `id` in a tab (if not already open) and activate it, loading its
    /// content into the buffer.
    ///
    /// Stale ids and folders are ignored. Returns whether the session
    /// changed; re-activating the already active file does not count.
    pub fn open(&mut self, tree: &FileTree, id: &NodeId) -> bool {
        let Some(node) = tree.get(id) else {
            return false;
        };
        if !node.is_file() {
            return false;
        }
        if self.active_file.as_ref() == Some(id) {
            return false;
        }

        if !self.open_files.contains(id) {
            self.open_files.push(id.clone());
        }
        self.active_file = Some(id.clone());
        self.buffer.set_text(node.content.as_deref().unwrap_or(""));
        self.cursor_offset = 0;
        true
    }

    /// Close the tab for `id`.
    ///
    /// Closing the active tab activates the last remaining tab (loading its
    /// content from `tree`), or empties the editor when it was the only one.
    /// Returns whether the session changed.
    pub fn close(&mut self, tree: &FileTree, id: &NodeId) -> bool {
        if !self.open_files.contains(id) {
            return false;
        }

        self.open_files.retain(|open| open != id);
        if self.active_file.as_ref() == Some(id) {
            self.activate_fallback(tree);
        }
        true
    }

    /// Drop every tab whose id is in `removed` (after a cascading delete).
    ///
    /// Falls back like [`close`](Self::close) when the active tab goes away.
    pub fn drop_tabs(&mut self, tree: &FileTree, removed: &[NodeId]) -> bool {
        let before = self.open_files.len();
        self.open_files.retain(|open| !removed.contains(open));
        if self.open_files.len() == before {
            return false;
        }

        if let Some(active) = &self.active_file {
            if removed.contains(active) {
                self.activate_fallback(tree);
            }
        }
        true
    }

    /// Replace the active buffer's content. The caret is clamped into the
    /// new text. No-op without an active file.
    pub fn set_text(&mut self, text: &str) -> bool {
        if self.active_file.is_none() {
            return false;
        }
        self.buffer.set_text(text);
        self.cursor_offset = self.cursor_offset.min(self.buffer.char_count());
        true
    }

    /// Replace the `start..end` selection with a four-space indent and move
    /// the caret after it. `None` without an active file.
    pub fn insert_tab(&mut self, start: usize, end: usize) -> Option<usize> {
        self.active_file.as_ref()?;
        let caret = self.buffer.insert_tab(start, end);
        self.cursor_offset = caret;
        Some(caret)
    }

    /// Move the caret to a character offset (clamped). Returns whether it
    /// actually moved.
    pub fn set_cursor(&mut self, offset: usize) -> bool {
        let offset = offset.min(self.buffer.char_count());
        if offset == self.cursor_offset {
            return false;
        }
        self.cursor_offset = offset;
        true
    }

    // Activate the last remaining tab, or clear the editor.
    fn activate_fallback(&mut self, tree: &FileTree) {
        match self.open_files.last().cloned() {
            Some(next) => {
                let content = tree
                    .get(&next)
                    .and_then(|node| node.content.as_deref())
                    .unwrap_or("");
                self.buffer.set_text(content);
                self.active_file = Some(next);
            }
            None => {
                self.buffer.set_text("");
                self.active_file = None;
            }
        }
        self.cursor_offset = 0;
    }
}
