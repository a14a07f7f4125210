#![warn(missing_docs)]
//! `editor-shell-lang` - file-name driven language metadata for `editor-shell`.
//!
//! This crate intentionally stays lightweight and does **not** depend on any
//! parsing/highlighting systems. It maps file names to a language tag plus the
//! small bits of display metadata (status-bar labels, icon classes) that hosts
//! render next to a node, so the tree view, tab strip and highlighter all agree
//! on what a given file is.

/// Language tag assigned to a file, derived from its name alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// `.js` sources.
    JavaScript,
    /// `.html` documents.
    Html,
    /// `.css` stylesheets.
    Css,
    /// `.py` sources.
    Python,
    /// `.json` data files.
    Json,
    /// Everything else.
    PlainText,
}

impl Language {
    /// Detect the language of a file from its name.
    ///
    /// Matching is plain dotted-suffix testing in a fixed order; compound
    /// names like `app.test.js` resolve by their final suffix and anything
    /// unknown falls through to [`Language::PlainText`].
    pub fn detect(file_name: &str) -> Self {
        if file_name.ends_with(".js") {
            Language::JavaScript
        } else if file_name.ends_with(".html") {
            Language::Html
        } else if file_name.ends_with(".css") {
            Language::Css
        } else if file_name.ends_with(".py") {
            Language::Python
        } else if file_name.ends_with(".json") {
            Language::Json
        } else {
            Language::PlainText
        }
    }

    /// Human-readable label shown in the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::Html => "HTML",
            Language::Css => "CSS",
            Language::Python => "Python",
            Language::Json => "JSON",
            Language::PlainText => "Plain Text",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::PlainText
    }
}

/// Icon class for a file node, keyed off the same suffix table as
/// [`Language::detect`].
///
/// The strings are Font Awesome class lists; hosts that render differently can
/// treat them as opaque keys.
pub fn file_icon_class(file_name: &str) -> &'static str {
    if file_name.ends_with(".js") {
        "fab fa-js icon-js"
    } else if file_name.ends_with(".html") {
        "fab fa-html5 icon-html"
    } else if file_name.ends_with(".css") {
        "fab fa-css3-alt icon-css"
    } else if file_name.ends_with(".py") {
        "fab fa-python icon-py"
    } else if file_name.ends_with(".json") {
        "fas fa-code icon-default"
    } else {
        "fas fa-file icon-default"
    }
}

/// Icon class for a folder node, expanded or collapsed.
pub fn folder_icon_class(is_open: bool) -> &'static str {
    if is_open {
        "fas fa-folder-open icon-folder"
    } else {
        "fas fa-folder icon-folder"
    }
}
