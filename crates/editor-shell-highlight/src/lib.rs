//! `editor-shell-highlight` - regex-based markup highlighting for `editor-shell`.
//!
//! Produces the escaped, span-annotated HTML that hosts layer over a plain text
//! input, plus the line-number gutter that sits beside it. It is a fixed chain
//! of whole-text substitution passes, *not* a parser: pass order is part of the
//! rendered-output contract and later passes rescan what earlier passes
//! injected.

use editor_shell_lang::Language;
use regex::{Captures, Regex};

/// One substitution pass: a pattern rewritten over the whole markup.
#[derive(Debug, Clone)]
struct Pass {
    regex: Regex,
    rewrite: &'static str,
}

impl Pass {
    fn new(pattern: &str, rewrite: &'static str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            rewrite,
        })
    }

    fn apply(&self, markup: &str) -> String {
        self.regex.replace_all(markup, self.rewrite).into_owned()
    }
}

/// Markup renderer for the editor overlay.
///
/// Rendering always escapes `&`, `<`, `>` first, so the spans injected by the
/// passes are the only live markup in the output. The passes themselves run in
/// a fixed order per language over the output of the previous pass; overlaps
/// with already-injected spans are accepted rather than prevented, and hosts
/// that restyle the output must keep the order intact to reproduce it.
#[derive(Debug, Clone)]
pub struct Highlighter {
    javascript: Vec<Pass>,
    css: Vec<Pass>,
    html_tag: Regex,
    html_attr: Regex,
}

impl Highlighter {
    /// Compile the pass tables for every supported language.
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            javascript: vec![
                // Double-quoted, then single-quoted string literals.
                Pass::new(r#""(.*?)""#, r#"<span class="tok-str">"$1"</span>"#)?,
                Pass::new(r"'(.*?)'", r#"<span class='tok-str'>'$1'</span>"#)?,
                // Line comments (rest of line).
                Pass::new(r"(//.*)", r#"<span class="tok-com">$1</span>"#)?,
                Pass::new(
                    r"\b(class|constructor|this|new|return|if|else|for|while|function|var|let|const|import|from|async|await)\b",
                    r#"<span class="tok-kw">$1</span>"#,
                )?,
                // Call sites. The engine has no lookahead, so the `(` is
                // consumed and restored by the rewrite.
                Pass::new(r"\b([a-zA-Z0-9_]+)\(", r#"<span class="tok-fn">$1</span>("#)?,
                Pass::new(r"\b(\d+)\b", r#"<span class="tok-num">$1</span>"#)?,
            ],
            css: vec![
                // Property names (colon consumed and restored, as above).
                Pass::new(r"(?i)([a-z-]+):", r#"<span class="tok-kw">$1</span>:"#)?,
                // Declaration values, colon through to the semicolon.
                Pass::new(r"(:)([^;]+)", r#"$1<span class="tok-str">$2</span>"#)?,
                Pass::new(r"(/\*.*?\*/)", r#"<span class="tok-com">$1</span>"#)?,
            ],
            // Tags operate on escaped text, hence the entity brackets.
            html_tag: Regex::new(r"(?i)(&lt;/?[a-z0-9]+)(.*?)(&gt;)")?,
            html_attr: Regex::new(r"(?i)([a-z-]+)(=)")?,
        })
    }

    /// Render `raw` as overlay markup for `language`.
    ///
    /// JSON and plain text get escaping only. If `raw` ends with a newline a
    /// single space is appended so the overlay's scroll height matches the
    /// input surface's.
    pub fn render(&self, language: Language, raw: &str) -> String {
        let escaped = escape(raw);
        let mut markup = match language {
            Language::JavaScript => run_passes(&self.javascript, escaped),
            Language::Html => self.render_html(&escaped),
            Language::Css => run_passes(&self.css, escaped),
            Language::Python | Language::Json | Language::PlainText => escaped,
        };
        if raw.ends_with('\n') {
            markup.push(' ');
        }
        markup
    }

    fn render_html(&self, escaped: &str) -> String {
        self.html_tag
            .replace_all(escaped, |caps: &Captures<'_>| {
                let attrs = self
                    .html_attr
                    .replace_all(&caps[2], r#"<span class="tok-attr">$1</span>$2"#);
                format!(
                    r#"<span class="tok-tag">{}</span>{}<span class="tok-tag">{}</span>"#,
                    &caps[1], attrs, &caps[3]
                )
            })
            .into_owned()
    }
}

fn run_passes(passes: &[Pass], escaped: String) -> String {
    let mut markup = escaped;
    for pass in passes {
        markup = pass.apply(&markup);
    }
    markup
}

/// Escape `&`, `<` and `>` as HTML entities, ampersands first.
pub fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Line numbers for the gutter: one entry per newline-delimited line of the
/// raw text, starting at 1. Empty text still has one line.
pub fn line_numbers(raw: &str) -> Vec<usize> {
    (1..=raw.split('\n').count()).collect()
}
