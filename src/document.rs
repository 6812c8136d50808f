//! Document buffer — ordered fragments with a stack discipline.
//!
//! Handlers append fragments as sections render; the final text is the
//! concatenation in write order. The last fragment can be inspected,
//! removed, and re-pushed, which lets callers generate content, look at
//! it, and replace it before committing. That stack behavior is part of
//! the contract, not an implementation detail.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::DocError;

/// Output flavor a document is built for. Man output folds tables of
/// contents into bullet lists; Html emits toctree directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    #[default]
    Man,
    Html,
}

/// The per-build output buffer.
#[derive(Debug)]
pub struct RstDocument {
    target: Target,
    fragments: Vec<String>,
    keep_data: bool,
    indent: usize,
    indent_width: usize,
    translation_map: HashMap<String, String>,
    hrefs: IndexMap<String, String>,
}

impl RstDocument {
    pub fn new(target: Target) -> Self {
        RstDocument {
            target,
            fragments: Vec::new(),
            keep_data: true,
            indent: 0,
            indent_width: 2,
            translation_map: HashMap::new(),
            hrefs: IndexMap::new(),
        }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Append a fragment, unless the buffer is in discard mode.
    pub fn write(&mut self, content: &str) {
        if self.keep_data {
            self.fragments.push(content.to_string());
        }
    }

    /// Append current indentation + content + newline.
    pub fn write_line(&mut self, content: &str) {
        let line = format!("{}{}\n", self.spaces(), content);
        self.write(&line);
    }

    /// Last fragment without removing it.
    pub fn peek(&self) -> Result<&str, DocError> {
        self.fragments
            .last()
            .map(String::as_str)
            .ok_or(DocError::EmptyBuffer)
    }

    /// Remove and return the last fragment.
    pub fn pop(&mut self) -> Result<String, DocError> {
        self.fragments.pop().ok_or(DocError::EmptyBuffer)
    }

    /// Append a fragment directly, bypassing indentation and the discard
    /// filter. Pairs with `pop` to reinsert inspected content.
    pub fn push(&mut self, content: impl Into<String>) {
        self.fragments.push(content.into());
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Whitespace for the current indentation level.
    pub fn spaces(&self) -> String {
        " ".repeat(self.indent * self.indent_width)
    }

    pub fn keep_data(&self) -> bool {
        self.keep_data
    }

    /// Toggle discard mode. While off, `write`/`write_line` drop their
    /// content silently; `push` still appends.
    pub fn set_keep_data(&mut self, keep: bool) {
        self.keep_data = keep;
    }

    /// Install the identifier → CLI-spelling map for this build.
    pub fn set_translation_map(&mut self, map: HashMap<String, String>) {
        self.translation_map = map;
    }

    /// Map a word through the translation map; unknown words pass through.
    pub fn translate<'a>(&'a self, word: &'a str) -> &'a str {
        self.translation_map
            .get(word)
            .map(String::as_str)
            .unwrap_or(word)
    }

    /// Record a hyperlink target definition, emitted at finalize.
    /// Re-adding a name overwrites its link, keeping the original position.
    pub fn add_href(&mut self, name: impl Into<String>, link: impl Into<String>) {
        self.hrefs.insert(name.into(), link.into());
    }

    /// Consume the buffer: append pending hyperlink-target definitions in
    /// insertion order, then concatenate every fragment into the final
    /// UTF-8 text.
    pub fn finalize(mut self) -> String {
        let hrefs = std::mem::take(&mut self.hrefs);
        if !hrefs.is_empty() {
            self.fragments.push("\n\n".to_string());
            for (name, link) in &hrefs {
                self.fragments.push(format!(".. _{}: {}\n", name, link));
            }
        }
        self.fragments.concat()
    }
}

impl Default for RstDocument {
    fn default() -> Self {
        RstDocument::new(Target::Man)
    }
}
