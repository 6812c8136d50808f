//! ReST markup primitives over the document buffer.
//!
//! Headings, literal blocks, bullet lists, inline marks, tables of
//! contents. Indentation state lives on the buffer (`write_line` needs
//! it); the style keeps only rendering state of its own, currently the
//! paragraph flag toggled off inside list items.

use crate::document::{RstDocument, Target};

/// Stateful ReST renderer for one build.
#[derive(Debug)]
pub struct RstStyle {
    do_p: bool,
}

impl RstStyle {
    pub fn new() -> Self {
        RstStyle { do_p: true }
    }

    /// Paragraph break plus current indentation. Suppressed inside list
    /// items.
    pub fn new_paragraph(&self, doc: &mut RstDocument) {
        if self.do_p {
            doc.write(&format!("\n\n{}", doc.spaces()));
        }
    }

    /// Line break plus current indentation.
    pub fn new_line(&self, doc: &mut RstDocument) {
        doc.write(&format!("\n{}", doc.spaces()));
    }

    fn heading(&self, doc: &mut RstDocument, text: &str, underline: char) {
        self.new_paragraph(doc);
        doc.write(text);
        doc.write(&format!(
            "\n{}",
            underline.to_string().repeat(text.chars().count())
        ));
        self.new_paragraph(doc);
    }

    pub fn h1(&self, doc: &mut RstDocument, text: &str) {
        self.heading(doc, text, '=');
    }

    pub fn h2(&self, doc: &mut RstDocument, text: &str) {
        self.heading(doc, text, '-');
    }

    pub fn h3(&self, doc: &mut RstDocument, text: &str) {
        self.heading(doc, text, '~');
    }

    /// Open a `::` literal block; content goes in via `write_line` until
    /// `end_codeblock`.
    pub fn start_codeblock(&self, doc: &mut RstDocument) {
        self.new_paragraph(doc);
        doc.write("::");
        doc.indent();
        self.new_paragraph(doc);
    }

    pub fn end_codeblock(&self, doc: &mut RstDocument) {
        doc.dedent();
        self.new_paragraph(doc);
    }

    /// One-shot literal block.
    pub fn codeblock(&self, doc: &mut RstDocument, code: &str) {
        self.start_codeblock(doc);
        doc.write_line(code);
        self.end_codeblock(doc);
    }

    pub fn start_ul(&mut self, doc: &mut RstDocument) {
        self.new_paragraph(doc);
    }

    pub fn end_ul(&mut self, doc: &mut RstDocument) {
        self.new_paragraph(doc);
    }

    /// Open a bullet item. Paragraph breaks are suppressed until the item
    /// closes so nested prose stays on the bullet.
    pub fn start_li(&mut self, doc: &mut RstDocument) {
        self.do_p = false;
        self.new_line(doc);
        doc.write("* ");
    }

    pub fn end_li(&mut self) {
        self.do_p = true;
    }

    /// One-shot bullet item.
    pub fn li(&mut self, doc: &mut RstDocument, item: &str) {
        self.start_li(doc);
        doc.write(item);
        self.end_li();
    }

    pub fn start_b(&self, doc: &mut RstDocument) {
        doc.write("**");
    }

    pub fn end_b(&self, doc: &mut RstDocument) {
        doc.write("** ");
    }

    pub fn start_i(&self, doc: &mut RstDocument) {
        doc.write("*");
    }

    pub fn end_i(&self, doc: &mut RstDocument) {
        doc.write("* ");
    }

    pub fn start_code(&self, doc: &mut RstDocument) {
        doc.write("``");
    }

    pub fn end_code(&self, doc: &mut RstDocument) {
        doc.write("`` ");
    }

    pub fn bold(&self, doc: &mut RstDocument, text: &str) {
        if !text.is_empty() {
            self.start_b(doc);
            doc.write(text);
            self.end_b(doc);
        }
    }

    pub fn italic(&self, doc: &mut RstDocument, text: &str) {
        if !text.is_empty() {
            self.start_i(doc);
            doc.write(text);
            self.end_i(doc);
        }
    }

    pub fn code(&self, doc: &mut RstDocument, text: &str) {
        if !text.is_empty() {
            self.start_code(doc);
            doc.write(text);
            self.end_code(doc);
        }
    }

    /// Cross-reference to another page.
    pub fn ref_link(&self, doc: &mut RstDocument, title: &str, link: &str) {
        doc.write(&format!(":ref:`{} <{}>`", title, link));
    }

    /// Explicit hyperlink target, `.. _name: link`.
    pub fn link_target_definition(&self, doc: &mut RstDocument, refname: &str, link: &str) {
        doc.write_line(&format!(".. _{}: {}", refname, link));
    }

    /// Open a table of contents. Html targets get a toctree directive;
    /// man targets fall back to a bullet list.
    pub fn toctree(&self, doc: &mut RstDocument) {
        match doc.target() {
            Target::Html => {
                self.new_paragraph(doc);
                doc.write(".. toctree::");
                doc.indent();
                self.new_line(doc);
                doc.write(":maxdepth: 1");
                self.new_line(doc);
                doc.write(":titlesonly:");
                doc.dedent();
                self.new_paragraph(doc);
            }
            Target::Man => self.new_paragraph(doc),
        }
    }

    /// One table-of-contents entry. `file_name` overrides the page path
    /// for Html targets.
    pub fn tocitem(&mut self, doc: &mut RstDocument, item: &str, file_name: Option<&str>) {
        match doc.target() {
            Target::Html => {
                doc.write(&format!("  {}\n", file_name.unwrap_or(item)));
            }
            Target::Man => self.li(doc, item),
        }
    }
}

impl Default for RstStyle {
    fn default() -> Self {
        RstStyle::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn h2_underlines_with_dashes() {
        let mut doc = RstDocument::default();
        let style = RstStyle::new();
        style.h2(&mut doc, "Options");
        assert_eq!(doc.finalize(), "\n\nOptions\n-------\n\n");
    }

    #[test]
    fn heading_underline_matches_char_count() {
        let mut doc = RstDocument::default();
        let style = RstStyle::new();
        style.h1(&mut doc, "ab");
        assert!(doc.finalize().contains("ab\n=="));
    }

    #[test]
    fn codeblock_is_indented_literal_block() {
        let mut doc = RstDocument::default();
        let style = RstStyle::new();
        style.codeblock(&mut doc, "run --all");
        assert_eq!(doc.finalize(), "\n\n::\n\n    run --all\n\n\n");
    }

    #[test]
    fn list_items_are_bullets() {
        let mut doc = RstDocument::default();
        let mut style = RstStyle::new();
        style.start_ul(&mut doc);
        style.li(&mut doc, "one");
        style.li(&mut doc, "two");
        style.end_ul(&mut doc);
        assert_eq!(doc.finalize(), "\n\n\n* one\n* two\n\n");
    }

    #[test]
    fn paragraphs_suppressed_inside_list_item() {
        let mut doc = RstDocument::default();
        let mut style = RstStyle::new();
        style.start_li(&mut doc);
        style.new_paragraph(&mut doc);
        doc.write("text");
        style.end_li();
        assert_eq!(doc.finalize(), "\n* text");
    }

    #[test]
    fn toctree_man_renders_bullets() {
        let mut doc = RstDocument::new(Target::Man);
        let mut style = RstStyle::new();
        style.toctree(&mut doc);
        style.tocitem(&mut doc, "storage", Some("storage/index"));
        assert_eq!(doc.finalize(), "\n\n\n* storage");
    }

    #[test]
    fn toctree_html_uses_directive_and_paths() {
        let mut doc = RstDocument::new(Target::Html);
        let mut style = RstStyle::new();
        style.toctree(&mut doc);
        style.tocitem(&mut doc, "storage", Some("storage/index"));
        let text = doc.finalize();
        assert!(text.contains(".. toctree::"));
        assert!(text.contains(":titlesonly:"));
        assert!(text.contains("  storage/index\n"));
    }

    #[test]
    fn link_target_definition_format() {
        let mut doc = RstDocument::default();
        let style = RstStyle::new();
        style.link_target_definition(&mut doc, "docs", "https://example.com");
        assert_eq!(doc.finalize(), ".. _docs: https://example.com\n");
    }
}
