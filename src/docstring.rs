//! HTML-flavored docstring conversion.
//!
//! Service metadata carries its prose as loose HTML. This module streams
//! that prose into the document buffer as ReST: tags map to style calls,
//! entities are decoded, unknown tags are skipped. Conversion is
//! best-effort; a docstring that cannot be parsed degrades to whatever
//! was written before the failure and never aborts the build.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::document::RstDocument;
use crate::error::DocError;
use crate::style::RstStyle;

static RE_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"href\s*=\s*"([^"]*)""#).unwrap());

static RE_ENTITY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&(#?\w+);").unwrap());

/// Feed HTML-flavored prose into the document. Parse failures are logged
/// and swallowed; the buffer stays writable either way.
pub fn include_docstring(doc: &mut RstDocument, style: &mut RstStyle, text: &str) {
    if text.is_empty() {
        return;
    }
    let mut parser = Parser {
        doc,
        style,
        in_code: false,
        href: None,
    };
    if let Err(err) = parser.feed(text) {
        debug!(error = %err, "skipping malformed docstring");
        debug!("{}", text);
    }
}

struct Parser<'a> {
    doc: &'a mut RstDocument,
    style: &'a mut RstStyle,
    in_code: bool,
    /// Target of the currently open anchor, if it carried one.
    href: Option<String>,
}

impl Parser<'_> {
    fn feed(&mut self, text: &str) -> Result<(), DocError> {
        let mut rest = text;
        while let Some(lt) = rest.find('<') {
            let (data, tail) = rest.split_at(lt);
            self.data(data);
            if tail.starts_with("<!--") {
                let end = tail
                    .find("-->")
                    .ok_or_else(|| DocError::DocStringParse("unterminated comment".to_string()))?;
                rest = &tail[end + 3..];
                continue;
            }
            let gt = tail
                .find('>')
                .ok_or_else(|| DocError::DocStringParse("unterminated tag".to_string()))?;
            self.tag(&tail[1..gt]);
            rest = &tail[gt + 1..];
        }
        self.data(rest);
        Ok(())
    }

    fn tag(&mut self, raw: &str) {
        let raw = raw.trim().trim_end_matches('/').trim_end();
        if let Some(name) = raw.strip_prefix('/') {
            self.end_tag(&name.trim().to_ascii_lowercase());
        } else {
            let name = raw
                .split_whitespace()
                .next()
                .unwrap_or("")
                .to_ascii_lowercase();
            self.start_tag(&name, raw);
        }
    }

    fn start_tag(&mut self, name: &str, raw: &str) {
        match name {
            "p" => self.style.new_paragraph(self.doc),
            "code" => {
                self.in_code = true;
                self.style.start_code(self.doc);
            }
            "b" | "strong" => self.style.start_b(self.doc),
            "i" | "em" => self.style.start_i(self.doc),
            "a" => {
                self.href = RE_HREF
                    .captures(raw)
                    .map(|caps| caps[1].to_string());
                self.doc.write("`");
            }
            "ul" => self.style.start_ul(self.doc),
            "li" => self.style.start_li(self.doc),
            _ => {}
        }
    }

    fn end_tag(&mut self, name: &str) {
        match name {
            "p" => self.style.new_paragraph(self.doc),
            "code" => {
                self.in_code = false;
                self.close_inline("``", "`` ");
            }
            "b" | "strong" => self.close_inline("**", "** "),
            "i" | "em" => self.close_inline("*", "* "),
            "a" => match self.href.take() {
                Some(link) => self.doc.write(&format!(" <{}>`__ ", link)),
                None => self.close_inline("`", "` "),
            },
            "ul" => self.style.end_ul(self.doc),
            "li" => self.style.end_li(),
            _ => {}
        }
    }

    /// Close an inline span. An empty span (open mark still on top of the
    /// buffer) is rolled back instead of emitting empty markup.
    fn close_inline(&mut self, open: &str, close: &str) {
        if self.doc.peek().map(|last| last == open).unwrap_or(false) {
            let _ = self.doc.pop();
        } else {
            self.doc.write(close);
        }
    }

    fn data(&mut self, data: &str) {
        if data.is_empty() {
            return;
        }
        let decoded = decode_entities(data);
        if self.in_code {
            let translated = decoded
                .split_whitespace()
                .map(|word| self.doc.translate(word).to_string())
                .collect::<Vec<_>>()
                .join(" ");
            self.doc.write(&translated);
        } else {
            self.doc.write(&decoded);
        }
    }
}

/// Decode the entities service prose actually uses; anything unknown is
/// left as written.
fn decode_entities(text: &str) -> Cow<'_, str> {
    RE_ENTITY.replace_all(text, |caps: &Captures<'_>| {
        let entity = &caps[1];
        match entity {
            "amp" => "&".to_string(),
            "lt" => "<".to_string(),
            "gt" => ">".to_string(),
            "quot" => "\"".to_string(),
            "apos" => "'".to_string(),
            "nbsp" => " ".to_string(),
            _ => match numeric_entity(entity) {
                Some(ch) => ch.to_string(),
                None => caps[0].to_string(),
            },
        }
    })
}

fn numeric_entity(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = match digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    char::from_u32(code)
}
