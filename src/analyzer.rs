use anyhow::Result;
use html5ever::tendril::TendrilSink;
use html5ever::{LocalName, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// A character filter receives the text as a whole and returns a transformed copy.
/// Filters are chained by [`TextNormalizer`]; each one must be total over any input.
pub trait CharacterFilter: Send + Sync {
    fn filter(&self, text: String) -> String;
}

/// Turns an HTML document into its visible text: every text node outside
/// `head`, `script`, `style`, `noscript` and `template`, separated by spaces.
#[derive(Debug, Default)]
pub struct HtmlTextFilter;

impl HtmlTextFilter {
    pub fn get_dom(html: &str) -> std::io::Result<RcDom> {
        parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut std::io::Cursor::new(html))
    }

    pub fn is_hidden(local: &LocalName) -> bool {
        matches!(
            &**local,
            "head" | "script" | "style" | "noscript" | "template"
        )
    }

    /// Document-order walk with an explicit stack, so nesting depth is bounded
    /// by the heap rather than the thread stack.
    pub fn walk_html(handle: &Handle, out: &mut String) {
        let mut stack: Vec<Handle> = vec![handle.clone()];
        while let Some(node) = stack.pop() {
            match &node.data {
                NodeData::Text { contents } => {
                    let s = contents.borrow();
                    let s = s.trim();
                    if s.is_empty() {
                        continue;
                    }
                    if !out.is_empty() && !out.ends_with(' ') {
                        out.push(' ');
                    }
                    out.push_str(s);
                    continue;
                }
                NodeData::Element { name, .. } if Self::is_hidden(&name.local) => continue,
                _ => {}
            }
            stack.extend(node.children.borrow().iter().rev().cloned());
        }
    }
}

impl CharacterFilter for HtmlTextFilter {
    fn filter(&self, html: String) -> String {
        match Self::get_dom(&html) {
            Ok(dom) => {
                let mut out = String::new();
                Self::walk_html(&dom.document, &mut out);
                out
            }
            Err(e) => {
                log::warn!("could not build dom, error: {:#}", e);
                String::new()
            }
        }
    }
}

/// Collapses every run of whitespace into a single space and trims the ends.
#[derive(Debug, Default)]
pub struct WhitespaceFilter;

impl CharacterFilter for WhitespaceFilter {
    fn filter(&self, text: String) -> String {
        text.split_whitespace().collect::<Vec<&str>>().join(" ")
    }
}

/// Unicode compatibility composition (NFKC).
#[derive(Debug, Default)]
pub struct NfkcFilter;

impl CharacterFilter for NfkcFilter {
    fn filter(&self, text: String) -> String {
        text.nfkc().collect()
    }
}

/// Drops every "Symbol, other" character. This is how emoji get removed, and it
/// also takes out arrows, box drawing, degree signs and the like.
#[derive(Debug)]
pub struct SymbolFilter {
    symbols: Regex,
}

impl SymbolFilter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            symbols: Regex::new(r"\p{So}")?,
        })
    }
}

impl CharacterFilter for SymbolFilter {
    fn filter(&self, text: String) -> String {
        self.symbols.replace_all(&text, "").into_owned()
    }
}

/// Normalizes extracted page text into single-spaced plain text.
pub struct TextNormalizer {
    char_filters: Vec<Box<dyn CharacterFilter>>,
}

impl TextNormalizer {
    pub fn new(char_filters: Vec<Box<dyn CharacterFilter>>) -> Self {
        Self { char_filters }
    }

    /// whitespace, NFKC, whitespace, symbol strip, then NFKC and whitespace once
    /// more: removing a symbol can put a base letter next to a combining mark or
    /// leave two spaces side by side.
    pub fn standard() -> Result<Self> {
        Ok(Self::new(vec![
            Box::new(WhitespaceFilter),
            Box::new(NfkcFilter),
            Box::new(WhitespaceFilter),
            Box::new(SymbolFilter::new()?),
            Box::new(NfkcFilter),
            Box::new(WhitespaceFilter),
        ]))
    }

    pub fn normalize(&self, mut content: String) -> String {
        for filter in self.char_filters.iter() {
            content = filter.filter(content);
        }
        content
    }

    pub fn normalize_and_truncate(&self, content: String, max_words: usize) -> String {
        truncate_words(&self.normalize(content), max_words)
    }
}

/// Keeps the first `max_words` whitespace-delimited tokens. Not sentence aware.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<&str>>()
        .join(" ")
}
