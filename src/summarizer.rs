//! Heuristic summaries of normalized page text: an excerpt, a handful of
//! "main point" sentences and a best effort category map.
//!
//! Categories come from a list of [`CategoryProbe`]s run independently over
//! the whole text. A probe that finds nothing contributes no key at all.

use std::collections::BTreeMap;

use anyhow::Result;
use regex::Regex;

pub const ELLIPSIS: &str = "...";
pub const DEFAULT_EXCERPT_LENGTH: usize = 200;
/// Sentences must be longer than this (in characters, after trimming) to count
/// as a main point.
pub const MIN_POINT_LENGTH: usize = 20;

const OVERVIEW_PATTERN: &str = r"[^.!?]*?\w[^.!?]*?\s(?:is|are|refers to)\s[^.!?]+[.!?]?";
const EXAMPLES_PATTERN: &str = r"(?i)[^.!?]*\b(?:example|instance|case)\w*[^.!?]*[.!?]?";
const TECHNICAL_PATTERN: &str =
    r"(?i)[^.!?]*\b(?:technical|specification|requirement)\w*[^.!?]*[.!?]?";

pub trait CategoryProbe: Send + Sync {
    fn name(&self) -> &str;
    fn probe(&self, content: &str) -> Option<String>;
}

/// Regex backed probe: takes up to `max_matches` matching spans, trimmed and
/// joined with a single space.
#[derive(Debug, Clone)]
pub struct PatternProbe {
    name: String,
    pattern: Regex,
    max_matches: usize,
}

impl PatternProbe {
    pub fn new(name: impl Into<String>, pattern: &str, max_matches: usize) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            max_matches,
        })
    }
}

impl CategoryProbe for PatternProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn probe(&self, content: &str) -> Option<String> {
        let spans = self
            .pattern
            .find_iter(content)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .take(self.max_matches)
            .collect::<Vec<&str>>();
        if spans.is_empty() {
            None
        } else {
            Some(spans.join(" "))
        }
    }
}

/// `overview`, `examples` and `technical_details`.
pub fn default_probes() -> Result<Vec<Box<dyn CategoryProbe>>> {
    Ok(vec![
        Box::new(PatternProbe::new("overview", OVERVIEW_PATTERN, 1)?),
        Box::new(PatternProbe::new("examples", EXAMPLES_PATTERN, 2)?),
        Box::new(PatternProbe::new(
            "technical_details",
            TECHNICAL_PATTERN,
            2,
        )?),
    ])
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub excerpt: String,
    pub main_points: Vec<String>,
    pub categories: BTreeMap<String, String>,
}

pub struct Summarizer {
    probes: Vec<Box<dyn CategoryProbe>>,
    max_points: usize,
    excerpt_length: usize,
}

impl Summarizer {
    pub fn new(max_points: usize, excerpt_length: usize) -> Result<Self> {
        Ok(Self::with_probes(default_probes()?, max_points, excerpt_length))
    }

    pub fn with_probes(
        probes: Vec<Box<dyn CategoryProbe>>,
        max_points: usize,
        excerpt_length: usize,
    ) -> Self {
        Self {
            probes,
            max_points,
            excerpt_length,
        }
    }

    pub fn excerpt(&self, content: &str) -> String {
        excerpt(content, self.excerpt_length)
    }

    pub fn categorize(&self, content: &str) -> BTreeMap<String, String> {
        self.probes
            .iter()
            .filter_map(|p| p.probe(content).map(|span| (p.name().to_string(), span)))
            .collect()
    }

    pub fn summarize(&self, content: &str) -> Summary {
        Summary {
            excerpt: self.excerpt(content),
            main_points: main_points(content, self.max_points),
            categories: self.categorize(content),
        }
    }
}

/// First `max_length` characters followed by [`ELLIPSIS`], or the content
/// unchanged when it already fits.
pub fn excerpt(content: &str, max_length: usize) -> String {
    if content.chars().count() <= max_length {
        return content.to_string();
    }
    let mut out = content.chars().take(max_length).collect::<String>();
    out.push_str(ELLIPSIS);
    out
}

pub fn main_points(content: &str, max_points: usize) -> Vec<String> {
    content
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_POINT_LENGTH)
        .take(max_points)
        .map(|s| s.to_string())
        .collect()
}
