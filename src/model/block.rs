//! Block, line and span types.

use super::BoundingBox;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Span {
    /// The text content
    #[serde(default)]
    pub text: String,

    /// Font size in points (0 when unknown)
    #[serde(default)]
    pub size: f32,

    /// Font name (e.g., "Times-Roman")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub font: String,

    /// Span bounding box, when the extractor provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

impl Span {
    /// Create a span with text only.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Set the font size.
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }
}

/// Spans sharing a baseline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Line {
    /// Spans in reading order
    #[serde(default)]
    pub spans: Vec<Span>,

    /// Line bounding box, when the extractor provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

impl Line {
    /// Create a line from spans.
    pub fn new(spans: Vec<Span>) -> Self {
        Self { spans, bbox: None }
    }

    /// Create a line with one span per whitespace-separated word.
    pub fn from_words(text: &str) -> Self {
        Self::new(text.split_whitespace().map(Span::new).collect())
    }
}

/// Why a block cannot be laid out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockDefect {
    /// Non-finite coordinates or inverted edges.
    #[error("invalid bounding box")]
    InvalidBoundingBox,
    /// A line without spans.
    #[error("line {0} has no spans")]
    EmptyLine(usize),
}

/// A positioned unit of text or graphics, as produced by a content extractor.
///
/// Graphic-only blocks have no lines.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    /// Bounding box on the page
    pub bbox: BoundingBox,

    /// Lines in extraction order
    #[serde(default)]
    pub lines: Vec<Line>,

    /// Extractor's block number, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
}

impl Block {
    /// Create a block from lines.
    pub fn new(bbox: BoundingBox, lines: Vec<Line>) -> Self {
        Self {
            bbox,
            lines,
            number: None,
        }
    }

    /// Create a graphic-only block.
    pub fn graphic(bbox: BoundingBox) -> Self {
        Self::new(bbox, Vec::new())
    }

    /// Create a text block, one [`Line`] per entry, one span per word.
    pub fn from_text_lines(bbox: BoundingBox, lines: &[&str]) -> Self {
        Self::new(bbox, lines.iter().map(|l| Line::from_words(l)).collect())
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total number of spans across all lines.
    pub fn span_count(&self) -> usize {
        self.lines.iter().map(|l| l.spans.len()).sum()
    }

    /// Block text: every span joined by a space, whitespace runs collapsed, trimmed.
    pub fn text(&self) -> String {
        let joined = self
            .lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        collapse_whitespace(&joined)
    }

    /// Check if the block carries no text.
    pub fn is_empty(&self) -> bool {
        self.lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .all(|s| s.text.trim().is_empty())
    }

    /// Check the block for defects that make it unusable.
    pub fn validate(&self) -> Result<(), BlockDefect> {
        if !self.bbox.is_valid() {
            return Err(BlockDefect::InvalidBoundingBox);
        }
        if let Some(idx) = self.lines.iter().position(|l| l.spans.is_empty()) {
            return Err(BlockDefect::EmptyLine(idx));
        }
        Ok(())
    }
}

/// Collapse every whitespace run to a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
