//! Rendering options and configuration.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use super::{CleanupOptions, CleanupPreset};
use crate::error::{Error, Result};

/// Options for rendering reconstructed pages.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Text cleanup options (None = no cleanup)
    pub cleanup: Option<CleanupOptions>,

    /// Inserted between non-empty pages
    pub page_separator: String,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = Some(cleanup);
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup_preset(mut self, preset: CleanupPreset) -> Self {
        self.cleanup = Some(CleanupOptions::from_preset(preset));
        self
    }

    /// Disable cleanup entirely.
    pub fn without_cleanup(mut self) -> Self {
        self.cleanup = None;
        self
    }

    /// Set the page separator.
    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.page_separator = separator.into();
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cleanup: Some(CleanupOptions::standard()),
            page_separator: "\n".to_string(),
        }
    }
}

/// Upper bound on the pages a comma-separated list may expand to.
const MAX_LISTED_PAGES: usize = 100_000;

/// Page selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        let invalid = || Error::InvalidPageRange(s.to_string());

        // Simple range (e.g., "1-10")
        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let (start, end) = parse_bounds(start, end).ok_or_else(invalid)?;
                return Ok(PageSelection::Range(start..=end));
            }
        }

        // Comma-separated list with possible ranges
        let mut pages = BTreeSet::new();
        for part in s.split(',') {
            let part = part.trim();
            let (start, end) = match part.split_once('-') {
                Some((start, end)) => parse_bounds(start, end).ok_or_else(invalid)?,
                None => {
                    let p = parse_page(part).ok_or_else(invalid)?;
                    (p, p)
                }
            };
            if (end - start) as usize >= MAX_LISTED_PAGES - pages.len() {
                return Err(invalid());
            }
            pages.extend(start..=end);
        }

        Ok(PageSelection::Pages(pages.into_iter().collect()))
    }
}

fn parse_page(s: &str) -> Option<u32> {
    s.trim().parse().ok().filter(|&p| p > 0)
}

fn parse_bounds(start: &str, end: &str) -> Option<(u32, u32)> {
    let start = parse_page(start)?;
    let end = parse_page(end)?;
    (start <= end).then_some((start, end))
}
