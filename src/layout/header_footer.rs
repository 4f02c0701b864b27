//! Running header and footer removal.
//!
//! Two policies are supported. The margin policy is purely positional and
//! works page by page. The frequency policy needs every page first: it
//! collects the digit-stripped text of blocks in the top and bottom bands,
//! keeps the texts that repeat on most pages, then removes matching blocks
//! anywhere on any page. Page numbers vary but the surrounding text does
//! not, so "Page 3 of 12" and "Page 4 of 12" collapse to the same key.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;

use crate::model::{collapse_whitespace, Block, Page};

/// Check if a block lies entirely inside the top or bottom margin band.
///
/// A block straddling a band boundary is not in the margin.
pub fn in_margin(block: &Block, page_height: f32, top_ratio: f32, bottom_ratio: f32) -> bool {
    block.bbox.y1 < page_height * top_ratio || block.bbox.y0 > page_height * bottom_ratio
}

/// Drop blocks lying entirely inside the margin bands.
///
/// Returns the kept blocks in their original order and the removed count.
pub fn filter_by_margin<'a>(
    blocks: Vec<(usize, &'a Block)>,
    page_height: f32,
    top_ratio: f32,
    bottom_ratio: f32,
) -> (Vec<(usize, &'a Block)>, usize) {
    let before = blocks.len();
    let kept: Vec<_> = blocks
        .into_iter()
        .filter(|(_, b)| !in_margin(b, page_height, top_ratio, bottom_ratio))
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// Normalize text for repetition matching: digits removed, whitespace collapsed.
pub fn normalize_text(text: &str) -> String {
    let stripped: String = text.chars().filter(|c| !c.is_numeric()).collect();
    collapse_whitespace(&stripped)
}

/// Header/footer texts detected across a whole document.
///
/// Built once, then shared read-only by every page worker.
#[derive(Debug, Clone, Default)]
pub struct HeaderFooterSet {
    candidates: HashSet<String>,
    band_fraction: f32,
}

impl HeaderFooterSet {
    /// Scan all pages and collect texts repeating in the top/bottom bands.
    ///
    /// A text is a candidate when it occurs on at least `min_pages_ratio`
    /// of the pages. Each page counts a text at most once.
    pub fn build(pages: &[Page], band_fraction: f32, min_pages_ratio: f32, parallel: bool) -> Self {
        let page_keys: Vec<HashSet<String>> = if parallel {
            pages
                .par_iter()
                .map(|p| band_keys(p, band_fraction))
                .collect()
        } else {
            pages.iter().map(|p| band_keys(p, band_fraction)).collect()
        };

        let mut counts: HashMap<String, usize> = HashMap::new();
        for keys in page_keys {
            for key in keys {
                *counts.entry(key).or_insert(0) += 1;
            }
        }

        let total = pages.len().max(1) as f64;
        let candidates: HashSet<String> = counts
            .into_iter()
            .filter(|(_, count)| *count as f64 / total >= min_pages_ratio as f64)
            .map(|(key, _)| key)
            .collect();

        log::debug!(
            "Header/footer candidates over {} pages: {:?}",
            pages.len(),
            candidates
        );

        Self {
            candidates,
            band_fraction,
        }
    }

    /// Check if the set holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Number of candidate texts.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Check if a normalized text is a candidate.
    pub fn contains(&self, normalized: &str) -> bool {
        self.candidates.contains(normalized)
    }

    /// Check if a block on a page of the given height is a header/footer.
    ///
    /// Text made only of digits normalizes to the empty key; such blocks
    /// (bare page numbers) match only inside the bands, otherwise every
    /// numeric cell on the page would be removed.
    pub fn matches(&self, block: &Block, page_height: f32) -> bool {
        if block.is_empty() {
            return false;
        }
        let key = normalize_text(&block.text());
        if key.is_empty() {
            return self.candidates.contains("") && in_band(block, page_height, self.band_fraction);
        }
        self.candidates.contains(&key)
    }

    /// Drop blocks matching a candidate.
    ///
    /// Returns the kept blocks in their original order and the removed count.
    pub fn filter<'a>(
        &self,
        blocks: Vec<(usize, &'a Block)>,
        page_height: f32,
    ) -> (Vec<(usize, &'a Block)>, usize) {
        let before = blocks.len();
        let kept: Vec<_> = blocks
            .into_iter()
            .filter(|(_, b)| !self.matches(b, page_height))
            .collect();
        let removed = before - kept.len();
        (kept, removed)
    }
}

fn in_band(block: &Block, page_height: f32, fraction: f32) -> bool {
    in_margin(block, page_height, fraction, 1.0 - fraction)
}

fn band_keys(page: &Page, fraction: f32) -> HashSet<String> {
    if !page.has_usable_size() {
        return HashSet::new();
    }
    page.blocks
        .iter()
        .filter(|b| b.validate().is_ok() && !b.is_empty())
        .filter(|b| in_band(b, page.height, fraction))
        .map(|b| normalize_text(&b.text()))
        .collect()
}
