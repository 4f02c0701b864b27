//! Page-by-page layout driver.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Block, Document, Page};
use crate::render::PageSelection;

use super::classifier::{classify_blocks, ContentKind};
use super::header_footer::{filter_by_margin, HeaderFooterSet};
use super::options::{ErrorMode, HeaderFooterPolicy, LayoutOptions};
use super::reading_order::{assemble_page, AssemblyCounts, AssemblyParams};

/// What happened to a page's blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDiagnostics {
    /// Blocks on the page as extracted
    pub block_count: usize,
    /// Malformed blocks skipped
    pub blocks_skipped: usize,
    /// Blocks removed as running headers/footers
    pub header_footer_removed: usize,
    /// Blocks classified as prose
    pub prose_blocks: usize,
    /// Narrow non-text blocks
    pub nontext_column_blocks: usize,
    /// Zone and full-width block counters
    #[serde(flatten)]
    pub assembly: AssemblyCounts,
}

/// Reading-order text of one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLayout {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page text, one block per line
    pub text: String,
    /// Per-page diagnostics
    pub diagnostics: PageDiagnostics,
}

impl PageLayout {
    /// Check if the page produced no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Reconstructs reading order for the pages of a document.
///
/// Holds only validated options; every call is independent.
#[derive(Debug, Clone)]
pub struct LayoutAnalyzer {
    options: LayoutOptions,
}

impl LayoutAnalyzer {
    /// Create an analyzer, rejecting invalid options up front.
    pub fn new(options: LayoutOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// The options in use.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Lay out every selected page, in page order.
    pub fn analyze(&self, doc: &Document) -> Result<Vec<PageLayout>> {
        check_selection(&self.options.pages, doc)?;

        // Phase 1: whole-document scan, completed before any page is filtered.
        let header_footer = self.header_footer_set(doc);

        let selected: Vec<&Page> = doc
            .pages
            .iter()
            .filter(|p| self.options.pages.includes(p.number))
            .collect();

        // Phase 2: independent per-page work sharing the read-only set.
        let layouts: Result<Vec<PageLayout>> = if self.options.parallel {
            selected
                .par_iter()
                .map(|page| self.analyze_page(page, header_footer.as_ref()))
                .collect()
        } else {
            selected
                .iter()
                .map(|page| self.analyze_page(page, header_footer.as_ref()))
                .collect()
        };

        let layouts = layouts?;
        log::debug!(
            "Laid out {} of {} pages",
            layouts.len(),
            doc.page_count()
        );
        Ok(layouts)
    }

    /// Build the frequency-policy header/footer set, if that policy applies.
    ///
    /// Returns `None` for the margin and disabled policies, and when the
    /// document is too short for repetition to mean anything.
    pub fn header_footer_set(&self, doc: &Document) -> Option<HeaderFooterSet> {
        if self.options.header_footer_policy != HeaderFooterPolicy::Frequency {
            return None;
        }
        if doc.pages.len() < self.options.frequency_min_document_pages {
            log::debug!(
                "{} page(s) is too few for frequency filtering, using margins",
                doc.pages.len()
            );
            return None;
        }
        Some(HeaderFooterSet::build(
            &doc.pages,
            self.options.frequency_top_bottom_fraction,
            self.options.frequency_min_pages_ratio,
            self.options.parallel,
        ))
    }

    /// Lay out a single page.
    ///
    /// `header_footer` is the frequency set from [`Self::header_footer_set`];
    /// when the frequency policy is active but no set is given, the margin
    /// policy is applied instead.
    pub fn analyze_page(
        &self,
        page: &Page,
        header_footer: Option<&HeaderFooterSet>,
    ) -> Result<PageLayout> {
        let opts = &self.options;
        let mut diagnostics = PageDiagnostics {
            block_count: page.block_count(),
            ..Default::default()
        };

        if !page.has_usable_size() {
            if opts.error_mode == ErrorMode::Strict {
                return Err(Error::MalformedPage {
                    page: page.number,
                    reason: format!("unusable size {}x{}", page.width, page.height),
                });
            }
            log::warn!(
                "Skipping page {} with unusable size {}x{}",
                page.number,
                page.width,
                page.height
            );
            diagnostics.blocks_skipped = page.block_count();
            return Ok(PageLayout {
                number: page.number,
                text: String::new(),
                diagnostics,
            });
        }

        let mut usable: Vec<(usize, &Block)> = Vec::with_capacity(page.blocks.len());
        for (idx, block) in page.blocks.iter().enumerate() {
            match block.validate() {
                Ok(()) => usable.push((idx, block)),
                Err(defect) => {
                    if opts.error_mode == ErrorMode::Strict {
                        return Err(Error::MalformedBlock {
                            page: page.number,
                            block: idx,
                            reason: defect.to_string(),
                        });
                    }
                    log::warn!(
                        "Skipping malformed block {} on page {}: {}",
                        idx,
                        page.number,
                        defect
                    );
                    diagnostics.blocks_skipped += 1;
                }
            }
        }

        if usable.is_empty() {
            return Ok(PageLayout {
                number: page.number,
                text: String::new(),
                diagnostics,
            });
        }

        let (kept, removed) = match (opts.header_footer_policy, header_footer) {
            (HeaderFooterPolicy::Disabled, _) => (usable, 0),
            (HeaderFooterPolicy::Frequency, Some(set)) => set.filter(usable, page.height),
            _ => filter_by_margin(usable, page.height, opts.margin_ratio, opts.bottom_ratio),
        };
        diagnostics.header_footer_removed = removed;

        let classified = classify_blocks(
            &kept,
            page.width,
            opts.prose_min_spans,
            opts.full_width_ratio,
        );
        for block in &classified {
            match block.kind {
                ContentKind::ProseText => diagnostics.prose_blocks += 1,
                ContentKind::NonTextColumn => diagnostics.nontext_column_blocks += 1,
                ContentKind::NonTextFull => {}
            }
        }

        let params = AssemblyParams {
            page_width: page.width,
            max_vertical_gap: opts.max_vertical_gap,
            column_gap_fraction: opts.column_gap_fraction,
            column_balance_threshold: opts.column_balance_threshold,
        };
        let assembly = assemble_page(&classified, &params);
        diagnostics.assembly = assembly.counts;

        Ok(PageLayout {
            number: page.number,
            text: assembly.text,
            diagnostics,
        })
    }
}

/// Selections name page numbers, which need not start at 1 or be
/// contiguous. Listed pages must exist; a range must reach at least one page.
fn check_selection(selection: &PageSelection, doc: &Document) -> Result<()> {
    let last = doc.pages.iter().map(|p| p.number).max().unwrap_or(0);
    let has_page = |n: u32| doc.pages.iter().any(|p| p.number == n);
    let out_of_range = match selection {
        PageSelection::All => None,
        PageSelection::Range(range) => Some(*range.start()).filter(|_| {
            !doc.pages.iter().any(|p| range.contains(&p.number))
        }),
        PageSelection::Pages(pages) => pages.iter().copied().find(|&p| !has_page(p)),
    };
    match out_of_range {
        Some(p) => Err(Error::PageOutOfRange(p, last)),
        None => Ok(()),
    }
}
