//! Rendering result with per-page output and statistics.

use serde::{Deserialize, Serialize};

use crate::layout::PageLayout;

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// Source the document was loaded from, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// The cleaned document text
    pub content: String,

    /// Per-page reading-order text before cleanup
    pub pages: Vec<PageLayout>,

    /// Layout statistics
    pub stats: LayoutStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, pages: Vec<PageLayout>, stats: LayoutStats) -> Self {
        Self {
            source: None,
            content,
            pages,
            stats,
        }
    }
}

/// Statistics collected while laying out a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutStats {
    /// Pages laid out
    pub page_count: u32,

    /// Pages that produced no text
    pub empty_pages: u32,

    /// Blocks seen
    pub block_count: u32,

    /// Malformed blocks skipped
    pub blocks_skipped: u32,

    /// Header/footer blocks removed
    pub header_footer_removed: u32,

    /// Zones across all pages
    pub zone_count: u32,

    /// Zones read as two columns
    pub two_column_zones: u32,

    /// Full-width non-text blocks dropped
    pub nontext_full_dropped: u32,

    /// Approximate word count of the final text
    pub word_count: u32,

    /// Character count of the final text (excluding whitespace)
    pub char_count: u32,
}

impl LayoutStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Summarize per-page diagnostics.
    pub fn from_pages(pages: &[PageLayout]) -> Self {
        let mut stats = Self::new();
        for page in pages {
            stats.add_page(page);
        }
        stats
    }

    /// Add one page's diagnostics.
    pub fn add_page(&mut self, page: &PageLayout) {
        let d = &page.diagnostics;
        self.page_count += 1;
        if page.is_empty() {
            self.empty_pages += 1;
        }
        self.block_count += d.block_count as u32;
        self.blocks_skipped += d.blocks_skipped as u32;
        self.header_footer_removed += d.header_footer_removed as u32;
        self.zone_count += d.assembly.zones as u32;
        self.two_column_zones += d.assembly.two_column_zones as u32;
        self.nontext_full_dropped += d.assembly.nontext_full_dropped as u32;
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &LayoutStats) {
        self.page_count += other.page_count;
        self.empty_pages += other.empty_pages;
        self.block_count += other.block_count;
        self.blocks_skipped += other.blocks_skipped;
        self.header_footer_removed += other.header_footer_removed;
        self.zone_count += other.zone_count;
        self.two_column_zones += other.two_column_zones;
        self.nontext_full_dropped += other.nontext_full_dropped;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{AssemblyCounts, PageDiagnostics};

    #[test]
    fn test_layout_stats_count_text() {
        let mut stats = LayoutStats::new();
        stats.count_text("Hello, world! This is a test.");

        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.char_count, 24);
    }

    #[test]
    fn test_layout_stats_from_pages() {
        let pages = vec![
            PageLayout {
                number: 1,
                text: "some text".to_string(),
                diagnostics: PageDiagnostics {
                    block_count: 5,
                    header_footer_removed: 2,
                    assembly: AssemblyCounts {
                        zones: 2,
                        two_column_zones: 1,
                        ..Default::default()
                    },
                    ..Default::default()
                },
            },
            PageLayout {
                number: 2,
                text: String::new(),
                diagnostics: PageDiagnostics {
                    blocks_skipped: 1,
                    ..Default::default()
                },
            },
        ];
        let stats = LayoutStats::from_pages(&pages);
        assert_eq!(stats.page_count, 2);
        assert_eq!(stats.empty_pages, 1);
        assert_eq!(stats.block_count, 5);
        assert_eq!(stats.blocks_skipped, 1);
        assert_eq!(stats.header_footer_removed, 2);
        assert_eq!(stats.zone_count, 2);
        assert_eq!(stats.two_column_zones, 1);
    }

    #[test]
    fn test_layout_stats_merge() {
        let mut stats1 = LayoutStats {
            page_count: 5,
            zone_count: 2,
            ..Default::default()
        };
        let stats2 = LayoutStats {
            page_count: 3,
            zone_count: 1,
            word_count: 4,
            ..Default::default()
        };

        stats1.merge(&stats2);

        assert_eq!(stats1.page_count, 8);
        assert_eq!(stats1.zone_count, 3);
        assert_eq!(stats1.word_count, 4);
    }
}
