//! Reading-order assembly for one page.

use serde::{Deserialize, Serialize};

use super::classifier::{ClassifiedBlock, ColumnSide, ContentKind};
use super::columns::{detect_columns, ColumnLayout};
use super::zoning::cluster_vertically;

/// Lower-cased markers that identify a full-width block as a table.
const TABLE_KEYWORDS: [&str; 3] = ["table", "tables", "tab."];

/// Thresholds the assembler needs from [`super::LayoutOptions`].
#[derive(Debug, Clone, Copy)]
pub struct AssemblyParams {
    /// Page width in page units
    pub page_width: f32,
    /// Largest vertical gap inside a zone
    pub max_vertical_gap: f32,
    /// Minimum center gap as a fraction of page width
    pub column_gap_fraction: f32,
    /// Minimum share of prose per column
    pub column_balance_threshold: f32,
}

/// Counters describing how a page was assembled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssemblyCounts {
    /// Zones found on the page
    pub zones: usize,
    /// Zones read as two columns
    pub two_column_zones: usize,
    /// Full-width non-text blocks emitted
    pub nontext_full_emitted: usize,
    /// Full-width non-text blocks dropped by the table filter
    pub nontext_full_dropped: usize,
}

/// Ordered page text plus assembly counters.
#[derive(Debug, Clone, Default)]
pub struct PageAssembly {
    /// Page text, one block per line, trailing whitespace trimmed
    pub text: String,
    /// Assembly counters
    pub counts: AssemblyCounts,
}

/// Check whether a full-width non-text block is worth keeping.
///
/// Kept when its text names a table, or when it is dense enough
/// (two or more lines, four or more spans) to be one.
pub fn is_table_like(block: &ClassifiedBlock<'_>) -> bool {
    let text = block.block.text().to_lowercase();
    if TABLE_KEYWORDS.iter().any(|kw| text.contains(kw)) {
        return true;
    }
    block.block.line_count() >= 2 && block.block.span_count() >= 4
}

/// Assemble a page's classified blocks into reading order.
///
/// Zones are read top to bottom. Within a two-column zone the left column
/// is read before the right. Full-width non-text blocks are collected for
/// the whole page and appended after every zone.
pub fn assemble_page(blocks: &[ClassifiedBlock<'_>], params: &AssemblyParams) -> PageAssembly {
    let mut counts = AssemblyCounts::default();
    let mut text = String::new();

    let (mut full, flowing): (Vec<_>, Vec<_>) = blocks
        .iter()
        .copied()
        .partition(|b| b.kind == ContentKind::NonTextFull);

    let zones = cluster_vertically(&flowing, params.max_vertical_gap);
    counts.zones = zones.len();

    for (zone_idx, zone) in zones.iter().enumerate() {
        let prose: Vec<_> = zone
            .blocks
            .iter()
            .copied()
            .filter(|b| b.kind == ContentKind::ProseText)
            .collect();

        let layout = detect_columns(
            &prose,
            params.page_width,
            params.column_gap_fraction,
            params.column_balance_threshold,
        );

        match layout {
            ColumnLayout::Double {
                split_pos,
                mut left,
                mut right,
            } => {
                counts.two_column_zones += 1;
                log::debug!(
                    "Zone {} ({:.1}-{:.1}): two columns split at x={:.1}",
                    zone_idx,
                    zone.top,
                    zone.bottom,
                    split_pos
                );

                let left_env = envelope(&left);
                let right_env = envelope(&right);
                for block in zone
                    .blocks
                    .iter()
                    .filter(|b| b.kind == ContentKind::NonTextColumn)
                {
                    match reattach_side(block, left_env, right_env, split_pos) {
                        ColumnSide::Right => right.push(block.with_column(ColumnSide::Right)),
                        _ => left.push(block.with_column(ColumnSide::Left)),
                    }
                }

                sort_by_top(&mut left);
                sort_by_top(&mut right);
                emit(&mut text, &left);
                emit(&mut text, &right);
            }
            ColumnLayout::Single => {
                let mut ordered = zone.blocks.clone();
                sort_by_top(&mut ordered);
                emit(&mut text, &ordered);
            }
        }
    }

    sort_by_top(&mut full);
    let (kept, dropped): (Vec<_>, Vec<_>) = full.into_iter().partition(is_table_like);
    counts.nontext_full_emitted = kept.len();
    counts.nontext_full_dropped = dropped.len();
    if !dropped.is_empty() {
        log::debug!("Dropped {} full-width non-text block(s)", dropped.len());
    }
    emit(&mut text, &kept);

    let trimmed = text.trim_end().len();
    text.truncate(trimmed);

    PageAssembly { text, counts }
}

/// Horizontal extent `[min_x, max_x]` of a column's blocks.
fn envelope(blocks: &[ClassifiedBlock<'_>]) -> Option<(f32, f32)> {
    blocks.iter().fold(None, |acc, b| {
        let (x0, x1) = (b.block.bbox.x0, b.block.bbox.x1);
        Some(match acc {
            None => (x0, x1),
            Some((lo, hi)) => (lo.min(x0), hi.max(x1)),
        })
    })
}

/// Pick the column a narrow non-text block belongs to.
///
/// The left envelope is tested first, so a block overlapping both columns
/// goes left. A block overlapping neither goes to the side of the split its
/// center falls on.
fn reattach_side(
    block: &ClassifiedBlock<'_>,
    left: Option<(f32, f32)>,
    right: Option<(f32, f32)>,
    split_pos: f32,
) -> ColumnSide {
    let bbox = &block.block.bbox;
    if left.is_some_and(|(lo, hi)| bbox.overlaps_horizontally(lo, hi)) {
        ColumnSide::Left
    } else if right.is_some_and(|(lo, hi)| bbox.overlaps_horizontally(lo, hi)) {
        ColumnSide::Right
    } else if bbox.center_x() < split_pos {
        ColumnSide::Left
    } else {
        ColumnSide::Right
    }
}

fn sort_by_top(blocks: &mut [ClassifiedBlock<'_>]) {
    blocks.sort_by(|a, b| a.y0().total_cmp(&b.y0()));
}

fn emit(out: &mut String, blocks: &[ClassifiedBlock<'_>]) {
    for block in blocks {
        let text = block.block.text();
        if text.is_empty() {
            continue;
        }
        out.push_str(&text);
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::classifier::classify_blocks;
    use crate::model::{Block, BoundingBox};

    const PARAMS: AssemblyParams = AssemblyParams {
        page_width: 612.0,
        max_vertical_gap: 15.0,
        column_gap_fraction: 0.15,
        column_balance_threshold: 0.20,
    };

    fn prose(x0: f32, y0: f32, x1: f32, y1: f32, text: &str) -> Block {
        Block::from_text_lines(BoundingBox::new(x0, y0, x1, y1), &[text])
    }

    fn assemble(blocks: &[Block]) -> PageAssembly {
        let indexed: Vec<_> = blocks.iter().enumerate().collect();
        let classified = classify_blocks(&indexed, PARAMS.page_width, 3, 0.8);
        assemble_page(&classified, &PARAMS)
    }

    #[test]
    fn test_two_columns_left_then_right() {
        let blocks = vec![
            prose(320.0, 100.0, 560.0, 200.0, "right column top"),
            prose(50.0, 205.0, 290.0, 300.0, "left column bottom"),
            prose(50.0, 100.0, 290.0, 200.0, "left column top"),
            prose(320.0, 205.0, 560.0, 300.0, "right column bottom"),
        ];
        let result = assemble(&blocks);
        assert_eq!(
            result.text,
            "left column top\nleft column bottom\nright column top\nright column bottom"
        );
        assert_eq!(result.counts.zones, 1);
        assert_eq!(result.counts.two_column_zones, 1);
    }

    #[test]
    fn test_narrow_figure_reattached_to_its_column() {
        let blocks = vec![
            prose(50.0, 100.0, 290.0, 200.0, "left one here"),
            prose(50.0, 260.0, 290.0, 300.0, "left two here"),
            prose(320.0, 100.0, 560.0, 300.0, "right only here"),
            // caption-like sparse block inside the right column, between rows
            Block::from_text_lines(BoundingBox::new(350.0, 205.0, 500.0, 215.0), &["Sidebar"]),
            prose(320.0, 301.0, 560.0, 320.0, "right two here"),
            prose(50.0, 215.0, 290.0, 255.0, "left mid here"),
        ];
        let result = assemble(&blocks);
        assert_eq!(
            result.text,
            "left one here\nleft mid here\nleft two here\nright only here\nSidebar\nright two here"
        );
    }

    #[test]
    fn test_ambiguous_reattachment_prefers_left() {
        let blocks = vec![
            prose(50.0, 100.0, 290.0, 200.0, "left column text"),
            prose(320.0, 100.0, 560.0, 200.0, "right column text"),
            // centered figure overlapping both envelopes
            Block::from_text_lines(BoundingBox::new(250.0, 150.0, 360.0, 160.0), &["Centered"]),
        ];
        let result = assemble(&blocks);
        assert_eq!(
            result.text,
            "left column text\nCentered\nright column text"
        );
    }

    #[test]
    fn test_full_width_table_emitted_last() {
        let blocks = vec![
            Block::from_text_lines(
                BoundingBox::new(30.0, 100.0, 590.0, 140.0),
                &["Table 1"],
            ),
            prose(72.0, 150.0, 540.0, 200.0, "body text follows"),
        ];
        let result = assemble(&blocks);
        assert_eq!(result.text, "body text follows\nTable 1");
        assert_eq!(result.counts.nontext_full_emitted, 1);
    }

    #[test]
    fn test_full_width_decoration_dropped() {
        let blocks = vec![
            Block::from_text_lines(BoundingBox::new(30.0, 100.0, 590.0, 140.0), &["Logo"]),
            prose(72.0, 150.0, 540.0, 200.0, "body text follows"),
        ];
        let result = assemble(&blocks);
        assert_eq!(result.text, "body text follows");
        assert_eq!(result.counts.nontext_full_dropped, 1);
    }

    #[test]
    fn test_dense_full_width_block_kept() {
        let dense = Block::from_text_lines(
            BoundingBox::new(30.0, 100.0, 590.0, 140.0),
            &["a b", "c d"],
        );
        let indexed = [(0usize, &dense)];
        let classified = classify_blocks(&indexed, 612.0, 5, 0.8);
        assert_eq!(classified[0].kind, ContentKind::NonTextFull);
        assert!(is_table_like(&classified[0]));
    }

    #[test]
    fn test_graphic_blocks_emit_nothing() {
        let blocks = vec![
            Block::graphic(BoundingBox::new(100.0, 50.0, 200.0, 90.0)),
            prose(72.0, 100.0, 540.0, 200.0, "only the text"),
        ];
        let result = assemble(&blocks);
        assert_eq!(result.text, "only the text");
    }

    #[test]
    fn test_empty_page() {
        let result = assemble(&[]);
        assert!(result.text.is_empty());
        assert_eq!(result.counts, AssemblyCounts::default());
    }
}
