//! Block classification.
//!
//! A density heuristic: blocks with enough spans are prose, the rest are
//! treated as figures/tables and split by width. Sparse prose (a one-word
//! heading) lands in the non-text buckets; that approximation is accepted.

use serde::{Deserialize, Serialize};

use crate::model::Block;

/// What a block appears to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Running text
    ProseText,
    /// Non-prose spanning most of the page width (table, wide figure)
    NonTextFull,
    /// Non-prose confined to a column (sidebar, small figure)
    NonTextColumn,
}

/// Column a block was assigned to during assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSide {
    /// Left column of a two-column zone
    Left,
    /// Right column of a two-column zone
    Right,
    /// Single-column zone, or not yet assigned
    #[default]
    Unassigned,
}

/// A block paired with the labels the engine derived for it.
///
/// The block itself is borrowed and never modified; labels are replaced by
/// producing a new value.
#[derive(Debug, Clone, Copy)]
pub struct ClassifiedBlock<'a> {
    /// The source block
    pub block: &'a Block,
    /// Position in the page's extraction order
    pub index: usize,
    /// Content label
    pub kind: ContentKind,
    /// Column label
    pub column: ColumnSide,
}

impl<'a> ClassifiedBlock<'a> {
    /// Top edge of the block.
    pub fn y0(&self) -> f32 {
        self.block.bbox.y0
    }

    /// Bottom edge of the block.
    pub fn y1(&self) -> f32 {
        self.block.bbox.y1
    }

    /// Horizontal center of the block.
    pub fn center_x(&self) -> f32 {
        self.block.bbox.center_x()
    }

    /// Copy with a column label.
    pub fn with_column(self, column: ColumnSide) -> Self {
        Self { column, ..self }
    }
}

/// Classify one block.
pub fn classify_block(
    block: &Block,
    page_width: f32,
    prose_min_spans: usize,
    full_width_ratio: f32,
) -> ContentKind {
    if block.line_count() >= 1 && block.span_count() >= prose_min_spans {
        ContentKind::ProseText
    } else if block.bbox.width() > page_width * full_width_ratio {
        ContentKind::NonTextFull
    } else {
        ContentKind::NonTextColumn
    }
}

/// Classify a page's surviving blocks, preserving order.
pub fn classify_blocks<'a>(
    blocks: &[(usize, &'a Block)],
    page_width: f32,
    prose_min_spans: usize,
    full_width_ratio: f32,
) -> Vec<ClassifiedBlock<'a>> {
    blocks
        .iter()
        .map(|&(index, block)| ClassifiedBlock {
            block,
            index,
            kind: classify_block(block, page_width, prose_min_spans, full_width_ratio),
            column: ColumnSide::Unassigned,
        })
        .collect()
}
