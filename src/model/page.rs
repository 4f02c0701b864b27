//! Page-level types.

use super::Block;
use serde::{Deserialize, Serialize};

/// A single page of positioned blocks.
///
/// Block order is extraction order, not reading order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    #[serde(default)]
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Blocks on the page
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Page {
    /// Create a new page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            blocks: Vec::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0) // 8.5 * 72, 11 * 72
    }

    /// Create a new page with standard A4 size (210 x 297 mm).
    pub fn a4(number: u32) -> Self {
        Self::new(number, 595.0, 842.0) // 210mm * 2.834, 297mm * 2.834
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Builder variant of [`Page::add_block`].
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Check if the page has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the number of blocks on the page.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Check that width and height are finite and positive.
    ///
    /// Every layout threshold is a fraction of the page size.
    pub fn has_usable_size(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::letter(1)
    }
}
