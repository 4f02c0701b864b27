//! Vertical zoning: grouping blocks into vertically contiguous runs.

use super::classifier::ClassifiedBlock;

/// A vertically contiguous group of blocks on one page.
///
/// Zones borrow the page's blocks and live only while the page is laid out.
#[derive(Debug, Clone)]
pub struct Zone<'a> {
    /// Blocks in ascending `y0` order
    pub blocks: Vec<ClassifiedBlock<'a>>,
    /// Smallest `y0` in the zone
    pub top: f32,
    /// Largest `y1` in the zone
    pub bottom: f32,
}

impl<'a> Zone<'a> {
    fn start(block: ClassifiedBlock<'a>) -> Self {
        Self {
            top: block.y0(),
            bottom: block.y1(),
            blocks: vec![block],
        }
    }

    /// Number of blocks in the zone.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the zone has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Group blocks into zones.
///
/// Blocks are sorted by `y0`; a block joins the open zone when its top lies
/// at most `max_gap` below the lowest bottom edge seen so far in that zone,
/// otherwise it opens a new zone. Empty input yields no zones.
pub fn cluster_vertically<'a>(blocks: &[ClassifiedBlock<'a>], max_gap: f32) -> Vec<Zone<'a>> {
    let mut sorted = blocks.to_vec();
    sorted.sort_by(|a, b| a.y0().total_cmp(&b.y0()));

    let mut iter = sorted.into_iter();
    let Some(first) = iter.next() else {
        return Vec::new();
    };

    let mut zones = Vec::new();
    let mut current = Zone::start(first);

    for block in iter {
        if block.y0() - current.bottom <= max_gap {
            current.bottom = current.bottom.max(block.y1());
            current.blocks.push(block);
        } else {
            zones.push(std::mem::replace(&mut current, Zone::start(block)));
        }
    }
    zones.push(current);

    zones
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::classifier::{ColumnSide, ContentKind};
    use crate::model::{Block, BoundingBox};

    fn blocks_at(tops: &[f32], height: f32) -> Vec<Block> {
        tops.iter()
            .map(|&y| Block::graphic(BoundingBox::new(0.0, y, 100.0, y + height)))
            .collect()
    }

    fn classified(blocks: &[Block]) -> Vec<ClassifiedBlock<'_>> {
        blocks
            .iter()
            .enumerate()
            .map(|(index, block)| ClassifiedBlock {
                block,
                index,
                kind: ContentKind::ProseText,
                column: ColumnSide::Unassigned,
            })
            .collect()
    }

    #[test]
    fn test_two_zones() {
        let blocks = blocks_at(&[0.0, 5.0, 40.0, 45.0], 5.0);
        let zones = cluster_vertically(&classified(&blocks), 15.0);
        assert_eq!(zones.len(), 2);
        let tops: Vec<Vec<f32>> = zones
            .iter()
            .map(|z| z.blocks.iter().map(|b| b.y0()).collect())
            .collect();
        assert_eq!(tops, vec![vec![0.0, 5.0], vec![40.0, 45.0]]);
        assert_eq!(zones[0].bottom, 10.0);
        assert_eq!(zones[1].top, 40.0);
    }

    #[test]
    fn test_unsorted_input_and_tall_block() {
        // The tall block at 0 keeps the zone open past the short one at 10.
        let mut blocks = blocks_at(&[60.0, 10.0], 5.0);
        blocks.push(Block::graphic(BoundingBox::new(0.0, 0.0, 100.0, 50.0)));
        let zones = cluster_vertically(&classified(&blocks), 15.0);
        assert_eq!(zones.len(), 1);
        assert_eq!(zones[0].len(), 3);
        assert_eq!(zones[0].blocks[0].index, 2);
    }

    #[test]
    fn test_gap_equal_to_threshold_joins() {
        let blocks = blocks_at(&[0.0, 25.0], 10.0);
        let zones = cluster_vertically(&classified(&blocks), 15.0);
        assert_eq!(zones.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(cluster_vertically(&[], 15.0).is_empty());
    }
}
