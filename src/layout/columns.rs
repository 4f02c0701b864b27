//! Single- vs two-column detection for one zone.
//!
//! Only the largest horizontal gap between sorted block centers is
//! considered, so at most one column boundary exists per zone. A split is
//! accepted only when both sides hold a fair share of the zone's prose; an
//! indented paragraph or a lone margin note does not make a second column.

use super::classifier::{ClassifiedBlock, ColumnSide};

/// Column decision for a zone.
#[derive(Debug, Clone)]
pub enum ColumnLayout<'a> {
    /// Read the zone top to bottom
    Single,
    /// Read the left column, then the right
    Double {
        /// X coordinate separating the columns
        split_pos: f32,
        /// Prose blocks with centers left of the split
        left: Vec<ClassifiedBlock<'a>>,
        /// Prose blocks with centers at or right of the split
        right: Vec<ClassifiedBlock<'a>>,
    },
}

impl ColumnLayout<'_> {
    /// Check if the zone was split into two columns.
    pub fn is_double(&self) -> bool {
        matches!(self, ColumnLayout::Double { .. })
    }
}

/// Find the largest gap between consecutive sorted centers.
///
/// Returns `(gap, midpoint)`; the first of several equal gaps wins.
/// Fewer than two centers yield `None`.
pub fn largest_center_gap(centers: &[f32]) -> Option<(f32, f32)> {
    let mut sorted = centers.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mut best: Option<(f32, f32)> = None;
    for pair in sorted.windows(2) {
        let gap = pair[1] - pair[0];
        if best.map_or(true, |(max_gap, _)| gap > max_gap) {
            best = Some((gap, (pair[0] + pair[1]) / 2.0));
        }
    }
    best
}

/// Decide the column layout of a zone from its prose blocks.
pub fn detect_columns<'a>(
    prose: &[ClassifiedBlock<'a>],
    page_width: f32,
    gap_fraction: f32,
    balance_threshold: f32,
) -> ColumnLayout<'a> {
    let centers: Vec<f32> = prose.iter().map(|b| b.center_x()).collect();
    let Some((max_gap, split_pos)) = largest_center_gap(&centers) else {
        return ColumnLayout::Single;
    };

    if max_gap < page_width * gap_fraction {
        log::debug!(
            "Largest center gap {:.1} below {:.1}, single column",
            max_gap,
            page_width * gap_fraction
        );
        return ColumnLayout::Single;
    }

    let (left, right): (Vec<_>, Vec<_>) = prose
        .iter()
        .copied()
        .partition(|b| b.center_x() < split_pos);

    let total = prose.len() as f32;
    let left_ratio = left.len() as f32 / total;
    let right_ratio = right.len() as f32 / total;

    log::debug!(
        "Split candidate at x={:.1}: left={} ({:.2}), right={} ({:.2})",
        split_pos,
        left.len(),
        left_ratio,
        right.len(),
        right_ratio
    );

    if left_ratio > balance_threshold && right_ratio > balance_threshold {
        ColumnLayout::Double {
            split_pos,
            left: left
                .into_iter()
                .map(|b| b.with_column(ColumnSide::Left))
                .collect(),
            right: right
                .into_iter()
                .map(|b| b.with_column(ColumnSide::Right))
                .collect(),
        }
    } else {
        log::debug!("Columns too imbalanced, treating as single column");
        ColumnLayout::Single
    }
}
