//! Layout options and configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::render::PageSelection;

/// Options for reconstructing reading order.
///
/// The numeric thresholds are tuning knobs calibrated on two-column
/// academic papers. Every ratio must lie in the open interval (0, 1);
/// [`LayoutOptions::validate`] enforces this before any page is processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Top margin band as a fraction of page height (margin policy)
    pub margin_ratio: f32,

    /// Start of the bottom margin band as a fraction of page height (margin policy)
    pub bottom_ratio: f32,

    /// Largest vertical gap, in page units, that keeps blocks in one zone
    pub max_vertical_gap: f32,

    /// Minimum gap between block centers, as a fraction of page width, to split columns
    pub column_gap_fraction: f32,

    /// Share of a zone's prose blocks each column must exceed
    pub column_balance_threshold: f32,

    /// How running headers and footers are removed
    pub header_footer_policy: HeaderFooterPolicy,

    /// Top/bottom band height, as a fraction of page height, scanned by the frequency policy
    pub frequency_top_bottom_fraction: f32,

    /// Share of pages a normalized band text must appear on to count as header/footer
    pub frequency_min_pages_ratio: f32,

    /// Below this many pages the frequency policy falls back to the margin policy
    pub frequency_min_document_pages: usize,

    /// Minimum spans for a block to count as prose
    pub prose_min_spans: usize,

    /// Width, as a fraction of page width, above which a non-prose block is full-width
    pub full_width_ratio: f32,

    /// Error handling mode for malformed blocks
    pub error_mode: ErrorMode,

    /// Whether to process pages in parallel
    pub parallel: bool,

    /// Page selection (which pages to lay out)
    #[serde(skip)]
    pub pages: PageSelection,
}

impl LayoutOptions {
    /// Create new layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from JSON; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let options: LayoutOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Set the header/footer policy.
    pub fn with_header_footer_policy(mut self, policy: HeaderFooterPolicy) -> Self {
        self.header_footer_policy = policy;
        self
    }

    /// Set the margin bands used by the margin policy.
    pub fn with_margins(mut self, top: f32, bottom: f32) -> Self {
        self.margin_ratio = top;
        self.bottom_ratio = bottom;
        self
    }

    /// Set the maximum vertical gap inside a zone.
    pub fn with_max_vertical_gap(mut self, gap: f32) -> Self {
        self.max_vertical_gap = gap;
        self
    }

    /// Set the column gap fraction.
    pub fn with_column_gap_fraction(mut self, fraction: f32) -> Self {
        self.column_gap_fraction = fraction;
        self
    }

    /// Set the column balance threshold.
    pub fn with_column_balance_threshold(mut self, threshold: f32) -> Self {
        self.column_balance_threshold = threshold;
        self
    }

    /// Set frequency policy parameters.
    pub fn with_frequency(mut self, top_bottom_fraction: f32, min_pages_ratio: f32) -> Self {
        self.frequency_top_bottom_fraction = top_bottom_fraction;
        self.frequency_min_pages_ratio = min_pages_ratio;
        self
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Fail on the first malformed block.
    pub fn strict(mut self) -> Self {
        self.error_mode = ErrorMode::Strict;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Reject out-of-range settings.
    pub fn validate(&self) -> Result<()> {
        check_ratio("margin_ratio", self.margin_ratio)?;
        check_ratio("bottom_ratio", self.bottom_ratio)?;
        check_ratio("column_gap_fraction", self.column_gap_fraction)?;
        check_ratio("column_balance_threshold", self.column_balance_threshold)?;
        check_ratio(
            "frequency_top_bottom_fraction",
            self.frequency_top_bottom_fraction,
        )?;
        check_ratio("frequency_min_pages_ratio", self.frequency_min_pages_ratio)?;
        check_ratio("full_width_ratio", self.full_width_ratio)?;

        if self.margin_ratio >= self.bottom_ratio {
            return Err(Error::invalid_config(
                "margin_ratio",
                self.margin_ratio,
                "must be below bottom_ratio",
            ));
        }
        if !self.max_vertical_gap.is_finite() || self.max_vertical_gap < 0.0 {
            return Err(Error::invalid_config(
                "max_vertical_gap",
                self.max_vertical_gap,
                "must be a finite, non-negative distance",
            ));
        }
        if self.prose_min_spans == 0 {
            return Err(Error::InvalidConfig {
                field: "prose_min_spans",
                value: "0".to_string(),
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

fn check_ratio(field: &'static str, value: f32) -> Result<()> {
    // Written this way so NaN fails too.
    if value > 0.0 && value < 1.0 {
        Ok(())
    } else {
        Err(Error::invalid_config(field, value, "must be in (0, 1)"))
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            margin_ratio: 0.08,
            bottom_ratio: 0.925,
            max_vertical_gap: 15.0,
            column_gap_fraction: 0.15,
            column_balance_threshold: 0.20,
            header_footer_policy: HeaderFooterPolicy::Margin,
            frequency_top_bottom_fraction: 0.1,
            frequency_min_pages_ratio: 0.7,
            frequency_min_document_pages: 2,
            prose_min_spans: 3,
            full_width_ratio: 0.8,
            error_mode: ErrorMode::Lenient,
            parallel: true,
            pages: PageSelection::All,
        }
    }
}

/// How running headers and footers are detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderFooterPolicy {
    /// Drop blocks lying entirely inside the top or bottom margin band
    #[default]
    Margin,
    /// Drop blocks whose digit-stripped text repeats in the bands across pages
    Frequency,
    /// Keep every block
    Disabled,
}

/// Error handling mode for malformed blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    /// Fail on the first malformed block
    Strict,
    /// Skip malformed blocks and count them
    #[default]
    Lenient,
}
