//! Layout reconstruction engine.
//!
//! Each page flows through the same stages:
//!
//! 1. header/footer removal ([`header_footer`])
//! 2. block classification ([`classifier`])
//! 3. vertical zoning ([`zoning`])
//! 4. per-zone column detection ([`columns`])
//! 5. reading-order assembly ([`reading_order`])
//!
//! Every stage is a pure function of its input. [`LayoutAnalyzer`] wires
//! them together and runs pages in parallel.

mod analyzer;
pub mod classifier;
pub mod columns;
pub mod header_footer;
mod options;
pub mod reading_order;
pub mod zoning;

pub use analyzer::{LayoutAnalyzer, PageDiagnostics, PageLayout};
pub use classifier::{ClassifiedBlock, ColumnSide, ContentKind};
pub use columns::ColumnLayout;
pub use header_footer::HeaderFooterSet;
pub use options::{ErrorMode, HeaderFooterPolicy, LayoutOptions};
pub use reading_order::AssemblyCounts;
pub use zoning::Zone;
