//! # reflow
//!
//! Reading-order reconstruction for positioned document text.
//!
//! This library takes the per-page text blocks produced by a PDF (or any
//! other page-layout) extractor, each with a bounding box, and rebuilds a
//! single plain-text stream in human reading order. Running headers and
//! footers are removed, two-column regions are read column by column,
//! figures and tables are placed sensibly, and the final text is cleaned.
//!
//! ## Quick Start
//!
//! ```no_run
//! use reflow::{load_document, reconstruct};
//!
//! fn main() -> reflow::Result<()> {
//!     // A block dump: pages of positioned blocks in JSON
//!     let doc = load_document("paper.json")?;
//!
//!     let text = reconstruct(&doc)?;
//!     println!("{}", text);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Header/footer removal**: positional margins or cross-page repetition
//! - **Column detection**: per vertical zone, so mixed layouts work
//! - **Figure and table placement**: narrow figures stay in their column
//! - **Parallel processing**: Uses Rayon for multi-page documents
//! - **Cleanup pipeline**: caption removal, references truncation, Unicode fixes
//! - **Directory sync**: mirror a tree of block dumps to text files

pub mod error;
pub mod layout;
pub mod model;
pub mod render;
pub mod sync;

// Re-export commonly used types
pub use error::{Error, Result};
pub use layout::{
    ErrorMode, HeaderFooterPolicy, LayoutAnalyzer, LayoutOptions, PageDiagnostics, PageLayout,
};
pub use model::{Block, BoundingBox, Document, Line, Page, Span};
pub use render::{
    CleanupOptions, CleanupPipeline, CleanupPreset, JsonFormat, LayoutStats, PageSelection,
    RenderOptions, RenderResult,
};
pub use sync::{sync_directory, SyncOptions, SyncReport};

use std::io::Read;
use std::path::Path;

/// Load a block dump from a JSON file.
///
/// # Example
///
/// ```no_run
/// use reflow::load_document;
///
/// let doc = load_document("paper.json").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Document> {
    Document::from_path(path)
}

/// Parse a block dump from a JSON string.
pub fn document_from_json(json: &str) -> Result<Document> {
    Document::from_json(json)
}

/// Parse a block dump from a reader.
pub fn document_from_reader<R: Read>(reader: R) -> Result<Document> {
    Document::from_reader(reader)
}

/// Reconstruct the reading-order text of a document with default options.
pub fn reconstruct(doc: &Document) -> Result<String> {
    reconstruct_with_options(doc, &LayoutOptions::default(), &RenderOptions::default())
}

/// Reconstruct the reading-order text of a document with custom options.
///
/// # Example
///
/// ```no_run
/// use reflow::{load_document, reconstruct_with_options, CleanupPreset, HeaderFooterPolicy,
///              LayoutOptions, RenderOptions};
///
/// let doc = load_document("paper.json").unwrap();
/// let layout = LayoutOptions::new().with_header_footer_policy(HeaderFooterPolicy::Frequency);
/// let render = RenderOptions::new().with_cleanup_preset(CleanupPreset::Aggressive);
/// let text = reconstruct_with_options(&doc, &layout, &render).unwrap();
/// ```
pub fn reconstruct_with_options(
    doc: &Document,
    layout: &LayoutOptions,
    render: &RenderOptions,
) -> Result<String> {
    let analyzer = LayoutAnalyzer::new(layout.clone())?;
    let pages = analyzer.analyze(doc)?;
    render::to_text(&pages, render)
}

/// Builder for reconstructing documents.
///
/// # Example
///
/// ```no_run
/// use reflow::{CleanupPreset, HeaderFooterPolicy, Reflow};
///
/// let text = Reflow::new()
///     .with_policy(HeaderFooterPolicy::Frequency)
///     .with_cleanup(CleanupPreset::Standard)
///     .strict()
///     .process_file("paper.json")?
///     .text()
///     .to_string();
/// # Ok::<(), reflow::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Reflow {
    layout_options: LayoutOptions,
    render_options: RenderOptions,
}

impl Reflow {
    /// Create a new Reflow builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header/footer policy.
    pub fn with_policy(mut self, policy: HeaderFooterPolicy) -> Self {
        self.layout_options = self.layout_options.with_header_footer_policy(policy);
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup(mut self, preset: CleanupPreset) -> Self {
        self.render_options = self.render_options.with_cleanup_preset(preset);
        self
    }

    /// Skip text cleanup.
    pub fn without_cleanup(mut self) -> Self {
        self.render_options = self.render_options.without_cleanup();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.layout_options = self.layout_options.sequential();
        self
    }

    /// Fail on the first malformed block.
    pub fn strict(mut self) -> Self {
        self.layout_options = self.layout_options.strict();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.layout_options = self.layout_options.with_pages(pages);
        self
    }

    /// Replace the layout options, page selection included.
    pub fn with_layout_options(mut self, options: LayoutOptions) -> Self {
        self.layout_options = options;
        self
    }

    /// Replace the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// The layout options in use.
    pub fn layout_options(&self) -> &LayoutOptions {
        &self.layout_options
    }

    /// The render options in use.
    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }

    /// Reconstruct a loaded document.
    pub fn process(&self, doc: &Document) -> Result<ReflowResult> {
        let analyzer = LayoutAnalyzer::new(self.layout_options.clone())?;
        let pages = analyzer.analyze(doc)?;
        let content = render::to_text(&pages, &self.render_options)?;

        let mut stats = LayoutStats::from_pages(&pages);
        stats.count_text(&content);

        log::debug!(
            "Reconstructed {} pages ({} words) from {}",
            stats.page_count,
            stats.word_count,
            doc.source.as_deref().unwrap_or("<memory>")
        );

        let mut result = RenderResult::new(content, pages, stats);
        result.source = doc.source.clone();
        Ok(ReflowResult { result })
    }

    /// Load a block dump from a JSON file and reconstruct it.
    pub fn process_file<P: AsRef<Path>>(&self, path: P) -> Result<ReflowResult> {
        let doc = load_document(path)?;
        self.process(&doc)
    }

    /// Parse a block dump from a JSON string and reconstruct it.
    pub fn process_json(&self, json: &str) -> Result<ReflowResult> {
        let doc = document_from_json(json)?;
        self.process(&doc)
    }
}

/// Result of reconstructing a document.
#[derive(Debug, Clone)]
pub struct ReflowResult {
    result: RenderResult,
}

impl ReflowResult {
    /// The final, cleaned document text.
    pub fn text(&self) -> &str {
        &self.result.content
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> String {
        self.result.content.clone()
    }

    /// Convert to JSON, including per-page text and diagnostics.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.result, format)
    }

    /// Per-page reading-order text before cleanup.
    pub fn pages(&self) -> &[PageLayout] {
        &self.result.pages
    }

    /// Layout statistics.
    pub fn stats(&self) -> &LayoutStats {
        &self.result.stats
    }

    /// Check if reconstruction produced no text.
    pub fn is_empty(&self) -> bool {
        self.result.content.is_empty()
    }

    /// Unwrap into the underlying render result.
    pub fn into_inner(self) -> RenderResult {
        self.result
    }
}
