//! Plain text rendering of reconstructed pages.

use crate::error::Result;
use crate::layout::PageLayout;

use super::{CleanupPipeline, RenderOptions};

/// Join page texts in order, skipping empty pages.
///
/// A page whose blocks were all filtered out contributes nothing, not even
/// a blank line, so the separator never appears twice in a row.
pub fn join_pages(pages: &[PageLayout], separator: &str) -> String {
    pages
        .iter()
        .filter(|p| !p.text.is_empty())
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Convert laid-out pages to the final document text.
///
/// Cleanup runs on the whole document, so a "References" heading on one
/// page cuts every later page too.
pub fn to_text(pages: &[PageLayout], options: &RenderOptions) -> Result<String> {
    let mut output = join_pages(pages, &options.page_separator);

    if let Some(ref cleanup_options) = options.cleanup {
        let pipeline = CleanupPipeline::new(cleanup_options.clone());
        output = pipeline.process(&output);
    }

    Ok(output.trim().to_string())
}
