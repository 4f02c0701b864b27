//! Document-level types.

use super::Page;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// An ordered sequence of pages, as handed over by a content extractor.
///
/// The engine reads a document once and never mutates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Where the blocks came from (file name, URL), informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Pages in the document
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a document from a JSON block dump.
    ///
    /// Pages without an explicit `number` are numbered by position.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: Document = serde_json::from_str(json)?;
        Ok(doc.renumbered())
    }

    /// Load a document from a reader yielding a JSON block dump.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let doc: Document = serde_json::from_reader(reader)?;
        Ok(doc.renumbered())
    }

    /// Load a document from a JSON block dump on disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut doc = Self::from_reader(BufReader::new(file))?;
        if doc.source.is_none() {
            doc.source = Some(path.display().to_string());
        }
        Ok(doc)
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&Page> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total number of blocks across all pages.
    pub fn block_count(&self) -> usize {
        self.pages.iter().map(|p| p.block_count()).sum()
    }

    fn renumbered(mut self) -> Self {
        for (idx, page) in self.pages.iter_mut().enumerate() {
            if page.number == 0 {
                page.number = idx as u32 + 1;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_pages() {
        let mut doc = Document::new();
        assert!(doc.is_empty());
        doc.add_page(Page::letter(1));
        doc.add_page(Page::letter(2));
        assert_eq!(doc.page_count(), 2);
        assert!(doc.get_page(0).is_none());
        assert_eq!(doc.get_page(2).map(|p| p.number), Some(2));
        assert!(doc.get_page(3).is_none());
    }

    #[test]
    fn test_from_json_numbers_pages() {
        let json = r#"{
            "pages": [
                {"width": 612, "height": 792, "blocks": []},
                {"width": 612, "height": 792, "blocks": [
                    {"bbox": [72, 100, 540, 140], "lines": [{"spans": [{"text": "Body"}]}]}
                ]}
            ]
        }"#;
        let doc = Document::from_json(json).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[0].number, 1);
        assert_eq!(doc.pages[1].number, 2);
        assert_eq!(doc.block_count(), 1);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Document::from_json("[1, 2").is_err());
    }
}
