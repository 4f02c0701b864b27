//! Block model: the positioned page content the layout engine consumes.
//!
//! A [`Document`] is an ordered list of [`Page`]s, each holding [`Block`]s in
//! extraction order. Blocks own [`Line`]s of [`Span`]s. The model carries no
//! derived layout state; classification results live beside the blocks in
//! the layout module.

mod block;
mod document;
mod geometry;
mod page;

pub use block::{collapse_whitespace, Block, BlockDefect, Line, Span};
pub use document::Document;
pub use geometry::BoundingBox;
pub use page::Page;
