//! Rendering module for turning laid-out pages into final output.

mod cleanup;
mod json;
mod options;
mod result;
mod text;

pub use cleanup::{CleanupOptions, CleanupPipeline, CleanupPreset};
pub use json::{to_json, JsonFormat};
pub use options::{PageSelection, RenderOptions};
pub use result::{LayoutStats, RenderResult};
pub use text::{join_pages, to_text};
