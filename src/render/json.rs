//! JSON rendering of reconstruction results.

use crate::error::{Error, Result};

use super::RenderResult;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a render result to JSON.
pub fn to_json(result: &RenderResult, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(result),
        JsonFormat::Compact => serde_json::to_string(result),
    };

    json.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
