//! Document-level text cleanup.

use regex::Regex;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Figure caption lines, tested against the trimmed line.
const CAPTION_PATTERN: &str = r"(?i)^(Fig\.|Figure)\s*\d+[.:]?\s+.*$";

/// First line starting a bibliography.
const REFERENCES_PATTERN: &str = r"(?m)^References\b";

/// Cleanup preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanupPreset {
    /// Whitespace normalization only
    Minimal,
    /// Caption removal, references truncation, NFC and ligature expansion
    #[default]
    Standard,
    /// Standard plus replacement/PUA character removal and blank-line limiting
    Aggressive,
}

impl std::str::FromStr for CleanupPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(CleanupPreset::Minimal),
            "standard" => Ok(CleanupPreset::Standard),
            "aggressive" => Ok(CleanupPreset::Aggressive),
            other => Err(format!("Unknown cleanup preset: {}", other)),
        }
    }
}

/// Options for text cleanup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Expand ligatures (fi, fl, etc.)
    pub fix_ligatures: bool,

    /// Remove Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Remove Private Use Area (PUA) characters
    pub remove_pua: bool,

    /// Collapse whitespace runs inside each line and trim each line
    pub normalize_whitespace: bool,

    /// Drop lines that look like figure captions
    pub remove_figure_captions: bool,

    /// Cut the text at the first line starting with "References"
    pub truncate_references: bool,

    /// Maximum consecutive newlines (0 = unlimited)
    pub max_consecutive_newlines: u8,
}

impl CleanupOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        match preset {
            CleanupPreset::Minimal => Self::minimal(),
            CleanupPreset::Standard => Self::standard(),
            CleanupPreset::Aggressive => Self::aggressive(),
        }
    }

    /// Minimal cleanup options.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: false,
            fix_ligatures: false,
            remove_replacement_char: false,
            remove_pua: false,
            normalize_whitespace: true,
            remove_figure_captions: false,
            truncate_references: false,
            max_consecutive_newlines: 0,
        }
    }

    /// Standard cleanup options.
    pub fn standard() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: true,
            remove_replacement_char: false,
            remove_pua: false,
            normalize_whitespace: false,
            remove_figure_captions: true,
            truncate_references: true,
            max_consecutive_newlines: 0,
        }
    }

    /// Aggressive cleanup options.
    pub fn aggressive() -> Self {
        Self {
            normalize_unicode: true,
            fix_ligatures: true,
            remove_replacement_char: true,
            remove_pua: true,
            normalize_whitespace: true,
            remove_figure_captions: true,
            truncate_references: true,
            max_consecutive_newlines: 2, // at most one blank line
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Text cleanup pipeline.
///
/// Applying a pipeline to its own output returns the output unchanged.
#[derive(Debug, Clone)]
pub struct CleanupPipeline {
    options: CleanupOptions,
    caption_regex: Regex,
    references_regex: Regex,
    whitespace_regex: Regex,
    ligature_map: Vec<(&'static str, &'static str)>,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        Self {
            options,
            caption_regex: Regex::new(CAPTION_PATTERN).unwrap(),
            references_regex: Regex::new(REFERENCES_PATTERN).unwrap(),
            whitespace_regex: Regex::new(r"[ \t\u{00A0}]+").unwrap(),
            ligature_map: vec![
                ("\u{FB00}", "ff"),  // ﬀ
                ("\u{FB01}", "fi"),  // ﬁ
                ("\u{FB02}", "fl"),  // ﬂ
                ("\u{FB03}", "ffi"), // ﬃ
                ("\u{FB04}", "ffl"), // ﬄ
                ("\u{FB05}", "st"),  // ﬅ (long s + t)
                ("\u{FB06}", "st"),  // ﬆ
            ],
        }
    }

    /// Create a pipeline from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        Self::new(CleanupOptions::from_preset(preset))
    }

    /// The options in use.
    pub fn options(&self) -> &CleanupOptions {
        &self.options
    }

    /// Process text through the cleanup pipeline.
    pub fn process(&self, text: &str) -> String {
        // Stage 1: character-level fixes
        let mut result = self.fix_characters(text);

        // Stage 2: line-level cleanup
        result = self.clean_lines(&result);

        // Stage 3: document-level structure
        result = result.trim().to_string();
        if self.options.truncate_references {
            result = self.truncate_references(&result);
        }

        if self.options.max_consecutive_newlines > 0 {
            result = self.limit_newlines(&result);
        }

        result.trim().to_string()
    }

    /// Check if a line is a figure caption.
    pub fn is_caption(&self, line: &str) -> bool {
        self.caption_regex.is_match(line.trim())
    }

    fn fix_characters(&self, text: &str) -> String {
        let mut result = if self.options.normalize_unicode {
            text.nfc().collect()
        } else {
            text.to_string()
        };

        if self.options.fix_ligatures {
            for (ligature, replacement) in &self.ligature_map {
                result = result.replace(ligature, replacement);
            }
        }

        if self.options.remove_pua {
            result = remove_pua_chars(&result);
        }

        if self.options.remove_replacement_char {
            result = result.replace('\u{FFFD}', "");
        }

        result
    }

    fn clean_lines(&self, text: &str) -> String {
        let mut lines: Vec<String> = Vec::new();
        for line in text.lines() {
            if self.options.remove_figure_captions && self.is_caption(line) {
                log::trace!("Dropping caption line: {}", line.trim());
                continue;
            }
            if self.options.normalize_whitespace {
                lines.push(self.whitespace_regex.replace_all(line, " ").trim().to_string());
            } else {
                lines.push(line.to_string());
            }
        }
        lines.join("\n")
    }

    fn truncate_references(&self, text: &str) -> String {
        match self.references_regex.find(text) {
            Some(m) => {
                log::debug!("Truncating text at references (byte {})", m.start());
                text[..m.start()].to_string()
            }
            None => text.to_string(),
        }
    }

    fn limit_newlines(&self, text: &str) -> String {
        let max = self.options.max_consecutive_newlines as usize;
        let pattern = format!(r"\n{{{},}}", max + 1);
        let re = Regex::new(&pattern).unwrap();
        let replacement = "\n".repeat(max);
        re.replace_all(text, replacement.as_str()).to_string()
    }
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::new(CleanupOptions::default())
    }
}

fn remove_pua_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            let code = *c as u32;
            !(0xE000..=0xF8FF).contains(&code)
                && !(0xF0000..=0xFFFFD).contains(&code)
                && !(0x100000..=0x10FFFD).contains(&code)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_removed() {
        let pipeline = CleanupPipeline::default();
        let text = "Intro paragraph.\nFigure 3: results overview\nMore body text.";
        assert_eq!(pipeline.process(text), "Intro paragraph.\nMore body text.");
    }

    #[test]
    fn test_caption_variants() {
        let pipeline = CleanupPipeline::default();
        assert!(pipeline.is_caption("Fig. 2 Sample images"));
        assert!(pipeline.is_caption("  FIGURE 10. Architecture"));
        assert!(pipeline.is_caption("fig.4: plot"));
        assert!(!pipeline.is_caption("Figure 3:"));
        assert!(!pipeline.is_caption("As Figure 3 shows, the model converges."));
        assert!(!pipeline.is_caption("Figures 1 and 2 compare"));
    }

    #[test]
    fn test_references_truncated() {
        let pipeline = CleanupPipeline::default();
        let text = "Conclusion text.\nReferences\n[1] A. Author. A paper.\nMore text";
        assert_eq!(pipeline.process(text), "Conclusion text.");

        // Mid-line and lower-case occurrences do not truncate
        let text = "See the References section.\nreferences are listed";
        assert_eq!(pipeline.process(text), text);

        // Word boundary required
        let text = "Body.\nReferenced work follows";
        assert_eq!(pipeline.process(text), text);
    }

    #[test]
    fn test_ligature_fix() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Standard);
        assert_eq!(pipeline.process("ﬁnding ﬂowers"), "finding flowers");
    }

    #[test]
    fn test_unicode_normalization() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Standard);
        let decomposed = "cafe\u{0301}";
        assert_eq!(pipeline.process(decomposed), "caf\u{00E9}");
    }

    #[test]
    fn test_minimal_keeps_captions_and_references() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Minimal);
        let text = "Body   text\nFigure 1: a plot\nReferences\n[1] x";
        assert_eq!(
            pipeline.process(text),
            "Body text\nFigure 1: a plot\nReferences\n[1] x"
        );
    }

    #[test]
    fn test_aggressive_removes_junk_and_blank_runs() {
        let pipeline = CleanupPipeline::from_preset(CleanupPreset::Aggressive);
        let text = "Hello\u{FFFD}World\u{E000}\n\n\n\nNext   line  ";
        assert_eq!(pipeline.process(text), "HelloWorld\n\nNext line");
    }

    #[test]
    fn test_idempotent_on_all_presets() {
        let inputs = [
            "  References\nleading spaces hide the heading",
            "Title\n\n\n\nFigure 1: x\n\nBody ﬁrst\t\ttabs\nReferences\n[1] y",
            "line one  \n   \n\nFig. 7. caption\nline two\u{FFFD}",
            "",
            "\n\n\n",
        ];
        for preset in [
            CleanupPreset::Minimal,
            CleanupPreset::Standard,
            CleanupPreset::Aggressive,
        ] {
            let pipeline = CleanupPipeline::from_preset(preset);
            for input in inputs {
                let once = pipeline.process(input);
                let twice = pipeline.process(&once);
                assert_eq!(once, twice, "{:?} not idempotent on {:?}", preset, input);
            }
        }
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("Aggressive".parse::<CleanupPreset>(), Ok(CleanupPreset::Aggressive));
        assert!("heavy".parse::<CleanupPreset>().is_err());
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: CleanupOptions =
            serde_json::from_str(r#"{"truncate_references": false}"#).unwrap();
        assert!(!options.truncate_references);
        assert!(options.remove_figure_captions);
    }
}
