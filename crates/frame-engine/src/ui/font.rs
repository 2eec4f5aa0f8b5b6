use serde::{Deserialize, Serialize};

/// Font face and size, plus the advance ratio used to measure text without a
/// rasteriser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    pub family: String,
    /// Pixel size; also the measured line height.
    pub size: f32,
    /// Average glyph advance as a fraction of `size`.
    pub advance: f32,
}

impl Font {
    pub const DEFAULT_ADVANCE: f32 = 0.55;

    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self { family: family.into(), size, advance: Self::DEFAULT_ADVANCE }
    }

    pub fn with_advance(mut self, advance: f32) -> Self {
        self.advance = advance;
        self
    }

    /// Approximate pixel width of `text`.
    pub fn measure(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.size * self.advance
    }

    /// CSS shorthand, e.g. `16px serif`.
    pub fn css(&self) -> String {
        format!("{}px {}", self.size, self.family)
    }
}

impl Default for Font {
    fn default() -> Self {
        Font::new("serif", 16.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_counts_chars_not_bytes() {
        let font = Font::new("serif", 10.0).with_advance(0.5);
        assert_eq!(font.measure("abcd"), 20.0);
        assert_eq!(font.measure("äö"), 10.0);
        assert_eq!(font.measure(""), 0.0);
    }

    #[test]
    fn css_shorthand() {
        assert_eq!(Font::default().css(), "16px serif");
    }
}
