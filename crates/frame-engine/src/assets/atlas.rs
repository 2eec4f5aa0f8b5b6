use serde::{Deserialize, Serialize};

use crate::api::error::AtlasError;
use crate::api::types::Color;

/// Texture atlas descriptor: an ordered list of images and the named regions
/// cut out of each. Loaded from JSON before the frame loop starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AtlasData {
    pub images: Vec<AtlasImage>,
}

/// One source image and the textures it contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtlasImage {
    /// Image URL or path, resolved by an `ImageLoader`.
    #[serde(alias = "imageFile")]
    pub image_source: String,
    #[serde(default)]
    pub textures: Vec<TextureDescriptor>,
}

/// A named region of an atlas image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureDescriptor {
    /// Unique across the whole atlas.
    pub name: String,
    /// Region of the source image. The legacy flat `x/y/width/height` form is accepted too.
    #[serde(flatten)]
    pub source: SourceRegion,
    /// Base rotation applied to every draw of this texture.
    #[serde(default, alias = "rotate")]
    pub rotation_degrees: f32,
    #[serde(default = "centered_anchor")]
    pub anchor: Anchor,
    #[serde(default)]
    pub anchor_units: AnchorUnits,
    /// Number of precomputed intensity-decayed frames (0 = none).
    #[serde(default, alias = "intensityDecay")]
    pub intensity_decay_levels: u32,
    /// Colour the decay frames drift toward.
    #[serde(default)]
    pub settle_color: Option<Color>,
}

/// Either `sourceRect: {x, y, width, height}` or flat fields on the texture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceRegion {
    Nested {
        #[serde(rename = "sourceRect")]
        source_rect: SourceRect,
    },
    Flat(SourceRect),
}

impl SourceRegion {
    pub fn rect(&self) -> SourceRect {
        match *self {
            SourceRegion::Nested { source_rect } => source_rect,
            SourceRegion::Flat(rect) => rect,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

/// How the descriptor's anchor is expressed. Resolved textures always use fractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorUnits {
    /// 0..1 of the texture's width and height.
    #[default]
    Fraction,
    /// Absolute pixel offsets from the region's top-left corner.
    Pixels,
}

fn centered_anchor() -> Anchor {
    Anchor { x: 0.5, y: 0.5 }
}

impl AtlasData {
    /// Parse an atlas descriptor from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, AtlasError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Total number of textures across all images.
    pub fn texture_count(&self) -> usize {
        self.images.iter().map(|image| image.textures.len()).sum()
    }
}
