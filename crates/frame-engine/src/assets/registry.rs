use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::error::AtlasError;
use crate::api::types::{Color, Rect};
use crate::assets::atlas::{AnchorUnits, AtlasData, TextureDescriptor};

/// Opaque handle to a loaded image, owned by the presenting backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle(pub u32);

/// Resolves atlas image sources to backend image handles.
///
/// Loading may be asynchronous on the host; by the time the engine asks,
/// every image must be available or the whole atlas load fails.
pub trait ImageLoader {
    fn load(&mut self, source: &str) -> Result<ImageHandle, String>;
}

/// Hands out handles in request order. Used when the host has already loaded
/// the images in atlas order.
#[derive(Debug, Clone, Default)]
pub struct SequentialImages {
    available: u32,
    next: u32,
}

impl SequentialImages {
    pub fn new(available: u32) -> Self {
        Self { available, next: 0 }
    }
}

impl ImageLoader for SequentialImages {
    fn load(&mut self, source: &str) -> Result<ImageHandle, String> {
        if self.next >= self.available {
            return Err(format!("only {} images were loaded, {source:?} has none", self.available));
        }
        let handle = ImageHandle(self.next);
        self.next += 1;
        Ok(handle)
    }
}

/// One precomputed intensity-decayed variant of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayFrame {
    /// Multiplier applied to the colour channels (1.0 = original brightness).
    pub intensity: f32,
    /// Colour the frame drifts toward, if the atlas names one.
    pub settle_color: Option<Color>,
    /// How far toward `settle_color` this frame has drifted (0..1).
    pub settle_mix: f32,
}

/// A texture resolved against its loaded image.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRecord {
    pub name: String,
    pub image: ImageHandle,
    pub source: Rect,
    /// Always fractional (0..1 of width/height).
    pub anchor: Vec2,
    pub rotation_degrees: f32,
    /// Brightest first. Empty when the atlas asked for no decay levels.
    pub decay_frames: Vec<DecayFrame>,
}

impl TextureRecord {
    fn resolve(desc: &TextureDescriptor, image: ImageHandle) -> Result<Self, AtlasError> {
        let rect = desc.source.rect();
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return Err(AtlasError::EmptySourceRect { name: desc.name.clone() });
        }
        let anchor = match desc.anchor_units {
            AnchorUnits::Fraction => Vec2::new(desc.anchor.x, desc.anchor.y),
            AnchorUnits::Pixels => Vec2::new(desc.anchor.x / rect.width, desc.anchor.y / rect.height),
        };
        Ok(Self {
            name: desc.name.clone(),
            image,
            source: Rect::new(rect.x, rect.y, rect.width, rect.height),
            anchor,
            rotation_degrees: desc.rotation_degrees,
            decay_frames: decay_frames(desc.intensity_decay_levels, desc.settle_color),
        })
    }

    /// Anchor converted to pixels of this texture.
    pub fn anchor_pixels(&self) -> Vec2 {
        Vec2::new(self.anchor.x * self.source.width, self.anchor.y * self.source.height)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.source.width, self.source.height)
    }

    pub fn has_decay_frames(&self) -> bool {
        !self.decay_frames.is_empty()
    }
}

/// Build `levels` decay frames, index 0 brightest.
pub fn decay_frames(levels: u32, settle_color: Option<Color>) -> Vec<DecayFrame> {
    let step = if levels > 0 { 1.0 / levels as f32 } else { 0.0 };
    (0..levels)
        .map(|i| {
            let rate = step * i as f32;
            DecayFrame {
                intensity: 1.0 - rate,
                settle_color,
                settle_mix: if settle_color.is_some() { rate } else { 0.0 },
            }
        })
        .collect()
}

/// Texture name → resolved record. Populated once at startup; read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct TextureMap {
    textures: HashMap<String, TextureRecord>,
}

impl TextureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every texture in `atlas`. All-or-nothing: any duplicate name,
    /// empty region, or image failure leaves nothing behind.
    pub fn from_atlas(atlas: &AtlasData, loader: &mut dyn ImageLoader) -> Result<Self, AtlasError> {
        let mut textures = HashMap::with_capacity(atlas.texture_count());
        for image in &atlas.images {
            let handle = loader.load(&image.image_source).map_err(|reason| AtlasError::ImageLoad {
                source_path: image.image_source.clone(),
                reason,
            })?;
            for desc in &image.textures {
                if textures.contains_key(&desc.name) {
                    return Err(AtlasError::DuplicateTexture(desc.name.clone()));
                }
                let record = TextureRecord::resolve(desc, handle)?;
                log::debug!("created texture: {}", record.name);
                textures.insert(desc.name.clone(), record);
            }
        }
        Ok(Self { textures })
    }

    /// Merge another map in. Names already present are rejected before anything is inserted.
    pub fn extend(&mut self, other: TextureMap) -> Result<(), AtlasError> {
        if let Some(name) = other.textures.keys().find(|name| self.textures.contains_key(*name)) {
            return Err(AtlasError::DuplicateTexture(name.clone()));
        }
        self.textures.extend(other.textures);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TextureRecord> {
        self.textures.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.textures.contains_key(name)
    }

    /// Width and height of a texture, if loaded.
    pub fn size(&self, name: &str) -> Option<Vec2> {
        self.get(name).map(TextureRecord::size)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
