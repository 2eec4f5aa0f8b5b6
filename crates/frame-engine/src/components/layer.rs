use std::collections::{BTreeMap, HashMap};

use crate::api::error::SceneError;
use crate::components::sprite::Sprite;

/// Sprites grouped by layer number.
///
/// Layers iterate in ascending order; sprites within a layer keep insertion
/// order. Tags are unique across all layers. A layer whose last sprite is
/// removed is pruned immediately.
#[derive(Debug, Clone, Default)]
pub struct SpriteLayers {
    layers: BTreeMap<i32, Vec<Sprite>>,
    /// tag → layer number
    index: HashMap<String, i32>,
}

impl SpriteLayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a sprite into its layer, creating the layer on demand.
    pub fn add(&mut self, sprite: Sprite) -> Result<(), SceneError> {
        if self.index.contains_key(sprite.tag()) {
            return Err(SceneError::DuplicateSpriteTag(sprite.tag().to_string()));
        }
        self.index.insert(sprite.tag().to_string(), sprite.layer());
        self.layers.entry(sprite.layer()).or_default().push(sprite);
        Ok(())
    }

    /// Remove the sprite with `tag`, returning it.
    pub fn remove(&mut self, tag: &str) -> Result<Sprite, SceneError> {
        let layer_no = self
            .index
            .remove(tag)
            .ok_or_else(|| SceneError::UnknownSpriteTag(tag.to_string()))?;
        let layer = self
            .layers
            .get_mut(&layer_no)
            .ok_or_else(|| SceneError::UnknownSpriteTag(tag.to_string()))?;
        let pos = layer
            .iter()
            .position(|s| s.tag() == tag)
            .ok_or_else(|| SceneError::UnknownSpriteTag(tag.to_string()))?;
        let sprite = layer.remove(pos);
        if layer.is_empty() {
            self.layers.remove(&layer_no);
        }
        Ok(sprite)
    }

    pub fn get(&self, tag: &str) -> Option<&Sprite> {
        let layer = self.index.get(tag)?;
        self.layers.get(layer)?.iter().find(|s| s.tag() == tag)
    }

    /// Mutable access for in-place updates. Tag and layer stay read-only
    /// here; use `set_layer` to move a sprite.
    pub fn get_mut(&mut self, tag: &str) -> Option<&mut Sprite> {
        let layer = self.index.get(tag)?;
        self.layers.get_mut(layer)?.iter_mut().find(|s| s.tag() == tag)
    }

    /// Move the sprite with `tag` to the end of `layer`, pruning the layer it
    /// left if that one is now empty.
    pub fn set_layer(&mut self, tag: &str, layer: i32) -> Result<(), SceneError> {
        let current = *self
            .index
            .get(tag)
            .ok_or_else(|| SceneError::UnknownSpriteTag(tag.to_string()))?;
        if current == layer {
            return Ok(());
        }
        let mut sprite = self.remove(tag)?;
        sprite.set_layer(layer);
        self.add(sprite)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.index.contains_key(tag)
    }

    /// All sprites in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Sprite> {
        self.layers.values().flatten()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Sprite> {
        self.layers.values_mut().flatten()
    }

    /// Layer numbers currently holding at least one sprite, ascending.
    pub fn layer_numbers(&self) -> impl Iterator<Item = i32> + '_ {
        self.layers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn clear(&mut self) {
        self.layers.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_get() {
        let mut layers = SpriteLayers::new();
        layers.add(Sprite::new("a.png", 0, "a").with_position(1.0, 2.0)).unwrap();
        let s = layers.get("a").unwrap();
        assert_eq!(s.position.x, 1.0);
        assert_eq!(layers.len(), 1);
    }

    #[test]
    fn duplicate_tag_across_layers_is_rejected() {
        let mut layers = SpriteLayers::new();
        layers.add(Sprite::new("a.png", 0, "hero")).unwrap();
        let err = layers.add(Sprite::new("b.png", 5, "hero")).unwrap_err();
        assert_eq!(err, SceneError::DuplicateSpriteTag("hero".into()));
        assert_eq!(layers.get("hero").unwrap().texture, "a.png");
        assert_eq!(layers.layer_count(), 1);
    }

    #[test]
    fn remove_prunes_empty_layer() {
        let mut layers = SpriteLayers::new();
        layers.add(Sprite::new("a.png", 3, "a")).unwrap();
        layers.add(Sprite::new("b.png", 1, "b")).unwrap();
        layers.remove("a").unwrap();
        assert_eq!(layers.layer_numbers().collect::<Vec<_>>(), vec![1]);
        assert!(layers.get("a").is_none());
    }

    #[test]
    fn remove_unknown_is_rejected() {
        let mut layers = SpriteLayers::new();
        layers.add(Sprite::new("a.png", 0, "a")).unwrap();
        assert_eq!(layers.remove("zzz").unwrap_err(), SceneError::UnknownSpriteTag("zzz".into()));
        assert_eq!(layers.len(), 1);
    }

    #[test]
    fn iteration_is_layer_then_insertion_order() {
        let mut layers = SpriteLayers::new();
        layers.add(Sprite::new("t", 2, "c")).unwrap();
        layers.add(Sprite::new("t", -1, "a")).unwrap();
        layers.add(Sprite::new("t", 2, "d")).unwrap();
        layers.add(Sprite::new("t", 0, "b")).unwrap();
        let tags: Vec<&str> = layers.iter().map(Sprite::tag).collect();
        assert_eq!(tags, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut layers = SpriteLayers::new();
        layers.add(Sprite::new("t", 0, "a")).unwrap();
        layers.get_mut("a").unwrap().set_position(5.0, 6.0, 30.0);
        assert_eq!(layers.get("a").unwrap().rotation, 30.0);
    }

    #[test]
    fn set_layer_moves_between_buckets() {
        let mut layers = SpriteLayers::new();
        layers.add(Sprite::new("t", 0, "a")).unwrap();
        layers.add(Sprite::new("t", 4, "b")).unwrap();
        layers.add(Sprite::new("t", 4, "c")).unwrap();

        layers.set_layer("a", 4).unwrap();
        assert_eq!(layers.layer_numbers().collect::<Vec<_>>(), vec![4]);
        assert_eq!(layers.get("a").unwrap().layer(), 4);
        assert_eq!(layers.iter().map(Sprite::tag).collect::<Vec<_>>(), vec!["b", "c", "a"]);

        assert_eq!(layers.set_layer("zzz", 1).unwrap_err(), SceneError::UnknownSpriteTag("zzz".into()));
        assert_eq!(layers.len(), 3);
    }

    #[test]
    fn removal_after_in_place_edits_still_finds_sprite() {
        let mut layers = SpriteLayers::new();
        layers.add(Sprite::new("t", 0, "a")).unwrap();
        let sprite = layers.get_mut("a").unwrap();
        sprite.texture = "u".into();
        sprite.set_position(3.0, 4.0, 90.0);

        assert_eq!(layers.add(Sprite::new("t", 0, "a")).unwrap_err(), SceneError::DuplicateSpriteTag("a".into()));
        let removed = layers.remove("a").unwrap();
        assert_eq!(removed.texture, "u");
        assert!(layers.is_empty());
        assert_eq!(layers.iter().count(), 0);
    }
}
