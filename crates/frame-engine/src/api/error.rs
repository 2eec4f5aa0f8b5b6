use thiserror::Error;

use crate::api::types::SceneIndex;

/// Errors raised while parsing or resolving a texture atlas.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("atlas descriptor is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("texture name {0:?} appears more than once in the atlas")]
    DuplicateTexture(String),

    #[error("failed to load image {source_path:?}: {reason}")]
    ImageLoad { source_path: String, reason: String },

    #[error("texture {name:?} has an empty source rect")]
    EmptySourceRect { name: String },
}

/// Rejected scene mutations. Non-fatal: the scene is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("sprite tag {0:?} already exists in this scene")]
    DuplicateSpriteTag(String),

    #[error("sprite tag {0:?} does not exist in this scene")]
    UnknownSpriteTag(String),
}

/// Engine-level failures.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no scene registered at index {0}")]
    UnknownScene(SceneIndex),

    #[error("no scene tagged {0:?}")]
    UnknownSceneTag(String),

    #[error("scene change to {requested} refused: transition to {target} still in progress")]
    TransitionInProgress { requested: SceneIndex, target: SceneIndex },

    #[error("frame requested with no active scene")]
    NoActiveScene,

    #[error("frame loop started before a texture atlas was loaded")]
    AtlasNotLoaded,

    #[error("invalid engine config: {0}")]
    Config(serde_json::Error),

    #[error("failed to serialise frame: {0}")]
    Frame(serde_json::Error),

    #[error(transparent)]
    Atlas(#[from] AtlasError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

pub type Result<T> = std::result::Result<T, EngineError>;
