pub mod atlas;
pub mod registry;
