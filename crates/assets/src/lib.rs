//! Assets: named images and models that produce fresh visual instances.
//!
//! Loading goes through an [`AssetLoader`]; the [`AssetRegistry`] tracks
//! each asset's load latch and reports progress so the engine can gate its
//! tick loop on it.
//!
//! # Invariants
//! - `LoadState::Loaded` is terminal; a loaded asset is never reloaded.
//! - Every instance is an independent copy, materials included.
//! - Model instances carry resolved render property overrides; a malformed
//!   sidecar only affects its own node.

pub mod asset;
pub mod gltf;
pub mod loader;
pub mod path;
pub mod props;
pub mod registry;

pub use asset::{Asset, AssetContent, AssetKind, ImageAsset, LoadState, ModelAsset, ModelNode, ShaderKind};
pub use loader::{AssetLoader, BuiltinLoader, FsLoader, LoadResult, LoadedPayload};
pub use path::resolve_path;
pub use props::{PropOverrides, RenderProps};
pub use registry::{AssetRegistry, DEFAULT_IMAGES, DEFAULT_MODELS, LoadProgress};

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("glTF parse error: {0}")]
    Gltf(String),
    #[error("asset source unavailable: {0}")]
    Unavailable(String),
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("asset not loaded yet: {0}")]
    NotLoaded(String),
    #[error("asset has not failed: {0}")]
    NotFailed(String),
}

pub fn crate_info() -> &'static str {
    "mazeworld-assets v0.1.0"
}
