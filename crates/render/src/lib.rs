//! Rendering Adapter: renderer-agnostic visual data and the render boundary.
//!
//! # Invariants
//! - Visual trees are plain data; the engine writes transforms and material
//!   parameters into them, the renderer only reads.
//! - A visual root is in the scene at most once; the scene hands out its id.
//!
//! Mesh, shader and texture construction stay with whatever backend
//! implements [`Renderer`]. [`DebugTextRenderer`] is the headless backend.

mod renderer;
mod scene;
mod visual;

pub use renderer::{CameraView, DebugTextRenderer, NullRenderer, Renderer};
pub use scene::{Scene, VisualId};
pub use visual::{
    CornerValues, Filter, Lighting, Material, TextureSampling, VisualNode, Wrap,
};

pub fn crate_info() -> &'static str {
    "mazeworld-render v0.1.0"
}
