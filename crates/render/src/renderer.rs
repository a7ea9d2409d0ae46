use crate::scene::Scene;
use glam::Vec3;
use std::fmt::Write;

/// Camera state handed to the renderer each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    /// Camera position in world space.
    pub position: Vec3,
    /// Euler rotation in radians; yaw is `rotation.y`.
    pub rotation: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            fov_degrees: 75.0,
        }
    }
}

/// Renderer-agnostic interface. All render backends implement this trait.
///
/// The renderer reads the scene and camera and produces output. It never
/// mutates the scene; scene contents are owned by the engine.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Draw one frame.
    fn render(&mut self, scene: &Scene, camera: &CameraView) -> Self::Output;
}

/// Renderer that draws nothing. For headless runs that only need the
/// simulation.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    type Output = ();

    fn render(&mut self, _scene: &Scene, _camera: &CameraView) {}
}

/// Debug text renderer.
///
/// Produces a human-readable listing of the scene roots and camera. Useful
/// for CLI output, logging, and testing the render boundary.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, scene: &Scene, camera: &CameraView) -> String {
        self.frames += 1;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {} ({} roots) ===",
            self.frames,
            scene.len()
        );
        let _ = writeln!(
            out,
            "Camera: pos=({:.1}, {:.1}, {:.1}) yaw={:.2} fov={:.0}",
            camera.position.x,
            camera.position.y,
            camera.position.z,
            camera.rotation.y,
            camera.fov_degrees
        );

        for (id, root) in scene.roots() {
            let p = root.transform.position;
            let s = root.transform.scale;
            let _ = writeln!(
                out,
                "  [{}] {} pos=({:.1}, {:.1}, {:.1}) scale=({:.2}, {:.2}, {:.2}) nodes={}",
                id.0,
                root.name,
                p.x,
                p.y,
                p.z,
                s.x,
                s.y,
                s.z,
                root.node_count()
            );
        }

        out
    }
}
