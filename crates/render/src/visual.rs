use mazeworld_common::{GridPos, Transform};
use serde::{Deserialize, Serialize};

/// Texture addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Wrap {
    Clamp,
    Repeat,
}

/// Texture filtering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    Nearest,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSampling {
    pub wrap: Wrap,
    pub filter: Filter,
}

impl TextureSampling {
    /// Tileable, pixel-crisp sampling used for maze surfaces.
    pub const TILED_NEAREST: TextureSampling = TextureSampling {
        wrap: Wrap::Repeat,
        filter: Filter::Nearest,
    };
}

impl Default for TextureSampling {
    fn default() -> Self {
        Self {
            wrap: Wrap::Clamp,
            filter: Filter::Linear,
        }
    }
}

/// Brightness at the four corners of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CornerValues {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_left: f32,
    pub bottom_right: f32,
}

impl CornerValues {
    pub const fn splat(v: f32) -> Self {
        Self {
            top_left: v,
            top_right: v,
            bottom_left: v,
            bottom_right: v,
        }
    }
}

/// Lighting inputs of a material. Which variant a material carries is the
/// shader it was built with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Lighting {
    /// Standard material, lit by the backend.
    Unlit,
    /// One brightness for the whole surface.
    Single(f32),
    /// Bilinear brightness from the four corners.
    FourCorner(CornerValues),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Texture source path, if textured.
    pub texture: Option<String>,
    pub sampling: TextureSampling,
    pub base_color: [f32; 4],
    pub transparent: bool,
    pub opacity: f32,
    pub lighting: Lighting,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".into(),
            texture: None,
            sampling: TextureSampling::default(),
            base_color: [1.0, 1.0, 1.0, 1.0],
            transparent: false,
            opacity: 1.0,
            lighting: Lighting::Unlit,
        }
    }
}

/// A node of a visual tree. A visual root is just the top node.
///
/// Cloning a node deep-copies its subtree, materials included, so clones
/// can be tinted independently.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisualNode {
    pub name: String,
    pub transform: Transform,
    pub material: Option<Material>,
    pub receive_shadow: bool,
    pub cast_shadow: bool,
    /// The maze cell this node stands for, when it is a per-cell tile.
    pub cell: Option<GridPos>,
    pub children: Vec<VisualNode>,
}

impl VisualNode {
    /// An empty grouping node.
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_child(mut self, child: VisualNode) -> Self {
        self.children.push(child);
        self
    }

    /// Visit this node and every descendant, depth first.
    pub fn visit_mut(&mut self, f: &mut impl FnMut(&mut VisualNode)) {
        f(self);
        for child in &mut self.children {
            child.visit_mut(f);
        }
    }

    pub fn visit(&self, f: &mut impl FnMut(&VisualNode)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }
}
