use crate::props::{RenderProps, parse_sidecar};
use mazeworld_common::Transform;
use mazeworld_render::{CornerValues, Lighting, Material, TextureSampling, VisualNode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What an asset is loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetKind {
    Image,
    Model,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Image => write!(f, "image"),
            AssetKind::Model => write!(f, "model"),
        }
    }
}

/// Load latch of an asset. `Loaded` is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loaded,
    Failed(String),
}

/// Shader an image tile is built with. Decides which lighting inputs the
/// tile material carries and so which receiver script drives it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderKind {
    /// Bilinear light from four corner values.
    #[default]
    FourCornerLit,
    /// One light value per tile.
    SingleLit,
    /// Backend standard material, transparent, no maze lighting.
    Standard,
}

/// An image turned into a unit square tile.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub natural_width: u32,
    pub natural_height: u32,
    pub shader: ShaderKind,
    template: VisualNode,
}

impl ImageAsset {
    pub fn new(name: &str, path: &str, width: u32, height: u32, shader: ShaderKind) -> Self {
        let (lighting, transparent) = match shader {
            ShaderKind::FourCornerLit => (Lighting::FourCorner(CornerValues::splat(1.0)), false),
            ShaderKind::SingleLit => (Lighting::Single(1.0), false),
            ShaderKind::Standard => (Lighting::Unlit, true),
        };
        let template = VisualNode {
            material: Some(Material {
                name: name.to_string(),
                texture: Some(path.to_string()),
                sampling: TextureSampling::TILED_NEAREST,
                transparent,
                lighting,
                ..Material::default()
            }),
            receive_shadow: true,
            cast_shadow: true,
            ..VisualNode::group(name)
        };
        Self {
            natural_width: width,
            natural_height: height,
            shader,
            template,
        }
    }

    /// A fresh tile with its own material.
    pub fn instance(&self) -> VisualNode {
        self.template.clone()
    }
}

/// One node of an imported model scene graph, before overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelNode {
    pub name: String,
    pub transform: Transform,
    pub material: Option<Material>,
    /// Raw `three_props` JSON of the node.
    pub sidecar: Option<String>,
    /// Raw `three_props` JSON of the node's material.
    pub material_sidecar: Option<String>,
    pub children: Vec<ModelNode>,
}

impl ModelNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_child(mut self, child: ModelNode) -> Self {
        self.children.push(child);
        self
    }

    /// Build a visual subtree, resolving property overrides on the way down.
    pub fn instantiate(&self, inherited: RenderProps) -> VisualNode {
        let props = match &self.sidecar {
            Some(raw) => inherited.merged(&parse_sidecar(&self.name, raw)),
            None => inherited,
        };

        let mut node = VisualNode {
            name: self.name.clone(),
            transform: self.transform,
            material: self.material.clone(),
            ..Default::default()
        };
        props.apply_to(&mut node);

        if let (Some(raw), Some(material)) = (&self.material_sidecar, node.material.as_mut()) {
            material.transparent = props
                .merged(&parse_sidecar(&material.name, raw))
                .transparent;
        }

        node.children = self
            .children
            .iter()
            .map(|child| child.instantiate(props))
            .collect();
        node
    }
}

/// A loaded model scene graph.
#[derive(Debug, Clone)]
pub struct ModelAsset {
    root: ModelNode,
}

impl ModelAsset {
    pub fn new(root: ModelNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &ModelNode {
        &self.root
    }

    /// A fresh copy of the scene with overrides applied from the defaults.
    pub fn instance(&self) -> VisualNode {
        self.root.instantiate(RenderProps::default())
    }
}

/// Loaded content of an asset.
#[derive(Debug, Clone)]
pub enum AssetContent {
    Image(ImageAsset),
    Model(ModelAsset),
}

/// A named resource tracked by the registry.
#[derive(Debug, Clone)]
pub struct Asset {
    pub name: String,
    /// Resolved path the loader was asked for.
    pub path: String,
    pub kind: AssetKind,
    pub state: LoadState,
    pub content: Option<AssetContent>,
    /// Number of load requests issued so far.
    pub attempts: u32,
}

impl Asset {
    pub fn new(name: impl Into<String>, path: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind,
            state: LoadState::Pending,
            content: None,
            attempts: 0,
        }
    }

    pub fn loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    pub fn failed(&self) -> bool {
        matches!(self.state, LoadState::Failed(_))
    }

    /// A fresh visual instance, or `None` until the asset has loaded.
    pub fn instance(&self) -> Option<VisualNode> {
        match self.content.as_ref()? {
            AssetContent::Image(image) => Some(image.instance()),
            AssetContent::Model(model) => Some(model.instance()),
        }
    }

    pub fn image(&self) -> Option<&ImageAsset> {
        match &self.content {
            Some(AssetContent::Image(image)) => Some(image),
            _ => None,
        }
    }
}
