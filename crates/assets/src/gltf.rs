//! glTF scene graph import.
//!
//! Parses a `.gltf` document or `.glb` container with the `gltf` crate and
//! turns the default scene into a [`ModelNode`] tree. Only the node
//! hierarchy, transforms, first-primitive materials and `three_props` extras
//! are kept; vertex data is left to the render backend.

use crate::AssetError;
use crate::asset::ModelNode;
use glam::{EulerRot, Quat, Vec3};
use gltf::material::AlphaMode;
use gltf::{Gltf, Mesh, Node};
use mazeworld_common::Transform;
use mazeworld_render::Material;
use serde_json::Value;

/// Parse a `.gltf` or `.glb` file into a model tree named `name`.
pub fn parse_model(name: &str, bytes: &[u8]) -> Result<ModelNode, AssetError> {
    let doc = Gltf::from_slice(bytes).map_err(|e| AssetError::Gltf(e.to_string()))?;
    Importer::new(&doc).scene_root(name)
}

/// Extras text as the sidecar protocol expects it: exporters write a JSON
/// string, hand-written files sometimes inline the object.
fn sidecar_text(extras: Option<&str>) -> Option<String> {
    let value: Value = match serde_json::from_str(extras?) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, "unreadable extras");
            return None;
        }
    };
    match value.get("three_props")? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

struct Importer<'a> {
    doc: &'a Gltf,
    on_stack: Vec<bool>,
}

impl<'a> Importer<'a> {
    fn new(doc: &'a Gltf) -> Self {
        Self {
            doc,
            on_stack: vec![false; doc.nodes().len()],
        }
    }

    fn scene_root(&mut self, name: &str) -> Result<ModelNode, AssetError> {
        let scene = self.doc.default_scene().or_else(|| self.doc.scenes().next());
        let (scene_name, roots): (String, Vec<Node<'a>>) = match scene {
            Some(scene) => (
                scene.name().unwrap_or(name).to_string(),
                scene.nodes().collect(),
            ),
            None => (name.to_string(), self.parentless_nodes()),
        };

        let mut root = ModelNode::new(scene_name);
        for node in roots {
            root.children.push(self.node(node)?);
        }
        Ok(root)
    }

    fn parentless_nodes(&self) -> Vec<Node<'a>> {
        let mut has_parent = vec![false; self.doc.nodes().len()];
        for node in self.doc.nodes() {
            for child in node.children() {
                if let Some(flag) = has_parent.get_mut(child.index()) {
                    *flag = true;
                }
            }
        }
        self.doc
            .nodes()
            .filter(|n| !has_parent[n.index()])
            .collect()
    }

    fn node(&mut self, def: Node<'a>) -> Result<ModelNode, AssetError> {
        let index = def.index();
        if self.on_stack[index] {
            return Err(AssetError::Gltf(format!("node {index} is its own ancestor")));
        }
        self.on_stack[index] = true;

        let (material, material_sidecar) = match def.mesh() {
            Some(mesh) => mesh_material(&mesh),
            None => (None, None),
        };

        let mut node = ModelNode {
            name: def
                .name()
                .map_or_else(|| format!("node_{index}"), str::to_string),
            transform: transform_of(&def),
            material,
            sidecar: sidecar_text(def.extras().as_deref().map(|raw| raw.get())),
            material_sidecar,
            children: Vec::new(),
        };
        for child in def.children() {
            node.children.push(self.node(child)?);
        }

        self.on_stack[index] = false;
        Ok(node)
    }
}

fn mesh_material(mesh: &Mesh<'_>) -> (Option<Material>, Option<String>) {
    let Some(primitive) = mesh.primitives().next() else {
        return (Some(Material::default()), None);
    };
    let mat = primitive.material();
    let Some(index) = mat.index() else {
        // glTF default material
        return (Some(Material::default()), None);
    };

    let pbr = mat.pbr_metallic_roughness();
    let base_color = pbr.base_color_factor();
    let texture = pbr
        .base_color_texture()
        .and_then(|info| match info.texture().source().source() {
            gltf::image::Source::Uri { uri, .. } => Some(uri.to_string()),
            gltf::image::Source::View { .. } => None,
        });

    let material = Material {
        name: mat
            .name()
            .map_or_else(|| format!("material_{index}"), str::to_string),
        texture,
        base_color,
        transparent: matches!(mat.alpha_mode(), AlphaMode::Blend),
        opacity: base_color[3],
        ..Material::default()
    };
    let sidecar = sidecar_text(mat.extras().as_deref().map(|raw| raw.get()));
    (Some(material), sidecar)
}

fn transform_of(node: &Node<'_>) -> Transform {
    let (translation, rotation, scale) = node.transform().decomposed();
    let (x, y, z) = Quat::from_array(rotation)
        .normalize()
        .to_euler(EulerRot::XYZ);
    Transform {
        position: Vec3::from_array(translation),
        rotation: Vec3::new(x, y, z),
        scale: Vec3::from_array(scale),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARBLE: &str = r#"{
        "asset": {"version": "2.0"},
        "scene": 0,
        "scenes": [{"name": "Scene", "nodes": [0]}],
        "nodes": [
            {"name": "Marble", "children": [1, 2], "translation": [0, 5, 0],
             "extras": {"three_props": "{\"castShadow\": true}"}},
            {"name": "Glass", "mesh": 0, "scale": [2, 2, 2]},
            {"name": "Core", "mesh": 1,
             "rotation": [0, 0.38268343, 0, 0.9238795],
             "extras": {"three_props": {"transparent": false}}}
        ],
        "meshes": [
            {"primitives": [{"attributes": {}, "material": 0}]},
            {"primitives": [{"attributes": {}}]}
        ],
        "materials": [
            {"name": "glass", "alphaMode": "BLEND",
             "pbrMetallicRoughness": {"baseColorFactor": [0.5, 0.5, 1, 0.25],
                                      "baseColorTexture": {"index": 0}},
             "extras": {"three_props": "{\"transparent\": true}"}}
        ],
        "textures": [{"source": 0}],
        "images": [{"uri": "glass.png"}]
    }"#;

    #[test]
    fn imports_hierarchy_and_transforms() {
        let root = parse_model("marbletest", MARBLE.as_bytes()).unwrap();
        assert_eq!(root.name, "Scene");
        assert_eq!(root.children.len(), 1);

        let marble = &root.children[0];
        assert_eq!(marble.name, "Marble");
        assert_eq!(marble.transform.position, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(marble.transform.scale, Vec3::ONE);
        assert_eq!(marble.sidecar.as_deref(), Some(r#"{"castShadow": true}"#));
        assert!(marble.material.is_none());

        let glass = &marble.children[0];
        assert_eq!(glass.transform.scale, Vec3::splat(2.0));
        assert!(glass.sidecar.is_none());
        let mat = glass.material.as_ref().unwrap();
        assert_eq!(mat.name, "glass");
        assert!(mat.transparent);
        assert_eq!(mat.opacity, 0.25);
        assert_eq!(mat.texture.as_deref(), Some("glass.png"));
        assert_eq!(glass.material_sidecar.as_deref(), Some(r#"{"transparent": true}"#));

        let core = &marble.children[1];
        assert!((core.transform.rotation.y - std::f32::consts::FRAC_PI_4).abs() < 1e-4);
        // inline object sidecars are re-serialised
        assert_eq!(core.sidecar.as_deref(), Some(r#"{"transparent":false}"#));
        assert_eq!(core.material.as_ref().map(|m| m.name.as_str()), Some("default"));
    }

    #[test]
    fn glb_container_is_unwrapped() {
        let mut json = MARBLE.as_bytes().to_vec();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }
        let mut glb = Vec::new();
        glb.extend_from_slice(b"glTF");
        glb.extend_from_slice(&2u32.to_le_bytes());
        glb.extend_from_slice(&((20 + json.len()) as u32).to_le_bytes());
        glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"JSON");
        glb.extend_from_slice(&json);

        let root = parse_model("m", &glb).unwrap();
        assert_eq!(root.children[0].name, "Marble");
    }

    #[test]
    fn truncated_glb_is_an_error() {
        assert!(matches!(
            parse_model("m", b"glTF\x02\x00\x00\x00"),
            Err(AssetError::Gltf(_))
        ));
    }

    #[test]
    fn missing_scene_uses_parentless_nodes() {
        let json = r#"{"asset": {"version": "2.0"},
            "nodes": [{"name": "a", "children": [1]}, {"name": "b"}, {}]}"#;
        let root = parse_model("loose", json.as_bytes()).unwrap();
        assert_eq!(root.name, "loose");
        let names: Vec<_> = root.children.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["a", "node_2"]);
        assert_eq!(root.children[0].children[0].name, "b");
    }

    #[test]
    fn cycles_and_bad_indices_are_errors() {
        let cycle = r#"{"asset": {"version": "2.0"}, "scenes": [{"nodes": [0]}],
            "nodes": [{"children": [1]}, {"children": [0]}]}"#;
        assert!(parse_model("c", cycle.as_bytes()).is_err());

        let dangling = r#"{"asset": {"version": "2.0"}, "scenes": [{"nodes": [3]}], "nodes": []}"#;
        assert!(matches!(
            parse_model("d", dangling.as_bytes()),
            Err(AssetError::Gltf(_))
        ));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            parse_model("x", b"{ nope"),
            Err(AssetError::Gltf(_))
        ));
    }
}
