use crate::AssetError;
use crate::asset::{Asset, AssetContent, AssetKind, ImageAsset, LoadState, ModelAsset, ShaderKind};
use crate::loader::{AssetLoader, LoadedPayload};
use crate::path::resolve_path;
use mazeworld_render::VisualNode;
use std::collections::BTreeMap;
use std::fmt;

/// Images every engine registers unless told otherwise.
pub const DEFAULT_IMAGES: [(&str, &str); 5] = [
    ("ceiling", "assets/img/ceiling.png"),
    ("floor", "assets/img/floor.png"),
    ("wall", "assets/img/wall.png"),
    ("globe", "assets/img/globe.png"),
    ("ponycloud", "assets/img/ponycloud.png"),
];

/// Models every engine registers unless told otherwise.
pub const DEFAULT_MODELS: [(&str, &str); 2] = [
    ("N64", "assets/n64/scene.gltf"),
    ("marbletest", "assets/marbletest2.gltf"),
];

/// Snapshot of loading progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: usize,
    pub total: usize,
    pub failed: usize,
}

impl LoadProgress {
    pub fn is_complete(&self) -> bool {
        self.loaded == self.total
    }
}

impl fmt::Display for LoadProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} loaded", self.loaded, self.total)?;
        if self.failed > 0 {
            write!(f, ", {} failed", self.failed)?;
        }
        Ok(())
    }
}

/// Named assets plus the loader that fills them in.
///
/// Assets are keyed by name; registering a name twice replaces the earlier
/// entry and issues a fresh request. Loaders complete a name's requests in
/// the order they were made, so results for a replaced request are counted
/// off and dropped.
pub struct AssetRegistry {
    path_root: String,
    image_shader: ShaderKind,
    assets: BTreeMap<String, Asset>,
    superseded: BTreeMap<String, u32>,
    loader: Box<dyn AssetLoader>,
}

impl AssetRegistry {
    pub fn new(path_root: impl Into<String>, loader: Box<dyn AssetLoader>) -> Self {
        Self {
            path_root: path_root.into(),
            image_shader: ShaderKind::default(),
            assets: BTreeMap::new(),
            superseded: BTreeMap::new(),
            loader,
        }
    }

    /// Shader image tiles loaded from now on are built with.
    pub fn set_image_shader(&mut self, shader: ShaderKind) {
        self.image_shader = shader;
    }

    pub fn image_shader(&self) -> ShaderKind {
        self.image_shader
    }

    pub fn path_root(&self) -> &str {
        &self.path_root
    }

    /// Register an asset at a path relative to the root and request it.
    pub fn register(&mut self, name: &str, relative_path: &str, kind: AssetKind) {
        let path = resolve_path(&self.path_root, relative_path);
        let mut asset = Asset::new(name, path, kind);
        asset.attempts = 1;
        if self.assets.get(name).is_some_and(|old| old.state == LoadState::Pending) {
            tracing::debug!(name, "replacing asset with a load in flight");
            *self.superseded.entry(name.to_string()).or_default() += 1;
        }
        self.loader.request(name, &asset.path, kind);
        self.assets.insert(name.to_string(), asset);
    }

    /// Register the stock image and model set.
    pub fn register_defaults(&mut self) {
        for (name, path) in DEFAULT_IMAGES {
            self.register(name, path, AssetKind::Image);
        }
        for (name, path) in DEFAULT_MODELS {
            self.register(name, path, AssetKind::Model);
        }
    }

    /// Drain the loader and fold completed loads into their assets.
    pub fn poll(&mut self) -> LoadProgress {
        for result in self.loader.poll() {
            if let Some(stale) = self.superseded.get_mut(&result.name) {
                *stale -= 1;
                if *stale == 0 {
                    self.superseded.remove(&result.name);
                }
                tracing::debug!(name = %result.name, "dropping result of replaced request");
                continue;
            }
            let Some(asset) = self.assets.get_mut(&result.name) else {
                tracing::warn!(name = %result.name, "load finished for unregistered asset");
                continue;
            };
            if asset.loaded() {
                continue;
            }
            match result.outcome {
                Ok(payload) => {
                    asset.content = Some(match payload {
                        LoadedPayload::Image { width, height } => AssetContent::Image(
                            ImageAsset::new(&asset.name, &asset.path, width, height, self.image_shader),
                        ),
                        LoadedPayload::Model(root) => AssetContent::Model(ModelAsset::new(root)),
                    });
                    asset.state = LoadState::Loaded;
                    tracing::debug!(name = %asset.name, kind = %asset.kind, "asset loaded");
                }
                Err(e) => {
                    tracing::warn!(name = %asset.name, attempt = asset.attempts, error = %e, "asset failed to load");
                    asset.state = LoadState::Failed(e.to_string());
                }
            }
        }
        self.progress()
    }

    /// Re-request a failed asset. Returns the attempt number now in flight.
    pub fn retry(&mut self, name: &str) -> Result<u32, AssetError> {
        let asset = self
            .assets
            .get_mut(name)
            .ok_or_else(|| AssetError::NotFound(name.to_string()))?;
        if !asset.failed() {
            return Err(AssetError::NotFailed(name.to_string()));
        }
        asset.state = LoadState::Pending;
        asset.attempts += 1;
        tracing::info!(name, attempt = asset.attempts, "retrying asset load");
        self.loader.request(name, &asset.path, asset.kind);
        Ok(asset.attempts)
    }

    pub fn progress(&self) -> LoadProgress {
        LoadProgress {
            loaded: self.assets.values().filter(|a| a.loaded()).count(),
            total: self.assets.len(),
            failed: self.assets.values().filter(|a| a.failed()).count(),
        }
    }

    pub fn all_loaded(&self) -> bool {
        self.assets.values().all(Asset::loaded)
    }

    /// Assets currently in the failed state.
    pub fn failed(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values().filter(|a| a.failed())
    }

    pub fn get(&self, name: &str) -> Option<&Asset> {
        self.assets.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// A fresh visual instance of a loaded asset.
    pub fn instantiate(&self, name: &str) -> Result<VisualNode, AssetError> {
        let asset = self
            .assets
            .get(name)
            .ok_or_else(|| AssetError::NotFound(name.to_string()))?;
        asset
            .instance()
            .ok_or_else(|| AssetError::NotLoaded(name.to_string()))
    }
}

impl fmt::Debug for AssetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetRegistry")
            .field("path_root", &self.path_root)
            .field("image_shader", &self.image_shader)
            .field("assets", &self.assets)
            .finish_non_exhaustive()
    }
}
