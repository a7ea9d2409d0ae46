use crate::AssetError;
use crate::asset::{AssetKind, ModelNode};
use crate::gltf::parse_model;
use mazeworld_render::Material;
use std::collections::{BTreeMap, VecDeque};
use std::path::Path;

/// What a finished load produced.
#[derive(Debug, Clone)]
pub enum LoadedPayload {
    Image { width: u32, height: u32 },
    Model(ModelNode),
}

/// Completion of one load request.
#[derive(Debug)]
pub struct LoadResult {
    pub name: String,
    pub outcome: Result<LoadedPayload, AssetError>,
}

/// The asynchronous loading service assets are fetched through.
///
/// `request` starts a load and returns immediately; completed loads are
/// handed back by `poll`, in completion order, exactly once each.
pub trait AssetLoader {
    fn request(&mut self, name: &str, path: &str, kind: AssetKind);

    fn poll(&mut self) -> Vec<LoadResult>;
}

struct Request {
    name: String,
    path: String,
    kind: AssetKind,
}

/// Loads assets from the local filesystem.
///
/// Reading happens on `poll`, one request per call to bound the time spent
/// inside a single poll.
#[derive(Default)]
pub struct FsLoader {
    queue: VecDeque<Request>,
}

impl FsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    fn load(request: &Request) -> Result<LoadedPayload, AssetError> {
        let path = Path::new(&request.path);
        match request.kind {
            AssetKind::Image => {
                let (width, height) = image::image_dimensions(path)?;
                Ok(LoadedPayload::Image { width, height })
            }
            AssetKind::Model => {
                let bytes = std::fs::read(path)?;
                Ok(LoadedPayload::Model(parse_model(&request.name, &bytes)?))
            }
        }
    }
}

impl AssetLoader for FsLoader {
    fn request(&mut self, name: &str, path: &str, kind: AssetKind) {
        tracing::debug!(name, path, %kind, "load requested");
        self.queue.push_back(Request {
            name: name.to_string(),
            path: path.to_string(),
            kind,
        });
    }

    fn poll(&mut self) -> Vec<LoadResult> {
        let Some(request) = self.queue.pop_front() else {
            return Vec::new();
        };
        let outcome = Self::load(&request);
        if let Err(e) = &outcome {
            tracing::warn!(name = %request.name, path = %request.path, error = %e, "asset load failed");
        }
        vec![LoadResult {
            name: request.name,
            outcome,
        }]
    }
}

/// In-memory loader that fabricates payloads without touching the disk.
///
/// Images come back as 64×64 tiles and models as a single textured node,
/// unless a model was supplied with [`BuiltinLoader::with_model`]. Each
/// request completes after `latency` polls. Used by headless runs and tests.
#[derive(Default)]
pub struct BuiltinLoader {
    latency: u32,
    pending: Vec<(Request, u32)>,
    models: BTreeMap<String, ModelNode>,
    failures: BTreeMap<String, u32>,
}

impl BuiltinLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of polls a request stays pending.
    pub fn with_latency(mut self, polls: u32) -> Self {
        self.latency = polls;
        self
    }

    /// Serve `root` for the model named `name`.
    pub fn with_model(mut self, name: &str, root: ModelNode) -> Self {
        self.models.insert(name.to_string(), root);
        self
    }

    /// Make the first `times` requests for `name` fail.
    pub fn fail_first(mut self, name: &str, times: u32) -> Self {
        self.failures.insert(name.to_string(), times);
        self
    }

    fn payload(&self, request: &Request) -> LoadedPayload {
        match request.kind {
            AssetKind::Image => LoadedPayload::Image {
                width: 64,
                height: 64,
            },
            AssetKind::Model => {
                let root = self.models.get(&request.name).cloned().unwrap_or_else(|| {
                    ModelNode::new(request.name.clone()).with_child(ModelNode {
                        material: Some(Material {
                            name: format!("{}_material", request.name),
                            ..Material::default()
                        }),
                        ..ModelNode::new("mesh")
                    })
                });
                LoadedPayload::Model(root)
            }
        }
    }
}

impl AssetLoader for BuiltinLoader {
    fn request(&mut self, name: &str, path: &str, kind: AssetKind) {
        tracing::debug!(name, path, %kind, "builtin load requested");
        self.pending.push((
            Request {
                name: name.to_string(),
                path: path.to_string(),
                kind,
            },
            self.latency,
        ));
    }

    fn poll(&mut self) -> Vec<LoadResult> {
        let mut done = Vec::new();
        let mut waiting = Vec::with_capacity(self.pending.len());
        for (request, remaining) in std::mem::take(&mut self.pending) {
            if remaining > 0 {
                waiting.push((request, remaining - 1));
                continue;
            }
            let outcome = match self.failures.get_mut(&request.name) {
                Some(left) if *left > 0 => {
                    *left -= 1;
                    Err(AssetError::Unavailable(request.path.clone()))
                }
                _ => Ok(self.payload(&request)),
            };
            done.push(LoadResult {
                name: request.name,
                outcome,
            });
        }
        self.pending = waiting;
        done
    }
}
