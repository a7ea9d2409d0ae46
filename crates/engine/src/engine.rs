use crate::behavior::Behavior;
use crate::config::{EngineConfig, LoadFailurePolicy, LoadingHooks};
use crate::context::{Commands, Others, TickContext};
use crate::debug::Inspector;
use crate::entity::{Entity, Phase};
use crate::host::FrameHost;
use crate::kinds::{EntityKind, Prefab};
use crate::script::{RunMode, Script};
use crate::time::{FrameClock, FrameTime, FrameTimer};
use crate::{ASSET_POLL_INTERVAL, EngineError};
use glam::Vec3;
use mazeworld_assets::{AssetKind, AssetLoader, AssetRegistry, LoadProgress, LoadState};
use mazeworld_common::EntityId;
use mazeworld_maze::MazeGrid;
use mazeworld_render::{CameraView, NullRenderer, Renderer, Scene};
use std::time::Duration;

const FRAME_HISTORY: usize = 120;

/// The maze engine: owns the world and runs it one tick at a time.
///
/// Construction registers assets; [`Engine::start`] opens the gate once
/// they have all loaded, after which [`Engine::tick`] may be called.
pub struct Engine<R: Renderer = NullRenderer> {
    config: EngineConfig,
    maze: MazeGrid,
    scene: Scene,
    assets: AssetRegistry,
    entities: Vec<Entity>,
    commands: Commands,
    clock: FrameClock,
    frame_timer: FrameTimer,
    intro_scale: f32,
    renderer: R,
    player: Option<EntityId>,
    hooks: LoadingHooks,
    inspector: Option<Inspector>,
    started: bool,
    loading_finished: bool,
}

impl Engine<NullRenderer> {
    /// An engine that simulates without drawing.
    pub fn headless(config: EngineConfig, loader: Box<dyn AssetLoader>) -> Self {
        Self::with_renderer(config, loader, NullRenderer)
    }
}

impl<R: Renderer> Engine<R> {
    pub fn with_renderer(config: EngineConfig, loader: Box<dyn AssetLoader>, renderer: R) -> Self {
        let mut assets = AssetRegistry::new(config.path_root.clone(), loader);
        assets.set_image_shader(config.image_shader);
        if config.init_default_assets {
            assets.register_defaults();
        }
        tracing::info!(
            path_root = %config.path_root,
            assets = assets.len(),
            noclip = config.noclip,
            "engine created"
        );
        let inspector = config.debug_inspection.then(Inspector::new);
        Self {
            config,
            maze: MazeGrid::new(0, 0),
            scene: Scene::new(),
            assets,
            entities: Vec::new(),
            commands: Commands::default(),
            clock: FrameClock::default(),
            frame_timer: FrameTimer::new(FRAME_HISTORY),
            intro_scale: 0.0,
            renderer,
            player: None,
            hooks: LoadingHooks::default(),
            inspector,
            started: false,
            loading_finished: false,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn set_loading_hooks(&mut self, hooks: LoadingHooks) {
        self.hooks = hooks;
    }

    /// Register an extra asset. Registering after start reopens nothing; the
    /// asset simply is not instantiable until it loads.
    pub fn register_asset(&mut self, name: &str, relative_path: &str, kind: AssetKind) {
        self.assets.register(name, relative_path, kind);
    }

    pub fn assets(&self) -> &AssetRegistry {
        &self.assets
    }

    /// Replace the maze. Entities built from the old maze keep their tiles.
    pub fn set_maze(&mut self, maze: MazeGrid) {
        tracing::info!(width = maze.width(), height = maze.height(), "maze set");
        self.maze = maze;
    }

    pub fn maze(&self) -> &MazeGrid {
        &self.maze
    }

    pub fn maze_mut(&mut self) -> &mut MazeGrid {
        &mut self.maze
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn inspector(&self) -> Option<&Inspector> {
        self.inspector.as_ref()
    }

    pub fn intro_scale(&self) -> f32 {
        self.intro_scale
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn time(&self) -> FrameTime {
        self.clock.current()
    }

    pub fn frame_stats(&self) -> &FrameTimer {
        &self.frame_timer
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    /// Create an entity now. It is attached to the scene on the next tick.
    pub fn instantiate(&mut self, prefab: Prefab) -> Result<EntityId, EngineError> {
        let id = self.commands.allocate_id();
        let entity = prefab.build(id, &self.assets, &self.maze)?;
        self.adopt(entity);
        Ok(id)
    }

    fn adopt(&mut self, entity: Entity) {
        if matches!(entity.kind, EntityKind::Player) && self.player.is_none() {
            self.player = Some(entity.id());
        }
        tracing::debug!(id = %entity.id(), name = %entity.state.name, kind = entity.kind.label(), "entity instantiated");
        self.entities.push(entity);
    }

    pub fn add_script(&mut self, id: EntityId, script: Script) -> Result<(), EngineError> {
        let entity = self.entity_mut(id).ok_or(EngineError::EntityNotFound(id))?;
        tracing::debug!(%id, script = script.label(), "script added");
        entity.scripts.push(script);
        Ok(())
    }

    /// Switch an entity's auto-runner to `mode`, effective immediately.
    pub fn set_run_mode(&mut self, id: EntityId, mode: RunMode) -> Result<(), EngineError> {
        let entity = self
            .entities
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(EngineError::EntityNotFound(id))?;
        let runner = entity
            .scripts
            .iter_mut()
            .find_map(Script::as_auto_runner_mut)
            .ok_or(EngineError::MissingScript {
                id,
                script: "AutoRunner",
            })?;
        runner.set_mode(mode, &entity.state, &mut self.maze);
        Ok(())
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id() == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.state.name == name)
    }

    /// Live entities in creation order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Wall proximity at a world position. Always false under noclip.
    pub fn is_colliding_with_walls(&self, position: Vec3) -> bool {
        !self.config.noclip && self.maze.is_near_wall(position)
    }

    /// Drain the loader, report progress and apply the failure policy.
    pub fn poll_assets(&mut self) -> Result<LoadProgress, EngineError> {
        let progress = self.assets.poll();
        tracing::trace!(%progress, "asset poll");
        if let Some(hook) = self.hooks.progress.as_mut() {
            hook(progress);
        }

        let failed: Vec<(String, u32, String)> = self
            .assets
            .failed()
            .map(|a| {
                let reason = match &a.state {
                    LoadState::Failed(reason) => reason.clone(),
                    _ => String::new(),
                };
                (a.name.clone(), a.attempts, reason)
            })
            .collect();
        for (name, attempts, reason) in failed {
            match self.config.load_failure {
                LoadFailurePolicy::Stall => {
                    tracing::debug!(%name, "asset failed; stalling");
                }
                LoadFailurePolicy::Retry { max_attempts } if attempts < max_attempts => {
                    self.assets.retry(&name)?;
                }
                LoadFailurePolicy::Retry { .. } | LoadFailurePolicy::Abort => {
                    tracing::error!(%name, attempts, %reason, "giving up on asset");
                    return Err(EngineError::AssetLoad {
                        name,
                        attempts,
                        reason,
                    });
                }
            }
        }

        if progress.is_complete() {
            self.finish_loading();
        }
        Ok(progress)
    }

    fn finish_loading(&mut self) {
        if self.loading_finished {
            return;
        }
        self.loading_finished = true;
        tracing::info!(assets = self.assets.len(), "all assets loaded");
        if let Some(hook) = self.hooks.loading_finished.take() {
            hook();
        }
    }

    /// Open the tick gate. Refused while any asset is still loading.
    pub fn start(&mut self, now: f64) -> Result<(), EngineError> {
        if !self.assets.all_loaded() {
            return Err(EngineError::AssetsPending(self.assets.progress()));
        }
        self.finish_loading();
        self.clock.start(now);
        self.started = true;
        tracing::info!(entities = self.entities.len(), "engine started");
        Ok(())
    }

    /// Run one tick at host time `now`. Returns the rendered frame when a
    /// camera exists.
    pub fn tick(&mut self, now: f64) -> Result<Option<R::Output>, EngineError> {
        if !self.started {
            return Err(EngineError::NotStarted);
        }
        let time = self.clock.advance(now);
        let _span = tracing::debug_span!("tick", frame = time.frame).entered();
        self.frame_timer
            .record(Duration::try_from_secs_f32(time.delta).unwrap_or_default());
        self.intro_scale = (self.intro_scale + time.delta).min(1.0);

        self.sweep();
        self.attach();
        self.run_phases(&Phase::EARLY, time);
        for entity in &mut self.entities {
            entity.state.commit_transform(&mut self.scene, self.intro_scale);
        }
        self.run_phases(&Phase::LATE, time);
        self.apply_commands();

        if let Some(inspector) = self.inspector.as_mut() {
            inspector.refresh(&self.entities, time.frame);
        }
        Ok(self.render())
    }

    fn sweep(&mut self) {
        let scene = &mut self.scene;
        self.entities.retain_mut(|entity| {
            if !entity.state.is_destroyed() {
                return true;
            }
            entity.state.detach(scene);
            tracing::debug!(id = %entity.id(), name = %entity.state.name, "entity swept");
            false
        });
        if let Some(player) = self.player {
            if !self.entities.iter().any(|e| e.id() == player) {
                self.player = None;
            }
        }
    }

    fn attach(&mut self) {
        for entity in &mut self.entities {
            if entity.state.attach(&mut self.scene) {
                tracing::trace!(id = %entity.id(), "visual root attached");
            }
        }
    }

    fn run_phases(&mut self, phases: &[Phase], time: FrameTime) {
        let Self {
            config,
            maze,
            scene,
            assets,
            entities,
            commands,
            inspector,
            intro_scale,
            player,
            ..
        } = self;
        for &phase in phases {
            for i in 0..entities.len() {
                let (before, rest) = entities.split_at_mut(i);
                let Some((entity, after)) = rest.split_first_mut() else {
                    break;
                };
                let mut ctx = TickContext {
                    maze: &mut *maze,
                    scene: &mut *scene,
                    assets: &*assets,
                    time,
                    intro_scale: *intro_scale,
                    others: Others {
                        before: &*before,
                        after: &*after,
                    },
                    commands: &mut *commands,
                    inspector: inspector.as_mut(),
                    noclip: config.noclip,
                    player: *player,
                };
                entity.run(phase, &mut ctx);
            }
        }
    }

    fn apply_commands(&mut self) {
        if self.commands.is_empty() {
            return;
        }
        let (spawns, destroys) = self.commands.take();
        for id in destroys {
            match self.entity_mut(id) {
                Some(entity) => entity.state.destroy(),
                None => tracing::warn!(%id, "destroy requested for unknown entity"),
            }
        }
        for (id, prefab) in spawns {
            match prefab.build(id, &self.assets, &self.maze) {
                Ok(entity) => self.adopt(entity),
                Err(e) => tracing::error!(%id, error = %e, "spawn failed"),
            }
        }
    }

    fn camera_view(&self) -> Option<CameraView> {
        let camera = self
            .entities
            .iter()
            .find(|e| e.kind.is_camera() && !e.state.is_destroyed())?;
        Some(CameraView {
            position: camera.state.transform.position,
            rotation: camera.state.transform.rotation,
            ..CameraView::default()
        })
    }

    fn render(&mut self) -> Option<R::Output> {
        let camera = self.camera_view()?;
        Some(self.renderer.render(&self.scene, &camera))
    }

    /// Wait for every asset to load, polling through `host`.
    pub fn load<H: FrameHost<R::Output>>(&mut self, host: &mut H) -> Result<LoadProgress, EngineError> {
        loop {
            let progress = self.poll_assets()?;
            if progress.is_complete() {
                return Ok(progress);
            }
            if !host.wait(ASSET_POLL_INTERVAL) {
                tracing::warn!(%progress, "host stopped waiting for assets");
                return Err(EngineError::AssetsPending(progress));
            }
        }
    }

    /// Load, start and tick until the host stops presenting. Returns the
    /// number of ticks run.
    pub fn run<H: FrameHost<R::Output>>(&mut self, host: &mut H) -> Result<u64, EngineError> {
        if !self.started {
            self.load(host)?;
            self.start(host.now())?;
        }
        let mut ticks = 0;
        loop {
            let frame = self.tick(host.now())?;
            ticks += 1;
            if !host.present(frame) {
                break;
            }
        }
        tracing::info!(ticks, fps = self.frame_timer.fps(), "run finished");
        Ok(ticks)
    }
}

impl<R: Renderer> std::fmt::Debug for Engine<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("entities", &self.entities.len())
            .field("scene_roots", &self.scene.len())
            .field("assets", &self.assets.len())
            .field("intro_scale", &self.intro_scale)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}
