use crate::EngineError;
use crate::engine::Engine;
use crate::kinds::Prefab;
use crate::script::{AutoRunner, CellLightSource, RunMode, Script};
use mazeworld_common::{EntityId, GridPos};
use mazeworld_maze::carve;
use mazeworld_render::Renderer;

pub const SINGLE_PLAYER_TEST_NAME: &str = "Single Player Test Scene 1";

/// Entities of the single-player test scene the host may want to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinglePlayerScene {
    pub root: EntityId,
    pub player: EntityId,
    pub camera: EntityId,
}

/// Carve a maze and populate it: walls, floor, ceiling, the light manager,
/// a wandering player carrying the light, a camera on the player, and a
/// marble at every position in `marbles`.
///
/// Needs the default assets loaded.
pub fn load_single_player_test<R: Renderer>(
    engine: &mut Engine<R>,
    width: usize,
    height: usize,
    seed: u64,
    marbles: &[GridPos],
) -> Result<SinglePlayerScene, EngineError> {
    engine.set_maze(carve(width, height, seed));

    let root = engine.instantiate(Prefab::SceneRoot {
        name: SINGLE_PLAYER_TEST_NAME.into(),
    })?;
    engine.instantiate(Prefab::Walls)?;
    engine.instantiate(Prefab::Floor)?;
    engine.instantiate(Prefab::Ceiling)?;
    engine.instantiate(Prefab::LightManager)?;

    let player = engine.instantiate(Prefab::Player)?;
    engine.add_script(player, Script::AutoRunner(AutoRunner::new(RunMode::Wander)))?;
    engine.add_script(player, Script::CellLightSource(CellLightSource))?;
    let camera = engine.instantiate(Prefab::Camera {
        target: Some(player),
    })?;

    for pos in marbles {
        engine.instantiate(Prefab::Marble { x: pos.x, y: pos.y })?;
    }

    tracing::info!(width, height, seed, marbles = marbles.len(), "single player test scene loaded");
    Ok(SinglePlayerScene {
        root,
        player,
        camera,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use mazeworld_assets::BuiltinLoader;
    use mazeworld_render::DebugTextRenderer;

    fn ready_engine() -> Engine<DebugTextRenderer> {
        let mut engine = Engine::with_renderer(
            EngineConfig::default(),
            Box::new(BuiltinLoader::new()),
            DebugTextRenderer::new(),
        );
        while !engine.poll_assets().unwrap().is_complete() {}
        engine.start(0.0).unwrap();
        engine
    }

    #[test]
    fn scene_builds_and_renders() {
        let mut engine = ready_engine();
        let scene =
            load_single_player_test(&mut engine, 4, 4, 7, &[GridPos::new(1, 1)]).unwrap();
        assert_eq!(engine.player(), Some(scene.player));
        assert_eq!(engine.entities().len(), 8);

        let frame = engine.tick(0.1).unwrap().expect("camera renders");
        assert!(frame.contains("Maze"));
        assert!(frame.contains("floor"));
        assert!(frame.contains("Player"));
        assert_eq!(engine.scene().len(), 5);
    }

    #[test]
    fn player_wanders_and_lights_the_maze() {
        let mut engine = ready_engine();
        let scene = load_single_player_test(&mut engine, 5, 5, 3, &[]).unwrap();

        let mut now = 0.0;
        let mut cells = std::collections::BTreeSet::new();
        for _ in 0..200 {
            now += 0.1;
            engine.tick(now).unwrap();
            cells.insert(engine.entity(scene.player).unwrap().state.grid_position());
        }
        assert!(cells.len() > 3, "player visited {cells:?}");
        let here = engine.entity(scene.player).unwrap().state.grid_position();
        assert_eq!(engine.maze().get(here).unwrap().light_map_value, 1.0);
    }
}
