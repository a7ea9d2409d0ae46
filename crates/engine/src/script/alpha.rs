use crate::behavior::Behavior;
use crate::context::TickContext;
use crate::entity::EntityState;

/// Fades every material of the entity's visual tree with the light of the
/// cell the entity stands in.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellAlphaReceiver {
    /// Maps cell light to opacity. Identity when unset.
    pub opacity: Option<fn(f32) -> f32>,
}

impl Behavior for CellAlphaReceiver {
    fn update2(&mut self, entity: &mut EntityState, ctx: &mut TickContext<'_>) {
        let Some(cell) = ctx.maze.get(entity.grid_position()) else {
            return;
        };
        let light = cell.light_map_value;
        let opacity = self.opacity.map_or(light, |f| f(light));
        if let Some(root) = entity.root_mut(ctx.scene) {
            root.visit_mut(&mut |node| {
                if let Some(material) = node.material.as_mut() {
                    material.opacity = opacity;
                }
            });
        }
    }

    fn label(&self) -> &str {
        "CellAlphaReceiver"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::testing::Harness;
    use mazeworld_common::{EntityId, GridPos};
    use mazeworld_maze::{MazeGrid, grid_to_world};
    use mazeworld_render::{Material, VisualNode};

    fn marble() -> EntityState {
        let mut entity = EntityState::new(EntityId(3), "MarbleTest3");
        let mesh = VisualNode {
            name: "mesh".into(),
            material: Some(Material::default()),
            ..VisualNode::default()
        };
        entity.set_root(VisualNode::group("marble").with_child(mesh));
        entity.transform.position = grid_to_world(1.0, 1.0);
        entity
    }

    fn mesh_opacity(entity: &EntityState, harness: &Harness) -> f32 {
        entity.root(&harness.scene).unwrap().children[0]
            .material
            .as_ref()
            .unwrap()
            .opacity
    }

    #[test]
    fn opacity_follows_cell_light() {
        let mut harness = Harness::new(MazeGrid::open(2, 2));
        harness.maze.get_mut(GridPos::new(1, 1)).unwrap().light_map_value = 0.25;
        let mut entity = marble();

        CellAlphaReceiver::default().update2(&mut entity, &mut harness.ctx());
        assert_eq!(mesh_opacity(&entity, &harness), 0.25);
    }

    #[test]
    fn opacity_function_is_applied() {
        let mut harness = Harness::new(MazeGrid::open(2, 2));
        harness.maze.get_mut(GridPos::new(1, 1)).unwrap().light_map_value = 0.25;
        let mut entity = marble();

        fn double(v: f32) -> f32 {
            v * 2.0
        }
        let mut receiver = CellAlphaReceiver {
            opacity: Some(double as fn(f32) -> f32),
        };
        receiver.update2(&mut entity, &mut harness.ctx());
        assert_eq!(mesh_opacity(&entity, &harness), 0.5);
    }

    #[test]
    fn off_grid_entity_is_untouched() {
        let mut harness = Harness::new(MazeGrid::open(1, 1));
        let mut entity = marble();

        CellAlphaReceiver::default().update2(&mut entity, &mut harness.ctx());
        assert_eq!(mesh_opacity(&entity, &harness), 1.0);
    }
}
