use crate::behavior::Behavior;
use crate::context::TickContext;
use crate::entity::EntityState;
use mazeworld_maze::{Cell, MazeGrid};
use mazeworld_render::{CornerValues, Lighting, VisualNode};

/// Lights the maze from the entity's cell every tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellLightSource;

impl Behavior for CellLightSource {
    fn update(&mut self, entity: &mut EntityState, ctx: &mut TickContext<'_>) {
        ctx.maze.propagate_light(entity.grid_position());
    }

    fn label(&self) -> &str {
        "CellLightSource"
    }
}

/// Copies per-cell corner lighting into four-corner tile materials.
///
/// Every node tagged with a cell gets that cell's corners. Corners that have
/// not been computed this tick fall back to the cell's own light value.
/// `flip_vertical` swaps top and bottom, for tiles seen from below.
#[derive(Debug, Clone, Copy, Default)]
pub struct FourCornerLightReceiver {
    pub flip_vertical: bool,
}

impl FourCornerLightReceiver {
    fn corners(&self, cell: &Cell) -> CornerValues {
        let fallback = cell.light_map_value;
        let c = cell.corners;
        let values = CornerValues {
            top_left: c.top_left.unwrap_or(fallback),
            top_right: c.top_right.unwrap_or(fallback),
            bottom_left: c.bottom_left.unwrap_or(fallback),
            bottom_right: c.bottom_right.unwrap_or(fallback),
        };
        if self.flip_vertical {
            CornerValues {
                top_left: values.bottom_left,
                top_right: values.bottom_right,
                bottom_left: values.top_left,
                bottom_right: values.top_right,
            }
        } else {
            values
        }
    }
}

impl Behavior for FourCornerLightReceiver {
    fn update2(&mut self, entity: &mut EntityState, ctx: &mut TickContext<'_>) {
        let maze = &*ctx.maze;
        let Some(root) = entity.root_mut(ctx.scene) else {
            return;
        };
        light_tiles(root, maze, |cell, lighting| match lighting {
            Lighting::FourCorner(_) => Some(Lighting::FourCorner(self.corners(cell))),
            Lighting::Single(_) => Some(Lighting::Single(cell.light_map_value)),
            Lighting::Unlit => None,
        });
    }

    fn label(&self) -> &str {
        "FourCornerLightReceiver"
    }
}

/// Writes each tile's cell light value into its material as one uniform
/// brightness.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleLightReceiver;

impl Behavior for SingleLightReceiver {
    fn update2(&mut self, entity: &mut EntityState, ctx: &mut TickContext<'_>) {
        let maze = &*ctx.maze;
        let Some(root) = entity.root_mut(ctx.scene) else {
            return;
        };
        light_tiles(root, maze, |cell, lighting| {
            let v = cell.light_map_value;
            match lighting {
                Lighting::Single(_) => Some(Lighting::Single(v)),
                Lighting::FourCorner(_) => Some(Lighting::FourCorner(CornerValues::splat(v))),
                Lighting::Unlit => None,
            }
        });
    }

    fn label(&self) -> &str {
        "SingleLightReceiver"
    }
}

/// Visit every cell-tagged node with a material and replace its lighting
/// with whatever `light` returns.
fn light_tiles(
    root: &mut VisualNode,
    maze: &MazeGrid,
    light: impl Fn(&Cell, Lighting) -> Option<Lighting>,
) {
    root.visit_mut(&mut |node| {
        let Some(cell) = node.cell.and_then(|pos| maze.get(pos)) else {
            return;
        };
        if let Some(material) = node.material.as_mut() {
            if let Some(lighting) = light(cell, material.lighting) {
                material.lighting = lighting;
            }
        }
    });
}
