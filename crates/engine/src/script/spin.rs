use crate::behavior::Behavior;
use crate::context::TickContext;
use crate::entity::EntityState;

/// Turns the entity about its Y axis at `speed` radians per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    pub speed: f32,
}

impl Default for Spin {
    fn default() -> Self {
        Self { speed: 1.0 }
    }
}

impl Behavior for Spin {
    fn update(&mut self, entity: &mut EntityState, ctx: &mut TickContext<'_>) {
        entity.transform.rotation.y += self.speed * ctx.time.delta;
    }

    fn label(&self) -> &str {
        "Spin"
    }
}
