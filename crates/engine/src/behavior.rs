use crate::context::TickContext;
use crate::entity::EntityState;

/// Per-phase hooks run by the scheduler. Entity kinds and scripts both
/// implement it; every hook defaults to doing nothing.
///
/// Hooks receive the owning entity's state and the tick context. Other
/// entities are visible read-only through [`TickContext::others`].
pub trait Behavior {
    fn pre_update(&mut self, _entity: &mut EntityState, _ctx: &mut TickContext<'_>) {}

    fn update(&mut self, _entity: &mut EntityState, _ctx: &mut TickContext<'_>) {}

    fn update2(&mut self, _entity: &mut EntityState, _ctx: &mut TickContext<'_>) {}

    fn late_update(&mut self, _entity: &mut EntityState, _ctx: &mut TickContext<'_>) {}

    /// Short label for logs and the inspector.
    fn label(&self) -> &str {
        "custom"
    }
}
