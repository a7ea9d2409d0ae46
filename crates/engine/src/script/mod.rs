//! Scripts: behaviour units owned by a single entity.

mod alpha;
mod autorunner;
mod light;
mod spin;

pub use alpha::CellAlphaReceiver;
pub use autorunner::{AutoRunner, RunMode, wander_step};
pub use light::{CellLightSource, FourCornerLightReceiver, SingleLightReceiver};
pub use spin::Spin;

use crate::behavior::Behavior;
use crate::context::TickContext;
use crate::entity::EntityState;

/// Every script an entity can carry.
pub enum Script {
    AutoRunner(AutoRunner),
    CellLightSource(CellLightSource),
    CellAlphaReceiver(CellAlphaReceiver),
    FourCornerLightReceiver(FourCornerLightReceiver),
    SingleLightReceiver(SingleLightReceiver),
    Spin(Spin),
    Custom(Box<dyn Behavior>),
}

impl Script {
    fn as_behavior(&mut self) -> &mut dyn Behavior {
        match self {
            Script::AutoRunner(s) => s,
            Script::CellLightSource(s) => s,
            Script::CellAlphaReceiver(s) => s,
            Script::FourCornerLightReceiver(s) => s,
            Script::SingleLightReceiver(s) => s,
            Script::Spin(s) => s,
            Script::Custom(s) => s.as_mut(),
        }
    }

    pub fn as_auto_runner_mut(&mut self) -> Option<&mut AutoRunner> {
        match self {
            Script::AutoRunner(runner) => Some(runner),
            _ => None,
        }
    }
}

impl Behavior for Script {
    fn pre_update(&mut self, entity: &mut EntityState, ctx: &mut TickContext<'_>) {
        self.as_behavior().pre_update(entity, ctx);
    }

    fn update(&mut self, entity: &mut EntityState, ctx: &mut TickContext<'_>) {
        self.as_behavior().update(entity, ctx);
    }

    fn update2(&mut self, entity: &mut EntityState, ctx: &mut TickContext<'_>) {
        self.as_behavior().update2(entity, ctx);
    }

    fn late_update(&mut self, entity: &mut EntityState, ctx: &mut TickContext<'_>) {
        self.as_behavior().late_update(entity, ctx);
    }

    fn label(&self) -> &str {
        match self {
            Script::AutoRunner(_) => "AutoRunner",
            Script::CellLightSource(_) => "CellLightSource",
            Script::CellAlphaReceiver(_) => "CellAlphaReceiver",
            Script::FourCornerLightReceiver(_) => "FourCornerLightReceiver",
            Script::SingleLightReceiver(_) => "SingleLightReceiver",
            Script::Spin(_) => "Spin",
            Script::Custom(s) => s.label(),
        }
    }
}
