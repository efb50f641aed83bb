//! Structure combining bodies, areas and constraints to perform an actual simulation.

pub use event_handler::{ChannelEventCollector, EventHandler, SweptMotionEvent};
pub use physics_space::PhysicsSpace;

mod event_handler;
mod physics_space;
