use crate::dynamics::BodyHandle;
use crate::math::{Real, Vector};
use std::sync::mpsc::Sender;

/// The motion a body with continuous collision detection is about to perform during the current
/// step, reported so that its shapes can be swept along it.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct SweptMotionEvent {
    /// The moving body.
    pub body: BodyHandle,
    /// The translation of the body during the step.
    pub motion: Vector<Real>,
}

/// Trait implemented by structures responsible for handling events generated by the physics
/// space.
///
/// The `()` implementation ignores every event.
pub trait EventHandler: Send + Sync {
    /// Handle the swept motion of a kinematic body, or of a body with continuous collision
    /// detection enabled.
    fn handle_swept_motion_event(&self, event: SweptMotionEvent);
}

impl EventHandler for () {
    fn handle_swept_motion_event(&self, _event: SweptMotionEvent) {}
}

/// A swept-motion event handler that collects events into a channel.
pub struct ChannelEventCollector {
    swept_motion_event_sender: Sender<SweptMotionEvent>,
}

impl ChannelEventCollector {
    /// Initialize a new event handler from a channel sender.
    pub fn new(swept_motion_event_sender: Sender<SweptMotionEvent>) -> Self {
        Self {
            swept_motion_event_sender,
        }
    }
}

impl EventHandler for ChannelEventCollector {
    fn handle_swept_motion_event(&self, event: SweptMotionEvent) {
        let _ = self.swept_motion_event_sender.send(event);
    }
}
