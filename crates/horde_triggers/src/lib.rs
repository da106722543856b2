//! Horde Triggers - Trigger Volume System
//!
//! This crate provides the trigger volumes agents use to notice the world:
//! sensor spheres that perceive nearby colliders, the target volume that
//! reports arrival at a destination, and melee zones.
//!
//! # Features
//!
//! - Sphere and box volumes
//! - Enter/Exit/Stay events
//! - Layer, tag and id based filtering
//! - A system that steps every volume against the tracked bodies
//!
//! # Example
//!
//! ```ignore
//! use horde_triggers::prelude::*;
//!
//! let mut system = TriggerSystem::new();
//! system.register_trigger(sensor_id, TriggerComponent::new(TriggerVolume::sphere(10.0)).with_stay_events());
//! for event in system.update(1.0 / 60.0, &bodies) {
//!     println!("{:?} {:?} {:?}", event.event_type, event.trigger, event.other);
//! }
//! ```

pub mod events;
pub mod filter;
pub mod system;
pub mod trigger;
pub mod volume;

pub mod prelude {
    pub use crate::events::{TriggerEvent, TriggerEventType};
    pub use crate::filter::TriggerFilter;
    pub use crate::system::{TriggerBody, TriggerSystem};
    pub use crate::trigger::TriggerComponent;
    pub use crate::volume::TriggerVolume;
}

pub use prelude::*;
