//! # horde_core - Horde Core
//!
//! Zero-dependency primitives shared by every Horde crate:
//! - **Identity**: generational ids for colliders and agents
//! - **Time**: the simulation clock that stamps perceived targets
//!
//! Everything here is plain data. Nothing allocates behind the caller's back
//! and nothing is global: generators and clocks are owned by whoever drives
//! the simulation.

pub mod clock;
pub mod id;

pub use clock::*;
pub use id::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::clock::SimClock;
    pub use crate::id::{AgentId, ColliderId, Id, IdGenerator};
}
