//! Behavior states

use crate::agent::{Agent, Archetype};
use crate::scene::{ColliderInfo, SceneContext};
use horde_core::AgentId;
use horde_triggers::TriggerEventType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a behavior state; dense so it can index a fixed table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StateId {
    Idle,
    Alerted,
    Patrol,
    Attack,
    Feeding,
    Pursuit,
    Dead,
}

impl StateId {
    /// Number of state ids
    pub const COUNT: usize = 7;

    /// Every state id in index order
    pub const ALL: [StateId; Self::COUNT] = [
        StateId::Idle,
        StateId::Alerted,
        StateId::Patrol,
        StateId::Attack,
        StateId::Feeding,
        StateId::Pursuit,
        StateId::Dead,
    ];

    /// Position in [`StateId::ALL`]
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            StateId::Idle => "Idle",
            StateId::Alerted => "Alerted",
            StateId::Patrol => "Patrol",
            StateId::Attack => "Attack",
            StateId::Feeding => "Feeding",
            StateId::Pursuit => "Pursuit",
            StateId::Dead => "Dead",
        }
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One behavior of an agent.
///
/// A state is created once per agent and reused every time it becomes
/// current. It keeps only its own timers; everything else lives on the
/// [`Agent`] handed to each hook.
pub trait BehaviorState<A: Archetype> {
    /// The id this state is registered under
    fn id(&self) -> StateId;

    /// Called once when the state is registered with its agent
    fn on_registered(&mut self, _owner: AgentId) {}

    /// The state became current
    fn on_enter_state(&mut self, _agent: &mut Agent<A>) {}

    /// The state stops being current; runs right before the next state's enter
    fn on_exit_state(&mut self, _agent: &mut Agent<A>) {}

    /// Decide this tick, returning the id that should be current afterwards
    fn on_update(&mut self, agent: &mut Agent<A>) -> StateId;

    /// The animation system produced root motion for this tick
    fn on_animator_updated(&mut self, agent: &mut Agent<A>) {
        agent.apply_root_motion();
    }

    /// Inverse kinematics is about to be resolved
    fn on_animator_ik_updated(&mut self, _agent: &mut Agent<A>) {}

    /// A collider entered, stayed in or left the sensor volume
    fn on_trigger_event(
        &mut self,
        agent: &mut Agent<A>,
        kind: TriggerEventType,
        other: &ColliderInfo,
        scene: &SceneContext<'_>,
    ) {
        A::on_sensor_event(agent, kind, other, scene);
    }

    /// The agent entered (`true`) or left (`false`) its target volume
    fn on_destination_reached(&mut self, _agent: &mut Agent<A>, _reached: bool) {}
}
