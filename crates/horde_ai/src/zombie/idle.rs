use super::{calm_threat_response, Zombie};
use crate::agent::Agent;
use crate::config::IdleConfig;
use crate::state::{BehaviorState, StateId};
use rand::Rng;

/// Stands around for a while, then starts patrolling.
///
/// Reacts to threats the same way a patrolling zombie does.
#[derive(Debug, Clone, Default)]
pub struct IdleState {
    config: IdleConfig,
    timer: f32,
}

impl IdleState {
    pub fn new(config: IdleConfig) -> Self {
        Self { config, timer: 0.0 }
    }

    /// Seconds left before patrolling
    pub fn remaining(&self) -> f32 {
        self.timer
    }
}

impl BehaviorState<Zombie> for IdleState {
    fn id(&self) -> StateId {
        StateId::Idle
    }

    fn on_enter_state(&mut self, agent: &mut Agent<Zombie>) {
        agent.nav_agent_control(true, false);
        agent.archetype.reset_drives(0.0);
        agent.clear_target();

        let (min, max) = (self.config.min_duration, self.config.max_duration);
        self.timer = if max > min {
            agent.rng().gen_range(min..=max)
        } else {
            min
        };
    }

    fn on_update(&mut self, agent: &mut Agent<Zombie>) -> StateId {
        if let Some(next) = calm_threat_response(agent) {
            return next;
        }

        self.timer -= agent.delta_time();
        if self.timer <= 0.0 {
            return StateId::Patrol;
        }
        StateId::Idle
    }
}
