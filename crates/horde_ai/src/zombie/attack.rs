use super::{face_target, LookAt, Zombie};
use crate::agent::Agent;
use crate::config::AttackConfig;
use crate::state::{BehaviorState, StateId};
use crate::target::TargetKind;
use rand::Rng;

/// Number of attack animation variants to pick from
const ATTACK_VARIANTS: i32 = 100;

/// Swings at a visible player in melee range
#[derive(Debug, Clone, Default)]
pub struct AttackState {
    config: AttackConfig,
    look_at: LookAt,
}

impl AttackState {
    pub fn new(config: AttackConfig) -> Self {
        Self {
            config,
            look_at: LookAt::default(),
        }
    }

    pub fn look_at_weight(&self) -> f32 {
        self.look_at.weight()
    }
}

fn roll_attack(agent: &mut Agent<Zombie>) {
    let variant = agent.rng().gen_range(0..ATTACK_VARIANTS);
    agent.archetype.attack_type = variant;
}

impl BehaviorState<Zombie> for AttackState {
    fn id(&self) -> StateId {
        StateId::Attack
    }

    fn on_enter_state(&mut self, agent: &mut Agent<Zombie>) {
        agent.nav_agent_control(true, false);
        agent.archetype.reset_drives(self.config.speed);
        roll_attack(agent);
        self.look_at.reset();
    }

    fn on_exit_state(&mut self, agent: &mut Agent<Zombie>) {
        agent.archetype.attack_type = 0;
    }

    fn on_update(&mut self, agent: &mut Agent<Zombie>) -> StateId {
        let close = agent.position().distance(agent.target_position()) < self.config.stopping_distance;
        agent.archetype.speed = if close { 0.0 } else { self.config.speed };

        let visual = *agent.visual_threat();
        if visual.is(TargetKind::VisualPlayer) {
            agent.set_target_from(&visual);
            if !agent.in_melee_range() {
                return StateId::Pursuit;
            }
            if !agent.use_root_rotation() {
                let t = agent.delta_time() * self.config.slerp_speed;
                face_target(agent, t);
            }
            roll_attack(agent);
            return StateId::Attack;
        }

        // Lost sight: face the last known position and look around
        if !agent.use_root_rotation() {
            face_target(agent, 1.0);
        }
        StateId::Alerted
    }

    fn on_animator_ik_updated(&mut self, agent: &mut Agent<Zombie>) {
        self.look_at.update(
            agent,
            self.config.look_at_weight,
            self.config.look_at_angle_threshold,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec3;
    use horde_core::ColliderId;

    const PLAYER: ColliderId = ColliderId::from_index(3);

    fn attacking(position: Vec3) -> (AttackState, Agent<Zombie>) {
        let mut agent = zombie();
        agent.set_target(TargetKind::VisualPlayer, Some(PLAYER), position, position.length());
        agent.set_in_melee_range(true);
        let mut state = AttackState::default();
        state.on_enter_state(&mut agent);
        tick(&mut agent, 0.1);
        (state, agent)
    }

    #[test]
    fn test_enter_picks_variant() {
        let (_, agent) = attacking(Vec3::new(0.0, 0.0, 0.8));
        assert!((0..ATTACK_VARIANTS).contains(&agent.archetype.attack_type));
        assert!(!agent.archetype.feeding);
        assert_eq!(agent.archetype.seeking, 0);
    }

    #[test]
    fn test_keeps_attacking_visible_player() {
        let (mut state, mut agent) = attacking(Vec3::new(0.0, 0.0, 0.8));
        agent.set_visual_threat(TargetKind::VisualPlayer, Some(PLAYER), Vec3::new(0.5, 0.0, 0.8), 0.9);
        assert_eq!(state.on_update(&mut agent), StateId::Attack);
        assert_eq!(agent.target_position(), Vec3::new(0.5, 0.0, 0.8));
        assert_eq!(agent.archetype.speed, 0.0);
        assert!(agent.forward().x > 0.0);
    }

    #[test]
    fn test_player_out_of_reach_pursues() {
        let (mut state, mut agent) = attacking(Vec3::new(0.0, 0.0, 0.8));
        agent.set_in_melee_range(false);
        agent.set_visual_threat(TargetKind::VisualPlayer, Some(PLAYER), Vec3::new(0.0, 0.0, 3.0), 3.0);
        assert_eq!(state.on_update(&mut agent), StateId::Pursuit);
    }

    #[test]
    fn test_lost_sight_faces_last_position() {
        let (mut state, mut agent) = attacking(Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(state.on_update(&mut agent), StateId::Alerted);
        assert_relative_eq!(agent.forward().x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_exit_clears_variant() {
        let (mut state, mut agent) = attacking(Vec3::new(0.0, 0.0, 0.8));
        state.on_exit_state(&mut agent);
        assert_eq!(agent.archetype.attack_type, 0);
    }
}
