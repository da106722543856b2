use super::{face_target, Zombie};
use crate::agent::Agent;
use crate::config::FeedingConfig;
use crate::state::{BehaviorState, StateId};
use crate::target::TargetKind;

/// Eats until satisfied or disturbed
#[derive(Debug, Clone, Default)]
pub struct FeedingState {
    config: FeedingConfig,
    timer: f32,
}

impl FeedingState {
    pub fn new(config: FeedingConfig) -> Self {
        Self { config, timer: 0.0 }
    }

    /// Seconds spent feeding
    pub fn elapsed(&self) -> f32 {
        self.timer
    }
}

impl BehaviorState<Zombie> for FeedingState {
    fn id(&self) -> StateId {
        StateId::Feeding
    }

    fn on_enter_state(&mut self, agent: &mut Agent<Zombie>) {
        agent.nav_agent_control(true, false);
        agent.archetype.reset_drives(0.0);
        agent.archetype.feeding = true;
        self.timer = 0.0;
    }

    fn on_exit_state(&mut self, agent: &mut Agent<Zombie>) {
        agent.archetype.feeding = false;
    }

    fn on_update(&mut self, agent: &mut Agent<Zombie>) -> StateId {
        let delta_time = agent.delta_time();
        self.timer += delta_time;

        if agent.archetype.satisfaction > self.config.satisfied_threshold {
            agent.next_waypoint_position(false);
            return StateId::Alerted;
        }

        let visual = *agent.visual_threat();
        if visual.kind().is_visual() && !visual.is(TargetKind::VisualFood) {
            agent.set_target_from(&visual);
            return StateId::Alerted;
        }

        let audio = *agent.audio_threat();
        if audio.is(TargetKind::Audio) {
            agent.set_target_from(&audio);
            return StateId::Alerted;
        }

        // Only the eating animation itself replenishes
        if agent
            .animator()
            .is_playing(&self.config.feeding_layer, &self.config.feeding_state_name)
        {
            let zombie = &mut agent.archetype;
            let gain = delta_time * zombie.replenish_rate() / 100.0;
            zombie.satisfaction = (zombie.satisfaction + gain).min(1.0);
        }

        if !agent.use_root_rotation() {
            let t = delta_time * self.config.slerp_speed;
            face_target(agent, t);
        }

        StateId::Feeding
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::animation::AnimatorParameters;
    use approx::assert_relative_eq;
    use glam::Vec3;
    use horde_core::ColliderId;

    const FOOD: ColliderId = ColliderId::from_index(12);

    fn feeding(satisfaction: f32) -> (FeedingState, Agent<Zombie>) {
        let mut agent = zombie().with_waypoints(route());
        agent.archetype.satisfaction = satisfaction;
        agent.set_target(TargetKind::VisualFood, Some(FOOD), Vec3::new(0.0, 0.0, 1.0), 1.0);
        let mut state = FeedingState::default();
        state.on_enter_state(&mut agent);
        tick(&mut agent, 1.0);
        (state, agent)
    }

    fn start_eating(agent: &mut Agent<Zombie>) {
        agent
            .animator_as_mut::<AnimatorParameters>()
            .unwrap()
            .play("Cinematic", "Feeding");
    }

    #[test]
    fn test_enter_sets_feeding_flag() {
        let (mut state, mut agent) = feeding(0.2);
        assert!(agent.archetype.feeding);
        assert_eq!(agent.archetype.speed, 0.0);

        state.on_exit_state(&mut agent);
        assert!(!agent.archetype.feeding);
    }

    #[test]
    fn test_replenishes_only_while_eating() {
        let (mut state, mut agent) = feeding(0.2);
        assert_eq!(state.on_update(&mut agent), StateId::Feeding);
        assert_eq!(agent.archetype.satisfaction, 0.2);

        start_eating(&mut agent);
        assert_eq!(state.on_update(&mut agent), StateId::Feeding);
        // 1s * 0.5 / 100
        assert_relative_eq!(agent.archetype.satisfaction, 0.205, epsilon = 1e-6);
        assert_relative_eq!(state.elapsed(), 2.0);
    }

    #[test]
    fn test_satisfied_zombie_heads_back_to_route() {
        let (mut state, mut agent) = feeding(0.95);
        assert_eq!(state.on_update(&mut agent), StateId::Alerted);
        assert_eq!(agent.target_kind(), TargetKind::Waypoint);
        assert_eq!(agent.current_waypoint(), Some(0));
    }

    #[test]
    fn test_disturbance_interrupts() {
        let (mut state, mut agent) = feeding(0.2);
        agent.set_visual_threat(TargetKind::VisualFood, Some(ColliderId::from_index(13)), Vec3::X, 1.0);
        assert_eq!(state.on_update(&mut agent), StateId::Feeding);

        agent.set_audio_threat(Some(ColliderId::from_index(4)), Vec3::X, 1.0);
        assert_eq!(state.on_update(&mut agent), StateId::Alerted);
        assert_eq!(agent.target_kind(), TargetKind::Audio);

        agent.clear_threats();
        agent.set_visual_threat(TargetKind::VisualLight, Some(ColliderId::from_index(6)), Vec3::X, 1.0);
        assert_eq!(state.on_update(&mut agent), StateId::Alerted);
        assert_eq!(agent.target_kind(), TargetKind::VisualLight);
    }

    #[test]
    fn test_seen_player_interrupts() {
        let (mut state, mut agent) = feeding(0.2);
        let player = ColliderId::from_index(3);
        agent.set_visual_threat(TargetKind::VisualPlayer, Some(player), Vec3::Z * 4.0, 4.0);

        assert_eq!(state.on_update(&mut agent), StateId::Alerted);
        assert_eq!(agent.target_kind(), TargetKind::VisualPlayer);
        assert_eq!(agent.target_source(), Some(player));
    }
}
