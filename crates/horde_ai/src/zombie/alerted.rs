use super::Zombie;
use crate::agent::Agent;
use crate::config::AlertedConfig;
use crate::geometry::{sign, signed_angle};
use crate::state::{BehaviorState, StateId};
use crate::target::TargetKind;
use rand::Rng;

/// Stands and turns to search for the source of a disturbance.
///
/// Each fresh light or sound restarts the countdown; when it runs out the
/// zombie goes back to patrolling.
#[derive(Debug, Clone, Default)]
pub struct AlertedState {
    config: AlertedConfig,
    timer: f32,
}

impl AlertedState {
    pub fn new(config: AlertedConfig) -> Self {
        Self { config, timer: 0.0 }
    }

    /// Seconds left before giving up
    pub fn remaining(&self) -> f32 {
        self.timer
    }
}

impl BehaviorState<Zombie> for AlertedState {
    fn id(&self) -> StateId {
        StateId::Alerted
    }

    fn on_enter_state(&mut self, agent: &mut Agent<Zombie>) {
        agent.nav_agent_control(true, false);
        agent.archetype.reset_drives(0.0);
        self.timer = self.config.max_duration;
    }

    fn on_update(&mut self, agent: &mut Agent<Zombie>) -> StateId {
        self.timer -= agent.delta_time();
        if self.timer <= 0.0 {
            return StateId::Patrol;
        }

        let visual = *agent.visual_threat();
        let audio = *agent.audio_threat();

        if visual.is(TargetKind::VisualPlayer) {
            agent.set_target_from(&visual);
            return StateId::Pursuit;
        }
        if audio.is(TargetKind::Audio) {
            agent.set_target_from(&audio);
            self.timer = self.config.max_duration;
        }
        if visual.is(TargetKind::VisualLight) {
            agent.set_target_from(&visual);
            self.timer = self.config.max_duration;
        }
        if audio.is_none() && visual.is(TargetKind::VisualFood) {
            agent.set_target_from(&visual);
            return StateId::Pursuit;
        }

        match agent.target_kind() {
            kind @ (TargetKind::Audio | TargetKind::VisualLight) => {
                let angle = signed_angle(agent.forward(), agent.target_position() - agent.position());
                if kind == TargetKind::Audio && angle.abs() < self.config.threat_angle_threshold {
                    return StateId::Pursuit;
                }

                // Smarter zombies turn the right way more often
                let intelligence = agent.archetype.intelligence();
                let seeking = if agent.rng().gen::<f32>() < intelligence {
                    sign(angle)
                } else {
                    sign(agent.rng().gen_range(-1.0..1.0))
                };
                agent.archetype.seeking = seeking;
            }
            TargetKind::Waypoint => {
                let to_steering = agent.nav().steering_target() - agent.position();
                let angle = signed_angle(agent.forward(), to_steering);
                if angle.abs() < self.config.waypoint_angle_threshold {
                    return StateId::Patrol;
                }
                agent.archetype.seeking = sign(angle);
            }
            _ => {}
        }

        StateId::Alerted
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::config::ZombieConfig;
    use glam::Vec3;
    use horde_core::ColliderId;

    fn alerted() -> (AlertedState, Agent<Zombie>) {
        let mut agent = zombie();
        let mut state = AlertedState::default();
        state.on_enter_state(&mut agent);
        tick(&mut agent, 0.5);
        (state, agent)
    }

    #[test]
    fn test_enter_stops_and_arms_timer() {
        let (state, agent) = alerted();
        assert_eq!(agent.archetype.speed, 0.0);
        assert_eq!(agent.archetype.seeking, 0);
        assert_eq!(state.remaining(), 10.0);
    }

    #[test]
    fn test_times_out_to_patrol() {
        let (mut state, mut agent) = alerted();
        let mut ticks = 0;
        while state.on_update(&mut agent) == StateId::Alerted {
            ticks += 1;
            assert!(ticks < 100);
        }
        // 10 seconds at 0.5 per tick
        assert_eq!(ticks, 19);
    }

    #[test]
    fn test_player_sighting_pursues() {
        let (mut state, mut agent) = alerted();
        agent.set_visual_threat(TargetKind::VisualPlayer, Some(ColliderId::from_index(2)), Vec3::Z, 1.0);
        assert_eq!(state.on_update(&mut agent), StateId::Pursuit);
        assert_eq!(agent.target_kind(), TargetKind::VisualPlayer);
    }

    #[test]
    fn test_sound_ahead_pursues() {
        let (mut state, mut agent) = alerted();
        agent.set_audio_threat(Some(ColliderId::from_index(4)), Vec3::new(0.1, 0.0, 5.0), 5.0);
        assert_eq!(state.on_update(&mut agent), StateId::Pursuit);
        assert_eq!(agent.target_kind(), TargetKind::Audio);
    }

    #[test]
    fn test_sound_behind_searches_and_rearms() {
        let (mut state, mut agent) = alerted();
        state.on_update(&mut agent);
        assert!(state.remaining() < 10.0);

        agent.set_audio_threat(Some(ColliderId::from_index(4)), Vec3::new(5.0, 0.0, -5.0), 7.0);
        assert_eq!(state.on_update(&mut agent), StateId::Alerted);
        assert_eq!(state.remaining(), 10.0);
        assert!(agent.archetype.seeking == 1 || agent.archetype.seeking == -1);
    }

    #[test]
    fn test_intelligent_zombie_turns_towards_light() {
        let mut agent = zombie();
        agent.archetype = Zombie::new(ZombieConfig {
            intelligence: 1.0,
            ..ZombieConfig::default()
        });
        let mut state = AlertedState::default();
        state.on_enter_state(&mut agent);
        tick(&mut agent, 0.1);

        agent.set_visual_threat(TargetKind::VisualLight, Some(ColliderId::from_index(6)), Vec3::new(5.0, 0.0, 0.0), 5.0);
        assert_eq!(state.on_update(&mut agent), StateId::Alerted);
        assert_eq!(agent.archetype.seeking, 1);

        agent.set_visual_threat(TargetKind::VisualLight, Some(ColliderId::from_index(6)), Vec3::new(-5.0, 0.0, 0.0), 5.0);
        assert_eq!(state.on_update(&mut agent), StateId::Alerted);
        assert_eq!(agent.archetype.seeking, -1);
    }

    #[test]
    fn test_food_pursued_only_in_silence() {
        let (mut state, mut agent) = alerted();
        agent.set_visual_threat(TargetKind::VisualFood, Some(ColliderId::from_index(8)), Vec3::Z, 1.0);
        agent.set_audio_threat(Some(ColliderId::from_index(4)), Vec3::new(5.0, 0.0, -5.0), 7.0);
        assert_eq!(state.on_update(&mut agent), StateId::Alerted);

        agent.clear_threats();
        agent.set_visual_threat(TargetKind::VisualFood, Some(ColliderId::from_index(8)), Vec3::Z, 1.0);
        assert_eq!(state.on_update(&mut agent), StateId::Pursuit);
        assert_eq!(agent.target_kind(), TargetKind::VisualFood);
    }

    #[test]
    fn test_waypoint_ahead_resumes_patrol() {
        let (mut state, mut agent) = alerted();
        agent.set_waypoint_network(Some(route()));
        super::super::head_to_waypoint(&mut agent, false);
        assert_eq!(state.on_update(&mut agent), StateId::Patrol);

        agent.nav_mut().set_destination(Vec3::new(-1.0, 0.0, -4.0));
        assert_eq!(state.on_update(&mut agent), StateId::Alerted);
        assert_eq!(agent.archetype.seeking, -1);
    }
}
