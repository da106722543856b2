use super::{calm_threat_response, head_to_waypoint, Zombie};
use crate::agent::Agent;
use crate::config::PatrolConfig;
use crate::geometry::angle_between;
use crate::navigation::PathStatus;
use crate::state::{BehaviorState, StateId};
use crate::target::TargetKind;

/// Walks the waypoint network until something worth reacting to shows up
#[derive(Debug, Clone, Default)]
pub struct PatrolState {
    config: PatrolConfig,
}

impl PatrolState {
    pub fn new(config: PatrolConfig) -> Self {
        Self { config }
    }
}

impl BehaviorState<Zombie> for PatrolState {
    fn id(&self) -> StateId {
        StateId::Patrol
    }

    fn on_enter_state(&mut self, agent: &mut Agent<Zombie>) {
        agent.nav_agent_control(true, false);
        agent.archetype.reset_drives(self.config.speed);

        if agent.target_kind() != TargetKind::Waypoint {
            agent.clear_target();
            head_to_waypoint(agent, false);
        }

        agent.nav_mut().set_stopped(false);
    }

    fn on_update(&mut self, agent: &mut Agent<Zombie>) -> StateId {
        if let Some(next) = calm_threat_response(agent) {
            return next;
        }

        // Too far off course to walk and turn at once
        let to_steering = agent.nav().steering_target() - agent.position();
        if angle_between(agent.forward(), to_steering) > self.config.turn_on_spot_threshold {
            return StateId::Alerted;
        }

        if !agent.use_root_rotation() {
            let direction = agent.nav().desired_velocity();
            let t = agent.delta_time() * self.config.slerp_speed;
            agent.turn_towards(direction, t);
        }

        let nav = agent.nav();
        if nav.is_path_stale() || !nav.has_path() || nav.path_status() != PathStatus::Complete {
            head_to_waypoint(agent, true);
        }

        StateId::Patrol
    }

    fn on_destination_reached(&mut self, agent: &mut Agent<Zombie>, reached: bool) {
        if reached && agent.target_kind() == TargetKind::Waypoint {
            head_to_waypoint(agent, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::navigation::DirectPathFollower;
    use glam::Vec3;
    use horde_core::ColliderId;

    fn patrolling() -> (PatrolState, Agent<Zombie>) {
        let mut agent = zombie().with_waypoints(route());
        let mut state = PatrolState::default();
        state.on_enter_state(&mut agent);
        tick(&mut agent, 0.1);
        (state, agent)
    }

    #[test]
    fn test_enter_targets_first_waypoint() {
        let (_, agent) = patrolling();
        assert_eq!(agent.target_kind(), TargetKind::Waypoint);
        assert_eq!(agent.target_position(), Vec3::new(0.0, 0.0, 4.0));
        assert_eq!(agent.current_waypoint(), Some(0));
        assert_eq!(agent.archetype.speed, 2.0);
        assert!(agent.nav().updates_position());
        assert!(!agent.nav().updates_rotation());

        let nav = agent.nav_as::<DirectPathFollower>().unwrap();
        assert_eq!(nav.destination(), Some(Vec3::new(0.0, 0.0, 4.0)));
    }

    #[test]
    fn test_enter_keeps_existing_waypoint_target() {
        let mut agent = zombie().with_waypoints(route());
        agent.next_waypoint_position(false);
        agent.next_waypoint_position(true);

        PatrolState::default().on_enter_state(&mut agent);
        assert_eq!(agent.current_waypoint(), Some(1));
        assert_eq!(agent.target_position(), Vec3::new(0.0, 0.0, 8.0));
    }

    #[test]
    fn test_destination_reached_advances() {
        let (mut state, mut agent) = patrolling();

        state.on_destination_reached(&mut agent, false);
        assert_eq!(agent.current_waypoint(), Some(0));

        state.on_destination_reached(&mut agent, true);
        assert_eq!(agent.current_waypoint(), Some(1));
        assert_eq!(agent.target_position(), Vec3::new(0.0, 0.0, 8.0));

        state.on_destination_reached(&mut agent, true);
        assert_eq!(agent.current_waypoint(), Some(0));
    }

    #[test]
    fn test_stays_in_patrol_without_threats() {
        let (mut state, mut agent) = patrolling();
        assert_eq!(state.on_update(&mut agent), StateId::Patrol);
        assert_eq!(state.on_update(&mut agent), StateId::Patrol);
    }

    #[test]
    fn test_player_sighting_pursues() {
        let (mut state, mut agent) = patrolling();
        agent.set_visual_threat(
            TargetKind::VisualPlayer,
            Some(ColliderId::from_index(3)),
            Vec3::new(1.0, 0.0, 3.0),
            3.2,
        );

        assert_eq!(state.on_update(&mut agent), StateId::Pursuit);
        assert_eq!(agent.target_kind(), TargetKind::VisualPlayer);
        assert_eq!(agent.target_source(), Some(ColliderId::from_index(3)));
    }

    #[test]
    fn test_sharp_turn_raises_alert() {
        let (mut state, mut agent) = patrolling();
        agent.nav_mut().set_destination(Vec3::new(0.0, 0.0, -4.0));
        assert_eq!(state.on_update(&mut agent), StateId::Alerted);
    }

    #[test]
    fn test_invalid_path_picks_next_waypoint() {
        let (mut state, mut agent) = patrolling();
        agent
            .nav_as_mut::<DirectPathFollower>()
            .unwrap()
            .set_path_status(PathStatus::Partial);

        assert_eq!(state.on_update(&mut agent), StateId::Patrol);
        assert_eq!(agent.current_waypoint(), Some(1));
    }

    #[test]
    fn test_turns_along_desired_velocity() {
        let mut agent = zombie().with_waypoints(std::sync::Arc::new(
            crate::waypoint::WaypointNetwork::from_positions([Vec3::new(4.0, 0.0, 4.0)]),
        ));
        let mut state = PatrolState::default();
        state.on_enter_state(&mut agent);
        tick(&mut agent, 0.1);

        let before = agent.forward();
        assert_eq!(state.on_update(&mut agent), StateId::Patrol);
        assert!(agent.forward().x > before.x);
    }
}
