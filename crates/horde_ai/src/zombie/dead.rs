use super::Zombie;
use crate::agent::Agent;
use crate::scene::{ColliderInfo, SceneContext};
use crate::state::{BehaviorState, StateId};
use horde_triggers::TriggerEventType;

/// Terminal state: the zombie stops and never leaves it
#[derive(Debug, Clone, Copy, Default)]
pub struct DeadState;

impl BehaviorState<Zombie> for DeadState {
    fn id(&self) -> StateId {
        StateId::Dead
    }

    fn on_enter_state(&mut self, agent: &mut Agent<Zombie>) {
        agent.archetype.reset_drives(0.0);
        agent.clear_target();
        agent.clear_threats();
        agent.nav_mut().set_stopped(true);
        agent.nav_agent_control(false, false);
    }

    fn on_update(&mut self, _agent: &mut Agent<Zombie>) -> StateId {
        StateId::Dead
    }

    fn on_trigger_event(
        &mut self,
        _agent: &mut Agent<Zombie>,
        _kind: TriggerEventType,
        _other: &ColliderInfo,
        _scene: &SceneContext<'_>,
    ) {
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::agent::Archetype;
    use crate::physics::{CollisionLayer, SphereWorld};
    use crate::scene::SceneRegistry;
    use crate::target::TargetKind;
    use glam::Vec3;
    use horde_core::ColliderId;

    #[test]
    fn test_dead_zombie_stops() {
        let mut agent = zombie();
        agent.archetype.speed = 3.0;
        agent.set_target(TargetKind::VisualPlayer, None, Vec3::Z, 1.0);

        let mut state = DeadState;
        state.on_enter_state(&mut agent);

        assert_eq!(agent.archetype.speed, 0.0);
        assert!(agent.target().is_none());
        assert!(agent.nav().is_stopped());
        assert!(!agent.nav().updates_position());
        assert_eq!(state.on_update(&mut agent), StateId::Dead);
    }

    #[test]
    fn test_dead_zombie_ignores_sensor() {
        let mut agent = zombie();
        let mut registry = SceneRegistry::new();
        registry.register_player(ColliderId::from_index(3));
        let mut world = SphereWorld::new();
        world.insert(ColliderId::from_index(3), Vec3::Z * 2.0, 0.5, CollisionLayer::PLAYER);
        let scene = SceneContext::new(&registry, &world);
        let player = ColliderInfo::new(ColliderId::from_index(3), Vec3::Z * 2.0).player();

        // A living zombie would see this player
        Zombie::on_sensor_event(&mut agent, TriggerEventType::Enter, &player, &scene);
        assert!(!agent.visual_threat().is_none());
        agent.clear_threats();

        DeadState.on_trigger_event(&mut agent, TriggerEventType::Enter, &player, &scene);
        assert!(agent.visual_threat().is_none());
    }
}
