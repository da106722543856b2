use super::{face_target, LookAt, Zombie};
use crate::agent::Agent;
use crate::config::PursuitConfig;
use crate::navigation::PathStatus;
use crate::state::{BehaviorState, StateId};
use crate::target::{Target, TargetKind};

/// Chases the current target and keeps it fresh from the threats
#[derive(Debug, Clone, Default)]
pub struct PursuitState {
    config: PursuitConfig,
    timer: f32,
    repath_timer: f32,
    look_at: LookAt,
}

impl PursuitState {
    pub fn new(config: PursuitConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Seconds spent in this pursuit
    pub fn elapsed(&self) -> f32 {
        self.timer
    }

    pub fn look_at_weight(&self) -> f32 {
        self.look_at.weight()
    }

    /// Keep chasing `threat`, re-pathing once the delay for its distance
    /// has passed
    fn follow(&mut self, agent: &mut Agent<Zombie>, threat: &Target, min_delay: f32, max_delay: f32) {
        if agent.target_position() != threat.position() {
            let delay = (threat.distance() * self.config.repath_distance_multiplier)
                .max(min_delay)
                .min(max_delay);
            if delay < self.repath_timer {
                agent.nav_mut().set_destination(threat.position());
                self.repath_timer = 0.0;
            }
        }
        agent.set_target_from(threat);
    }

    fn steer(&self, agent: &mut Agent<Zombie>) -> Option<StateId> {
        if agent.nav().path_pending() {
            agent.archetype.speed = 0.0;
            return None;
        }

        agent.archetype.speed = self.config.speed;
        let reached = agent.is_target_reached();
        let face_player = agent.target_kind() == TargetKind::VisualPlayer
            && agent.visual_threat().is(TargetKind::VisualPlayer);

        if !agent.use_root_position() && face_player && reached {
            face_target(agent, 1.0);
        } else if !agent.use_root_rotation() && !reached {
            let direction = agent.nav().desired_velocity();
            let t = agent.delta_time() * self.config.slerp_speed;
            agent.turn_towards(direction, t);
        } else if reached {
            return Some(StateId::Alerted);
        }
        None
    }
}

impl BehaviorState<Zombie> for PursuitState {
    fn id(&self) -> StateId {
        StateId::Pursuit
    }

    fn on_enter_state(&mut self, agent: &mut Agent<Zombie>) {
        agent.nav_agent_control(true, false);
        let speed = agent.archetype.speed;
        agent.archetype.reset_drives(speed);
        self.look_at.reset();
        self.timer = 0.0;
        self.repath_timer = 0.0;

        let destination = agent.target_position();
        agent.nav_mut().set_destination(destination);
        agent.nav_mut().set_stopped(false);
    }

    fn on_update(&mut self, agent: &mut Agent<Zombie>) -> StateId {
        let delta_time = agent.delta_time();
        self.timer += delta_time;
        self.repath_timer += delta_time;

        if self.timer > self.config.max_duration {
            return StateId::Patrol;
        }

        if agent.target_kind() == TargetKind::VisualPlayer && agent.in_melee_range() {
            return StateId::Attack;
        }

        if agent.is_target_reached() {
            match agent.target_kind() {
                TargetKind::Audio | TargetKind::VisualLight => {
                    agent.clear_target();
                    return StateId::Alerted;
                }
                TargetKind::VisualFood => return StateId::Feeding,
                _ => {}
            }
        }

        let nav = agent.nav();
        if nav.is_path_stale()
            || (!nav.has_path() && nav.path_pending())
            || nav.path_status() != PathStatus::Complete
        {
            return StateId::Alerted;
        }

        if let Some(next) = self.steer(agent) {
            return next;
        }

        let visual = *agent.visual_threat();
        let audio = *agent.audio_threat();

        if visual.is(TargetKind::VisualPlayer) {
            let (min, max) = (self.config.repath_visual_min, self.config.repath_visual_max);
            self.follow(agent, &visual, min, max);
            return StateId::Pursuit;
        }

        // Out of sight but still the last known position
        if agent.target_kind() == TargetKind::VisualPlayer {
            return StateId::Pursuit;
        }

        if visual.is(TargetKind::VisualLight) {
            match agent.target_kind() {
                TargetKind::Audio | TargetKind::VisualFood => {
                    agent.set_target_from(&visual);
                    return StateId::Alerted;
                }
                TargetKind::VisualLight => {
                    if agent.target_source() == visual.source() {
                        let (min, max) = (self.config.repath_visual_min, self.config.repath_visual_max);
                        self.follow(agent, &visual, min, max);
                        return StateId::Pursuit;
                    }
                    agent.set_target_from(&visual);
                    return StateId::Alerted;
                }
                _ => {}
            }
        } else if audio.is(TargetKind::Audio) {
            match agent.target_kind() {
                TargetKind::VisualFood => {
                    agent.set_target_from(&audio);
                    return StateId::Alerted;
                }
                TargetKind::Audio => {
                    if agent.target_source() == audio.source() {
                        let (min, max) = (self.config.repath_audio_min, self.config.repath_audio_max);
                        self.follow(agent, &audio, min, max);
                        return StateId::Pursuit;
                    }
                    agent.set_target_from(&audio);
                    return StateId::Alerted;
                }
                _ => {}
            }
        }

        StateId::Pursuit
    }

    fn on_animator_ik_updated(&mut self, agent: &mut Agent<Zombie>) {
        self.look_at.update(
            agent,
            self.config.look_at_weight,
            self.config.look_at_angle_threshold,
        );
    }
}
