//! Per-agent data shared by every behavior state

use crate::animation::{AnimationDriver, AnimatorParameters};
use crate::config::AgentConfig;
use crate::geometry::{look_rotation, slerp_towards};
use crate::navigation::{DirectPathFollower, PathFollower};
use crate::physics::CollisionLayer;
use crate::root_motion::RootMotionRequests;
use crate::scene::{ColliderInfo, SceneContext};
use crate::sensor::sphere_to_world;
use crate::target::{Target, TargetKind};
use crate::waypoint::{WaypointCursor, WaypointNetwork};
use glam::{Quat, Vec3};
use horde_core::{AgentId, ColliderId, SimClock};
use horde_triggers::{TriggerBody, TriggerComponent, TriggerEventType, TriggerFilter, TriggerVolume};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::sync::Arc;

/// The kind of agent a state machine drives.
///
/// Holds archetype data (traits, animation-facing values) in
/// [`Agent::archetype`] and hooks that apply to every state.
pub trait Archetype: Sized + 'static {
    /// Runs every tick after the current state's update
    fn after_update(_agent: &mut Agent<Self>) {}

    /// Sensor handling shared by every state that does not override it
    fn on_sensor_event(
        _agent: &mut Agent<Self>,
        _kind: TriggerEventType,
        _other: &ColliderInfo,
        _scene: &SceneContext<'_>,
    ) {
    }
}

impl Archetype for () {}

/// Position, rotation and scale of an agent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Unit vector the agent faces
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// Everything a behavior state reads and mutates about its agent.
///
/// Owns the current target and the two threat records, the target volume
/// and its arrival latch, root motion counts and the collaborators the agent
/// drives.
pub struct Agent<A> {
    id: AgentId,
    body: ColliderId,
    pub transform: Transform,
    config: AgentConfig,
    clock: SimClock,
    target: Target,
    visual_threat: Target,
    audio_threat: Target,
    root_motion: RootMotionRequests,
    target_trigger: TriggerComponent,
    target_reached: bool,
    in_melee_range: bool,
    waypoints: Option<Arc<WaypointNetwork>>,
    waypoint_cursor: WaypointCursor,
    nav: Box<dyn PathFollower>,
    animator: Box<dyn AnimationDriver>,
    rng: ChaCha8Rng,
    pub archetype: A,
}

impl<A> Agent<A> {
    /// Create an agent with default config, a [`DirectPathFollower`] and an
    /// [`AnimatorParameters`] recorder
    pub fn new(id: AgentId, body: ColliderId, archetype: A) -> Self {
        let config = AgentConfig::default();
        Self {
            id,
            body,
            transform: Transform::default(),
            rng: seeded_rng(&config, id),
            target_trigger: target_volume(body, config.stopping_distance),
            config,
            clock: SimClock::new(),
            target: Target::NONE,
            visual_threat: Target::NONE,
            audio_threat: Target::NONE,
            root_motion: RootMotionRequests::new(),
            target_reached: false,
            in_melee_range: false,
            waypoints: None,
            waypoint_cursor: WaypointCursor::new(),
            nav: Box::new(DirectPathFollower::default()),
            animator: Box::new(AnimatorParameters::new()),
            archetype,
        }
    }

    /// Replace the config, reseeding the random stream
    pub fn with_config(mut self, config: AgentConfig) -> Self {
        self.rng = seeded_rng(&config, self.id);
        self.target_trigger.set_radius(config.stopping_distance);
        self.config = config;
        self
    }

    /// Use another path follower, moved to the agent's position
    pub fn with_path_follower(mut self, mut nav: Box<dyn PathFollower>) -> Self {
        nav.warp(self.transform.position);
        self.nav = nav;
        self
    }

    pub fn with_animator(mut self, animator: Box<dyn AnimationDriver>) -> Self {
        self.animator = animator;
        self
    }

    pub fn with_waypoints(mut self, network: Arc<WaypointNetwork>) -> Self {
        self.set_waypoint_network(Some(network));
        self
    }

    /// Place the agent (and its path follower)
    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self.nav.warp(position);
        self
    }

    pub fn facing(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    #[inline]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// The agent's root collider
    #[inline]
    pub fn body(&self) -> ColliderId {
        self.body
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Simulation time in seconds
    #[inline]
    pub fn now(&self) -> f32 {
        self.clock.now()
    }

    /// Length of the current tick
    #[inline]
    pub fn delta_time(&self) -> f32 {
        self.clock.delta()
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }

    /// World-space center of the sensor sphere
    pub fn sensor_position(&self) -> Vec3 {
        self.sensor_sphere().0
    }

    /// World-space radius of the sensor sphere
    pub fn sensor_radius(&self) -> f32 {
        self.sensor_sphere().1
    }

    fn sensor_sphere(&self) -> (Vec3, f32) {
        sphere_to_world(
            self.transform.position,
            self.config.sensor_offset,
            self.config.sensor_radius,
            self.transform.scale,
        )
    }

    // Targets

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn target_kind(&self) -> TargetKind {
        self.target.kind()
    }

    pub fn target_position(&self) -> Vec3 {
        self.target.position()
    }

    pub fn target_source(&self) -> Option<ColliderId> {
        self.target.source()
    }

    pub fn visual_threat(&self) -> &Target {
        &self.visual_threat
    }

    pub fn audio_threat(&self) -> &Target {
        &self.audio_threat
    }

    /// Set the current target with the default stopping distance as the
    /// target volume radius
    pub fn set_target(
        &mut self,
        kind: TargetKind,
        source: Option<ColliderId>,
        position: Vec3,
        distance: f32,
    ) {
        let radius = self.config.stopping_distance;
        self.set_target_with_radius(kind, source, position, distance, radius);
    }

    /// Set the current target and move the target volume onto it
    pub fn set_target_with_radius(
        &mut self,
        kind: TargetKind,
        source: Option<ColliderId>,
        position: Vec3,
        distance: f32,
        radius: f32,
    ) {
        if kind == TargetKind::None {
            self.clear_target();
            return;
        }
        let now = self.clock.now();
        self.target.set(kind, source, position, distance, now);
        self.place_target_volume(position, radius);
    }

    /// Adopt a perceived threat as the current target
    pub fn set_target_from(&mut self, threat: &Target) {
        if threat.is_none() {
            self.clear_target();
            return;
        }
        self.target = *threat;
        let radius = self.config.stopping_distance;
        self.place_target_volume(threat.position(), radius);
    }

    fn place_target_volume(&mut self, position: Vec3, radius: f32) {
        self.target_trigger.set_radius(radius);
        self.target_trigger.set_position(position);
        self.target_trigger.enable();
    }

    /// Drop the target; no arrival is reported until a new one is set
    pub fn clear_target(&mut self) {
        self.target.clear();
        self.target_trigger.disable();
    }

    /// Record a visual threat (player, light or food)
    pub fn set_visual_threat(
        &mut self,
        kind: TargetKind,
        source: Option<ColliderId>,
        position: Vec3,
        distance: f32,
    ) {
        let now = self.clock.now();
        self.visual_threat.set(kind, source, position, distance, now);
    }

    /// Record an audio threat
    pub fn set_audio_threat(&mut self, source: Option<ColliderId>, position: Vec3, distance: f32) {
        let now = self.clock.now();
        self.audio_threat
            .set(TargetKind::Audio, source, position, distance, now);
    }

    pub fn clear_threats(&mut self) {
        self.visual_threat.clear();
        self.audio_threat.clear();
    }

    /// The agent is inside its target volume
    pub fn is_target_reached(&self) -> bool {
        self.target_reached
    }

    pub(crate) fn set_target_reached(&mut self, reached: bool) {
        self.target_reached = reached;
    }

    pub fn target_trigger(&self) -> &TriggerComponent {
        &self.target_trigger
    }

    pub(crate) fn target_trigger_mut(&mut self) -> &mut TriggerComponent {
        &mut self.target_trigger
    }

    /// This agent's body as seen by trigger volumes
    pub fn trigger_body(&self) -> TriggerBody {
        TriggerBody::new(self.body)
            .with_position(self.transform.position)
            .with_layers(CollisionLayer::AI_ENTITY.as_mask())
    }

    pub fn in_melee_range(&self) -> bool {
        self.in_melee_range
    }

    pub fn set_in_melee_range(&mut self, in_range: bool) {
        self.in_melee_range = in_range;
    }

    // Root motion

    pub fn root_motion(&self) -> &RootMotionRequests {
        &self.root_motion
    }

    pub fn root_motion_mut(&mut self) -> &mut RootMotionRequests {
        &mut self.root_motion
    }

    /// Add signed deltas to the root position and rotation request counts
    pub fn add_root_motion_request(&mut self, delta_position: i32, delta_rotation: i32) {
        self.root_motion.add(delta_position, delta_rotation);
    }

    pub fn use_root_position(&self) -> bool {
        self.root_motion.use_root_position()
    }

    pub fn use_root_rotation(&self) -> bool {
        self.root_motion.use_root_rotation()
    }

    /// Copy this tick's root motion into the agent where the animation owns it
    pub fn apply_root_motion(&mut self) {
        let delta_time = self.clock.delta();
        if self.root_motion.use_root_position() && delta_time > 0.0 {
            let velocity = self.animator.delta_position() / delta_time;
            self.nav.set_velocity(velocity);
        }
        if self.root_motion.use_root_rotation() {
            self.transform.rotation = self.animator.root_rotation();
        }
    }

    // Collaborators

    /// Choose which degrees of freedom the path follower drives
    pub fn nav_agent_control(&mut self, position: bool, rotation: bool) {
        self.nav.set_update_position(position);
        self.nav.set_update_rotation(rotation);
    }

    pub fn nav(&self) -> &dyn PathFollower {
        self.nav.as_ref()
    }

    pub fn nav_mut(&mut self) -> &mut dyn PathFollower {
        self.nav.as_mut()
    }

    /// The path follower as its concrete type
    pub fn nav_as<T: 'static>(&self) -> Option<&T> {
        self.nav.as_any().downcast_ref::<T>()
    }

    pub fn nav_as_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.nav.as_any_mut().downcast_mut::<T>()
    }

    pub fn animator(&self) -> &dyn AnimationDriver {
        self.animator.as_ref()
    }

    pub fn animator_mut(&mut self) -> &mut dyn AnimationDriver {
        self.animator.as_mut()
    }

    /// The animation driver as its concrete type
    pub fn animator_as<T: 'static>(&self) -> Option<&T> {
        self.animator.as_any().downcast_ref::<T>()
    }

    pub fn animator_as_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.animator.as_any_mut().downcast_mut::<T>()
    }

    /// The agent's deterministic random stream
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    // Waypoints

    pub fn waypoint_network(&self) -> Option<&WaypointNetwork> {
        self.waypoints.as_deref()
    }

    /// Swap the patrol network; selection restarts on the new one
    pub fn set_waypoint_network(&mut self, network: Option<Arc<WaypointNetwork>>) {
        self.waypoints = network;
        self.waypoint_cursor.reset();
    }

    /// Index of the waypoint last selected
    pub fn current_waypoint(&self) -> Option<usize> {
        self.waypoint_cursor.current()
    }

    /// Select a waypoint, make it the target and return its position.
    ///
    /// Returns `None` and leaves the target alone when there is no network
    /// or it is empty.
    pub fn next_waypoint_position(&mut self, increment: bool) -> Option<Vec3> {
        let Some(network) = self.waypoints.as_ref() else {
            log::debug!("{}: no waypoint network assigned", self.id);
            return None;
        };
        let Some(index) = self.waypoint_cursor.select(
            network.len(),
            increment,
            self.config.random_patrol,
            &mut self.rng,
        ) else {
            log::debug!("{}: waypoint network is empty", self.id);
            return None;
        };
        let position = network.position(index)?;

        let distance = self.transform.position.distance(position);
        self.set_target(TargetKind::Waypoint, None, position, distance);
        Some(position)
    }

    // Facing

    /// Horizontal direction from the agent to `point`
    pub fn flat_direction_to(&self, point: Vec3) -> Vec3 {
        let mut point = point;
        point.y = self.transform.position.y;
        point - self.transform.position
    }

    /// Turn towards `direction` by fraction `t`; a zero direction is ignored
    pub fn turn_towards(&mut self, direction: Vec3, t: f32) {
        if let Some(rotation) = look_rotation(direction) {
            self.transform.rotation = slerp_towards(self.transform.rotation, rotation, t);
        }
    }

    // Ticking

    pub(crate) fn advance_clock(&mut self, delta_time: f32) {
        self.clock.advance(delta_time);
    }

    /// Start of a physics step: forget threats, refresh target distance and
    /// assume the target is not reached until the target volume says so
    pub(crate) fn begin_physics_step(&mut self) {
        self.clear_threats();
        if !self.target.is_none() {
            let distance = self.transform.position.distance(self.target.position());
            self.target.set_distance(distance);
        }
        self.target_reached = false;
    }

    /// Let the path follower move and copy its results into the transform
    pub fn sync_navigation(&mut self, delta_time: f32) {
        self.nav.update(delta_time);
        if self.nav.updates_position() {
            self.transform.position = self.nav.position();
        }
        if self.nav.updates_rotation() && !self.root_motion.use_root_rotation() {
            if let Some(rotation) = look_rotation(self.nav.desired_velocity()) {
                self.transform.rotation = rotation;
            }
        }
    }
}

impl<A: fmt::Debug> fmt::Debug for Agent<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("body", &self.body)
            .field("transform", &self.transform)
            .field("target", &self.target)
            .field("visual_threat", &self.visual_threat)
            .field("audio_threat", &self.audio_threat)
            .field("target_reached", &self.target_reached)
            .field("in_melee_range", &self.in_melee_range)
            .field("archetype", &self.archetype)
            .finish()
    }
}

fn seeded_rng(config: &AgentConfig, id: AgentId) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(config.rng_seed.unwrap_or_else(|| id.id().to_bits()))
}

/// The target volume only ever reports the agent's own body
fn target_volume(body: ColliderId, radius: f32) -> TriggerComponent {
    TriggerComponent::new(TriggerVolume::sphere(radius))
        .with_filter(TriggerFilter::new().only_colliders([body]).allow_self_trigger())
        .with_stay_events()
        .disabled()
}
