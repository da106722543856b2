//! Agent state machine
//!
//! Owns an agent and its behavior states and drives the
//! perception, arbitration and transition cycle:
//!
//! 1. [`AgentStateMachine::fixed_update`] at the start of each physics step
//! 2. sensor and target volume callbacks for that step
//! 3. [`AgentStateMachine::update`] once per tick
//! 4. animation callbacks

use crate::agent::{Agent, Archetype};
use crate::scene::{ColliderInfo, SceneContext};
use crate::state::{BehaviorState, StateId};
use horde_core::AgentId;
use horde_triggers::system::step_trigger;
use horde_triggers::TriggerEventType;
use std::fmt;

/// Finite state machine driving one agent
pub struct AgentStateMachine<A: Archetype> {
    agent: Agent<A>,
    states: [Option<Box<dyn BehaviorState<A>>>; StateId::COUNT],
    current: Option<StateId>,
    started: bool,
    // Set when a physics step already moved the clock for this tick
    clock_advanced: bool,
}

impl<A: Archetype> AgentStateMachine<A> {
    /// Create a machine with no states registered
    pub fn new(agent: Agent<A>) -> Self {
        Self {
            agent,
            states: std::array::from_fn(|_| None),
            current: None,
            started: false,
            clock_advanced: false,
        }
    }

    /// Register a state (builder form)
    pub fn with_state<S: BehaviorState<A> + 'static>(mut self, state: S) -> Self {
        self.register_state(Box::new(state));
        self
    }

    /// Register a state under its id.
    ///
    /// The first registration for an id wins; later ones are rejected.
    pub fn register_state(&mut self, mut state: Box<dyn BehaviorState<A>>) -> bool {
        let id = state.id();
        let slot = &mut self.states[id.index()];
        if slot.is_some() {
            log::warn!("{}: state {} already registered, ignoring duplicate", self.agent.id(), id);
            return false;
        }
        state.on_registered(self.agent.id());
        *slot = Some(state);
        true
    }

    /// Enter the configured initial state, or Idle if it is not registered.
    ///
    /// With neither registered the machine has no current state and every
    /// update is a no-op for the state layer.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        let initial = self.agent.config().initial_state;
        let entered = if self.has_state(initial) {
            Some(initial)
        } else if self.has_state(StateId::Idle) {
            log::debug!(
                "{}: initial state {} not registered, starting in Idle",
                self.agent.id(),
                initial
            );
            Some(StateId::Idle)
        } else {
            log::warn!("{}: initial state {} not registered and no Idle fallback", self.agent.id(), initial);
            None
        };

        self.current = entered;
        if let Some(id) = entered {
            log::debug!("{}: entering {}", self.agent.id(), id);
            if let Some(state) = self.states[id.index()].as_mut() {
                state.on_enter_state(&mut self.agent);
            }
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    pub fn has_state(&self, id: StateId) -> bool {
        self.states[id.index()].is_some()
    }

    /// Number of registered states
    pub fn state_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_some()).count()
    }

    pub fn id(&self) -> AgentId {
        self.agent.id()
    }

    pub fn agent(&self) -> &Agent<A> {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut Agent<A> {
        &mut self.agent
    }

    /// Start of a physics step.
    ///
    /// Advances the clock so threats recorded by this step's sensor callbacks
    /// carry the current tick time. Threats are cleared for those callbacks to
    /// rebuild, target distance is refreshed and the arrival latch resets
    /// until the target volume reports again.
    pub fn fixed_update(&mut self, delta_time: f32) {
        self.agent.advance_clock(delta_time);
        self.clock_advanced = true;
        self.agent.begin_physics_step();
    }

    /// Run one tick of the current state and apply the transition it asks for.
    ///
    /// The clock moves here only when no physics step preceded this tick.
    pub fn update(&mut self, delta_time: f32) {
        if !self.clock_advanced {
            self.agent.advance_clock(delta_time);
        }
        self.clock_advanced = false;

        if let Some(current) = self.current {
            if let Some(state) = self.states[current.index()].as_mut() {
                let next = state.on_update(&mut self.agent);
                self.transition_to(next);
            }
        }

        A::after_update(&mut self.agent);
    }

    /// Forward a sensor event to the current state
    pub fn on_trigger_event(
        &mut self,
        kind: TriggerEventType,
        other: &ColliderInfo,
        scene: &SceneContext<'_>,
    ) {
        if let Some((state, agent)) = self.current_with_agent() {
            state.on_trigger_event(agent, kind, other, scene);
        }
    }

    /// The agent's body entered, stayed in or left its target volume.
    ///
    /// Ignored while the volume is disabled (no target).
    pub fn on_target_trigger_event(&mut self, kind: TriggerEventType) {
        if !self.agent.target_trigger().is_enabled() {
            return;
        }

        match kind {
            TriggerEventType::Enter => {
                self.agent.set_target_reached(true);
                if let Some((state, agent)) = self.current_with_agent() {
                    state.on_destination_reached(agent, true);
                }
            }
            TriggerEventType::Stay => self.agent.set_target_reached(true),
            TriggerEventType::Exit => {
                self.agent.set_target_reached(false);
                if let Some((state, agent)) = self.current_with_agent() {
                    state.on_destination_reached(agent, false);
                }
            }
        }
    }

    /// Test the agent's body against its own target volume and dispatch the
    /// resulting events
    pub fn evaluate_target_trigger(&mut self, delta_time: f32) {
        if !self.agent.target_trigger().is_enabled() {
            return;
        }
        let body = self.agent.trigger_body();
        let now = self.agent.now();
        let trigger = self.agent.target_trigger_mut();
        step_trigger(body.id, trigger, delta_time, now, std::slice::from_ref(&body));
        let events = trigger.drain_events();

        for event in events {
            self.on_target_trigger_event(event.event_type);
        }
    }

    /// The animation system produced root motion
    pub fn animator_updated(&mut self) {
        if let Some((state, agent)) = self.current_with_agent() {
            state.on_animator_updated(agent);
        }
    }

    /// Inverse kinematics is about to be resolved
    pub fn animator_ik_updated(&mut self) {
        if let Some((state, agent)) = self.current_with_agent() {
            state.on_animator_ik_updated(agent);
        }
    }

    /// Let the path follower move the agent
    pub fn advance_navigation(&mut self, delta_time: f32) {
        self.agent.sync_navigation(delta_time);
    }

    /// Switch to `id` regardless of what the current state wants.
    ///
    /// Returns false if `id` is not registered or the machine has no
    /// current state.
    pub fn force_state(&mut self, id: StateId) -> bool {
        if !self.has_state(id) || self.current.is_none() {
            return false;
        }
        if self.current != Some(id) {
            self.switch(id);
        }
        true
    }

    /// The current state together with the agent it acts on
    fn current_with_agent(&mut self) -> Option<(&mut Box<dyn BehaviorState<A>>, &mut Agent<A>)> {
        let current = self.current?;
        let state = self.states[current.index()].as_mut()?;
        Some((state, &mut self.agent))
    }

    /// Apply the id returned by `on_update`, falling back to Idle for ids
    /// that are not registered
    fn transition_to(&mut self, requested: StateId) {
        let Some(current) = self.current else {
            return;
        };
        if requested == current {
            return;
        }

        let next = if self.has_state(requested) {
            requested
        } else if self.has_state(StateId::Idle) {
            log::debug!(
                "{}: state {} not registered, falling back to Idle",
                self.agent.id(),
                requested
            );
            StateId::Idle
        } else {
            log::warn!(
                "{}: state {} not registered and no Idle fallback, staying in {}",
                self.agent.id(),
                requested,
                current
            );
            return;
        };

        if next != current {
            self.switch(next);
        }
    }

    fn switch(&mut self, next: StateId) {
        let Some(current) = self.current else {
            return;
        };
        log::debug!("{}: {} -> {}", self.agent.id(), current, next);

        if let Some(state) = self.states[current.index()].as_mut() {
            state.on_exit_state(&mut self.agent);
        }
        if let Some(state) = self.states[next.index()].as_mut() {
            state.on_enter_state(&mut self.agent);
        }
        self.current = Some(next);
    }
}

impl<A: Archetype + fmt::Debug> fmt::Debug for AgentStateMachine<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered: Vec<StateId> = StateId::ALL
            .into_iter()
            .filter(|id| self.has_state(*id))
            .collect();
        f.debug_struct("AgentStateMachine")
            .field("agent", &self.agent)
            .field("current", &self.current)
            .field("registered", &registered)
            .finish()
    }
}
