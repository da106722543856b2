//! Scene driver
//!
//! A [`Horde`] owns a set of agents together with the scene registry, their
//! sensor volumes, damage zones and any melee zones, and runs the physics and
//! update callbacks of every agent in a fixed order each step.

use crate::agent::Archetype;
use crate::damage::{DamageEvent, DamageZone};
use crate::error::{AiError, Result};
use crate::physics::{CollisionLayer, PhysicsQuery};
use crate::scene::{ColliderInfo, SceneContext, SceneRegistry};
use crate::sensor::Sensor;
use crate::state_machine::AgentStateMachine;
use glam::Vec3;
use horde_core::{AgentId, ColliderId, IdGenerator};
use horde_triggers::{
    TriggerBody, TriggerComponent, TriggerEvent, TriggerEventType, TriggerFilter, TriggerSystem,
    TriggerVolume,
};
use std::collections::{BTreeMap, BTreeSet};

/// A group of agents sharing one scene
pub struct Horde<A: Archetype> {
    agents: BTreeMap<AgentId, AgentStateMachine<A>>,
    registry: SceneRegistry,
    sensors: BTreeMap<ColliderId, Sensor>,
    melee_zones: BTreeSet<ColliderId>,
    damage_zones: BTreeMap<ColliderId, DamageZone>,
    damage_events: Vec<DamageEvent>,
    triggers: TriggerSystem,
    ids: IdGenerator,
}

impl<A: Archetype> Horde<A> {
    pub fn new() -> Self {
        Self {
            agents: BTreeMap::new(),
            registry: SceneRegistry::new(),
            sensors: BTreeMap::new(),
            melee_zones: BTreeSet::new(),
            damage_zones: BTreeMap::new(),
            damage_events: Vec::new(),
            triggers: TriggerSystem::new(),
            ids: IdGenerator::new(),
        }
    }

    /// A fresh agent id
    pub fn next_agent_id(&self) -> AgentId {
        self.ids.next_agent()
    }

    /// A fresh collider id
    pub fn next_collider_id(&self) -> ColliderId {
        self.ids.next_collider()
    }

    /// Add an agent and its colliders, then start its machine.
    ///
    /// The body, the sensor and every body part resolve to the agent in the
    /// registry. The sensor volume follows the agent and never reports the
    /// agent's own colliders.
    pub fn spawn(
        &mut self,
        mut machine: AgentStateMachine<A>,
        sensor: ColliderId,
        body_parts: &[ColliderId],
    ) -> Result<AgentId> {
        let id = machine.id();
        if self.agents.contains_key(&id) {
            return Err(AiError::DuplicateAgent(id));
        }

        let body = machine.agent().body();
        let own: Vec<ColliderId> = std::iter::once(body).chain(body_parts.iter().copied()).collect();
        for &collider in own.iter().chain(std::iter::once(&sensor)) {
            self.registry.register(collider, id);
        }

        let agent = machine.agent();
        let volume = TriggerComponent::new(TriggerVolume::sphere(agent.sensor_radius()))
            .with_filter(TriggerFilter::new().block_colliders(own))
            .with_stay_events()
            .at(agent.sensor_position());
        self.triggers.register_trigger(sensor, volume);
        self.sensors.insert(sensor, Sensor::new(sensor).owned_by(id));

        machine.start();
        log::debug!("{}: spawned with sensor {}", id, sensor);
        self.agents.insert(id, machine);
        Ok(id)
    }

    /// Remove an agent with its sensors and registry entries
    pub fn despawn(&mut self, id: AgentId) -> Option<AgentStateMachine<A>> {
        let machine = self.agents.remove(&id)?;
        let removed = self.registry.unregister_agent(id);

        let sensors: Vec<ColliderId> = self
            .sensors
            .iter()
            .filter(|(_, sensor)| sensor.owner() == Some(id))
            .map(|(&collider, _)| collider)
            .collect();
        for collider in sensors {
            self.sensors.remove(&collider);
            self.triggers.unregister_trigger(collider);
        }

        let zones: Vec<ColliderId> = self
            .damage_zones
            .iter()
            .filter(|(_, zone)| zone.owner == id)
            .map(|(&collider, _)| collider)
            .collect();
        for collider in zones {
            self.damage_zones.remove(&collider);
            self.triggers.unregister_trigger(collider);
        }

        log::debug!("{}: despawned, released {} colliders", id, removed);
        Some(machine)
    }

    /// Add a zone that flags agents whose body enters it as in melee range
    pub fn add_melee_zone(&mut self, collider: ColliderId, volume: TriggerVolume, position: Vec3) {
        let zone = TriggerComponent::new(volume)
            .with_filter(TriggerFilter::new().with_layers(CollisionLayer::AI_ENTITY.as_mask()))
            .at(position);
        self.triggers.register_trigger(collider, zone);
        self.melee_zones.insert(collider);
    }

    /// Move a melee zone, e.g. along with the player that owns it
    pub fn move_melee_zone(&mut self, collider: ColliderId, position: Vec3) -> bool {
        if !self.melee_zones.contains(&collider) {
            return false;
        }
        match self.triggers.get_trigger_mut(collider) {
            Some(zone) => {
                zone.set_position(position);
                true
            }
            None => false,
        }
    }

    pub fn remove_melee_zone(&mut self, collider: ColliderId) -> bool {
        self.triggers.unregister_trigger(collider);
        self.melee_zones.remove(&collider)
    }

    /// Attach a damage zone to its owner.
    ///
    /// The zone follows the owner at its offset and reports players staying
    /// inside it. Returns false if the owner is not spawned.
    pub fn add_damage_zone(&mut self, collider: ColliderId, zone: DamageZone, volume: TriggerVolume) -> bool {
        let Some(machine) = self.agents.get(&zone.owner) else {
            log::debug!("Damage zone {} has no owner {}", collider, zone.owner);
            return false;
        };
        let agent = machine.agent();
        let volume = TriggerComponent::new(volume)
            .with_filter(TriggerFilter::new().block_colliders([agent.body()]))
            .with_stay_events()
            .at(zone.world_position(&agent.transform));

        self.registry.register(collider, zone.owner);
        self.triggers.register_trigger(collider, volume);
        self.damage_zones.insert(collider, zone);
        true
    }

    pub fn remove_damage_zone(&mut self, collider: ColliderId) -> Option<DamageZone> {
        let zone = self.damage_zones.remove(&collider)?;
        self.triggers.unregister_trigger(collider);
        self.registry.unregister(collider);
        Some(zone)
    }

    pub fn register_player(&mut self, collider: ColliderId) {
        self.registry.register_player(collider);
    }

    pub fn unregister_player(&mut self, collider: ColliderId) -> bool {
        self.registry.unregister_player(collider)
    }

    /// Hand a sensor callback to the agent owning the sensor.
    ///
    /// Returns false if the sensor is unknown or has no owner.
    pub fn dispatch_sensor_event(
        &mut self,
        sensor: ColliderId,
        kind: TriggerEventType,
        other: ColliderId,
        other_position: Vec3,
        physics: &dyn PhysicsQuery,
    ) -> bool {
        let Some(event) = self.sensors.get_mut(&sensor).and_then(|s| s.forward(kind, other)) else {
            return false;
        };
        let Some(machine) = self.agents.get_mut(&event.owner) else {
            log::debug!("Sensor {} owner {} is gone", sensor, event.owner);
            return false;
        };

        let info = ColliderInfo::resolve(other, other_position, &self.registry);
        let scene = SceneContext::new(&self.registry, physics);
        machine.on_trigger_event(kind, &info, &scene);
        true
    }

    /// A collider entered or left a melee zone.
    ///
    /// Colliders that do not belong to an agent are skipped.
    pub fn dispatch_melee_event(&mut self, kind: TriggerEventType, other: ColliderId) -> bool {
        let Some(owner) = self.registry.lookup(other) else {
            log::debug!("Melee zone ignored {}: not an agent", other);
            return false;
        };
        let Some(machine) = self.agents.get_mut(&owner) else {
            return false;
        };

        match kind {
            TriggerEventType::Enter => machine.agent_mut().set_in_melee_range(true),
            TriggerEventType::Exit => machine.agent_mut().set_in_melee_range(false),
            TriggerEventType::Stay => {}
        }
        true
    }

    /// A collider is touching a damage zone.
    ///
    /// Only players staying inside the zone while its owner's animation is in
    /// its hitting frames take damage. The hit is also kept in
    /// [`Horde::damage_events`] until the next step.
    pub fn dispatch_damage_event(
        &mut self,
        zone: ColliderId,
        kind: TriggerEventType,
        other: ColliderId,
    ) -> Option<DamageEvent> {
        if kind != TriggerEventType::Stay || !self.registry.is_player(other) {
            return None;
        }
        let damage = self.damage_zones.get(&zone)?;
        let machine = self.agents.get(&damage.owner)?;
        let agent = machine.agent();
        if !damage.is_active(agent.animator()) {
            return None;
        }

        let event = DamageEvent {
            attacker: damage.owner,
            zone,
            player: other,
            amount: damage.amount,
            point: damage.world_position(&agent.transform),
        };
        log::debug!("{}: hit player {} for {}", event.attacker, other, event.amount);
        self.damage_events.push(event);
        Some(event)
    }

    /// Run one step for every agent.
    ///
    /// `bodies` are the colliders outside the horde that volumes should
    /// see, players included; agent bodies are added automatically.
    pub fn step(&mut self, delta_time: f32, bodies: &[TriggerBody], physics: &dyn PhysicsQuery) {
        self.damage_events.clear();
        for machine in self.agents.values_mut() {
            machine.fixed_update(delta_time);
        }

        for event in self.step_volumes(delta_time, bodies) {
            if self.sensors.contains_key(&event.trigger) {
                self.dispatch_sensor_event(
                    event.trigger,
                    event.event_type,
                    event.other,
                    event.other_position,
                    physics,
                );
            } else if self.melee_zones.contains(&event.trigger) {
                self.dispatch_melee_event(event.event_type, event.other);
            } else if self.damage_zones.contains_key(&event.trigger) {
                self.dispatch_damage_event(event.trigger, event.event_type, event.other);
            }
        }

        for machine in self.agents.values_mut() {
            machine.evaluate_target_trigger(delta_time);
        }

        for machine in self.agents.values_mut() {
            machine.update(delta_time);
            machine.animator_updated();
            machine.animator_ik_updated();
            machine.advance_navigation(delta_time);
        }
    }

    /// Move sensor volumes and damage zones onto their agents and step every
    /// volume
    fn step_volumes(&mut self, delta_time: f32, bodies: &[TriggerBody]) -> Vec<TriggerEvent> {
        for (&collider, sensor) in &self.sensors {
            let Some(machine) = sensor.owner().and_then(|owner| self.agents.get(&owner)) else {
                continue;
            };
            if let Some(volume) = self.triggers.get_trigger_mut(collider) {
                let agent = machine.agent();
                volume.set_position(agent.sensor_position());
                volume.set_radius(agent.sensor_radius());
            }
        }

        for (&collider, zone) in &self.damage_zones {
            let Some(machine) = self.agents.get(&zone.owner) else {
                continue;
            };
            if let Some(volume) = self.triggers.get_trigger_mut(collider) {
                volume.set_position(zone.world_position(&machine.agent().transform));
            }
        }

        let mut all = bodies.to_vec();
        all.extend(self.agents.values().map(|machine| machine.agent().trigger_body()));
        self.triggers.update(delta_time, &all).to_vec()
    }

    pub fn agent(&self, id: AgentId) -> Option<&AgentStateMachine<A>> {
        self.agents.get(&id)
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut AgentStateMachine<A>> {
        self.agents.get_mut(&id)
    }

    /// Agents in id order
    pub fn agents(&self) -> impl Iterator<Item = &AgentStateMachine<A>> {
        self.agents.values()
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn sensor(&self, collider: ColliderId) -> Option<&Sensor> {
        self.sensors.get(&collider)
    }

    pub fn damage_zone(&self, collider: ColliderId) -> Option<&DamageZone> {
        self.damage_zones.get(&collider)
    }

    /// Hits landed during the last step
    pub fn damage_events(&self) -> &[DamageEvent] {
        &self.damage_events
    }

    pub fn triggers(&self) -> &TriggerSystem {
        &self.triggers
    }
}

impl<A: Archetype> Default for Horde<A> {
    fn default() -> Self {
        Self::new()
    }
}
