//! Trigger filtering

use horde_core::ColliderId;
use std::collections::HashSet;

/// Filter for what colliders can activate a trigger
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerFilter {
    /// Required layers (collider must have at least one)
    pub required_layers: u32,
    /// Excluded layers (collider must not have any)
    pub excluded_layers: u32,
    /// Required tags (collider must have all of these)
    pub required_tags: HashSet<String>,
    /// Excluded tags (collider must not have any)
    pub excluded_tags: HashSet<String>,
    /// Specific colliders that can trigger (empty = any)
    pub allowed: HashSet<ColliderId>,
    /// Specific colliders that cannot trigger
    pub blocked: HashSet<ColliderId>,
    /// Whether the trigger's own collider can activate it
    pub allow_self: bool,
}

impl TriggerFilter {
    /// Create a new filter that accepts everything
    pub fn new() -> Self {
        Self {
            required_layers: u32::MAX,
            excluded_layers: 0,
            required_tags: HashSet::new(),
            excluded_tags: HashSet::new(),
            allowed: HashSet::new(),
            blocked: HashSet::new(),
            allow_self: false,
        }
    }

    /// Set required layers (bitmask)
    pub fn with_layers(mut self, layers: u32) -> Self {
        self.required_layers = layers;
        self
    }

    /// Set excluded layers (bitmask)
    pub fn without_layers(mut self, layers: u32) -> Self {
        self.excluded_layers = layers;
        self
    }

    /// Require a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.required_tags.insert(tag.into());
        self
    }

    /// Exclude a tag
    pub fn without_tag(mut self, tag: impl Into<String>) -> Self {
        self.excluded_tags.insert(tag.into());
        self
    }

    /// Allow only specific colliders
    pub fn only_colliders<I: IntoIterator<Item = ColliderId>>(mut self, colliders: I) -> Self {
        self.allowed = colliders.into_iter().collect();
        self
    }

    /// Block specific colliders
    pub fn block_colliders<I: IntoIterator<Item = ColliderId>>(mut self, colliders: I) -> Self {
        self.blocked.extend(colliders);
        self
    }

    /// Allow self-triggering
    pub fn allow_self_trigger(mut self) -> Self {
        self.allow_self = true;
        self
    }

    /// Check if a collider passes this filter
    pub fn passes(
        &self,
        collider: ColliderId,
        layers: u32,
        tags: &HashSet<String>,
        trigger_owner: ColliderId,
    ) -> bool {
        if collider == trigger_owner && !self.allow_self {
            return false;
        }

        if self.blocked.contains(&collider) {
            return false;
        }

        if !self.allowed.is_empty() && !self.allowed.contains(&collider) {
            return false;
        }

        if layers & self.required_layers == 0 {
            return false;
        }
        if layers & self.excluded_layers != 0 {
            return false;
        }

        if !self.required_tags.iter().all(|tag| tags.contains(tag)) {
            return false;
        }

        !self.excluded_tags.iter().any(|tag| tags.contains(tag))
    }
}

impl Default for TriggerFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(index: u32) -> ColliderId {
        ColliderId::from_index(index)
    }

    #[test]
    fn test_filter_layers() {
        let filter = TriggerFilter::new().with_layers(0b0011);
        let empty_tags = HashSet::new();

        assert!(filter.passes(id(1), 0b0001, &empty_tags, id(0)));
        assert!(filter.passes(id(2), 0b0010, &empty_tags, id(0)));
        assert!(!filter.passes(id(3), 0b0100, &empty_tags, id(0)));
    }

    #[test]
    fn test_filter_tags() {
        let filter = TriggerFilter::new().with_tag("Player");

        let mut player_tags = HashSet::new();
        player_tags.insert("Player".to_string());

        let mut other_tags = HashSet::new();
        other_tags.insert("Zombie".to_string());

        assert!(filter.passes(id(1), u32::MAX, &player_tags, id(0)));
        assert!(!filter.passes(id(2), u32::MAX, &other_tags, id(0)));
    }

    #[test]
    fn test_filter_self() {
        let empty_tags = HashSet::new();

        assert!(!TriggerFilter::new().passes(id(5), u32::MAX, &empty_tags, id(5)));
        assert!(TriggerFilter::new()
            .allow_self_trigger()
            .passes(id(5), u32::MAX, &empty_tags, id(5)));
    }

    #[test]
    fn test_filter_only_and_blocked() {
        let empty_tags = HashSet::new();

        let only = TriggerFilter::new().only_colliders([id(7)]);
        assert!(only.passes(id(7), u32::MAX, &empty_tags, id(0)));
        assert!(!only.passes(id(8), u32::MAX, &empty_tags, id(0)));

        let blocked = TriggerFilter::new().block_colliders([id(100), id(200)]);
        assert!(blocked.passes(id(50), u32::MAX, &empty_tags, id(0)));
        assert!(!blocked.passes(id(100), u32::MAX, &empty_tags, id(0)));
    }

    #[test]
    fn test_filter_clone_keeps_collider_sets() {
        let empty_tags = HashSet::new();
        let filter = TriggerFilter::new()
            .only_colliders([id(1), id(2)])
            .block_colliders([id(2)]);

        let copy = filter.clone();
        assert_eq!(copy, filter);
        assert!(copy.passes(id(1), u32::MAX, &empty_tags, id(0)));
        assert!(!copy.passes(id(2), u32::MAX, &empty_tags, id(0)));
    }
}
