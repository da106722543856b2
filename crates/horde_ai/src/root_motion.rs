//! Root motion authority
//!
//! Animation layers that move the character themselves request authority
//! over position and/or rotation while they play. Requests are reference
//! counted: a count above zero means the animation owns that degree of
//! freedom and the path follower must not drive it.

/// Reference counts of outstanding root motion requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RootMotionRequests {
    position: u32,
    rotation: u32,
}

impl RootMotionRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply signed deltas to both counts.
    ///
    /// Counts saturate at zero; an unmatched release is logged and ignored.
    pub fn add(&mut self, delta_position: i32, delta_rotation: i32) {
        self.position = apply_delta(self.position, delta_position, "position");
        self.rotation = apply_delta(self.rotation, delta_rotation, "rotation");
    }

    /// Take authority, returning a token that must be handed back to
    /// [`RootMotionRequests::release`]
    pub fn acquire(&mut self, position: bool, rotation: bool) -> RootMotionToken {
        let token = RootMotionToken {
            position: i32::from(position),
            rotation: i32::from(rotation),
            armed: true,
        };
        self.add(token.position, token.rotation);
        token
    }

    /// Give back authority taken with [`RootMotionRequests::acquire`]
    pub fn release(&mut self, mut token: RootMotionToken) {
        self.add(-token.position, -token.rotation);
        token.armed = false;
    }

    /// The animation currently owns position
    pub fn use_root_position(&self) -> bool {
        self.position > 0
    }

    /// The animation currently owns rotation
    pub fn use_root_rotation(&self) -> bool {
        self.rotation > 0
    }

    pub fn position_count(&self) -> u32 {
        self.position
    }

    pub fn rotation_count(&self) -> u32 {
        self.rotation
    }
}

fn apply_delta(count: u32, delta: i32, axis: &str) -> u32 {
    let next = i64::from(count) + i64::from(delta);
    if next < 0 {
        log::warn!("Root {} request released more often than acquired", axis);
        return 0;
    }
    u32::try_from(next).unwrap_or(u32::MAX)
}

/// Proof of an outstanding root motion request.
///
/// Dropping a token without releasing it leaks the request; that is logged.
#[must_use = "release the token when the animation layer exits"]
#[derive(Debug)]
pub struct RootMotionToken {
    position: i32,
    rotation: i32,
    armed: bool,
}

impl RootMotionToken {
    pub fn owns_position(&self) -> bool {
        self.position != 0
    }

    pub fn owns_rotation(&self) -> bool {
        self.rotation != 0
    }
}

impl Drop for RootMotionToken {
    fn drop(&mut self) {
        if self.armed {
            log::warn!(
                "Root motion token dropped without release (position: {}, rotation: {})",
                self.position,
                self.rotation
            );
        }
    }
}

/// Attached to an animation state: requests root motion while it plays
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RootMotionConfigurator {
    pub root_position: bool,
    pub root_rotation: bool,
}

impl RootMotionConfigurator {
    pub fn new(root_position: bool, root_rotation: bool) -> Self {
        Self {
            root_position,
            root_rotation,
        }
    }

    /// The animation state was entered
    pub fn on_state_enter(&self, requests: &mut RootMotionRequests) -> RootMotionToken {
        requests.acquire(self.root_position, self.root_rotation)
    }

    /// The animation state was exited
    pub fn on_state_exit(&self, requests: &mut RootMotionRequests, token: RootMotionToken) {
        requests.release(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_requests_restore_counts() {
        let mut requests = RootMotionRequests::new();
        requests.add(1, 0);
        let before = requests;

        requests.add(1, 1);
        assert!(requests.use_root_position());
        assert!(requests.use_root_rotation());

        requests.add(-1, -1);
        assert_eq!(requests, before);
        assert!(requests.use_root_position());
        assert!(!requests.use_root_rotation());
    }

    #[test]
    fn test_underflow_saturates() {
        let mut requests = RootMotionRequests::new();
        requests.add(-1, -2);
        assert_eq!(requests.position_count(), 0);
        assert_eq!(requests.rotation_count(), 0);
        assert!(!requests.use_root_position());
    }

    #[test]
    fn test_tokens() {
        let mut requests = RootMotionRequests::new();
        let walk = requests.acquire(true, false);
        let turn = requests.acquire(false, true);
        assert!(walk.owns_position());
        assert!(!walk.owns_rotation());
        assert_eq!(requests.position_count(), 1);
        assert_eq!(requests.rotation_count(), 1);

        requests.release(walk);
        assert!(!requests.use_root_position());
        assert!(requests.use_root_rotation());

        requests.release(turn);
        assert_eq!(requests, RootMotionRequests::new());
    }

    #[test]
    fn test_configurator_pairs() {
        let mut requests = RootMotionRequests::new();
        let attack = RootMotionConfigurator::new(true, true);

        let token = attack.on_state_enter(&mut requests);
        assert!(requests.use_root_position() && requests.use_root_rotation());

        attack.on_state_exit(&mut requests, token);
        assert!(!requests.use_root_position() && !requests.use_root_rotation());
    }
}
