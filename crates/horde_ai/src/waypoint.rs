//! Waypoint networks and patrol index selection

use crate::error::{AiError, Result};
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A named patrol point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub name: String,
    pub position: Vec3,
}

impl Waypoint {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// An ordered set of waypoints agents patrol between.
///
/// Read-only from an agent's point of view; agents share one network through
/// an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaypointNetwork {
    pub waypoints: Vec<Waypoint>,
}

impl WaypointNetwork {
    /// Create an empty network
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a network from positions, naming them "Waypoint N"
    pub fn from_positions<I: IntoIterator<Item = Vec3>>(positions: I) -> Self {
        let waypoints = positions
            .into_iter()
            .enumerate()
            .map(|(i, position)| Waypoint::new(format!("Waypoint {}", i), position))
            .collect();
        Self { waypoints }
    }

    /// Parse a network from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        let network: Self = serde_json::from_str(json)?;
        network.validate()?;
        Ok(network)
    }

    /// Load a network from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Append a waypoint, returning its index
    pub fn push(&mut self, name: impl Into<String>, position: Vec3) -> usize {
        self.waypoints.push(Waypoint::new(name, position));
        self.waypoints.len() - 1
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// Index the network, treating a bad index as a configuration error
    pub fn get_checked(&self, index: usize) -> Result<&Waypoint> {
        self.waypoints.get(index).ok_or(AiError::WaypointOutOfRange {
            index,
            len: self.waypoints.len(),
        })
    }

    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.get(index).map(|w| w.position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter()
    }

    /// A usable network has at least one waypoint
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(AiError::EmptyWaypointNetwork);
        }
        Ok(())
    }
}

/// Tracks which waypoint of a network an agent is heading to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaypointCursor {
    current: Option<usize>,
}

impl WaypointCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index selected by the last call to [`WaypointCursor::select`]
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Forget the selection; the next call behaves like first use
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Pick the next index into a network of `len` waypoints.
    ///
    /// On first use (or when the remembered index no longer fits) this picks
    /// index 0, or a random index when `random` is set. Afterwards
    /// `increment = false` keeps the current index, or draws a fresh random
    /// one when `random` is set, and `increment = true` advances: randomly to
    /// a different index when `len > 1`, otherwise sequentially wrapping to 0.
    pub fn select<R: Rng + ?Sized>(
        &mut self,
        len: usize,
        increment: bool,
        random: bool,
        rng: &mut R,
    ) -> Option<usize> {
        if len == 0 {
            return None;
        }

        let next = match self.current {
            Some(current) if current < len => {
                if !increment {
                    if random {
                        rng.gen_range(0..len)
                    } else {
                        current
                    }
                } else if random && len > 1 {
                    // Draw from the other len - 1 slots so the current one never repeats
                    let pick = rng.gen_range(0..len - 1);
                    if pick >= current {
                        pick + 1
                    } else {
                        pick
                    }
                } else if current + 1 >= len {
                    0
                } else {
                    current + 1
                }
            }
            _ => {
                if random {
                    rng.gen_range(0..len)
                } else {
                    0
                }
            }
        };

        self.current = Some(next);
        Some(next)
    }
}
