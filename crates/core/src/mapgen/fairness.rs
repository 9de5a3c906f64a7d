//! Team-to-slot rotation across tile copies.

use rand_chacha::rand_core::Rng;

use crate::types::{TeamId, WorldError};

use super::random::shuffled;

/// A shuffled team order. Tile copy `instance` gives hill slot `slot` to
/// `order[(slot + instance) % teams]`, so every team takes every slot equally
/// often once the copies cycle through the order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeamRotation {
    order: Vec<TeamId>,
}

impl TeamRotation {
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R, teams: usize) -> Result<Self, WorldError> {
        let identity = (0..teams).map(TeamId::new).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { order: shuffled(rng, &identity) })
    }

    pub fn from_order(order: Vec<TeamId>) -> Self {
        Self { order }
    }

    pub fn team_for(&self, instance: usize, slot: usize) -> TeamId {
        self.order[(slot + instance) % self.order.len()]
    }

    pub fn order(&self) -> &[TeamId] {
        &self.order
    }

    pub fn team_count(&self) -> usize {
        self.order.len()
    }
}
