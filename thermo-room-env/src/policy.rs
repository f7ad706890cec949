//! Random heating policy.
use crate::{RoomAct, RoomEnv, RoomObs};
use anyhow::Result;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use thermo_core::{DiscreteAct, Policy};

/// Switches the heating on or off uniformly at random, the baseline before training.
pub struct RandomHeating {
    rng: SmallRng,
}

impl RandomHeating {
    /// Creates the policy with a random seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Policy<RoomEnv> for RandomHeating {
    fn sample(&mut self, _obs: &RoomObs) -> Result<RoomAct> {
        Ok(RoomAct(self.rng.gen_range(0..RoomAct::N_ACTIONS as i64)))
    }
}
