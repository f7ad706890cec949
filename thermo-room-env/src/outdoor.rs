//! Outdoor temperature of a simulated day.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// The number of 15-minute intervals in a day.
pub const N_TIMESTEPS: usize = 96;

/// Amplitude of the uniform noise added to each sample.
const NOISE: f32 = 0.5;

/// Season, selecting the range of the diurnal curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Season {
    /// Between 12 and 25 degrees.
    #[default]
    Summer,

    /// Between 0 and 14 degrees.
    Winter,
}

impl Season {
    /// Minimum and maximum of the noise-free curve.
    pub fn range(&self) -> (f32, f32) {
        match self {
            Self::Summer => (12.0, 25.0),
            Self::Winter => (0.0, 14.0),
        }
    }
}

/// Generator of outdoor temperature curves.
///
/// The noise-free envelope is `min + (max - min) * sin(pi * i / 96)^2` for
/// the timestep `i`; [`OutdoorTemperature::generate`] adds an independent
/// uniform perturbation in `[-0.5, 0.5]` to every sample.
#[derive(Debug, Clone)]
pub struct OutdoorTemperature {
    envelope: Vec<f32>,
}

impl OutdoorTemperature {
    /// Creates the generator for a season.
    pub fn new(season: Season) -> Self {
        let (min, max) = season.range();
        let envelope = (0..N_TIMESTEPS)
            .map(|i| {
                let s = (PI * i as f64 / N_TIMESTEPS as f64).sin();
                min + (max - min) * (s * s) as f32
            })
            .collect();
        Self { envelope }
    }

    /// The noise-free curve.
    pub fn envelope(&self) -> &[f32] {
        &self.envelope
    }

    /// Draws a curve of [`N_TIMESTEPS`] samples.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Vec<f32> {
        self.envelope
            .iter()
            .map(|v| v + rng.gen_range(-NOISE..=NOISE))
            .collect()
    }
}
