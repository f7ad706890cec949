//! Observation of [`RoomEnv`](crate::RoomEnv).
use thermo_core::Obs;

/// Room temperature in degrees Celsius.
///
/// The observation is expected to stay within [`RoomObs::LOW`] and
/// [`RoomObs::HIGH`], though the simulator does not clip it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoomObs(pub f32);

impl RoomObs {
    /// Lower bound of the observation space.
    pub const LOW: f32 = -20.0;

    /// Upper bound of the observation space.
    pub const HIGH: f32 = 60.0;

    /// The temperature.
    pub fn temperature(&self) -> f32 {
        self.0
    }
}

impl Obs for RoomObs {}

impl From<RoomObs> for Vec<f32> {
    fn from(obs: RoomObs) -> Self {
        vec![obs.0]
    }
}
