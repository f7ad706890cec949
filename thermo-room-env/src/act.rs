//! Action of [`RoomEnv`](crate::RoomEnv).
use thermo_core::{error::ThermoError, Act, DiscreteAct};

/// Heating switch, `0` for off and `1` for on.
///
/// Any other value is rejected by [`RoomEnv::step`](crate::RoomEnv).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomAct(pub i64);

impl RoomAct {
    /// Heating is off.
    pub const OFF: Self = Self(0);

    /// Heating is on.
    pub const ON: Self = Self(1);

    /// Returns the heating input of the physics update, `0.0` or `1.0`.
    pub fn heating(&self) -> Result<f32, ThermoError> {
        match self.0 {
            0 => Ok(0.0),
            1 => Ok(1.0),
            a => Err(ThermoError::InvalidAction(a)),
        }
    }
}

impl Act for RoomAct {}

impl DiscreteAct for RoomAct {
    const N_ACTIONS: usize = 2;
}

impl From<i64> for RoomAct {
    fn from(a: i64) -> Self {
        Self(a)
    }
}

impl From<RoomAct> for i64 {
    fn from(a: RoomAct) -> Self {
        a.0
    }
}
