//! Configuration of [`RoomEnv`](super::RoomEnv).
use crate::Season;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`RoomEnv`](super::RoomEnv).
///
/// `reward_mech` is parsed into a [`RewardPolicy`](crate::RewardPolicy) when
/// the environment is built, so an unknown name fails at construction.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct RoomEnvConfig {
    /// Temperature rise in a step with the heating on, ignoring losses.
    pub heating_power: f32,

    /// Fraction of the outdoor-indoor gap gained or lost in a step.
    pub loss_coefficient: f32,

    /// Name of the reward mechanism, `V1` (three bands) or `V2` (single band).
    pub reward_mech: String,

    /// Season of the outdoor temperature curve.
    pub season: Season,

    /// Target room temperature, constant over the day.
    pub setpoint: f32,
}

impl Default for RoomEnvConfig {
    fn default() -> Self {
        Self {
            heating_power: 0.5,
            loss_coefficient: 0.04,
            reward_mech: "V1".to_string(),
            season: Season::Summer,
            setpoint: 21.0,
        }
    }
}

impl RoomEnvConfig {
    /// Sets the heating power.
    pub fn heating_power(mut self, v: f32) -> Self {
        self.heating_power = v;
        self
    }

    /// Sets the loss coefficient.
    pub fn loss_coefficient(mut self, v: f32) -> Self {
        self.loss_coefficient = v;
        self
    }

    /// Sets the name of the reward mechanism.
    pub fn reward_mech(mut self, name: impl Into<String>) -> Self {
        self.reward_mech = name.into();
        self
    }

    /// Sets the season.
    pub fn season(mut self, season: Season) -> Self {
        self.season = season;
        self
    }

    /// Sets the setpoint.
    pub fn setpoint(mut self, v: f32) -> Self {
        self.setpoint = v;
        self
    }

    /// Constructs [`RoomEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`RoomEnvConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
