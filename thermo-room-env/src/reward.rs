//! Reward policies.
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thermo_core::error::ThermoError;

/// Maps the distance between the room temperature and the setpoint to a reward.
///
/// Each policy carries a table of `(max_distance, reward)` bands checked in
/// order; a distance beyond the last band gives `0`. Bounds are inclusive,
/// so a distance of exactly `0.5` falls in the first band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardPolicy {
    /// Rewards `1`, `0.6` and `0.3` within `0.5`, `1.0` and `1.5` degrees.
    ThreeBand,

    /// Reward `1` within `0.5` degrees.
    SingleBand,
}

const THREE_BAND: [(f32, f32); 3] = [(0.5, 1.0), (1.0, 0.6), (1.5, 0.3)];
const SINGLE_BAND: [(f32, f32); 1] = [(0.5, 1.0)];

impl RewardPolicy {
    /// The `(max_distance, reward)` table.
    pub fn bands(&self) -> &'static [(f32, f32)] {
        match self {
            Self::ThreeBand => &THREE_BAND,
            Self::SingleBand => &SINGLE_BAND,
        }
    }

    /// Reward for an absolute distance to the setpoint.
    pub fn reward(&self, distance: f32) -> f32 {
        self.bands()
            .iter()
            .find(|(max_distance, _)| distance <= *max_distance)
            .map_or(0.0, |(_, reward)| *reward)
    }

    /// Short name, used for output directories.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ThreeBand => "V1",
            Self::SingleBand => "V2",
        }
    }
}

impl FromStr for RewardPolicy {
    type Err = ThermoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "V1" | "three_band" => Ok(Self::ThreeBand),
            "V2" | "single_band" => Ok(Self::SingleBand),
            _ => Err(ThermoError::InvalidConfiguration(format!(
                "unknown reward mechanism {:?}, expected one of V1, V2, three_band, single_band",
                s
            ))),
        }
    }
}

impl fmt::Display for RewardPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_band() {
        let p = RewardPolicy::ThreeBand;
        assert_eq!(p.reward(0.0), 1.0);
        assert_eq!(p.reward(0.5), 1.0);
        assert_eq!(p.reward(0.75), 0.6);
        assert_eq!(p.reward(1.0), 0.6);
        assert_eq!(p.reward(1.25), 0.3);
        assert_eq!(p.reward(1.5), 0.3);
        assert_eq!(p.reward(1.75), 0.0);
        assert_eq!(p.reward(30.0), 0.0);
    }

    #[test]
    fn test_single_band() {
        let p = RewardPolicy::SingleBand;
        assert_eq!(p.reward(0.5), 1.0);
        assert_eq!(p.reward(0.75), 0.0);
        assert_eq!(p.reward(1.25), 0.0);
    }

    #[test]
    fn test_parse() {
        assert_eq!("V1".parse::<RewardPolicy>(), Ok(RewardPolicy::ThreeBand));
        assert_eq!("single_band".parse::<RewardPolicy>(), Ok(RewardPolicy::SingleBand));
        assert!(matches!(
            "V3".parse::<RewardPolicy>(),
            Err(ThermoError::InvalidConfiguration(_))
        ));
        assert_eq!(RewardPolicy::SingleBand.to_string(), "V2");
    }
}
