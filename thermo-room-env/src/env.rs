//! Room simulator.
mod config;
use crate::{OutdoorTemperature, RewardPolicy, RoomAct, RoomObs, N_TIMESTEPS};
use anyhow::Result;
pub use config::RoomEnvConfig;
use log::trace;
use rand::{rngs::SmallRng, Rng, SeedableRng};
use thermo_core::{
    error::ThermoError,
    record::{
        Record,
        RecordValue::{self, Scalar},
    },
    Env, Info, Step,
};

/// Information attached to each [`Step`] of [`RoomEnv`].
#[derive(Debug, Clone, PartialEq)]
pub struct RoomInfo {
    /// Running score of the episode.
    pub score: f32,

    /// The number of steps taken in the episode.
    pub timestep: usize,
}

impl Info for RoomInfo {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Terminal,
}

/// Simulates the temperature of a single room over a day of
/// [`N_TIMESTEPS`] 15-minute intervals.
///
/// At each step the room temperature `s` becomes
/// `s + (h * a + l * (outdoor[t] - s))`, where `h` is the heating power,
/// `l` the loss coefficient, `a` the heating switch and `outdoor[t]` the
/// outdoor temperature at the current timestep. The reward depends on the
/// distance of the new temperature from the setpoint.
///
/// The environment is idle when built, running after [`Env::reset`] and
/// terminal once the last timestep is consumed. Stepping an idle or terminal
/// environment fails with [`ThermoError::InvalidState`].
pub struct RoomEnv {
    heating_power: f32,
    loss_coefficient: f32,
    reward_policy: RewardPolicy,
    outdoor_gen: OutdoorTemperature,
    setpoint: Vec<f32>,
    rng: SmallRng,
    phase: Phase,
    temperature: f32,
    timestep: usize,
    score: f32,
    outdoor: Vec<f32>,
    history: Vec<f32>,
}

impl RoomEnv {
    /// The current observation.
    pub fn observation(&self) -> Result<RoomObs, ThermoError> {
        match self.phase {
            Phase::Idle => Err(ThermoError::InvalidState(
                "observation is not available before reset()".to_string(),
            )),
            _ => Ok(RoomObs(self.temperature)),
        }
    }

    /// The outdoor temperature curve of the current episode.
    ///
    /// Empty before the first reset.
    pub fn outdoor_temperatures(&self) -> &[f32] {
        &self.outdoor
    }

    /// The noise-free outdoor temperature curve.
    pub fn outdoor_envelope(&self) -> &[f32] {
        self.outdoor_gen.envelope()
    }

    /// The setpoint curve.
    pub fn setpoint(&self) -> &[f32] {
        &self.setpoint
    }

    /// Room temperatures of the current episode, from the initial one to the latest.
    pub fn temperature_history(&self) -> &[f32] {
        &self.history
    }

    /// Running score of the current episode.
    pub fn score(&self) -> f32 {
        self.score
    }

    /// The number of steps taken in the current episode.
    pub fn timestep(&self) -> usize {
        self.timestep
    }

    /// The reward policy.
    pub fn reward_policy(&self) -> RewardPolicy {
        self.reward_policy
    }

    /// Returns `true` if the last timestep of the episode has been consumed.
    pub fn is_terminal(&self) -> bool {
        self.phase == Phase::Terminal
    }
}

impl Env for RoomEnv {
    type Config = RoomEnvConfig;
    type Obs = RoomObs;
    type Act = RoomAct;
    type Info = RoomInfo;

    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized,
    {
        let reward_policy: RewardPolicy = config.reward_mech.parse()?;

        Ok(Self {
            heating_power: config.heating_power,
            loss_coefficient: config.loss_coefficient,
            reward_policy,
            outdoor_gen: OutdoorTemperature::new(config.season),
            setpoint: vec![config.setpoint; N_TIMESTEPS],
            rng: SmallRng::seed_from_u64(seed as u64),
            phase: Phase::Idle,
            temperature: 0.0,
            timestep: 0,
            score: 0.0,
            outdoor: vec![],
            history: Vec::with_capacity(N_TIMESTEPS + 1),
        })
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.temperature = self.rng.gen_range(18.0..20.0);
        self.outdoor = self.outdoor_gen.generate(&mut self.rng);
        self.timestep = 0;
        self.score = 0.0;
        self.history.clear();
        self.history.push(self.temperature);
        self.phase = Phase::Running;

        Ok(RoomObs(self.temperature))
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)>
    where
        Self: Sized,
    {
        match self.phase {
            Phase::Idle => {
                return Err(ThermoError::InvalidState(
                    "step() called before reset()".to_string(),
                )
                .into())
            }
            Phase::Terminal => {
                return Err(ThermoError::InvalidState(
                    "step() called after the end of the episode".to_string(),
                )
                .into())
            }
            Phase::Running => {}
        }
        let heating = a.heating()?;

        let t = self.timestep;
        let outdoor = self.outdoor[t];
        self.temperature = self.temperature
            + (self.heating_power * heating + self.loss_coefficient * (outdoor - self.temperature));

        let reward = self
            .reward_policy
            .reward((self.setpoint[t] - self.temperature).abs());
        let is_terminated = t == N_TIMESTEPS - 1;

        self.timestep += 1;
        self.score += reward;
        self.history.push(self.temperature);
        if is_terminated {
            self.phase = Phase::Terminal;
        }
        trace!(
            "t={}, a={}, temperature={}, reward={}",
            t,
            a.0,
            self.temperature,
            reward
        );

        let record = Record::from_slice(&[
            ("temperature", Scalar(self.temperature)),
            ("outdoor_temperature", Scalar(outdoor)),
            ("setpoint", Scalar(self.setpoint[t])),
            ("action", Scalar(a.0 as f32)),
            ("reward", Scalar(reward)),
            ("score", Scalar(self.score)),
            ("timestep", Scalar(t as f32)),
            (
                "reward_mech",
                RecordValue::String(self.reward_policy.name().to_string()),
            ),
        ]);
        let info = RoomInfo {
            score: self.score,
            timestep: self.timestep,
        };
        let step = Step::new(RoomObs(self.temperature), *a, reward, is_terminated, info);

        Ok((step, record))
    }

    fn max_steps(&self) -> usize {
        N_TIMESTEPS
    }

    fn close(&mut self) {
        self.phase = Phase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> RoomEnv {
        RoomEnv::build(&RoomEnvConfig::default(), 42).unwrap()
    }

    #[test]
    fn test_physics_update() -> Result<()> {
        let mut env = env();
        env.reset()?;

        for (i, a) in [RoomAct::ON, RoomAct::OFF, RoomAct::ON, RoomAct::ON]
            .iter()
            .enumerate()
        {
            let s = env.observation()?.temperature();
            let out = env.outdoor_temperatures()[i];
            let h = a.heating()?;
            let expected = s + (0.5 * h + 0.04 * (out - s));

            let (step, record) = env.step(a)?;
            assert_eq!(step.obs.temperature(), expected);
            assert_eq!(record.get_scalar("temperature")?, expected);
            assert_eq!(record.get_scalar("outdoor_temperature")?, out);
            assert_eq!(record.get_string("reward_mech")?, "V1");
        }
        assert_eq!(env.temperature_history().len(), 5);
        Ok(())
    }

    #[test]
    fn test_reset_draws_initial_temperature() -> Result<()> {
        let mut env = env();
        for _ in 0..20 {
            let obs = env.reset()?;
            assert!((18.0..20.0).contains(&obs.temperature()));
            assert_eq!(env.timestep(), 0);
            assert_eq!(env.score(), 0.0);
            assert_eq!(env.outdoor_temperatures().len(), N_TIMESTEPS);
        }
        Ok(())
    }

    #[test]
    fn test_reward_matches_policy() -> Result<()> {
        let mut env = env();
        env.reset()?;
        for _ in 0..N_TIMESTEPS {
            let (step, _) = env.step(&RoomAct::ON)?;
            let distance = (21.0 - step.obs.temperature()).abs();
            assert_eq!(step.reward, RewardPolicy::ThreeBand.reward(distance));
        }
        Ok(())
    }

    #[test]
    fn test_invalid_action() -> Result<()> {
        let mut env = env();
        env.reset()?;
        let err = env.step(&RoomAct(2)).err().unwrap();
        assert_eq!(
            err.downcast_ref::<ThermoError>(),
            Some(&ThermoError::InvalidAction(2))
        );
        // The rejected action leaves the state untouched.
        assert_eq!(env.timestep(), 0);
        assert_eq!(env.temperature_history().len(), 1);
        Ok(())
    }

    #[test]
    fn test_step_before_reset() {
        let mut env = env();
        assert!(env.observation().is_err());
        let err = env.step(&RoomAct::ON).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ThermoError>(),
            Some(ThermoError::InvalidState(_))
        ));
    }

    #[test]
    fn test_step_after_close() -> Result<()> {
        let mut env = env();
        env.reset()?;
        env.step(&RoomAct::ON)?;
        env.close();

        assert!(env.observation().is_err());
        let err = env.step(&RoomAct::ON).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ThermoError>(),
            Some(ThermoError::InvalidState(_))
        ));

        env.reset()?;
        env.step(&RoomAct::OFF)?;
        Ok(())
    }

    #[test]
    fn test_unknown_reward_mech() {
        let config = RoomEnvConfig::default().reward_mech("V3");
        let err = RoomEnv::build(&config, 0).err().unwrap();
        assert!(matches!(
            err.downcast_ref::<ThermoError>(),
            Some(ThermoError::InvalidConfiguration(_))
        ));
    }
}
