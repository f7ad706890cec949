//! Configuration of a training run.
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};
use thermo_candle_agent::{
    dqn::{DqnConfig, DqnModelConfig},
    mlp::MlpConfig,
    opt::OptimizerConfig,
};
use thermo_core::{replay_buffer::SimpleReplayBufferConfig, DiscreteAct, TrainerConfig};
use thermo_room_env::{RoomAct, RoomEnvConfig};

const LR: f64 = 1e-3;
const HIDDEN_UNITS: [usize; 2] = [64, 64];

/// Everything needed to build the environment, the agent and the trainer.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ThermoConfig {
    pub seed: i64,
    pub env_config: RoomEnvConfig,
    pub agent_config: DqnConfig<MlpConfig>,
    pub replay_buffer_config: SimpleReplayBufferConfig,
    pub trainer_config: TrainerConfig,
}

impl Default for ThermoConfig {
    fn default() -> Self {
        let mlp_config = MlpConfig::new(1, HIDDEN_UNITS.to_vec(), RoomAct::N_ACTIONS, false);
        let model_config = DqnModelConfig::default()
            .q_config(mlp_config)
            .opt_config(OptimizerConfig::default().learning_rate(LR));

        Self {
            seed: 42,
            env_config: RoomEnvConfig::default(),
            agent_config: DqnConfig::default().model_config(model_config),
            replay_buffer_config: SimpleReplayBufferConfig::default(),
            trainer_config: TrainerConfig::default(),
        }
    }
}

impl ThermoConfig {
    /// Loads the configuration from a YAML file, or the default one.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Constructs [`ThermoConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ThermoConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }

    /// The directory of checkpoints, `<reward_mech>_outputs` unless set.
    pub fn model_dir(&self) -> String {
        self.trainer_config
            .model_dir
            .clone()
            .unwrap_or_else(|| format!("{}_outputs", self.env_config.reward_mech))
    }
}
