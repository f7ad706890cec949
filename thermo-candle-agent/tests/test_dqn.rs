use anyhow::Result;
use tempdir::TempDir;
use thermo_candle_agent::{
    dqn::{Dqn, DqnConfig, DqnModelConfig},
    mlp::{Mlp, MlpConfig},
    opt::OptimizerConfig,
};
use thermo_core::{
    error::ThermoError,
    record::BufferedRecorder,
    replay_buffer::{
        SimpleReplayBuffer, SimpleReplayBufferConfig, SimpleStepProcessor,
        SimpleStepProcessorConfig,
    },
    Agent, Configurable, Env, ExperienceBufferBase, Policy, ReplayBufferBase, StepProcessor,
    Trainer, TrainerConfig, TrainingSession,
};
use thermo_room_env::{RoomAct, RoomEnv, RoomEnvConfig, RoomObs};

type Buffer = SimpleReplayBuffer<RoomObs, RoomAct>;
type RoomDqn = Dqn<RoomEnv, Mlp, Buffer>;

fn dqn_config() -> DqnConfig<MlpConfig> {
    let model_config = DqnModelConfig::default()
        .q_config(MlpConfig::new(1, vec![16, 16], 2, false))
        .opt_config(OptimizerConfig::Adam { lr: 1e-3 });
    DqnConfig::default()
        .model_config(model_config)
        .batch_size(20)
        .seed(3)
}

#[test]
fn test_train_and_reload() -> Result<()> {
    let dir = TempDir::new("dqn_room")?;
    let model_dir = dir.path().join("V1_outputs");
    let config = TrainerConfig::default()
        .n_episodes(3)
        .avg_interval(1)
        .save_interval(2)
        .model_dir(model_dir.to_string_lossy());

    let mut env = RoomEnv::build(&RoomEnvConfig::default(), 0)?;
    let mut step_proc = SimpleStepProcessor::<RoomEnv>::build(&SimpleStepProcessorConfig {});
    let mut buffer = Buffer::build(&SimpleReplayBufferConfig::default())?;
    let mut agent = RoomDqn::build(dqn_config())?;
    let mut recorder = BufferedRecorder::new();
    let mut session = TrainingSession::new(&config)?;
    let mut trainer = Trainer::build(config)?;

    trainer.train(
        &mut env,
        &mut step_proc,
        &mut agent,
        &mut buffer,
        &mut recorder,
        &mut session,
    )?;

    // 20 updates once the buffer holds a batch, then 24 per day.
    assert_eq!(session.opt_steps(), 20 + 2 * 24);
    assert_eq!(agent.n_opts(), session.opt_steps());
    assert_eq!(buffer.len(), 3 * 96);
    for record in recorder.iter() {
        assert!(record.get_scalar("loss")?.is_finite());
    }

    for file in [
        "policy_network_2.safetensors",
        "final_policy_network.safetensors",
        "final_target_network.safetensors",
        "score_hist.json",
    ] {
        assert!(model_dir.join(file).exists(), "{} is missing", file);
    }

    let mut loaded = RoomDqn::build(dqn_config())?;
    loaded.load_policy_network(&model_dir.join("final_policy_network.safetensors"))?;
    for temp in [15.0, 19.5, 21.0, 24.0] {
        let obs = RoomObs(temp);
        assert_eq!(agent.q_values(&obs)?, loaded.q_values(&obs)?);
        assert_eq!(agent.sample(&obs)?, loaded.sample(&obs)?);
    }
    Ok(())
}

#[test]
fn test_actions_are_heating_switches() -> Result<()> {
    let mut agent = RoomDqn::build(dqn_config())?;
    let obs = RoomObs(19.0);

    let q = agent.q_values(&obs)?;
    assert_eq!(q.len(), 2);

    let greedy = agent.sample(&obs)?;
    assert!(greedy == RoomAct::OFF || greedy == RoomAct::ON);
    agent.train();
    assert_eq!(agent.explore(&obs, 0.0)?, greedy);
    for _ in 0..20 {
        let act = agent.explore(&obs, 1.0)?;
        assert!(act == RoomAct::OFF || act == RoomAct::ON);
    }
    Ok(())
}

#[test]
fn test_explore_is_greedy_in_eval_mode() -> Result<()> {
    let mut agent = RoomDqn::build(dqn_config())?;
    let obs = RoomObs(19.0);
    let greedy = agent.sample(&obs)?;

    assert!(!agent.is_train());
    for _ in 0..50 {
        assert_eq!(agent.explore(&obs, 1.0)?, greedy);
    }

    agent.train();
    let acts = (0..50)
        .map(|_| agent.explore(&obs, 1.0))
        .collect::<Result<Vec<_>>>()?;
    assert!(acts.contains(&RoomAct::OFF));
    assert!(acts.contains(&RoomAct::ON));

    agent.eval();
    assert_eq!(agent.explore(&obs, 1.0)?, greedy);
    Ok(())
}

#[test]
fn test_target_network_has_no_optimizer() -> Result<()> {
    let agent = RoomDqn::build(dqn_config())?;
    assert!(agent.policy_network().is_trainable());
    assert!(!agent.target_network().is_trainable());
    Ok(())
}

#[test]
fn test_opt_without_enough_transitions() -> Result<()> {
    let mut agent = RoomDqn::build(dqn_config())?;
    let mut buffer = Buffer::build(&SimpleReplayBufferConfig::default())?;

    let err = agent.opt(&mut buffer).err().unwrap();
    assert!(matches!(
        err.downcast_ref::<ThermoError>(),
        Some(ThermoError::InsufficientData {
            requested: 20,
            available: 0
        })
    ));
    assert_eq!(agent.n_opts(), 0);
    Ok(())
}

#[test]
fn test_invalid_config() {
    assert!(RoomDqn::build(dqn_config().batch_size(0)).is_err());
    assert!(RoomDqn::build(dqn_config().gamma(1.5)).is_err());
    assert!(RoomDqn::build(DqnConfig::default()).is_err());
}

#[test]
fn test_output_width_must_match_actions() {
    let model_config =
        DqnModelConfig::default().q_config(MlpConfig::new(1, vec![16, 16], 3, false));
    let err = RoomDqn::build(dqn_config().model_config(model_config))
        .err()
        .unwrap();
    assert!(matches!(
        err.downcast_ref::<ThermoError>(),
        Some(ThermoError::InvalidConfiguration(_))
    ));
}
