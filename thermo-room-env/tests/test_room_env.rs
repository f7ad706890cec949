use anyhow::Result;
use tempdir::TempDir;
use thermo_core::{error::ThermoError, record::BufferedRecorder, DefaultEvaluator, Env, Evaluator};
use thermo_room_env::{
    RandomHeating, RenderRecorder, RoomAct, RoomEnv, RoomEnvConfig, Season, TextRenderer,
    N_TIMESTEPS,
};

/// Heats for the whole day and returns the score and the trajectory.
fn heat_all_day(env: &mut RoomEnv) -> Result<(f32, Vec<f32>)> {
    env.reset()?;
    for i in 0..N_TIMESTEPS {
        let (step, _) = env.step(&RoomAct::ON)?;
        assert_eq!(step.is_done(), i == N_TIMESTEPS - 1, "step {}", i + 1);
        assert_eq!(step.info.timestep, i + 1);
        assert_eq!(step.info.score, env.score());
    }
    Ok((env.score(), env.temperature_history().to_vec()))
}

#[test]
fn test_day_is_96_steps() -> Result<()> {
    let config = RoomEnvConfig::default()
        .heating_power(0.5)
        .loss_coefficient(0.04)
        .reward_mech("V1");
    let mut env = RoomEnv::build(&config, 7)?;

    let (score, history) = heat_all_day(&mut env)?;
    assert!(env.is_terminal());
    assert_eq!(history.len(), N_TIMESTEPS + 1);
    assert!((0.0..=N_TIMESTEPS as f32).contains(&score));

    let err = env.step(&RoomAct::ON).err().unwrap();
    assert!(matches!(
        err.downcast_ref::<ThermoError>(),
        Some(ThermoError::InvalidState(_))
    ));

    // A new episode can start after the terminal step.
    env.reset()?;
    assert!(!env.is_terminal());
    env.step(&RoomAct::OFF)?;
    Ok(())
}

#[test]
fn test_same_seed_same_episode() -> Result<()> {
    let config = RoomEnvConfig::default();
    let mut env1 = RoomEnv::build(&config, 123)?;
    let mut env2 = RoomEnv::build(&config, 123)?;

    let (score1, history1) = heat_all_day(&mut env1)?;
    let (score2, history2) = heat_all_day(&mut env2)?;
    assert_eq!(score1, score2);
    assert_eq!(history1, history2);
    assert_eq!(env1.outdoor_temperatures(), env2.outdoor_temperatures());
    Ok(())
}

#[test]
fn test_winter_is_colder() -> Result<()> {
    let summer = RoomEnv::build(&RoomEnvConfig::default(), 0)?;
    let winter = RoomEnv::build(&RoomEnvConfig::default().season(Season::Winter), 0)?;
    for (s, w) in summer
        .outdoor_envelope()
        .iter()
        .zip(winter.outdoor_envelope())
    {
        assert!(w < s);
    }
    Ok(())
}

#[test]
fn test_config_file() -> Result<()> {
    let config = RoomEnvConfig::default()
        .reward_mech("V2")
        .season(Season::Winter)
        .setpoint(20.0);
    let dir = TempDir::new("room_env_config")?;
    let path = dir.path().join("env.yaml");
    config.save(&path)?;
    assert_eq!(RoomEnvConfig::load(&path)?, config);
    Ok(())
}

#[test]
fn test_random_policy_evaluation() -> Result<()> {
    let config = RoomEnvConfig::default();
    let mut evaluator = DefaultEvaluator::<RoomEnv>::new(&config, 1, 2)?;
    let mut policy = RandomHeating::new(1);
    let mut recorder = BufferedRecorder::new();

    let scores = evaluator.evaluate(&mut policy, &mut recorder)?;
    assert_eq!(scores.len(), 2);
    assert_eq!(recorder.len(), 2 * N_TIMESTEPS);

    // Per-step records of the last episode add up to its score.
    let reward: f32 = recorder
        .iter()
        .skip(N_TIMESTEPS)
        .map(|r| r.get_scalar("reward").unwrap())
        .sum();
    assert!((reward - scores[1]).abs() < 1e-3);

    let mut renderer = RenderRecorder::new(TextRenderer::new(0));
    evaluator.evaluate(&mut policy, &mut renderer)?;
    Ok(())
}
