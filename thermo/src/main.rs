mod config;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use config::ThermoConfig;
use csv::WriterBuilder;
use log::info;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thermo_candle_agent::{dqn::Dqn, mlp::Mlp};
use thermo_core::{
    record::{AggregateRecorder, BufferedRecorder, NullRecorder, Record, Recorder},
    replay_buffer::{SimpleReplayBuffer, SimpleStepProcessor, SimpleStepProcessorConfig},
    Agent as _, Configurable, DefaultEvaluator, Env as _, Evaluator as _, Policy,
    ReplayBufferBase as _, StepProcessor as _, Trainer, TrainingSession,
};
use thermo_room_env::{
    RandomHeating, RenderRecorder, RoomAct, RoomEnv, RoomEnvConfig, RoomObs, TextRenderer,
};
use thermo_tensorboard::TensorboardRecorder;

type ReplayBuffer = SimpleReplayBuffer<RoomObs, RoomAct>;
type StepProc = SimpleStepProcessor<RoomEnv>;
type RoomDqn = Dqn<RoomEnv, Mlp, ReplayBuffer>;

/// Train and evaluate a DQN heating controller for a single room
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train a DQN agent
    Train(TrainArgs),

    /// Evaluate a trained DQN agent
    Eval(EvalArgs),

    /// Evaluate the random heating policy
    Random(RandomArgs),
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// YAML configuration of the run
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// The number of training episodes
    #[arg(short, long)]
    episodes: Option<usize>,

    /// Reward mechanism, V1 or V2
    #[arg(short, long)]
    reward_mech: Option<String>,

    /// Directory of checkpoints, `<reward_mech>_outputs` by default
    #[arg(long)]
    model_dir: Option<String>,

    /// Write metrics for tensorboard in the model directory
    #[arg(long, default_value_t = false)]
    tensorboard: bool,
}

#[derive(Args, Debug, Clone)]
struct EvalOpts {
    /// The number of episodes
    #[arg(short, long, default_value_t = 1)]
    episodes: usize,

    /// Print the day in the log, pausing at the end of each day
    #[arg(long, default_value_t = false)]
    render: bool,

    /// Pause at the end of a rendered day in milliseconds
    #[arg(long, default_value_t = 5000)]
    wait_in_millis: u64,

    /// Write the trajectories to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Random seed of the environment
    #[arg(long, default_value_t = 0)]
    seed: i64,
}

#[derive(Args, Debug)]
struct EvalArgs {
    /// Parameters of the policy network in safetensors format
    #[arg(short, long)]
    model: PathBuf,

    /// YAML configuration the model was trained with
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the heating power of the environment
    #[arg(long)]
    heating_power: Option<f32>,

    /// Override the loss coefficient of the environment
    #[arg(long)]
    loss_coefficient: Option<f32>,

    #[command(flatten)]
    opts: EvalOpts,
}

#[derive(Args, Debug)]
struct RandomArgs {
    /// YAML configuration of the environment
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    opts: EvalOpts,
}

/// A row of the CSV export.
#[derive(Debug, Serialize)]
struct RoomRecord {
    episode: usize,
    step: usize,
    timestep: usize,
    temperature: f32,
    outdoor_temperature: f32,
    setpoint: f32,
    action: i64,
    reward: f32,
    score: f32,
    reward_mech: String,
}

impl TryFrom<&Record> for RoomRecord {
    type Error = anyhow::Error;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            episode: record.get_scalar("episode")? as _,
            step: record.get_scalar("step")? as _,
            timestep: record.get_scalar("timestep")? as _,
            temperature: record.get_scalar("temperature")?,
            outdoor_temperature: record.get_scalar("outdoor_temperature")?,
            setpoint: record.get_scalar("setpoint")?,
            action: record.get_scalar("action")? as _,
            reward: record.get_scalar("reward")?,
            score: record.get_scalar("score")?,
            reward_mech: record.get_string("reward_mech")?,
        })
    }
}

/// Keeps the evaluation trajectories and optionally renders them.
struct EvalRecorder {
    buffer: BufferedRecorder,
    render: Option<RenderRecorder<TextRenderer>>,
}

impl Recorder for EvalRecorder {
    fn write(&mut self, record: Record) {
        if let Some(render) = self.render.as_mut() {
            render.write(record.clone());
        }
        self.buffer.write(record);
    }
}

fn create_recorder(tensorboard: bool, model_dir: &str) -> Box<dyn AggregateRecorder> {
    match tensorboard {
        true => Box::new(TensorboardRecorder::new(model_dir)),
        false => Box::new(NullRecorder::new()),
    }
}

fn write_csv(path: &Path, recorder: &BufferedRecorder) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    for record in recorder.iter() {
        wtr.serialize(RoomRecord::try_from(record)?)?;
    }
    wtr.flush()?;
    info!("Wrote {} steps to {:?}", recorder.len(), path);
    Ok(())
}

fn train(args: &TrainArgs) -> Result<TrainingSession> {
    let mut config = ThermoConfig::load_or_default(args.config.as_deref())?;
    if let Some(n) = args.episodes {
        config.trainer_config = config.trainer_config.n_episodes(n);
    }
    if let Some(reward_mech) = &args.reward_mech {
        config.env_config = config.env_config.reward_mech(reward_mech);
    }
    let model_dir = match &args.model_dir {
        Some(dir) => dir.clone(),
        None => config.model_dir(),
    };
    config.trainer_config = config.trainer_config.model_dir(&model_dir);

    let mut env = RoomEnv::build(&config.env_config, config.seed)?;
    let mut step_proc = StepProc::build(&SimpleStepProcessorConfig {});
    let mut buffer = ReplayBuffer::build(&config.replay_buffer_config)?;
    let mut agent = RoomDqn::build(config.agent_config.clone())?;
    let mut session = TrainingSession::new(&config.trainer_config)?;
    let mut trainer = Trainer::build(config.trainer_config.clone())?;

    fs::create_dir_all(&model_dir)?;
    config.save(Path::new(&model_dir).join("config.yaml"))?;
    let mut recorder = create_recorder(args.tensorboard, &model_dir);
    info!(
        "Training with reward mechanism {} for {} episodes",
        config.env_config.reward_mech, config.trainer_config.n_episodes
    );

    trainer.train(
        &mut env,
        &mut step_proc,
        &mut agent,
        &mut buffer,
        recorder.as_mut(),
        &mut session,
    )?;

    Ok(session)
}

fn evaluate<P: Policy<RoomEnv>>(
    env_config: &RoomEnvConfig,
    policy: &mut P,
    opts: &EvalOpts,
) -> Result<Vec<f32>> {
    let mut evaluator = DefaultEvaluator::<RoomEnv>::new(env_config, opts.seed, opts.episodes)?;
    let mut recorder = EvalRecorder {
        buffer: BufferedRecorder::new(),
        render: match opts.render {
            true => Some(RenderRecorder::new(TextRenderer::new(opts.wait_in_millis))),
            false => None,
        },
    };

    let scores = evaluator.evaluate(policy, &mut recorder)?;
    if !scores.is_empty() {
        let mean = scores.iter().sum::<f32>() / scores.len() as f32;
        info!("Mean score over {} episodes: {:.3}", scores.len(), mean);
    }

    if let Some(path) = &opts.csv {
        write_csv(path, &recorder.buffer)?;
    }

    Ok(scores)
}

fn eval(args: &EvalArgs) -> Result<Vec<f32>> {
    let config = ThermoConfig::load_or_default(args.config.as_deref())?;
    let mut env_config = config.env_config;
    if let Some(v) = args.heating_power {
        env_config = env_config.heating_power(v);
    }
    if let Some(v) = args.loss_coefficient {
        env_config = env_config.loss_coefficient(v);
    }

    let mut agent = RoomDqn::build(config.agent_config)?;
    agent.load_policy_network(&args.model)?;
    agent.eval();

    evaluate(&env_config, &mut agent, &args.opts)
}

fn random(args: &RandomArgs) -> Result<Vec<f32>> {
    let config = ThermoConfig::load_or_default(args.config.as_deref())?;
    let mut policy = RandomHeating::new(args.opts.seed as u64);
    evaluate(&config.env_config, &mut policy, &args.opts)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Train(args) => {
            train(&args)?;
        }
        Command::Eval(args) => {
            eval(&args)?;
        }
        Command::Random(args) => {
            random(&args)?;
        }
    }

    Ok(())
}
