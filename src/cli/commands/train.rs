//! Train command - run Q-learning episodes and persist the learned table

use std::{fs::File, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    grid::{GridConfig, GridEnvironment},
    observer::{IntervalReportObserver, ProgressObserver, RenderObserver},
    persistence,
    policy::EpsilonSchedule,
    q_table::QTable,
    training::{TrainingConfig, TrainingLoop, TrainingResult},
};

#[derive(Debug, Serialize)]
struct TrainingSummaryFile {
    grid: GridSummary,
    config: TrainingConfig,
    result: TrainingResult,
    seed: Option<u64>,
}

#[derive(Debug, Serialize)]
struct GridSummary {
    width: u32,
    height: u32,
    step_limit: u32,
}

#[derive(Parser, Debug)]
#[command(about = "Train a Q-table on the grid world", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 10_000)]
    pub episodes: u32,

    /// Grid width in cells
    #[arg(long, default_value_t = 5)]
    pub width: u32,

    /// Grid height in cells
    #[arg(long, default_value_t = 5)]
    pub height: u32,

    /// Maximum steps per episode (defaults to width * height * 4)
    #[arg(long)]
    pub step_limit: Option<u32>,

    /// Reward per step, including bumps into walls and obstacles
    #[arg(long, default_value_t = -1.0)]
    pub step_reward: f32,

    /// Reward for reaching the goal
    #[arg(long, default_value_t = 10.0)]
    pub goal_reward: f32,

    /// Learning rate α (0.0-1.0)
    #[arg(long, default_value_t = 0.1)]
    pub alpha: f32,

    /// Discount factor γ (0.0-1.0)
    #[arg(long, default_value_t = 0.99)]
    pub gamma: f32,

    /// Initial exploration rate
    #[arg(long, default_value_t = 1.0)]
    pub eps_start: f32,

    /// Exploration rate floor
    #[arg(long, default_value_t = 0.05)]
    pub eps_min: f32,

    /// Exponential decay rate per episode
    #[arg(long, default_value_t = 0.0025)]
    pub eps_decay: f32,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Continue training from a previously saved table
    #[arg(long)]
    pub load: Option<PathBuf>,

    /// Output file for the trained table
    #[arg(long, short = 'O')]
    pub save: Option<PathBuf>,

    /// Render the grid at every step of every N-th episode
    #[arg(long)]
    pub render_every: Option<u32>,

    /// Print averaged statistics every N episodes (0 disables)
    #[arg(long, default_value_t = 100)]
    pub report_interval: u32,

    /// Show progress bar
    #[arg(long, default_value_t = false)]
    pub progress: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let env = GridEnvironment::new(GridConfig {
        width: args.width,
        height: args.height,
        step_limit: args.step_limit,
        step_reward: args.step_reward,
        goal_reward: args.goal_reward,
    })?;

    let mut table = match &args.load {
        Some(path) => super::load_matching_table(path, &env)?,
        None => QTable::new(env.width(), env.height()),
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let config = TrainingConfig {
        episodes: args.episodes,
        alpha: args.alpha,
        gamma: args.gamma,
        epsilon: EpsilonSchedule::new(args.eps_start, args.eps_min, args.eps_decay),
    };

    let mut training = TrainingLoop::new(config.clone())?;
    if args.progress {
        training = training.with_observer(Box::new(ProgressObserver::new()));
    }
    if args.report_interval > 0 && !args.progress {
        training = training.with_observer(Box::new(IntervalReportObserver::new(
            args.report_interval,
        )));
    }
    if let Some(every) = args.render_every {
        training = training.with_observer(Box::new(RenderObserver::new(env.clone(), every)));
    }

    let result = training.run(&env, &mut table, &mut rng)?;

    println!("\n=== Training Complete ===");
    println!("Episodes: {}", result.episodes);
    println!(
        "Goals reached: {} ({:.1}%)",
        result.goals_reached,
        result.goals_reached as f64 / result.episodes.max(1) as f64 * 100.0
    );
    println!("Average return: {:.3}", result.avg_return);
    println!("Average length: {:.2}", result.avg_length);
    println!("Final epsilon: {:.4}", result.final_epsilon);

    if let Some(path) = &args.save {
        persistence::save(path, &table)?;
        println!("\nTable saved to {}", path.display());
    }

    if let Some(summary_path) = &args.summary {
        if let Some(parent) = summary_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let summary = TrainingSummaryFile {
            grid: GridSummary {
                width: env.width(),
                height: env.height(),
                step_limit: env.step_limit(),
            },
            config,
            result,
            seed: args.seed,
        };

        let file = File::create(summary_path)?;
        to_writer_pretty(file, &summary)?;
        println!("Summary written to {}", summary_path.display());
    }

    Ok(())
}
