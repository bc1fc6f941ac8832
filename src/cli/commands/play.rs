//! Play command - replay the greedy policy from a saved table

use std::{fs::File, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use serde_json::to_writer_pretty;

use crate::{
    evaluation::EvaluationLoop,
    grid::{GridConfig, GridEnvironment},
    observer::RenderObserver,
};

#[derive(Parser, Debug)]
#[command(about = "Play greedy episodes from a saved Q-table", allow_negative_numbers = true)]
pub struct PlayArgs {
    /// Path to a saved Q-table
    pub table: PathBuf,

    /// Number of episodes to play
    #[arg(long, short = 'e', default_value_t = 5)]
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

    /// Render the grid at every step
    #[arg(long, default_value_t = false)]
    pub render: bool,

    /// Optional path for writing episode reports as JSON
    #[arg(long)]
    pub export: Option<PathBuf>,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let env = GridEnvironment::new(GridConfig {
        width: args.width,
        height: args.height,
        step_limit: args.step_limit,
        step_reward: args.step_reward,
        goal_reward: args.goal_reward,
    })?;

    let table = super::load_matching_table(&args.table, &env)?;

    let mut evaluation = EvaluationLoop::new(args.episodes);
    if args.render {
        evaluation = evaluation.with_observer(Box::new(RenderObserver::new(env.clone(), 1)));
    }

    let result = evaluation.run(&env, &table)?;

    println!("\n=== Playback ===");
    for report in &result.episodes {
        println!(
            "Episode {:3} | steps: {:4} | return: {:8.3} | {}",
            report.episode,
            report.steps,
            report.total_return,
            if report.reached_goal { "goal" } else { "step limit" },
        );
    }

    println!(
        "\nGoals reached: {}/{}",
        result.goals_reached(),
        result.episodes.len()
    );
    println!("Average return: {:.3}", result.avg_return());
    println!("Average length: {:.2}", result.avg_steps());

    if let Some(export_path) = &args.export {
        if let Some(parent) = export_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(export_path)?;
        to_writer_pretty(file, &result)?;
        println!("Reports written to {}", export_path.display());
    }

    Ok(())
}
