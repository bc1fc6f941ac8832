//! Evaluation loop: greedy replay of a learned table

use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    grid::GridEnvironment,
    observer::{EpisodeStats, Observer},
    q_table::QTable,
};

/// Outcome of a single greedy episode
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EpisodeReport {
    /// 1-based episode index
    pub episode: u32,
    pub total_return: f32,
    pub steps: u32,
    pub reached_goal: bool,
}

/// Results of an evaluation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub episodes: Vec<EpisodeReport>,
}

impl EvaluationResult {
    pub fn avg_return(&self) -> f64 {
        if self.episodes.is_empty() {
            return 0.0;
        }
        self.episodes
            .iter()
            .map(|e| e.total_return as f64)
            .sum::<f64>()
            / self.episodes.len() as f64
    }

    pub fn avg_steps(&self) -> f64 {
        if self.episodes.is_empty() {
            return 0.0;
        }
        self.episodes.iter().map(|e| e.steps as f64).sum::<f64>() / self.episodes.len() as f64
    }

    pub fn goals_reached(&self) -> usize {
        self.episodes.iter().filter(|e| e.reached_goal).count()
    }
}

/// Replays the greedy policy without exploration or learning
///
/// Termination matches training exactly: an episode ends at the goal or at
/// the environment's step limit. The table is read-only for the entire run.
/// The greedy policy is deterministic, so no random source is involved.
pub struct EvaluationLoop {
    episodes: u32,
    observers: Vec<Box<dyn Observer>>,
}

impl EvaluationLoop {
    pub fn new(episodes: u32) -> Self {
        Self {
            episodes,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the loop
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Replay `episodes` greedy episodes against `table`
    pub fn run(&mut self, env: &GridEnvironment, table: &QTable) -> Result<EvaluationResult> {
        debug_assert!(table.matches(env));

        for observer in &mut self.observers {
            observer.on_loop_start(self.episodes)?;
        }

        let mut episodes = Vec::with_capacity(self.episodes as usize);
        for episode in 1..=self.episodes {
            let mut position = env.start();
            let mut total_return = 0.0f32;
            let mut steps = 0u32;
            let reached_goal;

            loop {
                for observer in &mut self.observers {
                    observer.on_step(episode, steps, position)?;
                }

                let state = env.state_id(position);
                let action = table.greedy_action(state);
                let outcome = env.step(position, action);

                total_return += outcome.reward;
                position = outcome.position;
                steps += 1;

                if outcome.done || steps >= env.step_limit() {
                    reached_goal = outcome.done;
                    break;
                }
            }

            let report = EpisodeReport {
                episode,
                total_return,
                steps,
                reached_goal,
            };
            episodes.push(report);

            let stats = EpisodeStats {
                episode,
                epsilon: 0.0,
                total_return,
                steps,
                reached_goal,
            };
            for observer in &mut self.observers {
                observer.on_episode_end(&stats)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_loop_end()?;
        }

        Ok(EvaluationResult { episodes })
    }
}
