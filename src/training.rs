//! Training loop: epsilon-greedy episodes with one-step Q-learning updates

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    grid::GridEnvironment,
    observer::{EpisodeStats, Observer},
    policy::{self, EpsilonSchedule},
    q_table::QTable,
};

/// Hyperparameters for a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: u32,
    /// Learning rate α, in `[0, 1]`
    pub alpha: f32,
    /// Discount factor γ, in `[0, 1]`
    pub gamma: f32,
    /// Exploration schedule
    pub epsilon: EpsilonSchedule,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 10_000,
            alpha: 0.1,
            gamma: 0.99,
            epsilon: EpsilonSchedule::default(),
        }
    }
}

/// Aggregate result of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    pub episodes: u32,
    pub total_steps: u64,
    /// Episodes that ended at the goal rather than the step limit
    pub goals_reached: u32,
    pub avg_return: f64,
    pub avg_length: f64,
    /// Exploration rate of the last episode
    pub final_epsilon: f32,
}

/// Drives training episodes and mutates a [`QTable`] in place
///
/// Each episode resets the agent to the environment's start cell, selects
/// actions epsilon-greedily with an exploration rate from the configured
/// schedule, and applies the one-step Q-learning update
///
/// ```text
/// Q(s,a) += α * (r + (done ? 0 : γ * max_a' Q(s',a')) - Q(s,a))
/// ```
///
/// after every transition. Episodes terminate on reaching the goal or on
/// hitting the environment's step limit.
pub struct TrainingLoop {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl std::fmt::Debug for TrainingLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainingLoop")
            .field("config", &self.config)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl TrainingLoop {
    /// Build a loop, rejecting hyperparameters outside `[0, 1]`
    pub fn new(config: TrainingConfig) -> Result<Self> {
        for (name, value) in [("alpha", config.alpha), ("gamma", config.gamma)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidHyperparameter { name, value });
            }
        }
        Ok(Self {
            config,
            observers: Vec::new(),
        })
    }

    /// Add an observer to the loop
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run the configured number of episodes, training `table` in place
    ///
    /// The caller must pass a table whose dimensions match the environment;
    /// this is validated at the CLI boundary after loading a persisted
    /// table.
    pub fn run<R: Rng>(
        &mut self,
        env: &GridEnvironment,
        table: &mut QTable,
        rng: &mut R,
    ) -> Result<TrainingResult> {
        debug_assert!(table.matches(env));

        let mut total_steps = 0u64;
        let mut goals_reached = 0u32;
        let mut return_sum = 0.0f64;
        let mut final_epsilon = self.config.epsilon.start;

        for observer in &mut self.observers {
            observer.on_loop_start(self.config.episodes)?;
        }

        // Episodes are 1-based: the decay schedule is anchored at episode 1.
        for episode in 1..=self.config.episodes {
            let epsilon = self.config.epsilon.at(episode);
            final_epsilon = epsilon;

            let mut position = env.start();
            let mut total_return = 0.0f32;
            let mut steps = 0u32;
            let reached_goal;

            loop {
                for observer in &mut self.observers {
                    observer.on_step(episode, steps, position)?;
                }

                let state = env.state_id(position);
                let action = policy::select_action(table, state, epsilon, rng);
                let outcome = env.step(position, action);
                let next_state = env.state_id(outcome.position);

                let bootstrap = if outcome.done {
                    0.0
                } else {
                    self.config.gamma * table.max_value(next_state)
                };
                let td_target = outcome.reward + bootstrap;
                let current = table.value(state, action);
                table.set(state, action, current + self.config.alpha * (td_target - current));

                total_return += outcome.reward;
                position = outcome.position;
                steps += 1;

                if outcome.done || steps >= env.step_limit() {
                    reached_goal = outcome.done;
                    break;
                }
            }

            total_steps += steps as u64;
            return_sum += total_return as f64;
            if reached_goal {
                goals_reached += 1;
            }

            let stats = EpisodeStats {
                episode,
                epsilon,
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

        let episodes = self.config.episodes;
        Ok(TrainingResult {
            episodes,
            total_steps,
            goals_reached,
            avg_return: return_sum / episodes.max(1) as f64,
            avg_length: total_steps as f64 / episodes.max(1) as f64,
            final_epsilon,
        })
    }
}
