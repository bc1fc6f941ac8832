//! Observer port for training and evaluation loops
//!
//! Observers allow composable instrumentation (progress bars, periodic
//! statistics, grid rendering) without coupling the loops to specific
//! output formats.

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    error::{Error, Result},
    grid::{GridEnvironment, Position},
};

/// Per-episode summary handed to observers
#[derive(Debug, Clone, Copy)]
pub struct EpisodeStats {
    /// 1-based episode index
    pub episode: u32,
    /// Exploration rate used for the episode (0 during evaluation)
    pub epsilon: f32,
    /// Sum of rewards over the episode
    pub total_return: f32,
    /// Number of steps taken
    pub steps: u32,
    /// True iff the episode ended at the goal rather than the step limit
    pub reached_goal: bool,
}

/// Hooks invoked by [`crate::training::TrainingLoop`] and
/// [`crate::evaluation::EvaluationLoop`]
///
/// Call order: `on_loop_start` once, then per episode `on_step` for each
/// step followed by `on_episode_end`, then `on_loop_end` once. All default
/// implementations do nothing.
pub trait Observer {
    fn on_loop_start(&mut self, _total_episodes: u32) -> Result<()> {
        Ok(())
    }

    /// Called before each step with the agent's current position
    fn on_step(&mut self, _episode: u32, _step: u32, _position: Position) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _stats: &EpisodeStats) -> Result<()> {
        Ok(())
    }

    fn on_loop_end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Progress bar observer backed by indicatif
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    goals_reached: u32,
    episodes: u32,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            goals_reached: 0,
            episodes: 0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_loop_start(&mut self, total_episodes: u32) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, stats: &EpisodeStats) -> Result<()> {
        self.episodes += 1;
        if stats.reached_goal {
            self.goals_reached += 1;
        }
        if let Some(pb) = &self.progress_bar {
            pb.set_position(stats.episode as u64);
            pb.set_message(format!("goal: {}/{}", self.goals_reached, self.episodes));
        }
        Ok(())
    }

    fn on_loop_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("goal: {}/{}", self.goals_reached, self.episodes));
        }
        Ok(())
    }
}

/// Prints averaged episode length and return every `interval` episodes
///
/// The accumulators reset after each flush, so every line covers exactly one
/// batch of episodes. Episodes left over after the final full batch are not
/// reported.
pub struct IntervalReportObserver {
    interval: u32,
    length_sum: f64,
    return_sum: f64,
}

impl IntervalReportObserver {
    /// `interval` must be positive
    pub fn new(interval: u32) -> Self {
        assert!(interval > 0, "report interval must be a positive integer");
        Self {
            interval,
            length_sum: 0.0,
            return_sum: 0.0,
        }
    }
}

impl Observer for IntervalReportObserver {
    fn on_episode_end(&mut self, stats: &EpisodeStats) -> Result<()> {
        self.length_sum += stats.steps as f64;
        self.return_sum += stats.total_return as f64;

        if stats.episode.is_multiple_of(self.interval) {
            println!(
                "Episode {:5} | avg_len: {:6.2} | avg_return: {:7.3}",
                stats.episode,
                self.length_sum / self.interval as f64,
                self.return_sum / self.interval as f64,
            );
            self.length_sum = 0.0;
            self.return_sum = 0.0;
        }
        Ok(())
    }
}

/// Renders the grid at every step of every `every`-th episode
pub struct RenderObserver {
    env: GridEnvironment,
    every: u32,
}

impl RenderObserver {
    /// `every` must be positive
    pub fn new(env: GridEnvironment, every: u32) -> Self {
        assert!(every > 0, "render interval must be a positive integer");
        Self { env, every }
    }
}

impl Observer for RenderObserver {
    fn on_step(&mut self, episode: u32, step: u32, position: Position) -> Result<()> {
        if episode.is_multiple_of(self.every) {
            println!("\n[Episode {episode} | step {step}]");
            print!("{}", self.env.render(position));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(episode: u32, steps: u32, total_return: f32) -> EpisodeStats {
        EpisodeStats {
            episode,
            epsilon: 0.1,
            total_return,
            steps,
            reached_goal: true,
        }
    }

    #[test]
    fn interval_reporter_resets_after_each_flush() {
        let mut observer = IntervalReportObserver::new(2);
        observer.on_episode_end(&stats(1, 10, -10.0)).unwrap();
        observer.on_episode_end(&stats(2, 20, -20.0)).unwrap();
        assert_eq!(observer.length_sum, 0.0);
        assert_eq!(observer.return_sum, 0.0);

        observer.on_episode_end(&stats(3, 8, -8.0)).unwrap();
        assert_eq!(observer.length_sum, 8.0);
        assert_eq!(observer.return_sum, -8.0);
    }

    #[test]
    fn progress_observer_counts_goals() {
        let mut observer = ProgressObserver::new();
        observer.on_loop_start(3).unwrap();
        observer.on_episode_end(&stats(1, 8, 3.0)).unwrap();
        observer
            .on_episode_end(&EpisodeStats {
                reached_goal: false,
                ..stats(2, 100, -100.0)
            })
            .unwrap();
        assert_eq!(observer.goals_reached, 1);
        assert_eq!(observer.episodes, 2);
        observer.on_loop_end().unwrap();
    }
}
