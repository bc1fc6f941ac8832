use qgrid::{
    GridConfig, GridEnvironment, QTable,
    evaluation::EvaluationLoop,
    policy,
    training::{TrainingConfig, TrainingLoop},
};
use rand::{SeedableRng, rngs::StdRng};

fn trained_table(env: &GridEnvironment, seed: u64) -> QTable {
    let mut table = QTable::new(env.width(), env.height());
    let mut rng = StdRng::seed_from_u64(seed);
    TrainingLoop::new(TrainingConfig::default())
        .unwrap()
        .run(env, &mut table, &mut rng)
        .unwrap();
    table
}

/// Average return of a uniformly random policy, for comparison
fn random_baseline(env: &GridEnvironment, episodes: u32, seed: u64) -> f64 {
    let table = QTable::new(env.width(), env.height());
    let mut rng = StdRng::seed_from_u64(seed);
    let mut return_sum = 0.0f64;

    for _ in 0..episodes {
        let mut position = env.start();
        let mut steps = 0u32;
        loop {
            let action = policy::select_action(&table, env.state_id(position), 1.0, &mut rng);
            let outcome = env.step(position, action);
            return_sum += outcome.reward as f64;
            position = outcome.position;
            steps += 1;
            if outcome.done || steps >= env.step_limit() {
                break;
            }
        }
    }

    return_sum / episodes as f64
}

#[test]
fn default_run_learns_the_shortest_path() {
    let env = GridEnvironment::new(GridConfig::default()).unwrap();
    let table = trained_table(&env, 42);

    let result = EvaluationLoop::new(1).run(&env, &table).unwrap();
    let report = &result.episodes[0];

    // The shortest route around the obstacle wall takes 8 steps, for a
    // return of 7 * (-1) + 10 = 3.
    assert!(report.reached_goal);
    assert_eq!(report.steps, 8);
    assert!(report.total_return >= 2.0);
}

#[test]
fn trained_policy_beats_a_random_walk() {
    let env = GridEnvironment::new(GridConfig::default()).unwrap();
    let table = trained_table(&env, 7);

    let greedy = EvaluationLoop::new(10).run(&env, &table).unwrap();
    let random = random_baseline(&env, 50, 99);

    assert!(greedy.avg_return() > random);
}

#[test]
fn training_is_reproducible_across_runs() {
    let env = GridEnvironment::new(GridConfig::default()).unwrap();
    assert_eq!(trained_table(&env, 42), trained_table(&env, 42));
}
