//! Tests for the training pipeline, observers and evaluation

use std::sync::{Arc, Mutex};

use flappy_q::{
    Action, ContinuousState,
    game::{FlappyEnv, GameConfig},
    pipeline::{
        CsvObserver, EpisodeRecord, JsonlObserver, Learner, MetricsObserver, ReportObserver,
        TrainingConfig, TrainingPipeline, evaluate,
    },
    q_learning::{AgentConfig, BinConfig, QLearningAgent},
};
use tempfile::tempdir;

fn agent(game: &GameConfig) -> QLearningAgent {
    QLearningAgent::new(&AgentConfig::default(), &BinConfig::default(), game).unwrap()
}

fn config(num_episodes: usize, seed: u64) -> TrainingConfig {
    TrainingConfig {
        num_episodes,
        seed: Some(seed),
        max_steps_per_episode: Some(2_000),
    }
}

#[test]
fn training_updates_table_and_decays_epsilon() {
    let game = GameConfig::default();
    let mut agent = agent(&game);
    let mut env = FlappyEnv::new(game).unwrap();

    let result = TrainingPipeline::new(config(50, 42))
        .run(&mut agent, &mut env)
        .unwrap();

    assert_eq!(result.total_episodes, 50);
    assert!(agent.q_table().nonzero_entries() > 0);
    let expected_epsilon = 0.995_f64.powi(50);
    assert!((agent.epsilon() - expected_epsilon).abs() < 1e-9);
    assert!((result.final_epsilon - expected_epsilon).abs() < 1e-9);
}

#[test]
fn seeded_training_is_reproducible() {
    let run = || {
        let game = GameConfig::default();
        let mut agent = agent(&game);
        let mut env = FlappyEnv::new(game).unwrap();
        let result = TrainingPipeline::new(config(30, 7))
            .run(&mut agent, &mut env)
            .unwrap();
        let probe = ContinuousState::new(256.0, 0.0, 200.0, 288.0);
        (result, agent.q_values(&probe))
    };

    assert_eq!(run(), run());
}

#[test]
fn shared_metrics_observer_sees_every_episode() {
    let game = GameConfig::default();
    let mut agent = agent(&game);
    let mut env = FlappyEnv::new(game).unwrap();
    let metrics = Arc::new(Mutex::new(MetricsObserver::with_window(10)));

    let result = TrainingPipeline::new(config(25, 3))
        .with_observer(Box::new(Arc::clone(&metrics)))
        .with_observer(Box::new(ReportObserver::new(5)))
        .run(&mut agent, &mut env)
        .unwrap();

    let summary = metrics.lock().unwrap().summary();
    assert_eq!(summary.episodes, 25);
    assert_eq!(summary.best_score, result.best_score);
    assert!((summary.mean_reward - result.mean_reward).abs() < 1e-9);
    assert!(
        (summary.mean_episode_length - result.total_steps as f64 / 25.0).abs() < 1e-9
    );
    assert!((0.0..=1.0).contains(&summary.jump_rate));
}

#[test]
fn exports_write_one_record_per_episode() {
    let dir = tempdir().unwrap();
    let jsonl_path = dir.path().join("episodes.jsonl");
    let csv_path = dir.path().join("episodes.csv");

    let game = GameConfig::default();
    let mut agent = agent(&game);
    let mut env = FlappyEnv::new(game).unwrap();
    TrainingPipeline::new(config(4, 11))
        .with_observer(Box::new(
            JsonlObserver::new(&jsonl_path).unwrap().with_steps(true),
        ))
        .with_observer(Box::new(CsvObserver::new(&csv_path).unwrap()))
        .run(&mut agent, &mut env)
        .unwrap();

    let jsonl = std::fs::read_to_string(&jsonl_path).unwrap();
    let records: Vec<EpisodeRecord> = jsonl
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 4);
    for (i, record) in records.iter().enumerate() {
        assert_eq!(record.summary.episode, i);
        assert_eq!(record.trace.len(), record.summary.steps);
        let first = &record.trace[0];
        assert!(first.discrete_state.is_some());
        assert!(first.q_values.is_some());
        assert!(record.trace.last().unwrap().done || !record.summary.terminated);
    }

    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    assert_eq!(reader.records().count(), 4);
}

#[test]
fn evaluation_runs_greedy_without_learning() {
    let game = GameConfig::default();
    let mut agent = agent(&game);
    let mut env = FlappyEnv::new(game).unwrap();
    TrainingPipeline::new(config(20, 5))
        .run(&mut agent, &mut env)
        .unwrap();

    let table_before = agent.q_table().clone();
    let epsilon_before = agent.epsilon();
    let result = evaluate(&mut agent, &mut env, 10, Some(2_000)).unwrap();

    assert_eq!(result.total_episodes, 10);
    assert_eq!(result.final_epsilon, 0.0);
    assert_eq!(agent.epsilon(), epsilon_before);
    let probe = flappy_q::DiscreteState::new(10, 10, 5);
    for action in Action::ALL {
        assert_eq!(
            agent.q_table().get(&probe, action),
            table_before.get(&probe, action)
        );
    }
    assert_eq!(
        agent.q_table().nonzero_entries(),
        table_before.nonzero_entries()
    );
}
