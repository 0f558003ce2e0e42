//! Training and evaluation pipeline abstractions
//!
//! This module provides:
//! - The episode loop that trains a learner in the environment
//! - Greedy evaluation of a trained learner
//! - Observers that report progress and export episode data

pub mod evaluation;
pub mod observers;
pub mod training;

pub use evaluation::{FrozenLearner, evaluate};
pub use observers::{
    CsvObserver, EpisodeRecord, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
    ReportObserver,
};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::{EpisodeSummary, Learner, Observer, StepObservation};
