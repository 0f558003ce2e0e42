//! Ports (trait boundaries) between the training loop and its collaborators.
//!
//! The pipeline owns the loop; agents plug in through [`Learner`] and data
//! collection plugs in through [`Observer`].

pub mod learner;
pub mod observer;

pub use learner::Learner;
pub use observer::{EpisodeSummary, Observer, StepObservation};
