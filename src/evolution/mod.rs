pub mod challenge;
pub mod launcher;
pub mod options;
pub mod session;

pub use challenge::{AveragedEvaluator, FitnessEvaluator};
pub use launcher::{EvolutionResult, EvolutionaryTrainer, StopSignal};
pub use options::{TrainingParameters, TrainingParametersBuilder};
pub use session::TrainingSession;
