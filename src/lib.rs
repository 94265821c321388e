pub mod breeding;
pub mod error;
pub mod evolution;
pub mod genome;
pub mod network;
pub mod rng;
pub mod selection;

// Re-export commonly used types for convenience
pub use error::{GeneticError, OptionExt, Result, ResultExt};
pub use evolution::{EvolutionResult, EvolutionaryTrainer, FitnessEvaluator, TrainingParameters};
pub use network::{NeuralNetwork, Topology};
