//! # TrainingSession
//!
//! A training run bound to a network file: the file, if present, seeds the
//! population, and the trained network replaces it when the run ends. The file
//! is touched only before the first generation and after the last one.
//!
//! ## Example
//!
//! ```rust,no_run
//! use evonet::evolution::{AveragedEvaluator, EvolutionaryTrainer, TrainingParameters, TrainingSession};
//! use evonet::network::NeuralNetwork;
//! use evonet::rng::RandomNumberGenerator;
//!
//! let params = TrainingParameters::builder()
//!     .population_size(100)
//!     .generation_count(50)
//!     .input_size(12)
//!     .output_size(4)
//!     .hidden_layers(2, 4)
//!     .neurons_per_layer(8, 16)
//!     .architecture_mutation_rate(0.1)
//!     .build()
//!     .unwrap();
//!
//! let simulate = |network: &NeuralNetwork| -> f64 {
//!     network.feed_forward(&[0.0; 12]).map(|out| out[0]).unwrap_or(0.0)
//! };
//! let evaluator = AveragedEvaluator::new(simulate, 5).unwrap();
//!
//! let session = TrainingSession::new(EvolutionaryTrainer::new(params).unwrap(), "trained_network.nn");
//! let result = session.run(&evaluator, &mut RandomNumberGenerator::new()).unwrap();
//! println!("best score {}", result.score);
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{
    challenge::FitnessEvaluator,
    launcher::{EvolutionResult, EvolutionaryTrainer},
};
use crate::{
    breeding::{BreedStrategy, GenerationalStrategy},
    error::{GeneticError, Result},
    network::NeuralNetwork,
    rng::RandomNumberGenerator,
};

#[derive(Debug, Clone)]
pub struct TrainingSession<Strategy = GenerationalStrategy>
where
    Strategy: BreedStrategy,
{
    trainer: EvolutionaryTrainer<Strategy>,
    network_path: PathBuf,
}

impl<Strategy> TrainingSession<Strategy>
where
    Strategy: BreedStrategy,
{
    pub fn new<P: Into<PathBuf>>(trainer: EvolutionaryTrainer<Strategy>, network_path: P) -> Self {
        Self {
            trainer,
            network_path: network_path.into(),
        }
    }

    pub fn network_path(&self) -> &Path {
        &self.network_path
    }

    /// Loads the seed network, if there is a usable one.
    ///
    /// A missing file means no seed. A file that cannot be read, does not
    /// decode, or does not fit the configured input/output widths is reported
    /// and ignored.
    pub fn load_seed(&self) -> Option<NeuralNetwork> {
        let network = match NeuralNetwork::load(&self.network_path) {
            Ok(network) => network,
            Err(GeneticError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.network_path.display(), "no seed network, starting from random population");
                return None;
            }
            Err(e) => {
                warn!(path = %self.network_path.display(), error = %e, "ignoring unreadable seed network");
                return None;
            }
        };

        let params = self.trainer.parameters();
        if network.input_size() != params.get_input_size()
            || network.output_size() != params.get_output_size()
        {
            warn!(
                path = %self.network_path.display(),
                layers = ?network.layers(),
                "ignoring seed network with incompatible input/output widths"
            );
            return None;
        }

        info!(path = %self.network_path.display(), layers = ?network.layers(), "loaded seed network");
        Some(network)
    }

    /// Loads the seed, trains, and saves the winning network over the file.
    ///
    /// Nothing is written if training fails.
    pub fn run<E>(&self, evaluator: &E, rng: &mut RandomNumberGenerator) -> Result<EvolutionResult>
    where
        E: FitnessEvaluator + ?Sized,
    {
        let seed = self.load_seed();
        let result = self.trainer.train(evaluator, seed.as_ref(), rng)?;

        result.network.save(&self.network_path)?;
        info!(path = %self.network_path.display(), score = result.score, "saved trained network");

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::TrainingParameters;

    fn trainer(generations: usize) -> EvolutionaryTrainer {
        let params = TrainingParameters::builder()
            .population_size(4)
            .generation_count(generations)
            .input_size(2)
            .output_size(1)
            .hidden_layers(1, 2)
            .neurons_per_layer(2, 4)
            .build()
            .unwrap();
        EvolutionaryTrainer::new(params).unwrap()
    }

    fn score(network: &NeuralNetwork) -> f64 {
        network.feed_forward(&[1.0, 0.0]).map(|o| o[0]).unwrap_or(0.0)
    }

    #[test]
    fn test_missing_file_means_no_seed() {
        let dir = tempfile::tempdir().unwrap();
        let session = TrainingSession::new(trainer(1), dir.path().join("absent.nn"));

        assert!(session.load_seed().is_none());
    }

    #[test]
    fn test_corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.nn");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();

        let session = TrainingSession::new(trainer(1), &path);
        assert!(session.load_seed().is_none());
    }

    #[test]
    fn test_oversized_layer_header_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trained_network.nn");
        let mut bytes = 2u64.to_le_bytes().to_vec();
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        std::fs::write(&path, bytes).unwrap();

        let session = TrainingSession::new(trainer(1), &path);
        assert!(session.load_seed().is_none());
    }

    #[test]
    fn test_run_saves_and_next_run_reuses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trained_network.nn");
        let mut rng = RandomNumberGenerator::from_seed(8);

        let session = TrainingSession::new(trainer(2), &path);
        let first = session.run(&score, &mut rng).unwrap();

        let saved = NeuralNetwork::load(&path).unwrap();
        assert_eq!(saved, first.network);
        assert_eq!(session.load_seed(), Some(saved));

        // Seeded run: the seed is in generation zero, so with a
        // deterministic evaluator the result cannot be worse.
        let second = session.run(&score, &mut rng).unwrap();
        assert!(second.score >= first.score);
    }

    #[test]
    fn test_failed_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trained_network.nn");
        let mut rng = RandomNumberGenerator::from_seed(9);
        let failing = |_: &NeuralNetwork| f64::INFINITY;

        let session = TrainingSession::new(trainer(1), &path);
        assert!(session.run(&failing, &mut rng).is_err());
        assert!(!path.exists());
    }
}
