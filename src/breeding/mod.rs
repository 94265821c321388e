//! # BreedStrategy
//!
//! The `BreedStrategy` trait defines the interface for strategies responsible for breeding
//! the next generation of genomes from a scored population.
pub mod generational;

use std::fmt::Debug;

use crate::{
    error::Result, evolution::options::TrainingParameters, genome::Genome,
    rng::RandomNumberGenerator,
};

/// # BreedStrategy
///
/// Produces the complete next population from the current one.
pub trait BreedStrategy
where
    Self: Debug + Clone + Send + Sync,
{
    /// Breeds the next generation.
    ///
    /// ## Parameters
    ///
    /// - `population`: the current genomes.
    /// - `fitness`: the score of each genome, index-aligned with `population`.
    /// - `params`: the training parameters.
    /// - `rng`: the generator for every random decision made while breeding.
    ///
    /// ## Returns
    ///
    /// Exactly `params.get_population_size()` new genomes.
    ///
    /// ## Errors
    ///
    /// This method can fail if:
    /// - The population is empty
    /// - `fitness` and `population` differ in length
    /// - Building a child network fails
    fn breed(
        &self,
        population: &[Genome],
        fitness: &[f64],
        params: &TrainingParameters,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Genome>>;
}

pub use generational::GenerationalStrategy;
