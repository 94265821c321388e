//! # GenerationalStrategy
//!
//! The `GenerationalStrategy` replaces the whole population each generation.
//! The best genome is carried over unchanged (elitism); every other slot is
//! filled with a child of two tournament-selected parents, crossed over and
//! then mutated.
use tracing::trace;

use super::BreedStrategy;
use crate::{
    error::{GeneticError, OptionExt, Result},
    evolution::options::TrainingParameters,
    genome::Genome,
    rng::RandomNumberGenerator,
    selection::{ElitistSelection, SelectionStrategy, TournamentSelection},
};

#[derive(Debug, Clone)]
pub struct GenerationalStrategy {
    elitism: ElitistSelection,
    tournament: TournamentSelection,
}

impl GenerationalStrategy {
    /// # Errors
    ///
    /// Returns an error if `tournament_size` is 0.
    pub fn new(tournament_size: usize) -> Result<Self> {
        Ok(Self {
            elitism: ElitistSelection::new(),
            tournament: TournamentSelection::new(tournament_size)?,
        })
    }

    pub fn from_parameters(params: &TrainingParameters) -> Result<Self> {
        Self::new(params.get_tournament_size())
    }
}

impl BreedStrategy for GenerationalStrategy {
    fn breed(
        &self,
        population: &[Genome],
        fitness: &[f64],
        params: &TrainingParameters,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Genome>> {
        if population.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        if fitness.len() != population.len() {
            return Err(GeneticError::Configuration(format!(
                "Fitness vector length ({}) doesn't match population length ({})",
                fitness.len(),
                population.len()
            )));
        }

        let target = params.get_population_size();
        trace!(
            target,
            tournament_size = self.tournament.tournament_size(),
            "breeding generation"
        );
        let mut children = Vec::with_capacity(target);

        // Always include the winner of the previous generation
        let elite = self
            .elitism
            .select(fitness, 1, rng)?
            .first()
            .copied()
            .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;
        children.push(population[elite].clone());

        while children.len() < target {
            let parents = self.tournament.select(fitness, 2, rng)?;
            let (first, second) = match parents[..] {
                [first, second] => (first, second),
                _ => return Err(GeneticError::EmptyPopulation),
            };

            let mut child =
                Genome::crossover(&population[first], &population[second], params, rng)?;
            let mutation = child.mutate(params, rng)?;
            trace!(first, second, ?mutation, "bred child");

            children.push(child);
        }

        Ok(children)
    }
}
