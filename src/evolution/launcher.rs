use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use rayon::prelude::*;
use tracing::{debug, info, info_span};

use super::{challenge::FitnessEvaluator, options::TrainingParameters};
use crate::{
    breeding::{BreedStrategy, GenerationalStrategy},
    error::{GeneticError, OptionExt, Result},
    genome::Genome,
    network::NeuralNetwork,
    rng::RandomNumberGenerator,
    selection::ElitistSelection,
};

/// The outcome of a training run.
///
/// Only the winning network leaves the trainer; its genome is discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionResult {
    /// The fittest network of the final population.
    pub network: NeuralNetwork,
    /// The score `network` received in the final evaluation.
    pub score: f64,
    /// Number of generation cycles that ran to completion.
    pub generations_completed: usize,
    /// Best score evaluated in each completed generation.
    pub best_scores: Vec<f64>,
    /// Whether the run was stopped through its [`StopSignal`].
    pub cancelled: bool,
}

/// A flag shared between a running trainer and whoever may want to stop it.
///
/// The trainer checks it once at the start of every generation. A stopped run
/// skips the remaining generations and still returns the best network of its
/// current population.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Evolves a population of genomes against a fitness evaluator.
///
/// Each generation evaluates every genome once, ranks them by descending
/// score (ties go to the lower population index), and hands the scored
/// population to the breeding strategy for replacement. After the last
/// generation the final population is evaluated once more and the best
/// network returned.
#[derive(Debug, Clone)]
pub struct EvolutionaryTrainer<Strategy = GenerationalStrategy>
where
    Strategy: BreedStrategy,
{
    params: TrainingParameters,
    strategy: Strategy,
    ranking: ElitistSelection,
    stop: Option<StopSignal>,
}

impl EvolutionaryTrainer<GenerationalStrategy> {
    /// Creates a trainer that breeds with [`GenerationalStrategy`].
    pub fn new(params: TrainingParameters) -> Result<Self> {
        let strategy = GenerationalStrategy::from_parameters(&params)?;
        Ok(Self::with_strategy(params, strategy))
    }
}

impl<Strategy> EvolutionaryTrainer<Strategy>
where
    Strategy: BreedStrategy,
{
    pub fn with_strategy(params: TrainingParameters, strategy: Strategy) -> Self {
        Self {
            params,
            strategy,
            ranking: ElitistSelection::new(),
            stop: None,
        }
    }

    pub fn with_stop_signal(mut self, signal: StopSignal) -> Self {
        self.stop = Some(signal);
        self
    }

    pub fn parameters(&self) -> &TrainingParameters {
        &self.params
    }

    fn is_stopped(&self) -> bool {
        self.stop.as_ref().is_some_and(StopSignal::is_stopped)
    }

    /// Builds generation zero.
    ///
    /// With a seed, genome 0 is an exact copy of it and every other genome is
    /// a copy mutated once. Without one, every genome gets a random
    /// architecture within the configured bounds.
    ///
    /// # Errors
    ///
    /// Returns [`GeneticError::Configuration`] if the seed's input or output
    /// width differs from the parameters.
    pub fn initial_population(
        &self,
        seed: Option<&NeuralNetwork>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Genome>> {
        let size = self.params.get_population_size();

        let population = match seed {
            Some(seed) => {
                if seed.input_size() != self.params.get_input_size()
                    || seed.output_size() != self.params.get_output_size()
                {
                    return Err(GeneticError::Configuration(format!(
                        "Seed network maps {} inputs to {} outputs, expected {} to {}",
                        seed.input_size(),
                        seed.output_size(),
                        self.params.get_input_size(),
                        self.params.get_output_size()
                    )));
                }

                let mut population = Vec::with_capacity(size);
                population.push(Genome::from_network(seed.clone()));
                for _ in 1..size {
                    let mut genome = Genome::from_network(seed.clone());
                    genome.mutate(&self.params, rng)?;
                    population.push(genome);
                }
                debug!(size, hidden = ?seed.hidden_layers(), "seeded initial population");
                population
            }
            None => {
                let population = (0..size)
                    .map(|_| Genome::random(&self.params, rng))
                    .collect::<Result<Vec<_>>>()?;
                debug!(size, "randomised initial population");
                population
            }
        };

        Ok(population)
    }

    /// Scores every genome once, in population order.
    ///
    /// Populations at or above the parallel threshold are scored on rayon's
    /// thread pool; the returned scores are index-aligned with `population`
    /// either way.
    ///
    /// # Errors
    ///
    /// Propagates the first evaluator error, and reports a non-finite score
    /// as [`GeneticError::Evaluator`].
    pub fn evaluate<E>(&self, population: &[Genome], evaluator: &E) -> Result<Vec<f64>>
    where
        E: FitnessEvaluator + ?Sized,
    {
        let score_one = |genome: &Genome| -> Result<f64> {
            let score = evaluator.score(genome.network())?;
            if !score.is_finite() {
                return Err(GeneticError::Evaluator(format!(
                    "Non-finite fitness score encountered: {}",
                    score
                )));
            }
            Ok(score)
        };

        if population.len() >= self.params.get_parallel_threshold() {
            population.par_iter().map(score_one).collect()
        } else {
            population.iter().map(score_one).collect()
        }
    }

    /// Runs the full training loop.
    ///
    /// # Arguments
    ///
    /// * `evaluator` - Scores networks; higher is better.
    /// * `seed` - Optional known-good network to start the population from.
    /// * `rng` - Source of every random decision in the run.
    ///
    /// # Errors
    ///
    /// This method will return an error if:
    /// - The seed network's input/output widths differ from the parameters
    /// - The evaluator fails or returns a non-finite score (the run is aborted)
    /// - The breeding strategy fails or returns the wrong number of genomes
    pub fn train<E>(
        &self,
        evaluator: &E,
        seed: Option<&NeuralNetwork>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<EvolutionResult>
    where
        E: FitnessEvaluator + ?Sized,
    {
        let generation_count = self.params.get_generation_count();
        let mut population = self.initial_population(seed, rng)?;
        let mut best_scores = Vec::with_capacity(generation_count);
        let mut cancelled = false;

        for generation in 0..generation_count {
            if self.is_stopped() {
                info!(generation, "training stopped before generation");
                cancelled = true;
                break;
            }

            let span = info_span!("generation", generation);
            let _guard = span.enter();

            let fitness = self.evaluate(&population, evaluator)?;
            let ranking = self.ranking.rank(&fitness);
            let leader = ranking
                .first()
                .copied()
                .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;

            let best = fitness[leader];
            let mean = fitness.iter().sum::<f64>() / fitness.len() as f64;
            best_scores.push(best);
            info!(
                best,
                mean,
                hidden = ?population[leader].hidden_layers().widths(),
                "generation evaluated"
            );

            let next = self
                .strategy
                .breed(&population, &fitness, &self.params, rng)?;
            if next.len() != self.params.get_population_size() {
                return Err(GeneticError::Other(format!(
                    "Breeding produced {} genomes in generation {}, expected {}",
                    next.len(),
                    generation,
                    self.params.get_population_size()
                )));
            }
            population = next;
        }

        let fitness = self.evaluate(&population, evaluator)?;
        let winner = self
            .ranking
            .rank(&fitness)
            .first()
            .copied()
            .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;
        let score = fitness[winner];
        let network = population.swap_remove(winner).into_network();

        info!(
            score,
            generations = best_scores.len(),
            cancelled,
            layers = ?network.layers(),
            "training finished"
        );

        Ok(EvolutionResult {
            network,
            score,
            generations_completed: best_scores.len(),
            best_scores,
            cancelled,
        })
    }
}
