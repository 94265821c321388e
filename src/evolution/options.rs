//! # TrainingParameters
//!
//! The `TrainingParameters` struct holds the immutable configuration of a
//! training run: population and generation counts, the fixed input/output
//! widths of every network, the bounds of the hidden-layer search space, and
//! the mutation and selection rates.
//!
//! Parameters are validated once, when they are built, and cannot be changed
//! afterwards.
//!
//! ## Example
//!
//! ```rust
//! use evonet::evolution::TrainingParameters;
//!
//! // Defaults for everything except the four required values
//! let params = TrainingParameters::new(100, 50, 12, 4).unwrap();
//! assert_eq!(params.get_tournament_size(), 3);
//!
//! // Fluent builder
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
//! assert_eq!(params.get_min_hidden_layers(), 2);
//!
//! // Invalid values are rejected up front
//! assert!(TrainingParameters::new(1, 10, 12, 4).is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{GeneticError, Result};

const DEFAULT_MIN_HIDDEN_LAYERS: usize = 1;
const DEFAULT_MAX_HIDDEN_LAYERS: usize = 4;
const DEFAULT_MIN_NEURONS_PER_LAYER: usize = 4;
const DEFAULT_MAX_NEURONS_PER_LAYER: usize = 16;
const DEFAULT_MUTATION_RATE: f64 = 0.1;
const DEFAULT_TOURNAMENT_SIZE: usize = 3;
const DEFAULT_ARCHITECTURE_MUTATION_RATE: f64 = 0.2;
const DEFAULT_PARALLEL_THRESHOLD: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "TrainingParametersBuilder",
    into = "TrainingParametersBuilder"
)]
pub struct TrainingParameters {
    population_size: usize,
    generation_count: usize,
    input_size: usize,
    output_size: usize,
    min_hidden_layers: usize,
    max_hidden_layers: usize,
    min_neurons_per_layer: usize,
    max_neurons_per_layer: usize,
    mutation_rate: f64,
    tournament_size: usize,
    architecture_mutation_rate: f64,
    /// Minimum population size evaluated across worker threads
    parallel_threshold: usize,
}

impl TrainingParameters {
    /// Creates validated parameters with default search bounds and rates.
    pub fn new(
        population_size: usize,
        generation_count: usize,
        input_size: usize,
        output_size: usize,
    ) -> Result<Self> {
        Self::builder()
            .population_size(population_size)
            .generation_count(generation_count)
            .input_size(input_size)
            .output_size(output_size)
            .build()
    }

    /// Returns a builder for creating a `TrainingParameters` instance.
    pub fn builder() -> TrainingParametersBuilder {
        TrainingParametersBuilder::default()
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_generation_count(&self) -> usize {
        self.generation_count
    }

    pub fn get_input_size(&self) -> usize {
        self.input_size
    }

    pub fn get_output_size(&self) -> usize {
        self.output_size
    }

    pub fn get_min_hidden_layers(&self) -> usize {
        self.min_hidden_layers
    }

    pub fn get_max_hidden_layers(&self) -> usize {
        self.max_hidden_layers
    }

    pub fn get_min_neurons_per_layer(&self) -> usize {
        self.min_neurons_per_layer
    }

    pub fn get_max_neurons_per_layer(&self) -> usize {
        self.max_neurons_per_layer
    }

    pub fn get_mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn get_tournament_size(&self) -> usize {
        self.tournament_size
    }

    pub fn get_architecture_mutation_rate(&self) -> f64 {
        self.architecture_mutation_rate
    }

    /// Returns the minimum population size evaluated in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    fn validate(&self) -> Result<()> {
        if self.population_size < 2 {
            return Err(GeneticError::Configuration(format!(
                "Population size must be at least 2, got {}",
                self.population_size
            )));
        }

        for (name, value) in [
            ("Input size", self.input_size),
            ("Output size", self.output_size),
            ("Minimum neurons per layer", self.min_neurons_per_layer),
            ("Maximum hidden layers", self.max_hidden_layers),
            ("Tournament size", self.tournament_size),
            ("Parallel threshold", self.parallel_threshold),
        ] {
            if value == 0 {
                return Err(GeneticError::Configuration(format!(
                    "{} must be positive",
                    name
                )));
            }
        }

        if self.min_hidden_layers > self.max_hidden_layers {
            return Err(GeneticError::Configuration(format!(
                "Minimum hidden layers ({}) exceeds maximum hidden layers ({})",
                self.min_hidden_layers, self.max_hidden_layers
            )));
        }

        if self.min_neurons_per_layer > self.max_neurons_per_layer {
            return Err(GeneticError::Configuration(format!(
                "Minimum neurons per layer ({}) exceeds maximum neurons per layer ({})",
                self.min_neurons_per_layer, self.max_neurons_per_layer
            )));
        }

        for (name, rate) in [
            ("Mutation rate", self.mutation_rate),
            ("Architecture mutation rate", self.architecture_mutation_rate),
        ] {
            if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
                return Err(GeneticError::Configuration(format!(
                    "{} must be within [0, 1], got {}",
                    name, rate
                )));
            }
        }

        Ok(())
    }
}

/// Builder for `TrainingParameters`.
///
/// Population size, generation count, input size and output size are
/// required; everything else falls back to the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingParametersBuilder {
    population_size: Option<usize>,
    generation_count: Option<usize>,
    input_size: Option<usize>,
    output_size: Option<usize>,
    min_hidden_layers: Option<usize>,
    max_hidden_layers: Option<usize>,
    min_neurons_per_layer: Option<usize>,
    max_neurons_per_layer: Option<usize>,
    mutation_rate: Option<f64>,
    tournament_size: Option<usize>,
    architecture_mutation_rate: Option<f64>,
    parallel_threshold: Option<usize>,
}

impl TrainingParametersBuilder {
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn generation_count(mut self, value: usize) -> Self {
        self.generation_count = Some(value);
        self
    }

    pub fn input_size(mut self, value: usize) -> Self {
        self.input_size = Some(value);
        self
    }

    pub fn output_size(mut self, value: usize) -> Self {
        self.output_size = Some(value);
        self
    }

    /// Sets the inclusive bounds on the number of hidden layers.
    pub fn hidden_layers(mut self, min: usize, max: usize) -> Self {
        self.min_hidden_layers = Some(min);
        self.max_hidden_layers = Some(max);
        self
    }

    /// Sets the inclusive bounds on the width of each hidden layer.
    pub fn neurons_per_layer(mut self, min: usize, max: usize) -> Self {
        self.min_neurons_per_layer = Some(min);
        self.max_neurons_per_layer = Some(max);
        self
    }

    pub fn mutation_rate(mut self, value: f64) -> Self {
        self.mutation_rate = Some(value);
        self
    }

    pub fn tournament_size(mut self, value: usize) -> Self {
        self.tournament_size = Some(value);
        self
    }

    pub fn architecture_mutation_rate(mut self, value: f64) -> Self {
        self.architecture_mutation_rate = Some(value);
        self
    }

    /// Sets the parallel threshold.
    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    /// Builds and validates the `TrainingParameters` instance.
    ///
    /// # Errors
    ///
    /// Returns [`GeneticError::Configuration`] if a required value is missing
    /// or any value is out of range.
    pub fn build(self) -> Result<TrainingParameters> {
        let required = |value: Option<usize>, name: &str| {
            value.ok_or_else(|| GeneticError::Configuration(format!("{} not specified", name)))
        };

        let params = TrainingParameters {
            population_size: required(self.population_size, "Population size")?,
            generation_count: required(self.generation_count, "Generation count")?,
            input_size: required(self.input_size, "Input size")?,
            output_size: required(self.output_size, "Output size")?,
            min_hidden_layers: self.min_hidden_layers.unwrap_or(DEFAULT_MIN_HIDDEN_LAYERS),
            max_hidden_layers: self.max_hidden_layers.unwrap_or(DEFAULT_MAX_HIDDEN_LAYERS),
            min_neurons_per_layer: self
                .min_neurons_per_layer
                .unwrap_or(DEFAULT_MIN_NEURONS_PER_LAYER),
            max_neurons_per_layer: self
                .max_neurons_per_layer
                .unwrap_or(DEFAULT_MAX_NEURONS_PER_LAYER),
            mutation_rate: self.mutation_rate.unwrap_or(DEFAULT_MUTATION_RATE),
            tournament_size: self.tournament_size.unwrap_or(DEFAULT_TOURNAMENT_SIZE),
            architecture_mutation_rate: self
                .architecture_mutation_rate
                .unwrap_or(DEFAULT_ARCHITECTURE_MUTATION_RATE),
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(DEFAULT_PARALLEL_THRESHOLD),
        };

        params.validate()?;
        Ok(params)
    }
}

impl TryFrom<TrainingParametersBuilder> for TrainingParameters {
    type Error = GeneticError;

    fn try_from(builder: TrainingParametersBuilder) -> Result<Self> {
        builder.build()
    }
}

impl From<TrainingParameters> for TrainingParametersBuilder {
    fn from(params: TrainingParameters) -> Self {
        Self {
            population_size: Some(params.population_size),
            generation_count: Some(params.generation_count),
            input_size: Some(params.input_size),
            output_size: Some(params.output_size),
            min_hidden_layers: Some(params.min_hidden_layers),
            max_hidden_layers: Some(params.max_hidden_layers),
            min_neurons_per_layer: Some(params.min_neurons_per_layer),
            max_neurons_per_layer: Some(params.max_neurons_per_layer),
            mutation_rate: Some(params.mutation_rate),
            tournament_size: Some(params.tournament_size),
            architecture_mutation_rate: Some(params.architecture_mutation_rate),
            parallel_threshold: Some(params.parallel_threshold),
        }
    }
}
