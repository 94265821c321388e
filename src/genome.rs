//! # Genome
//!
//! A [`Genome`] pairs a hidden-layer descriptor with the network materialised
//! from it. The network's layers are always `[input] + hidden + [output]`; any
//! operation that changes the hidden layers rebuilds the network to match.
//!
//! Genomes are the unit of reproduction: [`Genome::crossover`] builds a child
//! from two parents and [`Genome::mutate`] perturbs architecture and weights.
//! Both work on owned copies, so a child never aliases a parent.

use tracing::debug;

use crate::error::Result;
use crate::evolution::options::TrainingParameters;
use crate::network::{HiddenLayers, NeuralNetwork};
use crate::rng::RandomNumberGenerator;

const WEIGHT_PERTURBATION: f64 = 0.5;
const RESIZE_DELTA: i64 = 2;

/// Which architecture mutation changed a genome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchitectureMutation {
    AddLayer,
    RemoveLayer,
    ResizeLayer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Genome {
    hidden: HiddenLayers,
    network: NeuralNetwork,
}

impl Genome {
    /// A genome with a random architecture inside the configured bounds and a
    /// randomly initialised network.
    pub fn random(params: &TrainingParameters, rng: &mut RandomNumberGenerator) -> Result<Self> {
        let layer_count =
            rng.range_inclusive(params.get_min_hidden_layers(), params.get_max_hidden_layers());
        let widths = (0..layer_count)
            .map(|_| {
                rng.range_inclusive(
                    params.get_min_neurons_per_layer(),
                    params.get_max_neurons_per_layer(),
                )
            })
            .collect();

        let hidden = HiddenLayers::new(widths);
        let topology = hidden.to_topology(params.get_input_size(), params.get_output_size())?;
        let network = NeuralNetwork::new(topology, rng);

        Ok(Self { hidden, network })
    }

    /// Wraps an existing network; the hidden layers are taken from its topology.
    pub fn from_network(network: NeuralNetwork) -> Self {
        Self {
            hidden: HiddenLayers::from(network.hidden_layers()),
            network,
        }
    }

    pub fn hidden_layers(&self) -> &HiddenLayers {
        &self.hidden
    }

    pub fn network(&self) -> &NeuralNetwork {
        &self.network
    }

    pub fn into_network(self) -> NeuralNetwork {
        self.network
    }

    /// Whether the network layers equal `[input] + hidden + [output]`.
    pub fn is_consistent_with(&self, input: usize, output: usize) -> bool {
        let layers = self.network.layers();
        layers.len() == self.hidden.len() + 2
            && layers[0] == input
            && layers[layers.len() - 1] == output
            && self.network.hidden_layers() == self.hidden.widths()
    }

    /// Builds a child from two parents.
    ///
    /// The hidden layers are copied whole from one parent picked by a coin
    /// flip and a fresh network is allocated for them. Each transition whose
    /// shape matches in the child and in both parents takes every weight from
    /// one of the two parents, chosen independently per weight. All other
    /// transitions, and all biases, keep their fresh random values.
    pub fn crossover(
        first: &Genome,
        second: &Genome,
        params: &TrainingParameters,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Genome> {
        let hidden = if rng.flip() {
            first.hidden.clone()
        } else {
            second.hidden.clone()
        };

        let topology = hidden.to_topology(params.get_input_size(), params.get_output_size())?;
        let mut network = NeuralNetwork::new(topology, rng);

        for t in 0..network.topology().transitions() {
            if !network.transition_matches(&first.network, t)
                || !network.transition_matches(&second.network, t)
            {
                continue;
            }

            let (a, b) = (&first.network.weights()[t], &second.network.weights()[t]);
            if let Some(matrix) = network.transition_weights_mut(t) {
                for (j, row) in matrix.iter_mut().enumerate() {
                    for (k, weight) in row.iter_mut().enumerate() {
                        *weight = if rng.flip() { a[j][k] } else { b[j][k] };
                    }
                }
            }
        }

        Ok(Genome { hidden, network })
    }

    /// Architecture mutation followed by weight mutation.
    ///
    /// Returns the architecture mutation that changed the genome, if any.
    pub fn mutate(
        &mut self,
        params: &TrainingParameters,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Option<ArchitectureMutation>> {
        let applied = self.mutate_architecture(params, rng)?;
        self.mutate_weights(params.get_mutation_rate(), rng);
        Ok(applied)
    }

    /// With probability `architecture_mutation_rate`, applies one of: insert
    /// a random-width layer at a random position, remove a random layer, or
    /// resize a random layer by a delta in `[-2, 2]`. An operation whose
    /// bound would be violated does nothing.
    ///
    /// When the hidden layers change, the network is rebuilt for the new
    /// topology. Transitions whose shape survived keep their weights and
    /// biases; the others are freshly randomised.
    pub fn mutate_architecture(
        &mut self,
        params: &TrainingParameters,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Option<ArchitectureMutation>> {
        if !rng.chance(params.get_architecture_mutation_rate()) {
            return Ok(None);
        }

        let (operation, changed) = match rng.index(3) {
            0 => {
                let width = rng.range_inclusive(
                    params.get_min_neurons_per_layer(),
                    params.get_max_neurons_per_layer(),
                );
                let position = rng.index(self.hidden.len() + 1);
                (
                    ArchitectureMutation::AddLayer,
                    self.hidden
                        .insert(position, width, params.get_max_hidden_layers()),
                )
            }
            1 => {
                let changed = !self.hidden.is_empty() && {
                    let position = rng.index(self.hidden.len());
                    self.hidden.remove(position, params.get_min_hidden_layers())
                };
                (ArchitectureMutation::RemoveLayer, changed)
            }
            _ => {
                let changed = !self.hidden.is_empty() && {
                    let position = rng.index(self.hidden.len());
                    let delta = rng.signed_range_inclusive(-RESIZE_DELTA, RESIZE_DELTA);
                    self.hidden.resize(
                        position,
                        delta,
                        params.get_min_neurons_per_layer(),
                        params.get_max_neurons_per_layer(),
                    )
                };
                (ArchitectureMutation::ResizeLayer, changed)
            }
        };

        if !changed {
            return Ok(None);
        }

        let topology = self
            .hidden
            .to_topology(params.get_input_size(), params.get_output_size())?;
        let mut network = NeuralNetwork::new(topology, rng);
        let inherited = network.inherit_matching(&self.network);
        debug!(
            ?operation,
            hidden = ?self.hidden.widths(),
            inherited,
            "architecture mutated"
        );
        self.network = network;

        Ok(Some(operation))
    }

    /// Adds a perturbation from `[-0.5, 0.5]` to each weight with probability
    /// `rate`. Biases are not mutated.
    pub fn mutate_weights(&mut self, rate: f64, rng: &mut RandomNumberGenerator) {
        self.network.for_each_weight_mut(|weight| {
            if rng.chance(rate) {
                *weight += rng.uniform(-WEIGHT_PERTURBATION, WEIGHT_PERTURBATION);
            }
        });
    }
}
