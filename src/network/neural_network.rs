//! # NeuralNetwork
//!
//! A fully-connected feed-forward network with sigmoid activations. For a
//! topology of `L` layers the network owns `L - 1` weight matrices and `L - 1`
//! bias vectors; the matrix of transition `i` has shape
//! `[layers[i + 1]][layers[i]]` (one row per output neuron).
//!
//! ## Example
//!
//! ```rust
//! use evonet::network::{NeuralNetwork, Topology};
//! use evonet::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let network = NeuralNetwork::new(Topology::new(vec![3, 5, 2]).unwrap(), &mut rng);
//!
//! let output = network.feed_forward(&[0.1, 0.2, 0.3]).unwrap();
//! assert_eq!(output.len(), 2);
//! assert!(output.iter().all(|v| (0.0..=1.0).contains(v)));
//! ```
//!
//! ## Activation buffers
//!
//! Inference reuses per-layer activation buffers between calls. The buffers
//! live in a [`ThreadLocal`], so a network can be evaluated from several rayon
//! workers at once, and `Clone` always starts the copy with its own empty set.

use std::cell::RefCell;
use std::fmt;

use thread_local::ThreadLocal;

use super::topology::Topology;
use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// Row-major weight matrix: `matrix[output_neuron][input_neuron]`.
pub type Matrix = Vec<Vec<f64>>;

const INIT_RANGE: (f64, f64) = (-1.0, 1.0);

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

pub struct NeuralNetwork {
    topology: Topology,
    weights: Vec<Matrix>,
    biases: Vec<Vec<f64>>,
    activations: ThreadLocal<RefCell<Vec<Vec<f64>>>>,
}

impl NeuralNetwork {
    /// Allocates a network for `topology` with every weight and bias drawn
    /// uniformly from `[-1, 1]`. All weights are drawn before any bias.
    pub fn new(topology: Topology, rng: &mut RandomNumberGenerator) -> Self {
        let (low, high) = INIT_RANGE;

        let weights = (0..topology.transitions())
            .filter_map(|t| topology.transition_shape(t))
            .map(|(rows, columns)| {
                (0..rows)
                    .map(|_| rng.fetch_uniform(low, high, columns))
                    .collect()
            })
            .collect();

        let biases = (0..topology.transitions())
            .filter_map(|t| topology.transition_shape(t))
            .map(|(rows, _)| rng.fetch_uniform(low, high, rows))
            .collect();

        Self::assemble(topology, weights, biases)
    }

    /// Builds a network from explicit weights and biases.
    ///
    /// # Errors
    ///
    /// Returns [`GeneticError::ShapeMismatch`] if the number of matrices or
    /// vectors, or any of their dimensions, disagrees with `topology`.
    pub fn from_parts(
        topology: Topology,
        weights: Vec<Matrix>,
        biases: Vec<Vec<f64>>,
    ) -> Result<Self> {
        let transitions = topology.transitions();
        if weights.len() != transitions || biases.len() != transitions {
            return Err(GeneticError::ShapeMismatch(format!(
                "Topology {:?} has {} transitions, got {} weight matrices and {} bias vectors",
                topology.layers(),
                transitions,
                weights.len(),
                biases.len()
            )));
        }

        for t in 0..transitions {
            let Some((rows, columns)) = topology.transition_shape(t) else {
                continue;
            };
            if weights[t].len() != rows {
                return Err(GeneticError::ShapeMismatch(format!(
                    "Transition {} expects {} weight rows, got {}",
                    t,
                    rows,
                    weights[t].len()
                )));
            }
            if let Some((neuron, row)) = weights[t]
                .iter()
                .enumerate()
                .find(|(_, row)| row.len() != columns)
            {
                return Err(GeneticError::ShapeMismatch(format!(
                    "Transition {} neuron {} expects {} weights, got {}",
                    t,
                    neuron,
                    columns,
                    row.len()
                )));
            }
            if biases[t].len() != rows {
                return Err(GeneticError::ShapeMismatch(format!(
                    "Transition {} expects {} biases, got {}",
                    t,
                    rows,
                    biases[t].len()
                )));
            }
        }

        Ok(Self::assemble(topology, weights, biases))
    }

    fn assemble(topology: Topology, weights: Vec<Matrix>, biases: Vec<Vec<f64>>) -> Self {
        Self {
            topology,
            weights,
            biases,
            activations: ThreadLocal::new(),
        }
    }

    fn fresh_buffers(&self) -> Vec<Vec<f64>> {
        self.topology.layers()[1..]
            .iter()
            .map(|&width| vec![0.0; width])
            .collect()
    }

    /// Runs inference and returns the activations of the output layer.
    ///
    /// Each neuron computes `sigmoid(bias + Σ previous[k] * weight[k])`.
    ///
    /// # Errors
    ///
    /// Returns [`GeneticError::ShapeMismatch`] without computing anything if
    /// `input.len()` differs from the input width.
    pub fn feed_forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        if input.len() != self.input_size() {
            return Err(GeneticError::ShapeMismatch(format!(
                "Input size {} does not match first layer size {}",
                input.len(),
                self.input_size()
            )));
        }

        let cell = self
            .activations
            .get_or(|| RefCell::new(self.fresh_buffers()));
        let mut buffers = cell.borrow_mut();

        for (t, (matrix, bias)) in self.weights.iter().zip(&self.biases).enumerate() {
            let (done, pending) = buffers.split_at_mut(t);
            let previous: &[f64] = if t == 0 { input } else { &done[t - 1] };

            for ((out, row), b) in pending[0].iter_mut().zip(matrix).zip(bias) {
                let sum = row
                    .iter()
                    .zip(previous)
                    .fold(*b, |acc, (w, a)| acc + w * a);
                *out = sigmoid(sum);
            }
        }

        Ok(buffers[buffers.len() - 1].clone())
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn layers(&self) -> &[usize] {
        self.topology.layers()
    }

    pub fn hidden_layers(&self) -> &[usize] {
        self.topology.hidden()
    }

    pub fn input_size(&self) -> usize {
        self.topology.input_size()
    }

    pub fn output_size(&self) -> usize {
        self.topology.output_size()
    }

    pub fn weights(&self) -> &[Matrix] {
        &self.weights
    }

    pub fn biases(&self) -> &[Vec<f64>] {
        &self.biases
    }

    /// Total number of weights and biases.
    pub fn parameter_count(&self) -> usize {
        let weights: usize = self.weights.iter().flatten().map(Vec::len).sum();
        let biases: usize = self.biases.iter().map(Vec::len).sum();
        weights + biases
    }

    /// Weight from `input` neuron to `neuron` in transition `transition`.
    pub fn weight_mut(
        &mut self,
        transition: usize,
        neuron: usize,
        input: usize,
    ) -> Option<&mut f64> {
        self.weights
            .get_mut(transition)?
            .get_mut(neuron)?
            .get_mut(input)
    }

    pub fn bias_mut(&mut self, transition: usize, neuron: usize) -> Option<&mut f64> {
        self.biases.get_mut(transition)?.get_mut(neuron)
    }

    /// Applies `f` to every weight scalar in transition/neuron/input order.
    /// Biases are left untouched.
    pub(crate) fn for_each_weight_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut f64),
    {
        self.weights
            .iter_mut()
            .flatten()
            .flatten()
            .for_each(|w| f(w));
    }

    /// Whether transition `index` has the same `(rows, columns)` shape in
    /// both networks.
    pub(crate) fn transition_matches(&self, other: &NeuralNetwork, index: usize) -> bool {
        match (
            self.topology.transition_shape(index),
            other.topology.transition_shape(index),
        ) {
            (Some(mine), Some(theirs)) => mine == theirs,
            _ => false,
        }
    }

    /// Mutable weight matrix of one transition. Row and column counts must be
    /// left as they are.
    pub(crate) fn transition_weights_mut(&mut self, index: usize) -> Option<&mut Matrix> {
        self.weights.get_mut(index)
    }

    /// Copies weights and biases of every transition whose shape is identical
    /// in `source`. Returns the number of transitions copied.
    pub(crate) fn inherit_matching(&mut self, source: &NeuralNetwork) -> usize {
        let mut inherited = 0;
        for t in 0..self.weights.len() {
            if self.transition_matches(source, t) {
                self.weights[t].clone_from(&source.weights[t]);
                self.biases[t].clone_from(&source.biases[t]);
                inherited += 1;
            }
        }
        inherited
    }
}

impl Clone for NeuralNetwork {
    /// Deep copy: fresh matrices and vectors with identical values and an
    /// activation buffer set of its own.
    fn clone(&self) -> Self {
        Self::assemble(
            self.topology.clone(),
            self.weights.clone(),
            self.biases.clone(),
        )
    }
}

impl PartialEq for NeuralNetwork {
    fn eq(&self, other: &Self) -> bool {
        self.topology == other.topology
            && self.weights == other.weights
            && self.biases == other.biases
    }
}

impl fmt::Debug for NeuralNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeuralNetwork")
            .field("layers", &self.topology.layers())
            .field("weights", &self.weights)
            .field("biases", &self.biases)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_network() -> NeuralNetwork {
        // [2, 3, 1]
        let topology = Topology::new(vec![2, 3, 1]).unwrap();
        let weights = vec![
            vec![vec![0.5, -0.25], vec![-1.0, 0.75], vec![0.1, 0.2]],
            vec![vec![0.3, -0.6, 0.9]],
        ];
        let biases = vec![vec![0.1, -0.2, 0.0], vec![-0.05]];
        NeuralNetwork::from_parts(topology, weights, biases).unwrap()
    }

    #[test]
    fn test_feed_forward_matches_hand_computation() {
        let network = fixed_network();
        let output = network.feed_forward(&[1.0, 0.0]).unwrap();

        let h0 = sigmoid(0.1 + 0.5);
        let h1 = sigmoid(-0.2 - 1.0);
        let h2 = sigmoid(0.0 + 0.1);
        let expected = sigmoid(-0.05 + 0.3 * h0 - 0.6 * h1 + 0.9 * h2);

        assert_eq!(output.len(), 1);
        assert!((output[0] - expected).abs() < 1e-9);

        // Buffers are reused; repeated calls give the same answer.
        let again = network.feed_forward(&[1.0, 0.0]).unwrap();
        assert_eq!(output, again);
    }

    #[test]
    fn test_feed_forward_rejects_wrong_input_length() {
        let network = fixed_network();
        let before = network.clone();

        let result = network.feed_forward(&[1.0, 0.0, 3.0]);
        assert!(matches!(result, Err(GeneticError::ShapeMismatch(_))));
        assert_eq!(network, before);
    }

    #[test]
    fn test_random_network_shapes_and_range() {
        let mut rng = RandomNumberGenerator::from_seed(11);
        let network = NeuralNetwork::new(Topology::new(vec![4, 6, 3, 2]).unwrap(), &mut rng);

        assert_eq!(network.weights().len(), 3);
        assert_eq!(network.weights()[0].len(), 6);
        assert_eq!(network.weights()[0][0].len(), 4);
        assert_eq!(network.weights()[2].len(), 2);
        assert_eq!(network.biases()[1].len(), 3);
        assert_eq!(network.parameter_count(), 4 * 6 + 6 * 3 + 3 * 2 + 6 + 3 + 2);

        let all_in_range = network
            .weights()
            .iter()
            .flatten()
            .flatten()
            .chain(network.biases().iter().flatten())
            .all(|v| (-1.0..=1.0).contains(v));
        assert!(all_in_range);
    }

    #[test]
    fn test_from_parts_rejects_bad_shapes() {
        let topology = Topology::new(vec![2, 1]).unwrap();

        let wrong_columns = NeuralNetwork::from_parts(
            topology.clone(),
            vec![vec![vec![0.0, 0.0, 0.0]]],
            vec![vec![0.0]],
        );
        assert!(matches!(wrong_columns, Err(GeneticError::ShapeMismatch(_))));

        let wrong_bias = NeuralNetwork::from_parts(
            topology.clone(),
            vec![vec![vec![0.0, 0.0]]],
            vec![vec![0.0, 1.0]],
        );
        assert!(matches!(wrong_bias, Err(GeneticError::ShapeMismatch(_))));

        let missing_transition = NeuralNetwork::from_parts(topology, vec![], vec![]);
        assert!(matches!(
            missing_transition,
            Err(GeneticError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_clone_is_deep() {
        let original = fixed_network();
        let mut copy = original.clone();
        assert_eq!(original, copy);

        *copy.weight_mut(0, 1, 1).unwrap() += 1.0;
        *copy.bias_mut(1, 0).unwrap() = 4.0;

        assert_ne!(original, copy);
        assert_eq!(original.weights()[0][1][1], 0.75);
        assert_eq!(original.biases()[1][0], -0.05);
    }

    #[test]
    fn test_clone_does_not_share_buffers() {
        let original = fixed_network();
        let first = original.feed_forward(&[1.0, 0.0]).unwrap();

        let mut copy = original.clone();
        *copy.weight_mut(1, 0, 0).unwrap() = 5.0;
        copy.feed_forward(&[0.0, 1.0]).unwrap();

        assert_eq!(original.feed_forward(&[1.0, 0.0]).unwrap(), first);
    }

    #[test]
    fn test_inherit_matching_copies_only_equal_shapes() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let source = NeuralNetwork::new(Topology::new(vec![3, 4, 5, 2]).unwrap(), &mut rng);
        let mut target = NeuralNetwork::new(Topology::new(vec![3, 4, 6, 2]).unwrap(), &mut rng);
        let untouched = target.weights()[1].clone();

        assert_eq!(target.inherit_matching(&source), 1);
        assert_eq!(target.weights()[0], source.weights()[0]);
        assert_eq!(target.biases()[0], source.biases()[0]);
        assert_eq!(target.weights()[1], untouched);
    }

    #[test]
    fn test_network_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NeuralNetwork>();
    }
}
