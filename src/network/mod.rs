//! Feed-forward networks: layer topology, inference and binary persistence.
pub mod neural_network;
pub mod persistence;
pub mod topology;

pub use neural_network::{Matrix, NeuralNetwork};
pub use topology::{HiddenLayers, Topology};
