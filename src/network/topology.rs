//! # Topology
//!
//! A [`Topology`] is the full, validated list of layer widths of a network:
//! input width first, output width last, hidden widths in between.
//! [`HiddenLayers`] is the mutable part a genome owns: an explicitly owned
//! sequence whose insert/remove/resize operations are bounded by the limits
//! passed in by the caller.

use crate::error::{GeneticError, Result};

/// Ordered layer widths `[input, hidden.., output]`.
///
/// Invariant: at least two layers, every width positive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topology {
    layers: Vec<usize>,
}

impl Topology {
    /// Validates and wraps a list of layer widths.
    ///
    /// # Errors
    ///
    /// Returns [`GeneticError::ShapeMismatch`] if fewer than two layers are
    /// given or any width is zero.
    pub fn new(layers: Vec<usize>) -> Result<Self> {
        if layers.len() < 2 {
            return Err(GeneticError::ShapeMismatch(format!(
                "A topology needs at least an input and an output layer, got {} layer(s)",
                layers.len()
            )));
        }

        if let Some(position) = layers.iter().position(|&width| width == 0) {
            return Err(GeneticError::ShapeMismatch(format!(
                "Layer {} of topology {:?} has zero width",
                position, layers
            )));
        }

        Ok(Self { layers })
    }

    /// Builds `[input] + hidden + [output]`.
    pub fn from_hidden(input: usize, hidden: &[usize], output: usize) -> Result<Self> {
        let mut layers = Vec::with_capacity(hidden.len() + 2);
        layers.push(input);
        layers.extend_from_slice(hidden);
        layers.push(output);
        Self::new(layers)
    }

    pub fn layers(&self) -> &[usize] {
        &self.layers
    }

    pub fn input_size(&self) -> usize {
        self.layers[0]
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1]
    }

    /// The widths strictly between input and output.
    pub fn hidden(&self) -> &[usize] {
        &self.layers[1..self.layers.len() - 1]
    }

    /// Number of layer-to-layer transitions (`layers - 1`).
    pub fn transitions(&self) -> usize {
        self.layers.len() - 1
    }

    /// `(output width, input width)` of transition `index`, i.e. the
    /// `[rows][columns]` shape of its weight matrix.
    pub fn transition_shape(&self, index: usize) -> Option<(usize, usize)> {
        if index < self.transitions() {
            Some((self.layers[index + 1], self.layers[index]))
        } else {
            None
        }
    }
}

/// The hidden-layer widths of a genome.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HiddenLayers {
    widths: Vec<usize>,
}

impl HiddenLayers {
    pub fn new(widths: Vec<usize>) -> Self {
        Self { widths }
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    pub fn len(&self) -> usize {
        self.widths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widths.is_empty()
    }

    /// Inserts a layer of `width` before `position` unless that would exceed
    /// `max_layers`. Returns whether the sequence changed.
    pub fn insert(&mut self, position: usize, width: usize, max_layers: usize) -> bool {
        if self.widths.len() >= max_layers || position > self.widths.len() || width == 0 {
            return false;
        }
        self.widths.insert(position, width);
        true
    }

    /// Removes the layer at `position` unless that would drop below
    /// `min_layers`. Returns whether the sequence changed.
    pub fn remove(&mut self, position: usize, min_layers: usize) -> bool {
        if self.widths.len() <= min_layers || position >= self.widths.len() {
            return false;
        }
        self.widths.remove(position);
        true
    }

    /// Adds `delta` to the width at `position`, clamped into
    /// `[min_width, max_width]`. Returns whether the width changed.
    pub fn resize(
        &mut self,
        position: usize,
        delta: i64,
        min_width: usize,
        max_width: usize,
    ) -> bool {
        let Some(width) = self.widths.get_mut(position) else {
            return false;
        };
        let resized = (*width as i64 + delta).clamp(min_width as i64, max_width as i64) as usize;
        let changed = resized != *width;
        *width = resized;
        changed
    }

    /// Materialises the full topology for the given fixed input/output widths.
    pub fn to_topology(&self, input: usize, output: usize) -> Result<Topology> {
        Topology::from_hidden(input, &self.widths, output)
    }
}

impl From<&[usize]> for HiddenLayers {
    fn from(widths: &[usize]) -> Self {
        Self::new(widths.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_rejects_short_or_empty_layers() {
        assert!(matches!(
            Topology::new(vec![3]),
            Err(GeneticError::ShapeMismatch(_))
        ));
        assert!(matches!(
            Topology::new(vec![3, 0, 1]),
            Err(GeneticError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_topology_accessors() {
        let topology = Topology::from_hidden(4, &[8, 6], 2).unwrap();

        assert_eq!(topology.layers(), &[4, 8, 6, 2]);
        assert_eq!(topology.hidden(), &[8, 6]);
        assert_eq!(topology.input_size(), 4);
        assert_eq!(topology.output_size(), 2);
        assert_eq!(topology.transitions(), 3);
        assert_eq!(topology.transition_shape(0), Some((8, 4)));
        assert_eq!(topology.transition_shape(2), Some((2, 6)));
        assert_eq!(topology.transition_shape(3), None);
    }

    #[test]
    fn test_no_hidden_layers() {
        let topology = Topology::new(vec![3, 2]).unwrap();
        assert!(topology.hidden().is_empty());
        assert_eq!(topology.transitions(), 1);
    }

    #[test]
    fn test_insert_respects_max() {
        let mut hidden = HiddenLayers::new(vec![4, 4]);

        assert!(hidden.insert(1, 9, 3));
        assert_eq!(hidden.widths(), &[4, 9, 4]);
        assert!(!hidden.insert(0, 5, 3));
        assert_eq!(hidden.len(), 3);
    }

    #[test]
    fn test_remove_respects_min() {
        let mut hidden = HiddenLayers::new(vec![4, 7]);

        assert!(hidden.remove(0, 1));
        assert_eq!(hidden.widths(), &[7]);
        assert!(!hidden.remove(0, 1));
        assert!(!hidden.remove(5, 0));
    }

    #[test]
    fn test_resize_clamps() {
        let mut hidden = HiddenLayers::new(vec![5]);

        assert!(!hidden.resize(0, -2, 5, 8));
        assert_eq!(hidden.widths(), &[5]);
        assert!(hidden.resize(0, 2, 5, 6));
        assert_eq!(hidden.widths(), &[6]);
        assert!(!hidden.resize(3, 1, 1, 10));
    }

    #[test]
    fn test_clone_is_independent() {
        let original = HiddenLayers::new(vec![4, 4]);
        let mut copy = original.clone();
        copy.insert(0, 8, 5);

        assert_eq!(original.widths(), &[4, 4]);
        assert_eq!(copy.widths(), &[8, 4, 4]);
    }
}
