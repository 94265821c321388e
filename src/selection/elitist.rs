use std::cmp::Ordering;

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::SelectionStrategy;

/// A selection strategy that selects the best individuals based on fitness.
///
/// Indices are returned in descending fitness order. Equal scores keep their
/// population order, so the lower index ranks first; NaN scores rank last.
/// Selecting every index yields the full ranking of a population.
///
/// # Examples
///
/// ```
/// use evonet::selection::{ElitistSelection, SelectionStrategy};
/// use evonet::rng::RandomNumberGenerator;
///
/// let fitness = vec![0.5, 0.8, 0.3, 0.8];
/// let mut rng = RandomNumberGenerator::new();
///
/// let ranking = ElitistSelection::default()
///     .select(&fitness, fitness.len(), &mut rng)
///     .unwrap();
/// assert_eq!(ranking, vec![1, 3, 0, 2]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ElitistSelection;

impl ElitistSelection {
    pub fn new() -> Self {
        Self
    }

    /// Indices of `fitness` from best to worst.
    pub fn rank(&self, fitness: &[f64]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..fitness.len()).collect();

        // Stable: ties keep ascending index order
        order.sort_by(|&a, &b| {
            let (fa, fb) = (fitness[a], fitness[b]);
            fb.partial_cmp(&fa).unwrap_or_else(|| {
                if fa.is_nan() && fb.is_nan() {
                    Ordering::Equal
                } else if fa.is_nan() {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            })
        });

        order
    }
}

impl SelectionStrategy for ElitistSelection {
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        _rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        if fitness.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        let mut ranking = self.rank(fitness);
        ranking.truncate(num_to_select);
        Ok(ranking)
    }
}
