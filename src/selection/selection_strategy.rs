use std::fmt::Debug;

use crate::error::Result;
use crate::rng::RandomNumberGenerator;

/// Trait for selection strategies.
///
/// Selection strategies choose individuals of a population based on their
/// fitness scores (higher is better) and return their indices, so the caller
/// decides whether to borrow or copy the chosen genomes.
///
/// # Examples
///
/// ```
/// use evonet::selection::{ElitistSelection, SelectionStrategy};
/// use evonet::rng::RandomNumberGenerator;
/// use evonet::error::Result;
///
/// fn main() -> Result<()> {
///     let fitness = vec![0.5, 0.8, 0.3];
///     let mut rng = RandomNumberGenerator::new();
///
///     let selection = ElitistSelection::default();
///     let selected = selection.select(&fitness, 2, &mut rng)?;
///
///     assert_eq!(selected, vec![1, 0]);
///     Ok(())
/// }
/// ```
pub trait SelectionStrategy: Debug + Send + Sync {
    /// Selects `num_to_select` indices into `fitness`.
    ///
    /// # Errors
    ///
    /// Returns an error if `fitness` is empty.
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>>;
}
