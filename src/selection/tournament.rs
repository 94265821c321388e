use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::SelectionStrategy;

/// A selection strategy that selects individuals through tournament selection.
///
/// Each tournament draws `tournament_size` individuals uniformly *with
/// replacement* and picks the one with the highest fitness. Tournaments are
/// independent, so the same individual can win several of them.
///
/// Tournament selection provides a balance between exploration and exploitation:
/// - Smaller tournament sizes lead to more exploration (more random selection)
/// - Larger tournament sizes lead to more exploitation (more focus on the best individuals)
///
/// # Examples
///
/// ```
/// use evonet::selection::{SelectionStrategy, TournamentSelection};
/// use evonet::rng::RandomNumberGenerator;
/// use evonet::error::Result;
///
/// fn main() -> Result<()> {
///     let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
///     let mut rng = RandomNumberGenerator::from_seed(42);
///
///     let selection = TournamentSelection::new(3)?;
///     let parents = selection.select(&fitness, 2, &mut rng)?;
///
///     assert_eq!(parents.len(), 2);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TournamentSelection {
    tournament_size: usize,
}

impl TournamentSelection {
    /// Creates a new TournamentSelection strategy with the specified tournament size.
    ///
    /// A tournament size of 1 is equivalent to uniform random selection.
    ///
    /// # Errors
    ///
    /// Returns an error if `tournament_size` is 0.
    pub fn new(tournament_size: usize) -> Result<Self> {
        if tournament_size < 1 {
            return Err(GeneticError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }

        Ok(Self { tournament_size })
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    /// Runs a single tournament and returns the index of the winner.
    ///
    /// Among equally fit participants the lowest index wins, so the outcome
    /// depends only on the random draws and not on draw order.
    pub fn run_tournament(&self, fitness: &[f64], rng: &mut RandomNumberGenerator) -> Result<usize> {
        if fitness.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        let mut best_idx = rng.index(fitness.len());
        for _ in 1..self.tournament_size {
            let idx = rng.index(fitness.len());
            let (current, best) = (fitness[idx], fitness[best_idx]);
            if current > best || (current == best && idx < best_idx) {
                best_idx = idx;
            }
        }

        Ok(best_idx)
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self { tournament_size: 2 }
    }
}

impl SelectionStrategy for TournamentSelection {
    fn select(
        &self,
        fitness: &[f64],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<usize>> {
        if fitness.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }

        (0..num_to_select)
            .map(|_| self.run_tournament(fitness, rng))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tournament_selection() {
        let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
        let mut rng = RandomNumberGenerator::from_seed(1);

        // Test with default parameters (tournament size 2)
        let selected = TournamentSelection::default()
            .select(&fitness, 10, &mut rng)
            .unwrap();

        // Duplicates are allowed
        assert_eq!(selected.len(), 10);
        assert!(selected.iter().all(|&i| i < fitness.len()));
    }

    #[test]
    fn test_tournament_size_one_is_uniform() {
        let fitness = vec![0.0, 0.0, 0.0, 100.0];
        let mut rng = RandomNumberGenerator::from_seed(2);
        let selection = TournamentSelection::new(1).unwrap();

        let selected = selection.select(&fitness, 400, &mut rng).unwrap();

        // The weakest individuals still win some tournaments
        assert!(selected.iter().any(|&i| i != 3));
    }

    #[test]
    fn test_large_tournament_favours_best() {
        let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
        let mut rng = RandomNumberGenerator::from_seed(3);
        let selection = TournamentSelection::new(50).unwrap();

        let selected = selection.select(&fitness, 20, &mut rng).unwrap();

        assert!(selected.iter().all(|&i| i == 3));
    }

    #[test]
    fn test_tournament_is_reproducible() {
        let fitness = vec![0.5, 0.8, 0.3, 0.9, 0.1];
        let selection = TournamentSelection::new(3).unwrap();

        let first = selection
            .select(&fitness, 8, &mut RandomNumberGenerator::from_seed(42))
            .unwrap();
        let second = selection
            .select(&fitness, 8, &mut RandomNumberGenerator::from_seed(42))
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_tied_scores_pick_lowest_index() {
        let fitness = vec![1.0, 1.0];
        let mut rng = RandomNumberGenerator::from_seed(4);
        let selection = TournamentSelection::new(40).unwrap();

        // With 40 draws over two items both are drawn with overwhelming probability
        assert_eq!(selection.run_tournament(&fitness, &mut rng).unwrap(), 0);
    }

    #[test]
    fn test_tournament_selection_empty_population() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let result = TournamentSelection::default().select(&[], 3, &mut rng);

        assert!(matches!(result, Err(GeneticError::EmptyPopulation)));
    }

    #[test]
    fn test_tournament_selection_invalid_size() {
        assert!(matches!(
            TournamentSelection::new(0),
            Err(GeneticError::Configuration(_))
        ));
    }
}
