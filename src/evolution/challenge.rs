use crate::error::{GeneticError, Result};
use crate::network::NeuralNetwork;

/// Scores a network; higher is better.
///
/// Evaluators may be expensive and stochastic. They receive the network by
/// shared reference and cannot change it. Any error aborts the training run.
///
/// Plain closures `Fn(&NeuralNetwork) -> f64` are evaluators too.
pub trait FitnessEvaluator: Sync {
    fn score(&self, network: &NeuralNetwork) -> Result<f64>;
}

impl<F> FitnessEvaluator for F
where
    F: Fn(&NeuralNetwork) -> f64 + Sync,
{
    fn score(&self, network: &NeuralNetwork) -> Result<f64> {
        Ok(self(network))
    }
}

/// Scores a network as the mean of several independent evaluations of an
/// inner, typically stochastic, evaluator.
#[derive(Debug, Clone)]
pub struct AveragedEvaluator<E> {
    inner: E,
    repetitions: usize,
}

impl<E: FitnessEvaluator> AveragedEvaluator<E> {
    /// # Errors
    ///
    /// Returns [`GeneticError::Configuration`] if `repetitions` is zero.
    pub fn new(inner: E, repetitions: usize) -> Result<Self> {
        if repetitions == 0 {
            return Err(GeneticError::Configuration(
                "Averaged evaluator needs at least one repetition".to_string(),
            ));
        }
        Ok(Self { inner, repetitions })
    }

    pub fn repetitions(&self) -> usize {
        self.repetitions
    }
}

impl<E: FitnessEvaluator> FitnessEvaluator for AveragedEvaluator<E> {
    fn score(&self, network: &NeuralNetwork) -> Result<f64> {
        let mut total = 0.0;
        for _ in 0..self.repetitions {
            total += self.inner.score(network)?;
        }
        Ok(total / self.repetitions as f64)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::network::Topology;
    use crate::rng::RandomNumberGenerator;

    fn network() -> NeuralNetwork {
        let mut rng = RandomNumberGenerator::from_seed(1);
        NeuralNetwork::new(Topology::new(vec![2, 2]).unwrap(), &mut rng)
    }

    #[test]
    fn test_closure_is_evaluator() {
        let evaluator = |n: &NeuralNetwork| n.parameter_count() as f64;
        assert_eq!(evaluator.score(&network()).unwrap(), 6.0);
    }

    #[test]
    fn test_averaged_evaluator_means_repeated_calls() {
        let calls = AtomicUsize::new(0);
        let evaluator = |_: &NeuralNetwork| calls.fetch_add(1, Ordering::SeqCst) as f64;
        let averaged = AveragedEvaluator::new(&evaluator, 5).unwrap();

        // 0 + 1 + 2 + 3 + 4
        assert_eq!(averaged.score(&network()).unwrap(), 2.0);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_averaged_evaluator_propagates_errors() {
        struct Failing;
        impl FitnessEvaluator for Failing {
            fn score(&self, _: &NeuralNetwork) -> Result<f64> {
                Err(GeneticError::Evaluator("simulation crashed".to_string()))
            }
        }

        let averaged = AveragedEvaluator::new(Failing, 3).unwrap();
        assert!(matches!(
            averaged.score(&network()),
            Err(GeneticError::Evaluator(_))
        ));
    }

    #[test]
    fn test_zero_repetitions_rejected() {
        let evaluator = |_: &NeuralNetwork| 1.0;
        assert!(AveragedEvaluator::new(evaluator, 0).is_err());
    }
}
