//! # Error Types
//!
//! This module defines the error type shared by the network, persistence and
//! training layers. Every fallible operation in the crate returns
//! [`Result<T>`], so errors compose with `?` from inference all the way up to
//! a training session.
//!
//! ## Examples
//!
//! Matching on a shape error from inference:
//!
//! ```rust
//! use evonet::error::GeneticError;
//! use evonet::network::{NeuralNetwork, Topology};
//! use evonet::rng::RandomNumberGenerator;
//!
//! let mut rng = RandomNumberGenerator::from_seed(1);
//! let topology = Topology::new(vec![2, 3, 1]).unwrap();
//! let network = NeuralNetwork::new(topology, &mut rng);
//!
//! match network.feed_forward(&[1.0, 2.0, 3.0]) {
//!     Err(GeneticError::ShapeMismatch(msg)) => println!("rejected: {}", msg),
//!     _ => unreachable!(),
//! }
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use evonet::error::{GeneticError, OptionExt};
//!
//! fn best_score(scores: &[f64]) -> evonet::error::Result<f64> {
//!     scores
//!         .iter()
//!         .cloned()
//!         .reduce(f64::max)
//!         .ok_or_else_genetic(|| GeneticError::EmptyPopulation)
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur while building, persisting or evolving networks.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// Input length or weight/bias arrays do not match the declared topology.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// A persisted network stream is truncated or malformed.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// A network could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The fitness evaluator failed or produced a non-finite score.
    #[error("Evaluator error: {0}")]
    Evaluator(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Result to add context to errors.
///
/// ## Examples
///
/// ```rust
/// use evonet::error::ResultExt;
/// use std::fs::File;
///
/// fn open(path: &str) -> evonet::error::Result<()> {
///     File::open(path).context("Failed to open file")?;
///     Ok(())
/// }
/// ```
pub trait ResultExt<T, E> {
    /// Converts the error to a [`GeneticError::Other`] prefixed with `context`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| GeneticError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using `err_fn`
    /// to build the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_wraps_message() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = io.context("opening seed network").unwrap_err();
        match err {
            GeneticError::Other(msg) => {
                assert!(msg.starts_with("opening seed network"));
                assert!(msg.contains("missing"));
            }
            other => panic!("Expected Other error, got {:?}", other),
        }
    }

    #[test]
    fn test_ok_or_else_genetic() {
        let none: Option<u8> = None;
        assert!(matches!(
            none.ok_or_else_genetic(|| GeneticError::EmptyPopulation),
            Err(GeneticError::EmptyPopulation)
        ));
        assert_eq!(Some(3).ok_or_else_genetic(|| GeneticError::EmptyPopulation).unwrap(), 3);
    }

    #[test]
    fn test_io_conversion() {
        fn fails() -> Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(GeneticError::Io(_))));
    }
}
