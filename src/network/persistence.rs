//! # Network persistence
//!
//! Strict positional binary layout, no header, version or checksum:
//!
//! 1. layer widths as one sequence of `u32`;
//! 2. for each transition in order, each weight row (one per output neuron,
//!    length = the transition's input width) as a sequence of `f64`;
//! 3. for each transition in order, the bias vector as a sequence of `f64`.
//!
//! Sequences are encoded with `bincode`'s default (fixed-width, little-endian,
//! `u64` length prefix) representation. Reading stops at the first length
//! mismatch or premature end of data and never returns a partial network.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;

use bincode::ErrorKind;

use super::neural_network::{Matrix, NeuralNetwork};
use super::topology::Topology;
use crate::error::{GeneticError, Result, ResultExt};

fn encode_error(error: bincode::Error) -> GeneticError {
    match *error {
        ErrorKind::Io(io) => GeneticError::Io(io),
        other => GeneticError::Serialization(other.to_string()),
    }
}

fn decode_error(what: &str, error: bincode::Error) -> GeneticError {
    match *error {
        ErrorKind::Io(io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
            GeneticError::Deserialization(format!("Unexpected end of data while reading {}", what))
        }
        other => GeneticError::Deserialization(format!("Failed to read {}: {}", what, other)),
    }
}

fn read_vector<R: Read>(reader: &mut R, expected: usize, what: &str) -> Result<Vec<f64>> {
    let values: Vec<f64> =
        bincode::deserialize_from(&mut *reader).map_err(|e| decode_error(what, e))?;
    if values.len() != expected {
        return Err(GeneticError::Deserialization(format!(
            "{} has length {}, expected {}",
            what,
            values.len(),
            expected
        )));
    }
    Ok(values)
}

impl NeuralNetwork {
    /// Writes the network in the persisted layout.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        let layers = self
            .layers()
            .iter()
            .map(|&width| {
                u32::try_from(width).map_err(|_| {
                    GeneticError::Serialization(format!("Layer width {} does not fit in u32", width))
                })
            })
            .collect::<Result<Vec<u32>>>()?;

        bincode::serialize_into(&mut writer, &layers).map_err(encode_error)?;

        for row in self.weights().iter().flatten() {
            bincode::serialize_into(&mut writer, row).map_err(encode_error)?;
        }

        for bias in self.biases() {
            bincode::serialize_into(&mut writer, bias).map_err(encode_error)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Reads a network written by [`NeuralNetwork::write_to`].
    ///
    /// # Errors
    ///
    /// Returns [`GeneticError::Deserialization`] on truncated input, an
    /// invalid layer list, or any row or bias vector of the wrong length.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let raw_layers: Vec<u32> = bincode::deserialize_from(&mut reader)
            .map_err(|e| decode_error("layer sizes", e))?;
        let layers: Vec<usize> = raw_layers.into_iter().map(|w| w as usize).collect();

        let topology = Topology::new(layers).map_err(|e| {
            GeneticError::Deserialization(format!("Invalid persisted topology: {}", e))
        })?;

        let mut weights: Vec<Matrix> = Vec::with_capacity(topology.transitions());
        for t in 0..topology.transitions() {
            let Some((rows, columns)) = topology.transition_shape(t) else {
                continue;
            };
            // Widths come from the stream; rows are only stored once read
            let mut matrix = Vec::new();
            for neuron in 0..rows {
                let what = format!("weight row {} of transition {}", neuron, t);
                matrix.push(read_vector(&mut reader, columns, &what)?);
            }
            weights.push(matrix);
        }

        let mut biases = Vec::with_capacity(topology.transitions());
        for t in 0..topology.transitions() {
            let Some((rows, _)) = topology.transition_shape(t) else {
                continue;
            };
            let what = format!("bias vector of transition {}", t);
            biases.push(read_vector(&mut reader, rows, &what)?);
        }

        NeuralNetwork::from_parts(topology, weights, biases)
            .map_err(|e| GeneticError::Deserialization(e.to_string()))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Like [`NeuralNetwork::read_from`], and additionally rejects trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let network = Self::read_from(&mut cursor)?;
        let consumed = cursor.position() as usize;
        if consumed != bytes.len() {
            return Err(GeneticError::Deserialization(format!(
                "{} trailing byte(s) after network data",
                bytes.len() - consumed
            )));
        }
        Ok(network)
    }

    /// Saves the network to `path`.
    ///
    /// The data goes to a sibling temporary file that is renamed over `path`
    /// once fully written, so an interrupted save leaves any previous file
    /// intact.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut temporary = path.as_os_str().to_owned();
        temporary.push(".tmp");

        let written = File::create(&temporary)
            .map_err(GeneticError::from)
            .and_then(|file| self.write_to(BufWriter::new(file)));

        if let Err(e) = written {
            let _ = fs::remove_file(&temporary);
            return Err(e);
        }

        fs::rename(&temporary, path)
            .context(format!("Failed to move network into {}", path.display()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::read_from(BufReader::new(file))
    }
}
