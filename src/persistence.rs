//! Kernel matrix serialization and persistence
//!
//! This module saves computed kernel matrices together with the metric and
//! parameters that produced them, for use with the CLI application and for
//! reloading Gram matrices without recomputation.

use crate::core::{KernelError, KernelMatrix, Result};
use crate::kernel::{KernelParams, Metric};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable representation of a kernel matrix
#[derive(Debug, Serialize, Deserialize)]
pub struct SerializableKernelMatrix {
    /// Number of rows (query diagrams)
    pub rows: usize,
    /// Number of columns (reference diagrams)
    pub cols: usize,
    /// Row-major values
    pub values: Vec<f64>,
    /// Matrix metadata
    pub metadata: MatrixMetadata,
}

/// Metadata for tracking how a matrix was computed
#[derive(Debug, Serialize, Deserialize)]
pub struct MatrixMetadata {
    /// Library version used to compute the matrix
    pub library_version: String,
    /// Metric name
    pub metric: String,
    /// Parameters that were set
    pub params: Map<String, Value>,
    /// Creation timestamp
    pub created_at: String,
}

impl SerializableKernelMatrix {
    /// Wrap a computed matrix with its metric and parameters
    pub fn from_matrix(matrix: &KernelMatrix, metric: &Metric, params: &KernelParams) -> Self {
        Self {
            rows: matrix.rows(),
            cols: matrix.cols(),
            values: matrix.values().to_vec(),
            metadata: MatrixMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                metric: metric.name().to_string(),
                params: params_to_json(params),
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    /// Save to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path).map_err(KernelError::IoError)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| KernelError::SerializationError(e.to_string()))?;
        Ok(())
    }

    /// Load from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).map_err(KernelError::IoError)?;
        let reader = BufReader::new(file);
        let matrix = serde_json::from_reader(reader)
            .map_err(|e| KernelError::SerializationError(e.to_string()))?;
        Ok(matrix)
    }

    /// Convert back to a kernel matrix, checking the stored shape
    pub fn to_matrix(&self) -> Result<KernelMatrix> {
        let expected = self.rows * self.cols;
        if self.values.len() != expected {
            return Err(KernelError::DimensionMismatch {
                expected,
                actual: self.values.len(),
            });
        }
        Ok(KernelMatrix::from_vec(self.rows, self.cols, self.values.clone()))
    }

    /// Print matrix summary
    pub fn print_summary(&self) {
        println!("=== Kernel Matrix Summary ===");
        println!("Metric: {}", self.metadata.metric);
        println!("Shape: {} x {}", self.rows, self.cols);
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at);
        println!("Parameters:");
        for (name, value) in &self.metadata.params {
            println!("  {name}: {value}");
        }

        if let Some((min, max)) = value_range(&self.values) {
            println!("Value Range: [{min:.6}, {max:.6}]");
        }
    }
}

fn params_to_json(params: &KernelParams) -> Map<String, Value> {
    let mut map = Map::new();
    if let Some(bandwidth) = params.bandwidth {
        map.insert("bandwidth".to_string(), Value::from(bandwidth));
    }
    if let Some(bandwidth_fisher) = params.bandwidth_fisher {
        map.insert("bandwidth_fisher".to_string(), Value::from(bandwidth_fisher));
    }
    if let Some(num_directions) = params.num_directions {
        map.insert("num_directions".to_string(), Value::from(num_directions));
    }
    if let Some(weight) = &params.weight {
        map.insert("weight".to_string(), Value::from(weight.name()));
    }
    if let Some(approx) = &params.kernel_approx {
        map.insert("kernel_approx_dim".to_string(), Value::from(approx.dim()));
    }
    map
}

fn value_range(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((min, max)) => Some((min.min(v), max.max(v))),
    })
}
