//! Utility functions on points and diagram collections

use crate::core::{PersistenceDiagram, Point};

/// Euclidean distances between every point of `x` and every point of `y`
///
/// Returns an (x.len(), y.len()) matrix as nested rows.
pub fn pairwise_distances(x: &[Point], y: &[Point]) -> Vec<Vec<f64>> {
    x.iter()
        .map(|p| y.iter().map(|q| p.squared_distance(q).sqrt()).collect())
        .collect()
}

/// Squared Euclidean distances between every point of `x` and every point of `y`
pub fn pairwise_squared_distances(x: &[Point], y: &[Point]) -> Vec<Vec<f64>> {
    x.iter()
        .map(|p| y.iter().map(|q| p.squared_distance(q)).collect())
        .collect()
}

/// Inner product of two dense vectors
pub fn dot(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y.iter()).map(|(a, b)| a * b).sum()
}

/// Summary statistics for a collection of diagrams
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramCollectionStats {
    /// Number of diagrams
    pub n_diagrams: usize,
    /// Total number of points
    pub total_points: usize,
    /// Size of the largest diagram (the padded length)
    pub max_points: usize,
    /// Number of empty diagrams
    pub n_empty: usize,
    /// Largest persistence over all points
    pub max_persistence: f64,
}

impl DiagramCollectionStats {
    /// Compute statistics from a collection
    pub fn from_diagrams(diagrams: &[PersistenceDiagram]) -> Self {
        Self {
            n_diagrams: diagrams.len(),
            total_points: diagrams.iter().map(PersistenceDiagram::len).sum(),
            max_points: diagrams.iter().map(PersistenceDiagram::len).max().unwrap_or(0),
            n_empty: diagrams.iter().filter(|d| d.is_empty()).count(),
            max_persistence: diagrams
                .iter()
                .map(PersistenceDiagram::max_persistence)
                .fold(0.0, f64::max),
        }
    }

    /// Average number of points per diagram
    pub fn mean_points(&self) -> f64 {
        if self.n_diagrams == 0 {
            0.0
        } else {
            self.total_points as f64 / self.n_diagrams as f64
        }
    }
}
