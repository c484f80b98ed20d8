//! Kernel trait definitions

use crate::core::{KernelError, PersistenceDiagram, Point, Result};
use std::fmt::Debug;

/// Kernel function between two persistence diagrams
///
/// Implementations must not depend on the order of points inside a diagram.
pub trait DiagramKernel: Send + Sync {
    /// Compute the kernel value K(D1, D2)
    fn compute(&self, d1: &PersistenceDiagram, d2: &PersistenceDiagram) -> f64;

    /// Whether K(D1, D2) == K(D2, D1) holds by construction
    ///
    /// Symmetric kernels let the dispatcher evaluate only the upper
    /// triangle of a self-kernel matrix.
    fn is_symmetric(&self) -> bool {
        true
    }
}

/// Explicit feature map approximating a Gaussian kernel on points
///
/// `features(points)` returns one row per point; the inner product of two
/// rows approximates the Gaussian kernel between the two points.
pub trait FeatureMap: Debug + Send + Sync {
    /// Feature rows for `points`, shape (points.len(), dim())
    fn features(&self, points: &[Point]) -> Vec<Vec<f64>>;

    /// Dimension of the feature space
    fn dim(&self) -> usize;
}

/// Check that `feature_map` returns one row of length `dim()` per point
///
/// The approximate kernels combine rows positionally, so a misshaped map
/// would otherwise yield a silently truncated value.
pub fn check_feature_map(feature_map: &dyn FeatureMap, points: &[Point]) -> Result<()> {
    let rows = feature_map.features(points);
    if rows.len() != points.len() {
        return Err(KernelError::DimensionMismatch {
            expected: points.len(),
            actual: rows.len(),
        });
    }

    let dim = feature_map.dim();
    match rows.iter().find(|row| row.len() != dim) {
        Some(row) => Err(KernelError::DimensionMismatch {
            expected: dim,
            actual: row.len(),
        }),
        None => Ok(()),
    }
}

/// All points of a diagram batch, in order
pub(crate) fn batch_points(x: &[PersistenceDiagram], y: Option<&[PersistenceDiagram]>) -> Vec<Point> {
    x.iter()
        .chain(y.unwrap_or_default())
        .flat_map(|d| d.points().iter().copied())
        .collect()
}
