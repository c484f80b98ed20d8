//! Distances between persistence diagrams
//!
//! The exponentiated-distance kernels only see these through
//! [`DiagramDistance`] and [`pairwise_diagram_distances`].

pub mod persistence_fisher;
pub mod sliced_wasserstein;

pub use self::persistence_fisher::persistence_fisher_distance;
pub use self::sliced_wasserstein::sliced_wasserstein_distance;

use crate::core::{KernelError, KernelMatrix, PersistenceDiagram, Result};
use crate::kernel::traits::{batch_points, check_feature_map};
use crate::kernel::FeatureMap;
use log::debug;
use std::fmt;
use std::sync::Arc;

/// A diagram distance together with its parameters
#[derive(Clone)]
pub enum DiagramDistance {
    /// Sliced Wasserstein distance approximated with `num_directions` lines
    SlicedWasserstein { num_directions: usize },
    /// Persistence Fisher distance with smoothing `bandwidth`
    PersistenceFisher {
        bandwidth: f64,
        approximation: Option<Arc<dyn FeatureMap>>,
    },
}

impl DiagramDistance {
    /// Check the parameters before a batch computation
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::SlicedWasserstein { num_directions } if *num_directions == 0 => Err(
                KernelError::InvalidParameter("num_directions must be positive".to_string()),
            ),
            Self::PersistenceFisher { bandwidth, .. } if *bandwidth <= 0.0 => Err(
                KernelError::InvalidParameter(format!(
                    "bandwidth_fisher must be positive, got {bandwidth}"
                )),
            ),
            _ => Ok(()),
        }
    }

    /// Distance between two diagrams
    pub fn distance(&self, d1: &PersistenceDiagram, d2: &PersistenceDiagram) -> f64 {
        match self {
            Self::SlicedWasserstein { num_directions } => {
                sliced_wasserstein_distance(d1, d2, *num_directions)
            }
            Self::PersistenceFisher {
                bandwidth,
                approximation,
            } => persistence_fisher_distance(d1, d2, *bandwidth, approximation.as_deref()),
        }
    }

    /// Metric name
    pub fn name(&self) -> &'static str {
        match self {
            Self::SlicedWasserstein { .. } => "sliced_wasserstein",
            Self::PersistenceFisher { .. } => "persistence_fisher",
        }
    }
}

impl fmt::Debug for DiagramDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SlicedWasserstein { num_directions } => f
                .debug_struct("SlicedWasserstein")
                .field("num_directions", num_directions)
                .finish(),
            Self::PersistenceFisher {
                bandwidth,
                approximation,
            } => f
                .debug_struct("PersistenceFisher")
                .field("bandwidth", bandwidth)
                .field("approximated", &approximation.is_some())
                .finish(),
        }
    }
}

/// Distance matrix between two diagram collections
///
/// With `y = None` the self-distance matrix of `x` is returned; only its
/// upper triangle is computed and the diagonal is zero.
pub fn pairwise_diagram_distances(
    x: &[PersistenceDiagram],
    y: Option<&[PersistenceDiagram]>,
    distance: &DiagramDistance,
) -> Result<KernelMatrix> {
    distance.validate()?;
    if let DiagramDistance::PersistenceFisher {
        approximation: Some(feature_map),
        ..
    } = distance
    {
        check_feature_map(feature_map.as_ref(), &batch_points(x, y))?;
    }

    match y {
        None => {
            debug!(
                "Computing {} self-distances over {} diagrams",
                distance.name(),
                x.len()
            );
            Ok(KernelMatrix::symmetric_from_fn(x.len(), |i, j| {
                if i == j {
                    0.0
                } else {
                    distance.distance(&x[i], &x[j])
                }
            }))
        }
        Some(y) => {
            debug!(
                "Computing {} distances between {} and {} diagrams",
                distance.name(),
                x.len(),
                y.len()
            );
            Ok(KernelMatrix::from_fn(x.len(), y.len(), |i, j| {
                distance.distance(&x[i], &y[j])
            }))
        }
    }
}
