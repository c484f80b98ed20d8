//! Exponentiated distance kernels
//!
//! K(D1, D2) = exp(-d(D1, D2) / bandwidth) for a diagram distance d. This
//! gives the sliced Wasserstein kernel and the persistence Fisher kernel.
//! Every value lies in (0, 1] and equals 1 exactly when the distance is 0.

use crate::core::{KernelError, KernelMatrix, PersistenceDiagram, Result};
use crate::kernel::traits::DiagramKernel;
use crate::metrics::{pairwise_diagram_distances, DiagramDistance};

/// Kernel matrix exp(-Dist / bandwidth) between two collections
///
/// `y = None` gives the self-kernel matrix of `x`.
pub fn exponentiated_distance_kernel(
    x: &[PersistenceDiagram],
    y: Option<&[PersistenceDiagram]>,
    distance: &DiagramDistance,
    bandwidth: f64,
) -> Result<KernelMatrix> {
    check_bandwidth(bandwidth)?;
    let distances = pairwise_diagram_distances(x, y, distance)?;
    Ok(distances.map(|d| (-d / bandwidth).exp()))
}

fn check_bandwidth(bandwidth: f64) -> Result<()> {
    if bandwidth > 0.0 {
        Ok(())
    } else {
        Err(KernelError::InvalidParameter(format!(
            "bandwidth must be positive, got {bandwidth}"
        )))
    }
}

/// Exponentiated distance kernel with fixed distance and bandwidth
#[derive(Debug, Clone)]
pub struct ExponentiatedDistanceKernel {
    distance: DiagramDistance,
    bandwidth: f64,
}

impl ExponentiatedDistanceKernel {
    /// Create the kernel
    pub fn new(distance: DiagramDistance, bandwidth: f64) -> Result<Self> {
        check_bandwidth(bandwidth)?;
        distance.validate()?;
        Ok(Self {
            distance,
            bandwidth,
        })
    }

    /// Sliced Wasserstein kernel
    pub fn sliced_wasserstein(num_directions: usize, bandwidth: f64) -> Result<Self> {
        Self::new(
            DiagramDistance::SlicedWasserstein { num_directions },
            bandwidth,
        )
    }

    /// Exact persistence Fisher kernel
    ///
    /// `bandwidth_fisher` smooths the diagrams into densities, `bandwidth`
    /// scales the distance in the exponential.
    pub fn persistence_fisher(bandwidth_fisher: f64, bandwidth: f64) -> Result<Self> {
        Self::new(
            DiagramDistance::PersistenceFisher {
                bandwidth: bandwidth_fisher,
                approximation: None,
            },
            bandwidth,
        )
    }

    /// Kernel matrix between two collections
    pub fn evaluate_matrix(
        &self,
        x: &[PersistenceDiagram],
        y: Option<&[PersistenceDiagram]>,
    ) -> Result<KernelMatrix> {
        exponentiated_distance_kernel(x, y, &self.distance, self.bandwidth)
    }

    /// Get the bandwidth of the exponential
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Get the underlying distance
    pub fn distance(&self) -> &DiagramDistance {
        &self.distance
    }
}

impl DiagramKernel for ExponentiatedDistanceKernel {
    fn compute(&self, d1: &PersistenceDiagram, d2: &PersistenceDiagram) -> f64 {
        (-self.distance.distance(d1, d2) / self.bandwidth).exp()
    }
}
