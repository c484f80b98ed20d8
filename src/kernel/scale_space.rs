//! Persistence scale space kernel
//!
//! Each diagram is symmetrised across the diagonal: mirrored points get
//! weight -1, original points +1. The kernel is then half the weighted
//! Gaussian kernel between the symmetrised diagrams.
//!
//! Reference: Reininghaus, Huber, Bauer, Kwitt. "A stable multi-scale kernel
//! for topological machine learning", CVPR 2015.

use crate::core::{PersistenceDiagram, Point};
use crate::kernel::traits::{DiagramKernel, FeatureMap};
use crate::kernel::weight::Weight;
use crate::kernel::weighted_gaussian::persistence_weighted_gaussian_kernel;
use std::sync::Arc;

/// +1 on or above the diagonal, -1 below it
fn scale_space_weight(p: &Point) -> f64 {
    if p.death >= p.birth {
        1.0
    } else {
        -1.0
    }
}

/// D ∪ mirror(D)
fn symmetrize(d: &PersistenceDiagram) -> PersistenceDiagram {
    d.union(&d.mirrored())
}

/// Persistence scale space kernel value between two diagrams
pub fn persistence_scale_space_kernel(
    d1: &PersistenceDiagram,
    d2: &PersistenceDiagram,
    bandwidth: f64,
    approximation: Option<&dyn FeatureMap>,
) -> f64 {
    let weight = Weight::custom(scale_space_weight);
    0.5 * persistence_weighted_gaussian_kernel(
        &symmetrize(d1),
        &symmetrize(d2),
        &weight,
        bandwidth,
        approximation,
    )
}

/// Persistence scale space kernel with fixed hyperparameters
#[derive(Debug, Clone)]
pub struct ScaleSpaceKernel {
    bandwidth: f64,
    approximation: Option<Arc<dyn FeatureMap>>,
}

impl ScaleSpaceKernel {
    /// Create a kernel with exact evaluation
    ///
    /// # Panics
    /// Panics if bandwidth is not positive
    pub fn new(bandwidth: f64) -> Self {
        assert!(
            bandwidth > 0.0,
            "Bandwidth must be positive, got: {}",
            bandwidth
        );
        Self {
            bandwidth,
            approximation: None,
        }
    }

    /// Use a feature map instead of the exact double sum
    pub fn with_approximation(mut self, approximation: Arc<dyn FeatureMap>) -> Self {
        self.approximation = Some(approximation);
        self
    }

    /// Get the bandwidth
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }
}

impl Default for ScaleSpaceKernel {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl DiagramKernel for ScaleSpaceKernel {
    fn compute(&self, d1: &PersistenceDiagram, d2: &PersistenceDiagram) -> f64 {
        persistence_scale_space_kernel(d1, d2, self.bandwidth, self.approximation.as_deref())
    }
}
