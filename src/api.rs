//! Kernel estimators for persistence diagrams
//!
//! Each estimator fixes one kernel and its hyperparameters at construction
//! time. `fit` stores a reference collection; `transform` returns the kernel
//! matrix between new diagrams and that reference.
//!
//! # Quick Start
//!
//! ```rust
//! use pdkernel::api::SlicedWassersteinKernel;
//! use pdkernel::{KernelEstimator, PersistenceDiagram};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let train = vec![
//!     PersistenceDiagram::from_pairs(&[(0.0, 1.0), (0.2, 0.8)]),
//!     PersistenceDiagram::from_pairs(&[(0.1, 2.0)]),
//! ];
//! let test = vec![PersistenceDiagram::from_pairs(&[(0.0, 1.1)])];
//!
//! let mut kernel = SlicedWassersteinKernel::new().with_num_directions(20);
//! kernel.fit(&train);
//! let gram = kernel.transform(&test)?;
//! assert_eq!(gram.shape(), (1, 2));
//! # Ok(())
//! # }
//! ```

use crate::core::{KernelError, KernelEstimator, KernelMatrix, PersistenceDiagram, Result};
use crate::kernel::{pairwise_diagram_kernels, FeatureMap, KernelParams, Metric, Weight};
use log::info;
use std::sync::Arc;

/// Shared `transform` body: kernel between `query` rows and reference columns
fn transform_against(
    reference: Option<&[PersistenceDiagram]>,
    query: &[PersistenceDiagram],
    metric: &Metric,
    params: &KernelParams,
) -> Result<KernelMatrix> {
    let reference = reference.ok_or(KernelError::NotFitted)?;
    pairwise_diagram_kernels(query, Some(reference), metric, params)
}

fn log_fit(name: &str, diagrams: &[PersistenceDiagram]) {
    info!("Fitted {name} kernel on {} diagrams", diagrams.len());
}

/// Sliced Wasserstein kernel: exp(-SW(D1, D2) / bandwidth)
#[derive(Debug, Clone)]
pub struct SlicedWassersteinKernel {
    num_directions: usize,
    bandwidth: f64,
    diagrams: Option<Vec<PersistenceDiagram>>,
}

impl SlicedWassersteinKernel {
    /// 10 directions, bandwidth 1
    pub fn new() -> Self {
        Self {
            num_directions: 10,
            bandwidth: 1.0,
            diagrams: None,
        }
    }

    /// Number of lines sampled in [-π/2, π/2)
    pub fn with_num_directions(mut self, num_directions: usize) -> Self {
        self.num_directions = num_directions;
        self
    }

    /// Bandwidth of the exponential
    pub fn with_bandwidth(mut self, bandwidth: f64) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    pub fn num_directions(&self) -> usize {
        self.num_directions
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    fn params(&self) -> KernelParams {
        KernelParams::new()
            .with_num_directions(self.num_directions)
            .with_bandwidth(self.bandwidth)
    }
}

impl Default for SlicedWassersteinKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl KernelEstimator for SlicedWassersteinKernel {
    fn fit(&mut self, diagrams: &[PersistenceDiagram]) -> &mut Self {
        log_fit("sliced Wasserstein", diagrams);
        self.diagrams = Some(diagrams.to_vec());
        self
    }

    fn transform(&self, diagrams: &[PersistenceDiagram]) -> Result<KernelMatrix> {
        transform_against(
            self.reference(),
            diagrams,
            &Metric::SlicedWasserstein,
            &self.params(),
        )
    }

    fn is_fitted(&self) -> bool {
        self.diagrams.is_some()
    }

    fn reference(&self) -> Option<&[PersistenceDiagram]> {
        self.diagrams.as_deref()
    }
}

/// Persistence weighted Gaussian kernel
#[derive(Debug, Clone)]
pub struct PersistenceWeightedGaussianKernel {
    bandwidth: f64,
    weight: Weight,
    kernel_approx: Option<Arc<dyn FeatureMap>>,
    diagrams: Option<Vec<PersistenceDiagram>>,
}

impl PersistenceWeightedGaussianKernel {
    /// Bandwidth 1, uniform weight, exact evaluation
    pub fn new() -> Self {
        Self {
            bandwidth: 1.0,
            weight: Weight::Uniform,
            kernel_approx: None,
            diagrams: None,
        }
    }

    /// Bandwidth of the Gaussian convolution
    pub fn with_bandwidth(mut self, bandwidth: f64) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    /// Weight of the diagram points
    pub fn with_weight(mut self, weight: Weight) -> Self {
        self.weight = weight;
        self
    }

    /// Feature map used instead of the exact double sum
    pub fn with_kernel_approx(mut self, kernel_approx: Arc<dyn FeatureMap>) -> Self {
        self.kernel_approx = Some(kernel_approx);
        self
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn weight(&self) -> &Weight {
        &self.weight
    }

    fn params(&self) -> KernelParams {
        let params = KernelParams::new()
            .with_bandwidth(self.bandwidth)
            .with_weight(self.weight.clone());
        match &self.kernel_approx {
            Some(approx) => params.with_kernel_approx(Arc::clone(approx)),
            None => params,
        }
    }
}

impl Default for PersistenceWeightedGaussianKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl KernelEstimator for PersistenceWeightedGaussianKernel {
    fn fit(&mut self, diagrams: &[PersistenceDiagram]) -> &mut Self {
        log_fit("persistence weighted Gaussian", diagrams);
        self.diagrams = Some(diagrams.to_vec());
        self
    }

    fn transform(&self, diagrams: &[PersistenceDiagram]) -> Result<KernelMatrix> {
        transform_against(
            self.reference(),
            diagrams,
            &Metric::PersistenceWeightedGaussian,
            &self.params(),
        )
    }

    fn is_fitted(&self) -> bool {
        self.diagrams.is_some()
    }

    fn reference(&self) -> Option<&[PersistenceDiagram]> {
        self.diagrams.as_deref()
    }
}

/// Persistence scale space kernel
#[derive(Debug, Clone)]
pub struct PersistenceScaleSpaceKernel {
    bandwidth: f64,
    kernel_approx: Option<Arc<dyn FeatureMap>>,
    diagrams: Option<Vec<PersistenceDiagram>>,
}

impl PersistenceScaleSpaceKernel {
    /// Bandwidth 1, exact evaluation
    pub fn new() -> Self {
        Self {
            bandwidth: 1.0,
            kernel_approx: None,
            diagrams: None,
        }
    }

    /// Bandwidth of the Gaussian convolution
    pub fn with_bandwidth(mut self, bandwidth: f64) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    /// Feature map used instead of the exact double sum
    pub fn with_kernel_approx(mut self, kernel_approx: Arc<dyn FeatureMap>) -> Self {
        self.kernel_approx = Some(kernel_approx);
        self
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    fn params(&self) -> KernelParams {
        let params = KernelParams::new().with_bandwidth(self.bandwidth);
        match &self.kernel_approx {
            Some(approx) => params.with_kernel_approx(Arc::clone(approx)),
            None => params,
        }
    }
}

impl Default for PersistenceScaleSpaceKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl KernelEstimator for PersistenceScaleSpaceKernel {
    fn fit(&mut self, diagrams: &[PersistenceDiagram]) -> &mut Self {
        log_fit("persistence scale space", diagrams);
        self.diagrams = Some(diagrams.to_vec());
        self
    }

    fn transform(&self, diagrams: &[PersistenceDiagram]) -> Result<KernelMatrix> {
        transform_against(
            self.reference(),
            diagrams,
            &Metric::PersistenceScaleSpace,
            &self.params(),
        )
    }

    fn is_fitted(&self) -> bool {
        self.diagrams.is_some()
    }

    fn reference(&self) -> Option<&[PersistenceDiagram]> {
        self.diagrams.as_deref()
    }
}

/// Persistence Fisher kernel: exp(-PF(D1, D2) / bandwidth)
#[derive(Debug, Clone)]
pub struct PersistenceFisherKernel {
    bandwidth_fisher: f64,
    bandwidth: f64,
    kernel_approx: Option<Arc<dyn FeatureMap>>,
    diagrams: Option<Vec<PersistenceDiagram>>,
}

impl PersistenceFisherKernel {
    /// Both bandwidths 1, exact evaluation
    pub fn new() -> Self {
        Self {
            bandwidth_fisher: 1.0,
            bandwidth: 1.0,
            kernel_approx: None,
            diagrams: None,
        }
    }

    /// Bandwidth used to smooth diagrams into densities
    pub fn with_bandwidth_fisher(mut self, bandwidth_fisher: f64) -> Self {
        self.bandwidth_fisher = bandwidth_fisher;
        self
    }

    /// Bandwidth of the exponential
    pub fn with_bandwidth(mut self, bandwidth: f64) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    /// Feature map used to approximate the smoothed densities
    pub fn with_kernel_approx(mut self, kernel_approx: Arc<dyn FeatureMap>) -> Self {
        self.kernel_approx = Some(kernel_approx);
        self
    }

    pub fn bandwidth_fisher(&self) -> f64 {
        self.bandwidth_fisher
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    fn params(&self) -> KernelParams {
        let params = KernelParams::new()
            .with_bandwidth_fisher(self.bandwidth_fisher)
            .with_bandwidth(self.bandwidth);
        match &self.kernel_approx {
            Some(approx) => params.with_kernel_approx(Arc::clone(approx)),
            None => params,
        }
    }
}

impl Default for PersistenceFisherKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl KernelEstimator for PersistenceFisherKernel {
    fn fit(&mut self, diagrams: &[PersistenceDiagram]) -> &mut Self {
        log_fit("persistence Fisher", diagrams);
        self.diagrams = Some(diagrams.to_vec());
        self
    }

    fn transform(&self, diagrams: &[PersistenceDiagram]) -> Result<KernelMatrix> {
        transform_against(
            self.reference(),
            diagrams,
            &Metric::PersistenceFisher,
            &self.params(),
        )
    }

    fn is_fitted(&self) -> bool {
        self.diagrams.is_some()
    }

    fn reference(&self) -> Option<&[PersistenceDiagram]> {
        self.diagrams.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approx::RandomFourierFeatures;
    use approx::assert_relative_eq;

    fn references() -> Vec<PersistenceDiagram> {
        vec![
            PersistenceDiagram::from_pairs(&[(0.0, 1.0), (0.5, 2.0)]),
            PersistenceDiagram::from_pairs(&[(0.2, 1.5)]),
            PersistenceDiagram::from_pairs(&[(0.0, 3.0), (1.0, 1.1)]),
        ]
    }

    fn queries() -> Vec<PersistenceDiagram> {
        vec![
            PersistenceDiagram::from_pairs(&[(0.1, 1.2)]),
            PersistenceDiagram::from_pairs(&[(0.0, 2.5), (0.4, 0.6)]),
        ]
    }

    #[test]
    fn test_defaults() {
        let sw = SlicedWassersteinKernel::default();
        assert_eq!(sw.num_directions(), 10);
        assert_eq!(sw.bandwidth(), 1.0);

        let pwg = PersistenceWeightedGaussianKernel::default();
        assert_eq!(pwg.bandwidth(), 1.0);
        assert!(matches!(pwg.weight(), Weight::Uniform));

        assert_eq!(PersistenceScaleSpaceKernel::default().bandwidth(), 1.0);

        let pf = PersistenceFisherKernel::default();
        assert_eq!(pf.bandwidth_fisher(), 1.0);
        assert_eq!(pf.bandwidth(), 1.0);
    }

    #[test]
    fn test_transform_before_fit() {
        let kernel = SlicedWassersteinKernel::new();
        assert!(!kernel.is_fitted());
        assert!(matches!(kernel.transform(&queries()), Err(KernelError::NotFitted)));

        assert!(matches!(
            PersistenceFisherKernel::new().transform(&queries()),
            Err(KernelError::NotFitted)
        ));
    }

    #[test]
    fn test_transform_shape() {
        let mut kernel = PersistenceScaleSpaceKernel::new().with_bandwidth(0.5);
        kernel.fit(&references());
        assert!(kernel.is_fitted());
        assert_eq!(kernel.reference().map(<[_]>::len), Some(3));

        let gram = kernel.transform(&queries()).unwrap();
        assert_eq!(gram.shape(), (2, 3));
    }

    #[test]
    fn test_fit_transform_is_symmetric() {
        let mut kernel = PersistenceWeightedGaussianKernel::new().with_weight(Weight::arctan(1.0, 1.0));
        let gram = kernel.fit_transform(&references()).unwrap();
        assert_eq!(gram.shape(), (3, 3));
        assert!(gram.is_symmetric(1e-12));
    }

    #[test]
    fn test_labels_are_ignored() {
        let mut with_labels = SlicedWassersteinKernel::new();
        with_labels.fit_with_labels(&references(), &[1.0, -1.0, 1.0]);

        let mut without = SlicedWassersteinKernel::new();
        without.fit(&references());

        assert_eq!(
            with_labels.transform(&queries()).unwrap(),
            without.transform(&queries()).unwrap()
        );
    }

    #[test]
    fn test_refit_replaces_reference() {
        let mut kernel = PersistenceFisherKernel::new().with_bandwidth_fisher(0.5);
        kernel.fit(&references());
        kernel.fit(&queries());
        assert_eq!(kernel.transform(&references()).unwrap().shape(), (3, 2));
    }

    #[test]
    fn test_fisher_identical_diagram_is_one() {
        let mut kernel = PersistenceFisherKernel::new();
        kernel.fit(&references());
        let gram = kernel.transform(&references()[..1]).unwrap();
        assert_eq!(gram.get(0, 0), 1.0);
        assert!(gram.values().iter().all(|&v| v > 0.0 && v <= 1.0));
    }

    #[test]
    fn test_approximate_estimator_close_to_exact() {
        let rff = RandomFourierFeatures::new(1.0, 20_000, 3).unwrap();
        let mut exact = PersistenceWeightedGaussianKernel::new();
        let mut approx = PersistenceWeightedGaussianKernel::new().with_kernel_approx(Arc::new(rff));

        exact.fit(&references());
        approx.fit(&references());
        let a = exact.transform(&queries()).unwrap();
        let b = approx.transform(&queries()).unwrap();

        for (x, y) in a.values().iter().zip(b.values()) {
            assert_relative_eq!(*x, *y, epsilon = 0.05);
        }
    }
}
