//! Kernel matrices between collections of persistence diagrams
//!
//! [`pairwise_diagram_kernels`] selects one of the built-in kernels (or a
//! user function) through [`Metric`] and assembles the full matrix.
//! Distance-based kernels go through the batched distance computation;
//! point-based kernels are evaluated pair by pair on the padded batch.

use crate::core::{KernelError, KernelMatrix, PersistenceDiagram, Result};
use crate::kernel::exponentiated::exponentiated_distance_kernel;
use crate::kernel::scale_space::ScaleSpaceKernel;
use crate::kernel::traits::{batch_points, check_feature_map, DiagramKernel, FeatureMap};
use crate::kernel::weight::Weight;
use crate::kernel::weighted_gaussian::WeightedGaussianKernel;
use crate::metrics::DiagramDistance;
use crate::preprocessing::Padding;
use log::{debug, trace};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// User-supplied kernel between two raw diagrams
pub type DiagramKernelFn =
    Arc<dyn Fn(&PersistenceDiagram, &PersistenceDiagram) -> f64 + Send + Sync>;

/// Kernel selected by the dispatcher
#[derive(Clone)]
pub enum Metric {
    /// exp(-SW(D1, D2) / bandwidth); needs `num_directions` and `bandwidth`
    SlicedWasserstein,
    /// exp(-PF(D1, D2) / bandwidth); needs `bandwidth_fisher` and `bandwidth`
    PersistenceFisher,
    /// Persistence scale space kernel; needs `bandwidth`
    PersistenceScaleSpace,
    /// Persistence weighted Gaussian kernel; needs `bandwidth`
    PersistenceWeightedGaussian,
    /// Arbitrary kernel function, not assumed symmetric
    Custom(DiagramKernelFn),
}

impl Metric {
    /// Wrap a closure as a custom metric
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&PersistenceDiagram, &PersistenceDiagram) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Metric identifier
    pub fn name(&self) -> &'static str {
        match self {
            Self::SlicedWasserstein => "sliced_wasserstein",
            Self::PersistenceFisher => "persistence_fisher",
            Self::PersistenceScaleSpace => "persistence_scale_space",
            Self::PersistenceWeightedGaussian => "persistence_weighted_gaussian",
            Self::Custom(_) => "custom",
        }
    }
}

impl FromStr for Metric {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sliced_wasserstein" => Ok(Self::SlicedWasserstein),
            "persistence_fisher" => Ok(Self::PersistenceFisher),
            "persistence_scale_space" => Ok(Self::PersistenceScaleSpace),
            "persistence_weighted_gaussian" => Ok(Self::PersistenceWeightedGaussian),
            other => Err(KernelError::UnknownMetric(other.to_string())),
        }
    }
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(_) => write!(f, "Custom(<fn>)"),
            other => write!(f, "{}", other.name()),
        }
    }
}

/// Hyperparameters forwarded to the selected kernel
///
/// Each metric looks up only the parameters it needs; a required one that
/// is absent fails with `KernelError::MissingParameter`.
#[derive(Clone, Default)]
pub struct KernelParams {
    /// Gaussian bandwidth (PSS, PWG) or exponent scale (SW, PF)
    pub bandwidth: Option<f64>,
    /// Density smoothing bandwidth of the persistence Fisher distance
    pub bandwidth_fisher: Option<f64>,
    /// Number of sliced Wasserstein directions
    pub num_directions: Option<usize>,
    /// Point weight for PWG; uniform when unset
    pub weight: Option<Weight>,
    /// Feature map replacing the exact Gaussian sums (PSS, PWG, PF)
    pub kernel_approx: Option<Arc<dyn FeatureMap>>,
}

impl KernelParams {
    /// Empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bandwidth
    pub fn with_bandwidth(mut self, bandwidth: f64) -> Self {
        self.bandwidth = Some(bandwidth);
        self
    }

    /// Set the persistence Fisher smoothing bandwidth
    pub fn with_bandwidth_fisher(mut self, bandwidth_fisher: f64) -> Self {
        self.bandwidth_fisher = Some(bandwidth_fisher);
        self
    }

    /// Set the number of sliced Wasserstein directions
    pub fn with_num_directions(mut self, num_directions: usize) -> Self {
        self.num_directions = Some(num_directions);
        self
    }

    /// Set the point weight
    pub fn with_weight(mut self, weight: Weight) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Approximate the Gaussian with a feature map
    pub fn with_kernel_approx(mut self, kernel_approx: Arc<dyn FeatureMap>) -> Self {
        self.kernel_approx = Some(kernel_approx);
        self
    }

    fn bandwidth(&self) -> Result<f64> {
        let value = self.bandwidth.ok_or(KernelError::MissingParameter("bandwidth"))?;
        positive("bandwidth", value)
    }

    fn bandwidth_fisher(&self) -> Result<f64> {
        let value = self
            .bandwidth_fisher
            .ok_or(KernelError::MissingParameter("bandwidth_fisher"))?;
        positive("bandwidth_fisher", value)
    }

    fn num_directions(&self) -> Result<usize> {
        self.num_directions
            .ok_or(KernelError::MissingParameter("num_directions"))
    }
}

impl fmt::Debug for KernelParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelParams")
            .field("bandwidth", &self.bandwidth)
            .field("bandwidth_fisher", &self.bandwidth_fisher)
            .field("num_directions", &self.num_directions)
            .field("weight", &self.weight)
            .field("kernel_approx", &self.kernel_approx.as_ref().map(|m| m.dim()))
            .finish()
    }
}

fn positive(name: &str, value: f64) -> Result<f64> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(KernelError::InvalidParameter(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

/// Custom kernel adapter; evaluated on every pair
struct CustomKernel(DiagramKernelFn);

impl DiagramKernel for CustomKernel {
    fn compute(&self, d1: &PersistenceDiagram, d2: &PersistenceDiagram) -> f64 {
        (self.0)(d1, d2)
    }

    fn is_symmetric(&self) -> bool {
        false
    }
}

/// Kernel matrix between two diagram collections
///
/// With `y = None` the self-kernel matrix of `x` is computed; for the
/// built-in kernels it is symmetric by construction. The result has shape
/// (|x|, |y|), or (|x|, |x|) for a self-kernel.
pub fn pairwise_diagram_kernels(
    x: &[PersistenceDiagram],
    y: Option<&[PersistenceDiagram]>,
    metric: &Metric,
    params: &KernelParams,
) -> Result<KernelMatrix> {
    debug!(
        "Computing {} kernel: {} x {} diagrams",
        metric.name(),
        x.len(),
        y.map_or(x.len(), <[PersistenceDiagram]>::len)
    );

    match metric {
        Metric::SlicedWasserstein => {
            let distance = DiagramDistance::SlicedWasserstein {
                num_directions: params.num_directions()?,
            };
            exponentiated_distance_kernel(x, y, &distance, params.bandwidth()?)
        }
        Metric::PersistenceFisher => {
            let distance = DiagramDistance::PersistenceFisher {
                bandwidth: params.bandwidth_fisher()?,
                approximation: params.kernel_approx.clone(),
            };
            exponentiated_distance_kernel(x, y, &distance, params.bandwidth()?)
        }
        Metric::PersistenceScaleSpace => {
            let mut kernel = ScaleSpaceKernel::new(params.bandwidth()?);
            if let Some(approx) = &params.kernel_approx {
                check_feature_map(approx.as_ref(), &batch_points(x, y))?;
                kernel = kernel.with_approximation(Arc::clone(approx));
            }
            Ok(padded_kernel_matrix(x, y, &kernel))
        }
        Metric::PersistenceWeightedGaussian => {
            let mut kernel = WeightedGaussianKernel::new(params.bandwidth()?)
                .with_weight(params.weight.clone().unwrap_or_default());
            if let Some(approx) = &params.kernel_approx {
                check_feature_map(approx.as_ref(), &batch_points(x, y))?;
                kernel = kernel.with_approximation(Arc::clone(approx));
            }
            Ok(padded_kernel_matrix(x, y, &kernel))
        }
        Metric::Custom(f) => Ok(padded_kernel_matrix(x, y, &CustomKernel(Arc::clone(f)))),
    }
}

/// Elementwise kernel evaluation over the padded batch
///
/// The batch x ++ y is padded once to a common length and split back; each
/// pair is evaluated on the diagrams recovered by stripping the filler rows.
/// Only the point-based kernels build this representation.
fn padded_kernel_matrix<K: DiagramKernel>(
    x: &[PersistenceDiagram],
    y: Option<&[PersistenceDiagram]>,
    kernel: &K,
) -> KernelMatrix {
    let mut batch = x.to_vec();
    if let Some(y) = y {
        batch.extend_from_slice(y);
    }

    let mut padding = Padding::new(true);
    let padded = padding.fit_transform(&batch);
    debug!("Padded {} diagrams to length {}", padded.len(), padding.max_points());

    let raw: Vec<PersistenceDiagram> = padded.iter().map(|p| p.to_diagram()).collect();
    let (rows, cols) = raw.split_at(x.len());

    match y {
        None if kernel.is_symmetric() => KernelMatrix::symmetric_from_fn(rows.len(), |i, j| {
            trace!("Evaluating pair ({i}, {j})");
            kernel.compute(&rows[i], &rows[j])
        }),
        None => KernelMatrix::from_fn(rows.len(), rows.len(), |i, j| {
            kernel.compute(&rows[i], &rows[j])
        }),
        Some(_) => KernelMatrix::from_fn(rows.len(), cols.len(), |i, j| {
            kernel.compute(&rows[i], &cols[j])
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::scale_space::persistence_scale_space_kernel;
    use crate::kernel::weighted_gaussian::persistence_weighted_gaussian_kernel;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn diagrams() -> Vec<PersistenceDiagram> {
        vec![
            PersistenceDiagram::from_pairs(&[(0.0, 1.0), (0.5, 2.0)]),
            PersistenceDiagram::from_pairs(&[(0.2, 1.5)]),
            PersistenceDiagram::from_pairs(&[(0.0, 3.0), (1.0, 1.1), (0.3, 0.9)]),
        ]
    }

    #[test]
    fn test_metric_from_str() {
        assert!(matches!("sliced_wasserstein".parse::<Metric>(), Ok(Metric::SlicedWasserstein)));
        assert!(matches!(
            "persistence_weighted_gaussian".parse::<Metric>(),
            Ok(Metric::PersistenceWeightedGaussian)
        ));
        assert!(matches!(
            "heat".parse::<Metric>(),
            Err(KernelError::UnknownMetric(name)) if name == "heat"
        ));
        assert_eq!(Metric::PersistenceScaleSpace.name(), "persistence_scale_space");
        assert_eq!(format!("{:?}", Metric::custom(|_, _| 0.0)), "Custom(<fn>)");
    }

    #[test]
    fn test_single_point_weighted_gaussian() {
        let x = vec![PersistenceDiagram::from_pairs(&[(0.0, 1.0)])];
        let y = vec![PersistenceDiagram::from_pairs(&[(0.0, 1.0)])];
        let params = KernelParams::new().with_bandwidth(1.0);

        let m = pairwise_diagram_kernels(&x, Some(&y), &Metric::PersistenceWeightedGaussian, &params)
            .unwrap();
        assert_eq!(m.shape(), (1, 1));
        assert_relative_eq!(m.get(0, 0), 1.0 / (2.0 * PI).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_cross_matrix_matches_scalar_kernels() {
        let x = diagrams();
        let y = vec![x[1].clone(), PersistenceDiagram::empty()];
        let params = KernelParams::new().with_bandwidth(0.7);

        let pss = pairwise_diagram_kernels(&x, Some(&y), &Metric::PersistenceScaleSpace, &params)
            .unwrap();
        assert_eq!(pss.shape(), (3, 2));
        assert_relative_eq!(
            pss.get(2, 0),
            persistence_scale_space_kernel(&x[2], &y[0], 0.7, None),
            epsilon = 1e-12
        );
        assert_eq!(pss.get(0, 1), 0.0);

        let pwg = pairwise_diagram_kernels(&x, Some(&y), &Metric::PersistenceWeightedGaussian, &params)
            .unwrap();
        assert_relative_eq!(
            pwg.get(0, 0),
            persistence_weighted_gaussian_kernel(&x[0], &y[0], &Weight::Uniform, 0.7, None),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_self_kernels_are_symmetric() {
        let x = diagrams();
        let params = KernelParams::new()
            .with_bandwidth(1.0)
            .with_bandwidth_fisher(0.5)
            .with_num_directions(8);

        for metric in [
            Metric::SlicedWasserstein,
            Metric::PersistenceFisher,
            Metric::PersistenceScaleSpace,
            Metric::PersistenceWeightedGaussian,
        ] {
            let m = pairwise_diagram_kernels(&x, None, &metric, &params).unwrap();
            assert_eq!(m.shape(), (3, 3), "{}", metric.name());
            assert!(m.is_symmetric(0.0), "{} not symmetric", metric.name());
        }
    }

    #[test]
    fn test_missing_parameters() {
        let x = diagrams();

        let err = pairwise_diagram_kernels(
            &x,
            None,
            &Metric::SlicedWasserstein,
            &KernelParams::new().with_bandwidth(1.0),
        )
        .unwrap_err();
        assert!(matches!(err, KernelError::MissingParameter("num_directions")));

        let err = pairwise_diagram_kernels(
            &x,
            None,
            &Metric::PersistenceFisher,
            &KernelParams::new().with_bandwidth(1.0),
        )
        .unwrap_err();
        assert!(matches!(err, KernelError::MissingParameter("bandwidth_fisher")));

        let err = pairwise_diagram_kernels(&x, None, &Metric::PersistenceScaleSpace, &KernelParams::new())
            .unwrap_err();
        assert!(matches!(err, KernelError::MissingParameter("bandwidth")));
        assert_eq!(err.to_string(), "Missing parameter: bandwidth");
    }

    #[test]
    fn test_invalid_bandwidth() {
        let x = diagrams();
        let params = KernelParams::new().with_bandwidth(0.0);
        assert!(matches!(
            pairwise_diagram_kernels(&x, None, &Metric::PersistenceWeightedGaussian, &params),
            Err(KernelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_custom_kernel_sees_raw_diagrams() {
        let x = diagrams();
        // Counting points exposes any leftover padding rows
        let metric = Metric::custom(|a, b| (a.len() * 10 + b.len()) as f64);

        let m = pairwise_diagram_kernels(&x, None, &metric, &KernelParams::new()).unwrap();
        assert_eq!(m.get(0, 1), 21.0);
        assert_eq!(m.get(1, 0), 12.0);
        assert_eq!(m.get(2, 2), 33.0);
    }

    #[test]
    fn test_weight_and_approx_are_forwarded() {
        let x = diagrams();
        let weight = Weight::arctan(1.0, 1.0);
        let params = KernelParams::new().with_bandwidth(1.0).with_weight(weight.clone());

        let m = pairwise_diagram_kernels(&x, None, &Metric::PersistenceWeightedGaussian, &params)
            .unwrap();
        assert_relative_eq!(
            m.get(0, 2),
            persistence_weighted_gaussian_kernel(&x[0], &x[2], &weight, 1.0, None),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_empty_collection() {
        let params = KernelParams::new().with_bandwidth(1.0);
        let m = pairwise_diagram_kernels(&[], None, &Metric::PersistenceScaleSpace, &params).unwrap();
        assert_eq!(m.shape(), (0, 0));
    }
}
