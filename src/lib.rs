//! Kernels between persistence diagrams
//!
//! Gram matrices for collections of persistence diagrams under the sliced
//! Wasserstein, persistence Fisher, persistence scale space and persistence
//! weighted Gaussian kernels, with an optional random Fourier feature
//! approximation of the underlying Gaussian.
//!
//! ```
//! use pdkernel::{KernelEstimator, PersistenceDiagram, SlicedWassersteinKernel};
//!
//! let diagrams = vec![
//!     PersistenceDiagram::from_pairs(&[(0.0, 1.0), (0.5, 2.0)]),
//!     PersistenceDiagram::from_pairs(&[(0.2, 1.5)]),
//! ];
//!
//! let mut kernel = SlicedWassersteinKernel::new().with_num_directions(20);
//! let gram = kernel.fit(&diagrams).transform(&diagrams).unwrap();
//! assert_eq!(gram.shape(), (2, 2));
//! assert_eq!(gram.get(0, 0), 1.0);
//! ```

pub mod api;
pub mod approx;
pub mod core;
pub mod data;
pub mod kernel;
pub mod metrics;
pub mod persistence;
pub mod preprocessing;
pub mod utils;

// Re-export main types for convenience
pub use crate::api::{
    PersistenceFisherKernel, PersistenceScaleSpaceKernel, PersistenceWeightedGaussianKernel,
    SlicedWassersteinKernel,
};
pub use crate::approx::RandomFourierFeatures;
pub use crate::core::error::{KernelError, Result};
pub use crate::core::traits::*;
pub use crate::core::types::*;
pub use crate::data::DiagramCollection;
pub use crate::kernel::{pairwise_diagram_kernels, DiagramKernel, FeatureMap, KernelParams, Metric, Weight};
pub use crate::metrics::{pairwise_diagram_distances, DiagramDistance};
pub use crate::utils::DiagramCollectionStats;

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
