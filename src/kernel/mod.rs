//! Kernels between persistence diagrams

pub mod exponentiated;
pub mod pairwise;
pub mod scale_space;
pub mod traits;
pub mod weight;
pub mod weighted_gaussian;

pub use self::exponentiated::*;
pub use self::pairwise::*;
pub use self::scale_space::*;
pub use self::traits::*;
pub use self::weight::*;
pub use self::weighted_gaussian::{persistence_weighted_gaussian_kernel, WeightedGaussianKernel};
