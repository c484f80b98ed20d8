//! Weight functions for persistence diagram points

use crate::core::Point;
use std::fmt;
use std::sync::Arc;

/// User-supplied point weight
pub type WeightFn = Arc<dyn Fn(&Point) -> f64 + Send + Sync>;

/// Per-point weight used by the weighted Gaussian kernel
///
/// The weight must be finite on every point it is applied to.
#[derive(Clone, Default)]
pub enum Weight {
    /// Constant weight 1
    #[default]
    Uniform,
    /// w(p) = arctan(c * (death - birth)^p), the usual persistence weight
    Arctan { c: f64, p: f64 },
    /// Arbitrary weight function
    Custom(WeightFn),
}

impl Weight {
    /// Wrap a closure as a weight
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Point) -> f64 + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Arctan persistence weight
    pub fn arctan(c: f64, p: f64) -> Self {
        Self::Arctan { c, p }
    }

    /// Evaluate the weight on a point
    pub fn evaluate(&self, point: &Point) -> f64 {
        match self {
            Self::Uniform => 1.0,
            Self::Arctan { c, p } => (c * point.persistence().powf(*p)).atan(),
            Self::Custom(f) => f(point),
        }
    }

    /// Evaluate the weight on every point of a slice
    pub fn evaluate_all(&self, points: &[Point]) -> Vec<f64> {
        points.iter().map(|p| self.evaluate(p)).collect()
    }

    /// Short name for logs and metadata
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Arctan { .. } => "arctan",
            Self::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => write!(f, "Uniform"),
            Self::Arctan { c, p } => f.debug_struct("Arctan").field("c", c).field("p", p).finish(),
            Self::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}
