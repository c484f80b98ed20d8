//! Random Fourier features for the Gaussian point kernel
//!
//! By Bochner's theorem the Gaussian kernel exp(-‖x - y‖² / (2σ²)) is the
//! expectation of cos(ωᵀ(x - y)) for ω ~ N(0, σ⁻² I). Sampling n frequencies
//! and mapping
//!
//! φ(x) = √(1/n) [cos(ω₁ᵀx), sin(ω₁ᵀx), ..., cos(ωₙᵀx), sin(ωₙᵀx)]
//!
//! gives ⟨φ(x), φ(y)⟩ = (1/n) Σₖ cos(ωₖᵀ(x - y)), which converges to the
//! kernel as n grows.
//!
//! Reference: Rahimi, Recht. "Random Features for Large-Scale Kernel
//! Machines", NIPS 2007.

use crate::core::{KernelError, Point, Result};
use crate::kernel::FeatureMap;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Default seed when none is given
pub const DEFAULT_SEED: u64 = 42;

/// Random Fourier feature map for the Gaussian kernel of a given bandwidth
#[derive(Debug, Clone)]
pub struct RandomFourierFeatures {
    /// Sampled frequencies (ω_birth, ω_death)
    frequencies: Vec<(f64, f64)>,
    bandwidth: f64,
}

impl RandomFourierFeatures {
    /// Sample `n_components` frequencies for bandwidth σ
    pub fn new(bandwidth: f64, n_components: usize, seed: u64) -> Result<Self> {
        if bandwidth <= 0.0 || !bandwidth.is_finite() {
            return Err(KernelError::InvalidParameter(format!(
                "bandwidth must be positive, got {bandwidth}"
            )));
        }
        if n_components == 0 {
            return Err(KernelError::InvalidParameter(
                "n_components must be positive".to_string(),
            ));
        }

        let normal = Normal::new(0.0, 1.0 / bandwidth)
            .map_err(|e| KernelError::InvalidParameter(e.to_string()))?;
        let mut rng = StdRng::seed_from_u64(seed);

        let frequencies = (0..n_components)
            .map(|_| (normal.sample(&mut rng), normal.sample(&mut rng)))
            .collect();

        log::debug!(
            "Sampled {n_components} random Fourier frequencies for bandwidth {bandwidth} (seed {seed})"
        );

        Ok(Self {
            frequencies,
            bandwidth,
        })
    }

    /// Same as `new` with the default seed
    pub fn with_default_seed(bandwidth: f64, n_components: usize) -> Result<Self> {
        Self::new(bandwidth, n_components, DEFAULT_SEED)
    }

    /// Number of sampled frequencies
    pub fn n_components(&self) -> usize {
        self.frequencies.len()
    }

    /// Bandwidth of the approximated Gaussian
    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Feature vector of a single point
    pub fn transform_point(&self, p: &Point) -> Vec<f64> {
        let scale = (1.0 / self.frequencies.len() as f64).sqrt();
        let mut row = Vec::with_capacity(2 * self.frequencies.len());
        for &(wb, wd) in &self.frequencies {
            let proj = p.dot(wb, wd);
            row.push(proj.cos() * scale);
            row.push(proj.sin() * scale);
        }
        row
    }
}

impl FeatureMap for RandomFourierFeatures {
    fn features(&self, points: &[Point]) -> Vec<Vec<f64>> {
        points.iter().map(|p| self.transform_point(p)).collect()
    }

    fn dim(&self) -> usize {
        2 * self.frequencies.len()
    }
}
