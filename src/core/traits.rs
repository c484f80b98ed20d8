//! Core traits for persistence diagram kernels

use crate::core::{KernelMatrix, PersistenceDiagram, Result};

/// Fit/transform contract shared by the kernel estimators
///
/// `fit` only records the reference collection; all kernel evaluation
/// happens in `transform`.
pub trait KernelEstimator: Send + Sync {
    /// Store `diagrams` as the reference collection
    fn fit(&mut self, diagrams: &[PersistenceDiagram]) -> &mut Self
    where
        Self: Sized;

    /// Same as `fit`; the labels are accepted and ignored
    fn fit_with_labels(&mut self, diagrams: &[PersistenceDiagram], labels: &[f64]) -> &mut Self
    where
        Self: Sized,
    {
        let _ = labels;
        self.fit(diagrams)
    }

    /// Kernel matrix of shape (|diagrams|, |reference|)
    ///
    /// Fails with `KernelError::NotFitted` if `fit` has not been called.
    fn transform(&self, diagrams: &[PersistenceDiagram]) -> Result<KernelMatrix>;

    /// Fit on `diagrams` and return their self-kernel matrix
    fn fit_transform(&mut self, diagrams: &[PersistenceDiagram]) -> Result<KernelMatrix>
    where
        Self: Sized,
    {
        self.fit(diagrams);
        self.transform(diagrams)
    }

    /// Whether a reference collection is stored
    fn is_fitted(&self) -> bool;

    /// Reference collection stored by the last `fit`
    fn reference(&self) -> Option<&[PersistenceDiagram]>;
}
