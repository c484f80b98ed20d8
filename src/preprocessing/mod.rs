//! Diagonal padding of persistence diagram batches
//!
//! Padding brings every diagram of a batch to the same number of rows so the
//! batch can be processed as fixed-size arrays. Each row is
//! `[birth, death, flag]`; genuine points carry flag 1 and the filler rows
//! are the diagonal point (0, 0) with flag 0.

use crate::core::{PersistenceDiagram, Point};

/// Fixed-length (L, 3) representation of a diagram
#[derive(Debug, Clone, PartialEq)]
pub struct PaddedDiagram {
    rows: Vec<[f64; 3]>,
}

impl PaddedDiagram {
    /// Rows `[birth, death, flag]`
    pub fn rows(&self) -> &[[f64; 3]] {
        &self.rows
    }

    /// Padded length L
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of genuine (non-filler) rows
    pub fn n_genuine(&self) -> usize {
        self.rows.iter().filter(|r| r[2] == 1.0).count()
    }

    /// Recover the raw diagram by dropping filler rows
    pub fn to_diagram(&self) -> PersistenceDiagram {
        self.rows
            .iter()
            .filter(|r| r[2] == 1.0)
            .map(|r| Point::new(r[0], r[1]))
            .collect()
    }
}

/// Padding transformer
#[derive(Debug, Clone)]
pub struct Padding {
    use_padding: bool,
    max_points: usize,
}

impl Padding {
    /// Create a padding transformer; with `use_padding = false` diagrams only
    /// gain the flag column
    pub fn new(use_padding: bool) -> Self {
        Self {
            use_padding,
            max_points: 0,
        }
    }

    /// Record the largest diagram size of the batch
    pub fn fit(&mut self, diagrams: &[PersistenceDiagram]) -> &mut Self {
        self.max_points = diagrams.iter().map(PersistenceDiagram::len).max().unwrap_or(0);
        self
    }

    /// Pad every diagram to the fitted length
    ///
    /// Diagrams longer than the fitted length are kept whole.
    pub fn transform(&self, diagrams: &[PersistenceDiagram]) -> Vec<PaddedDiagram> {
        diagrams
            .iter()
            .map(|d| {
                let target = if self.use_padding {
                    self.max_points.max(d.len())
                } else {
                    d.len()
                };
                let mut rows = Vec::with_capacity(target);
                rows.extend(d.points().iter().map(|p| [p.birth, p.death, 1.0]));
                rows.resize(target, [0.0, 0.0, 0.0]);
                PaddedDiagram { rows }
            })
            .collect()
    }

    /// `fit` followed by `transform` on the same batch
    pub fn fit_transform(&mut self, diagrams: &[PersistenceDiagram]) -> Vec<PaddedDiagram> {
        self.fit(diagrams);
        self.transform(diagrams)
    }

    /// Length fitted by the last `fit`
    pub fn max_points(&self) -> usize {
        self.max_points
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self::new(true)
    }
}
