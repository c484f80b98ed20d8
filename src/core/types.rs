//! Core type definitions for persistence diagrams and kernel matrices

use serde::{Deserialize, Serialize};

/// A point (birth, death) of a persistence diagram
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    /// Birth coordinate
    pub birth: f64,
    /// Death coordinate
    pub death: f64,
}

impl Point {
    /// Create a new point
    pub fn new(birth: f64, death: f64) -> Self {
        Self { birth, death }
    }

    /// Point with both coordinates swapped (reflection across the diagonal)
    pub fn mirrored(&self) -> Self {
        Self {
            birth: self.death,
            death: self.birth,
        }
    }

    /// Orthogonal projection onto the diagonal birth = death
    pub fn diagonal_projection(&self) -> Self {
        let mid = 0.5 * (self.birth + self.death);
        Self {
            birth: mid,
            death: mid,
        }
    }

    /// Lifetime of the feature (death - birth)
    pub fn persistence(&self) -> f64 {
        self.death - self.birth
    }

    /// A point is valid iff both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.birth.is_finite() && self.death.is_finite()
    }

    /// Squared Euclidean distance to another point
    pub fn squared_distance(&self, other: &Point) -> f64 {
        let db = self.birth - other.birth;
        let dd = self.death - other.death;
        db * db + dd * dd
    }

    /// Dot product with a direction vector (x, y)
    pub fn dot(&self, x: f64, y: f64) -> f64 {
        self.birth * x + self.death * y
    }
}

impl From<[f64; 2]> for Point {
    fn from(coords: [f64; 2]) -> Self {
        Self::new(coords[0], coords[1])
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.birth, p.death]
    }
}

impl From<(f64, f64)> for Point {
    fn from((birth, death): (f64, f64)) -> Self {
        Self::new(birth, death)
    }
}

/// Finite persistence diagram: an ordered sequence of points
///
/// Diagrams passed to the kernels must not contain essential points
/// (infinite coordinates). This is not checked by the kernels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistenceDiagram {
    points: Vec<Point>,
}

impl PersistenceDiagram {
    /// Create a diagram from points
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Create an empty diagram
    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Build a diagram from (birth, death) pairs
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self::new(pairs.iter().map(|&p| Point::from(p)).collect())
    }

    /// Points of the diagram
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the diagram has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Diagram with every point reflected across the diagonal
    pub fn mirrored(&self) -> Self {
        Self::new(self.points.iter().map(Point::mirrored).collect())
    }

    /// Diagram of the diagonal projections of every point
    pub fn diagonal_projections(&self) -> Self {
        Self::new(self.points.iter().map(Point::diagonal_projection).collect())
    }

    /// Concatenation of two diagrams, `self` first
    pub fn union(&self, other: &PersistenceDiagram) -> Self {
        let mut points = Vec::with_capacity(self.len() + other.len());
        points.extend_from_slice(&self.points);
        points.extend_from_slice(&other.points);
        Self::new(points)
    }

    /// True iff no point has an infinite or NaN coordinate
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(Point::is_finite)
    }

    /// Largest death - birth over the diagram (0 for empty diagrams)
    pub fn max_persistence(&self) -> f64 {
        self.points
            .iter()
            .map(Point::persistence)
            .fold(0.0, f64::max)
    }
}

impl From<Vec<Point>> for PersistenceDiagram {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Point> for PersistenceDiagram {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Dense row-major kernel (Gram) matrix
///
/// Entry (i, j) holds the kernel value between diagram i of the first
/// collection and diagram j of the second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl KernelMatrix {
    /// Create a zero-filled matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    /// Create a matrix from row-major values
    ///
    /// # Panics
    /// Panics if `values.len() != rows * cols`
    pub fn from_vec(rows: usize, cols: usize, values: Vec<f64>) -> Self {
        assert_eq!(
            values.len(),
            rows * cols,
            "Matrix values must have rows * cols elements"
        );
        Self { rows, cols, values }
    }

    /// Build a matrix by evaluating `f(i, j)` for every entry
    pub fn from_fn<F: FnMut(usize, usize) -> f64>(rows: usize, cols: usize, mut f: F) -> Self {
        let mut values = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                values.push(f(i, j));
            }
        }
        Self { rows, cols, values }
    }

    /// Build a symmetric n x n matrix, evaluating `f(i, j)` only for i <= j
    pub fn symmetric_from_fn<F: FnMut(usize, usize) -> f64>(n: usize, mut f: F) -> Self {
        let mut matrix = Self::zeros(n, n);
        for i in 0..n {
            for j in i..n {
                let value = f(i, j);
                matrix.set(i, j, value);
                matrix.set(j, i, value);
            }
        }
        matrix
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Get entry (i, j)
    ///
    /// # Panics
    /// Panics if the index is out of bounds
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.rows && j < self.cols, "Matrix index out of bounds");
        self.values[i * self.cols + j]
    }

    /// Set entry (i, j)
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        assert!(i < self.rows && j < self.cols, "Matrix index out of bounds");
        self.values[i * self.cols + j] = value;
    }

    /// Row i as a slice
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.cols..(i + 1) * self.cols]
    }

    /// All values in row-major order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Apply `f` to every entry
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Check whether the matrix is square and symmetric within `tolerance`
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        if self.rows != self.cols {
            return false;
        }
        (0..self.rows).all(|i| {
            (i + 1..self.cols).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tolerance)
        })
    }

    /// Convert to nested rows
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|i| self.row(i).to_vec()).collect()
    }
}
