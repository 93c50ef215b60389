//! Square matrices: similarity (`M`) and its dissimilarity (`1 − M`).

use serde::{Deserialize, Serialize};

use crate::constants::MATRIX_TOLERANCE;

/// Dense, row-major N×N matrix of `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquareMatrix {
    n: usize,
    data: Vec<f64>,
}

impl SquareMatrix {
    /// Build from row-major data. Returns `None` unless `data.len() == n * n`.
    pub fn new(n: usize, data: Vec<f64>) -> Option<Self> {
        if data.len() != n * n {
            return None;
        }
        Some(Self { n, data })
    }

    /// Build from a list of rows. Returns `None` if any row is not length N.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Option<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return None;
            }
            data.extend(row);
        }
        Some(Self { n, data })
    }

    /// N×N matrix with `value` everywhere off the diagonal and `diagonal` on it.
    pub fn filled(n: usize, value: f64, diagonal: f64) -> Self {
        let mut data = vec![value; n * n];
        for i in 0..n {
            data[i * n + i] = diagonal;
        }
        Self { n, data }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n + j] = value;
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.n.max(1)).take(self.n)
    }

    /// Largest |M[i][j] − M[j][i]| over all pairs.
    pub fn max_asymmetry(&self) -> f64 {
        let mut worst = 0.0f64;
        for i in 0..self.n {
            for j in (i + 1)..self.n {
                worst = worst.max((self.get(i, j) - self.get(j, i)).abs());
            }
        }
        worst
    }

    fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            n: self.n,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

/// Symmetric similarity matrix with entries in [0, 1].
///
/// The diagonal holds self-similarity and is never used for decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMatrix(SquareMatrix);

impl SimilarityMatrix {
    /// Validate and wrap a square matrix.
    ///
    /// Rejects non-finite entries, entries outside [0, 1], and asymmetric
    /// matrices (beyond a small tolerance).
    pub fn new(matrix: SquareMatrix) -> Result<Self, String> {
        if let Some(bad) = matrix.data.iter().find(|v| !v.is_finite()) {
            return Err(format!("non-finite similarity entry {bad}"));
        }
        if let Some(bad) = matrix
            .data
            .iter()
            .find(|&&v| v < -MATRIX_TOLERANCE || v > 1.0 + MATRIX_TOLERANCE)
        {
            return Err(format!("similarity entry {bad} outside [0, 1]"));
        }
        let asymmetry = matrix.max_asymmetry();
        if asymmetry > MATRIX_TOLERANCE {
            return Err(format!("similarity matrix is not symmetric (max delta {asymmetry})"));
        }
        Ok(Self(matrix))
    }

    /// Validate a list of rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, String> {
        let matrix = SquareMatrix::from_rows(rows).ok_or("similarity rows are not square")?;
        Self::new(matrix)
    }

    /// N×N matrix with constant off-diagonal similarity and a unit diagonal.
    pub fn constant(n: usize, value: f64) -> Result<Self, String> {
        Self::new(SquareMatrix::filled(n, value, 1.0))
    }

    pub fn size(&self) -> usize {
        self.0.size()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.0.get(i, j)
    }

    pub fn as_matrix(&self) -> &SquareMatrix {
        &self.0
    }

    /// `D = 1 − M`.
    pub fn dissimilarity(&self) -> DistanceMatrix {
        DistanceMatrix(self.0.map(|v| (1.0 - v).clamp(0.0, 1.0)))
    }
}

/// Dissimilarity matrix `1 − M`, entries in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrix(SquareMatrix);

impl DistanceMatrix {
    pub fn size(&self) -> usize {
        self.0.size()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.0.get(i, j)
    }

    pub fn row(&self, i: usize) -> &[f64] {
        self.0.row(i)
    }

    pub fn as_matrix(&self) -> &SquareMatrix {
        &self.0
    }
}
