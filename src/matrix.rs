//! Connection Matrices - masks and weights for group-to-group links
//!
//! Matrices are dense, row-major `i32`, shaped `(post, pre)` the same way the
//! substrate lays out connections: one row per destination unit.

use serde::{Deserialize, Serialize};

use crate::error::{AstroError, Result};

/// Dense row-major integer matrix
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionMatrix {
    rows: usize,
    cols: usize,
    data: Vec<i32>,
}

impl ConnectionMatrix {
    /// Build from row-major data; `data.len()` must equal `rows * cols`
    pub fn new(rows: usize, cols: usize, data: Vec<i32>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(AstroError::ShapeMismatch {
                expected: (rows, cols),
                actual: (1, data.len()),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn filled(rows: usize, cols: usize, value: i32) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    pub fn ones(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, 1)
    }

    /// Build from nested rows; all rows must have the same length
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in rows {
            if row.len() != n_cols {
                return Err(AstroError::ShapeMismatch {
                    expected: (n_rows, n_cols),
                    actual: (n_rows, row.len()),
                });
            }
            data.extend(row);
        }
        Self::new(n_rows, n_cols, data)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn data(&self) -> &[i32] {
        &self.data
    }

    /// Row-major entries; the shape cannot change through this
    pub fn data_mut(&mut self) -> &mut [i32] {
        &mut self.data
    }

    /// Multiply every entry by `k`
    pub fn scaled(&self, k: i32) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|v| v * k).collect(),
        }
    }

    /// Number of non-zero entries
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Fail unless the shape is exactly `expected`
    pub fn expect_shape(&self, expected: (usize, usize)) -> Result<()> {
        if self.shape() == expected {
            Ok(())
        } else {
            Err(AstroError::ShapeMismatch {
                expected,
                actual: self.shape(),
            })
        }
    }
}

/// Mask or weight argument: a scalar shorthand or an explicit matrix
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatrixArg {
    Scalar(i32),
    Matrix(ConnectionMatrix),
}

impl From<i32> for MatrixArg {
    fn from(v: i32) -> Self {
        Self::Scalar(v)
    }
}

impl From<ConnectionMatrix> for MatrixArg {
    fn from(m: ConnectionMatrix) -> Self {
        Self::Matrix(m)
    }
}

impl MatrixArg {
    /// Resolve as a mask: any scalar means full connectivity
    pub fn into_mask(self, shape: (usize, usize)) -> Result<ConnectionMatrix> {
        match self {
            Self::Scalar(_) => Ok(ConnectionMatrix::ones(shape.0, shape.1)),
            Self::Matrix(m) => {
                m.expect_shape(shape)?;
                Ok(m)
            }
        }
    }

    /// Resolve as weights: a scalar broadcasts over an all-ones matrix
    pub fn into_weights(self, shape: (usize, usize)) -> Result<ConnectionMatrix> {
        match self {
            Self::Scalar(w) => Ok(ConnectionMatrix::filled(shape.0, shape.1, w)),
            Self::Matrix(m) => {
                m.expect_shape(shape)?;
                Ok(m)
            }
        }
    }
}
