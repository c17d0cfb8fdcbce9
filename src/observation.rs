//! The observation store: a fixed-dimension set of feature vectors.
//!
//! Observations are validated once on construction (non-empty, one shared
//! dimensionality, finite coordinates) and are read-only afterwards, so a
//! single store can be shared by reference across every candidate k of a
//! sweep, including across threads.

use crate::error::{Error, Result};
use std::collections::HashSet;

/// Validated, immutable collection of `n` observations of dimension `d`.
///
/// Storage is row-major and contiguous: observation `i` occupies
/// `data[i * d..(i + 1) * d]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Observations {
    data: Vec<f64>,
    dim: usize,
    len: usize,
}

impl Observations {
    /// Build a store from row vectors.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyInput`] if `rows` is empty or the vectors are zero-length.
    /// - [`Error::DimensionMismatch`] naming the first row whose length differs from row 0.
    /// - [`Error::NonFinite`] naming the first row with a NaN or infinite value.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let first = rows.first().ok_or(Error::EmptyInput)?;
        let dim = first.len();
        if dim == 0 {
            return Err(Error::EmptyInput);
        }

        let mut data = Vec::with_capacity(rows.len() * dim);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != dim {
                return Err(Error::DimensionMismatch {
                    index,
                    expected: dim,
                    found: row.len(),
                });
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(Error::NonFinite { index });
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            data,
            dim,
            len: rows.len(),
        })
    }

    /// Build a store from a flat row-major buffer.
    pub fn from_flat(dim: usize, data: Vec<f64>) -> Result<Self> {
        if dim == 0 || data.is_empty() {
            return Err(Error::EmptyInput);
        }
        if data.len() % dim != 0 {
            let len = data.len() / dim;
            return Err(Error::DimensionMismatch {
                index: len,
                expected: dim,
                found: data.len() % dim,
            });
        }
        if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
            return Err(Error::NonFinite { index: pos / dim });
        }
        let len = data.len() / dim;
        Ok(Self { data, dim, len })
    }

    /// Build a store from feature columns, as produced by column-oriented
    /// (dataframe-style) loaders. Every column must have the same length.
    ///
    /// A column whose length differs from column 0 is reported as a
    /// [`Error::DimensionMismatch`] at the first row it fails to cover.
    pub fn from_columns(columns: &[&[f64]]) -> Result<Self> {
        let first = columns.first().ok_or(Error::EmptyInput)?;
        let len = first.len();
        if len == 0 {
            return Err(Error::EmptyInput);
        }
        let dim = columns.len();

        if let Some(short) = columns.iter().map(|c| c.len()).find(|&n| n != len) {
            let index = short.min(len);
            let found = columns.iter().filter(|c| c.len() > index).count();
            return Err(Error::DimensionMismatch {
                index,
                expected: dim,
                found,
            });
        }

        let rows = (0..len)
            .map(|i| columns.iter().map(|c| c[i]).collect())
            .collect();
        Self::new(rows)
    }

    /// Number of observations.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: an empty store cannot be constructed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Dimensionality shared by every observation.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Observation `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.len()`.
    #[inline]
    pub fn get(&self, i: usize) -> &[f64] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterate observations in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.dim)
    }

    /// The flat row-major buffer.
    pub fn as_flat(&self) -> &[f64] {
        &self.data
    }

    /// Number of pairwise distinct observations (exact bitwise comparison,
    /// with `-0.0` folded onto `0.0`).
    pub fn n_distinct(&self) -> usize {
        let mut seen: HashSet<Vec<u64>> = HashSet::with_capacity(self.len);
        for row in self.iter() {
            let key = row
                .iter()
                .map(|&v| if v == 0.0 { 0u64 } else { v.to_bits() })
                .collect();
            seen.insert(key);
        }
        seen.len()
    }
}
