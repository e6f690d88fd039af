use std::io::{Read, Write};
use std::path::Path;

use crate::{
    db::snapshot,
    error::{AppError, AppResult},
};

/// Dense square matrix of pairwise similarity scores
///
/// Stored row-major. Row `i` holds the score of every catalog entry against
/// entry `i`; no symmetry is assumed.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    dimension: usize,
    scores: Vec<f64>,
}

impl SimilarityIndex {
    /// Builds an index from rows, rejecting ragged or non-square input
    pub fn from_rows(rows: Vec<Vec<f64>>) -> AppResult<Self> {
        let dimension = rows.len();
        let mut scores = Vec::with_capacity(dimension * dimension);

        for row in rows {
            if row.len() != dimension {
                return Err(AppError::Dimension {
                    expected: dimension,
                    actual: row.len(),
                });
            }
            scores.extend(row);
        }

        Ok(Self { dimension, scores })
    }

    /// Loads a matrix snapshot from disk, compressed or not
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let reader = snapshot::open_snapshot(path)?;
        let index = Self::from_reader(reader).map_err(|e| match e {
            AppError::Load(msg) => snapshot::load_error(path, msg),
            other => other,
        })?;

        tracing::info!(
            path = %path.display(),
            dimension = index.dimension(),
            "Loaded similarity matrix"
        );

        Ok(index)
    }

    /// Deserializes a JSON array of rows from any reader
    pub fn from_reader(reader: impl Read) -> AppResult<Self> {
        let rows: Vec<Vec<f64>> = serde_json::from_reader(reader)
            .map_err(|e| AppError::Load(format!("Invalid similarity matrix: {}", e)))?;
        Self::from_rows(rows)
    }

    /// Serializes the matrix as a JSON array of rows
    pub fn write_snapshot(&self, mut writer: impl Write) -> AppResult<()> {
        let rows: Vec<&[f64]> = self.rows().collect();
        serde_json::to_writer(&mut writer, &rows)
            .map_err(|e| AppError::Internal(format!("Matrix serialization error: {}", e)))
    }

    /// Scores of every entry against `index`, in catalog row order
    pub fn row(&self, index: usize) -> AppResult<&[f64]> {
        if index >= self.dimension {
            return Err(AppError::IndexOutOfRange {
                index,
                len: self.dimension,
            });
        }

        let start = index * self.dimension;
        Ok(&self.scores[start..start + self.dimension])
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks() panics on a zero size
        self.scores.chunks(self.dimension.max(1))
    }
}
