use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::CatalogEntry,
    services::{catalog::CatalogStore, similarity::SimilarityIndex},
};

pub const DEFAULT_RECOMMENDATION_COUNT: usize = 5;

/// Tuning knobs for the ranking step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommenderOptions {
    /// When true the top-ranked candidate is dropped on the assumption that it
    /// is the queried movie itself. When false the queried movie is filtered
    /// out by row index and the first `k` remaining candidates are kept.
    pub exclude_self_by_position: bool,
}

impl Default for RecommenderOptions {
    fn default() -> Self {
        Self {
            exclude_self_by_position: true,
        }
    }
}

/// A recommended catalog entry with the score that ranked it
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEntry {
    pub entry: CatalogEntry,
    pub score: f64,
}

/// Nearest-neighbour lookup over the precomputed similarity matrix
///
/// Holds only read-only state, so a single instance can be shared across
/// request handlers without locking.
#[derive(Debug, Clone)]
pub struct Recommender {
    catalog: Arc<CatalogStore>,
    index: Arc<SimilarityIndex>,
    options: RecommenderOptions,
}

impl Recommender {
    /// Pairs a catalog with its similarity matrix
    ///
    /// Fails with a dimension error when the matrix does not have exactly one
    /// row per catalog entry.
    pub fn new(
        catalog: Arc<CatalogStore>,
        index: Arc<SimilarityIndex>,
        options: RecommenderOptions,
    ) -> AppResult<Self> {
        if index.dimension() != catalog.len() {
            return Err(AppError::Dimension {
                expected: catalog.len(),
                actual: index.dimension(),
            });
        }

        Ok(Self {
            catalog,
            index,
            options,
        })
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn options(&self) -> RecommenderOptions {
        self.options
    }

    /// Returns up to `k` catalog entries most similar to `title`
    pub fn recommend(&self, title: &str, k: usize) -> AppResult<Vec<CatalogEntry>> {
        Ok(self
            .recommend_scored(title, k)?
            .into_iter()
            .map(|scored| scored.entry)
            .collect())
    }

    /// Same ranking as [`Recommender::recommend`], keeping each entry's score
    pub fn recommend_scored(&self, title: &str, k: usize) -> AppResult<Vec<ScoredEntry>> {
        let source_index = self.catalog.index_of(title)?;
        let scores = self.index.row(source_index)?;

        let mut candidates: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
        // Stable: equal scores keep ascending index order
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

        let selected: Vec<(usize, f64)> = if self.options.exclude_self_by_position {
            if let Some(&(top_index, top_score)) = candidates.first() {
                if top_index != source_index {
                    tracing::warn!(
                        title = %title,
                        source_index,
                        top_index,
                        top_score,
                        "Queried movie is not its own top match; positional exclusion drops a distinct movie"
                    );
                }
            }
            candidates.into_iter().skip(1).take(k).collect()
        } else {
            candidates
                .into_iter()
                .filter(|(index, _)| *index != source_index)
                .take(k)
                .collect()
        };

        let recommendations = selected
            .into_iter()
            .map(|(index, score)| {
                Ok(ScoredEntry {
                    entry: self.catalog.entry_at(index)?.clone(),
                    score,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        tracing::debug!(
            title = %title,
            source_index,
            requested = k,
            returned = recommendations.len(),
            "Recommendations ranked"
        );

        Ok(recommendations)
    }
}
