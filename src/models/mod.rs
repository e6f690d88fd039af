use serde::{Deserialize, Serialize};

pub mod movie;
pub mod sentiment;
pub mod views;

pub use movie::{
    CastMember, CreditsResponse, Gender, MovieDetails, Named, PersonCredit, PersonCreditsResponse,
    PersonDetails, Review, ReviewsResponse,
};
pub use sentiment::{ReviewSentiment, SentimentLabel, SentimentSummary};
pub use views::{
    CastView, CreditView, MovieView, PersonView, RecommendationResponse, RecommendedMovie,
    ReviewsView, TrailerView,
};

/// One recommendable movie in the catalog
///
/// `row_index` is the entry's position in the catalog and the matching
/// row/column of the similarity matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    pub external_id: i64,
    pub row_index: usize,
}

/// Catalog snapshot record, one per matrix row, in row order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(alias = "external_id")]
    pub movie_id: i64,
    pub title: String,
}

impl CatalogRecord {
    pub fn new(movie_id: i64, title: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
        }
    }
}

impl From<&CatalogEntry> for CatalogRecord {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            movie_id: entry.external_id,
            title: entry.title.clone(),
        }
    }
}
