//! Downstream movie-data providers.
//!
//! These are consumed by the presentation side only; the recommender never
//! calls them. Implementations cache their responses.

use crate::{
    error::AppResult,
    models::{CastMember, MovieDetails, PersonCredit, PersonDetails, Review},
};

pub mod tmdb;
pub mod youtube;

pub use tmdb::TmdbProvider;
pub use youtube::{DisabledTrailers, YoutubeProvider};

/// Number of cast members and person credits fetched by default
pub const DEFAULT_PEOPLE_LIMIT: usize = 10;

/// Movie and person metadata keyed by external (TMDB) id
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieMetadataProvider: Send + Sync {
    async fn fetch_movie_details(&self, movie_id: i64) -> AppResult<MovieDetails>;

    /// First `limit` billed cast members
    async fn fetch_movie_cast(&self, movie_id: i64, limit: usize) -> AppResult<Vec<CastMember>>;

    /// First page of user reviews, optionally truncated to `limit`
    async fn fetch_movie_reviews(
        &self,
        movie_id: i64,
        limit: Option<usize>,
    ) -> AppResult<Vec<Review>>;

    async fn fetch_person_details(&self, person_id: i64) -> AppResult<PersonDetails>;

    /// A person's movie and TV credits, most popular first
    async fn fetch_person_credits(
        &self,
        person_id: i64,
        limit: usize,
    ) -> AppResult<Vec<PersonCredit>>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Looks up a trailer video for a movie title
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TrailerProvider: Send + Sync {
    /// Video id of the best trailer match, if any
    async fn find_trailer(&self, title: &str) -> AppResult<Option<String>>;

    fn name(&self) -> &'static str;
}
