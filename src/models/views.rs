//! Response bodies returned by the HTTP API.

use serde::Serialize;

use super::{Gender, ReviewSentiment, SentimentSummary};

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub source_title: String,
    pub recommendations: Vec<RecommendedMovie>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendedMovie {
    pub title: String,
    pub movie_id: i64,
    pub score: f64,
    pub poster_url: String,
}

#[derive(Debug, Serialize)]
pub struct MovieView {
    pub id: i64,
    pub title: Option<String>,
    pub tagline: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    pub vote_count: Option<u64>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub status: Option<String>,
    pub original_language: Option<String>,
    pub genres: Vec<String>,
    pub production_companies: Vec<String>,
    pub poster_url: String,
    pub cast: Vec<CastView>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CastView {
    pub id: i64,
    pub name: String,
    pub character: String,
    pub profile_url: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewsView {
    pub movie_id: i64,
    pub summary: SentimentSummary,
    pub reviews: Vec<ReviewSentiment>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TrailerView {
    pub video_id: Option<String>,
    pub url: Option<String>,
}

impl TrailerView {
    pub fn from_video_id(video_id: Option<String>) -> Self {
        let url = video_id
            .as_ref()
            .map(|id| format!("https://www.youtube.com/watch?v={}", id));
        Self { video_id, url }
    }
}

#[derive(Debug, Serialize)]
pub struct PersonView {
    pub id: i64,
    pub name: Option<String>,
    pub known_for_department: Option<String>,
    pub gender: Gender,
    pub birthday: Option<String>,
    pub place_of_birth: Option<String>,
    pub popularity: Option<f64>,
    pub biography: Option<String>,
    pub profile_url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CreditView {
    pub id: i64,
    pub title: String,
    pub poster_url: String,
}
