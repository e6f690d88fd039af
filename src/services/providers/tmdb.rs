//! TMDB (The Movie Database) v3 provider
//!
//! Supplies everything shown around a recommendation: details and posters,
//! cast, user reviews, and actor profiles with their best-known credits.
//! Responses are cached in Redis per movie/person id; list endpoints are
//! cached whole and truncated per request.

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        CastMember, CreditsResponse, MovieDetails, PersonCredit, PersonCreditsResponse,
        PersonDetails, Review, ReviewsResponse,
    },
    services::providers::MovieMetadataProvider,
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

const DETAILS_CACHE_TTL: u64 = 86400; // 1 day
const REVIEWS_CACHE_TTL: u64 = 21600; // 6 hours
const PEOPLE_CACHE_TTL: u64 = 604800; // 1 week

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

impl TmdbProvider {
    pub fn new(http_client: HttpClient, cache: Cache, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
            cache,
        }
    }

    /// GETs `path` under the API root and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = endpoint_url(&self.api_url, path);
        tracing::debug!(url = %url, provider = "tmdb", "TMDB request");

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", "en-US")])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("TMDB has no resource at {}", path)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, path = %path, "Failed to deserialize TMDB response");
            AppError::ExternalApi(format!("Failed to parse TMDB response: {}", e))
        })
    }

    async fn full_cast(&self, movie_id: i64) -> AppResult<Vec<CastMember>> {
        cached!(
            self.cache,
            CacheKey::MovieCast(movie_id),
            DETAILS_CACHE_TTL,
            async move {
                let credits: CreditsResponse = self
                    .get_json(&format!("movie/{}/credits", movie_id), &[])
                    .await?;
                Ok::<_, AppError>(credits.cast)
            }
        )
    }

    async fn first_review_page(&self, movie_id: i64) -> AppResult<Vec<Review>> {
        cached!(
            self.cache,
            CacheKey::MovieReviews(movie_id),
            REVIEWS_CACHE_TTL,
            async move {
                let page: ReviewsResponse = self
                    .get_json(&format!("movie/{}/reviews", movie_id), &[("page", "1")])
                    .await?;
                Ok::<_, AppError>(page.results)
            }
        )
    }

    async fn ranked_credits(&self, person_id: i64) -> AppResult<Vec<PersonCredit>> {
        cached!(
            self.cache,
            CacheKey::PersonCredits(person_id),
            PEOPLE_CACHE_TTL,
            async move {
                let credits: PersonCreditsResponse = self
                    .get_json(&format!("person/{}/combined_credits", person_id), &[])
                    .await?;
                Ok::<_, AppError>(rank_by_popularity(credits.cast))
            }
        )
    }
}

#[async_trait::async_trait]
impl MovieMetadataProvider for TmdbProvider {
    async fn fetch_movie_details(&self, movie_id: i64) -> AppResult<MovieDetails> {
        cached!(
            self.cache,
            CacheKey::MovieDetails(movie_id),
            DETAILS_CACHE_TTL,
            self.get_json::<MovieDetails>(&format!("movie/{}", movie_id), &[])
        )
    }

    async fn fetch_movie_cast(&self, movie_id: i64, limit: usize) -> AppResult<Vec<CastMember>> {
        let mut cast = self.full_cast(movie_id).await?;
        cast.truncate(limit);
        Ok(cast)
    }

    async fn fetch_movie_reviews(
        &self,
        movie_id: i64,
        limit: Option<usize>,
    ) -> AppResult<Vec<Review>> {
        let mut reviews = self.first_review_page(movie_id).await?;
        if let Some(limit) = limit {
            reviews.truncate(limit);
        }

        tracing::info!(
            movie_id,
            reviews = reviews.len(),
            provider = "tmdb",
            "Reviews fetched"
        );

        Ok(reviews)
    }

    async fn fetch_person_details(&self, person_id: i64) -> AppResult<PersonDetails> {
        cached!(
            self.cache,
            CacheKey::PersonDetails(person_id),
            PEOPLE_CACHE_TTL,
            self.get_json::<PersonDetails>(&format!("person/{}", person_id), &[])
        )
    }

    async fn fetch_person_credits(
        &self,
        person_id: i64,
        limit: usize,
    ) -> AppResult<Vec<PersonCredit>> {
        let mut credits = self.ranked_credits(person_id).await?;
        credits.truncate(limit);
        Ok(credits)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

fn endpoint_url(api_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        api_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Orders credits by popularity, highest first; missing popularity counts as zero
fn rank_by_popularity(mut credits: Vec<PersonCredit>) -> Vec<PersonCredit> {
    credits.sort_by(|a, b| {
        b.popularity
            .unwrap_or(0.0)
            .total_cmp(&a.popularity.unwrap_or(0.0))
    });
    credits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credit(id: i64, popularity: Option<f64>) -> PersonCredit {
        PersonCredit {
            id,
            title: Some(format!("Credit {}", id)),
            name: None,
            poster_path: None,
            popularity,
            media_type: Some("movie".to_string()),
        }
    }

    #[test]
    fn test_endpoint_url_joins_single_slash() {
        assert_eq!(
            endpoint_url("https://api.themoviedb.org/3/", "/movie/550"),
            "https://api.themoviedb.org/3/movie/550"
        );
        assert_eq!(
            endpoint_url("https://api.themoviedb.org/3", "person/287/combined_credits"),
            "https://api.themoviedb.org/3/person/287/combined_credits"
        );
    }

    #[test]
    fn test_rank_by_popularity_descending() {
        let ranked = rank_by_popularity(vec![
            credit(1, Some(3.5)),
            credit(2, Some(40.1)),
            credit(3, None),
            credit(4, Some(12.0)),
        ]);
        let ids: Vec<i64> = ranked.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_rank_by_popularity_ties_keep_order() {
        let ranked = rank_by_popularity(vec![credit(7, None), credit(8, Some(0.0)), credit(9, None)]);
        let ids: Vec<i64> = ranked.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![7, 8, 9]);
    }

    #[test]
    fn test_credits_response_deserialization() {
        let json = r#"{
            "id": 550,
            "cast": [
                {"id": 819, "name": "Edward Norton", "character": "The Narrator", "profile_path": "/8nytsqL59SFJTVYVrN72k6qkGgJ.jpg", "order": 0},
                {"id": 287, "name": "Brad Pitt", "character": "Tyler Durden", "profile_path": null, "order": 1}
            ],
            "crew": []
        }"#;

        let credits: CreditsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(credits.cast.len(), 2);
        assert_eq!(credits.cast[1].name.as_deref(), Some("Brad Pitt"));
        assert_eq!(credits.cast[1].profile_path, None);
    }

    #[test]
    fn test_person_credits_response_mixed_media() {
        let json = r#"{
            "cast": [
                {"id": 1, "title": "Fight Club", "media_type": "movie", "popularity": 61.4, "poster_path": "/p.jpg"},
                {"id": 2, "name": "Friends", "media_type": "tv", "popularity": 120.2}
            ]
        }"#;

        let credits: PersonCreditsResponse = serde_json::from_str(json).unwrap();
        let ranked = rank_by_popularity(credits.cast);
        assert_eq!(ranked[0].display_title(), "Friends");
        assert_eq!(ranked[1].display_title(), "Fight Club");
    }

    #[test]
    fn test_reviews_response_deserialization() {
        let json = r#"{
            "id": 550,
            "page": 1,
            "results": [
                {"author": "Goddard", "content": "Pretty awesome movie.", "id": "5b1c13b9c3a36848f2026384"}
            ],
            "total_pages": 1
        }"#;

        let page: ReviewsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].author, "Goddard");
    }
}
