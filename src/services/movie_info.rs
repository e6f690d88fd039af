//! Presentation-side composition of provider data.
//!
//! The recommender only knows catalog rows; everything a client sees beyond
//! titles (posters, cast, reviews, trailers, actor pages) is assembled here.
//! Secondary lookups degrade to placeholders or empty lists when the
//! downstream call fails. Primary lookups (movie and person details) do not.

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{
        CastMember, CastView, CreditView, Gender, MovieView, PersonView, RecommendedMovie,
        ReviewsView, TrailerView,
    },
    services::{
        providers::{MovieMetadataProvider, TrailerProvider, DEFAULT_PEOPLE_LIMIT},
        recommendations::ScoredEntry,
        sentiment::{self, SentimentScorer},
    },
};

pub const POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/500x750?text=No+Poster";
pub const PROFILE_PLACEHOLDER: &str = "https://via.placeholder.com/300x450?text=No+Image";

#[derive(Clone)]
pub struct MovieInfoService {
    metadata: Arc<dyn MovieMetadataProvider>,
    trailers: Arc<dyn TrailerProvider>,
    scorer: Arc<dyn SentimentScorer>,
    image_base_url: String,
}

impl MovieInfoService {
    pub fn new(
        metadata: Arc<dyn MovieMetadataProvider>,
        trailers: Arc<dyn TrailerProvider>,
        scorer: Arc<dyn SentimentScorer>,
        image_base_url: impl Into<String>,
    ) -> Self {
        Self {
            metadata,
            trailers,
            scorer,
            image_base_url: image_base_url.into(),
        }
    }

    /// Pairs each recommendation with its poster, fetched concurrently
    pub async fn recommendation_cards(&self, entries: Vec<ScoredEntry>) -> Vec<RecommendedMovie> {
        let handles: Vec<_> = entries
            .iter()
            .map(|scored| {
                let metadata = Arc::clone(&self.metadata);
                let movie_id = scored.entry.external_id;
                tokio::spawn(async move { metadata.fetch_movie_details(movie_id).await })
            })
            .collect();

        let mut cards = Vec::with_capacity(entries.len());
        for (scored, handle) in entries.into_iter().zip(handles) {
            let poster_path = match handle.await {
                Ok(Ok(details)) => details.poster_path,
                Ok(Err(e)) => {
                    tracing::warn!(
                        movie_id = scored.entry.external_id,
                        error = %e,
                        provider = self.metadata.name(),
                        "Poster lookup failed, using placeholder"
                    );
                    None
                }
                Err(e) => {
                    tracing::error!(
                        movie_id = scored.entry.external_id,
                        error = %e,
                        "Poster task panicked, using placeholder"
                    );
                    None
                }
            };

            cards.push(RecommendedMovie {
                title: scored.entry.title,
                movie_id: scored.entry.external_id,
                score: scored.score,
                poster_url: self.image_url(poster_path.as_deref(), POSTER_PLACEHOLDER),
            });
        }

        cards
    }

    /// Full movie page. Fails only when the details themselves cannot be fetched.
    pub async fn movie_view(&self, movie_id: i64) -> AppResult<MovieView> {
        let details = self.metadata.fetch_movie_details(movie_id).await?;

        let cast = match self
            .metadata
            .fetch_movie_cast(movie_id, DEFAULT_PEOPLE_LIMIT)
            .await
        {
            Ok(cast) => cast,
            Err(e) => {
                tracing::warn!(movie_id, error = %e, "Cast lookup failed, showing none");
                Vec::new()
            }
        };

        Ok(MovieView {
            id: details.id,
            poster_url: self.image_url(details.poster_path.as_deref(), POSTER_PLACEHOLDER),
            genres: details.genres.into_iter().map(|g| g.name).collect(),
            production_companies: details
                .production_companies
                .into_iter()
                .map(|c| c.name)
                .collect(),
            cast: cast.into_iter().map(|member| self.cast_view(member)).collect(),
            title: details.title,
            tagline: details.tagline,
            overview: details.overview,
            vote_average: details.vote_average,
            vote_count: details.vote_count,
            release_date: details.release_date,
            runtime: details.runtime,
            status: details.status,
            original_language: details.original_language,
        })
    }

    pub async fn reviews_view(&self, movie_id: i64) -> ReviewsView {
        let reviews = match self.metadata.fetch_movie_reviews(movie_id, None).await {
            Ok(reviews) => reviews,
            Err(e) => {
                tracing::warn!(movie_id, error = %e, "Review lookup failed, showing none");
                Vec::new()
            }
        };

        let summary = sentiment::summarize(self.scorer.as_ref(), &reviews);
        tracing::info!(
            movie_id,
            positive = summary.positive,
            neutral = summary.neutral,
            negative = summary.negative,
            "Reviews scored"
        );

        ReviewsView {
            movie_id,
            reviews: sentiment::annotate(self.scorer.as_ref(), &reviews),
            summary,
        }
    }

    /// Trailer for a movie, searched by its TMDB title
    pub async fn trailer_view(&self, movie_id: i64) -> TrailerView {
        let title = match self.metadata.fetch_movie_details(movie_id).await {
            Ok(details) => details.title,
            Err(e) => {
                tracing::warn!(movie_id, error = %e, "Movie lookup for trailer failed");
                None
            }
        };

        let Some(title) = title else {
            return TrailerView::from_video_id(None);
        };

        let video_id = match self.trailers.find_trailer(&title).await {
            Ok(video_id) => video_id,
            Err(e) => {
                tracing::warn!(
                    movie_id,
                    title = %title,
                    error = %e,
                    provider = self.trailers.name(),
                    "Trailer lookup failed"
                );
                None
            }
        };

        TrailerView::from_video_id(video_id)
    }

    pub async fn person_view(&self, person_id: i64) -> AppResult<PersonView> {
        let person = self.metadata.fetch_person_details(person_id).await?;

        Ok(PersonView {
            id: person.id,
            gender: Gender::from(person.gender),
            profile_url: self.image_url(person.profile_path.as_deref(), PROFILE_PLACEHOLDER),
            name: person.name,
            known_for_department: person.known_for_department,
            birthday: person.birthday,
            place_of_birth: person.place_of_birth,
            popularity: person.popularity,
            biography: person.biography,
        })
    }

    /// A person's most popular credits
    pub async fn known_for_view(&self, person_id: i64) -> Vec<CreditView> {
        let credits = match self
            .metadata
            .fetch_person_credits(person_id, DEFAULT_PEOPLE_LIMIT)
            .await
        {
            Ok(credits) => credits,
            Err(e) => {
                tracing::warn!(person_id, error = %e, "Credits lookup failed, showing none");
                return Vec::new();
            }
        };

        credits
            .into_iter()
            .map(|credit| CreditView {
                id: credit.id,
                title: credit.display_title().to_string(),
                poster_url: self.image_url(credit.poster_path.as_deref(), POSTER_PLACEHOLDER),
            })
            .collect()
    }

    fn cast_view(&self, member: CastMember) -> CastView {
        CastView {
            id: member.id,
            profile_url: self.image_url(member.profile_path.as_deref(), PROFILE_PLACEHOLDER),
            name: member.name.unwrap_or_default(),
            character: member.character.unwrap_or_default(),
        }
    }

    fn image_url(&self, path: Option<&str>, placeholder: &str) -> String {
        match path.filter(|p| !p.is_empty()) {
            Some(path) => format!(
                "{}/{}",
                self.image_base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            None => placeholder.to_string(),
        }
    }
}
