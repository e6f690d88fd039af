use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    services::providers::TrailerProvider,
};
use reqwest::Client as HttpClient;
use serde::Deserialize;

const TRAILER_CACHE_TTL: u64 = 604800; // 1 week

/// YouTube Data API v3 search, used to find a movie's trailer
#[derive(Clone)]
pub struct YoutubeProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    #[serde(default)]
    video_id: Option<String>,
}

impl YoutubeProvider {
    pub fn new(http_client: HttpClient, cache: Cache, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url,
            cache,
        }
    }

    async fn search_first_video(&self, title: &str) -> AppResult<Option<String>> {
        let url = format!("{}/search", self.api_url.trim_end_matches('/'));
        let query = trailer_query(title);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("part", "snippet"),
                ("type", "video"),
                ("maxResults", "1"),
                ("q", query.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "YouTube API returned status {}: {}",
                status, body
            )));
        }

        let results: SearchResponse = response.json().await?;
        let video_id = first_video_id(results);

        tracing::info!(
            title = %title,
            found = video_id.is_some(),
            provider = "youtube",
            "Trailer search completed"
        );

        Ok(video_id)
    }
}

#[async_trait::async_trait]
impl TrailerProvider for YoutubeProvider {
    async fn find_trailer(&self, title: &str) -> AppResult<Option<String>> {
        if title.trim().is_empty() {
            return Ok(None);
        }

        cached!(
            self.cache,
            CacheKey::Trailer(title.to_string()),
            TRAILER_CACHE_TTL,
            self.search_first_video(title)
        )
    }

    fn name(&self) -> &'static str {
        "youtube"
    }
}

/// Trailer provider used when no YouTube API key is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledTrailers;

#[async_trait::async_trait]
impl TrailerProvider for DisabledTrailers {
    async fn find_trailer(&self, _title: &str) -> AppResult<Option<String>> {
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}

fn trailer_query(title: &str) -> String {
    format!("{} official trailer", title.trim())
}

fn first_video_id(results: SearchResponse) -> Option<String> {
    results.items.into_iter().next().and_then(|item| item.id.video_id)
}
