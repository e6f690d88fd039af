use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::AppError;
use crate::error::AppResult;

/// Keys for cached downstream API responses
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    MovieDetails(i64),
    MovieCast(i64),
    MovieReviews(i64),
    PersonDetails(i64),
    PersonCredits(i64),
    Trailer(String),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::MovieDetails(id) => write!(f, "tmdb:movie:{}", id),
            CacheKey::MovieCast(id) => write!(f, "tmdb:cast:{}", id),
            CacheKey::MovieReviews(id) => write!(f, "tmdb:reviews:{}", id),
            CacheKey::PersonDetails(id) => write!(f, "tmdb:person:{}", id),
            CacheKey::PersonCredits(id) => write!(f, "tmdb:credits:{}", id),
            CacheKey::Trailer(title) => write!(f, "yt:trailer:{}", title.to_lowercase()),
        }
    }
}

/// Creates a Redis client for caching
///
/// Opening the client does not connect; connections are made per operation.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Cache handler for storing and retrieving data from Redis
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// How long shutdown waits for queued writes to reach Redis
const SHUTDOWN_FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of every write the background task attempted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheWriterStats {
    pub written: usize,
    pub failed: usize,
}

impl CacheWriterStats {
    fn record(&mut self, result: AppResult<()>) {
        match result {
            Ok(()) => self.written += 1,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to write to Redis cache");
                self.failed += 1;
            }
        }
    }
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<CacheWriterStats>,
}

impl CacheWriterHandle {
    /// Signals the writer task and waits until every queued write has been attempted
    ///
    /// Returns `None` if the flush does not finish within the timeout or the
    /// task died.
    pub async fn shutdown(self) -> Option<CacheWriterStats> {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");

        match tokio::time::timeout(SHUTDOWN_FLUSH_TIMEOUT, self.task).await {
            Ok(Ok(stats)) => Some(stats),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Cache writer task failed");
                None
            }
            Err(_) => {
                tracing::error!(
                    timeout_secs = SHUTDOWN_FLUSH_TIMEOUT.as_secs(),
                    "Cache writer did not flush in time, pending writes dropped"
                );
                None
            }
        }
    }
}

impl Cache {
    /// Creates a new Cache instance with an async write background task
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        let task = tokio::spawn(Self::cache_writer_task(client, write_rx, shutdown_rx));

        let cache = Self {
            redis_client,
            write_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx, task })
    }

    /// Background task that drains write messages into Redis
    ///
    /// On shutdown, messages already queued are flushed before exiting.
    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) -> CacheWriterStats {
        tracing::info!("Cache writer task started");
        let mut stats = CacheWriterStats::default();

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    stats.record(Self::write_to_redis(&client, msg).await);
                }
                _ = shutdown_rx.recv() => {
                    write_rx.close();
                    let mut flushed = 0usize;
                    while let Some(msg) = write_rx.recv().await {
                        stats.record(Self::write_to_redis(&client, msg).await);
                        flushed += 1;
                    }

                    tracing::info!(
                        flushed,
                        written = stats.written,
                        failed = stats.failed,
                        "Cache writer task stopped"
                    );
                    break;
                }
            }
        }

        stats
    }

    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Retrieves and deserializes a cached value
    ///
    /// An unreachable Redis is reported as a miss so lookups fall through to
    /// the upstream API; a stored value that no longer deserializes is an error.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let cached: Option<String> = match self.read_raw(key).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Redis read failed, treating as cache miss");
                return Ok(None);
            }
        };

        let decoded = decode_cached(cached)?;
        if decoded.is_some() {
            tracing::debug!(key = %key, "Cache hit");
        } else {
            tracing::debug!(key = %key, "Cache miss");
        }
        Ok(decoded)
    }

    async fn read_raw(&self, key: &CacheKey) -> AppResult<Option<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;
        Ok(cached)
    }

    /// Queues a value for writing without waiting for Redis
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}

/// Decodes a raw Redis value; the outer `Option` is key presence only
///
/// A stored JSON `null` (an `Option` value that was `None`) decodes to
/// `Some(None)`, so cached negative results still count as hits.
fn decode_cached<T: serde::de::DeserializeOwned>(raw: Option<String>) -> AppResult<Option<T>> {
    raw.map(|json| {
        serde_json::from_str(&json)
            .map_err(|e| AppError::Internal(format!("Cache deserialization error: {}", e)))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_display_movie_keys() {
        assert_eq!(CacheKey::MovieDetails(19995).to_string(), "tmdb:movie:19995");
        assert_eq!(CacheKey::MovieCast(19995).to_string(), "tmdb:cast:19995");
        assert_eq!(CacheKey::MovieReviews(19995).to_string(), "tmdb:reviews:19995");
    }

    #[test]
    fn test_cache_key_display_person_keys() {
        assert_eq!(CacheKey::PersonDetails(65731).to_string(), "tmdb:person:65731");
        assert_eq!(CacheKey::PersonCredits(65731).to_string(), "tmdb:credits:65731");
    }

    #[test]
    fn test_cache_key_display_trailer_lowercase() {
        let key = CacheKey::Trailer("The Dark Knight".to_string());
        assert_eq!(key.to_string(), "yt:trailer:the dark knight");
    }

    #[test]
    fn test_cached_none_is_a_hit() {
        let stored = serde_json::to_string(&None::<String>).unwrap();
        let decoded: Option<Option<String>> = decode_cached(Some(stored)).unwrap();
        assert_eq!(decoded, Some(None));

        let decoded: Option<Option<String>> = decode_cached(None).unwrap();
        assert_eq!(decoded, None);
    }

    #[test]
    fn test_cached_value_decodes() {
        let decoded: Option<Vec<i64>> = decode_cached(Some("[1,2]".to_string())).unwrap();
        assert_eq!(decoded, Some(vec![1, 2]));

        let result: AppResult<Option<Vec<i64>>> = decode_cached(Some("not json".to_string()));
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn test_unreachable_redis_is_a_miss() {
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, _handle) = Cache::new(client);

        let retrieved: Option<Vec<String>> = cache
            .get_from_cache(&CacheKey::MovieCast(1))
            .await
            .unwrap();
        assert_eq!(retrieved, None);
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_queued_writes() {
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, handle) = Cache::new(client);

        for id in 0..3 {
            cache.set_in_background(&CacheKey::MovieDetails(id), &id, 60);
        }

        let stats = handle.shutdown().await.unwrap();
        assert_eq!(stats.written + stats.failed, 3);
        assert_eq!(stats.failed, 3);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_set_in_background_writes_to_cache() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = create_redis_client(&redis_url).unwrap();
        let (cache, _handle) = Cache::new(client.clone());

        let key = CacheKey::Trailer("test_async_write".to_string());
        let value = Some("d9MyW72ELq0".to_string());

        cache.set_in_background(&key, &value, 60);
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let retrieved: Option<Option<String>> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(retrieved, Some(value));

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(key.to_string()).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_cache_writer_graceful_shutdown() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = create_redis_client(&redis_url).unwrap();
        let (cache, handle) = Cache::new(client.clone());

        let key = CacheKey::MovieReviews(-1);
        let value = vec!["shutdown_test".to_string()];

        cache.set_in_background(&key, &value, 60);
        let stats = handle.shutdown().await.unwrap();
        assert_eq!(stats.written, 1);

        let retrieved: Option<Vec<String>> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(retrieved, Some(value));

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(key.to_string()).await.unwrap();
    }
}
