/// Get-or-compute over the Redis response cache.
///
/// Evaluates to `AppResult<T>`: the cached value when `$key` is present,
/// otherwise the result of awaiting `$block`, which is queued for a
/// background write with `$ttl` seconds to live. Errors from `$block` are
/// returned and nothing is cached.
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache, CacheKey::MovieDetails(id), DETAILS_TTL, async move {
///     self.get_json(&format!("movie/{}", id), &[]).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get_from_cache(&key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&key, &value, $ttl);
            Ok(value)
        }
    }};
}
