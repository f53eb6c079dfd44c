/// Read-through caching around an async computation.
///
/// Returns the cached value for `$key` when present. Otherwise awaits
/// `$future`, queues the result for a background write with `$ttl` seconds
/// to live, and returns it. Errors from the cache lookup and from the
/// computation both propagate with `?`, so the enclosing function must
/// return `AppResult`.
///
/// # Example
/// ```rust,ignore
/// let names: Vec<String> = cached!(cache, key, 3600, store.search_items(1, "ali", 10))?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $future:expr) => {{
        if let Some(hit) = $cache.get_from_cache(&$key).await? {
            Ok(hit)
        } else {
            let value = $future.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
