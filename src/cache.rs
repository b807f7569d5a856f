//! In-memory caching using moka
//!
//! Confirmed quotes live here until they expire, so the booking flow can
//! charge exactly the price the customer was shown.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use crate::pricing::ConfirmedQuote;

/// Upper bound on quotes held at once
const MAX_QUOTES: u64 = 100_000;

/// Longest time a confirmed quote may be held
pub const MAX_QUOTE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Application cache holding confirmed quotes
#[derive(Clone)]
pub struct AppCache {
    /// Confirmed quotes (quote_id -> ConfirmedQuote)
    pub quotes: Cache<Uuid, Arc<ConfirmedQuote>>,
    quote_ttl: Duration,
}

impl AppCache {
    /// Create a new cache whose quotes expire after `quote_ttl`,
    /// clamped to [`MAX_QUOTE_TTL`]
    pub fn new(quote_ttl: Duration) -> Self {
        let quote_ttl = quote_ttl.min(MAX_QUOTE_TTL);
        Self {
            quotes: Cache::builder()
                .max_capacity(MAX_QUOTES)
                .time_to_live(quote_ttl)
                .build(),
            quote_ttl,
        }
    }

    pub fn quote_ttl(&self) -> Duration {
        self.quote_ttl
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            quotes_size: self.quotes.entry_count(),
        }
    }

    /// Take a single quote out of the cache, e.g. once it has been booked.
    /// Only one of several concurrent callers gets the quote back.
    pub async fn remove_quote(&self, quote_id: &Uuid) -> Option<Arc<ConfirmedQuote>> {
        let removed = self.quotes.remove(quote_id).await;
        if removed.is_some() {
            info!("Cache invalidated for quote: {}", quote_id);
        }
        removed
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub quotes_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oversized_ttl_is_clamped() {
        let cache = AppCache::new(Duration::from_secs(u64::MAX));
        assert_eq!(cache.quote_ttl(), MAX_QUOTE_TTL);

        let cache = AppCache::new(Duration::from_secs(60));
        assert_eq!(cache.quote_ttl(), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_remove_unknown_quote() {
        let cache = AppCache::new(Duration::from_secs(60));
        assert!(cache.remove_quote(&Uuid::new_v4()).await.is_none());
    }
}
