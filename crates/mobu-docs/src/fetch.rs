//! Cache-or-network page retrieval.
//!
//! Uses ureq (blocking HTTP) — the pipeline is a short-lived single run and
//! has no async surface. Prefetching fans the page list out over a bounded
//! set of worker threads; cache writes are atomic so concurrent writers to
//! the same key cannot corrupt an entry.

use std::time::Duration;

use crate::cache::PageCache;
use crate::error::{DocsError, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_WORKERS: usize = 8;

pub struct DocFetcher {
    agent: ureq::Agent,
    cache: Option<PageCache>,
}

impl DocFetcher {
    pub fn new(cache: Option<PageCache>, timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent, cache }
    }

    /// Fetch one page: cache hit bypasses the network, a network fetch
    /// populates the cache on the way out.
    pub fn fetch(&self, url: &str) -> Result<String> {
        if let Some(cache) = &self.cache
            && let Some(body) = cache.get(url)
        {
            tracing::trace!(url = %url, "doc cache hit");
            return Ok(body);
        }

        let mut response = self.agent.get(url).call().map_err(|e| DocsError::Fetch {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| DocsError::Fetch {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if let Some(cache) = &self.cache
            && let Err(e) = cache.put(url, &body)
        {
            tracing::warn!(url = %url, error = %e, "failed to write doc cache entry");
        }

        Ok(body)
    }

    /// Warm the cache for a batch of URLs using at most `workers` threads.
    /// Individual failures are logged and otherwise ignored; the later
    /// per-page `fetch` reports them properly.
    pub fn prefetch(&self, urls: &[String], workers: usize) {
        // Without a cache there is nothing to warm.
        if self.cache.is_none() || urls.is_empty() {
            return;
        }
        let chunk = urls.len().div_ceil(workers.max(1)).max(1);
        std::thread::scope(|scope| {
            for part in urls.chunks(chunk) {
                scope.spawn(move || {
                    for url in part {
                        if let Err(e) = self.fetch(url) {
                            tracing::warn!(url = %url, error = %e, "prefetch failed");
                        }
                    }
                });
            }
        });
    }
}
