use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use crate::api::{self, SegmentSource};
use crate::config::ClientConfig;
use crate::error::{Result, VlrError};
use crate::model::*;

/// The main entry point for reading vlrggapi match feeds.
///
/// `VlrClient` wraps a [`reqwest::Client`], retries failed requests with a
/// fixed delay and keeps each feed for the configured stale time.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> vlr_standings::Result<()> {
/// use vlr_standings::VlrClient;
///
/// let client = VlrClient::new();
/// let tournaments = client.get_tournaments().await?;
/// if let Some(first) = tournaments.first() {
///     let standings = client.get_standings(&first.id).await?;
///     println!("{} teams in {}", standings.len(), first.name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct VlrClient {
    http: reqwest::Client,
    config: ClientConfig,
    cache: RwLock<LruCache<SegmentQuery, CachedFeed>>,
}

/// One slot per feed.
const FEED_CACHE_CAPACITY: NonZeroUsize = NonZeroUsize::MIN.saturating_add(1);

struct CachedFeed {
    fetched_at: Instant,
    segments: Vec<RawMatchRecord>,
}

impl CachedFeed {
    fn new(segments: Vec<RawMatchRecord>) -> Self {
        Self {
            fetched_at: Instant::now(),
            segments,
        }
    }

    fn is_expired(&self, stale_time: Duration) -> bool {
        self.fetched_at.elapsed() >= stale_time
    }
}

impl VlrClient {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        let config = ClientConfig::default();
        let http = build_http(&config).unwrap_or_else(|e| {
            warn!(error = %e, "falling back to an http client without timeout");
            reqwest::Client::new()
        });
        Self::with_client(http, config)
    }

    /// Create a client whose HTTP timeout follows `config`.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let http = build_http(&config)?;
        Ok(Self::with_client(http, config))
    }

    /// Create a client configured from `VLR_API_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::with_config(ClientConfig::from_env())
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure proxies, headers, etc.
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        Self {
            http: client,
            config,
            cache: RwLock::new(LruCache::new(FEED_CACHE_CAPACITY)),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch one match feed, served from cache while it is fresh.
    #[instrument(skip(self))]
    pub async fn get_segments(&self, query: SegmentQuery) -> Result<Vec<RawMatchRecord>> {
        if let Some(segments) = self.cached(query).await {
            debug!(count = segments.len(), "serving segments from cache");
            return Ok(segments);
        }
        let url = self.config.match_url(query);
        let segments = self.get_segments_with_retry(&url).await?;
        self.cache
            .write()
            .await
            .put(query, CachedFeed::new(segments.clone()));
        Ok(segments)
    }

    /// Fetch the tournaments announced in the upcoming feed.
    #[instrument(skip(self))]
    pub async fn get_tournaments(&self) -> Result<Vec<Tournament>> {
        api::load_tournaments(self).await
    }

    /// Fetch the standings of one tournament from the results feed.
    #[instrument(skip(self))]
    pub async fn get_standings(&self, tournament_id: &str) -> Result<Vec<TeamStanding>> {
        api::load_standings(self, tournament_id).await
    }

    /// Fetch every upcoming and finished match of one tournament.
    #[instrument(skip(self))]
    pub async fn get_matches(&self, tournament_id: &str) -> Result<MatchList> {
        api::load_matches(self, tournament_id).await
    }

    /// Drop every cached feed.
    pub async fn invalidate(&self) {
        self.cache.write().await.clear();
    }

    async fn get_segments_with_retry(&self, url: &str) -> Result<Vec<RawMatchRecord>> {
        let max_retries = self.config.max_retries;
        let mut attempt = 0u32;
        loop {
            match fetch_feed(&self.http, url).await {
                Ok(segments) => return Ok(segments),
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    attempt += 1;
                    warn!(error = %e, attempt, max_retries, "request failed, retrying");
                    tokio::time::sleep(self.config.retry_delay()).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// The cached feed for `query` if still fresh. Expired entries are removed.
    async fn cached(&self, query: SegmentQuery) -> Option<Vec<RawMatchRecord>> {
        let mut cache = self.cache.write().await;
        let feed = cache.get(&query)?;
        if feed.is_expired(self.config.stale_time()) {
            debug!(age = ?feed.fetched_at.elapsed(), "removing stale feed");
            cache.pop(&query);
            return None;
        }
        Some(feed.segments.clone())
    }
}

fn build_http(config: &ClientConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.http_timeout())
        .build()
        .map_err(VlrError::ClientBuild)
}

impl Default for VlrClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentSource for VlrClient {
    async fn fetch_segments(&self, query: SegmentQuery) -> Result<Vec<RawMatchRecord>> {
        self.get_segments(query).await
    }
}

/// Fetch a feed URL and read the `data.segments` list out of its envelope.
pub(crate) async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<RawMatchRecord>> {
    debug!(url, "fetching segments");

    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| VlrError::Http {
            url: url.to_owned(),
            source: e,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(VlrError::UnexpectedStatus {
            url: url.to_owned(),
            status,
        });
    }

    let body = response.text().await.map_err(|e| VlrError::ResponseBody {
        url: url.to_owned(),
        source: e,
    })?;

    let envelope: Value = serde_json::from_str(&body).map_err(|e| VlrError::Decode {
        url: url.to_owned(),
        source: e,
    })?;
    let segments = envelope
        .get("data")
        .and_then(|data| data.get("segments"))
        .filter(|segments| !segments.is_null())
        .ok_or_else(|| VlrError::MissingEnvelope {
            url: url.to_owned(),
            context: "data.segments",
        })?;

    let segments = RawMatchRecord::list_from_value(segments);
    debug!(count = segments.len(), "parsed segments");
    Ok(segments)
}
