//! Fashion news client and local cache
//!
//! On activation the last cached article list is shown straight away while
//! a fresh fetch runs in the background. A successful fetch replaces both
//! the shown list and the cache; a failed one leaves them untouched. There
//! is no expiry and no conditional fetch: every activation fetches.

use crate::config::NewsConfig;
use crate::db::settings::{get_setting, set_setting};
use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("wardrobe/", env!("CARGO_PKG_VERSION"));

/// Settings key of the single cache slot
pub const NEWS_CACHE_KEY: &str = "cached_fashion_news";

/// One headline from the news API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Empty when upstream sends no title or `null`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    /// Remaining upstream fields, kept as received
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Article {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image_url: None,
            source_id: None,
            link: None,
            extra: Map::new(),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Search response envelope
#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    results: Option<Vec<Article>>,
}

/// HTTP client for the news search API
pub struct NewsClient {
    http_client: reqwest::Client,
    config: NewsConfig,
}

impl NewsClient {
    pub fn new(config: NewsConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Fetch the current article list
    ///
    /// A response without a `results` array counts as a failure.
    pub async fn fetch_articles(&self) -> Result<Vec<Article>> {
        let mut params: Vec<(&str, &str)> = vec![
            ("q", self.config.query.as_str()),
            ("language", self.config.language.as_str()),
        ];
        if let Some(key) = &self.config.api_key {
            params.insert(0, ("apikey", key.as_str()));
        }

        debug!(url = %self.config.base_url, query = %self.config.query, "Querying news API");

        let response = self
            .http_client
            .get(&self.config.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Network(format!(
                "News API returned {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let body: NewsResponse = response
            .json()
            .await
            .map_err(|e| Error::Network(format!("Unreadable news response: {}", e)))?;

        body.results.ok_or_else(|| {
            Error::Network(format!(
                "News response without results (status: {})",
                body.status.as_deref().unwrap_or("unknown")
            ))
        })
    }
}

/// The single persisted slot holding the last good article list
#[derive(Clone)]
pub struct NewsCache {
    pool: SqlitePool,
}

impl NewsCache {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Last stored list, or `None` if nothing usable is cached
    pub async fn load(&self) -> Result<Option<Vec<Article>>> {
        let Some(raw) = get_setting::<String>(&self.pool, NEWS_CACHE_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(articles) => Ok(Some(articles)),
            Err(e) => {
                warn!("Ignoring unreadable news cache: {}", e);
                Ok(None)
            }
        }
    }

    /// Overwrite the slot
    pub async fn store(&self, articles: &[Article]) -> Result<()> {
        let raw = serde_json::to_string(articles)?;
        set_setting(&self.pool, NEWS_CACHE_KEY, raw).await
    }
}

/// Result of one background fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Fresh list shown and cached
    Updated { articles: usize },
    /// Fetch failed; shown list and cache unchanged
    Failed { reason: String },
}

/// Article list as currently shown, plus the machinery to refresh it
#[derive(Clone)]
pub struct NewsFeed {
    client: Arc<NewsClient>,
    cache: NewsCache,
    articles: Arc<RwLock<Vec<Article>>>,
}

impl NewsFeed {
    pub fn new(client: NewsClient, cache: NewsCache) -> Self {
        Self {
            client: Arc::new(client),
            cache,
            articles: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Show the cached list now and start a fetch in the background
    ///
    /// Returns the list shown immediately and a handle resolving once the
    /// fetch has either replaced it or failed.
    pub async fn activate(&self) -> (Vec<Article>, JoinHandle<RefreshOutcome>) {
        // Held across the cache read so a concurrent refresh cannot be
        // overwritten by the older cached list.
        let shown = {
            let mut articles = self.articles.write().await;
            match self.cache.load().await {
                Ok(Some(cached)) => {
                    debug!(articles = cached.len(), "Showing cached news");
                    *articles = cached;
                }
                Ok(None) => debug!("No cached news"),
                Err(e) => warn!("Failed to read news cache: {}", e),
            }
            articles.to_vec()
        };

        let feed = self.clone();
        let refresh = tokio::spawn(async move { feed.refresh().await });

        (shown, refresh)
    }

    /// Fetch now; on success replace the shown list and the cache
    pub async fn refresh(&self) -> RefreshOutcome {
        match self.client.fetch_articles().await {
            Ok(fresh) => {
                let count = fresh.len();

                let mut articles = self.articles.write().await;
                if let Err(e) = self.cache.store(&fresh).await {
                    warn!("Failed to cache news: {}", e);
                }
                *articles = fresh;
                drop(articles);

                info!(articles = count, "Fashion news updated");
                RefreshOutcome::Updated { articles: count }
            }
            Err(e) => {
                warn!("Error fetching fashion news: {}", e);
                RefreshOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Snapshot of the list currently shown
    pub async fn articles(&self) -> Vec<Article> {
        self.articles.read().await.clone()
    }
}
