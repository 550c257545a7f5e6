use std::io::prelude::*;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use flate2::read::GzDecoder;
use futures::{stream, StreamExt};
use lazy_static::lazy_static;
use reqwest::header::CONTENT_TYPE;

use crate::catalog::Catalog;
use crate::config::CrawlerConfig;
use crate::detail_page;
use crate::error::CrawlError;
use crate::headers::HeaderRotator;
use crate::list_page;
use crate::models::{DetailFields, MovieRecord, Stub};
use crate::snapshot::SnapshotStore;

lazy_static! {
    static ref HTTP_CLI: reqwest::Client = reqwest::ClientBuilder::new()
        .gzip(true)
        .deflate(true)
        .build()
        .unwrap();
}

/// Seam between the crawl pipeline and the network. The provided
/// [`HttpFetcher`] talks HTTP; tests substitute canned pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

/// Downloads pages over HTTP with rotated headers and a fixed per-call
/// timeout. No retries: a failed page is the caller's problem.
pub struct HttpFetcher {
    rotator: HeaderRotator,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self {
            rotator: HeaderRotator::new(config)?,
            timeout: Duration::from_secs(config.request_timeout),
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let resp = HTTP_CLI
            .get(url)
            .headers(self.rotator.next_headers())
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let page = match resp.headers().get(CONTENT_TYPE) {
            Some(c) if c == "application/x-gzip" || c == "application/gzip" => {
                let compressed = resp.bytes().await?;
                let mut gz = GzDecoder::new(&compressed[..]);
                let mut page = String::new();
                gz.read_to_string(&mut page)?;
                page
            }
            _ => resp.text().await?,
        };

        Ok(page)
    }
}

/// Crawl orchestrator: list acquisition, concurrent detail enrichment,
/// and snapshot fallback. The catalog it produces lives for one call.
pub struct Crawler<F = HttpFetcher> {
    config: CrawlerConfig,
    fetcher: F,
}

impl Crawler<HttpFetcher> {
    pub fn new(config: CrawlerConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        Ok(Self { config, fetcher })
    }
}

impl<F: PageFetcher> Crawler<F> {
    pub fn with_fetcher(config: CrawlerConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetches the ranked-list page and extracts its stubs in source
    /// order. Transport failure and a row-less page are distinct errors:
    /// only the former may be recovered from a snapshot.
    pub async fn fetch_list(&self) -> Result<Vec<Stub>, CrawlError> {
        let page = self
            .fetcher
            .fetch_page(&self.config.list_url)
            .await
            .map_err(CrawlError::Network)?;

        let stubs = list_page::extract_stubs(&page);
        if stubs.is_empty() {
            return Err(CrawlError::EmptyResult);
        }
        log::info!("extracted {} list rows", stubs.len());
        Ok(stubs)
    }

    /// Fetches one detail page. Never fails upward: any network or parse
    /// problem degrades to empty fields for this record only.
    pub async fn fetch_details(&self, url: &str) -> DetailFields {
        match self.fetcher.fetch_page(url).await {
            Ok(page) => detail_page::extract_details(&page),
            Err(e) => {
                log::warn!("skipping details for {url}: {e:#}");
                DetailFields::default()
            }
        }
    }

    /// Enriches every stub with its detail fields under bounded
    /// concurrency. Results land in a slot vector indexed by submission
    /// order, so output order and cardinality always match the input no
    /// matter how downloads interleave.
    pub async fn enrich(&self, stubs: Vec<Stub>) -> Vec<MovieRecord> {
        let mut slots = vec![DetailFields::default(); stubs.len()];
        {
            let mut details = stream::iter(stubs.iter().enumerate())
                .map(|(i, stub)| {
                    let link = stub.link.clone();
                    async move { (i, self.fetch_details(&link).await) }
                })
                .buffer_unordered(self.config.concurrent_downloads.max(1));

            while let Some((i, fields)) = details.next().await {
                slots[i] = fields;
            }
        }

        stubs
            .into_iter()
            .zip(slots)
            .map(|(stub, fields)| MovieRecord::assemble(stub, fields))
            .collect()
    }

    /// Crawl + enrich, substituting the snapshot when the list fetch hit
    /// a network failure. Snapshot rows are already enriched, so no
    /// detail pass runs on that path. [`CrawlError::EmptyResult`] never
    /// falls back: the source answered, its format broke.
    pub async fn full_catalog<S: SnapshotStore>(
        &self,
        snapshots: &S,
    ) -> Result<Vec<MovieRecord>, CrawlError> {
        match self.fetch_list().await {
            Ok(stubs) => Ok(self.enrich(stubs).await),
            Err(err @ CrawlError::Network(_)) => match snapshots.read() {
                Ok(records) => {
                    log::warn!("movie source unreachable, serving {} snapshot rows", records.len());
                    Ok(records)
                }
                Err(read_err) => {
                    log::warn!("no usable snapshot: {read_err}");
                    Err(err)
                }
            },
            Err(err) => Err(err),
        }
    }

    /// Crawl + enrich + persist. No snapshot fallback here: rewriting the
    /// snapshot from itself would be a no-op.
    pub async fn update_snapshot<S: SnapshotStore>(
        &self,
        snapshots: &S,
    ) -> Result<Vec<MovieRecord>, CrawlError> {
        let stubs = self.fetch_list().await?;
        let records = self.enrich(stubs).await;
        snapshots.write(&records)?;
        Ok(records)
    }

    pub async fn search<S: SnapshotStore>(
        &self,
        snapshots: &S,
        name: Option<&str>,
        genres: &[String],
    ) -> Result<Vec<MovieRecord>, CrawlError> {
        Catalog::new(self.full_catalog(snapshots).await?).search(name, genres)
    }

    pub async fn list_genres<S: SnapshotStore>(
        &self,
        snapshots: &S,
    ) -> Result<Vec<String>, CrawlError> {
        Ok(Catalog::new(self.full_catalog(snapshots).await?).list_genres())
    }

    /// Exact case-insensitive title lookup against the list-stage stubs,
    /// then a single detail fetch for the match. Answering one title
    /// never enriches the whole catalog.
    pub async fn lookup_by_title(&self, title: &str) -> Result<MovieRecord, CrawlError> {
        let stubs = self.fetch_list().await?;
        let wanted = title.to_lowercase();
        let stub = stubs
            .into_iter()
            .find(|s| s.title.to_lowercase() == wanted)
            .ok_or_else(|| CrawlError::NotFound(title.to_string()))?;

        let details = self.fetch_details(&stub.link).await;
        Ok(MovieRecord::assemble(stub, details))
    }
}
