use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use cinescrape::{
    Catalog, CrawlError, Crawler, CrawlerConfig, DetailFields, MovieRecord, PageFetcher,
    SnapshotError, SnapshotStore, Stub,
};

const LIST_URL: &str = "https://movies.test/best-of-all-time/";

fn test_config() -> CrawlerConfig {
    CrawlerConfig {
        list_url: LIST_URL.to_string(),
        ..Default::default()
    }
}

fn list_html(rows: &[(u32, u32, &str, u32, &str)]) -> String {
    let mut html = String::from("<html><body><table>");
    for (index, rating, title, year, link) in rows {
        html.push_str(&format!(
            "<tr><td>{index}.</td><td>\
             <span class='score'>{rating}%</span>\
             <span class='details'><a href=\"{link}\">{title}</a> ({year})</span>\
             </td></tr>"
        ));
    }
    html.push_str("</table></body></html>");
    html
}

fn detail_html(genres_json: &str, description: &str) -> String {
    format!(
        r#"<html><body>
          <script id="media-hero-json" data-json="mediaHero" type="application/json">
            {{"thumbnail":{{"url":"https://img.test/cover.jpg"}},
              "metadataGenres":[{genres_json}],
              "metadataProps":["R","Released Jan 1, 2000","2h"]}}
          </script>
          <div slot="description"><rt-text slot="content" size="1">{description}</rt-text></div>
        </body></html>"#
    )
}

/// Serves canned pages; any url without one fails like a dead socket.
struct FakeFetcher {
    pages: HashMap<String, String>,
    hits: AtomicUsize,
}

impl FakeFetcher {
    fn new(pages: Vec<(&str, String)>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|(url, page)| (url.to_string(), page))
                .collect(),
            hits: AtomicUsize::new(0),
        }
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("connection refused: {url}"))
    }
}

struct MemSnapshot(Vec<MovieRecord>);

impl SnapshotStore for MemSnapshot {
    fn read(&self) -> Result<Vec<MovieRecord>, SnapshotError> {
        Ok(self.0.clone())
    }

    fn write(&self, _records: &[MovieRecord]) -> Result<(), SnapshotError> {
        Ok(())
    }
}

struct NoSnapshot;

impl SnapshotStore for NoSnapshot {
    fn read(&self) -> Result<Vec<MovieRecord>, SnapshotError> {
        Err(SnapshotError::NotFound("missing.csv".into()))
    }

    fn write(&self, _records: &[MovieRecord]) -> Result<(), SnapshotError> {
        Ok(())
    }
}

fn stub_record(index: u32, title: &str) -> MovieRecord {
    let stub = Stub {
        index,
        rating: 90,
        title: title.to_string(),
        year: 2000,
        link: format!("https://movies.test/m/{index}"),
    };
    MovieRecord::assemble(stub, DetailFields::default())
}

fn three_movie_pages() -> Vec<(&'static str, String)> {
    vec![
        (
            LIST_URL,
            list_html(&[
                (1, 98, "The Godfather", 1972, "https://movies.test/m/the_godfather"),
                (2, 93, "The Matrix", 1999, "https://movies.test/m/the_matrix"),
                (3, 87, "Inception", 2010, "https://movies.test/m/inception"),
            ]),
        ),
        (
            "https://movies.test/m/the_godfather",
            detail_html(r#""Crime", "Drama""#, "An offer that can't be refused."),
        ),
        (
            "https://movies.test/m/the_matrix",
            detail_html(r#""Sci-Fi", "Adventure""#, "There is no spoon."),
        ),
        (
            "https://movies.test/m/inception",
            detail_html(r#""Sci-Fi", "Thriller""#, "A dream within a dream."),
        ),
    ]
}

#[tokio::test]
async fn all_details_succeed_and_search_finds_by_name() {
    let crawler = Crawler::with_fetcher(test_config(), FakeFetcher::new(three_movie_pages()));

    let records = crawler.full_catalog(&NoSnapshot).await.unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.genre.is_some()));
    assert_eq!(records[1].description.as_deref(), Some("There is no spoon."));

    let found = Catalog::new(records).search(Some("matrix"), &[]).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "The Matrix");
}

#[tokio::test]
async fn one_failed_detail_degrades_only_that_record() {
    let mut pages = three_movie_pages();
    pages.retain(|(url, _)| *url != "https://movies.test/m/the_matrix");
    let crawler = Crawler::with_fetcher(test_config(), FakeFetcher::new(pages));

    let records = crawler.full_catalog(&NoSnapshot).await.unwrap();
    assert_eq!(records.len(), 3, "degraded fetches must not drop records");

    // Positional merge: the failed slot keeps its stub fields only.
    assert_eq!(records[1].title, "The Matrix");
    assert_eq!(records[1].genre, None);
    assert_eq!(records[1].description, None);
    assert!(records[0].genre.is_some());
    assert!(records[2].genre.is_some());
}

#[tokio::test]
async fn output_order_matches_list_order() {
    let crawler = Crawler::with_fetcher(test_config(), FakeFetcher::new(three_movie_pages()));
    let records = crawler.full_catalog(&NoSnapshot).await.unwrap();
    let indexes: Vec<u32> = records.iter().map(|r| r.index).collect();
    assert_eq!(indexes, [1, 2, 3]);
}

#[tokio::test]
async fn network_failure_serves_snapshot_without_enrichment() {
    let fetcher = FakeFetcher::new(vec![]);
    let crawler = Crawler::with_fetcher(test_config(), fetcher);
    let snapshot = MemSnapshot((1..=5).map(|i| stub_record(i, "Cached")).collect());

    let records = crawler.full_catalog(&snapshot).await.unwrap();
    assert_eq!(records.len(), 5);
    assert_eq!(crawler_hits(&crawler), 1, "only the list fetch may go out");
}

#[tokio::test]
async fn network_failure_without_snapshot_propagates() {
    let crawler = Crawler::with_fetcher(test_config(), FakeFetcher::new(vec![]));

    let err = crawler.full_catalog(&NoSnapshot).await.unwrap_err();
    assert!(matches!(err, CrawlError::Network(_)));
}

#[tokio::test]
async fn zero_rows_is_empty_result_even_with_snapshot() {
    let pages = vec![(LIST_URL, String::from("<html><table></table></html>"))];
    let crawler = Crawler::with_fetcher(test_config(), FakeFetcher::new(pages));
    let snapshot = MemSnapshot(vec![stub_record(1, "Cached")]);

    let err = crawler.full_catalog(&snapshot).await.unwrap_err();
    assert!(matches!(err, CrawlError::EmptyResult));
}

#[tokio::test]
async fn lookup_fetches_exactly_one_detail_page() {
    let crawler = Crawler::with_fetcher(test_config(), FakeFetcher::new(three_movie_pages()));

    let record = crawler.lookup_by_title("inception").await.unwrap();
    assert_eq!(record.title, "Inception");
    assert_eq!(record.genre.as_deref(), Some("sci-fi,thriller"));
    assert_eq!(crawler_hits(&crawler), 2, "one list fetch plus one detail fetch");
}

#[tokio::test]
async fn lookup_unknown_title_is_not_found() {
    let crawler = Crawler::with_fetcher(test_config(), FakeFetcher::new(three_movie_pages()));

    let err = crawler.lookup_by_title("The Irishman").await.unwrap_err();
    assert!(matches!(err, CrawlError::NotFound(_)));
    assert_eq!(crawler_hits(&crawler), 1, "no detail fetch without a match");
}

#[tokio::test]
async fn lookup_is_exact_match_not_substring() {
    let crawler = Crawler::with_fetcher(test_config(), FakeFetcher::new(three_movie_pages()));

    let err = crawler.lookup_by_title("Matrix").await.unwrap_err();
    assert!(matches!(err, CrawlError::NotFound(_)));
}

fn crawler_hits(crawler: &Crawler<FakeFetcher>) -> usize {
    crawler.fetcher().hits()
}
