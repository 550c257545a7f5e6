mod catalog;
mod config;
mod crawler;
mod detail_page;
mod error;
mod headers;
mod list_page;
mod models;
mod snapshot;

pub use catalog::Catalog;
pub use config::CrawlerConfig;
pub use crawler::{Crawler, HttpFetcher, PageFetcher};
pub use error::{CrawlError, SnapshotError};
pub use headers::HeaderRotator;
pub use models::{CastMember, DetailFields, MovieRecord, Stub};
pub use snapshot::{CsvSnapshot, SnapshotStore, SNAPSHOT_HEADERS};

pub use anyhow;
