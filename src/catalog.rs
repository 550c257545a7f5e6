use std::collections::BTreeSet;

use crate::error::CrawlError;
use crate::models::MovieRecord;

/// In-memory view over one crawl's enriched records. Rebuilt per
/// invocation; the snapshot file is the only durable state.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<MovieRecord>,
}

impl Catalog {
    pub fn new(records: Vec<MovieRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    /// Filters by case-insensitive title substring and/or genre tokens.
    /// Genre tokens are OR'd: one matching token keeps the record. Both
    /// filters conjoin when both are given; an empty outcome is
    /// [`CrawlError::NoMatch`] rather than an empty success.
    ///
    /// Genre comparison ignores hyphens on both sides, so `sci-fi`
    /// matches `scifi,adventure` as well as `sci-fi,drama`.
    pub fn search(
        &self,
        name: Option<&str>,
        genres: &[String],
    ) -> Result<Vec<MovieRecord>, CrawlError> {
        let name = name.map(str::to_lowercase);
        let genres: Vec<String> = genres
            .iter()
            .map(|g| g.to_lowercase().replace('-', ""))
            .collect();

        let matches: Vec<MovieRecord> = self
            .records
            .iter()
            .filter(|record| {
                name.as_deref()
                    .map_or(true, |n| record.title.to_lowercase().contains(n))
            })
            .filter(|record| {
                if genres.is_empty() {
                    return true;
                }
                let record_genre = record
                    .genre
                    .as_deref()
                    .unwrap_or("")
                    .to_lowercase()
                    .replace('-', "");
                genres.iter().any(|g| record_genre.contains(g.as_str()))
            })
            .cloned()
            .collect();

        if matches.is_empty() {
            return Err(CrawlError::NoMatch);
        }
        Ok(matches)
    }

    /// Every distinct genre token across the catalog: trimmed,
    /// lowercased, deduplicated, sorted ascending. Records without a
    /// genre contribute nothing.
    pub fn list_genres(&self) -> Vec<String> {
        self.records
            .iter()
            .filter_map(|record| record.genre.as_deref())
            .flat_map(|genre| genre.split(','))
            .map(|token| token.trim().to_lowercase())
            .filter(|token| !token.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
