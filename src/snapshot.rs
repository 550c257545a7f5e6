use std::path::PathBuf;

use csv::StringRecord;
use lazy_static::lazy_static;

use crate::error::SnapshotError;
use crate::models::MovieRecord;

lazy_static! {
    pub static ref SNAPSHOT_HEADERS: StringRecord = StringRecord::from(vec![
        "index",
        "rating",
        "title",
        "genre",
        "year",
        "description",
        "link",
        "poster_img",
        "cover_img",
        "release_date",
        "tomato_score",
        "tomato_reviews",
        "audience_score",
        "audience_ratings",
        "cast_crew",
    ]);
}

/// Persistence boundary the crawl pipeline depends on. Rows carry the
/// full [`MovieRecord`] field set with numerics as text and the cast
/// list flattened to an embedded JSON sub-document, and a read must
/// reconstruct exactly what a write encoded.
pub trait SnapshotStore {
    fn read(&self) -> Result<Vec<MovieRecord>, SnapshotError>;

    fn write(&self, records: &[MovieRecord]) -> Result<(), SnapshotError>;
}

/// CSV file implementation of [`SnapshotStore`].
#[derive(Debug, Clone)]
pub struct CsvSnapshot {
    path: PathBuf,
}

impl CsvSnapshot {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SnapshotStore for CsvSnapshot {
    fn read(&self) -> Result<Vec<MovieRecord>, SnapshotError> {
        if !self.path.exists() {
            return Err(SnapshotError::NotFound(self.path.clone()));
        }

        let mut rdr = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            records.push(decode_row(row, &result?)?);
        }
        Ok(records)
    }

    fn write(&self, records: &[MovieRecord]) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs_err::create_dir_all(parent)?;
            }
        }

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)?;
        wtr.write_record(&*SNAPSHOT_HEADERS)?;
        for record in records {
            wtr.write_record(&encode_row(record)?)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn encode_row(r: &MovieRecord) -> Result<Vec<String>, SnapshotError> {
    let cast_crew = match &r.cast_crew {
        Some(cast) => serde_json::to_string(cast)?,
        None => String::new(),
    };
    Ok(vec![
        r.index.to_string(),
        r.rating.to_string(),
        r.title.clone(),
        r.genre.clone().unwrap_or_default(),
        r.year.to_string(),
        r.description.clone().unwrap_or_default(),
        r.link.clone(),
        r.poster_img.clone().unwrap_or_default(),
        r.cover_img.clone().unwrap_or_default(),
        r.release_date.clone().unwrap_or_default(),
        number_cell(r.tomato_score),
        number_cell(r.tomato_reviews),
        number_cell(r.audience_score),
        number_cell(r.audience_ratings),
        cast_crew,
    ])
}

fn decode_row(row: usize, rec: &StringRecord) -> Result<MovieRecord, SnapshotError> {
    Ok(MovieRecord {
        index: req_u32(rec, 0, "index", row)?,
        rating: req_u32(rec, 1, "rating", row)?,
        title: req_str(rec, 2, "title", row)?,
        genre: opt_str(rec, 3),
        year: req_u32(rec, 4, "year", row)?,
        description: opt_str(rec, 5),
        link: req_str(rec, 6, "link", row)?,
        poster_img: opt_str(rec, 7),
        cover_img: opt_str(rec, 8),
        release_date: opt_str(rec, 9),
        tomato_score: opt_u32(rec, 10, "tomato_score", row)?,
        tomato_reviews: opt_u32(rec, 11, "tomato_reviews", row)?,
        audience_score: opt_u32(rec, 12, "audience_score", row)?,
        audience_ratings: opt_u32(rec, 13, "audience_ratings", row)?,
        cast_crew: match opt_str(rec, 14) {
            Some(json) => Some(serde_json::from_str(&json)?),
            None => None,
        },
    })
}

fn number_cell(v: Option<u32>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

fn opt_str(rec: &StringRecord, idx: usize) -> Option<String> {
    match rec.get(idx) {
        Some("") | None => None,
        Some(v) => Some(v.to_string()),
    }
}

fn req_str(
    rec: &StringRecord,
    idx: usize,
    field: &'static str,
    row: usize,
) -> Result<String, SnapshotError> {
    match rec.get(idx) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        other => Err(SnapshotError::BadField {
            row,
            field,
            value: other.unwrap_or_default().to_string(),
        }),
    }
}

fn req_u32(
    rec: &StringRecord,
    idx: usize,
    field: &'static str,
    row: usize,
) -> Result<u32, SnapshotError> {
    let raw = req_str(rec, idx, field, row)?;
    raw.parse().map_err(|_| SnapshotError::BadField {
        row,
        field,
        value: raw,
    })
}

fn opt_u32(
    rec: &StringRecord,
    idx: usize,
    field: &'static str,
    row: usize,
) -> Result<Option<u32>, SnapshotError> {
    match opt_str(rec, idx) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| SnapshotError::BadField {
                row,
                field,
                value: raw,
            }),
    }
}
