use serde::{Deserialize, Serialize};

/// Minimal record extracted from one row of the ranked-list page.
///
/// `index` reflects the source ordering and is never re-derived; `link`
/// is the join key to the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stub {
    pub index: u32,
    pub rating: u32,
    pub title: String,
    pub year: u32,
    pub link: String,
}

/// One entry of a movie's cast and crew listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
}

/// Optional fields scraped from a detail page. Every extraction is best
/// effort, so the empty value is a valid result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFields {
    pub genre: Option<String>,
    pub description: Option<String>,
    pub poster_img: Option<String>,
    pub cover_img: Option<String>,
    pub release_date: Option<String>,
    pub tomato_score: Option<u32>,
    pub tomato_reviews: Option<u32>,
    pub audience_score: Option<u32>,
    pub audience_ratings: Option<u32>,
    pub cast_crew: Option<Vec<CastMember>>,
}

/// Fully assembled catalog entry: a [`Stub`] merged with whatever the
/// detail page yielded. Not mutated after assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub index: u32,
    pub rating: u32,
    pub title: String,
    #[serde(default)]
    pub genre: Option<String>,
    pub year: u32,
    #[serde(default)]
    pub description: Option<String>,
    pub link: String,
    #[serde(default)]
    pub poster_img: Option<String>,
    #[serde(default)]
    pub cover_img: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub tomato_score: Option<u32>,
    #[serde(default)]
    pub tomato_reviews: Option<u32>,
    #[serde(default)]
    pub audience_score: Option<u32>,
    #[serde(default)]
    pub audience_ratings: Option<u32>,
    #[serde(default)]
    pub cast_crew: Option<Vec<CastMember>>,
}

impl MovieRecord {
    /// Second stage of the two-stage construction: merge a list-page stub
    /// with its (possibly empty) detail fields.
    pub fn assemble(stub: Stub, details: DetailFields) -> Self {
        Self {
            index: stub.index,
            rating: stub.rating,
            title: stub.title,
            genre: details.genre,
            year: stub.year,
            description: details.description,
            link: stub.link,
            poster_img: details.poster_img,
            cover_img: details.cover_img,
            release_date: details.release_date,
            tomato_score: details.tomato_score,
            tomato_reviews: details.tomato_reviews,
            audience_score: details.audience_score,
            audience_ratings: details.audience_ratings,
            cast_crew: details.cast_crew,
        }
    }
}
