use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::models::{CastMember, DetailFields};

lazy_static! {
    static ref RE_GENRES: Regex = Regex::new(r#"(?s)"metadataGenres":\[(.*?)\]"#).unwrap();
    static ref RE_THUMBNAIL: Regex = Regex::new(r#""thumbnail":\{"url":"(.*?)"\}"#).unwrap();
    static ref RE_RELEASE: Regex =
        Regex::new(r#"(?s)"metadataProps":.*?"Released ([A-Z][a-z]{1,4} \d{1,2}, \d{4})""#)
            .unwrap();
    static ref RE_PERCENT: Regex = Regex::new(r"(\d{1,3})%").unwrap();
    static ref RE_NON_DIGIT: Regex = Regex::new(r"\D").unwrap();
}

/// Extracts the optional fields of one detail page. Every region is
/// attempted in isolation: one broken pattern leaves the other fields
/// untouched, and a page that matches nothing yields the default value.
pub fn extract_details(html: &str) -> DetailFields {
    let doc = Html::parse_document(html);

    let mut details = DetailFields {
        poster_img: poster_img(&doc),
        description: description(&doc),
        genre: genre(html),
        cast_crew: cast_crew(&doc),
        ..Default::default()
    };

    // Cover image and release date share the media-hero JSON block but
    // may be absent independently.
    if let Some(block) = media_hero_json(&doc) {
        details.cover_img = capture(&RE_THUMBNAIL, &block);
        details.release_date = capture(&RE_RELEASE, &block);
    }

    scores(&doc, &mut details);

    details
}

/// First social-preview meta image.
fn poster_img(doc: &Html) -> Option<String> {
    let sel = Selector::parse(r#"meta[property="og:image"]"#).unwrap();
    let content = doc.select(&sel).next()?.value().attr("content")?;
    non_empty(content.trim().to_string())
}

/// First description slot; nested markup is dropped by taking only the
/// text nodes.
fn description(doc: &Html) -> Option<String> {
    let sel = Selector::parse(r#"div[slot="description"] rt-text[slot="content"]"#).unwrap();
    let el = doc.select(&sel).next()?;
    non_empty(text_of(el).trim().to_string())
}

/// The genre list appears as a JSON-ish array in page metadata. Tokens
/// come out lowercased and comma-joined without internal whitespace,
/// e.g. `"Sci-Fi", "Adventure"` -> `sci-fi,adventure`.
fn genre(html: &str) -> Option<String> {
    let raw = RE_GENRES.captures(html)?[1].to_string();
    non_empty(raw.replace('"', "").replace(", ", ",").to_lowercase())
}

fn media_hero_json(doc: &Html) -> Option<String> {
    let sel = Selector::parse(r#"script#media-hero-json[data-json="mediaHero"]"#).unwrap();
    doc.select(&sel).next().map(text_of)
}

/// Critic and audience figures share the score-widget region; each of
/// the four values may still be absent on its own.
fn scores(doc: &Html, details: &mut DetailFields) {
    let scorecard_sel = Selector::parse("media-scorecard").unwrap();
    let Some(scorecard) = doc.select(&scorecard_sel).next() else {
        return;
    };
    details.tomato_score = percent_in(scorecard, r#"rt-text[slot="criticsScore"]"#);
    details.tomato_reviews = count_in(scorecard, r#"rt-link[slot="criticsReviews"]"#);
    details.audience_score = percent_in(scorecard, r#"rt-text[slot="audienceScore"]"#);
    details.audience_ratings = count_in(scorecard, r#"rt-link[slot="audienceReviews"]"#);
}

/// Names drive the cast list length; a role or image missing at some
/// position stays `None` instead of aborting the zip. Returns `Some`
/// whenever the cast section exists, even with nothing under it.
fn cast_crew(doc: &Html) -> Option<Vec<CastMember>> {
    let section_sel = Selector::parse(r#"section[aria-labelledby="cast-and-crew-label"]"#).unwrap();
    let name_sel = Selector::parse(r#"p[data-qa="person-name"]"#).unwrap();
    let role_sel = Selector::parse(r#"p[data-qa="person-role"]"#).unwrap();
    let img_sel = Selector::parse("rt-img").unwrap();

    let section = doc.select(&section_sel).next()?;

    let names: Vec<String> = section
        .select(&name_sel)
        .map(|el| text_of(el).trim().to_string())
        .collect();
    let roles: Vec<String> = section
        .select(&role_sel)
        .map(|el| text_of(el).trim().to_string())
        .collect();
    let imgs: Vec<String> = section
        .select(&img_sel)
        .filter_map(|el| el.value().attr("src"))
        .map(|src| src.trim().to_string())
        .collect();

    let members = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| CastMember {
            name,
            role: roles.get(i).cloned().and_then(non_empty),
            img: imgs.get(i).cloned().and_then(non_empty),
        })
        .collect();
    Some(members)
}

fn percent_in(region: ElementRef, selector: &str) -> Option<u32> {
    let sel = Selector::parse(selector).unwrap();
    let text = text_of(region.select(&sel).next()?);
    RE_PERCENT.captures(&text)?[1].parse().ok()
}

/// Review counts are rendered with labels and thousands separators;
/// everything that isn't a digit goes.
fn count_in(region: ElementRef, selector: &str) -> Option<u32> {
    let sel = Selector::parse(selector).unwrap();
    let text = text_of(region.select(&sel).next()?);
    RE_NON_DIGIT.replace_all(&text, "").parse().ok()
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|c| c[1].trim().to_string())
}

fn text_of(el: ElementRef) -> String {
    el.text().collect::<String>()
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}
