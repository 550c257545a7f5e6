use lazy_static::lazy_static;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::models::Stub;

lazy_static! {
    static ref RE_PERCENT: Regex = Regex::new(r"(\d{1,3})%").unwrap();
    static ref RE_YEAR: Regex = Regex::new(r"\b(\d{4})\b").unwrap();
}

struct RowSelectors {
    cell: Selector,
    score: Selector,
    details: Selector,
    anchor: Selector,
}

impl RowSelectors {
    fn new() -> Self {
        Self {
            cell: Selector::parse("td").unwrap(),
            score: Selector::parse("span.score").unwrap(),
            details: Selector::parse("span.details").unwrap(),
            anchor: Selector::parse("a").unwrap(),
        }
    }
}

/// Extracts the ranked stubs from the list page, in source row order.
/// Rows missing any required token are skipped, never fatal; the caller
/// decides what zero surviving rows means.
pub fn extract_stubs(html: &str) -> Vec<Stub> {
    let doc = Html::parse_document(html);
    let row_sel = Selector::parse("tr").unwrap();
    let sel = RowSelectors::new();

    let mut stubs = Vec::new();
    for row in doc.select(&row_sel) {
        match stub_from_row(row, &sel) {
            Some(stub) => stubs.push(stub),
            None => log::debug!("skipping unparsable list row"),
        }
    }
    stubs
}

/// One row must yield, in nested order: an index cell, a rating cell
/// holding a percentage, and a details region with an anchor and a
/// 4-digit year.
fn stub_from_row(row: ElementRef, sel: &RowSelectors) -> Option<Stub> {
    let mut cells = row.select(&sel.cell);
    let index_cell = cells.next()?;
    let body_cell = cells.next()?;

    // The source renders indexes as "1." style decimals.
    let index = text_of(index_cell).trim().parse::<f64>().ok()? as u32;

    let score_text = text_of(body_cell.select(&sel.score).next()?);
    let rating = RE_PERCENT.captures(&score_text)?[1].parse().ok()?;

    let details = body_cell.select(&sel.details).next()?;
    let anchor = details.select(&sel.anchor).next()?;
    let title = text_of(anchor).trim().to_string();
    if title.is_empty() {
        return None;
    }
    let link = anchor.value().attr("href")?.trim().to_string();

    let details_text = text_of(details);
    let year = RE_YEAR.captures(&details_text)?[1].parse().ok()?;

    Some(Stub {
        index,
        rating,
        title,
        year,
        link,
    })
}

fn text_of(el: ElementRef) -> String {
    el.text().collect::<String>()
}
