// consolidated_wsc.rs
// Consolidated WSC alerts page (East Texas): <h2>/<h3> headings like
// "Boil Water Notice 1130033 - Oak Grove Area" followed by paragraphs
// with dates and affected locations.

use crate::classify;
use crate::notice::Notice;
use anyhow::Result;
use regex::Regex;
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use std::sync::LazyLock;

const URL: &str = "https://consolidatedwsc.com/alerts";
const SOURCE: &str = "Consolidated WSC";

// "Notice XXXX - Area Name" first, then any "- Area Name" tail
static AREA_AFTER_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\s*[-–]\s*(.+?)(?:\s+Area)?$").unwrap());
static AREA_AFTER_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-–]\s*(.+?)(?:\s+Area)?$").unwrap());

pub fn scrape(client: &Client) -> Vec<Notice> {
    log::info!("Scraping Consolidated WSC: {URL}");
    let notices = match fetch(client) {
        Ok(n) => n,
        Err(e) => {
            log::warn!("Failed to scrape Consolidated WSC: {e}");
            Vec::new()
        }
    };
    log::info!("  Consolidated WSC: found {} active notices", notices.len());
    notices
}

fn fetch(client: &Client) -> Result<Vec<Notice>> {
    let body = client.get(URL).send()?.error_for_status()?.text()?;
    Ok(parse(&Html::parse_document(&body)))
}

pub(crate) fn parse(doc: &Html) -> Vec<Notice> {
    let heading_sel = Selector::parse("h2, h3, h4").unwrap();
    let mut notices = Vec::new();

    for heading in doc.select(&heading_sel) {
        let text = super::element_text(heading);
        let lower = text.to_lowercase();
        if !lower.contains("boil water") {
            continue;
        }
        // Skip generic section headers like "Boil Water Advisories"
        if matches!(
            lower.trim(),
            "boil water advisories" | "boil water notices" | "boil water"
        ) {
            continue;
        }
        if lower.contains("rescind") {
            continue;
        }

        let area_name = AREA_AFTER_NUMBER
            .captures(&text)
            .or_else(|| AREA_AFTER_DASH.captures(&text))
            .map_or_else(|| text.clone(), |c| c[1].trim().to_string());

        // Gather detail from following paragraphs, up to the next heading
        let mut detail_parts = Vec::new();
        for sibling in super::following_elements(heading) {
            if matches!(sibling.value().name(), "h2" | "h3" | "h4") {
                break;
            }
            let sib_text = super::element_text(sibling);
            if !sib_text.is_empty() {
                detail_parts.push(sib_text);
            }
        }
        let detail = detail_parts.join(" ");

        let date = match classify::extract_date(&detail) {
            d if d.is_empty() => classify::extract_date(&text),
            d => d,
        };

        // Skip if explicitly rescinded
        let combined = format!("{text} {detail}");
        if classify::mentions_lifted(&combined) {
            log::info!("  [Lifted] Consolidated WSC: {}", classify::clip(&text, 80));
            continue;
        }

        notices.push(Notice {
            entity_name: format!("Consolidated WSC - {area_name}"),
            entity_type: "Water Supply Corporation (WSC)".to_string(),
            status: "Active".to_string(),
            notice_text: format!("{text}. {}", classify::clip(&detail, 300)),
            date,
            source: SOURCE.to_string(),
            source_url: URL.to_string(),
            entity_url: URL.to_string(),
            ..Notice::default()
        });
    }

    notices
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <h2>Boil Water Notices</h2>
        <h3>Boil Water Notice 1130033 - Oak Grove Area</h3>
        <p>Issued January 10, 2026 due to a line break.</p>
        <p>Affected: CR 2110, CR 2115.</p>
        <h3>Boil Water Notice 1130034 - Tadmor Area</h3>
        <p>This notice was rescinded and is no longer in effect.</p>
        <h3>Rescinded Boil Water Notice - Pine Mountain</h3>
        <p>All clear.</p>"#;

    #[test]
    fn extracts_area_and_detail() {
        let notices = parse(&Html::parse_document(PAGE));
        assert_eq!(notices.len(), 1);
        let n = &notices[0];
        assert_eq!(n.entity_name, "Consolidated WSC - Oak Grove");
        assert_eq!(n.status, "Active");
        assert_eq!(n.date, "January 10, 2026");
        assert!(n.notice_text.contains("CR 2110"));
    }

    #[test]
    fn generic_section_heading_is_not_a_notice() {
        let doc = Html::parse_document("<h2>Boil Water Advisories</h2><p>none</p>");
        assert!(parse(&doc).is_empty());
    }
}
