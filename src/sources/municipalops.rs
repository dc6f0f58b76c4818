// municipalops.rs
// MunicipalOps.com status page: aggregator for ~100+ Houston-area
// MUDs/districts. Structure: <h4> section headers, <ul><li> entries with
// district links and status text like "Boil water notice ... as of MM-DD-YY"

use crate::classify;
use crate::notice::Notice;
use anyhow::Result;
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use url::Url;

const URL: &str = "https://municipalops.com/status/";
const SOURCE: &str = "MunicipalOps";

pub fn scrape(client: &Client) -> Vec<Notice> {
    log::info!("Scraping MunicipalOps: {URL}");
    let notices = match fetch(client) {
        Ok(n) => n,
        Err(e) => {
            log::warn!("Failed to scrape MunicipalOps: {e}");
            Vec::new()
        }
    };
    log::info!("  MunicipalOps: found {} active notices", notices.len());
    notices
}

fn fetch(client: &Client) -> Result<Vec<Notice>> {
    let body = client.get(URL).send()?.error_for_status()?.text()?;
    Ok(parse(&Html::parse_document(&body)))
}

pub(crate) fn parse(doc: &Html) -> Vec<Notice> {
    let heading_sel = Selector::parse("h3, h4").unwrap();
    let li_sel = Selector::parse("li").unwrap();
    let a_sel = Selector::parse("a").unwrap();
    let mut notices = Vec::new();

    // Find the BWN section by heading text, then walk siblings until the
    // next heading to find the list.
    for heading in doc.select(&heading_sel) {
        let heading_text = super::element_text(heading).to_lowercase();
        if !heading_text.contains("boil water") {
            continue;
        }

        for sibling in super::following_elements(heading) {
            let name = sibling.value().name();
            if name == "h3" || name == "h4" {
                break;
            }
            if name != "ul" {
                continue;
            }
            for li in sibling.select(&li_sel) {
                let text = super::element_text(li);
                let link = li.select(&a_sel).next();
                let entity_name = link.map(super::element_text).unwrap_or_default();
                let mut entity_url = link
                    .and_then(|a| a.value().attr("href"))
                    .unwrap_or_default()
                    .to_string();
                if !entity_url.is_empty() && !entity_url.starts_with("http") {
                    if let Ok(joined) = Url::parse(URL).and_then(|base| base.join(&entity_url)) {
                        entity_url = joined.to_string();
                    }
                }

                let lower = text.to_lowercase();
                if classify::is_active_notice(&text) {
                    notices.push(entry(&entity_name, "Active", &text, entity_url));
                } else if lower.contains("rescind") || lower.contains("lifted") {
                    log::info!("  [Rescinded] {entity_name}: {}", classify::clip(&text, 80));
                } else if lower.contains("boil water notice") && lower.contains("as of") {
                    // Possibly active: mentions a boil water notice in a way
                    // that suggests it is still standing.
                    notices.push(entry(&entity_name, "Possibly Active", &text, entity_url));
                }
            }
        }
    }

    notices
}

fn entry(entity_name: &str, status: &str, text: &str, entity_url: String) -> Notice {
    Notice {
        entity_name: entity_name.to_string(),
        entity_type: classify::classify_entity(entity_name).to_string(),
        status: status.to_string(),
        notice_text: text.to_string(),
        date: classify::extract_date(text),
        source: SOURCE.to_string(),
        source_url: URL.to_string(),
        entity_url,
        ..Notice::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <h4>Boil Water Notices</h4>
        <ul>
          <li><a href="/districts/mud5">Harris County MUD 5</a>
              Boil water notice is in effect as of 01-10-26</li>
          <li><a href="/districts/mud9">Harris County MUD 9</a>
              Boil water notice rescinded 01-08-26</li>
          <li><a href="https://example.com/wcid">Galveston County WCID 1</a>
              Boil water notice as of 01-12-26</li>
        </ul>
        <h4>Other Outages</h4>
        <ul>
          <li><a href="/districts/mud7">Harris County MUD 7</a>
              Boil water notice is in effect as of 01-11-26</li>
        </ul>
        </body></html>"#;

    #[test]
    fn parses_active_and_possibly_active_entries() {
        let notices = parse(&Html::parse_document(PAGE));
        assert_eq!(notices.len(), 2);

        assert_eq!(notices[0].entity_name, "Harris County MUD 5");
        assert_eq!(notices[0].status, "Active");
        assert_eq!(notices[0].date, "01-10-26");
        assert_eq!(notices[0].entity_url, "https://municipalops.com/districts/mud5");
        assert_eq!(notices[0].entity_type, "Municipal Utility District (MUD)");

        // no active phrase, but "boil water notice ... as of"
        assert_eq!(notices[1].entity_name, "Galveston County WCID 1");
        assert_eq!(notices[1].status, "Possibly Active");
        assert_eq!(notices[1].entity_url, "https://example.com/wcid");
    }

    #[test]
    fn stops_at_the_next_section_heading() {
        let notices = parse(&Html::parse_document(PAGE));
        assert!(notices.iter().all(|n| n.entity_name != "Harris County MUD 7"));
    }

    #[test]
    fn page_without_bwn_section_yields_nothing() {
        let doc = Html::parse_document("<h4>Outages</h4><ul><li>none</li></ul>");
        assert!(parse(&doc).is_empty());
    }
}
