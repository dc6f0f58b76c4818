// swwc.rs
// SWWC (Essential Utilities) Texas Neighborhood Dashboard: an HTML table
// with columns County, Water System Name, Detailed Neighborhood, State of
// the Neighborhood. Anything not "Good" gets reported (includes BWN,
// outage, etc).

use crate::classify;
use crate::notice::Notice;
use anyhow::Result;
use reqwest::blocking::Client;
use scraper::{Html, Selector};

const URL: &str = "https://www.swwc.com/texas/neighborhood-dashboard/";
const SOURCE: &str = "SWWC Dashboard";

pub fn scrape(client: &Client) -> Vec<Notice> {
    log::info!("Scraping SWWC Dashboard: {URL}");
    let notices = match fetch(client) {
        Ok(n) => n,
        Err(e) => {
            log::warn!("Failed to scrape SWWC Dashboard: {e}");
            Vec::new()
        }
    };
    log::info!("  SWWC Dashboard: found {} non-Good entries", notices.len());
    notices
}

fn fetch(client: &Client) -> Result<Vec<Notice>> {
    let body = client.get(URL).send()?.error_for_status()?.text()?;
    Ok(parse(&Html::parse_document(&body)))
}

pub(crate) fn parse(doc: &Html) -> Vec<Notice> {
    let table_sel = Selector::parse("table").unwrap();
    let th_sel = Selector::parse("th").unwrap();
    let tr_sel = Selector::parse("tr").unwrap();
    let td_sel = Selector::parse("td").unwrap();
    let mut notices = Vec::new();

    for table in doc.select(&table_sel) {
        let headers: Vec<String> = table
            .select(&th_sel)
            .map(|th| super::element_text(th).to_lowercase())
            .collect();
        if headers.is_empty() {
            continue;
        }

        let mut status_idx = None;
        let mut name_idx = None;
        let mut county_idx = None;
        let mut neighborhood_idx = None;
        for (i, h) in headers.iter().enumerate() {
            if h.contains("state") || h.contains("status") {
                status_idx = Some(i);
            }
            if h.contains("water system") {
                name_idx = Some(i);
            }
            if h.contains("county") {
                county_idx = Some(i);
            }
            if h.contains("neighborhood") || h.contains("detailed") {
                neighborhood_idx = Some(i);
            }
        }
        let Some(status_idx) = status_idx else {
            continue;
        };

        for row in table.select(&tr_sel).skip(1) {
            let cells: Vec<_> = row.select(&td_sel).collect();
            if cells.len() <= status_idx {
                continue;
            }

            let status_text = super::element_text(cells[status_idx]);
            if status_text.is_empty() || status_text.to_lowercase() == "good" {
                continue;
            }

            let cell = |idx: Option<usize>| {
                idx.and_then(|i| cells.get(i))
                    .map(|c| super::element_text(*c))
                    .unwrap_or_default()
            };
            let system_name = cell(name_idx);
            let county = cell(county_idx);
            let neighborhood = cell(neighborhood_idx);

            let entity_name = if system_name.is_empty() {
                neighborhood.clone()
            } else {
                system_name
            };

            notices.push(Notice {
                entity_type: classify::classify_entity(&entity_name).to_string(),
                entity_name,
                status: status_text.clone(),
                notice_text: format!("{county} - {neighborhood} - {status_text}"),
                source: SOURCE.to_string(),
                source_url: URL.to_string(),
                county: Some(county),
                neighborhood: Some(neighborhood),
                ..Notice::default()
            });
        }
    }

    notices
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <table>
          <tr>
            <th>County</th>
            <th>Water System Name</th>
            <th>Detailed Neighborhood</th>
            <th>State of the Neighborhood</th>
          </tr>
          <tr><td>Harris</td><td>Tall Timbers</td><td>Section 2</td><td>Good</td></tr>
          <tr><td>Montgomery</td><td>Rolling Hills WSC</td><td>West Side</td><td>Boil Water Notice</td></tr>
          <tr><td>Bastrop</td><td></td><td>Pine Forest</td><td>Outage</td></tr>
        </table>"#;

    #[test]
    fn reports_only_non_good_rows() {
        let notices = parse(&Html::parse_document(PAGE));
        assert_eq!(notices.len(), 2);

        assert_eq!(notices[0].entity_name, "Rolling Hills WSC");
        assert_eq!(notices[0].status, "Boil Water Notice");
        assert_eq!(notices[0].county.as_deref(), Some("Montgomery"));
        assert_eq!(notices[0].neighborhood.as_deref(), Some("West Side"));
        assert_eq!(
            notices[0].notice_text,
            "Montgomery - West Side - Boil Water Notice"
        );

        // falls back to the neighborhood when no system name is given,
        // and keeps the raw status verbatim
        assert_eq!(notices[1].entity_name, "Pine Forest");
        assert_eq!(notices[1].status, "Outage");
    }

    #[test]
    fn table_without_status_column_is_skipped() {
        let doc =
            Html::parse_document("<table><tr><th>Name</th></tr><tr><td>X</td></tr></table>");
        assert!(parse(&doc).is_empty());
    }
}
