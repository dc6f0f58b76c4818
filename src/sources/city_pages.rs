// city_pages.rs
// generic scraper for major city / utility pages: fetch each page, look
// for active boil-water wording, and pull the most specific notice text
// out of alert banners

use crate::classify;
use crate::notice::Notice;
use anyhow::Result;
use regex::Regex;
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use std::thread;
use std::time::Duration;

const SOURCE: &str = "City/Utility Website";
const FALLBACK_TEXT: &str = "Active boil water notice detected on page (see source URL)";

// Each entry: (entity name, alerts/landing page URL)
pub(crate) const CITY_UTILITY_PAGES: &[(&str, &str)] = &[
    // --- Major cities ---
    ("City of Houston", "https://www.publicworks.houstontx.gov/wss-boil-water-notice"),
    ("City of San Antonio (SAWS)", "https://www.saws.org/service-alerts/"),
    ("City of Austin", "https://www.austintexas.gov/page/boil-water-notice"),
    ("City of Dallas", "https://dallascityhall.com/departments/waterutilities/Pages/default.aspx"),
    ("City of Fort Worth", "https://www.fortworthtexas.gov/departments/water/alerts"),
    ("City of El Paso", "https://www.epwater.org/customer-service/service-alerts"),
    ("City of Arlington", "https://www.arlingtontx.gov/city_hall/departments/water_utilities"),
    ("City of Corpus Christi", "https://www.cctexas.com/water"),
    ("City of Plano", "https://www.plano.gov/431/Water-Utilities"),
    ("City of Lubbock", "https://www.mylubbock.us/departmental-websites/departments/water-department"),
    ("City of Laredo", "https://www.ci.laredo.tx.us/utilities/"),
    ("City of Amarillo", "https://www.amarillo.gov/departments/community-services/utilities-department"),
    ("City of Brownsville", "https://www.brownsvillepub.com/"),
    ("City of McAllen", "https://www.mcallen.net/utilities"),
    ("City of Killeen", "https://www.killeentexas.gov/453/Water-Notices"),
    ("City of Midland", "https://www.midlandtexas.gov/167/Reports-and-Notices"),
    ("City of Odessa", "https://odessa-tx.gov/AlertCenter.aspx"),
    ("City of Beaumont", "https://www.beaumonttexas.gov/158/Water-Utilities"),
    ("City of Round Rock", "https://www.roundrocktexas.gov/departments/utilities-and-environmental-services/"),
    ("City of Waco", "https://www.waco-texas.com/water.asp"),
    ("City of Tyler", "https://www.cityoftyler.org/government/departments/utilities"),
    ("City of San Angelo", "https://www.cosatx.us/departments-services/water-utilities"),
    ("City of College Station", "https://www.cstx.gov/departments___city_hall/water"),
    ("City of Abilene", "https://www.abilenetx.gov/water"),
    ("City of Denton", "https://www.cityofdenton.com/en-us/all-departments/administrative-services/water-utilities"),
    // --- Regional utilities ---
    ("TxWaterCo", "https://www.txwaterco.com/service-alerts"),
    ("Brownsville PUB", "https://www.brownsville-pub.com/bpub-outage-center/water-service-issues/"),
    ("ACF Water (Angelina Co FWSD)", "https://www.acfwater.org/public-notices.html"),
    // --- Water Supply Corporations ---
    ("Western Cass WSC", "https://westerncasswsc.com/alerts"),
    ("Bell-Milam-Falls WSC", "https://bellmilamfallswsc.com/alerts"),
    ("Millsap WSC", "https://millsapwatersupplycorp.com/alerts"),
    ("Staff WSC", "https://staffwsc.com/"),
    ("Bold Springs WSC", "https://boldspringswsc.com/"),
    // --- MUDs and districts ---
    ("Fort Bend County MUD 35", "https://www.fbmud35.com/alerts/"),
    ("Brazoria County MUD 22", "https://www.bcmud22.org/contact/district-alerts/"),
    ("Lakeway MUD", "https://lakewaymud.org/about-us/about-your-water/boil-water-notices/"),
    ("Cypress Creek Utility District", "https://www.cycreekud.com/water/"),
    ("West Travis County PUA", "https://www.wtcpua.org/alerts/"),
    ("Crystal Clear SUD", "https://crystalclearsud.org/alerts"),
    ("Tyler County SUD", "https://tylercountywater.com/alerts"),
];

static ALERT_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)alert|notice|warning|banner|emergency").unwrap());
static ALERT_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)alert|notice|warning|banner").unwrap());

pub fn scrape(client: &Client, delay: Duration) -> Vec<Notice> {
    log::info!("Scraping {} city/utility pages...", CITY_UTILITY_PAGES.len());
    let mut all = Vec::new();

    for &(entity_name, url) in CITY_UTILITY_PAGES {
        match fetch_page(client, entity_name, url) {
            Ok(Some(notice)) => {
                log::info!("  ACTIVE BWN: {entity_name}");
                all.push(notice);
            }
            Ok(None) => {}
            Err(e) => log::debug!("  Failed to fetch {entity_name} ({url}): {e}"),
        }
        thread::sleep(delay);
    }

    log::info!("  City/utility pages: found {} active notices", all.len());
    all
}

fn fetch_page(client: &Client, entity_name: &str, url: &str) -> Result<Option<Notice>> {
    let body = client.get(url).send()?.error_for_status()?.text()?;
    Ok(extract(&Html::parse_document(&body), entity_name, url))
}

pub(crate) fn extract(doc: &Html, entity_name: &str, url: &str) -> Option<Notice> {
    let page_text = super::document_text(doc);
    if !classify::is_active_notice(&page_text) {
        return None;
    }

    let notice_text =
        find_notice_text(doc).unwrap_or_else(|| FALLBACK_TEXT.to_string());

    Some(Notice {
        entity_name: entity_name.to_string(),
        entity_type: classify::classify_entity(entity_name).to_string(),
        status: "Active".to_string(),
        date: classify::extract_date(&notice_text),
        notice_text,
        source: SOURCE.to_string(),
        source_url: url.to_string(),
        entity_url: url.to_string(),
        ..Notice::default()
    })
}

/// Try common alert/banner container patterns first, then any paragraph
/// that reads like an active notice.
fn find_notice_text(doc: &Html) -> Option<String> {
    let container_sel = Selector::parse("div, section, aside, p, span").unwrap();

    // class-based alert containers, then role="alert", then id-based
    for el in doc.select(&container_sel) {
        if el.value().attr("class").is_some_and(|c| ALERT_CLASS.is_match(c)) {
            let text = super::element_text(el);
            if classify::is_active_notice(&text) {
                return Some(classify::clip(&text, 500).to_string());
            }
        }
    }
    for el in doc.select(&container_sel) {
        if el.value().attr("role") == Some("alert") {
            let text = super::element_text(el);
            if classify::is_active_notice(&text) {
                return Some(classify::clip(&text, 500).to_string());
            }
        }
    }
    for el in doc.select(&container_sel) {
        if el.value().attr("id").is_some_and(|i| ALERT_ID.is_match(i)) {
            let text = super::element_text(el);
            if classify::is_active_notice(&text) {
                return Some(classify::clip(&text, 500).to_string());
            }
        }
    }

    // Fallback: grab paragraphs mentioning boil water
    let para_sel = Selector::parse("p, li, div").unwrap();
    for el in doc.select(&para_sel) {
        let text = super::element_text(el);
        if classify::is_active_notice(&text) && text.len() > 20 {
            return Some(classify::clip(&text, 500).to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_page_yields_nothing() {
        let doc = Html::parse_document(
            "<html><body><p>Pay your bill. Boil Water Notice Information.</p></body></html>",
        );
        assert!(extract(&doc, "City of Waco", "https://example.com").is_none());
    }

    #[test]
    fn alert_banner_text_is_preferred() {
        let doc = Html::parse_document(
            r#"<html><body>
               <div class="emergency-banner">A boil water notice has been issued
                   for customers north of FM 1960, effective 1/10/2026.</div>
               <p>A boil water notice has been issued. See the banner above.</p>
               </body></html>"#,
        );
        let n = extract(&doc, "City of Houston", "https://example.com").unwrap();
        assert!(n.notice_text.contains("FM 1960"));
        assert_eq!(n.date, "1/10/2026");
        assert_eq!(n.entity_type, "Municipality");
    }

    #[test]
    fn role_alert_is_recognized() {
        let doc = Html::parse_document(
            r#"<div role="alert">Customers are under a boil water notice until further notice.</div>"#,
        );
        let n = extract(&doc, "Staff WSC", "https://example.com").unwrap();
        assert!(n.notice_text.contains("under a boil water"));
    }

    #[test]
    fn lifted_page_is_not_reported() {
        let doc = Html::parse_document(
            "<p>The boil water notice issued last week has been lifted. Water is safe to drink.</p>",
        );
        assert!(extract(&doc, "City of Tyler", "https://example.com").is_none());
    }
}
