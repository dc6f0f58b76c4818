// bing_news.rs
// Bing News search, sorted by date: a statewide catch-all for BWN
// announcements the dedicated pages miss. Bing is more permissive for
// programmatic access than Google.

use crate::classify;
use crate::notice::Notice;
use anyhow::Result;
use regex::Regex;
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use std::thread;
use std::time::Duration;

const SOURCE: &str = "Bing News";
const QUERIES: &[&str] = &[
    r#""boil water notice" texas"#,
    r#""boil water advisory" texas"#,
];

static CARD_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)news-card|newsitem").unwrap());
static TITLE_CLASS: LazyLock<Regex> = LazyLock::new(|| Regex::new("(?i)title").unwrap());
static ATTRIBUTION_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)source|time|date").unwrap());

pub fn scrape(client: &Client, delay: Duration) -> Vec<Notice> {
    log::info!("Searching Bing News for active TX boil water notices...");
    let mut notices = Vec::new();
    let mut seen_titles = HashSet::new();

    for &query in QUERIES {
        match fetch(client, query) {
            Ok(doc) => parse(&doc, &mut seen_titles, &mut notices),
            Err(e) => log::debug!("  Bing News search failed for '{query}': {e}"),
        }
        thread::sleep(delay);
    }

    // Deduplicate by entity name, first mention wins
    let mut seen = HashSet::new();
    let notices: Vec<Notice> = notices
        .into_iter()
        .filter(|n| seen.insert(n.entity_name.to_lowercase()))
        .collect();

    log::info!("  Bing News: found {} recent BWN mentions", notices.len());
    notices
}

fn fetch(client: &Client, query: &str) -> Result<Html> {
    let body = client
        .get("https://www.bing.com/news/search")
        .query(&[("q", query), ("qft", "sortbydate=\"1\""), ("form", "YFNR")])
        .send()?
        .error_for_status()?
        .text()?;
    Ok(Html::parse_document(&body))
}

pub(crate) fn parse(doc: &Html, seen_titles: &mut HashSet<String>, notices: &mut Vec<Notice>) {
    let div_sel = Selector::parse("div").unwrap();
    let a_sel = Selector::parse("a").unwrap();
    let span_sel = Selector::parse("span").unwrap();

    // Bing News: <div class="news-card"> with <a class="title">
    for card in doc.select(&div_sel) {
        if !card.value().attr("class").is_some_and(|c| CARD_CLASS.is_match(c)) {
            continue;
        }
        let title_el = card
            .select(&a_sel)
            .find(|a| a.value().attr("class").is_some_and(|c| TITLE_CLASS.is_match(c)))
            .or_else(|| card.select(&a_sel).next());
        let Some(title_el) = title_el else {
            continue;
        };

        let title = super::element_text(title_el);
        if title.is_empty() || !seen_titles.insert(title.clone()) {
            continue;
        }

        let lower = title.to_lowercase();
        if !["boil water", "water advisory", "do not use"]
            .iter()
            .any(|k| lower.contains(k))
        {
            continue;
        }
        if classify::mentions_lifted(&title) {
            continue;
        }

        let href = title_el.value().attr("href").unwrap_or_default().to_string();
        // Date from source attribution
        let date = card
            .select(&span_sel)
            .find(|s| {
                s.value()
                    .attr("class")
                    .is_some_and(|c| ATTRIBUTION_CLASS.is_match(c))
            })
            .map(super::element_text)
            .unwrap_or_default();

        notices.push(headline_notice(&title, href, date));
    }

    // Also try the simpler list format Bing sometimes uses
    for a in doc.select(&a_sel) {
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        let title = super::element_text(a);
        if title.is_empty() || title.len() < 20 || seen_titles.contains(&title) {
            continue;
        }
        let lower = title.to_lowercase();
        if !["boil water notice", "boil water advisory"]
            .iter()
            .any(|k| lower.contains(k))
        {
            continue;
        }
        if classify::mentions_lifted(&title) {
            continue;
        }
        if !lower.contains("texas") && !lower.contains("tx") {
            // Check parent context for a Texas mention
            let parent_text = a
                .parent()
                .and_then(ElementRef::wrap)
                .map(super::element_text)
                .unwrap_or_default()
                .to_lowercase();
            if !parent_text.contains("texas") && !parent_text.contains("tx") {
                continue;
            }
        }

        seen_titles.insert(title.clone());
        notices.push(headline_notice(&title, href.to_string(), String::new()));
    }
}

fn headline_notice(title: &str, href: String, date: String) -> Notice {
    let entity = classify::entity_from_headline(title);
    Notice {
        entity_name: entity
            .clone()
            .unwrap_or_else(|| "Unknown (see headline)".to_string()),
        entity_type: entity
            .as_deref()
            .map_or("Unknown", classify::classify_entity)
            .to_string(),
        status: "Reported Active (News)".to_string(),
        notice_text: title.to_string(),
        date,
        source: SOURCE.to_string(),
        source_url: href,
        ..Notice::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <div class="news-card">
          <a class="title" href="https://news.example.com/palestine">
            City of Palestine issues boil water notice after main break</a>
          <span class="source">KETK - 2 hours ago</span>
        </div>
        <div class="news-card">
          <a class="title" href="https://news.example.com/lifted">
            Boil water notice lifted for City of Marshall</a>
        </div>
        <div class="news-card">
          <a class="title" href="https://news.example.com/football">
            Friday night football scores</a>
        </div>"#;

    #[test]
    fn news_cards_are_filtered_and_parsed() {
        let mut seen = HashSet::new();
        let mut notices = Vec::new();
        parse(&Html::parse_document(PAGE), &mut seen, &mut notices);

        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].entity_name, "Palestine");
        assert_eq!(notices[0].status, "Reported Active (News)");
        assert_eq!(notices[0].source_url, "https://news.example.com/palestine");
        assert_eq!(notices[0].date, "KETK - 2 hours ago");
    }

    #[test]
    fn plain_link_needs_a_texas_mention() {
        let page = r#"
            <div><a href="https://x.example/1">Boil water notice issued for city residents</a></div>
            <div>Texas <a href="https://x.example/2">Boil water advisory covers several neighborhoods</a></div>"#;
        let mut seen = HashSet::new();
        let mut notices = Vec::new();
        parse(&Html::parse_document(page), &mut seen, &mut notices);

        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].source_url, "https://x.example/2");
    }

    #[test]
    fn duplicate_titles_are_reported_once() {
        let mut seen = HashSet::new();
        let mut notices = Vec::new();
        let doc = Html::parse_document(PAGE);
        parse(&doc, &mut seen, &mut notices);
        parse(&doc, &mut seen, &mut notices);
        assert_eq!(notices.len(), 1);
    }
}
