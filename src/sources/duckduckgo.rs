// duckduckgo.rs
// DuckDuckGo's HTML-only endpoint: a scraper-friendly (no JS) backup web
// search for active BWN pages the other sources miss

use crate::classify;
use crate::notice::Notice;
use anyhow::Result;
use chrono::{Datelike, Local};
use reqwest::blocking::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::thread;
use std::time::Duration;

const SOURCE: &str = "DuckDuckGo";

fn queries() -> [String; 2] {
    let year = Local::now().year();
    [
        format!(r#""boil water notice" texas {year}"#),
        format!(r#""boil water advisory" texas {year}"#),
    ]
}

pub fn scrape(client: &Client, delay: Duration) -> Vec<Notice> {
    log::info!("Searching DuckDuckGo for active TX boil water notices...");
    let mut notices = Vec::new();
    let mut seen = HashSet::new();

    for query in queries() {
        match fetch(client, &query) {
            Ok(doc) => notices.extend(parse(&doc, &mut seen)),
            Err(e) => log::debug!("  DuckDuckGo search failed for '{query}': {e}"),
        }
        thread::sleep(delay);
    }

    log::info!("  DuckDuckGo: found {} results", notices.len());
    notices
}

fn fetch(client: &Client, query: &str) -> Result<Html> {
    let body = client
        .get("https://html.duckduckgo.com/html/")
        .query(&[("q", query)])
        .send()?
        .error_for_status()?
        .text()?;
    Ok(Html::parse_document(&body))
}

pub(crate) fn parse(doc: &Html, seen: &mut HashSet<String>) -> Vec<Notice> {
    // DDG HTML results: <div class="result"> with <a class="result__a">
    // and a result__snippet element
    let result_sel = Selector::parse("div.result").unwrap();
    let title_sel = Selector::parse("a.result__a").unwrap();
    let snippet_sel = Selector::parse("a.result__snippet, div.result__snippet").unwrap();
    let mut notices = Vec::new();

    for result in doc.select(&result_sel) {
        let Some(title_el) = result.select(&title_sel).next() else {
            continue;
        };
        let title = super::element_text(title_el);
        let href = title_el.value().attr("href").unwrap_or_default();
        let snippet = result
            .select(&snippet_sel)
            .next()
            .map(super::element_text)
            .unwrap_or_default();

        let combined = format!("{title} {snippet}").to_lowercase();
        if !["boil water", "water advisory"].iter().any(|k| combined.contains(k)) {
            continue;
        }
        if classify::mentions_lifted(&combined) {
            continue;
        }
        if !seen.insert(href.to_string()) {
            continue;
        }

        let entity = classify::entity_from_headline(&title);
        notices.push(Notice {
            entity_name: entity
                .clone()
                .unwrap_or_else(|| classify::clip(&title, 60).to_string()),
            entity_type: entity
                .as_deref()
                .map_or("Unknown", classify::classify_entity)
                .to_string(),
            status: "Reported Active (Web)".to_string(),
            notice_text: format!("{title}. {}", classify::clip(&snippet, 200)),
            date: classify::extract_date(&snippet),
            source: SOURCE.to_string(),
            source_url: href.to_string(),
            entity_url: href.to_string(),
            ..Notice::default()
        });
    }

    notices
}
