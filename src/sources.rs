// sources.rs
// one submodule per scraped site; each exposes scrape(..) -> Vec<Notice>
// and never aborts the run (a failed source logs a warning and yields
// nothing)

use scraper::{ElementRef, Html};

pub mod bing_news;
pub mod city_pages;
pub mod consolidated_wsc;
pub mod duckduckgo;
pub mod municipalops;
pub mod swwc;

/// Visible text of an element, whitespace-normalized.
pub(crate) fn element_text(el: ElementRef) -> String {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Visible text of the whole document.
pub(crate) fn document_text(doc: &Html) -> String {
    element_text(doc.root_element())
}

/// Element siblings following `el`, in document order.
pub(crate) fn following_elements<'a>(
    el: ElementRef<'a>,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    el.next_siblings().filter_map(ElementRef::wrap)
}
