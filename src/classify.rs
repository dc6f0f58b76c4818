// classify.rs
// text heuristics: deciding whether free-form text describes an ACTIVE
// boil water notice, and pulling dates / entity names / place names out
// of it

use regex::Regex;
use std::sync::LazyLock;

// Phrases that signal an ACTIVE boil water notice (case-insensitive).
// These are intentionally specific to avoid false positives from pages
// that merely link to "Boil Water Notice Information" etc.
const ACTIVE_PHRASES: &[&str] = &[
    "boil water notice issued",
    "boil water notice is in effect",
    "boil water notice has been issued",
    "boil water advisory issued",
    "boil water advisory is in effect",
    "boil water advisory has been issued",
    "under a boil water",
    "subject to a boil water",
    "customers should boil",
    "advised to boil",
    "must boil water",
    "must boil all water",
    "boil your water",
    "boil all water",
    "do not use water",
    "do not consume water",
    "do not drink the water",
    "unsafe to drink",
    "until further notice",
    "precautionary boil",
    "due to a line break",
    "due to a water line",
    "due to loss of pressure",
    "low pressure",
];

// Keywords that signal the notice has been LIFTED / is no longer active
pub(crate) const LIFTED_KEYWORDS: &[&str] = &[
    "rescind",
    "lifted",
    "no longer in effect",
    "has been cancelled",
    "has been canceled",
    "all clear",
    "safe to drink",
    "notice is over",
    "no active",
    "no current",
    "not currently under",
    "no boil water",
    "there are no",
];

/// True if `text` describes an active boil water notice.
pub fn is_active_notice(text: &str) -> bool {
    let lower = text.to_lowercase();
    let has_bwn = ACTIVE_PHRASES.iter().any(|p| lower.contains(p));
    let is_lifted = LIFTED_KEYWORDS.iter().any(|k| lower.contains(k));
    has_bwn && !is_lifted
}

/// True if `text` mentions the notice being rescinded or lifted.
pub fn mentions_lifted(text: &str) -> bool {
    let lower = text.to_lowercase();
    LIFTED_KEYWORDS.iter().any(|k| lower.contains(k))
}

static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(\d{1,2}/\d{1,2}/\d{2,4})",
        r"(\d{1,2}-\d{1,2}-\d{2,4})",
        r"(?i)((?:January|February|March|April|May|June|July|August|September|October|November|December)\s+\d{1,2},?\s+\d{4})",
        r"(?i)((?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\.?\s+\d{1,2},?\s+\d{4})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Try to pull a date out of free-form text. Empty string when none found.
pub fn extract_date(text: &str) -> String {
    for pat in DATE_PATTERNS.iter() {
        if let Some(c) = pat.captures(text) {
            return c[1].trim().to_string();
        }
    }
    String::new()
}

/// Classify the kind of water entity from its name.
pub fn classify_entity(name: &str) -> &'static str {
    let upper = name.to_uppercase();
    if upper.contains("MUD") || upper.contains("MUNICIPAL UTILITY") || upper.contains("M.U.D.") {
        return "Municipal Utility District (MUD)";
    }
    if upper.contains("WSC") || upper.contains("WATER SUPPLY CORP") {
        return "Water Supply Corporation (WSC)";
    }
    if upper.contains("SUD") || upper.contains("SPECIAL UTILITY") {
        return "Special Utility District (SUD)";
    }
    if upper.contains("WCID") || upper.contains("WATER CONTROL") {
        return "Water Control & Improvement District (WCID)";
    }
    if upper.contains("FWSD") || upper.contains("FRESH WATER") {
        return "Fresh Water Supply District (FWSD)";
    }
    if upper.contains("PUD") || upper.contains("PUBLIC UTILITY") {
        return "Public Utility District (PUD)";
    }
    if ["CITY OF", "TOWN OF", "VILLAGE OF"].iter().any(|x| upper.contains(x)) {
        return "Municipality";
    }
    if upper.contains("COUNTY") {
        return "County";
    }
    if upper.contains("RURAL WATER") {
        return "Rural Water System";
    }
    if upper.contains("WATER DISTRICT") {
        return "Water District";
    }
    if upper.contains("WATER AUTH") {
        return "Water Authority";
    }
    if upper.contains("RIVER AUTH") {
        return "River Authority";
    }
    "Water System"
}

static HEADLINE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "City of X issues/under/lifts..."
        r"(?i)(?:City of|Town of|Village of)\s+([A-Z][a-zA-Z\s]+?)(?:\s+(?:issues?|under|lifts?|rescinds?|residents?|customers?|has))",
        // "X MUD 123"
        r"(?i)([A-Z][a-zA-Z\s]+?)\s+(?:MUD|M\.U\.D\.)\s*\d*",
        // "X WSC / Water Supply"
        r"(?i)([A-Z][a-zA-Z\s]+?)\s+(?:WSC|Water Supply)",
        // "X residents under / advised"
        r"(?i)([A-Z][a-zA-Z\s]+?)\s+(?:residents?|customers?|area)\s+(?:under|advised|told|issued)",
        // "boil water notice issued for X" / "boil water notice for X"
        r"(?i)(?:boil water (?:notice|advisory)\s+(?:issued\s+)?(?:for|in)\s+)(?:some\s+|parts?\s+of\s+)?([A-Z][a-zA-Z\s]+?)(?:\s*[,;.]|\s+(?:after|due|following|residents?))",
        // "... notice for some X residents"
        r"(?i)(?:notice|advisory)\s+(?:issued\s+)?for\s+(?:some\s+)?([A-Z][a-zA-Z\s]+?)\s+residents?",
        // "... notice issued in X"
        r"(?i)(?:notice|advisory)\s+issued\s+(?:in|for)\s+(?:parts?\s+of\s+)?([A-Z][a-zA-Z\s]+?)(?:\s+(?:after|due|following|,|$))",
        // "... for customers in X"
        r"(?i)for\s+(?:customers|residents|people)\s+in\s+([A-Z][a-zA-Z\s]+?)(?:\s*$|\s*[,;.])",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static LEADING_QUALIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:some|parts?\s+of)\s+").unwrap());

const HEADLINE_STOPWORDS: &[&str] = &[
    "texas", "the", "all", "some", "many", "parts", "several", "multiple",
    "in", "for", "after", "due", "following", "certain", "select",
];

/// Try to extract a water-entity name from a news headline.
pub fn entity_from_headline(headline: &str) -> Option<String> {
    for pat in HEADLINE_PATTERNS.iter() {
        if let Some(c) = pat.captures(headline) {
            let name = LEADING_QUALIFIER.replace(c[1].trim(), "");
            let name = name.trim();
            if name.len() > 2 && !HEADLINE_STOPWORDS.contains(&name.to_lowercase().as_str()) {
                return Some(name.to_string());
            }
        }
    }
    None
}

static NOTICE_NUMBER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Boil Water (?:Notice|Advisory)\s*\d*\s*[-–]?\s*").unwrap()
});

static DISTRICT_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\s+(?:Area|WSC|MUD|SUD|WCID|FWSD|PUD|PUA|Water Supply.*|Municipal Utility.*|Special Utility.*)$",
    )
    .unwrap()
});

static TRAILING_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+\d+$").unwrap());

/// Reduce an entity name to a likely place name for geocoding.
pub fn place_name(entity_name: &str) -> String {
    let mut name = entity_name;
    for prefix in ["Consolidated WSC - ", "City of ", "Town of ", "Village of "] {
        if let Some(rest) = name.strip_prefix(prefix) {
            name = rest;
        }
    }
    let name = NOTICE_NUMBER_PREFIX.replace_all(name, "");
    let name = DISTRICT_SUFFIX.replace_all(&name, "");
    let name = TRAILING_NUMBER.replace_all(&name, "");
    name.trim().to_string()
}

/// Clip a string to at most `max` characters without splitting a char.
pub fn clip(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_phrase_without_lifted_keyword_is_active() {
        assert!(is_active_notice(
            "A boil water notice is in effect for customers on Elm St."
        ));
        assert!(is_active_notice("Residents are ADVISED TO BOIL their water."));
    }

    #[test]
    fn lifted_keyword_overrides_active_phrase() {
        assert!(!is_active_notice(
            "The boil water notice issued on Jan 5 has been lifted."
        ));
        assert!(!is_active_notice(
            "Boil water advisory is in effect... UPDATE: water is safe to drink."
        ));
    }

    #[test]
    fn plain_text_is_not_active() {
        assert!(!is_active_notice("Pay your water bill online."));
        // a bare link label must not count as an active notice
        assert!(!is_active_notice("Boil Water Notice Information"));
    }

    #[test]
    fn date_extraction_tries_patterns_in_order() {
        assert_eq!(extract_date("issued 1/5/2026 at noon"), "1/5/2026");
        assert_eq!(extract_date("as of 01-05-26"), "01-05-26");
        assert_eq!(extract_date("issued January 5, 2026"), "January 5, 2026");
        assert_eq!(extract_date("issued Jan. 5 2026"), "Jan. 5 2026");
        assert_eq!(extract_date("no date here"), "");
    }

    #[test]
    fn entity_classification() {
        assert_eq!(
            classify_entity("Fort Bend County MUD 35"),
            "Municipal Utility District (MUD)"
        );
        assert_eq!(
            classify_entity("Western Cass WSC"),
            "Water Supply Corporation (WSC)"
        );
        assert_eq!(classify_entity("City of Houston"), "Municipality");
        assert_eq!(classify_entity("Crystal Clear SUD"), "Special Utility District (SUD)");
        assert_eq!(classify_entity("Somewhere Utilities"), "Water System");
    }

    #[test]
    fn headline_entity_extraction() {
        assert_eq!(
            entity_from_headline("City of Palestine issues boil water notice"),
            Some("Palestine".to_string())
        );
        assert_eq!(
            entity_from_headline("Harris County MUD 61 under boil water notice"),
            Some("Harris County".to_string())
        );
        assert_eq!(
            entity_from_headline("Boil water notice for Sonora, after main break"),
            Some("Sonora".to_string())
        );
        assert_eq!(entity_from_headline("Texas weather update"), None);
    }

    #[test]
    fn place_name_reduction() {
        assert_eq!(place_name("City of Houston"), "Houston");
        assert_eq!(place_name("Consolidated WSC - Oak Grove Area"), "Oak Grove");
        assert_eq!(place_name("Lakeway MUD"), "Lakeway");
        assert_eq!(place_name("Boil Water Notice 1130033 - Deadwood"), "Deadwood");
    }

    #[test]
    fn clip_respects_char_boundaries() {
        assert_eq!(clip("hello", 3), "hel");
        assert_eq!(clip("hello", 10), "hello");
        assert_eq!(clip("ééé", 2), "éé");
    }
}
