// notice.rs
// the record every source produces, plus the JSON artifact wrapper

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One currently-active boil water notice, as reported by a single source.
/// String fields are empty when the source did not provide them, which
/// keeps the CSV columns uniform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Notice {
    pub entity_name: String,
    pub entity_type: String,
    pub status: String,
    pub notice_text: String,
    pub date: String,
    pub source: String,
    pub source_url: String,
    pub entity_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

/// Shape of the JSON artifacts (`tx_active_bwn_<ts>.json` and
/// `tx_active_bwn_latest.json`), consumed by the map page.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunMetadata {
    pub last_updated: String,
    pub total_notices: usize,
    pub notices: Vec<Notice>,
}

impl RunMetadata {
    pub fn new(notices: Vec<Notice>) -> Self {
        Self {
            last_updated: Local::now().to_rfc3339(),
            total_notices: notices.len(),
            notices,
        }
    }
}

/// Drop duplicate reports of the same entity from the same source,
/// keeping the first occurrence.
pub fn dedupe(notices: Vec<Notice>) -> Vec<Notice> {
    let mut seen = HashSet::new();
    notices
        .into_iter()
        .filter(|n| seen.insert((n.entity_name.trim().to_lowercase(), n.source.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(name: &str, source: &str) -> Notice {
        Notice {
            entity_name: name.to_string(),
            source: source.to_string(),
            ..Notice::default()
        }
    }

    #[test]
    fn dedupe_keeps_first_per_entity_and_source() {
        let out = dedupe(vec![
            notice("City of Houston", "MunicipalOps"),
            notice("city of houston ", "MunicipalOps"),
            notice("City of Houston", "Bing News"),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].source, "MunicipalOps");
        assert_eq!(out[1].source, "Bing News");
    }

    #[test]
    fn optional_fields_are_omitted_from_json() {
        let json = serde_json::to_string(&notice("X", "Y")).unwrap();
        assert!(!json.contains("lat"));
        assert!(!json.contains("county"));
    }
}
