// geocode.rs
// attaches lat/lon to notices: built-in place table first, then a JSON
// file cache, then OpenStreetMap Nominatim (1 req/sec limit)

use crate::classify::place_name;
use crate::notice::Notice;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::thread;
use std::time::Duration;

pub const GEOCACHE_FILE: &str = "tx_bwn_geocache.json";

/// Fallback when a place cannot be geocoded: roughly the center of Texas.
const TX_CENTER: (f64, f64) = (31.0, -99.0);

// Pre-built lookup of Texas place names -> (lat, lon).
// Covers all major cities, plus common small towns from BWN data.
static TX_PLACES: &[(&str, f64, f64)] = &[
    ("houston", 29.7604, -95.3698),
    ("san antonio", 29.4241, -98.4936),
    ("dallas", 32.7767, -96.7970),
    ("austin", 30.2672, -97.7431),
    ("fort worth", 32.7555, -97.3308),
    ("el paso", 31.7619, -106.4850),
    ("arlington", 32.7357, -97.1081),
    ("corpus christi", 27.8006, -97.3964),
    ("plano", 33.0198, -96.6989),
    ("lubbock", 33.5779, -101.8552),
    ("laredo", 27.5036, -99.5076),
    ("amarillo", 35.2220, -101.8313),
    ("brownsville", 25.9017, -97.4975),
    ("mcallen", 26.2034, -98.2300),
    ("killeen", 31.1171, -97.7278),
    ("midland", 31.9973, -102.0779),
    ("odessa", 31.8457, -102.3676),
    ("beaumont", 30.0802, -94.1266),
    ("round rock", 30.5083, -97.6789),
    ("waco", 31.5493, -97.1467),
    ("tyler", 32.3513, -95.3011),
    ("san angelo", 31.4638, -100.4370),
    ("college station", 30.6280, -96.3344),
    ("abilene", 32.4487, -99.7331),
    ("denton", 33.2148, -97.1331),
    ("marshall", 32.5449, -94.3674),
    ("gilmer", 32.7288, -94.9424),
    ("sonora", 30.5668, -100.6431),
    ("monterey", 32.4487, -101.9), // Monterey, TX (near Lubbock)
    ("deadwood", 33.0784, -94.7366), // Deadwood, TX (Panola County)
    ("palestine", 31.7621, -95.6308),
    ("crockett", 31.3182, -95.4566),
    ("grapeland", 31.4918, -95.4777),
    ("oak grove", 31.4, -95.5), // Houston County area
    ("tadmor", 31.35, -95.25), // Houston County area
    ("pine mountain", 31.45, -95.4), // Houston County area
    ("lakeway", 30.3632, -97.9795),
    ("cypress", 29.9691, -95.6972),
    ("spring", 30.0799, -95.4172),
    ("conroe", 30.3119, -95.4560),
    ("the woodlands", 30.1658, -95.4613),
    ("sugar land", 29.6197, -95.6349),
    ("pearland", 29.5636, -95.2860),
    ("league city", 29.5075, -95.0949),
    ("pflugerville", 30.4394, -97.6200),
    ("temple", 31.0982, -97.3428),
    ("bryan", 30.6744, -96.3700),
    ("new braunfels", 29.7030, -98.1245),
    ("san marcos", 29.8833, -97.9414),
    ("georgetown", 30.6333, -97.6778),
    ("cedar park", 30.5052, -97.8203),
    ("harlingen", 26.1906, -97.6961),
    ("mission", 26.2159, -98.3253),
    ("edinburg", 26.3017, -98.1633),
    ("longview", 32.5007, -94.7405),
    ("texarkana", 33.4418, -94.0477),
    ("nacogdoches", 31.6035, -94.6555),
    ("lufkin", 31.3382, -94.7291),
    ("victoria", 28.8053, -96.9850),
    ("wichita falls", 33.9137, -98.4934),
    ("sherman", 33.6357, -96.6089),
    ("del rio", 29.3627, -100.8968),
    ("eagle pass", 28.7091, -100.4995),
    ("uvalde", 29.2097, -99.7862),
    ("fredericksburg", 30.2752, -98.8720),
    ("kerrville", 30.0474, -99.1401),
    ("boerne", 29.7947, -98.7320),
    ("seguin", 29.5688, -97.9647),
    ("bastrop", 30.1105, -97.3153),
    ("lockhart", 29.8849, -97.6700),
    ("gonzales", 29.5017, -97.4525),
    ("cuero", 29.0938, -97.2892),
    ("port arthur", 29.8850, -93.9400),
    ("galveston", 29.3013, -94.7977),
    ("bay city", 28.9828, -95.9694),
    ("angleton", 29.1694, -95.4316),
    ("freeport", 28.9541, -95.3597),
    ("rockport", 28.0206, -97.0544),
    ("port lavaca", 28.6150, -96.6261),
    ("alpine", 30.3585, -103.6610),
    ("pecos", 31.4229, -103.4932),
    ("monahans", 31.5943, -102.8924),
    ("big spring", 32.2504, -101.4785),
    ("snyder", 32.7179, -100.9176),
    ("sweetwater", 32.4710, -100.4059),
    ("breckenridge", 32.7557, -98.9023),
    ("mineral wells", 32.8084, -98.1128),
    ("stephenville", 32.2207, -98.2023),
    ("granbury", 32.4419, -97.7942),
    ("cleburne", 32.3476, -97.3867),
    ("corsicana", 32.0954, -96.4689),
    ("athens", 32.2049, -95.8552),
    ("henderson", 32.1532, -94.7994),
    ("jacksonville", 31.9638, -95.2705),
    ("rusk", 31.7960, -95.1522),
    ("carthage", 32.1574, -94.3374),
    ("center", 31.7935, -94.1791),
    ("jasper", 30.9202, -93.9966),
    ("woodville", 30.7752, -94.4155),
    ("livingston", 30.7111, -94.9330),
    ("huntsville", 30.7235, -95.5508),
    ("madisonville", 30.9499, -95.9114),
    ("navasota", 30.3880, -96.0878),
    ("brenham", 30.1669, -96.3978),
    ("la grange", 29.9058, -96.8767),
    ("columbus", 29.7063, -96.5397),
    ("hallettsville", 29.4441, -96.9411),
    ("yoakum", 29.2886, -97.1514),
    ("eagle lake", 29.5894, -96.3331),
    ("el campo", 29.1966, -96.2697),
    ("wharton", 29.3116, -96.1028),
    ("rosenberg", 29.5572, -95.8086),
    ("richmond", 29.5822, -95.7608),
    ("katy", 29.7858, -95.8244),
    ("tomball", 30.0972, -95.6161),
    ("humble", 29.9988, -95.2622),
    ("baytown", 29.7355, -94.9774),
    ("pasadena", 29.6911, -95.2091),
    ("deer park", 29.7055, -95.1286),
    ("la porte", 29.6658, -95.0194),
    ("webster", 29.5377, -95.1183),
    ("friendswood", 29.5294, -95.2010),
    ("alvin", 29.4239, -95.2441),
    ("lake jackson", 29.0439, -95.4344),
    ("clute", 29.0247, -95.3986),
    ("west columbia", 29.1441, -95.6453),
    ("bellville", 29.9502, -96.2567),
    ("sealy", 29.7811, -96.1572),
    ("hempstead", 30.0972, -96.0789),
    ("magnolia", 30.2094, -95.7508),
    ("willis", 30.4250, -95.4789),
    ("huntsville tx", 30.7235, -95.5508),
    ("montgomery", 30.3883, -95.6936),
    ("anderson", 30.4863, -95.9878),
    ("centerville", 31.2585, -95.9786),
    ("buffalo", 31.4635, -96.0580),
    ("mexia", 31.6821, -96.4822),
    ("groesbeck", 31.5243, -96.5339),
    ("marlin", 31.3063, -96.8931),
    ("cameron", 30.8533, -96.9769),
    ("rockdale", 30.6555, -97.0017),
    ("taylor", 30.5728, -97.4092),
    ("elgin", 30.3497, -97.3706),
    ("smithville", 30.0086, -97.1592),
    ("giddings", 30.1825, -96.9364),
    ("manor", 30.3408, -97.5567),
    ("hutto", 30.5427, -97.5467),
    ("leander", 30.5788, -97.8531),
    ("dripping springs", 30.1902, -98.0867),
    ("wimberley", 29.9974, -98.0989),
    ("kyle", 29.9889, -97.8772),
    ("buda", 30.0852, -97.8403),
    ("flying l ranch", 29.8, -98.75), // Bandera County
    ("bandera", 29.7266, -99.0734),
    ("kendall", 29.95, -98.7),
    ("hays", 30.05, -98.0),
    ("sequoia", 29.9, -95.5),
];

fn lookup_place(place_lower: &str) -> Option<(f64, f64)> {
    TX_PLACES
        .iter()
        .find(|(name, _, _)| *name == place_lower)
        .map(|&(_, lat, lon)| (lat, lon))
}

fn within_texas(lat: f64, lon: f64) -> bool {
    25.5 < lat && lat < 36.5 && -106.7 < lon && lon < -93.5
}

type Geocache = HashMap<String, [f64; 2]>;

fn load_geocache(path: &Path) -> Geocache {
    match File::open(path) {
        Ok(f) => serde_json::from_reader(f).unwrap_or_default(),
        Err(_) => Geocache::default(),
    }
}

fn save_geocache(path: &Path, cache: &Geocache) {
    let result = File::create(path)
        .map_err(anyhow::Error::from)
        .and_then(|f| serde_json::to_writer_pretty(f, cache).map_err(Into::into));
    if let Err(e) = result {
        log::warn!("failed to save geocache {}: {e}", path.display());
    }
}

#[derive(Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Geocode a place name via OpenStreetMap Nominatim (free, 1 req/sec).
fn geocode_nominatim(client: &Client, place: &str) -> Option<(f64, f64)> {
    let result: anyhow::Result<Vec<NominatimPlace>> = (|| {
        Ok(client
            .get("https://nominatim.openstreetmap.org/search")
            .query(&[
                ("q", format!("{place}, Texas, USA").as_str()),
                ("format", "json"),
                ("limit", "1"),
                ("countrycodes", "us"),
            ])
            .timeout(Duration::from_secs(10))
            .send()?
            .error_for_status()?
            .json()?)
    })();

    match result {
        Ok(results) => results
            .first()
            .and_then(|p| Some((p.lat.parse().ok()?, p.lon.parse().ok()?))),
        Err(e) => {
            log::debug!("  Nominatim geocoding failed for '{place}': {e}");
            None
        }
    }
}

/// Add lat/lon to each notice. Local lookup table first, then the file
/// cache, then Nominatim. New Nominatim hits are written back to the cache.
pub fn geocode_notices(client: &Client, notices: &mut [Notice]) {
    log::info!("Geocoding notices...");
    let cache_path = Path::new(GEOCACHE_FILE);
    let mut cache = load_geocache(cache_path);
    let mut geocoded = 0usize;
    let mut failed: Vec<String> = Vec::new();

    for notice in notices.iter_mut() {
        let place = place_name(&notice.entity_name);
        let place_lower = place.to_lowercase().trim().to_string();

        if let Some((lat, lon)) = lookup_place(&place_lower) {
            notice.lat = Some(lat);
            notice.lon = Some(lon);
            geocoded += 1;
            continue;
        }

        if let Some(&[lat, lon]) = cache.get(&place_lower) {
            notice.lat = Some(lat);
            notice.lon = Some(lon);
            geocoded += 1;
            continue;
        }

        match geocode_nominatim(client, &place) {
            Some((lat, lon)) if within_texas(lat, lon) => {
                notice.lat = Some(lat);
                notice.lon = Some(lon);
                cache.insert(place_lower, [lat, lon]);
                geocoded += 1;
                log::info!("  Geocoded '{place}' -> ({lat:.4}, {lon:.4})");
            }
            Some((lat, lon)) => {
                log::warn!("  Geocoded '{place}' outside Texas bounds: ({lat}, {lon})");
                notice.lat = Some(TX_CENTER.0);
                notice.lon = Some(TX_CENTER.1);
                failed.push(place);
            }
            None => {
                notice.lat = Some(TX_CENTER.0);
                notice.lon = Some(TX_CENTER.1);
                failed.push(place);
            }
        }

        // Nominatim rate limit: 1 req/sec
        thread::sleep(Duration::from_millis(1100));
    }

    save_geocache(cache_path, &cache);

    if !failed.is_empty() {
        log::warn!("  Could not geocode: {}", failed.join(", "));
    }
    log::info!("  Geocoded {geocoded}/{} notices", notices.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_table_lookup() {
        assert_eq!(lookup_place("houston"), Some((29.7604, -95.3698)));
        assert_eq!(lookup_place("atlantis"), None);
    }

    #[test]
    fn texas_bounds_check() {
        assert!(within_texas(31.0, -99.0));
        assert!(!within_texas(40.7, -74.0)); // New York
        assert!(!within_texas(29.95, -90.07)); // New Orleans, lon too far east
    }

    #[test]
    fn geocache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("geocache.json");
        let mut cache = Geocache::default();
        cache.insert("somewhere".to_string(), [30.0, -98.0]);
        save_geocache(&path, &cache);
        assert_eq!(load_geocache(&path), cache);
    }

    #[test]
    fn missing_or_corrupt_geocache_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_geocache(&dir.path().join("absent.json")).is_empty());
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();
        assert!(load_geocache(&bad).is_empty());
    }
}
