// Texas Active Boil Water Notice scraper.
//
// Scrapes Texas water utility and municipal websites to find CURRENTLY
// ACTIVE boil water notices/advisories, geocodes them, and writes CSV and
// JSON artifacts into the current working directory for the map page.

use anyhow::Result;
use chrono::Local;
use std::path::Path;
use std::thread;
use txbwn::{geocode, notice, output, session, settings, sources};

fn main() -> Result<()> {
    pretty_env_logger::formatted_timed_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    log::info!("Starting Texas Active Boil Water Notice Scraper...");
    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();

    let settings = settings::load()?;
    let delay = settings.scrape.delay();
    let client = session::build_client(settings.scrape.timeout())?;

    let mut all_notices = Vec::new();

    all_notices.extend(sources::municipalops::scrape(&client));
    thread::sleep(delay);

    all_notices.extend(sources::swwc::scrape(&client));
    thread::sleep(delay);

    all_notices.extend(sources::consolidated_wsc::scrape(&client));
    thread::sleep(delay);

    // the per-page politeness delay is handled inside
    all_notices.extend(sources::city_pages::scrape(&client, delay));

    all_notices.extend(sources::bing_news::scrape(&client, delay));

    all_notices.extend(sources::duckduckgo::scrape(&client, delay));

    let mut all_notices = notice::dedupe(all_notices);

    geocode::geocode_notices(&client, &mut all_notices);

    // Timestamped artifacts, plus a stable "latest" file for the map page
    let csv_path = format!("tx_active_bwn_{timestamp}.csv");
    let json_path = format!("tx_active_bwn_{timestamp}.json");
    output::write_csv(&all_notices, Path::new(&csv_path))?;

    let metadata = notice::RunMetadata::new(all_notices);
    output::write_json(&metadata, Path::new(&json_path))?;
    output::write_json(&metadata, Path::new("tx_active_bwn_latest.json"))?;

    output::print_summary(&metadata.notices);

    log::info!("Done.");
    Ok(())
}
