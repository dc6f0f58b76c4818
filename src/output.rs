// output.rs
// CSV / JSON artifacts plus the human console summary

use crate::classify::clip;
use crate::notice::{Notice, RunMetadata};
use anyhow::{Context, Result};
use chrono::Local;
use csv::Writer;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

const CSV_FIELDS: [&str; 8] = [
    "entity_name",
    "entity_type",
    "status",
    "date",
    "notice_text",
    "source",
    "source_url",
    "entity_url",
];

pub fn write_csv(notices: &[Notice], path: &Path) -> Result<()> {
    if notices.is_empty() {
        log::warn!("No notices to write to CSV.");
        return Ok(());
    }
    let mut wtr = Writer::from_path(path)
        .with_context(|| format!("cannot create {}", path.display()))?;
    wtr.write_record(CSV_FIELDS)?;
    for n in notices {
        wtr.write_record([
            n.entity_name.as_str(),
            n.entity_type.as_str(),
            n.status.as_str(),
            n.date.as_str(),
            n.notice_text.as_str(),
            n.source.as_str(),
            n.source_url.as_str(),
            n.entity_url.as_str(),
        ])?;
    }
    wtr.flush()?;
    log::info!("CSV written: {} ({} records)", path.display(), notices.len());
    Ok(())
}

pub fn write_json(metadata: &RunMetadata, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    serde_json::to_writer_pretty(file, metadata)?;
    log::info!(
        "JSON written: {} ({} records)",
        path.display(),
        metadata.total_notices
    );
    Ok(())
}

pub fn print_summary(notices: &[Notice]) {
    let rule = "=".repeat(72);
    println!("\n{rule}");
    println!("  TEXAS ACTIVE BOIL WATER NOTICES");
    println!("  Scraped: {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
    println!("{rule}");

    if notices.is_empty() {
        println!("\n  No active boil water notices found.");
        println!("{rule}");
        return;
    }

    println!("\n  Total active notices found: {}", notices.len());

    // Group by source
    let mut by_source: HashMap<&str, Vec<&Notice>> = HashMap::new();
    for n in notices {
        by_source.entry(&n.source).or_default().push(n);
    }
    let mut sources: Vec<_> = by_source.into_iter().collect();
    sources.sort_by_key(|(source, _)| *source);

    for (source, items) in sources {
        println!("\n  --- {source} ({} notices) ---", items.len());
        for n in items {
            let status_tag = format!("[{}]", n.status);
            let date_str = if n.date.is_empty() {
                String::new()
            } else {
                format!(" ({})", n.date)
            };
            println!(
                "    {status_tag:<20} {:<45}{date_str}",
                clip(&n.entity_name, 45)
            );
            if !n.notice_text.is_empty() {
                let short = clip(&n.notice_text, 100).replace('\n', " ");
                println!("    {:20} {short}...", "");
            }
        }
    }

    // Summary by entity type
    let mut type_counts: HashMap<&str, usize> = HashMap::new();
    for n in notices {
        *type_counts.entry(n.entity_type.as_str()).or_default() += 1;
    }
    let mut counts: Vec<_> = type_counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    println!("\n  By entity type:");
    for (t, c) in counts {
        println!("    {t:<45} {c:>3}");
    }

    println!("\n{rule}");
}
