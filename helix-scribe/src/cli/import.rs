use std::path::Path;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use helix_scribe::Result;
use helix_scribe::services::{IngestionService, read_records};

use super::{Session, print_json};

pub async fn run(session: &Session, path: &Path) -> Result<()> {
    let records = read_records(path)?;
    let service = IngestionService::new(session.store.clone());

    let progress = if session.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(records.len() as u64)
    };
    progress.set_style(
        ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let report = service
        .import(&records, |record| {
            progress.set_message(record.title().to_string());
            progress.inc(1);
        })
        .await;
    progress.finish_and_clear();

    if report.added > 0 {
        session.save().await?;
    }

    if session.json {
        return print_json(&json!({
            "added": report.added,
            "skipped_empty": report.skipped_empty,
            "skipped_duplicate": report.skipped_duplicate,
            "errors": report.errors,
        }));
    }

    println!(
        "{} {} of {} records from {}",
        style("Imported").green(),
        report.added,
        report.total(),
        path.display()
    );
    if report.skipped_empty > 0 {
        println!("  Skipped (no content): {}", report.skipped_empty);
    }
    if report.skipped_duplicate > 0 {
        println!("  Skipped (duplicate): {}", report.skipped_duplicate);
    }
    for error in &report.errors {
        println!("  {} {error}", style("failed:").red());
    }

    Ok(())
}
