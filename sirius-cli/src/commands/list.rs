//! List Command
//!
//! Streams the entries under a path of a mount.

use anyhow::{Context, Result};
use console::style;
use futures::StreamExt;
use sirius_client::{FileEntry, SiriusClient};

use super::{format_bytes, truncate_path};
use crate::symbols;

/// List configuration
pub struct ListConfig {
    pub group_id: String,
    pub mount_id: String,
    pub path: String,
    pub long_format: bool,
    pub human_readable: bool,
}

/// Run list command
pub async fn run(client: &SiriusClient, config: ListConfig) -> Result<()> {
    let mut listing = client.get_files(&config.group_id, &config.mount_id, &config.path);

    if config.long_format {
        println!(
            "{:<60} {:>12} {:>10}",
            style("PATH").bold(),
            style("SIZE").bold(),
            style("TYPE").bold()
        );
        println!("{}", "-".repeat(84));
    }

    let mut count = 0usize;
    let mut total_size: u64 = 0;

    // Print as entries arrive
    while let Some(entry) = listing.next().await {
        let entry = entry.with_context(|| {
            format!("Listing {} failed after {} entries", config.path, count)
        })?;
        count += 1;
        total_size += entry.size;
        print_entry(&entry, &config);
    }

    if count == 0 {
        println!(
            "{} No entries under '{}' in mount '{}'",
            style("Info:").cyan(),
            config.path,
            config.mount_id
        );
        return Ok(());
    }

    if config.long_format {
        println!("{}", "-".repeat(84));
        println!(
            "{} entries, {} total",
            style(count).green(),
            size_label(total_size, config.human_readable)
        );
    }

    Ok(())
}

fn print_entry(entry: &FileEntry, config: &ListConfig) {
    if config.long_format {
        println!(
            "{:<60} {:>12} {:>10}",
            truncate_path(&entry.path, 60),
            size_label(entry.size, config.human_readable),
            entry.file_type
        );
    } else if entry.is_dir() {
        println!("{} {}/", symbols::DIR, style(&entry.name).blue());
    } else {
        println!("{}", entry.name);
    }
}

fn size_label(size: u64, human_readable: bool) -> String {
    if human_readable {
        format_bytes(size)
    } else {
        size.to_string()
    }
}
