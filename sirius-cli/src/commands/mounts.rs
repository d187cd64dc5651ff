//! Mounts Command
//!
//! Lists the mounts visible to the active group.

use anyhow::{Context, Result};
use console::style;
use sirius_client::SiriusClient;

use super::truncate_path;

/// Run mounts command
pub async fn run(client: &SiriusClient, group_id: &str, json: bool) -> Result<()> {
    let mounts = client
        .get_mounts(group_id)
        .await
        .context("Failed to get mounts")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&mounts)?);
        return Ok(());
    }

    if mounts.is_empty() {
        println!(
            "{} No mounts visible to group '{}'",
            style("Info:").cyan(),
            group_id
        );
        return Ok(());
    }

    println!(
        "{:<38} {:<24} {}",
        style("ID").bold(),
        style("NAME").bold(),
        style("LOCATION").bold()
    );
    println!("{}", "-".repeat(100));
    for mount in &mounts {
        println!(
            "{:<38} {:<24} {}",
            mount.id,
            truncate_path(&mount.name, 24),
            mount.mount_location
        );
    }
    println!("{}", "-".repeat(100));
    println!("{} mounts", style(mounts.len()).green());

    Ok(())
}
