//! Upload Command
//!
//! Uploads one local file to a mount.

use anyhow::{Context, Result};
use console::style;
use indicatif::ProgressBar;
use sirius_client::SiriusClient;
use std::path::PathBuf;
use tokio::fs;

use super::{format_bytes, transfer_style};
use crate::symbols;

/// Upload configuration
pub struct UploadConfig {
    pub group_id: String,
    pub mount_id: String,
    pub file: PathBuf,
    /// Destination relative to the mount root
    pub destination: String,
    pub chunk_size: usize,
}

/// Run upload command
pub async fn run(client: &SiriusClient, config: UploadConfig) -> Result<()> {
    let metadata = fs::metadata(&config.file)
        .await
        .with_context(|| format!("Cannot read {}", config.file.display()))?;
    if !metadata.is_file() {
        anyhow::bail!("Not a regular file: {}", config.file.display());
    }

    let file = fs::File::open(&config.file).await?;

    let pb = ProgressBar::new(metadata.len());
    pb.set_style(transfer_style()?);
    pb.set_message(format!("Uploading {}", config.destination));
    let source = pb.wrap_async_read(file);

    let result = client
        .upload_file(
            &config.group_id,
            &config.mount_id,
            source,
            &config.destination,
            config.chunk_size,
        )
        .await;

    let entry = match result {
        Ok(entry) => entry,
        Err(e) => {
            pb.abandon_with_message(format!("{} Upload failed", style(symbols::CROSS).red()));
            return Err(e).with_context(|| format!("Failed to upload {}", config.file.display()));
        }
    };

    pb.finish_with_message(format!(
        "{} Uploaded {}",
        style(symbols::CHECK).green(),
        config.destination
    ));

    println!(
        "\n{} {}\n  Mount: {}\n  Path: {}\n  Size: {}",
        style("Successfully uploaded:").green().bold(),
        config.file.display(),
        entry.mount_id,
        entry.path,
        format_bytes(entry.size)
    );

    if entry.size != metadata.len() {
        println!(
            "{} Server reports {} bytes, local file has {}",
            style(symbols::WARN).yellow(),
            entry.size,
            metadata.len()
        );
    }

    Ok(())
}
