//! Download Command
//!
//! Downloads one file from a mount to the local disk.

use anyhow::{Context, Result};
use console::style;
use indicatif::ProgressBar;
use sirius_client::SiriusClient;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{format_bytes, spinner_style};
use crate::symbols;

/// Download configuration
pub struct DownloadConfig {
    pub group_id: String,
    pub mount_id: String,
    pub path: String,
    pub output: Option<PathBuf>,
    pub chunk_size: usize,
}

/// Run download command
pub async fn run(client: &SiriusClient, config: DownloadConfig) -> Result<()> {
    let file_path = output_path(&config.path, config.output.as_deref());

    if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let file = fs::File::create(&file_path)
        .await
        .with_context(|| format!("Failed to create {}", file_path.display()))?;

    // Size is not known up front: count bytes as they are written
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style()?);
    pb.set_message(format!("Downloading {}", config.path));
    let mut sink = pb.wrap_async_write(file);

    let result = client
        .download_to_file(
            &config.group_id,
            &config.mount_id,
            &mut sink,
            &config.path,
            config.chunk_size,
        )
        .await;

    let size = match result {
        Ok(size) => size,
        Err(e) => {
            pb.abandon_with_message(format!("{} Download failed", style(symbols::CROSS).red()));
            return Err(e).with_context(|| format!("Failed to download {}", config.path));
        }
    };
    sink.flush().await?;

    pb.finish_with_message(format!(
        "{} Downloaded {}",
        style(symbols::CHECK).green(),
        config.path
    ));

    println!(
        "\n{} {}\n  Size: {} ({} bytes)\n  Saved to: {}",
        style("Successfully downloaded:").green().bold(),
        config.path,
        format_bytes(size),
        size,
        file_path.display()
    );

    Ok(())
}

/// Local destination: `output` as given, inside it when it is a directory,
/// otherwise the remote file name in the current directory.
fn output_path(remote_path: &str, output: Option<&Path>) -> PathBuf {
    let file_name = remote_path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("download");

    match output {
        Some(out) if out.is_dir() => out.join(file_name),
        Some(out) => out.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}
