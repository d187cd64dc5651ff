//! Drivers Command
//!
//! Storage driver management over the REST API.

use anyhow::{Context, Result};
use console::style;
use sirius_client::{create_gcs_driver_request, Driver, DriverClient};
use std::path::Path;

use crate::symbols;

/// Driver action to run
pub enum DriverAction {
    List,
    Get { id: String },
    CreateGcs {
        name: String,
        bucket_id: String,
        secret_file: std::path::PathBuf,
    },
    Delete { id: String },
    Rescan { id: String },
    DropCache { id: String },
}

/// Run drivers command
pub async fn run(client: &DriverClient, action: DriverAction, json: bool) -> Result<()> {
    match action {
        DriverAction::List => {
            let drivers = client.get_drivers().await.context("Failed to list drivers")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&drivers)?);
            } else if drivers.is_empty() {
                println!("{} No drivers", style("Info:").cyan());
            } else {
                print_table(&drivers);
            }
        }

        DriverAction::Get { id } => {
            let driver = client
                .get_driver(&id)
                .await
                .with_context(|| format!("Failed to get driver {}", id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&driver)?);
            } else {
                print_details(&driver);
            }
        }

        DriverAction::CreateGcs {
            name,
            bucket_id,
            secret_file,
        } => {
            let secret = read_secret(&secret_file)?;
            let request = create_gcs_driver_request(name, bucket_id, secret);
            let driver = client
                .create_driver(&request)
                .await
                .context("Failed to create driver")?;
            println!(
                "{} Created driver {} ({})",
                style(symbols::CHECK).green(),
                style(&driver.name).bold(),
                driver.id
            );
            print_details(&driver);
        }

        DriverAction::Delete { id } => {
            let driver = client
                .delete_driver(&id)
                .await
                .with_context(|| format!("Failed to delete driver {}", id))?;
            println!(
                "{} Deleted driver {} ({})",
                style(symbols::CHECK).green(),
                driver.name,
                driver.id
            );
        }

        DriverAction::Rescan { id } => {
            client
                .rescan_driver(&id)
                .await
                .with_context(|| format!("Failed to rescan driver {}", id))?;
            println!("{} Rescan started for {}", style(symbols::CHECK).green(), id);
        }

        DriverAction::DropCache { id } => {
            client
                .dropcache_driver(&id)
                .await
                .with_context(|| format!("Failed to drop cache of driver {}", id))?;
            println!("{} Cache dropped for {}", style(symbols::CHECK).green(), id);
        }
    }

    Ok(())
}

fn read_secret(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read client secret {}", path.display()))
}

fn indexing_label(driver: &Driver) -> String {
    if driver.is_indexing() {
        style("indexing").yellow().to_string()
    } else {
        style("idle").green().to_string()
    }
}

fn print_table(drivers: &[Driver]) {
    println!(
        "{:<38} {:<24} {:<8} {:>6} {}",
        style("ID").bold(),
        style("NAME").bold(),
        style("TYPE").bold(),
        style("MOUNTS").bold(),
        style("STATUS").bold()
    );
    println!("{}", "-".repeat(90));
    for driver in drivers {
        println!(
            "{:<38} {:<24} {:<8} {:>6} {}",
            driver.id,
            driver.name,
            driver.driver_type,
            driver.mounts.len(),
            indexing_label(driver)
        );
    }
}

fn print_details(driver: &Driver) {
    println!();
    println!("{}", style(&driver.name).bold().underlined());
    println!("  ID:     {}", driver.id);
    println!("  Type:   {}", driver.driver_type);
    println!("  Status: {}", indexing_label(driver));
    if !driver.mounts.is_empty() {
        println!("  Mounts:");
        for mount in &driver.mounts {
            println!(
                "    {} {} [{}] {}",
                style("-").dim(),
                mount.name,
                mount.mount_type,
                mount.mount_location
            );
        }
    }
}
