//! Sirius CLI
//!
//! Command-line client for the Sirius file sync service.
//!
//! # Commands
//! - `mounts` - List mounts visible to the group
//! - `ls` - List files under a path of a mount
//! - `download` - Download a file
//! - `upload` - Upload a file
//! - `drivers` - Manage storage drivers
//! - `config` - Show or edit configuration
//!
//! # Configuration
//! Config file: ~/.sirius/config.toml

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sirius_client::{ClientConfig, DriverClient, SiriusClient, TlsMode};
use sirius_core::TlsClientConfig;
use std::path::PathBuf;
use tracing::debug;

mod commands;
mod config;
mod symbols;

use commands::drivers::DriverAction;
use commands::{download, drivers, list, mounts, upload};

#[derive(Parser)]
#[command(name = "sirius")]
#[command(about = "Sirius file sync CLI")]
#[command(version)]
struct Cli {
    /// Region to connect to (overrides config file)
    #[arg(long, global = true, env = "SIRIUS_REGION")]
    region: Option<String>,

    /// Bearer token
    #[arg(long, global = true, env = "SIRIUS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Group to act for (overrides config file)
    #[arg(long, global = true, env = "SIRIUS_GROUP_ID")]
    group: Option<String>,

    /// REST API base URL for driver management (overrides config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    // ===== TLS Configuration =====
    /// Path to CA certificate for verifying the server (PEM format)
    #[arg(long, global = true, env = "SIRIUS_CA_CERT")]
    ca_cert: Option<PathBuf>,

    /// Path to client certificate for mTLS (PEM format)
    #[arg(long, global = true, env = "SIRIUS_CLIENT_CERT", requires = "ca_cert")]
    client_cert: Option<PathBuf>,

    /// Path to client private key for mTLS (PEM format)
    #[arg(long, global = true, env = "SIRIUS_CLIENT_KEY", requires = "ca_cert")]
    client_key: Option<PathBuf>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List mounts visible to the group
    Mounts,

    /// List files under a path of a mount
    Ls {
        /// Mount id
        mount_id: String,

        /// Path relative to the mount root
        #[arg(default_value = "/")]
        path: String,

        /// Show detailed information
        #[arg(short, long)]
        long: bool,

        /// Human-readable sizes
        #[arg(short = 'H', long)]
        human_readable: bool,
    },

    /// Download a file from a mount
    Download {
        /// Mount id
        mount_id: String,

        /// Path of the file relative to the mount root
        path: String,

        /// Output file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Bytes per message (overrides config file)
        #[arg(long)]
        chunk_size: Option<usize>,
    },

    /// Upload a file to a mount
    Upload {
        /// Mount id
        mount_id: String,

        /// Local file
        file: PathBuf,

        /// Destination path relative to the mount root
        destination: String,

        /// Bytes per message (overrides config file)
        #[arg(long)]
        chunk_size: Option<usize>,
    },

    /// Manage storage drivers
    Drivers {
        #[command(subcommand)]
        command: DriverCommands,
    },

    /// Show or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum DriverCommands {
    /// List drivers of the group and its ancestors
    List,

    /// Show one driver
    Get { id: String },

    /// Create a driver backed by a Google Cloud Storage bucket
    CreateGcs {
        /// Driver name
        name: String,

        /// Bucket id
        bucket_id: String,

        /// File holding the service account client secret
        #[arg(long)]
        secret_file: PathBuf,
    },

    /// Delete a driver
    Delete { id: String },

    /// Re-index the storage behind a driver
    Rescan { id: String },

    /// Drop the cached content of a driver
    Dropcache { id: String },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., client.region, regions.local)
        key: String,
        /// Value to set
        value: String,
    },
}

/// Settings resolved from flags, environment and config file
struct Session {
    region: String,
    group_id: Option<String>,
    token: Option<String>,
    api_url: String,
    chunk_size: usize,
    client_config: ClientConfig,
}

impl Session {
    fn new(cli: &Cli, cfg: config::SiriusConfig) -> Self {
        let mut client_config = ClientConfig::from_env().with_regions(cfg.region_table());
        if let Some(ca_cert) = &cli.ca_cert {
            client_config.tls = TlsMode::Custom(TlsClientConfig {
                ca_cert_path: ca_cert.clone(),
                client_cert_path: cli.client_cert.clone(),
                client_key_path: cli.client_key.clone(),
            });
        }

        Self {
            region: cli.region.clone().unwrap_or(cfg.client.region),
            group_id: cli.group.clone().or(cfg.client.group_id),
            token: cli.token.clone(),
            api_url: cli.api_url.clone().unwrap_or(cfg.client.api_url),
            chunk_size: cfg.client.chunk_size,
            client_config,
        }
    }

    fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .context("No token. Pass --token or set SIRIUS_TOKEN.")
    }

    fn group_id(&self) -> Result<String> {
        self.group_id.clone().context(
            "No group. Pass --group, set SIRIUS_GROUP_ID or run 'sirius config set client.group_id <id>'.",
        )
    }

    async fn connect(&self) -> Result<SiriusClient> {
        let token = self.token()?;
        debug!(region = %self.region, "Connecting");
        SiriusClient::with_config(&self.region, token, self.client_config.clone())
            .await
            .with_context(|| format!("Failed to connect to region {}", self.region))
    }

    fn drivers(&self) -> Result<DriverClient> {
        Ok(DriverClient::new(&self.api_url, self.group_id()?, self.token()?)?)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    // Load configuration from ~/.sirius/config.toml
    let cfg = config::load_config();
    let session = Session::new(&cli, cfg);

    match cli.command {
        Commands::Mounts => {
            let client = session.connect().await?;
            mounts::run(&client, &session.group_id()?, cli.json).await?;
        }

        Commands::Ls {
            mount_id,
            path,
            long,
            human_readable,
        } => {
            let client = session.connect().await?;
            let config = list::ListConfig {
                group_id: session.group_id()?,
                mount_id,
                path,
                long_format: long,
                human_readable,
            };
            list::run(&client, config).await?;
        }

        Commands::Download {
            mount_id,
            path,
            output,
            chunk_size,
        } => {
            let client = session.connect().await?;
            let config = download::DownloadConfig {
                group_id: session.group_id()?,
                mount_id,
                path,
                output,
                chunk_size: chunk_size.unwrap_or(session.chunk_size),
            };
            download::run(&client, config).await?;
        }

        Commands::Upload {
            mount_id,
            file,
            destination,
            chunk_size,
        } => {
            let client = session.connect().await?;
            let config = upload::UploadConfig {
                group_id: session.group_id()?,
                mount_id,
                file,
                destination,
                chunk_size: chunk_size.unwrap_or(session.chunk_size),
            };
            upload::run(&client, config).await?;
        }

        Commands::Drivers { command } => {
            let client = session.drivers()?;
            let action = match command {
                DriverCommands::List => DriverAction::List,
                DriverCommands::Get { id } => DriverAction::Get { id },
                DriverCommands::CreateGcs {
                    name,
                    bucket_id,
                    secret_file,
                } => DriverAction::CreateGcs {
                    name,
                    bucket_id,
                    secret_file,
                },
                DriverCommands::Delete { id } => DriverAction::Delete { id },
                DriverCommands::Rescan { id } => DriverAction::Rescan { id },
                DriverCommands::Dropcache { id } => DriverAction::DropCache { id },
            };
            drivers::run(&client, action, cli.json).await?;
        }

        Commands::Config { command } => {
            handle_config_command(command)?;
        }
    }

    Ok(())
}

/// Handle config subcommands
fn handle_config_command(command: Option<ConfigCommands>) -> Result<()> {
    use console::style;

    match command {
        None | Some(ConfigCommands::Show) => {
            let cfg = config::load_config();
            println!();
            println!("{}", style("Sirius Configuration").bold().underlined());
            println!();
            println!("{}", style("[client]").cyan());
            println!("  region = \"{}\"", cfg.client.region);
            match &cfg.client.group_id {
                Some(group_id) => println!("  group_id = \"{}\"", group_id),
                None => println!("  group_id = {}", style("(not set)").dim()),
            }
            println!("  api_url = \"{}\"", cfg.client.api_url);
            println!("  chunk_size = {}", cfg.client.chunk_size);
            println!();
            println!("{}", style("[regions]").cyan());
            let table = cfg.region_table();
            for label in table.labels() {
                let source = if cfg.regions.contains_key(label) {
                    ""
                } else {
                    " (built-in)"
                };
                let address = table.resolve(label).unwrap_or_default();
                println!("  {} = \"{}\"{}", label, address, style(source).dim());
            }
            println!();

            if let Ok(path) = config::config_file_path() {
                println!("{} {}", style("Config file:").dim(), path.display());
                if !path.exists() {
                    println!(
                        "{} Run '{}' to create it",
                        style("(not created yet)").yellow(),
                        style("sirius config init").green()
                    );
                }
            }
        }

        Some(ConfigCommands::Path) => {
            println!("{}", config::config_file_path()?.display());
        }

        Some(ConfigCommands::Init { force }) => {
            let path = config::config_file_path()?;
            if path.exists() && !force {
                println!(
                    "{} Config file already exists at {}",
                    style(symbols::WARN).yellow(),
                    path.display()
                );
                println!("Use --force to overwrite");
                return Ok(());
            }

            config::save_config(&config::SiriusConfig::default())?;
            println!(
                "{} Config file created at {}",
                style(symbols::CHECK).green(),
                path.display()
            );
        }

        Some(ConfigCommands::Set { key, value }) => {
            let mut cfg = config::load_config();
            cfg.set(&key, value)?;
            config::save_config(&cfg)?;
            println!("{} Configuration updated", style(symbols::CHECK).green());
        }
    }

    Ok(())
}
