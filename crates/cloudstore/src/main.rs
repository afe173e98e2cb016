//! CloudStore
//!
//! Command-line front end for the single-user file collection.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use clap::{Parser, Subcommand};
use cloudstore::config::{default_config_path, Config};
use cloudstore::files::{resolve_shared, FileStore, ShareError, StorageStats, UploadCollector};
use cloudstore::records::{FileId, RuntimeFileRecord};
use cloudstore::storage::{DurableStorage, JsonFileStorage};
use cloudstore::ui::{format_kib, format_relative, format_size, FileKind, PreviewMode};
use cloudstore::{AuthGate, User};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter};

/// CloudStore - store files, share the public ones.
#[derive(Parser, Debug)]
#[command(name = "cloudstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Sign in (any email and password are accepted)
    Login {
        #[arg(long, short)]
        email: String,

        #[arg(long, short)]
        password: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Upload one or more files
    Upload {
        /// Files to upload
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,

        /// Make the uploaded files public
        #[arg(long)]
        public: bool,
    },

    /// List stored files
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Show one file's details
    Show {
        /// File ID
        id: String,
    },

    /// Toggle a file between public and private
    Toggle {
        /// File ID
        id: String,
    },

    /// Delete a file
    Remove {
        /// File ID
        id: String,
    },

    /// Show storage statistics
    Stats {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Open a shared link the way a visitor would
    Shared {
        /// File ID
        id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing on stderr so stdout stays machine-readable.
    // The configured level replaces the startup filter once the config is loaded.
    let startup_filter = if cli.verbose { "debug" } else { "info" };
    let (filter, filter_handle) = reload::Layer::new(EnvFilter::new(startup_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);

    if let Commands::Init { force } = cli.command {
        if config_path.exists() && !force {
            eprintln!("Config file already exists: {}", config_path.display());
            eprintln!();
            eprintln!("To overwrite it, run:");
            eprintln!("  cloudstore init --force");
            std::process::exit(1);
        }
        Config::default().save(&config_path)?;
        println!("Wrote default configuration to {}", config_path.display());
        return Ok(());
    }

    // Load configuration
    if cli.config.is_some() {
        tracing::debug!("Using config file: {:?}", config_path);
    }
    let mut config = Config::load(&config_path)?;

    // Apply environment variable overrides
    config.apply_env_overrides();

    // Validate configuration
    config.validate()?;

    if !cli.verbose {
        filter_handle.reload(EnvFilter::new(config.logging.log_level.to_lowercase()))?;
    }

    tracing::debug!("Using data directory {:?}", config.storage.data_dir);

    let storage = JsonFileStorage::new(&config.storage.data_dir);
    let auth = AuthGate::new(&storage);

    match cli.command {
        Commands::Login { email, password } => match auth.login(&email, &password) {
            Ok(user) => {
                println!("Welcome back, {}!", user.name);
            }
            Err(e) => {
                eprintln!("Login failed: {}", e);
                std::process::exit(1);
            }
        },
        Commands::Logout => {
            auth.logout()?;
            println!("Signed out");
        }
        Commands::Whoami => match auth.current_user() {
            Some(user) => println!("{} <{}>", user.name, user.email),
            None => {
                eprintln!("Not signed in");
                std::process::exit(1);
            }
        },
        command => {
            let user = require_user(&auth);
            tracing::debug!("Running {:?} for {}", command, user.email);

            let mut store = FileStore::open(&storage, config.storage.entry_name.as_str());
            run_file_command(command, &mut store, &config).await?;
        }
    }

    Ok(())
}

/// Exits unless someone is signed in.
fn require_user<S: DurableStorage>(auth: &AuthGate<S>) -> User {
    match auth.current_user() {
        Some(user) => user,
        None => {
            eprintln!("Not signed in.");
            eprintln!();
            eprintln!("To sign in, run:");
            eprintln!("  cloudstore login --email you@example.com --password anything");
            std::process::exit(1);
        }
    }
}

async fn run_file_command<S: DurableStorage>(
    command: Commands,
    store: &mut FileStore<S>,
    config: &Config,
) -> anyhow::Result<()> {
    match command {
        Commands::Upload { paths, public } => {
            let mut collector =
                UploadCollector::new(Duration::from_millis(config.upload.commit_delay_ms));

            for path in &paths {
                if let Err(e) = collector.select_path(path) {
                    eprintln!("Upload failed: {}", e);
                    std::process::exit(1);
                }
            }

            println!("Uploading {} file(s)...", collector.drafts().len());
            let report = collector.commit(store).await;

            for id in &report.ids {
                if public {
                    store.toggle_public(id);
                }
                if let Some(record) = store.get(id) {
                    println!(
                        "  {}  {}  ({}, preview: {:?})",
                        record.id(),
                        record.name(),
                        format_size(record.size()),
                        PreviewMode::for_record(record)
                    );
                }
            }
            println!("{}", report.summary());
        }
        Commands::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
            } else {
                print_files_table(store.list());
            }
        }
        Commands::Show { id } => {
            let id = FileId::new(id);
            match store.get(&id) {
                Some(record) => print_file_details(record),
                None => {
                    eprintln!("File not found: {}", id);
                    std::process::exit(1);
                }
            }
        }
        Commands::Toggle { id } => {
            let id = FileId::new(id);
            match store.toggle_public(&id) {
                Some(true) => println!("File {} is now public", id),
                Some(false) => println!("File {} is now private", id),
                None => println!("No file with id {}; nothing changed", id),
            }
        }
        Commands::Remove { id } => {
            let id = FileId::new(id);
            match store.remove(&id) {
                Some(removed) => println!("{} has been removed from storage", removed.name),
                None => println!("No file with id {}; nothing changed", id),
            }
        }
        Commands::Stats { json } => {
            let stats = StorageStats::from_records(store.list(), config.display.storage_limit_bytes);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats);
            }
        }
        Commands::Shared { id } => {
            let id = FileId::new(id);
            match resolve_shared(store, &id) {
                Ok(record) => {
                    println!("{}", record.name());
                    println!("Size: {} • Type: {}", format_kib(record.size()), record.mime_type());
                    if !PreviewMode::for_record(record).can_download() {
                        println!("Download unavailable: the file's content is not held in this session");
                    }
                }
                Err(ShareError::NotFound(_)) => {
                    eprintln!("404: file not found");
                    std::process::exit(1);
                }
                Err(ShareError::Private(_)) => {
                    eprintln!("Access Denied: this file is private and cannot be accessed.");
                    std::process::exit(1);
                }
            }
        }
        Commands::Init { .. } | Commands::Login { .. } | Commands::Logout | Commands::Whoami => {
            unreachable!("handled before opening the store")
        }
    }

    Ok(())
}

fn visibility(record: &RuntimeFileRecord) -> &'static str {
    if record.is_public() {
        "Public"
    } else {
        "Private"
    }
}

/// Print records as a formatted table.
fn print_files_table(records: &[RuntimeFileRecord]) {
    if records.is_empty() {
        println!("No files uploaded yet.");
        return;
    }

    let now = Utc::now();
    println!(
        "{:<36}  {:<8}  {:<7}  {:>12}  {:<22}  NAME",
        "ID", "KIND", "ACCESS", "SIZE", "UPLOADED"
    );
    println!("{}", "-".repeat(100));

    for record in records {
        println!(
            "{:<36}  {:<8}  {:<7}  {:>12}  {:<22}  {}",
            record.id(),
            FileKind::from_mime(record.mime_type()).label(),
            visibility(record),
            format_size(record.size()),
            format_relative(record.uploaded_at(), now),
            record.name()
        );
    }

    println!();
    println!("Total: {} file(s)", records.len());
}

fn print_file_details(record: &RuntimeFileRecord) {
    let mime_type = if record.mime_type().is_empty() {
        "Unknown"
    } else {
        record.mime_type()
    };

    println!("Name:     {}", record.name());
    println!("ID:       {}", record.id());
    println!("Size:     {}", format_size(record.size()));
    println!("Type:     {}", mime_type);
    println!(
        "Uploaded: {} ({})",
        record.uploaded_at().to_rfc3339(),
        format_relative(record.uploaded_at(), Utc::now())
    );
    println!("Access:   {}", visibility(record));
    match PreviewMode::for_record(record) {
        PreviewMode::Unavailable => println!("Preview:  not available"),
        mode => println!("Preview:  {:?}", mode),
    }
}

fn print_stats(stats: &StorageStats) {
    const BAR_WIDTH: usize = 40;

    println!("Storage Overview");
    println!("  Total Storage Used: {}", format_size(stats.total_size));
    println!("  Private Files:      {}", stats.private_files);
    println!("  Public Files:       {}", stats.public_files);

    let percent = stats.usage_percent();
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    println!();
    println!(
        "  Storage Limit {}  [{}{}] {:.1}%",
        format_size(i64::try_from(stats.limit_bytes).unwrap_or(i64::MAX)),
        "#".repeat(filled),
        " ".repeat(BAR_WIDTH - filled.min(BAR_WIDTH)),
        percent
    );
}
