use std::{
    process::ExitCode,
    sync::{atomic::AtomicBool, atomic::Ordering, Arc},
};

use anyhow::{Context, Result};
use bigdecimal::BigDecimal;
use clap::{Args, Parser, Subcommand};
use log::{error, info};
use serde_json::Value;
use tokio::sync::broadcast;

use crate::{
    casafari::{CasafariClient, SyncFilters},
    config::Config,
    db::{MemoryPropertyStore, PgPropertyStore, PropertyFilter, TrashMode},
    models::property::Property,
    producer::SyncProducer,
    sync::{SyncService, SyncStats},
};

#[derive(Parser, Debug)]
#[command(name = "casafari-sync", version, about = "Sync Casafari listings into Postgres")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sync listings once. Without filter flags the configured filter sets are used
    Sync(SyncArgs),
    /// Check that the API accepts the configured credentials
    Test,
    /// Sync on the configured interval until Ctrl-C
    Watch,
    /// Print a single remote listing
    Fetch { id: String },
    /// Print the current property alerts
    Alerts,
    /// Print comparables for a remote listing
    Comparables { id: String },
    /// List synced properties
    List(ListArgs),
    /// Soft delete a synced property
    Delete { casafari_id: String },
    /// Restore a soft-deleted property
    Restore { casafari_id: String },
}

#[derive(Args, Debug, Default)]
pub struct SyncArgs {
    /// Country code, e.g. PT or ES
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    /// Property type, e.g. apartment or house
    #[arg(long = "type")]
    pub property_type: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    /// Run the pipeline against an in-memory store, leaving the database alone
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    pub fn filters(&self) -> SyncFilters {
        SyncFilters {
            country: self.country.clone(),
            city: self.city.clone(),
            property_type: self.property_type.clone(),
            location: self.location.clone(),
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long = "type")]
    pub property_type: Option<String>,
    #[arg(long)]
    pub min_price: Option<BigDecimal>,
    #[arg(long)]
    pub max_price: Option<BigDecimal>,
    /// Only rows flagged active
    #[arg(long)]
    pub active: bool,
    #[arg(long, conflicts_with = "only_trashed")]
    pub with_trashed: bool,
    #[arg(long)]
    pub only_trashed: bool,
    #[arg(long)]
    pub limit: Option<i64>,
}

impl ListArgs {
    pub fn filter(&self) -> PropertyFilter {
        let trash = if self.only_trashed {
            TrashMode::Only
        } else if self.with_trashed {
            TrashMode::Include
        } else {
            TrashMode::Exclude
        };

        PropertyFilter {
            active_only: self.active,
            property_type: self.property_type.clone(),
            city: self.city.clone(),
            min_price: self.min_price.clone(),
            max_price: self.max_price.clone(),
            trash,
            limit: self.limit,
        }
    }
}

pub async fn run(cli: Cli, config: Arc<Config>) -> Result<ExitCode> {
    match cli.command {
        Command::Sync(args) => sync(&config, &args).await,
        Command::Test => {
            info!("Testing Casafari API connection");
            let client = CasafariClient::new(&config.casafari)?;
            if client.test_connection().await {
                println!("Connection successful");
                Ok(ExitCode::SUCCESS)
            } else {
                println!("Connection failed, check the API credentials");
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Watch => watch(config).await,
        Command::Fetch { id } => {
            let client = CasafariClient::new(&config.casafari)?;
            print_json(&client.get_property(&id).await?)
        }
        Command::Alerts => {
            let client = CasafariClient::new(&config.casafari)?;
            print_json(&client.get_alerts().await?)
        }
        Command::Comparables { id } => {
            let client = CasafariClient::new(&config.casafari)?;
            print_json(&client.get_comparables(&id).await?)
        }
        Command::List(args) => {
            let mut store = PgPropertyStore::connect(&config.database_url)?;
            for property in store.list(&args.filter())? {
                println!("{}", summary_line(&property));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Delete { casafari_id } => {
            let mut store = PgPropertyStore::connect(&config.database_url)?;
            report_change(store.soft_delete(&casafari_id)?, "deleted", &casafari_id)
        }
        Command::Restore { casafari_id } => {
            let mut store = PgPropertyStore::connect(&config.database_url)?;
            report_change(store.restore(&casafari_id)?, "restored", &casafari_id)
        }
    }
}

async fn sync(config: &Config, args: &SyncArgs) -> Result<ExitCode> {
    let filters = args.filters();
    let filter_sets = if filters.is_empty() {
        config.sync.filters.clone()
    } else {
        info!("Applying filters: {filters}");
        vec![filters]
    };

    let client = CasafariClient::new(&config.casafari)?;
    let per_page = config.casafari.per_page;

    let stats = if args.dry_run {
        let mut service =
            SyncService::new(client, MemoryPropertyStore::new()).with_per_page(per_page);
        service.sync_all(&filter_sets).await
    } else {
        let store = PgPropertyStore::connect(&config.database_url)
            .context("could not open the database, use --dry-run to sync without one")?;
        let mut service = SyncService::new(client, store).with_per_page(per_page);
        service.sync_all(&filter_sets).await
    };

    print_stats(&stats);

    Ok(if stats.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn watch(config: Arc<Config>) -> Result<ExitCode> {
    let shutdown = Arc::new(AtomicBool::new(false));
    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

    let signal_flag = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Could not listen for Ctrl-C: {e}");
            return;
        }
        info!("Shutdown requested");
        signal_flag.store(true, Ordering::Release);
        let _ = shutdown_tx.send(());
    });

    SyncProducer::run(&config, shutdown, shutdown_rx).await?;
    Ok(ExitCode::SUCCESS)
}

fn print_stats(stats: &SyncStats) {
    println!();
    println!("Sync completed!");
    println!("{:<16} {:>8}", "Metric", "Count");
    println!("{:<16} {:>8}", "Total processed", stats.total);
    println!("{:<16} {:>8}", "Created", stats.created);
    println!("{:<16} {:>8}", "Updated", stats.updated);
    println!("{:<16} {:>8}", "Errors", stats.errors);
    if stats.fetch_failed {
        println!("A page fetch failed, the sync stopped early. See the log for details.");
    }
}

fn print_json(value: &Value) -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(ExitCode::SUCCESS)
}

fn report_change(changed: bool, action: &str, casafari_id: &str) -> Result<ExitCode> {
    if changed {
        println!("Property {casafari_id} {action}");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("No property {casafari_id} to be {action}");
        Ok(ExitCode::FAILURE)
    }
}

fn summary_line(property: &Property) -> String {
    format!(
        "{:<6} {:<24} {:<12} {:<18} {}{}",
        property.id,
        property.casafari_id,
        property.property_type.as_deref().unwrap_or("-"),
        property.formatted_price().unwrap_or_else(|| "-".to_string()),
        property.full_address(),
        if property.is_trashed() { " [deleted]" } else { "" }
    )
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn sync_flags_become_filters() {
        let cli = Cli::parse_from(["casafari-sync", "sync", "--country", "PT", "--type", "house"]);
        let Command::Sync(args) = cli.command else {
            panic!("expected the sync command");
        };
        let filters = args.filters();
        assert_eq!(filters.country.as_deref(), Some("PT"));
        assert_eq!(filters.property_type.as_deref(), Some("house"));
        assert!(!args.dry_run);
    }

    #[test]
    fn list_flags_pick_trash_mode() {
        let cli = Cli::parse_from(["casafari-sync", "list", "--only-trashed", "--min-price", "1000"]);
        let Command::List(args) = cli.command else {
            panic!("expected the list command");
        };
        let filter = args.filter();
        assert_eq!(filter.trash, TrashMode::Only);
        assert_eq!(filter.min_price, Some(BigDecimal::from(1000)));
    }
}
