pub mod config;
pub mod core;
pub mod http;
pub mod providers;
pub mod rate_provider;
pub mod resolver;
pub mod seed;
pub mod store;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::providers::{ExchangerateHostProvider, FrankfurterProvider};
use crate::resolver::{ProviderSet, Resolver};
use crate::seed::Seeder;
use crate::store::FjallRateStore;

pub enum AppCommand {
    Serve,
    Convert {
        currency: String,
        amount: String,
        year: String,
    },
    Seed {
        from_year: i32,
        to_year: i32,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = Arc::new(FjallRateStore::new(
        &config.default_data_path()?.join("cache"),
    )?);
    let providers = provider_set(&config);

    match command {
        AppCommand::Serve => {
            let resolver = Arc::new(Resolver::new(store, providers));
            let listener = TcpListener::bind(config.listen_addr())
                .await
                .with_context(|| format!("Failed to bind to {}", config.listen_addr()))?;
            http::serve(listener, http::AppState { resolver }).await
        }
        AppCommand::Convert {
            currency,
            amount,
            year,
        } => {
            let resolver = Resolver::new(store, providers);
            let conversion = resolver.convert(&currency, &amount, &year).await?;
            println!("{}", serde_json::to_string_pretty(&conversion)?);
            Ok(())
        }
        AppCommand::Seed { from_year, to_year } => {
            let seeder = Seeder::new(store, providers);
            let summary = seeder.seed_years(from_year, to_year).await?;
            info!(
                "Seeded {} rate records ({} skipped)",
                summary.seeded, summary.skipped
            );
            Ok(())
        }
    }
}

fn provider_set(config: &AppConfig) -> ProviderSet {
    ProviderSet {
        frankfurter: Arc::new(FrankfurterProvider::new(config.frankfurter_base_url())),
        exchangerate_host: Arc::new(ExchangerateHostProvider::new(
            config.exchangerate_host_base_url(),
        )),
    }
}
