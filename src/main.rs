use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use histfx::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for histfx::AppCommand {
    fn from(cmd: Commands) -> histfx::AppCommand {
        match cmd {
            Commands::Serve => histfx::AppCommand::Serve,
            Commands::Convert {
                currency,
                amount,
                year,
            } => histfx::AppCommand::Convert {
                currency,
                amount,
                year,
            },
            Commands::Seed { from_year, to_year } => {
                histfx::AppCommand::Seed { from_year, to_year }
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Run the HTTP conversion service
    Serve,
    /// Convert an amount into NOK for a historical year
    Convert {
        currency: String,
        amount: String,
        year: String,
    },
    /// Seed the rate cache for an inclusive year range
    Seed {
        from_year: i32,
        to_year: i32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => histfx::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = histfx::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
listen_addr: "127.0.0.1:8080"

providers:
  frankfurter:
    base_url: "https://api.frankfurter.dev"
  exchangerate_host:
    base_url: "https://api.exchangerate.host"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
