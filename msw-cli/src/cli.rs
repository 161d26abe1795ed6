use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use inquire::{CustomType, Password, Select};
use msw_core::{ClientConfig, ConfigError, MswClient, SpotId, Units};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "msw", version, about = "Magic Seaweed forecast CLI")]
pub struct Cli {
    /// Log request details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store an API key and default spot in the config file.
    Configure,

    /// Fetch the forecast for a spot.
    Forecast {
        #[command(flatten)]
        overrides: Overrides,

        /// Print the raw records as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },

    /// Print the request URL without sending it.
    Endpoint {
        #[command(flatten)]
        overrides: Overrides,
    },
}

/// Per-invocation settings layered over the config file.
#[derive(Debug, Default, Args)]
pub struct Overrides {
    /// API key; falls back to the configured one.
    #[arg(long, env = "MSW_KEY", hide_env_values = true)]
    pub apikey: Option<String>,

    /// Spot id, e.g. 1449 for Porthcawl Rest Bay.
    #[arg(long)]
    pub spot: Option<SpotId>,

    /// Unit system: uk, us or eu.
    #[arg(long)]
    pub units: Option<Units>,

    /// Only return this field; repeat for several.
    #[arg(long = "field")]
    pub fields: Vec<String>,
}

impl Overrides {
    pub fn apply(self, cfg: &mut ClientConfig) {
        if let Some(apikey) = self.apikey {
            cfg.apikey = Some(apikey);
        }
        if let Some(spot) = self.spot {
            cfg.spot_id = Some(spot);
        }
        if let Some(units) = self.units {
            cfg.units = Some(units);
        }
        cfg.fields.extend(self.fields);
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Forecast { overrides, json } => {
                let client = build_client(overrides)?;

                match client.request().await {
                    Ok(forecast) if json => {
                        println!("{}", serde_json::to_string_pretty(&forecast)?);
                    }
                    Ok(forecast) => print!("{}", output::summary(&forecast)),
                    Err(err) => return Err(anyhow!(serde_json::to_string(&err.payload())?)),
                }
                Ok(())
            }
            Command::Endpoint { overrides } => {
                let client = build_client(overrides)?;
                println!("{}", client.request_endpoint());
                Ok(())
            }
        }
    }
}

fn build_client(overrides: Overrides) -> anyhow::Result<MswClient> {
    let mut cfg = ClientConfig::load()?;
    overrides.apply(&mut cfg);

    MswClient::new(cfg).map_err(|err| match err {
        ConfigError::MissingApiKey | ConfigError::MissingSpotId => anyhow!(
            "{err}.\n\
             Hint: run `msw configure` or pass --apikey / --spot."
        ),
        other => anyhow::Error::new(other),
    })
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = ClientConfig::load()?;

    let apikey = Password::new("API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let spot = CustomType::<SpotId>::new("Default spot id:")
        .with_help_message("The number at the end of the spot's surf report URL")
        .with_error_message("Spot Id should be a non-negative integer")
        .prompt()
        .context("Failed to read spot id")?;

    let units = Select::new("Units:", Units::all().to_vec())
        .prompt()
        .context("Failed to read units")?;

    cfg.apikey = Some(apikey);
    cfg.spot_id = Some(spot);
    cfg.units = Some(units);
    cfg.save()?;

    println!(
        "Saved configuration to {}",
        ClientConfig::config_file_path()?.display()
    );
    Ok(())
}
