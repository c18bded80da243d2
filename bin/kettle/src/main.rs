use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::{eyre, WrapErr};
use suave_common::{utils::init_tracing_log, KettleConfig, SigningKeys};
use suave_precompiles::RelayClient;
use suave_types::{builder_signing_domain, SignedBidSubmission};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[clap(name = "kettle", about = "Submits confidential block bids and bundles")]
struct Cli {
    #[clap(long, default_value = "config.yml")]
    config: PathBuf,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a signed builder bid to the configured relay
    SubmitBlock {
        /// JSON encoded signed bid submission
        #[clap(long)]
        bid: PathBuf,
    },
    /// Submit a signed JSON-RPC bundle request
    SubmitBundle {
        /// Overrides `bundle_relay_url` from the config
        #[clap(long)]
        url: Option<String>,
        #[clap(long, default_value = "mev_sendBundle")]
        method: String,
        /// JSON file with the single request parameter
        #[clap(long)]
        params: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = match KettleConfig::load(&cli.config) {
        Ok(config) => config,
        Err(err) => panic!("failed to load config {}: {err}", cli.config.display()),
    };
    let _guard = init_tracing_log(&config.logging);

    match run(config, cli.command).await {
        Ok(_) => info!("kettle exited"),
        Err(err) => {
            error!(%err, "kettle exited with error");
            std::process::exit(1);
        }
    }
}

async fn run(config: KettleConfig, command: Command) -> eyre::Result<()> {
    let relay = RelayClient::new(reqwest::Client::new(), config.relay.timeout());

    match command {
        Command::SubmitBlock { bid } => {
            let data = std::fs::read(&bid).wrap_err_with(|| format!("reading {}", bid.display()))?;
            let bid: SignedBidSubmission = serde_json::from_slice(&data)?;
            bid.verify_signature(builder_signing_domain())
                .map_err(|err| eyre!("refusing to submit bid: {err}"))?;

            info!(
                slot = bid.slot(),
                block_hash = %bid.block_hash(),
                relay = %config.relay.url,
                "submitting block bid"
            );
            relay.submit_signed_bid(config.relay.url.as_str(), &bid).await?;
        }

        Command::SubmitBundle { url, method, params } => {
            let url = url
                .or_else(|| config.bundle_relay_url.as_ref().map(|url| url.to_string()))
                .ok_or_else(|| eyre!("no bundle relay url configured"))?;
            let params =
                std::fs::read(&params).wrap_err_with(|| format!("reading {}", params.display()))?;
            let keys = SigningKeys::from_env()?;

            info!(%url, %method, signer = ?keys.bundle_signer_address(), "submitting bundle");
            relay.submit_bundle_json_rpc(&keys, &url, &method, &params).await?;
        }
    }

    Ok(())
}
