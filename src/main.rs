//! vpnpeer-gen entry point.
//!
//! Asks for a peer count and a name prefix, builds that many third-party VPN
//! peers from the template file and replaces the organization's peer list
//! with them in one call.

use std::io;
use std::process::ExitCode;

use anyhow::Context;
use log::{debug, info, warn};

mod config;
mod generator;
mod prompt;
mod submit;
mod subnet;
mod template;
mod types;

use config::Config;
use generator::{generate_peers, validate_peer_count};
use submit::{submit, MerakiClient, SubmitOutcome};
use template::load_template;
use types::Payload;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    // A local .env may carry M_API_KEY and M_ORG_ID
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Ok(path) = dotenv {
        debug!("Loaded environment from {}", path.display());
    }

    // Load configuration
    let cfg = Config::load()?;
    info!("Starting vpnpeer-gen with config: {:?}", cfg);

    let (requested, prefix) = {
        let mut input = io::stdin().lock();
        let mut output = io::stdout();
        let requested = prompt::ask_peer_count(&mut input, &mut output)?;
        let prefix = prompt::ask_name_prefix(&mut input, &mut output)?;
        (requested, prefix)
    };

    let template = load_template(&cfg.template_path).context("Failed to load peer template")?;
    let count = validate_peer_count(requested)?;

    let peers = generate_peers(&template, count, &prefix, cfg.id_base, &mut rand::thread_rng())
        .context("Failed to generate peers")?;
    let payload = Payload::new(peers);

    if cfg.dry_run {
        println!("{}", serde_json::to_string_pretty(&payload)?);
        info!("Dry run, {} peers not submitted", payload.peers.len());
        return Ok(ExitCode::SUCCESS);
    }

    let client = MerakiClient::new(&cfg.base_url, cfg.org_id.clone(), cfg.api_key.clone())
        .context("Failed to build HTTP client")?;
    let outcome = submit(&client, &payload).await;
    match &outcome {
        SubmitOutcome::Accepted { status } => {
            info!("Bulk update of {} peers accepted ({})", payload.peers.len(), status)
        }
        SubmitOutcome::Rejected { status, body } => {
            warn!("Bulk update rejected with status {} ({} bytes of response)", status, body.len())
        }
        SubmitOutcome::TransportFailed(reason) => {
            warn!("Bulk update never reached the API: {}", reason)
        }
    }

    // The remote outcome only changes the exit status when asked to.
    if !outcome.is_success() && cfg.fail_on_reject {
        warn!("Submission did not succeed, exiting with status 2");
        return Ok(ExitCode::from(2));
    }

    info!("Done.");
    Ok(ExitCode::SUCCESS)
}
