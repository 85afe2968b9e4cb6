use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use gunzip_relay::config::Config;
use gunzip_relay::event::S3Event;
use gunzip_relay::relay::{InvocationStatus, Relay, RelayOptions};
use gunzip_relay::store::S3ObjectStore;

const EXIT_FAILED: i32 = 1;
const EXIT_SETUP_ERROR: i32 = 2;

/// Gunzip Relay - decompress gzip objects named by an S3 event notification
#[derive(Parser, Debug)]
#[command(name = "gunzip-relay")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the S3 event JSON, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    event: String,
}

fn exit_code(status: InvocationStatus) -> i32 {
    match status {
        InvocationStatus::Ok => 0,
        InvocationStatus::Failed => EXIT_FAILED,
    }
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(Config::default()),
    }
}

fn read_event(source: &str) -> anyhow::Result<S3Event> {
    let json = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read event from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read event file {}", source))?
    };
    S3Event::from_json(&json).context("Failed to parse S3 event")
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("{:#}", e);
        std::process::exit(EXIT_SETUP_ERROR);
    });

    // Initialize logging subsystem
    if let Err(e) = gunzip_relay::logging::init_subscriber(config.logging.format) {
        eprintln!("Failed to initialize logging subsystem: {}", e);
        std::process::exit(EXIT_SETUP_ERROR);
    }

    let records = match read_event(&args.event) {
        Ok(event) => event.into_records(),
        Err(e) => {
            tracing::error!(error = %format!("{:#}", e), "Invalid event");
            std::process::exit(EXIT_SETUP_ERROR);
        }
    };

    tracing::info!(
        records = records.len(),
        source_suffix = %config.relay.source_suffix,
        output_suffix = %config.relay.output_suffix,
        failure_policy = ?config.relay.failure_policy,
        "Event loaded"
    );

    // One client per invocation, shared by every record in the batch
    let store = S3ObjectStore::from_settings(&config.s3).await;
    let relay = Relay::new(Arc::new(store), RelayOptions::from(&config.relay));

    let report = relay.process_batch(&records).await;
    let status = report.status();
    println!("{}", status);

    if !status.is_ok() {
        std::process::exit(exit_code(status));
    }
}
