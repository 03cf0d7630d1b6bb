//! gnmi-pbr-stats entry point.
//!
//! Subscribes to PBR forwarding counters on a gNMI target and prints every
//! record, either once or for as long as the stream runs.

use anyhow::{anyhow, bail, Context};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use sonic_gnmi_telemetry::config::DEFAULT_CONFIG_PATH;
use sonic_gnmi_telemetry::logging::{init_logging, DEFAULT_LOG_FILTER};
use sonic_gnmi_telemetry::{
    CallMetadata, Counter, GnmiClient, GnmiConnection, PbrBasic, PbrBasicStat, PbrKey, RpcArgs,
    StreamMode, TelemetryConfig, TonicTransport,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Subscription mode on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Once,
    Stream,
}

impl From<ModeArg> for StreamMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Once => StreamMode::Once,
            ModeArg::Stream => StreamMode::Stream,
        }
    }
}

/// SONiC gNMI PBR statistics client
#[derive(Parser, Debug)]
#[command(name = "gnmi-pbr-stats")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file
    #[arg(short = 'c', long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// gNMI username
    #[arg(short = 'u', long)]
    username: String,

    /// gNMI password
    #[arg(short = 'p', long)]
    password: String,

    /// Subscription mode, overrides the configuration file
    #[arg(short = 'm', long, value_enum)]
    mode: Option<ModeArg>,

    /// Additional policy/rule pair to subscribe to
    #[arg(long = "policy", value_name = "POLICY:RULE")]
    policies: Vec<String>,

    /// Close a stream after this many seconds
    #[arg(short = 'd', long)]
    duration_secs: Option<u64>,

    /// Print records as JSON lines
    #[arg(long)]
    json: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(short = 'l', long, default_value = DEFAULT_LOG_FILTER)]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_level) {
        eprintln!("gnmi-pbr-stats: {}", e);
        return ExitCode::FAILURE;
    }

    info!("gnmi-pbr-stats: Starting");

    match run(args).await {
        Ok(()) => {
            info!("gnmi-pbr-stats: Exiting normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "gnmi-pbr-stats: Exiting with error");
            ExitCode::FAILURE
        }
    }
}

fn parse_policy(arg: &str) -> anyhow::Result<PbrKey> {
    match arg.split_once(':') {
        Some((policy, rule)) if !policy.is_empty() && !rule.is_empty() => {
            Ok(PbrKey::new(policy, rule))
        }
        _ => bail!("invalid policy '{}', expected POLICY:RULE", arg),
    }
}

fn print_stat(stat: &PbrBasicStat, json: bool) {
    if json {
        match serde_json::to_string(stat) {
            Ok(line) => println!("{}", line),
            Err(e) => error!(error = %e, "Failed to serialize record"),
        }
        return;
    }

    let collected = i64::try_from(stat.collection_timestamp_seconds)
        .ok()
        .zip(u32::try_from(stat.collection_timestamp_nanoseconds).ok())
        .and_then(|(secs, nanos)| DateTime::<Utc>::from_timestamp(secs, nanos))
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());

    println!(
        "{} policy={} rule={} bytes={} packets={} action={} path_group={}",
        collected,
        stat.policy_name,
        stat.rule_name,
        stat.byte_count,
        stat.packet_count,
        stat.policy_action_type,
        stat.path_grp_name
    );
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut config = TelemetryConfig::load_or_default(&args.config)?;
    if let Some(mode) = args.mode {
        config.subscription.mode = mode.into();
    }
    for arg in &args.policies {
        config.policies.push(parse_policy(arg)?);
    }
    config.validate()?;
    if config.policies.is_empty() {
        bail!("no policies configured");
    }

    info!(
        server = %config.connection.server_address,
        tls = config.connection.tls,
        policies = config.policies.len(),
        mode = ?config.subscription.mode,
        "Configuration loaded"
    );

    let connection = GnmiConnection::new(&config.connection)?;
    if !connection
        .wait_for_ready(config.subscription.connect_retries, config.retry_interval())
        .await
    {
        bail!(
            "gNMI server {} not reachable",
            config.connection.server_address
        );
    }

    let transport = Arc::new(TonicTransport::new(connection.channel()));
    let client = GnmiClient::new(transport, PbrBasic::new(config.policies.clone()));
    let mut call = CallMetadata::new(args.username, args.password);
    if let Some(timeout) = config.timeout() {
        call = call.with_timeout(timeout);
    }
    let rpc_args = config.rpc_args();

    match rpc_args.mode {
        StreamMode::Once => {
            client
                .register_once(&call, &rpc_args)
                .await
                .context("subscribe once failed")?;
            for stat in client.stats() {
                print_stat(&stat, args.json);
            }
            Ok(())
        }
        StreamMode::Stream => {
            let duration = args.duration_secs.map(Duration::from_secs);
            run_stream(&client, &call, &rpc_args, duration, args.json).await
        }
    }
}

async fn run_stream(
    client: &GnmiClient<PbrBasic>,
    call: &CallMetadata,
    rpc_args: &RpcArgs,
    duration: Option<Duration>,
    json: bool,
) -> anyhow::Result<()> {
    let (failed_tx, mut failed_rx) = mpsc::unbounded_channel();
    client.set_rpc_failed_handler(move |status| {
        let _ = failed_tx.send(status);
    });
    client.set_rpc_success_handler(move |counter: &PbrBasic| {
        if let Some(stat) = counter.stats().last() {
            print_stat(stat, json);
        }
    });

    client
        .register_stream(call, rpc_args)
        .await
        .context("failed to start subscription stream")?;

    let expired = async {
        match duration {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending().await,
        }
    };

    let outcome = tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received Ctrl-C, closing stream");
            Ok(())
        }
        _ = expired => {
            info!("Stream duration elapsed");
            Ok(())
        }
        Some(status) = failed_rx.recv() => Err(anyhow!(
            "subscription stream failed: {} ({:?})",
            status.message(),
            status.code()
        )),
    };

    client.close().await?;
    info!(records = client.stats().len(), "Stream closed");
    outcome
}
