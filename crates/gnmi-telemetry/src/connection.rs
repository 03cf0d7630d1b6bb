//! gRPC channel to the gNMI target.

use crate::error::{Result, TelemetryError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tonic::transport::{Certificate, Channel, ClientTlsConfig, Endpoint, Identity};
use tracing::{error, info};

/// Channel arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelArgs {
    /// `host:port` of the gNMI server
    #[serde(default = "default_server_address")]
    pub server_address: String,
    /// Use TLS. Requires `root_cert_path`.
    #[serde(default)]
    pub tls: bool,
    #[serde(default)]
    pub root_cert_path: Option<PathBuf>,
    #[serde(default)]
    pub private_key_path: Option<PathBuf>,
    #[serde(default)]
    pub cert_chain_path: Option<PathBuf>,
}

fn default_server_address() -> String {
    "127.0.0.1:57400".to_string()
}

impl Default for ChannelArgs {
    fn default() -> Self {
        Self {
            server_address: default_server_address(),
            tls: false,
            root_cert_path: None,
            private_key_path: None,
            cert_chain_path: None,
        }
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| TelemetryError::CertificateRead {
        path: path.display().to_string(),
        source,
    })
}

fn tls_config(args: &ChannelArgs) -> Result<ClientTlsConfig> {
    let root = args.root_cert_path.as_deref().ok_or_else(|| {
        TelemetryError::Configuration("TLS enabled but no root certificate path given".to_string())
    })?;
    let mut tls = ClientTlsConfig::new().ca_certificate(Certificate::from_pem(read_pem(root)?));

    match (&args.private_key_path, &args.cert_chain_path) {
        (Some(key), Some(chain)) => {
            let identity = Identity::from_pem(read_pem(chain)?, read_pem(key)?);
            tls = tls.identity(identity);
        }
        (None, None) => {}
        _ => {
            return Err(TelemetryError::Configuration(
                "private key and certificate chain must be given together".to_string(),
            ))
        }
    }
    Ok(tls)
}

/// Lazily connected channel to one gNMI server.
#[derive(Debug, Clone)]
pub struct GnmiConnection {
    endpoint: Endpoint,
    channel: Channel,
}

impl GnmiConnection {
    /// Builds the channel. Certificates are read here, the network is not
    /// touched until the first call.
    pub fn new(args: &ChannelArgs) -> Result<Self> {
        let scheme = if args.tls { "https" } else { "http" };
        let mut endpoint = Endpoint::from_shared(format!("{scheme}://{}", args.server_address))
            .map_err(|e| {
                TelemetryError::Configuration(format!(
                    "invalid server address '{}': {e}",
                    args.server_address
                ))
            })?;
        if args.tls {
            endpoint = endpoint.tls_config(tls_config(args)?)?;
        }

        let channel = endpoint.connect_lazy();
        Ok(Self { endpoint, channel })
    }

    pub fn channel(&self) -> Channel {
        self.channel.clone()
    }

    /// Tries to connect up to `retries` times, each attempt bounded by
    /// `interval`. Returns true once a connection succeeds.
    pub async fn wait_for_ready(&self, retries: u32, interval: Duration) -> bool {
        for attempt in 1..=retries {
            match tokio::time::timeout(interval, self.endpoint.connect()).await {
                Ok(Ok(_)) => {
                    info!(attempt, "Connected to gNMI server");
                    return true;
                }
                Ok(Err(e)) => {
                    info!(attempt, retries, error = %e, "gNMI server not ready");
                    tokio::time::sleep(interval).await;
                }
                Err(_) => {
                    info!(attempt, retries, "Timed out connecting to gNMI server");
                }
            }
        }
        error!(retries, "Failed to connect to gNMI server");
        false
    }
}
