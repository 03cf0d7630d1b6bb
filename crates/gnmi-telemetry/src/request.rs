//! Subscribe request construction.

use crate::error::{DecodeError, DecodeResult};
use crate::path::{path_to_string, string_to_path};
use serde::{Deserialize, Serialize};
use sonic_gnmi_proto::gnmi::{
    subscribe_request, subscription_list, Encoding, Path, SubscribeRequest, Subscription,
    SubscriptionList, SubscriptionMode,
};
use std::fmt::Write as _;
use tracing::warn;

/// Default interval between samples, in nanoseconds.
pub const DEFAULT_SAMPLE_INTERVAL_NSEC: u64 = 1_000_000_000;

/// Subscription mode of a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamMode {
    /// Long-lived sampled stream
    #[default]
    Stream,
    /// Single retrieval, the target closes the RPC afterwards
    Once,
}

impl From<StreamMode> for subscription_list::Mode {
    fn from(mode: StreamMode) -> Self {
        match mode {
            StreamMode::Stream => subscription_list::Mode::Stream,
            StreamMode::Once => subscription_list::Mode::Once,
        }
    }
}

/// Subscription RPC options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcArgs {
    /// Interval between samples in nanoseconds
    pub sample_interval_nsec: u64,
    /// Encoding the target should use for notifications
    pub encoding: Encoding,
    /// Subscription mode. The register calls override it.
    pub mode: StreamMode,
}

impl Default for RpcArgs {
    fn default() -> Self {
        Self {
            sample_interval_nsec: DEFAULT_SAMPLE_INTERVAL_NSEC,
            encoding: Encoding::Proto,
            mode: StreamMode::Stream,
        }
    }
}

/// Returns true for the encodings this client can decode.
pub fn is_supported_encoding(encoding: Encoding) -> bool {
    matches!(encoding, Encoding::Proto | Encoding::JsonIetf)
}

/// Builds a subscribe request for `paths`.
///
/// Every path becomes one SAMPLE subscription at the configured interval.
/// A path that fails to parse is logged and its subscription is sent with an
/// empty path, the rest of the batch is unaffected. An encoding other than PROTO
/// or JSON_IETF fails with [`DecodeError::UnsupportedEncoding`] before any
/// path is looked at.
pub fn build_subscribe_request(args: &RpcArgs, paths: &[String]) -> DecodeResult<SubscribeRequest> {
    if !is_supported_encoding(args.encoding) {
        warn!(encoding = args.encoding.as_str_name(), "Unknown encoding");
        return Err(DecodeError::UnsupportedEncoding(args.encoding as i32));
    }

    let subscription = paths
        .iter()
        .map(|path| {
            let path = string_to_path(path).unwrap_or_else(|e| {
                warn!(error = %e, "Invalid argument while converting subscription path");
                Path::default()
            });
            Subscription {
                path: Some(path),
                mode: SubscriptionMode::Sample as i32,
                sample_interval: args.sample_interval_nsec,
                ..Default::default()
            }
        })
        .collect();

    let list = SubscriptionList {
        subscription,
        mode: subscription_list::Mode::from(args.mode) as i32,
        encoding: args.encoding as i32,
        ..Default::default()
    };

    Ok(SubscribeRequest {
        request: Some(subscribe_request::Request::Subscribe(list)),
    })
}

/// Human readable dump of a subscribe request, for debug logs.
pub fn describe_subscribe_request(request: &SubscribeRequest) -> String {
    let mut out = String::from("--------SubscribeRequest--------\n");
    let Some(subscribe_request::Request::Subscribe(list)) = request.request.as_ref() else {
        out.push_str("No SubscriptionList\n");
        return out;
    };

    if let Some(prefix) = &list.prefix {
        let _ = writeln!(out, "SubscriptionList Prefix: {}", path_to_string(prefix));
    }
    for (i, subscription) in list.subscription.iter().enumerate() {
        let _ = writeln!(out, "Subscription[{i}]:");
        match &subscription.path {
            Some(path) => {
                let _ = writeln!(out, "Path: {}", path_to_string(path));
            }
            None => out.push_str("Path: Does not Exist\n"),
        }
    }
    out
}
