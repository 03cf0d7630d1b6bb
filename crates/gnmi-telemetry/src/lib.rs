//! gNMI telemetry client for SONiC
//!
//! Subscribes to policy-based routing (PBR) forwarding counters on a gNMI
//! target, either as a single ONCE retrieval or as a long-lived sampled
//! stream, and decodes every notification into typed records.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   SubscribeRequest   ┌────────────────┐
//! │  GnmiClient  │─────────────────────▶│  gNMI target   │
//! │  (session)   │◀─────────────────────│                │
//! └──────┬───────┘  SubscribeResponse   └────────────────┘
//!        │
//!        ▼
//!   check_response ──▶ parse_notification ──▶ FlatMap ──▶ Counter::from_map
//! ```
//!
//! Modules, bottom up:
//!
//! - [`path`]: path string codec
//! - [`decode`]: notification flattening
//! - [`counter`] / [`pbr`]: counter capability set and the PBR counter
//! - [`request`]: subscribe request construction
//! - [`transport`] / [`session`]: stream lifecycle and receive loop
//! - [`connection`], [`config`], [`logging`]: process plumbing

pub mod config;
pub mod connection;
pub mod counter;
pub mod decode;
pub mod error;
pub mod logging;
pub mod path;
pub mod pbr;
pub mod request;
pub mod session;
pub mod transport;

pub use config::TelemetryConfig;
pub use connection::{ChannelArgs, GnmiConnection};
pub use counter::Counter;
pub use decode::{check_response, parse_notification, FlatMap};
pub use error::{
    DecodeError, DecodeResult, ErrorCode, InternalErrorCode, PathError, Result, SessionError,
    SessionResult, SessionResultExt, TelemetryError,
};
pub use path::{path_to_string, string_to_path};
pub use pbr::{PbrBasic, PbrBasicStat, PbrKey};
pub use request::{build_subscribe_request, describe_subscribe_request, RpcArgs, StreamMode};
pub use session::{GnmiClient, SessionState};
pub use transport::{CallMetadata, ResponseStream, SubscribeTransport, TonicTransport};
