//! gNMI wire types for SONiC telemetry clients.
//!
//! This crate carries the prost/tonic code generated from the openconfig
//! `gnmi.proto` definition, restricted to what the Subscribe RPC needs:
//!
//! - [`gnmi::Path`] / [`gnmi::PathElem`]: hierarchical data tree addressing
//! - [`gnmi::Notification`] / [`gnmi::Update`] / [`gnmi::TypedValue`]: telemetry payloads
//! - [`gnmi::SubscribeRequest`] / [`gnmi::SubscribeResponse`]: the streaming RPC messages
//! - [`gnmi::g_nmi_client::GNmiClient`]: the client stub
//!
//! The generated sources are checked in so building does not require `protoc`.
//! `PathElem` keys are generated as a `BTreeMap` for deterministic ordering.

pub mod gnmi {
    include!("gnmi.rs");

    // Tonic-generated client code
    include!("gnmi.tonic.rs");
}

pub use gnmi::g_nmi_client::GNmiClient;
