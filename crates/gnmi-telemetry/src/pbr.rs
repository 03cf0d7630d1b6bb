//! Policy-based routing (PBR) counters.
//!
//! Subscribes to `Cisco-IOS-XR-pbr-fwd-stats-oper` per (policy, rule) key and
//! maps forwarding statistics and the rule action into [`PbrBasicStat`].

use crate::counter::Counter;
use crate::decode::{FlatMap, POLICY_NAME_KEY, RULE_NAME_KEY};
use crate::error::{DecodeError, DecodeResult};
use serde::{Deserialize, Serialize};

/// Tag of the PBR counter family.
pub const PBR_TAG: &str = "pbr";

/// Origin of the PBR forwarding statistics model.
pub const PBR_PATH_ORIGIN: &str = "Cisco-IOS-XR-pbr-fwd-stats-oper";

/// Flat-map keys read by [`PbrBasic::from_map`].
pub mod fields {
    pub const BYTE_COUNT: &str = "/fib-stats/byte-count";
    pub const PACKET_COUNT: &str = "/fib-stats/packet-count";
    pub const TIMESTAMP_SECONDS: &str = "/fib-stats/collection-timestamp/seconds";
    pub const TIMESTAMP_NANOSECONDS: &str = "/fib-stats/collection-timestamp/nano-seconds";
    pub const PATH_GRP_NAME: &str = "/paction/policy-rule-action/act-un/path-grp-name";
    pub const POLICY_ACTION_TYPE: &str = "/paction/policy-rule-action/act-un/type";
}

/// A (policy, rule) combination to subscribe to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PbrKey {
    /// Policy-map name
    pub policy: String,
    /// Rule name within the policy-map
    pub rule: String,
}

impl PbrKey {
    /// Creates a key.
    pub fn new(policy: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            policy: policy.into(),
            rule: rule.into(),
        }
    }
}

/// Statistics of one policy/rule combination at one collection time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PbrBasicStat {
    pub policy_name: String,
    pub rule_name: String,
    pub byte_count: u64,
    pub packet_count: u64,
    pub collection_timestamp_seconds: u64,
    pub collection_timestamp_nanoseconds: u64,
    pub path_grp_name: String,
    pub policy_action_type: String,
}

/// PBR counter with basic forwarding statistics.
#[derive(Debug, Clone, Default)]
pub struct PbrBasic {
    keys: Vec<PbrKey>,
    stats: Vec<PbrBasicStat>,
}

impl PbrBasic {
    /// Creates a counter for the given keys.
    pub fn new(keys: Vec<PbrKey>) -> Self {
        Self {
            keys,
            stats: Vec::new(),
        }
    }

    /// Adds a key. Takes effect on the next register call.
    pub fn add_key(&mut self, key: PbrKey) {
        self.keys.push(key);
    }

    /// Configured keys.
    pub fn keys(&self) -> &[PbrKey] {
        &self.keys
    }
}

fn text_field(map: &FlatMap, key: &str) -> String {
    map.get(key).cloned().unwrap_or_default()
}

fn u64_field(map: &FlatMap, key: &str) -> DecodeResult<u64> {
    match map.get(key) {
        None => Ok(0),
        Some(value) => value.trim().parse().map_err(|_| DecodeError::Conversion {
            key: key.to_string(),
            value: value.clone(),
        }),
    }
}

impl Counter for PbrBasic {
    type Stat = PbrBasicStat;

    fn tag(&self) -> &str {
        PBR_TAG
    }

    fn path_origin(&self) -> &str {
        PBR_PATH_ORIGIN
    }

    fn subscription_paths(&self) -> Vec<String> {
        self.keys
            .iter()
            .map(|key| {
                format!(
                    "{}:pbr-stats/policy-maps/policy-map[policy-name={}]/rule-names/rule-name[rule-name={}]/",
                    PBR_PATH_ORIGIN, key.policy, key.rule
                )
            })
            .collect()
    }

    fn from_map(&self, map: &FlatMap) -> DecodeResult<PbrBasicStat> {
        Ok(PbrBasicStat {
            policy_name: text_field(map, POLICY_NAME_KEY),
            rule_name: text_field(map, RULE_NAME_KEY),
            byte_count: u64_field(map, fields::BYTE_COUNT)?,
            packet_count: u64_field(map, fields::PACKET_COUNT)?,
            collection_timestamp_seconds: u64_field(map, fields::TIMESTAMP_SECONDS)?,
            collection_timestamp_nanoseconds: u64_field(map, fields::TIMESTAMP_NANOSECONDS)?,
            path_grp_name: text_field(map, fields::PATH_GRP_NAME),
            policy_action_type: text_field(map, fields::POLICY_ACTION_TYPE),
        })
    }

    fn accumulate(&mut self, stat: PbrBasicStat) {
        self.stats.push(stat);
    }

    fn stats(&self) -> &[PbrBasicStat] {
        &self.stats
    }
}
