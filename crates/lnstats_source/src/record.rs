//! Lightning Network statistics record.

use serde::{Deserialize, Serialize};

/// Declared field order of a stat record.
///
/// Shared by deserialization, the store header and row encoding. The
/// timestamp is always the first field.
pub const STAT_FIELDS: [&str; 7] = [
    "added",
    "channel_count",
    "total_capacity",
    "tor_nodes",
    "clearnet_nodes",
    "unannounced_nodes",
    "clearnet_tor_nodes",
];

/// One point-in-time snapshot of the Lightning Network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    /// Unix timestamp in seconds at which the snapshot was taken.
    pub added: u32,
    /// Total number of public channels.
    pub channel_count: u64,
    /// Total network capacity.
    pub total_capacity: f64,
    /// Nodes reachable only over Tor.
    pub tor_nodes: u64,
    /// Nodes exposing a public IP address.
    pub clearnet_nodes: u64,
    /// Nodes without a public address announcement.
    pub unannounced_nodes: u64,
    /// Nodes reachable over both clearnet and Tor.
    pub clearnet_tor_nodes: u64,
}

impl StatRecord {
    /// Renders every field after `added`, in [`STAT_FIELDS`] order.
    pub fn gauge_values(&self) -> [String; 6] {
        [
            self.channel_count.to_string(),
            self.total_capacity.to_string(),
            self.tor_nodes.to_string(),
            self.clearnet_nodes.to_string(),
            self.unannounced_nodes.to_string(),
            self.clearnet_tor_nodes.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StatRecord {
        StatRecord {
            added: 1_700_000_000,
            channel_count: 61_000,
            total_capacity: 5_123_456_789.0,
            tor_nodes: 10_000,
            clearnet_nodes: 2_000,
            unannounced_nodes: 300,
            clearnet_tor_nodes: 1_500,
        }
    }

    #[test]
    fn timestamp_is_first_field() {
        assert_eq!(STAT_FIELDS[0], "added");
        assert_eq!(STAT_FIELDS.len(), 1 + sample().gauge_values().len());
    }

    #[test]
    fn gauge_values_follow_schema_order() {
        let values = sample().gauge_values();
        assert_eq!(
            values,
            ["61000", "5123456789", "10000", "2000", "300", "1500"].map(String::from)
        );
    }

    #[test]
    fn fractional_capacity_is_kept() {
        let mut record = sample();
        record.total_capacity = 1234.5;
        assert_eq!(record.gauge_values()[1], "1234.5");
    }

    #[test]
    fn deserialize_ignores_unknown_fields() {
        let json = r#"{
            "added": 1700000000,
            "channel_count": 1,
            "total_capacity": 2,
            "tor_nodes": 3,
            "clearnet_nodes": 4,
            "unannounced_nodes": 5,
            "clearnet_tor_nodes": 6,
            "avg_fee_rate": 7
        }"#;
        let record: StatRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.added, 1_700_000_000);
        assert_eq!(record.clearnet_tor_nodes, 6);
    }

    #[test]
    fn deserialize_rejects_missing_field() {
        let json = r#"{"added": 1700000000, "channel_count": 1}"#;
        assert!(serde_json::from_str::<StatRecord>(json).is_err());
    }

    #[test]
    fn deserialize_rejects_negative_timestamp() {
        let json = r#"{
            "added": -5,
            "channel_count": 1,
            "total_capacity": 2,
            "tor_nodes": 3,
            "clearnet_nodes": 4,
            "unannounced_nodes": 5,
            "clearnet_tor_nodes": 6
        }"#;
        assert!(serde_json::from_str::<StatRecord>(json).is_err());
    }
}
