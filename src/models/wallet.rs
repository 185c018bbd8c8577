use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An onboarded wallet as persisted in `wallets.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub address: String,
    pub private_key: String,
    pub created_at: DateTime<Utc>,
    /// Fields added to the file by hand, written back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Wallet {
    /// A freshly onboarded wallet stamped with the current time
    pub fn new(address: String, private_key: String) -> Self {
        Self {
            address,
            private_key,
            created_at: Utc::now(),
            extra: Map::new(),
        }
    }
}

/// `0x1234...abcd` form used in progress output
pub fn shorten_address(address: &str) -> String {
    if address.len() <= 10 || !address.is_ascii() {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub total: u32,
    pub success: u32,
    pub failed: u32,
}

impl RunStats {
    pub fn record_success(&mut self) {
        self.success += 1;
        self.total += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
        self.total += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wallet_json_uses_camel_case() {
        let wallet = Wallet {
            address: "0x52908400098527886E0F7030069857D2E4169EE7".to_string(),
            private_key: "0xabc".to_string(),
            created_at: "2025-03-01T12:00:00.000Z".parse().unwrap(),
            extra: Map::new(),
        };

        let json = serde_json::to_value(&wallet).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 3);
        assert_eq!(json["address"], "0x52908400098527886E0F7030069857D2E4169EE7");
        assert_eq!(json["privateKey"], "0xabc");
        assert!(json["createdAt"].as_str().unwrap().starts_with("2025-03-01T12:00:00"));

        let back: Wallet = serde_json::from_value(json).unwrap();
        assert_eq!(back, wallet);
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let raw = serde_json::json!({
            "address": "0x52908400098527886E0F7030069857D2E4169EE7",
            "privateKey": "0xabc",
            "createdAt": "2025-03-01T12:00:00Z",
            "label": "main",
            "points": 42
        });

        let wallet: Wallet = serde_json::from_value(raw).unwrap();
        assert_eq!(wallet.extra["label"], "main");
        assert_eq!(wallet.extra["points"], 42);

        let back = serde_json::to_value(&wallet).unwrap();
        assert_eq!(back["label"], "main");
        assert_eq!(back["points"], 42);
        assert_eq!(back["privateKey"], "0xabc");
    }

    #[test]
    fn test_short_address() {
        assert_eq!(
            shorten_address("0x52908400098527886E0F7030069857D2E4169EE7"),
            "0x5290...9EE7"
        );
        assert_eq!(shorten_address("0x1234"), "0x1234");
    }

    #[test]
    fn test_run_stats_counts() {
        let mut stats = RunStats::default();
        stats.record_success();
        stats.record_failure();
        stats.record_success();

        assert_eq!(
            stats,
            RunStats {
                total: 3,
                success: 2,
                failed: 1
            }
        );
    }
}
