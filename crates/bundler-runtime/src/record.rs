//! Wire format for items arriving on the producer stream.
//!
//! One JSON object per line. Amounts may be JSON numbers, decimal strings or
//! `0x`-prefixed hex strings:
//!
//! ```json
//! {"id": "0x2", "origin": "0xBob", "destination": "0xSushi", "cost": "150000000000",
//!  "value": "0x1bc16d674ec80000", "dependencies": ["0x1"]}
//! ```

use bundler_engine::{Amount, Item, TimeSource, Timestamp};
use serde::{Deserialize, Deserializer};

/// Parses a decimal or `0x`-prefixed hex amount.
pub fn parse_amount(text: &str) -> Option<Amount> {
    let text = text.trim();
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => Amount::from_str_radix(hex, 16).ok(),
        None => Amount::from_dec_str(text).ok(),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Number(u64),
    Text(String),
}

fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
    match AmountRepr::deserialize(deserializer)? {
        AmountRepr::Number(n) => Ok(Amount::from(n)),
        AmountRepr::Text(text) => parse_amount(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid amount {text:?}"))),
    }
}

fn optional_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Amount>, D::Error> {
    amount(deserializer).map(Some)
}

/// An item as submitted by a producer.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemRecord {
    pub id: String,
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub destination: String,
    #[serde(deserialize_with = "amount")]
    pub cost: Amount,
    #[serde(default, deserialize_with = "amount")]
    pub value: Amount,
    /// Declared profit; derived as `value - cost` when absent.
    #[serde(default, deserialize_with = "optional_amount")]
    pub profit: Option<Amount>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Arrival time in ms; stamped from the time source when absent.
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

impl ItemRecord {
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }

    pub fn into_item(self, clock: &dyn TimeSource) -> Item {
        let timestamp = self.timestamp.unwrap_or_else(|| clock.now());
        let item = Item::new(
            self.id,
            self.origin,
            self.destination,
            self.cost,
            self.value,
            timestamp,
        )
        .with_dependencies(self.dependencies);

        match self.profit {
            Some(profit) => item.with_profit(profit),
            None => item,
        }
    }
}
