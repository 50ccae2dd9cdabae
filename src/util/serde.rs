//! Serde helpers for wire formats owned by external services.

/// Epoch milliseconds carried as a decimal string (`"1700000160000"`).
pub mod epoch_ms_string {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    /// Serialize an `i64` as its decimal string.
    pub fn serialize<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    /// Deserialize a decimal string into an `i64`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}
