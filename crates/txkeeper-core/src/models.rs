//! Core data models

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single financial transaction entry
///
/// Field names serialize in camelCase. The PascalCase aliases let data files
/// written by older deployments load unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Assigned by the store on creation
    #[serde(default, alias = "Id")]
    pub id: Uuid,
    /// Caller-supplied grouping key
    #[serde(default, alias = "ApplicationId")]
    pub application_id: i32,
    /// Free-form category, e.g. "Debit" or "Credit"
    #[serde(default, rename = "type", alias = "Type")]
    pub kind: String,
    #[serde(default, alias = "Summary")]
    pub summary: String,
    /// Exact decimal amount, written as a JSON string and read from a
    /// string or a number without going through a float
    #[serde(default, alias = "Amount")]
    pub amount: Decimal,
    #[serde(default, alias = "PostingDate", deserialize_with = "timestamp::deserialize")]
    pub posting_date: NaiveDateTime,
    #[serde(default, alias = "IsCleared")]
    pub is_cleared: bool,
    /// Set only once the transaction has cleared
    #[serde(
        default,
        alias = "ClearedDate",
        deserialize_with = "timestamp::deserialize_option"
    )]
    pub cleared_date: Option<NaiveDateTime>,
}

impl Transaction {
    /// Create an uncleared transaction with a nil id
    pub fn new(
        application_id: i32,
        kind: impl Into<String>,
        summary: impl Into<String>,
        amount: Decimal,
        posting_date: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            application_id,
            kind: kind.into(),
            summary: summary.into(),
            amount,
            posting_date,
            is_cleared: false,
            cleared_date: None,
        }
    }

    /// Canonical textual id, as matched by id lookups
    pub fn id_text(&self) -> String {
        self.id.hyphenated().to_string()
    }

    /// Copy every mutable field from `other`, keeping this record's id
    pub fn overwrite_from(&mut self, other: &Transaction) {
        self.application_id = other.application_id;
        self.kind = other.kind.clone();
        self.summary = other.summary.clone();
        self.amount = other.amount;
        self.posting_date = other.posting_date;
        self.is_cleared = other.is_cleared;
        self.cleared_date = other.cleared_date;
    }

    /// Mark as cleared at the given instant
    pub fn mark_cleared(&mut self, at: NaiveDateTime) {
        self.is_cleared = true;
        self.cleared_date = Some(at);
    }
}

/// Parse a posting date as accepted in documents and request paths.
///
/// Accepts `2017-01-02T00:00:00[.fff]`, RFC 3339 with an offset (the wall
/// clock part is kept), and a bare `2017-01-02` meaning midnight.
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(text) {
        return Ok(with_offset.naive_local());
    }
    match text.parse::<NaiveDateTime>() {
        Ok(naive) => Ok(naive),
        Err(e) => text
            .parse::<NaiveDate>()
            .map(|date| date.and_time(chrono::NaiveTime::MIN))
            .map_err(|_| e),
    }
}

mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::parse_timestamp(&text).map_err(de::Error::custom)
    }

    pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => super::parse_timestamp(&text)
                .map(Some)
                .map_err(de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn at(text: &str) -> NaiveDateTime {
        parse_timestamp(text).unwrap()
    }

    #[test]
    fn test_serializes_camel_case_names() {
        let tx = Transaction::new(
            197104,
            "Debit",
            "Payment",
            Decimal::from_str("58.26").unwrap(),
            at("2016-07-01T00:00:00"),
        );
        let value = serde_json::to_value(&tx).unwrap();

        assert_eq!(value["applicationId"], 197104);
        assert_eq!(value["type"], "Debit");
        assert_eq!(value["amount"], "58.26");
        assert_eq!(value["postingDate"], "2016-07-01T00:00:00");
        assert_eq!(value["isCleared"], false);
        assert!(value["clearedDate"].is_null());
        assert_eq!(value["id"], "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn test_reads_pascal_case_document() {
        let json = r#"{
            "Id": "3f2b12b8-2a06-45b4-b057-45949279b4e5",
            "ApplicationId": 197104,
            "Type": "Debit",
            "Summary": "Payment",
            "Amount": 58.26,
            "PostingDate": "2016-07-01T00:00:00",
            "IsCleared": true,
            "ClearedDate": "2016-07-02T10:30:00.1234567+02:00"
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(tx.id_text(), "3f2b12b8-2a06-45b4-b057-45949279b4e5");
        assert_eq!(tx.amount, Decimal::from_str("58.26").unwrap());
        assert_eq!(tx.kind, "Debit");
        assert!(tx.is_cleared);
        assert_eq!(
            tx.cleared_date.unwrap().format("%Y-%m-%d %H:%M").to_string(),
            "2016-07-02 10:30"
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let tx: Transaction = serde_json::from_str(r#"{"applicationId": 2}"#).unwrap();
        assert_eq!(tx.application_id, 2);
        assert!(tx.id.is_nil());
        assert!(tx.kind.is_empty());
        assert!(!tx.is_cleared);
        assert_eq!(tx.cleared_date, None);
    }

    #[test]
    fn test_amount_keeps_exact_digits() {
        let tx: Transaction =
            serde_json::from_str(r#"{"amount": "12345678901234.000000001"}"#).unwrap();
        let back = serde_json::to_value(&tx).unwrap();
        assert_eq!(back["amount"], "12345678901234.000000001");
    }

    #[test]
    fn test_numeric_amount_keeps_exact_digits() {
        let tx: Transaction =
            serde_json::from_str(r#"{"Amount": 12345678901234.567890123}"#).unwrap();
        assert_eq!(
            tx.amount,
            Decimal::from_str("12345678901234.567890123").unwrap()
        );

        let tx: Transaction = serde_json::from_str(r#"{"amount": -0.10}"#).unwrap();
        assert_eq!(tx.amount.to_string(), "-0.10");
    }

    #[test]
    fn test_parse_timestamp_forms() {
        assert_eq!(at("2017-01-02"), at("2017-01-02T00:00:00"));
        assert_eq!(
            at("2017-01-02T08:15:00.250").format("%H:%M:%S%.3f").to_string(),
            "08:15:00.250"
        );
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_overwrite_keeps_id() {
        let mut stored = Transaction::new(1, "Debit", "a", Decimal::ONE, at("2020-01-01"));
        stored.id = Uuid::new_v4();
        let original_id = stored.id;

        let mut incoming = Transaction::new(9, "Credit", "b", Decimal::TEN, at("2021-01-01"));
        incoming.id = Uuid::new_v4();
        incoming.mark_cleared(at("2021-02-01"));

        stored.overwrite_from(&incoming);
        assert_eq!(stored.id, original_id);
        assert_eq!(stored.application_id, 9);
        assert_eq!(stored.kind, "Credit");
        assert!(stored.is_cleared);
        assert_eq!(stored.cleared_date, Some(at("2021-02-01")));
    }
}
