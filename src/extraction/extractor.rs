//! Field-level coercion of raw lookup records
//!
//! Every extraction is total: malformed input collapses to `None`, never to an
//! error. Only `is_blacklisted` reads the clock.

use super::clock::{Clock, SystemClock};
use super::RawRecord;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use std::sync::Arc;

pub const FIELD_VALUE: &str = "value";
pub const FIELD_FREQUENCY: &str = "frequency";
pub const FIELD_APPEARS: &str = "appears";
pub const FIELD_LAST_SEEN: &str = "lastseen";
pub const FIELD_CONFIDENCE: &str = "confidence";
pub const FIELD_DELEGATED: &str = "delegated";
pub const FIELD_COUNTRY: &str = "country";
pub const FIELD_ASN: &str = "asn";
pub const FIELD_TOR_EXIT: &str = "torexit";

/// Default recency window for the blacklist check
pub const DEFAULT_BLACKLIST_THRESHOLD_MINUTES: u32 = 10;

/// Frequency reported for addresses on the service's own blacklist
pub const BLACKLIST_FREQUENCY: u64 = 255;

/// Offset-less timestamp layouts, interpreted as UTC
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Extracts typed, nullable values from a raw record
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    blacklist_threshold_minutes: u32,
    clock: Arc<dyn Clock>,
}

impl FieldExtractor {
    /// Create an extractor with the given blacklist threshold, reading system time
    pub fn new(blacklist_threshold_minutes: u32) -> Self {
        Self {
            blacklist_threshold_minutes,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used by `is_blacklisted`
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn blacklist_threshold_minutes(&self) -> u32 {
        self.blacklist_threshold_minutes
    }

    pub fn frequency(&self, record: &RawRecord) -> Option<u64> {
        self.non_negative_integer(record, FIELD_FREQUENCY)
    }

    pub fn appears(&self, record: &RawRecord) -> Option<bool> {
        self.tri_state_bool(record, FIELD_APPEARS)
    }

    /// Parse `lastseen` into a UTC timestamp
    pub fn last_seen(&self, record: &RawRecord) -> Option<DateTime<Utc>> {
        let raw = raw_field(record, FIELD_LAST_SEEN)?.as_str()?;
        parse_timestamp(raw)
    }

    /// True only for a max-frequency sighting inside the recency window
    ///
    /// The window is open at its lower edge: a sighting exactly
    /// `threshold` minutes old is not blacklisted.
    pub fn is_blacklisted(&self, record: &RawRecord) -> bool {
        let Some(last_seen) = self.last_seen(record) else {
            return false;
        };

        if self.frequency(record) != Some(BLACKLIST_FREQUENCY) {
            return false;
        }

        let threshold =
            self.clock.now() - Duration::minutes(i64::from(self.blacklist_threshold_minutes));

        last_seen > threshold
    }

    /// Numbers and numeric strings; non-finite values are rejected
    pub fn confidence(&self, record: &RawRecord) -> Option<f64> {
        let confidence = match raw_field(record, FIELD_CONFIDENCE)? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };

        confidence.is_finite().then_some(confidence)
    }

    pub fn delegated_country_code(&self, record: &RawRecord) -> Option<String> {
        self.non_empty_string(record, FIELD_DELEGATED)
    }

    pub fn country_code(&self, record: &RawRecord) -> Option<String> {
        self.non_empty_string(record, FIELD_COUNTRY)
    }

    pub fn asn(&self, record: &RawRecord) -> Option<u64> {
        self.non_negative_integer(record, FIELD_ASN)
    }

    pub fn is_tor_exit(&self, record: &RawRecord) -> Option<bool> {
        self.tri_state_bool(record, FIELD_TOR_EXIT)
    }

    /// JSON integers >= 0; floats, strings and booleans are rejected
    pub fn non_negative_integer(&self, record: &RawRecord, field: &str) -> Option<u64> {
        raw_field(record, field)?.as_u64()
    }

    /// Exactly integer 0 or 1, anything else is `None`
    pub fn tri_state_bool(&self, record: &RawRecord, field: &str) -> Option<bool> {
        match self.non_negative_integer(record, field)? {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }
    }

    /// Trimmed string, `None` when not a string or empty after trimming
    pub fn non_empty_string(&self, record: &RawRecord, field: &str) -> Option<String> {
        let trimmed = raw_field(record, field)?.as_str()?.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_BLACKLIST_THRESHOLD_MINUTES)
    }
}

/// Look up a field, treating JSON null as absent
fn raw_field<'a>(record: &'a RawRecord, field: &str) -> Option<&'a Value> {
    record.get(field).filter(|value| !value.is_null())
}

/// Parse the timestamp layouts the lookup service is known to emit
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::FixedClock;
    use chrono::TimeZone;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 4, 10, 16, 26, 26).unwrap()
    }

    fn frozen_extractor() -> FieldExtractor {
        FieldExtractor::default().with_clock(Arc::new(FixedClock::new(fixed_now())))
    }

    fn format_at(offset: Duration) -> String {
        (fixed_now() + offset).format("%Y-%m-%d %H:%M:%S").to_string()
    }

    #[test]
    fn test_non_negative_integer_accepts_zero_and_positive() {
        let extractor = FieldExtractor::default();
        assert_eq!(extractor.frequency(&record(json!({"frequency": 0}))), Some(0));
        assert_eq!(extractor.frequency(&record(json!({"frequency": 10}))), Some(10));
        assert_eq!(extractor.asn(&record(json!({"asn": 789}))), Some(789));
    }

    #[test]
    fn test_non_negative_integer_rejects_invalid() {
        let extractor = FieldExtractor::default();
        let invalid = [
            json!({}),
            json!({"frequency": null}),
            json!({"frequency": "1"}),
            json!({"frequency": "foo"}),
            json!({"frequency": -1}),
            json!({"frequency": 1.5}),
            json!({"frequency": 1.0}),
            json!({"frequency": true}),
        ];

        for raw in invalid {
            assert_eq!(extractor.frequency(&record(raw.clone())), None, "{raw}");
        }
        assert_eq!(extractor.asn(&record(json!({"asn": -5}))), None);
    }

    #[test]
    fn test_tri_state_bool() {
        let extractor = FieldExtractor::default();
        assert_eq!(extractor.appears(&record(json!({"appears": 0}))), Some(false));
        assert_eq!(extractor.appears(&record(json!({"appears": 1}))), Some(true));

        for raw in [
            json!({}),
            json!({"appears": "1"}),
            json!({"appears": "foo"}),
            json!({"appears": -1}),
            json!({"appears": 2}),
            json!({"appears": true}),
        ] {
            assert_eq!(extractor.appears(&record(raw.clone())), None, "{raw}");
        }

        assert_eq!(extractor.is_tor_exit(&record(json!({"torexit": 1}))), Some(true));
        assert_eq!(extractor.is_tor_exit(&record(json!({"torexit": "yes"}))), None);
    }

    #[test]
    fn test_last_seen() {
        let extractor = FieldExtractor::default();
        assert_eq!(extractor.last_seen(&record(json!({}))), None);
        assert_eq!(extractor.last_seen(&record(json!({"lastseen": "foo"}))), None);
        assert_eq!(extractor.last_seen(&record(json!({"lastseen": 1554913586}))), None);
        assert_eq!(
            extractor.last_seen(&record(json!({"lastseen": "2019-04-10 16:26:26"}))),
            Some(fixed_now())
        );
    }

    #[test]
    fn test_last_seen_normalizes_offsets_to_utc() {
        let extractor = FieldExtractor::default();
        let parsed = extractor.last_seen(&record(json!({"lastseen": "2019-04-10T18:26:26+02:00"})));
        assert_eq!(parsed, Some(fixed_now()));
    }

    #[test]
    fn test_parse_timestamp_layouts() {
        assert_eq!(parse_timestamp("2019-04-10T16:26:26"), Some(fixed_now()));
        assert_eq!(parse_timestamp("2019-04-10 16:26:26.000"), Some(fixed_now()));
        assert_eq!(
            parse_timestamp("Wed, 10 Apr 2019 16:26:26 +0000"),
            Some(fixed_now())
        );
        assert_eq!(
            parse_timestamp("2019-04-10"),
            Some(Utc.with_ymd_and_hms(2019, 4, 10, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("2019-13-45 99:99:99"), None);
    }

    #[test]
    fn test_is_blacklisted_requires_last_seen_and_frequency() {
        let extractor = frozen_extractor();
        assert!(!extractor.is_blacklisted(&record(json!({}))));
        assert!(!extractor.is_blacklisted(&record(json!({"lastseen": format_at(Duration::zero())}))));
        assert!(!extractor.is_blacklisted(&record(json!({
            "lastseen": format_at(Duration::zero()),
            "frequency": 1,
        }))));
        assert!(!extractor.is_blacklisted(&record(json!({
            "lastseen": "not a date",
            "frequency": 255,
        }))));
    }

    #[test]
    fn test_is_blacklisted_threshold_window() {
        let extractor = frozen_extractor();
        let at = |offset: Duration| {
            record(json!({
                "lastseen": format_at(offset),
                "frequency": 255,
            }))
        };

        assert!(!extractor.is_blacklisted(&at(Duration::minutes(-11))));
        assert!(!extractor.is_blacklisted(&at(Duration::minutes(-10))));
        assert!(extractor.is_blacklisted(&at(Duration::minutes(-10) + Duration::seconds(1))));
        assert!(extractor.is_blacklisted(&at(Duration::minutes(-9))));
        assert!(extractor.is_blacklisted(&at(Duration::zero())));
    }

    #[test]
    fn test_is_blacklisted_custom_threshold() {
        let extractor =
            FieldExtractor::new(60).with_clock(Arc::new(FixedClock::new(fixed_now())));
        let raw = record(json!({
            "lastseen": format_at(Duration::minutes(-30)),
            "frequency": 255,
        }));

        assert_eq!(extractor.blacklist_threshold_minutes(), 60);
        assert!(extractor.is_blacklisted(&raw));
        assert!(!frozen_extractor().is_blacklisted(&raw));
    }

    #[test]
    fn test_confidence() {
        let extractor = FieldExtractor::default();
        let cases = [
            (json!({}), None),
            (json!({"confidence": "3.14"}), Some(3.14)),
            (json!({"confidence": " 3.14 "}), Some(3.14)),
            (json!({"confidence": "foo"}), None),
            (json!({"confidence": "NaN"}), None),
            (json!({"confidence": "inf"}), None),
            (json!({"confidence": true}), None),
            (json!({"confidence": -1}), Some(-1.0)),
            (json!({"confidence": 0}), Some(0.0)),
            (json!({"confidence": 6.28}), Some(6.28)),
        ];

        for (raw, expected) in cases {
            assert_eq!(extractor.confidence(&record(raw.clone())), expected, "{raw}");
        }
    }

    #[test]
    fn test_country_codes() {
        let extractor = FieldExtractor::default();
        assert_eq!(
            extractor.country_code(&record(json!({"country": "gb"}))),
            Some("gb".to_string())
        );
        assert_eq!(
            extractor.delegated_country_code(&record(json!({"delegated": "  fr \n"}))),
            Some("fr".to_string())
        );

        for raw in [
            json!({}),
            json!({"country": 100}),
            json!({"country": ""}),
            json!({"country": "   "}),
        ] {
            assert_eq!(extractor.country_code(&record(raw.clone())), None, "{raw}");
        }
        assert_eq!(
            extractor.delegated_country_code(&record(json!({"delegated": ""}))),
            None
        );
    }
}
