//! Raw record field extraction
//!
//! This module provides:
//! - Typed, nullable extraction of every field the lookup service returns
//! - The coercion rules shared by those extractions
//! - A pluggable clock for the time-dependent blacklist check

mod clock;
mod extractor;

pub use clock::{Clock, FixedClock, SystemClock};
pub use extractor::{
    parse_timestamp, FieldExtractor, BLACKLIST_FREQUENCY, DEFAULT_BLACKLIST_THRESHOLD_MINUTES,
    FIELD_APPEARS, FIELD_ASN, FIELD_CONFIDENCE, FIELD_COUNTRY, FIELD_DELEGATED, FIELD_FREQUENCY,
    FIELD_LAST_SEEN, FIELD_TOR_EXIT, FIELD_VALUE,
};

/// Untyped key-value record as decoded from a lookup response
pub type RawRecord = serde_json::Map<String, serde_json::Value>;
