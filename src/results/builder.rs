//! Per-type result builders
//!
//! Each builder knows which type tags it serves and which extracted fields
//! make it into the final record.

use crate::error::ResultError;
use crate::extraction::{FieldExtractor, RawRecord, FIELD_VALUE};
use crate::results::types::{IpDetails, ResultRecord, ResultType};
use serde_json::Value;
use std::sync::Arc;

/// Builds a `ResultRecord` for the type tags it handles
///
/// Frequency and appearance default to `0` and `false` when the raw record
/// lacks them; every other optional field is passed through as extracted.
pub trait ResultBuilder: Send + Sync {
    /// Whether this builder serves the given type tag
    fn handles_type(&self, type_name: &str) -> bool;

    /// Build a record from raw data
    ///
    /// `value` is used only when the raw record carries no `value` field.
    fn build(
        &self,
        record: &RawRecord,
        type_name: &str,
        value: Option<&str>,
    ) -> Result<ResultRecord, ResultError>;
}

/// Builder for email, email hash and username lookups
#[derive(Debug, Clone)]
pub struct NonIpResultBuilder {
    extractor: Arc<FieldExtractor>,
}

impl NonIpResultBuilder {
    const VALID_TYPES: [ResultType; 3] = [
        ResultType::Email,
        ResultType::EmailHash,
        ResultType::Username,
    ];

    pub fn new(extractor: Arc<FieldExtractor>) -> Self {
        Self { extractor }
    }
}

impl ResultBuilder for NonIpResultBuilder {
    fn handles_type(&self, type_name: &str) -> bool {
        Self::VALID_TYPES
            .iter()
            .any(|result_type| result_type.as_str() == type_name)
    }

    fn build(
        &self,
        record: &RawRecord,
        type_name: &str,
        value: Option<&str>,
    ) -> Result<ResultRecord, ResultError> {
        let result_type = parse_type(type_name)?;
        let value = resolve_value(record, value).ok_or(ResultError::MissingValue)?;

        Ok(base_record(&self.extractor, record, value, result_type))
    }
}

/// Builder for IP lookups, adding country, ASN and Tor exit details
#[derive(Debug, Clone)]
pub struct IpResultBuilder {
    extractor: Arc<FieldExtractor>,
}

impl IpResultBuilder {
    pub fn new(extractor: Arc<FieldExtractor>) -> Self {
        Self { extractor }
    }
}

impl ResultBuilder for IpResultBuilder {
    fn handles_type(&self, type_name: &str) -> bool {
        type_name == ResultType::Ip.as_str()
    }

    fn build(
        &self,
        record: &RawRecord,
        type_name: &str,
        value: Option<&str>,
    ) -> Result<ResultRecord, ResultError> {
        let result_type = parse_type(type_name)?;
        let value = resolve_value(record, value).ok_or(ResultError::MissingValue)?;

        let details = IpDetails {
            delegated_country_code: self.extractor.delegated_country_code(record),
            country_code: self.extractor.country_code(record),
            asn: self.extractor.asn(record),
            is_tor_exit: self.extractor.is_tor_exit(record),
        };

        Ok(base_record(&self.extractor, record, value, result_type).with_ip_details(details))
    }
}

/// Resolve the identifier: the record's own `value` wins over the caller's
///
/// Strings are taken verbatim and numbers as their JSON text. Null and any
/// other kind count as absent.
pub fn resolve_value(record: &RawRecord, fallback: Option<&str>) -> Option<String> {
    match record.get(FIELD_VALUE) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => fallback.map(str::to_string),
    }
}

fn parse_type(type_name: &str) -> Result<ResultType, ResultError> {
    type_name
        .parse::<ResultType>()
        .map_err(ResultError::invalid_type)
}

fn base_record(
    extractor: &FieldExtractor,
    record: &RawRecord,
    value: String,
    result_type: ResultType,
) -> ResultRecord {
    ResultRecord::new(
        value,
        result_type,
        extractor.frequency(record).unwrap_or(0),
        extractor.appears(record).unwrap_or(false),
        extractor.is_blacklisted(record),
        extractor.last_seen(record),
        extractor.confidence(record),
    )
}
