// Shared types for the result pipeline
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of identifier a lookup result describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultType {
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "emailHash")]
    EmailHash,
    #[serde(rename = "ip")]
    Ip,
    #[serde(rename = "username")]
    Username,
}

impl ResultType {
    /// Known tags in the order batches are processed
    pub const ALL: [ResultType; 4] = [
        ResultType::Email,
        ResultType::EmailHash,
        ResultType::Ip,
        ResultType::Username,
    ];

    /// Tag as it appears in lookup payloads
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultType::Email => "email",
            ResultType::EmailHash => "emailHash",
            ResultType::Ip => "ip",
            ResultType::Username => "username",
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResultType::ALL
            .into_iter()
            .find(|result_type| result_type.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Network details only reported for IP lookups
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IpDetails {
    pub delegated_country_code: Option<String>,
    pub country_code: Option<String>,
    pub asn: Option<u64>,
    pub is_tor_exit: Option<bool>,
}

/// Immutable, fully validated lookup result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    value: String,
    #[serde(rename = "type")]
    result_type: ResultType,
    frequency: u64,
    appears: bool,
    is_blacklisted: bool,
    last_seen: Option<DateTime<Utc>>,
    confidence: Option<f64>,
    #[serde(flatten)]
    ip: Option<IpDetails>,
}

impl ResultRecord {
    pub fn new(
        value: impl Into<String>,
        result_type: ResultType,
        frequency: u64,
        appears: bool,
        is_blacklisted: bool,
        last_seen: Option<DateTime<Utc>>,
        confidence: Option<f64>,
    ) -> Self {
        Self {
            value: value.into(),
            result_type,
            frequency,
            appears,
            is_blacklisted,
            last_seen,
            confidence,
            ip: None,
        }
    }

    /// Attach IP-only details
    pub fn with_ip_details(mut self, details: IpDetails) -> Self {
        self.ip = Some(details);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn result_type(&self) -> ResultType {
        self.result_type
    }

    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    pub fn appears(&self) -> bool {
        self.appears
    }

    pub fn is_blacklisted(&self) -> bool {
        self.is_blacklisted
    }

    pub fn last_seen(&self) -> Option<DateTime<Utc>> {
        self.last_seen
    }

    pub fn confidence(&self) -> Option<f64> {
        self.confidence
    }

    pub fn ip_details(&self) -> Option<&IpDetails> {
        self.ip.as_ref()
    }

    pub fn delegated_country_code(&self) -> Option<&str> {
        self.ip.as_ref()?.delegated_country_code.as_deref()
    }

    pub fn country_code(&self) -> Option<&str> {
        self.ip.as_ref()?.country_code.as_deref()
    }

    pub fn asn(&self) -> Option<u64> {
        self.ip.as_ref()?.asn
    }

    pub fn is_tor_exit(&self) -> Option<bool> {
        self.ip.as_ref()?.is_tor_exit
    }
}

/// Ordered, append-only sequence of results
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultCollection {
    results: Vec<ResultRecord>,
}

impl ResultCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: ResultRecord) {
        self.results.push(result);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultRecord> {
        self.results.iter()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ResultRecord> {
        self.results.get(index)
    }
}

impl IntoIterator for ResultCollection {
    type Item = ResultRecord;
    type IntoIter = std::vec::IntoIter<ResultRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultCollection {
    type Item = &'a ResultRecord;
    type IntoIter = std::slice::Iter<'a, ResultRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
