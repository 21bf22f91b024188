// Bulk payload aggregation
// Walks the known type tags in fixed order and keeps only records that pass dispatch
use crate::error::ResultError;
use crate::results::dispatcher::ResultDispatcher;
use crate::results::types::{ResultCollection, ResultType};
use serde::Serialize;
use serde_json::{Map, Value};

/// Counts from a single batch run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    /// Items seen under known type tags
    pub input_records: usize,
    /// Items that became results
    pub accepted: usize,
    /// Dropped: no builder for the tag
    pub invalid_type: usize,
    /// Dropped: no identifier value
    pub missing_value: usize,
    /// Dropped: frequency or appears absent/invalid
    pub missing_field: usize,
    /// Dropped: item was not a JSON object
    pub malformed: usize,
}

impl BatchStats {
    /// Total number of dropped items
    pub fn dropped(&self) -> usize {
        self.invalid_type + self.missing_value + self.missing_field + self.malformed
    }

    fn record_failure(&mut self, error: &ResultError) {
        match error {
            ResultError::InvalidType { .. } => self.invalid_type += 1,
            ResultError::MissingValue => self.missing_value += 1,
            ResultError::MissingField { .. } => self.missing_field += 1,
        }
    }
}

/// Turns a bulk lookup payload into a result collection
///
/// Failed items are dropped silently; a batch never fails as a whole.
#[derive(Default)]
pub struct BatchAggregator {
    dispatcher: ResultDispatcher,
}

impl BatchAggregator {
    pub fn new(dispatcher: ResultDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Build results for every known tag present in the payload
    ///
    /// Results are ordered by tag (email, emailHash, ip, username), then by
    /// position within the tag's list. Unknown top-level keys are ignored.
    pub fn create_batch(&self, payload: &Map<String, Value>) -> ResultCollection {
        self.create_batch_with_stats(payload).0
    }

    /// Same as `create_batch`, also reporting what was dropped and why
    pub fn create_batch_with_stats(
        &self,
        payload: &Map<String, Value>,
    ) -> (ResultCollection, BatchStats) {
        let mut results = ResultCollection::new();
        let mut stats = BatchStats::default();

        for result_type in ResultType::ALL {
            let tag = result_type.as_str();
            let Some(items) = payload.get(tag).and_then(Value::as_array) else {
                continue;
            };

            for item in items {
                stats.input_records += 1;

                let Some(record) = item.as_object() else {
                    stats.malformed += 1;
                    continue;
                };

                match self.dispatcher.create(record, tag, None) {
                    Ok(result) => {
                        stats.accepted += 1;
                        results.add(result);
                    }
                    Err(e) => stats.record_failure(&e),
                }
            }
        }

        (results, stats)
    }

    /// Accept a whole decoded document; anything but an object yields no results
    pub fn create_batch_from_json(&self, document: &Value) -> ResultCollection {
        match document.as_object() {
            Some(payload) => self.create_batch(payload),
            None => ResultCollection::new(),
        }
    }
}
