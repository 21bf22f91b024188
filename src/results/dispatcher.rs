//! Type-tag dispatch with mandatory field validation
//!
//! Validation order, short-circuiting on the first failure:
//! builder lookup, value, frequency, appears, then the builder itself.

use crate::error::ResultError;
use crate::extraction::{FieldExtractor, RawRecord, FIELD_APPEARS, FIELD_FREQUENCY};
use crate::results::builder::{resolve_value, IpResultBuilder, NonIpResultBuilder, ResultBuilder};
use crate::results::types::{ResultRecord, ResultType};
use std::sync::Arc;

/// Routes raw records to the first builder that handles their type tag
pub struct ResultDispatcher {
    extractor: Arc<FieldExtractor>,
    builders: Vec<Box<dyn ResultBuilder>>,
}

impl ResultDispatcher {
    /// Create a dispatcher over an explicit builder list
    ///
    /// Builders are consulted in the given order. An empty list rejects
    /// every tag with `InvalidType`.
    pub fn new(extractor: Arc<FieldExtractor>, builders: Vec<Box<dyn ResultBuilder>>) -> Self {
        Self {
            extractor,
            builders,
        }
    }

    /// Standard IP and non-IP builders sharing the given extractor
    pub fn with_extractor(extractor: FieldExtractor) -> Self {
        let extractor = Arc::new(extractor);
        let builders: Vec<Box<dyn ResultBuilder>> = vec![
            Box::new(IpResultBuilder::new(Arc::clone(&extractor))),
            Box::new(NonIpResultBuilder::new(Arc::clone(&extractor))),
        ];

        Self::new(extractor, builders)
    }

    /// Whether the tag is one of the known lookup types
    pub fn handles_type(&self, type_name: &str) -> bool {
        type_name.parse::<ResultType>().is_ok()
    }

    /// Validate and build a single record
    pub fn create(
        &self,
        record: &RawRecord,
        type_name: &str,
        value: Option<&str>,
    ) -> Result<ResultRecord, ResultError> {
        let builder = self
            .find_builder(type_name)
            .ok_or_else(|| ResultError::invalid_type(type_name))?;

        let value = resolve_value(record, value).ok_or(ResultError::MissingValue)?;

        if self.extractor.frequency(record).is_none() {
            return Err(ResultError::missing_field(FIELD_FREQUENCY));
        }

        if self.extractor.appears(record).is_none() {
            return Err(ResultError::missing_field(FIELD_APPEARS));
        }

        builder.build(record, type_name, Some(value.as_str()))
    }

    fn find_builder(&self, type_name: &str) -> Option<&dyn ResultBuilder> {
        self.builders
            .iter()
            .find(|builder| builder.handles_type(type_name))
            .map(|builder| builder.as_ref())
    }
}

impl Default for ResultDispatcher {
    fn default() -> Self {
        Self::with_extractor(FieldExtractor::default())
    }
}
