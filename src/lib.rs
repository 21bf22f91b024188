//! sfs-results - Typed Reputation Lookup Results
//!
//! Parses the loosely-typed responses of a reputation lookup service (email,
//! email hash, IP and username lookups) into validated, immutable result
//! records, and aggregates whole response payloads into ordered collections.

pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod results;

pub use error::{Result, ResultError, SfsError};
pub use extraction::{FieldExtractor, RawRecord};
pub use results::{BatchAggregator, ResultCollection, ResultDispatcher, ResultRecord, ResultType};
