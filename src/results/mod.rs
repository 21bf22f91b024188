//! Typed lookup results
//!
//! This module provides:
//! - Result record and collection types
//! - IP and non-IP builders selected by type tag
//! - A dispatcher enforcing mandatory fields per record
//! - Batch aggregation over a whole lookup payload

mod batch;
mod builder;
mod dispatcher;
mod types;

pub use batch::{BatchAggregator, BatchStats};
pub use builder::{resolve_value, IpResultBuilder, NonIpResultBuilder, ResultBuilder};
pub use dispatcher::ResultDispatcher;
pub use types::{IpDetails, ResultCollection, ResultRecord, ResultType};
