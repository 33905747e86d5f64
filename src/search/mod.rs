//! Query construction for the advocate directory.
//!
//! Two independent builders live here: [`build_search_predicate`] turns a
//! free-text term into a full-text predicate, and [`build_order_directive`]
//! turns an optional field/direction pair into an ordering clause. They share
//! no state, so callers may use either, both, or neither.

mod order;
mod predicate;

pub use order::*;
pub use predicate::*;

use thiserror::Error;

/// Validation failures raised while building a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Search term cannot be empty")]
    EmptySearchTerm,
    #[error("Invalid field for ordering: {0}")]
    InvalidOrderField(String),
}
